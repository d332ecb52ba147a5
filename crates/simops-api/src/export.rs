// Export endpoint -- raw blob downloads

use serde_json::Value;

use crate::client::{ApiClient, Download};
use crate::error::Error;
use crate::types::ExportRequest;

impl ApiClient {
    /// `POST /export` -- returns the raw CSV/JSON blob with its
    /// suggested filename. The body is never JSON-decoded; callers
    /// stream or save it themselves.
    pub async fn export(&self, request: &ExportRequest) -> Result<Download, Error> {
        let body: Value = serde_json::to_value(request).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })?;
        self.post_download("/export", body).await
    }
}

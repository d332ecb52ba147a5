// SIM endpoint listing

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::types::{EndpointRecord, Page};

impl ApiClient {
    /// `GET /endpoints` -- SIM endpoints with rolling usage counters.
    pub async fn endpoints(
        &self,
        status: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<EndpointRecord>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("status", status.map(str::to_owned)),
                ("page", page.map(|p| p.to_string())),
                ("per_page", per_page.map(|p| p.to_string())),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/endpoints", opts).await
    }
}

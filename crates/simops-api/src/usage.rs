// Usage aggregate endpoints

use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::types::{Page, UsageGroupBy, UsageSummary};

impl ApiClient {
    /// `GET /usage/summary` -- totals plus one point per period.
    pub async fn usage_summary(
        &self,
        group_by: UsageGroupBy,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<UsageSummary, Error> {
        let opts = RequestOptions {
            params: vec![
                ("group_by", Some(group_by.as_str().to_owned())),
                ("from", from.map(str::to_owned)),
                ("to", to.map(str::to_owned)),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/usage/summary", opts).await
    }

    /// `GET /usage/records` -- itemized usage rows (server-defined shape).
    pub async fn usage_records(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("from", from.map(str::to_owned)),
                ("to", to.map(str::to_owned)),
                ("page", page.map(|p| p.to_string())),
                ("per_page", per_page.map(|p| p.to_string())),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/usage/records", opts).await
    }

    /// `GET /usage/roaming` -- usage grouped by roaming network (TADIG).
    pub async fn usage_roaming(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("from", from.map(str::to_owned)),
                ("to", to.map(str::to_owned)),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/usage/roaming", opts).await
    }

    /// `GET /usage/costs` -- billed cost aggregates.
    pub async fn usage_costs(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("from", from.map(str::to_owned)),
                ("to", to.map(str::to_owned)),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/usage/costs", opts).await
    }
}

// Bundle and bundle-instance listings

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::types::{BundleInstanceRecord, BundleRecord, InstanceQuery, Page};

impl ApiClient {
    /// `GET /bundles` -- the purchasable bundle catalogue.
    pub async fn bundles(
        &self,
        status: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<BundleRecord>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("status", status.map(str::to_owned)),
                ("page", page.map(|p| p.to_string())),
                ("per_page", per_page.map(|p| p.to_string())),
            ],
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/bundles", opts).await
    }

    /// `GET /bundle-instances` with the standard filter set.
    ///
    /// `skip_cache` bypasses the TTL cache for views that must reflect
    /// the latest state (the instances table refetches on every page
    /// change; the overview widgets are fine with cached data).
    pub async fn bundle_instances(
        &self,
        query: &InstanceQuery,
        skip_cache: bool,
    ) -> Result<Page<BundleInstanceRecord>, Error> {
        let opts = RequestOptions {
            params: vec![
                ("status", query.status.clone()),
                ("iccid", query.iccid.clone()),
                ("expiring_before", query.expiring_before.clone()),
                ("final_only", query.final_only.then(|| "true".to_owned())),
                ("page", query.page.map(|p| p.to_string())),
                ("per_page", query.per_page.map(|p| p.to_string())),
            ],
            skip_cache,
            scoped: true,
            ..RequestOptions::default()
        };
        self.get("/bundle-instances", opts).await
    }
}

// Admin listings, scope-filter lookups, and revenue aggregates
//
// The admin and revenue payloads are dashboard-rendered as-is, so they
// stay `serde_json::Value` pages rather than typed records. The scope
// lookups feed the tenant/customer dropdowns that drive
// `ApiClient::set_scope`.

use reqwest::Method;
use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::types::{CustomerList, Page, TenantList};

impl ApiClient {
    // ── Admin entity CRUD ────────────────────────────────────────────

    /// `GET /admin/users`.
    pub async fn admin_users(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: paging(page, per_page),
            ..RequestOptions::default()
        };
        self.get("/admin/users", opts).await
    }

    /// `POST /admin/users`.
    pub async fn create_admin_user(&self, user: Value) -> Result<Value, Error> {
        let opts = RequestOptions {
            body: Some(user),
            ..RequestOptions::default()
        };
        self.mutate(Method::POST, "/admin/users", opts).await
    }

    /// `PUT /admin/users/{id}`.
    pub async fn update_admin_user(&self, id: &str, user: Value) -> Result<Value, Error> {
        let opts = RequestOptions {
            body: Some(user),
            ..RequestOptions::default()
        };
        self.mutate(Method::PUT, &format!("/admin/users/{id}"), opts)
            .await
    }

    /// `DELETE /admin/users/{id}`.
    pub async fn delete_admin_user(&self, id: &str) -> Result<Value, Error> {
        self.mutate(
            Method::DELETE,
            &format!("/admin/users/{id}"),
            RequestOptions::default(),
        )
        .await
    }

    /// `GET /admin/sessions` -- active login sessions.
    pub async fn admin_sessions(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: paging(page, per_page),
            ..RequestOptions::default()
        };
        self.get("/admin/sessions", opts).await
    }

    /// `GET /admin/pricing`.
    pub async fn admin_pricing(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Page<Value>, Error> {
        let opts = RequestOptions {
            params: paging(page, per_page),
            ..RequestOptions::default()
        };
        self.get("/admin/pricing", opts).await
    }

    /// `PUT /admin/pricing/{id}`.
    pub async fn update_pricing(&self, id: &str, pricing: Value) -> Result<Value, Error> {
        let opts = RequestOptions {
            body: Some(pricing),
            ..RequestOptions::default()
        };
        self.mutate(Method::PUT, &format!("/admin/pricing/{id}"), opts)
            .await
    }

    // ── Scope filters ────────────────────────────────────────────────

    /// `GET /filters/tenants` -- always fresh, the dropdown must not
    /// show a stale tenant list after admin edits.
    pub async fn filter_tenants(&self) -> Result<TenantList, Error> {
        let opts = RequestOptions {
            skip_cache: true,
            ..RequestOptions::default()
        };
        self.get("/filters/tenants", opts).await
    }

    /// `GET /filters/customers`, optionally narrowed to one tenant.
    pub async fn filter_customers(&self, tenant_id: Option<&str>) -> Result<CustomerList, Error> {
        let opts = RequestOptions {
            params: vec![("tenant_id", tenant_id.map(str::to_owned))],
            skip_cache: true,
            ..RequestOptions::default()
        };
        self.get("/filters/customers", opts).await
    }

    // ── Revenue aggregates ───────────────────────────────────────────

    /// `GET /revenue/monthly`.
    pub async fn revenue_monthly(
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
        self.get("/revenue/monthly", opts).await
    }

    /// `GET /revenue/cost-chart`.
    pub async fn revenue_cost_chart(
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
        self.get("/revenue/cost-chart", opts).await
    }
}

fn paging(page: Option<u32>, per_page: Option<u32>) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("page", page.map(|p| p.to_string())),
        ("per_page", per_page.map(|p| p.to_string())),
    ]
}

// Wire types for the reporting API
//
// Response shapes are duck-typed server-side: most numeric and date
// fields can be absent, null, or (for dates) unparseable. Everything
// here stays `Option` and string-typed; `simops-core` validates and
// defaults at the boundary before classification ever runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Pagination envelope ─────────────────────────────────────────────

/// Standard listing envelope: `{ data: [...], pagination: {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_page: u32,
}

// ── Bundle instances ────────────────────────────────────────────────

/// One activation/renewal period of a bundle against an ICCID, as the
/// server reports it. Dates stay raw strings here: an unparseable
/// `end_time` must classify identically to an absent one, and that
/// policy belongs to the domain conversion, not serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleInstanceRecord {
    pub iccid: Option<String>,
    pub bundle_name: Option<String>,
    pub bundle_moniker: Option<String>,
    pub endpoint_name: Option<String>,
    pub customer_name: Option<String>,
    pub sequence: Option<u32>,
    pub sequence_max: Option<u32>,
    pub data_used_mb: Option<f64>,
    pub data_allowance_mb: Option<f64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status_name: Option<String>,
    pub status_moniker: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Server-side filters for the bundle-instance listing.
#[derive(Debug, Clone, Default)]
pub struct InstanceQuery {
    pub status: Option<String>,
    pub iccid: Option<String>,
    /// Date-only ISO string; matches instances ending before this date.
    pub expiring_before: Option<String>,
    /// Restrict to final instances (`sequence == sequence_max`).
    pub final_only: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// ── Bundles ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleRecord {
    pub bundle_name: Option<String>,
    pub bundle_moniker: Option<String>,
    pub status_name: Option<String>,
    pub data_allowance_mb: Option<f64>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Endpoints ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointRecord {
    pub endpoint_identifier: Option<String>,
    pub endpoint_name: Option<String>,
    pub endpoint_status_name: Option<String>,
    pub customer_name: Option<String>,
    pub usage_rolling_24h: Option<f64>,
    pub usage_rolling_7d: Option<f64>,
    pub usage_rolling_28d: Option<f64>,
    pub latest_activity: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Usage aggregates ────────────────────────────────────────────────

/// Grouping granularity for `/usage/summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageGroupBy {
    Daily,
    Monthly,
    Annual,
}

impl UsageGroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageSummary {
    #[serde(default)]
    pub summary: UsageTotals,
    #[serde(default)]
    pub data: Vec<UsagePoint>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UsageTotals {
    pub total_bytes: Option<f64>,
    pub total_charged: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsagePoint {
    pub date: Option<String>,
    pub total_bytes: Option<f64>,
    /// Billed volume; preferred over `total_bytes` when present.
    pub total_charged: Option<f64>,
}

// ── Auth flow ───────────────────────────────────────────────────────

/// Step 1 response: email/password accepted, OTP dispatched.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub otp_token: String,
    pub message: Option<String>,
}

/// Step 2 response: OTP verified, JWT issued.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    pub token: String,
    #[serde(default)]
    pub user: crate::session::UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordResponse {
    pub reset_token: String,
    pub message: Option<String>,
}

// ── Scope filters ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantList {
    #[serde(default)]
    pub tenants: Vec<TenantRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantRecord {
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerList {
    #[serde(default)]
    pub customers: Vec<String>,
}

// ── Export ──────────────────────────────────────────────────────────

/// Body for `POST /export`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    /// Which dataset to export (e.g. `"usage"`, `"bundle-instances"`).
    pub dataset: String,
    /// `"csv"` or `"json"`.
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

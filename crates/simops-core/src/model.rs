// ── Canonical domain types ──
//
// Built from `simops_api` wire records by the conversions in
// `crate::convert`. Dates are parsed into `DateTime<Utc>` here;
// everything downstream (classification, alerts, rendering) works on
// these types, never on raw records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One activation period of a data bundle against an ICCID.
///
/// Sequenced bundles renew by activating the next instance; `sequence`
/// and `sequence_max` locate this instance in that chain, and
/// `sequence == sequence_max` marks the final period before service
/// stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleInstance {
    /// SIM identifier, trimmed. Empty when the server omitted it.
    pub iccid: String,
    pub bundle_name: Option<String>,
    pub bundle_moniker: Option<String>,
    pub endpoint_name: Option<String>,
    pub customer_name: Option<String>,
    pub sequence: Option<u32>,
    pub sequence_max: Option<u32>,
    pub data_used_mb: Option<f64>,
    pub data_allowance_mb: Option<f64>,
    /// `None` when absent or unparseable; both classify identically.
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Backend lifecycle status, `status_moniker` as fallback.
    pub status_name: Option<String>,
}

impl BundleInstance {
    /// Display label: bundle name, else moniker, else `"Unknown"`.
    pub fn bundle_label(&self) -> &str {
        self.bundle_name
            .as_deref()
            .or(self.bundle_moniker.as_deref())
            .unwrap_or("Unknown")
    }
}

/// A SIM endpoint with its rolling usage counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub identifier: String,
    pub name: Option<String>,
    pub status_name: Option<String>,
    pub customer_name: Option<String>,
    /// Rolling usage in bytes; absent counters default to zero.
    pub usage_rolling_24h: f64,
    pub usage_rolling_7d: f64,
    pub usage_rolling_28d: f64,
    pub latest_activity: Option<DateTime<Utc>>,
}

impl Endpoint {
    /// Display label: name, else identifier, else `"Unknown"`.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.identifier.is_empty() => self.identifier.as_str(),
            _ => "Unknown",
        }
    }
}

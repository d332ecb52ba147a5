// ── API-to-domain conversions ──
//
// Bridges raw `simops_api` wire records into canonical domain types.
// The server's response shapes are loosely typed: numeric fields can be
// absent and date strings come in several flavors. Conversions default
// and normalize instead of failing; an unparseable `end_time` must
// classify exactly like an absent one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use simops_api::types::{BundleInstanceRecord, EndpointRecord};

use crate::model::{BundleInstance, Endpoint};

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse a server date string, silently dropping unparseable values.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS`, and date-only
/// strings; naive values are taken as UTC.
fn parse_datetime(raw: Option<&String>) -> Option<DateTime<Utc>> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

fn trimmed(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

// ── Bundle instances ────────────────────────────────────────────────

impl From<BundleInstanceRecord> for BundleInstance {
    fn from(rec: BundleInstanceRecord) -> Self {
        Self {
            iccid: rec.iccid.map(|s| s.trim().to_owned()).unwrap_or_default(),
            bundle_name: trimmed(rec.bundle_name),
            bundle_moniker: trimmed(rec.bundle_moniker),
            endpoint_name: trimmed(rec.endpoint_name),
            customer_name: trimmed(rec.customer_name),
            sequence: rec.sequence,
            sequence_max: rec.sequence_max,
            data_used_mb: rec.data_used_mb,
            data_allowance_mb: rec.data_allowance_mb,
            start_time: parse_datetime(rec.start_time.as_ref()),
            end_time: parse_datetime(rec.end_time.as_ref()),
            status_name: trimmed(rec.status_name).or_else(|| trimmed(rec.status_moniker)),
        }
    }
}

// ── Endpoints ───────────────────────────────────────────────────────

impl From<EndpointRecord> for Endpoint {
    fn from(rec: EndpointRecord) -> Self {
        Self {
            identifier: rec
                .endpoint_identifier
                .map(|s| s.trim().to_owned())
                .unwrap_or_default(),
            name: trimmed(rec.endpoint_name),
            status_name: trimmed(rec.endpoint_status_name),
            customer_name: trimmed(rec.customer_name),
            usage_rolling_24h: rec.usage_rolling_24h.unwrap_or(0.0),
            usage_rolling_7d: rec.usage_rolling_7d.unwrap_or(0.0),
            usage_rolling_28d: rec.usage_rolling_28d.unwrap_or(0.0),
            latest_activity: parse_datetime(rec.latest_activity.as_ref()),
        }
    }
}

// ── Endpoint health and anomaly flags ──

use chrono::{DateTime, Utc};

use crate::model::Endpoint;

/// Traffic-light health for the endpoint grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointHealth {
    /// Seen within 48h with traffic this week.
    Green,
    /// Seen within 14 days, or quiet this week but active this month.
    Amber,
    /// No recent activity and no recent traffic.
    Red,
}

pub fn endpoint_health(ep: &Endpoint, now: DateTime<Utc>) -> EndpointHealth {
    let hours_since = ep
        .latest_activity
        .map_or(f64::INFINITY, |t| (now - t).num_minutes() as f64 / 60.0);
    let recent_usage = ep.usage_rolling_7d > 0.0;
    let any_usage = ep.usage_rolling_28d > 0.0;

    if hours_since < 48.0 && recent_usage {
        return EndpointHealth::Green;
    }
    if hours_since < 336.0 || (!recent_usage && any_usage) {
        return EndpointHealth::Amber;
    }
    EndpointHealth::Red
}

/// Usage anomaly on one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// This week is more than 3x the 28-day weekly average.
    UsageSpike,
    /// No traffic this week, but the 28-day counter is non-zero.
    Dormant,
}

impl Anomaly {
    pub fn label(self) -> &'static str {
        match self {
            Self::UsageSpike => "High usage spike",
            Self::Dormant => "Recently dormant",
        }
    }
}

pub fn endpoint_anomalies(ep: &Endpoint) -> Vec<Anomaly> {
    let weekly = ep.usage_rolling_7d;
    let monthly = ep.usage_rolling_28d;
    let weekly_avg = monthly / 4.0;

    let mut flags = Vec::new();
    if weekly_avg > 0.0 && weekly > 3.0 * weekly_avg {
        flags.push(Anomaly::UsageSpike);
    }
    if weekly == 0.0 && monthly > 0.0 {
        flags.push(Anomaly::Dormant);
    }
    flags
}

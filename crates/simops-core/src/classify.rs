// ── Lifecycle classification ──
//
// Pure functions over `BundleInstance`. No I/O and no hidden clock:
// every time-dependent rule takes `now` explicitly.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::BundleInstance;

/// Allowance threshold for the Critical health bucket, percent.
pub const HEALTH_CRITICAL_PCT: f64 = 90.0;
/// Allowance threshold for the Moderate health bucket, percent.
pub const HEALTH_MODERATE_PCT: f64 = 75.0;

/// Percentage of the allowance consumed, `0..=100+`.
///
/// Absent or non-positive allowance yields `0.0`; the result is never
/// NaN or infinite. Values above 100 are meaningful (overconsumption)
/// and deliberately not clamped.
pub fn percent_used(used: Option<f64>, allowance: Option<f64>) -> f64 {
    let Some(allowance) = allowance.filter(|a| *a > 0.0) else {
        return 0.0;
    };
    let pct = (used.unwrap_or(0.0) / allowance) * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

/// Whole days until `end`, rounded up. Negative means already past.
///
/// The ceiling runs over the millisecond delta, so an expiry later
/// today counts as 1 day and one that passed an hour ago counts as 0.
pub fn days_until(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let delta_ms = (end? - now).num_milliseconds();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let days = (delta_ms as f64 / 86_400_000.0).ceil() as i64;
    Some(days)
}

/// An instance is final when it is the last in its renewal chain.
/// Unknown sequence positions are never final.
pub fn is_final(sequence: Option<u32>, sequence_max: Option<u32>) -> bool {
    matches!((sequence, sequence_max), (Some(s), Some(m)) if s == m)
}

/// Status shown in instance tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    /// `now` falls within the inclusive `[start, end]` window. The only
    /// computed status; everything else is reported by the backend.
    Live,
    Reported(String),
    Unknown,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("LIVE"),
            Self::Reported(s) => f.write_str(s),
            Self::Unknown => f.write_str("-"),
        }
    }
}

pub fn display_status(inst: &BundleInstance, now: DateTime<Utc>) -> DisplayStatus {
    if let (Some(start), Some(end)) = (inst.start_time, inst.end_time) {
        if now >= start && now <= end {
            return DisplayStatus::Live;
        }
    }
    match inst.status_name.as_deref() {
        Some(s) if !s.is_empty() => DisplayStatus::Reported(s.to_owned()),
        _ => DisplayStatus::Unknown,
    }
}

/// Row severity tier for the instances table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTier {
    Critical,
    Warning,
    Normal,
}

/// Classify a table row. Precedence, first match wins:
/// depleted, final and ending within 7 days, ending within 14 days,
/// above 85% consumed.
pub fn row_tier(inst: &BundleInstance, now: DateTime<Utc>) -> RowTier {
    let pct = percent_used(inst.data_used_mb, inst.data_allowance_mb);
    let days = days_until(inst.end_time, now);

    if pct >= 100.0 {
        return RowTier::Critical;
    }
    if is_final(inst.sequence, inst.sequence_max)
        && matches!(days, Some(d) if (0..7).contains(&d))
    {
        return RowTier::Critical;
    }
    if matches!(days, Some(d) if (0..14).contains(&d)) {
        return RowTier::Warning;
    }
    if pct > 85.0 {
        return RowTier::Warning;
    }
    RowTier::Normal
}

/// Consumption bucket for the overview health doughnut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBucket {
    Terminated,
    Depleted,
    Critical,
    Moderate,
    Healthy,
}

impl HealthBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Terminated => "Terminated",
            Self::Depleted => "Depleted",
            Self::Critical => "Critical",
            Self::Moderate => "Moderate",
            Self::Healthy => "Healthy",
        }
    }
}

/// Bucket one instance by backend status and consumption.
///
/// A reported `Depleted` status wins even when the usage counters say
/// otherwise (stale or missing allowance data).
pub fn health_bucket(status: Option<&str>, pct: f64) -> HealthBucket {
    if status.is_some_and(|s| s.eq_ignore_ascii_case("terminated")) {
        return HealthBucket::Terminated;
    }
    if pct >= 100.0 || status.is_some_and(|s| s.eq_ignore_ascii_case("depleted")) {
        return HealthBucket::Depleted;
    }
    if pct >= HEALTH_CRITICAL_PCT {
        return HealthBucket::Critical;
    }
    if pct >= HEALTH_MODERATE_PCT {
        return HealthBucket::Moderate;
    }
    HealthBucket::Healthy
}

/// Bucket counts for a set of instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthSummary {
    pub healthy: usize,
    pub moderate: usize,
    pub critical: usize,
    pub depleted: usize,
    pub terminated: usize,
}

impl HealthSummary {
    pub fn tally<'a, I>(instances: I) -> Self
    where
        I: IntoIterator<Item = &'a BundleInstance>,
    {
        let mut summary = Self::default();
        for inst in instances {
            let pct = percent_used(inst.data_used_mb, inst.data_allowance_mb);
            match health_bucket(inst.status_name.as_deref(), pct) {
                HealthBucket::Healthy => summary.healthy += 1,
                HealthBucket::Moderate => summary.moderate += 1,
                HealthBucket::Critical => summary.critical += 1,
                HealthBucket::Depleted => summary.depleted += 1,
                HealthBucket::Terminated => summary.terminated += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.healthy + self.moderate + self.critical + self.depleted + self.terminated
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn inst() -> BundleInstance {
        BundleInstance {
            iccid: "8944100000000000001".into(),
            ..BundleInstance::default()
        }
    }

    // ── percent_used ────────────────────────────────────────────────

    #[test]
    fn percent_used_is_zero_without_allowance() {
        assert_eq!(percent_used(Some(500.0), None), 0.0);
        assert_eq!(percent_used(Some(500.0), Some(0.0)), 0.0);
        assert_eq!(percent_used(Some(500.0), Some(-1.0)), 0.0);
        assert_eq!(percent_used(None, Some(1024.0)), 0.0);
    }

    #[test]
    fn percent_used_can_exceed_one_hundred() {
        assert_eq!(percent_used(Some(512.0), Some(1024.0)), 50.0);
        assert_eq!(percent_used(Some(2048.0), Some(1024.0)), 200.0);
    }

    #[test]
    fn percent_used_is_always_finite() {
        assert!(percent_used(Some(f64::NAN), Some(1024.0)).is_finite());
        assert!(percent_used(Some(f64::INFINITY), Some(1024.0)).is_finite());
    }

    // ── days_until ──────────────────────────────────────────────────

    #[test]
    fn days_until_rounds_up() {
        // 12h ahead rounds to 1, 36h to 2.
        assert_eq!(days_until(Some(at(2025, 6, 16, 0)), now()), Some(1));
        assert_eq!(days_until(Some(at(2025, 6, 17, 0)), now()), Some(2));
    }

    #[test]
    fn days_until_just_past_is_zero() {
        assert_eq!(days_until(Some(at(2025, 6, 15, 11)), now()), Some(0));
        assert_eq!(days_until(Some(at(2025, 6, 13, 12)), now()), Some(-2));
        assert_eq!(days_until(None, now()), None);
    }

    #[test]
    fn days_until_exact_day_boundary_is_not_rounded() {
        assert_eq!(days_until(Some(at(2025, 6, 22, 12)), now()), Some(7));
    }

    // ── is_final ────────────────────────────────────────────────────

    #[test]
    fn final_means_sequence_equals_max() {
        assert!(is_final(Some(3), Some(3)));
        assert!(!is_final(Some(2), Some(3)));
        assert!(!is_final(None, Some(3)));
        assert!(!is_final(Some(3), None));
        assert!(!is_final(None, None));
    }

    // ── display_status ──────────────────────────────────────────────

    #[test]
    fn live_when_now_is_inside_the_window() {
        let mut i = inst();
        i.start_time = Some(at(2025, 6, 1, 0));
        i.end_time = Some(at(2025, 6, 30, 0));
        i.status_name = Some("Active".into());
        assert_eq!(display_status(&i, now()), DisplayStatus::Live);
        assert_eq!(display_status(&i, now()).to_string(), "LIVE");

        // Boundaries are inclusive.
        assert_eq!(display_status(&i, at(2025, 6, 1, 0)), DisplayStatus::Live);
        assert_eq!(display_status(&i, at(2025, 6, 30, 0)), DisplayStatus::Live);
    }

    #[test]
    fn backend_status_outside_the_window() {
        let mut i = inst();
        i.start_time = Some(at(2025, 1, 1, 0));
        i.end_time = Some(at(2025, 1, 31, 0));
        i.status_name = Some("Depleted".into());
        assert_eq!(
            display_status(&i, now()),
            DisplayStatus::Reported("Depleted".into())
        );

        i.status_name = None;
        assert_eq!(display_status(&i, now()), DisplayStatus::Unknown);
        assert_eq!(display_status(&i, now()).to_string(), "-");
    }

    #[test]
    fn missing_window_falls_back_to_backend_status() {
        let mut i = inst();
        i.status_name = Some("Queued".into());
        assert_eq!(
            display_status(&i, now()),
            DisplayStatus::Reported("Queued".into())
        );
    }

    // ── row_tier ────────────────────────────────────────────────────

    #[test]
    fn depleted_outranks_everything() {
        let mut i = inst();
        i.data_used_mb = Some(1100.0);
        i.data_allowance_mb = Some(1000.0);
        // A long runway does not save a depleted instance.
        i.end_time = Some(at(2025, 12, 1, 0));
        assert_eq!(row_tier(&i, now()), RowTier::Critical);
    }

    #[test]
    fn final_instance_expiring_within_a_week_is_critical() {
        let mut i = inst();
        i.sequence = Some(3);
        i.sequence_max = Some(3);
        i.end_time = Some(at(2025, 6, 18, 0));
        assert_eq!(row_tier(&i, now()), RowTier::Critical);

        // Same runway mid-sequence is only a warning.
        i.sequence = Some(1);
        assert_eq!(row_tier(&i, now()), RowTier::Warning);
    }

    #[test]
    fn expiring_within_two_weeks_is_a_warning() {
        let mut i = inst();
        i.end_time = Some(at(2025, 6, 27, 0));
        assert_eq!(row_tier(&i, now()), RowTier::Warning);

        i.end_time = Some(at(2025, 7, 20, 0));
        assert_eq!(row_tier(&i, now()), RowTier::Normal);
    }

    #[test]
    fn high_consumption_is_a_warning() {
        let mut i = inst();
        i.data_used_mb = Some(880.0);
        i.data_allowance_mb = Some(1000.0);
        assert_eq!(row_tier(&i, now()), RowTier::Warning);

        i.data_used_mb = Some(850.0); // exactly 85 is not "over"
        assert_eq!(row_tier(&i, now()), RowTier::Normal);
    }

    #[test]
    fn already_expired_rows_are_normal() {
        // Negative days fall outside both windows; the backend status
        // tells that story, not the tier.
        let mut i = inst();
        i.end_time = Some(at(2025, 6, 1, 0));
        assert_eq!(row_tier(&i, now()), RowTier::Normal);
    }

    // ── health buckets ──────────────────────────────────────────────

    #[test]
    fn buckets_follow_thresholds() {
        assert_eq!(health_bucket(Some("Active"), 120.0), HealthBucket::Depleted);
        assert_eq!(health_bucket(Some("Active"), 95.0), HealthBucket::Critical);
        assert_eq!(health_bucket(Some("Active"), 90.0), HealthBucket::Critical);
        assert_eq!(health_bucket(Some("Active"), 80.0), HealthBucket::Moderate);
        assert_eq!(health_bucket(Some("Active"), 75.0), HealthBucket::Moderate);
        assert_eq!(health_bucket(Some("Active"), 10.0), HealthBucket::Healthy);
        assert_eq!(health_bucket(None, 0.0), HealthBucket::Healthy);
    }

    #[test]
    fn depleted_status_overrides_consumption() {
        assert_eq!(health_bucket(Some("Depleted"), 95.0), HealthBucket::Depleted);
        assert_eq!(health_bucket(Some("depleted"), 0.0), HealthBucket::Depleted);
        // Terminated still outranks a depleted percentage.
        assert_eq!(
            health_bucket(Some("Terminated"), 100.0),
            HealthBucket::Terminated
        );
    }

    #[test]
    fn terminated_status_overrides_consumption() {
        assert_eq!(
            health_bucket(Some("Terminated"), 120.0),
            HealthBucket::Terminated
        );
        assert_eq!(
            health_bucket(Some("terminated"), 0.0),
            HealthBucket::Terminated
        );
    }

    #[test]
    fn tally_counts_every_instance_once() {
        let mk = |used: f64, allowance: f64| {
            let mut i = inst();
            i.data_used_mb = Some(used);
            i.data_allowance_mb = Some(allowance);
            i
        };
        let instances = vec![mk(10.0, 100.0), mk(80.0, 100.0), mk(95.0, 100.0), mk(150.0, 100.0)];
        let summary = HealthSummary::tally(&instances);

        assert_eq!(
            summary,
            HealthSummary {
                healthy: 1,
                moderate: 1,
                critical: 1,
                depleted: 1,
                terminated: 0,
            }
        );
        assert_eq!(summary.total(), 4);
    }
}

// ── Alert aggregation ──
//
// Derives the overview alerts panel from bundle-instance listings.
// Each active instance yields at most one alert; the chain below is
// mutually exclusive by construction. Stalled-sequence detection runs
// over recently expired instances and is a heuristic: it only sees the
// pages it was given, so it can miss, but what it reports is real.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::classify::{days_until, is_final, percent_used};
use crate::format::{format_date, format_mb, truncate_iccid};
use crate::model::BundleInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub severity: Severity,
    pub title: &'static str,
    pub message: String,
    pub details: String,
}

/// Lifecycle alert for one active instance, if any applies.
///
/// First match wins: depleted, final instance ending within 7 days,
/// over 90% consumed, ending within 14 days.
pub fn instance_alert(inst: &BundleInstance, now: DateTime<Utc>) -> Option<Alert> {
    let pct = percent_used(inst.data_used_mb, inst.data_allowance_mb);
    let days = days_until(inst.end_time, now);
    let final_instance = is_final(inst.sequence, inst.sequence_max);
    let iccid = truncate_iccid(&inst.iccid);

    if pct >= 100.0 {
        return Some(Alert {
            severity: Severity::Critical,
            title: "Bundle Depleted",
            message: format!(
                "ICCID {iccid} -- {} has exhausted its data allowance",
                inst.bundle_label()
            ),
            details: format!(
                "{} used of {}",
                format_mb(inst.data_used_mb),
                format_mb(inst.data_allowance_mb)
            ),
        });
    }

    if final_instance {
        if let Some(d) = days.filter(|d| (0..7).contains(d)) {
            return Some(Alert {
                severity: Severity::Critical,
                title: "Final Bundle Expiring",
                message: format!(
                    "ICCID {iccid} -- final bundle instance expires in {d} days"
                ),
                details: format!(
                    "{} · Sequence {}/{}",
                    inst.bundle_label(),
                    inst.sequence.unwrap_or(0),
                    inst.sequence_max.unwrap_or(0)
                ),
            });
        }
    }

    if pct > 90.0 {
        return Some(Alert {
            severity: Severity::Warning,
            title: "Data Nearly Depleted",
            message: format!("ICCID {iccid} -- {pct:.0}% of data consumed"),
            details: format!(
                "{} of {} · {}",
                format_mb(inst.data_used_mb),
                format_mb(inst.data_allowance_mb),
                inst.bundle_label()
            ),
        });
    }

    if let Some(d) = days.filter(|d| (0..14).contains(d)) {
        return Some(Alert {
            severity: Severity::Warning,
            title: "Bundle Expiring Soon",
            message: format!("ICCID {iccid} -- expires in {d} days"),
            details: format!(
                "{} · Ends {}",
                inst.bundle_label(),
                format_date(inst.end_time)
            ),
        });
    }

    None
}

/// Mid-sequence instances that expired without the next instance
/// activating.
///
/// An expired instance with `sequence < sequence_max` should have been
/// superseded; if its ICCID has no active instance at all, the renewal
/// chain has stalled. Deduplicated by ICCID plus bundle, first seen
/// wins, so repeated history rows do not multiply alerts.
pub fn stalled_sequence_alerts(
    expired: &[BundleInstance],
    active_iccids: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut alerts = Vec::new();

    for inst in expired {
        let (Some(sequence), Some(sequence_max)) = (inst.sequence, inst.sequence_max) else {
            continue;
        };
        if sequence >= sequence_max {
            continue;
        }
        let Some(end) = inst.end_time else { continue };
        if end > now {
            continue;
        }
        if active_iccids.contains(&inst.iccid) {
            continue;
        }

        let key = (
            inst.iccid.clone(),
            inst.bundle_moniker
                .clone()
                .or_else(|| inst.bundle_name.clone())
                .unwrap_or_default(),
        );
        if !seen.insert(key) {
            continue;
        }

        let days_since_expiry = (now - end).num_days();
        alerts.push(Alert {
            severity: Severity::Critical,
            title: "Stalled Sequence",
            message: format!(
                "ICCID {} -- Sequence {sequence}/{sequence_max} expired {days_since_expiry}d ago, next instance not activated",
                truncate_iccid(&inst.iccid)
            ),
            details: format!("{} · Ended {}", inst.bundle_label(), format_date(Some(end))),
        });
    }

    alerts
}

/// Aggregate the full alerts panel: per-instance alerts in input order,
/// then stalled sequences, critical alerts sorted to the front. The
/// sort is stable, so equal-severity alerts keep their listing order.
pub fn collect_alerts(
    active: &[BundleInstance],
    expired: &[BundleInstance],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let active_iccids: HashSet<String> = active.iter().map(|i| i.iccid.clone()).collect();

    let mut alerts: Vec<Alert> = active
        .iter()
        .filter_map(|inst| instance_alert(inst, now))
        .collect();
    alerts.extend(stalled_sequence_alerts(expired, &active_iccids, now));

    alerts.sort_by_key(|a| match a.severity {
        Severity::Critical => 0_u8,
        Severity::Warning | Severity::Info => 1,
    });
    alerts
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

    fn at(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, m, d, 0, 0, 0).unwrap()
    }

    fn inst(iccid: &str) -> BundleInstance {
        BundleInstance {
            iccid: iccid.into(),
            bundle_name: Some("EU 5GB".into()),
            bundle_moniker: Some("eu-5gb".into()),
            ..BundleInstance::default()
        }
    }

    #[test]
    fn depleted_wins_over_expiring() {
        let mut i = inst("8944100000000000001");
        i.data_used_mb = Some(5200.0);
        i.data_allowance_mb = Some(5120.0);
        i.sequence = Some(3);
        i.sequence_max = Some(3);
        i.end_time = Some(at(6, 17));

        let alert = instance_alert(&i, now()).expect("alert");
        assert_eq!(alert.title, "Bundle Depleted");
        assert_eq!(alert.severity, Severity::Critical);
        assert!(alert.message.contains("8944...0001"));
    }

    #[test]
    fn final_expiry_beats_consumption_warning() {
        let mut i = inst("8944100000000000002");
        i.data_used_mb = Some(4700.0); // 91.8%
        i.data_allowance_mb = Some(5120.0);
        i.sequence = Some(2);
        i.sequence_max = Some(2);
        i.end_time = Some(at(6, 18));

        let alert = instance_alert(&i, now()).expect("alert");
        assert_eq!(alert.title, "Final Bundle Expiring");
        assert_eq!(alert.details, "EU 5GB · Sequence 2/2");
    }

    #[test]
    fn at_most_one_alert_per_instance() {
        let mut i = inst("8944100000000000003");
        i.data_used_mb = Some(4700.0);
        i.data_allowance_mb = Some(5120.0);
        i.end_time = Some(at(6, 20));

        // Qualifies as both nearly-depleted and expiring-soon; only the
        // first fires.
        let alert = instance_alert(&i, now()).expect("alert");
        assert_eq!(alert.title, "Data Nearly Depleted");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn healthy_instance_raises_nothing() {
        let mut i = inst("8944100000000000004");
        i.data_used_mb = Some(100.0);
        i.data_allowance_mb = Some(5120.0);
        i.end_time = Some(at(9, 1));
        assert!(instance_alert(&i, now()).is_none());
    }

    #[test]
    fn expired_instance_is_not_expiring_soon() {
        let mut i = inst("8944100000000000005");
        i.end_time = Some(at(6, 10));
        assert!(instance_alert(&i, now()).is_none());
    }

    #[test]
    fn stalled_sequence_is_detected_and_deduplicated() {
        let mut first = inst("8944100000000000006");
        first.sequence = Some(1);
        first.sequence_max = Some(3);
        first.end_time = Some(at(6, 10));

        // Same ICCID and bundle, older period.
        let mut earlier = first.clone();
        earlier.end_time = Some(at(5, 10));

        let alerts = stalled_sequence_alerts(
            &[first.clone(), earlier],
            &HashSet::new(),
            now(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Stalled Sequence");
        assert!(alerts[0].message.contains("Sequence 1/3"));
        assert!(alerts[0].message.contains("expired 5d ago"));
    }

    #[test]
    fn active_iccid_suppresses_stalled_alert() {
        let mut i = inst("8944100000000000007");
        i.sequence = Some(1);
        i.sequence_max = Some(3);
        i.end_time = Some(at(6, 10));

        let active: HashSet<String> = ["8944100000000000007".to_owned()].into();
        assert!(stalled_sequence_alerts(&[i], &active, now()).is_empty());
    }

    #[test]
    fn final_expired_instance_is_not_stalled() {
        let mut i = inst("8944100000000000008");
        i.sequence = Some(3);
        i.sequence_max = Some(3);
        i.end_time = Some(at(6, 10));
        assert!(stalled_sequence_alerts(&[i], &HashSet::new(), now()).is_empty());
    }

    #[test]
    fn collect_sorts_critical_first_and_is_stable() {
        let mut warn_a = inst("8944100000000000010");
        warn_a.end_time = Some(at(6, 20));

        let mut warn_b = inst("8944100000000000011");
        warn_b.end_time = Some(at(6, 22));

        let mut crit = inst("8944100000000000012");
        crit.data_used_mb = Some(6000.0);
        crit.data_allowance_mb = Some(5120.0);

        let alerts = collect_alerts(&[warn_a, warn_b, crit], &[], now());
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].severity, Severity::Critical);
        // Warnings keep input order.
        assert!(alerts[1].message.contains("8944...0010"));
        assert!(alerts[2].message.contains("8944...0011"));
    }
}

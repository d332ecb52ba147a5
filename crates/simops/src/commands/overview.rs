//! Dashboard overview: KPI counts, bundle health tally, alerts panel.

use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;

use simops_api::ApiClient;
use simops_api::types::{InstanceQuery, UsageGroupBy};
use simops_core::format::{days_ago, days_from_now, format_bytes, format_number, today};
use simops_core::{Alert, BundleInstance, HealthSummary, Severity, collect_alerts, is_final};

use crate::cli::{GlobalOpts, OutputFormat, OverviewArgs};
use crate::error::CliError;
use crate::output;

const ALERT_DISPLAY_CAP: usize = 10;

#[derive(Serialize)]
struct OverviewReport {
    total_bytes: f64,
    active_bundles: u64,
    active_endpoints: u64,
    final_instances_expiring: usize,
    health: HealthReport,
    alerts: Vec<AlertReport>,
}

#[derive(Serialize)]
struct HealthReport {
    healthy: usize,
    moderate: usize,
    critical: usize,
    depleted: usize,
    terminated: usize,
}

#[derive(Serialize)]
struct AlertReport {
    severity: &'static str,
    title: &'static str,
    message: String,
    details: String,
}

impl From<&Alert> for AlertReport {
    fn from(a: &Alert) -> Self {
        Self {
            severity: match a.severity {
                Severity::Critical => "critical",
                Severity::Warning => "warning",
                Severity::Info => "info",
            },
            title: a.title,
            message: a.message.clone(),
            details: a.details.clone(),
        }
    }
}

pub async fn handle(
    client: &ApiClient,
    args: OverviewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let now = Utc::now();
    let from = days_ago(args.days, now);
    let to = today(now);

    let expiring_query = InstanceQuery {
        status: Some("Active".into()),
        expiring_before: Some(days_from_now(30, now)),
        per_page: Some(1000),
        ..InstanceQuery::default()
    };
    let active_query = InstanceQuery {
        status: Some("Active".into()),
        per_page: Some(500),
        ..InstanceQuery::default()
    };
    let expired_query = InstanceQuery {
        expiring_before: Some(today(now)),
        per_page: Some(500),
        ..InstanceQuery::default()
    };

    let (usage, bundles, endpoints, expiring, active, expired) = tokio::try_join!(
        client.usage_summary(UsageGroupBy::Daily, Some(&from), Some(&to)),
        client.bundles(Some("Active"), None, Some(1)),
        client.endpoints(None, None, Some(1)),
        client.bundle_instances(&expiring_query, false),
        client.bundle_instances(&active_query, false),
        client.bundle_instances(&expired_query, false),
    )?;

    let final_expiring = expiring
        .data
        .iter()
        .filter(|r| is_final(r.sequence, r.sequence_max))
        .count();

    let active: Vec<BundleInstance> = active.data.into_iter().map(Into::into).collect();
    let expired: Vec<BundleInstance> = expired.data.into_iter().map(Into::into).collect();

    let health = HealthSummary::tally(&active);
    let alerts = collect_alerts(&active, &expired, now);

    let report = OverviewReport {
        total_bytes: usage.summary.total_bytes.unwrap_or(0.0),
        active_bundles: bundles.pagination.total,
        active_endpoints: endpoints.pagination.total,
        final_instances_expiring: final_expiring,
        health: HealthReport {
            healthy: health.healthy,
            moderate: health.moderate,
            critical: health.critical,
            depleted: health.depleted,
            terminated: health.terminated,
        },
        alerts: alerts.iter().map(AlertReport::from).collect(),
    };

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            render_text(&report, args.days, output::should_color(&global.color))
        }
        OutputFormat::Json => output::render_json_pretty(&report),
        OutputFormat::JsonCompact => output::render_json_compact(&report),
        OutputFormat::Yaml => output::render_yaml(&report),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_text(report: &OverviewReport, days: i64, color: bool) -> String {
    let mut lines = vec![
        format!(
            "Data usage (last {days} days):  {}",
            format_bytes(Some(report.total_bytes))
        ),
        format!(
            "Active bundles:               {}",
            format_number(report.active_bundles)
        ),
        format!(
            "Active endpoints:             {}",
            format_number(report.active_endpoints)
        ),
        format!(
            "Final instances expiring:     {}",
            report.final_instances_expiring
        ),
        String::new(),
        format!(
            "Bundle health:  {} healthy · {} moderate · {} critical · {} depleted · {} terminated",
            report.health.healthy,
            report.health.moderate,
            report.health.critical,
            report.health.depleted,
            report.health.terminated
        ),
    ];

    if report.alerts.is_empty() {
        lines.push(String::new());
        lines.push("No alerts".to_owned());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(format!("Alerts ({}):", report.alerts.len()));
    for alert in report.alerts.iter().take(ALERT_DISPLAY_CAP) {
        let tag = if color {
            match alert.severity {
                "critical" => alert.severity.red().to_string(),
                "warning" => alert.severity.yellow().to_string(),
                _ => alert.severity.to_owned(),
            }
        } else {
            alert.severity.to_owned()
        };
        lines.push(format!("  [{tag}] {}: {}", alert.title, alert.message));
        lines.push(format!("             {}", alert.details));
    }
    if report.alerts.len() > ALERT_DISPLAY_CAP {
        lines.push(format!(
            "  + {} more alerts",
            report.alerts.len() - ALERT_DISPLAY_CAP
        ));
    }
    lines.join("\n")
}

//! Usage aggregates over a date range.

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;

use simops_api::ApiClient;
use simops_api::types::{UsageGroupBy, UsagePoint};
use simops_core::format::{days_ago, format_bytes, today};

use crate::cli::{GlobalOpts, GroupBy, UsageArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct PointReport {
    date: String,
    total_bytes: f64,
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

impl From<&UsagePoint> for PointReport {
    fn from(p: &UsagePoint) -> Self {
        Self {
            date: p.date.clone().unwrap_or_default(),
            // Billed volume wins over the raw counter when present.
            total_bytes: p.total_charged.or(p.total_bytes).unwrap_or(0.0),
        }
    }
}

pub async fn handle(
    client: &ApiClient,
    args: UsageArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let now = Utc::now();
    let from = args.from.unwrap_or_else(|| days_ago(args.days, now));
    let to = args.to.unwrap_or_else(|| today(now));
    let group_by = match args.group_by {
        GroupBy::Daily => UsageGroupBy::Daily,
        GroupBy::Monthly => UsageGroupBy::Monthly,
        GroupBy::Annual => UsageGroupBy::Annual,
    };

    let summary = client
        .usage_summary(group_by, Some(&from), Some(&to))
        .await?;

    let points: Vec<PointReport> = summary.data.iter().map(PointReport::from).collect();
    let out = output::render_list(
        &global.output,
        &points,
        |p| PointRow {
            date: p.date.clone(),
            usage: format_bytes(Some(p.total_bytes)),
        },
        |p| p.date.clone(),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) {
        output::print_output(
            &format!(
                "Total {from}..{to}: {}",
                format_bytes(summary.summary.total_bytes)
            ),
            global.quiet,
        );
    }
    Ok(())
}

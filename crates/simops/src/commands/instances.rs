//! Bundle instance listing.

use chrono::Utc;
use owo_colors::OwoColorize;
use tabled::Tabled;

use simops_api::ApiClient;
use simops_api::types::InstanceQuery;
use simops_core::format::{format_date, format_mb, format_number, truncate_iccid};
use simops_core::{BundleInstance, RowTier, days_until, display_status, percent_used, row_tier};

use crate::cli::{GlobalOpts, InstancesArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "ICCID")]
    iccid: String,
    #[tabled(rename = "Bundle")]
    bundle: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Seq")]
    seq: String,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn to_row(inst: &BundleInstance, color: bool) -> InstanceRow {
    let now = Utc::now();
    let pct = percent_used(inst.data_used_mb, inst.data_allowance_mb);
    let tier = row_tier(inst, now);

    let status = display_status(inst, now).to_string();
    let status = if color {
        match tier {
            RowTier::Critical => status.red().to_string(),
            RowTier::Warning => status.yellow().to_string(),
            RowTier::Normal => status,
        }
    } else {
        status
    };

    InstanceRow {
        iccid: truncate_iccid(&inst.iccid),
        bundle: inst.bundle_label().to_owned(),
        customer: inst.customer_name.clone().unwrap_or_else(|| "-".into()),
        seq: match (inst.sequence, inst.sequence_max) {
            (Some(s), Some(m)) => format!("{s}/{m}"),
            _ => "-".into(),
        },
        data: format!(
            "{} / {}",
            format_mb(inst.data_used_mb),
            format_mb(inst.data_allowance_mb)
        ),
        used: format!("{pct:.0}%"),
        ends: format_date(inst.end_time),
        days: days_until(inst.end_time, now).map_or_else(|| "-".into(), |d| d.to_string()),
        status,
    }
}

pub async fn handle(
    client: &ApiClient,
    args: InstancesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = InstanceQuery {
        status: args.status,
        iccid: args.iccid,
        expiring_before: args.expiring_before,
        final_only: args.final_only,
        page: Some(args.page),
        per_page: Some(args.per_page),
    };
    // The table must reflect the latest state on every invocation.
    let page = client.bundle_instances(&query, true).await?;
    let pagination = page.pagination;
    let instances: Vec<BundleInstance> = page.data.into_iter().map(Into::into).collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &instances,
        |inst| to_row(inst, color),
        |inst| inst.iccid.clone(),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) {
        output::print_output(
            &format!(
                "Page {}/{} · {} instances",
                pagination.page.max(1),
                pagination.total_pages.max(1),
                format_number(pagination.total)
            ),
            global.quiet,
        );
    }
    Ok(())
}

//! Endpoint listing with health and anomaly flags.

use chrono::Utc;
use owo_colors::OwoColorize;
use tabled::Tabled;

use simops_api::ApiClient;
use simops_core::format::{format_bytes, format_number, time_ago};
use simops_core::{Endpoint, EndpointHealth, endpoint_anomalies, endpoint_health};

use crate::cli::{EndpointsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "")]
    health: String,
    #[tabled(rename = "Endpoint")]
    name: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "24h")]
    day: String,
    #[tabled(rename = "7d")]
    week: String,
    #[tabled(rename = "28d")]
    month: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

fn health_dot(health: EndpointHealth, color: bool) -> String {
    if !color {
        return match health {
            EndpointHealth::Green => "G",
            EndpointHealth::Amber => "A",
            EndpointHealth::Red => "R",
        }
        .to_owned();
    }
    match health {
        EndpointHealth::Green => "●".green().to_string(),
        EndpointHealth::Amber => "●".yellow().to_string(),
        EndpointHealth::Red => "●".red().to_string(),
    }
}

fn to_row(ep: &Endpoint, color: bool) -> EndpointRow {
    let now = Utc::now();
    let flags: Vec<&str> = endpoint_anomalies(ep)
        .into_iter()
        .map(simops_core::Anomaly::label)
        .collect();

    EndpointRow {
        health: health_dot(endpoint_health(ep, now), color),
        name: ep.label().to_owned(),
        customer: ep.customer_name.clone().unwrap_or_else(|| "-".into()),
        status: ep.status_name.clone().unwrap_or_else(|| "-".into()),
        day: format_bytes(Some(ep.usage_rolling_24h)),
        week: format_bytes(Some(ep.usage_rolling_7d)),
        month: format_bytes(Some(ep.usage_rolling_28d)),
        last_seen: time_ago(ep.latest_activity, now),
        flags: flags.join(", "),
    }
}

pub async fn handle(
    client: &ApiClient,
    args: EndpointsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let page = client
        .endpoints(args.status.as_deref(), Some(args.page), Some(args.per_page))
        .await?;
    let pagination = page.pagination;
    let endpoints: Vec<Endpoint> = page.data.into_iter().map(Into::into).collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &endpoints,
        |ep| to_row(ep, color),
        |ep| ep.identifier.clone(),
    );
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) {
        output::print_output(
            &format!(
                "Page {}/{} · {} endpoints",
                pagination.page.max(1),
                pagination.total_pages.max(1),
                format_number(pagination.total)
            ),
            global.quiet,
        );
    }
    Ok(())
}

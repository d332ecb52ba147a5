//! Dataset export: request the file and save it to disk.

use std::fs;
use std::path::PathBuf;

use simops_api::ApiClient;
use simops_api::types::ExportRequest;

use crate::cli::{ExportArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &ApiClient,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let request = ExportRequest {
        dataset: args.dataset.clone(),
        format: args.format.clone(),
        from: args.from,
        to: args.to,
    };
    let download = client.export(&request).await?;

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(
            download
                .filename
                .clone()
                .unwrap_or_else(|| format!("{}.{}", args.dataset, args.format)),
        )
    });
    fs::write(&path, &download.bytes)?;

    output::print_output(
        &format!("Saved {} bytes to {}", download.bytes.len(), path.display()),
        global.quiet,
    );
    Ok(())
}

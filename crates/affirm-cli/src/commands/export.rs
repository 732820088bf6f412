use std::path::Path;

use affirm_core::export::{render_json_export, render_markdown_export};

use crate::cli::ExportFormat;
use crate::commands::common::open_service;
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let affirmations = service.list_all_affirmations()?;
    service.close()?;

    let rendered = match format {
        ExportFormat::Json => render_json_export(&affirmations)?,
        ExportFormat::Markdown => render_markdown_export(&affirmations),
    };

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

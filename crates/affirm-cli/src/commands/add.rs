use std::path::Path;

use crate::commands::common::{open_service, resolve_affirmation_text};
use crate::error::CliError;

pub fn run_add(text_parts: &[String], db_path: &Path) -> Result<(), CliError> {
    let text = resolve_affirmation_text(text_parts)?;

    let service = open_service(db_path)?;
    let affirmation = service.create_affirmation(&text)?;
    service.close()?;

    println!("{}", affirmation.id);
    Ok(())
}

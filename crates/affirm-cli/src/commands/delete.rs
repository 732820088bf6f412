use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let affirmation = service.resolve_affirmation(id)?;

    service.delete_affirmation(&affirmation.id)?;
    service.close()?;

    println!("{}", affirmation.id);
    Ok(())
}

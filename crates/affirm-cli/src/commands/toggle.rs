use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

/// Enable or disable an affirmation for random selection
pub fn run_set_active(id: &str, is_active: bool, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let affirmation = service.resolve_affirmation(id)?;

    if affirmation.is_active != is_active {
        service.set_affirmation_active(&affirmation.id, is_active)?;
    }

    let remaining = service.count_active()?;
    service.close()?;

    if remaining == 0 {
        tracing::warn!("No active affirmations left; `affirm show` will have nothing to display");
    }

    println!("{}", affirmation.id);
    Ok(())
}

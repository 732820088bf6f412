use std::path::Path;

use crate::commands::common::{capture_editor_input_with_initial, normalize_text, open_service};
use crate::error::CliError;

pub fn run_edit(id: &str, new_text: Option<&str>, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let affirmation = service.resolve_affirmation(id)?;

    let edited_text = match new_text {
        Some(text) => normalize_text(text),
        None => capture_editor_input_with_initial(&affirmation.text)?,
    };
    let Some(edited_text) = edited_text else {
        return Err(CliError::EmptyEditedText);
    };

    if edited_text != affirmation.text {
        service.update_affirmation(&affirmation.id, &edited_text)?;
    }
    service.close()?;

    println!("{}", affirmation.id);
    Ok(())
}

use std::path::Path;

use crate::commands::common::{
    affirmation_to_list_item, format_affirmation_lines, open_service, AffirmationListItem,
};
use crate::error::CliError;

pub fn run_list(
    limit: usize,
    include_inactive: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let affirmations = service.list_affirmations(limit, 0, include_inactive)?;
    service.close()?;

    if as_json {
        let json_items = affirmations
            .iter()
            .map(affirmation_to_list_item)
            .collect::<Vec<AffirmationListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_affirmation_lines(&affirmations) {
            println!("{line}");
        }
    }

    Ok(())
}

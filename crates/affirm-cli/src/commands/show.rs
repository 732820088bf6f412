use affirm_core::services::{AffirmationService, WidgetUpdate};
use affirm_core::util::unix_millis_now;
use affirm_core::widget::{SharedStore, WidgetBridge};
use affirm_core::{Affirmation, RandomSelector, RandomSource};

use crate::commands::common::{affirmation_to_list_item, open_service, open_widget_bridge};
use crate::config::AppPaths;
use crate::error::CliError;

pub const EMPTY_STATE_MESSAGE: &str =
    "No affirmations yet. Add one with: affirm add \"I am ready for today\"";

/// One home-screen refresh: select, remember, and optionally push to the widget
pub fn show_next<R: RandomSource, S: SharedStore>(
    service: &AffirmationService,
    selector: &mut RandomSelector<R>,
    bridge: Option<&mut WidgetBridge<S>>,
    now_ms: i64,
) -> Result<Option<Affirmation>, CliError> {
    let selected = service.next_affirmation(selector)?;

    if let Some(bridge) = bridge {
        match service.sync_widget(bridge, selected.as_ref(), now_ms)? {
            WidgetUpdate::Published(generation) => {
                tracing::debug!("Widget updated (generation {generation})");
            }
            WidgetUpdate::Cleared(generation) => {
                tracing::debug!("Widget cleared (generation {generation})");
            }
        }
    }

    Ok(selected)
}

pub fn run_show(as_json: bool, update_widget: bool, paths: &AppPaths) -> Result<(), CliError> {
    let service = open_service(&paths.db_path)?;
    let mut selector = RandomSelector::from_entropy();
    let now_ms = unix_millis_now();

    let mut bridge = if update_widget {
        Some(open_widget_bridge(&paths.widget_path)?)
    } else {
        None
    };

    let selected = show_next(&service, &mut selector, bridge.as_mut(), now_ms)?;
    service.close()?;

    match (selected, as_json) {
        (Some(affirmation), true) => {
            let item = affirmation_to_list_item(&affirmation);
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        (None, true) => println!("null"),
        (Some(affirmation), false) => println!("{}", affirmation.text),
        (None, false) => println!("{EMPTY_STATE_MESSAGE}"),
    }

    Ok(())
}

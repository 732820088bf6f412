use affirm_core::services::AffirmationService;
use affirm_core::util::unix_millis_now;
use affirm_core::widget::{SharedStore, WidgetBridge, WidgetSnapshot};
use affirm_core::{RandomSelector, RandomSource};

use crate::commands::common::{format_timestamp, open_service, open_widget_bridge};
use crate::commands::show::show_next;
use crate::config::AppPaths;
use crate::error::CliError;

/// Outcome of a widget timeline tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new affirmation was published (or the widget emptied)
    Refreshed(Option<WidgetSnapshot>),
    /// The current affirmation is still within its refresh interval
    NotDue { next_refresh_at: i64 },
    /// The widget is turned off in settings; nothing was selected
    Hidden,
}

/// Replace the widget's affirmation when its refresh time has passed
pub fn refresh_widget<R: RandomSource, S: SharedStore>(
    service: &AffirmationService,
    selector: &mut RandomSelector<R>,
    bridge: &mut WidgetBridge<S>,
    force: bool,
    now_ms: i64,
) -> Result<RefreshOutcome, CliError> {
    // The last-shown id only moves for affirmations someone can see
    if !service.load_settings()?.show_on_widget {
        if bridge.current()?.is_some() {
            bridge.clear()?;
        }
        return Ok(RefreshOutcome::Hidden);
    }

    if !force && !bridge.is_refresh_due(now_ms)? {
        let next_refresh_at = bridge
            .current()?
            .map_or(now_ms, |snapshot| snapshot.next_refresh_at);
        return Ok(RefreshOutcome::NotDue { next_refresh_at });
    }

    show_next(service, selector, Some(&mut *bridge), now_ms)?;
    Ok(RefreshOutcome::Refreshed(bridge.current()?))
}

pub fn format_snapshot_lines(snapshot: &WidgetSnapshot) -> Vec<String> {
    vec![
        snapshot.text.clone(),
        String::new(),
        format!("id:           {}", snapshot.affirmation_id),
        format!("theme:        {}", snapshot.theme),
        format!("font size:    {}", snapshot.font_size),
        format!("contrast:     {}", if snapshot.high_contrast { "high" } else { "normal" }),
        format!("updated:      {}", format_timestamp(snapshot.updated_at)),
        format!("next refresh: {}", format_timestamp(snapshot.next_refresh_at)),
    ]
}

pub fn run_widget_show(as_json: bool, paths: &AppPaths) -> Result<(), CliError> {
    let bridge = open_widget_bridge(&paths.widget_path)?;
    let snapshot = bridge.current()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    match snapshot {
        Some(snapshot) => {
            for line in format_snapshot_lines(&snapshot) {
                println!("{line}");
            }
        }
        None => println!("Widget is empty"),
    }
    Ok(())
}

pub fn run_widget_refresh(force: bool, paths: &AppPaths) -> Result<(), CliError> {
    let service = open_service(&paths.db_path)?;
    let mut bridge = open_widget_bridge(&paths.widget_path)?;
    let mut selector = RandomSelector::from_entropy();

    let outcome = refresh_widget(
        &service,
        &mut selector,
        &mut bridge,
        force,
        unix_millis_now(),
    )?;
    service.close()?;

    match outcome {
        RefreshOutcome::Refreshed(Some(snapshot)) => println!("{}", snapshot.text),
        RefreshOutcome::Refreshed(None) => println!("Widget is empty"),
        RefreshOutcome::Hidden => println!("Widget is turned off in settings"),
        RefreshOutcome::NotDue { next_refresh_at } => println!(
            "Widget is up to date until {}",
            format_timestamp(next_refresh_at)
        ),
    }
    Ok(())
}

pub fn run_widget_clear(paths: &AppPaths) -> Result<(), CliError> {
    let mut bridge = open_widget_bridge(&paths.widget_path)?;
    let generation = bridge.clear()?;
    tracing::info!("Widget cleared (generation {generation})");
    Ok(())
}

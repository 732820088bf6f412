use affirm_core::models::{RefreshInterval, Settings, ThemeMode};
use affirm_core::widget::{SharedStore, WidgetBridge};

use crate::commands::common::{open_service, open_widget_bridge};
use crate::config::AppPaths;
use crate::error::CliError;

/// Options passed to `affirm settings set`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsChanges {
    pub theme: Option<ThemeMode>,
    pub refresh_interval: Option<RefreshInterval>,
    pub language: Option<String>,
    pub font_size: Option<u32>,
    pub high_contrast: Option<bool>,
    pub show_on_widget: Option<bool>,
}

impl SettingsChanges {
    pub const fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.refresh_interval.is_none()
            && self.language.is_none()
            && self.font_size.is_none()
            && self.high_contrast.is_none()
            && self.show_on_widget.is_none()
    }

    /// Overlay the requested changes onto `settings`
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(refresh_interval) = self.refresh_interval {
            settings.refresh_interval = refresh_interval;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
        if let Some(high_contrast) = self.high_contrast {
            settings.high_contrast = high_contrast;
        }
        if let Some(show_on_widget) = self.show_on_widget {
            settings.show_on_widget = show_on_widget;
        }
    }
}

/// Bring a published widget in line with new settings.
///
/// Hides the widget when it was turned off, otherwise re-publishes the
/// current affirmation with the new presentation. Returns the new reload
/// generation when the widget changed.
pub fn apply_settings_to_widget<S: SharedStore>(
    bridge: &mut WidgetBridge<S>,
    settings: &Settings,
) -> Result<Option<u64>, CliError> {
    let Some(snapshot) = bridge.current()? else {
        return Ok(None);
    };

    if !settings.show_on_widget {
        return Ok(Some(bridge.clear()?));
    }

    let restyled = snapshot.restyled(settings);
    if restyled == snapshot {
        return Ok(None);
    }
    Ok(Some(bridge.publish(&restyled)?))
}

pub fn format_settings_lines(settings: &Settings) -> Vec<String> {
    vec![
        format!("theme:          {}", settings.theme),
        format!(
            "refresh:        {} (every {} minutes)",
            settings.refresh_interval,
            settings.refresh_interval.minutes()
        ),
        format!("language:       {}", settings.language),
        format!("font size:      {}", settings.font_size),
        format!("high contrast:  {}", settings.high_contrast),
        format!("show on widget: {}", settings.show_on_widget),
    ]
}

pub fn run_settings_show(as_json: bool, paths: &AppPaths) -> Result<(), CliError> {
    let service = open_service(&paths.db_path)?;
    let settings = service.load_settings()?;
    service.close()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        for line in format_settings_lines(&settings) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn run_settings_set(changes: SettingsChanges, paths: &AppPaths) -> Result<(), CliError> {
    if changes.is_empty() {
        return Err(CliError::NothingToChange("settings set"));
    }

    let service = open_service(&paths.db_path)?;
    let mut settings = service.load_settings()?;
    changes.apply_to(&mut settings);
    service.save_settings(&settings)?;
    service.close()?;

    let mut bridge = open_widget_bridge(&paths.widget_path)?;
    if let Some(generation) = apply_settings_to_widget(&mut bridge, &settings)? {
        tracing::debug!("Widget updated for new settings (generation {generation})");
    }

    for line in format_settings_lines(&settings) {
        println!("{line}");
    }
    Ok(())
}

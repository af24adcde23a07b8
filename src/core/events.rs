// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::sync::Arc;

use crate::config::model::{ColorMode, FontSource};

use super::host::{Editor, EditorView};
use super::timer::Ticket;

/// Everything the event loop feeds to the tracker.
pub enum TrackerMsg {
    /// The user changed the document in `view`.
    Edit {
        editor: Arc<dyn Editor>,
        view: Arc<dyn EditorView>,
    },

    /// The debounce timer ran out.
    TimerFired(Ticket),

    /// A settings frontend changed one field.
    Setting(SettingChange),

    /// The host is going away; release everything.
    Teardown,
}

impl fmt::Debug for TrackerMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerMsg::Edit { .. } => write!(f, "Edit"),
            TrackerMsg::TimerFired(t) => write!(f, "TimerFired({t:?})"),
            TrackerMsg::Setting(c) => write!(f, "Setting({c:?})"),
            TrackerMsg::Teardown => write!(f, "Teardown"),
        }
    }
}

/// One settings mutation, as issued by any settings frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    ThresholdSeconds(f64),
    ColorMode(ColorMode),
    SingleColor(String),
    GradientStart(String),
    GradientEnd(String),
    GradientAnimate(bool),
    FontSource(FontSource),
    GoogleFont(String),
    CustomFontUrl(String),
    CustomFontFamily(String),
}

pub const SETTING_FIELDS: [&str; 10] = [
    "threshold",
    "color-mode",
    "single-color",
    "gradient-start",
    "gradient-end",
    "gradient-animate",
    "font-source",
    "google-font",
    "custom-font-url",
    "custom-font-family",
];

impl SettingChange {
    /// Build a change from a field name and its textual value.
    pub fn parse(field: &str, value: &str) -> Result<Self, String> {
        let field = field.trim().to_lowercase().replace('_', "-");

        let change = match field.as_str() {
            "threshold" => {
                let secs = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number of seconds", value.trim()))?;
                SettingChange::ThresholdSeconds(secs)
            }
            "color-mode" => SettingChange::ColorMode(value.parse()?),
            "single-color" => SettingChange::SingleColor(value.trim().to_string()),
            "gradient-start" => SettingChange::GradientStart(value.trim().to_string()),
            "gradient-end" => SettingChange::GradientEnd(value.trim().to_string()),
            "gradient-animate" => SettingChange::GradientAnimate(parse_bool(value)?),
            "font-source" => SettingChange::FontSource(value.parse()?),
            "google-font" => SettingChange::GoogleFont(value.to_string()),
            "custom-font-url" => SettingChange::CustomFontUrl(value.to_string()),
            "custom-font-family" => SettingChange::CustomFontFamily(value.to_string()),
            other => {
                return Err(format!(
                    "unknown setting '{other}' (expected one of: {})",
                    SETTING_FIELDS.join(", ")
                ));
            }
        };

        Ok(change)
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(format!("'{other}' is not on/off")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_field() {
        assert_eq!(
            SettingChange::parse("threshold", "1.5"),
            Ok(SettingChange::ThresholdSeconds(1.5))
        );
        assert_eq!(
            SettingChange::parse("color_mode", "gradient"),
            Ok(SettingChange::ColorMode(ColorMode::Gradient))
        );
        assert_eq!(
            SettingChange::parse("gradient-animate", "on"),
            Ok(SettingChange::GradientAnimate(true))
        );
        assert_eq!(
            SettingChange::parse("font-source", "custom"),
            Ok(SettingChange::FontSource(FontSource::Custom))
        );
        assert_eq!(
            SettingChange::parse("google-font", "Fira Code"),
            Ok(SettingChange::GoogleFont("Fira Code".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(SettingChange::parse("volume", "11").is_err());
        assert!(SettingChange::parse("threshold", "soon").is_err());
        assert!(SettingChange::parse("gradient-animate", "maybe").is_err());
        assert!(SettingChange::parse("color-mode", "plaid").is_err());
    }
}

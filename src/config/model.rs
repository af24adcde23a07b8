// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Shortest quiet period the tracker will ever wait, in milliseconds.
pub const MIN_INACTIVITY_MS: f64 = 250.0;
pub const DEFAULT_INACTIVITY_MS: f64 = 60_000.0;

pub const THRESHOLD_KEY: &str = "inactivityThreshold";
/// Older data files spelled the threshold key with its unit.
pub const LEGACY_THRESHOLD_KEY: &str = "inactivityThresholdMs";

pub const DEFAULT_FONT_FAMILY: &str = "Roboto Mono";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "rgb-animation")]
    RgbAnimation,
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "gradient")]
    Gradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSource {
    Default,
    Google,
    Custom,
}

/// User-facing configuration, persisted as the plugin data file.
///
/// Field names on disk are camelCase so files written by earlier releases keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Quiet period in milliseconds before the overlay appears.
    pub inactivity_threshold: f64,
    pub color_mode: ColorMode,
    pub single_color: String,
    pub gradient_start: String,
    pub gradient_end: String,
    pub gradient_animate: bool,
    pub font_source: FontSource,
    pub google_font: String,
    pub custom_font_url: String,
    pub custom_font_family: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inactivity_threshold: DEFAULT_INACTIVITY_MS,
            color_mode: ColorMode::RgbAnimation,
            single_color: "#FF0000".to_string(),
            gradient_start: "#FF0000".to_string(),
            gradient_end: "#0000FF".to_string(),
            gradient_animate: false,
            font_source: FontSource::Default,
            google_font: DEFAULT_FONT_FAMILY.to_string(),
            custom_font_url: String::new(),
            custom_font_family: String::new(),
        }
    }
}

impl Settings {
    /// Threshold the debounce timer actually uses: clamped to `MIN_INACTIVITY_MS`,
    /// and the default when the stored value is not a finite number.
    pub fn effective_threshold_ms(&self) -> u64 {
        if self.inactivity_threshold.is_finite() {
            self.inactivity_threshold.max(MIN_INACTIVITY_MS) as u64
        } else {
            DEFAULT_INACTIVITY_MS as u64
        }
    }
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::RgbAnimation => "rgb-animation",
            ColorMode::Single => "single",
            ColorMode::Gradient => "gradient",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rgb-animation" | "rgb" => Ok(ColorMode::RgbAnimation),
            "single" => Ok(ColorMode::Single),
            "gradient" => Ok(ColorMode::Gradient),
            other => Err(format!(
                "unknown color mode '{other}' (expected rgb-animation, single or gradient)"
            )),
        }
    }
}

impl FontSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSource::Default => "default",
            FontSource::Google => "google",
            FontSource::Custom => "custom",
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(FontSource::Default),
            "google" => Ok(FontSource::Google),
            "custom" => Ok(FontSource::Custom),
            other => Err(format!(
                "unknown font source '{other}' (expected default, google or custom)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_clamped_to_minimum() {
        let mut s = Settings::default();
        s.inactivity_threshold = 10.0;
        assert_eq!(s.effective_threshold_ms(), 250);

        s.inactivity_threshold = -5.0;
        assert_eq!(s.effective_threshold_ms(), 250);

        s.inactivity_threshold = 1500.0;
        assert_eq!(s.effective_threshold_ms(), 1500);
    }

    #[test]
    fn non_finite_threshold_falls_back_to_default() {
        let mut s = Settings::default();
        s.inactivity_threshold = f64::NAN;
        assert_eq!(s.effective_threshold_ms(), 60_000);

        s.inactivity_threshold = f64::INFINITY;
        assert_eq!(s.effective_threshold_ms(), 60_000);
    }

    #[test]
    fn serializes_with_plugin_field_names() {
        let v = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(v["inactivityThreshold"], 60000.0);
        assert_eq!(v["colorMode"], "rgb-animation");
        assert_eq!(v["fontSource"], "default");
        assert_eq!(v["googleFont"], "Roboto Mono");
        assert_eq!(v["gradientAnimate"], false);
    }

    #[test]
    fn modes_parse_from_cli_words() {
        assert_eq!("single".parse::<ColorMode>(), Ok(ColorMode::Single));
        assert_eq!(" Gradient ".parse::<ColorMode>(), Ok(ColorMode::Gradient));
        assert!("rainbow".parse::<ColorMode>().is_err());
        assert_eq!("google".parse::<FontSource>(), Ok(FontSource::Google));
        assert!("local".parse::<FontSource>().is_err());
    }
}

// Author: Dustin Pilgrim
// License: MIT

use crate::config::model::{ColorMode, DEFAULT_FONT_FAMILY, FontSource, Settings};

/// Color treatment of the overlay. Exactly one is active at a time and each
/// variant only carries what its mode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorScheme {
    RgbAnimation,
    SingleColor { color: String },
    StaticGradient { start: String, end: String },
    AnimatedGradient { start: String, end: String },
}

impl ColorScheme {
    /// Every class a scheme may set; cleared before a scheme is applied.
    pub const ALL_CLASSES: [&'static str; 4] = [
        "rgb-animation",
        "single-color",
        "static-gradient",
        "animated-gradient",
    ];

    pub fn class_name(&self) -> &'static str {
        match self {
            ColorScheme::RgbAnimation => "rgb-animation",
            ColorScheme::SingleColor { .. } => "single-color",
            ColorScheme::StaticGradient { .. } => "static-gradient",
            ColorScheme::AnimatedGradient { .. } => "animated-gradient",
        }
    }

    /// Custom style properties the companion stylesheet reads for this scheme.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        match self {
            ColorScheme::RgbAnimation => Vec::new(),
            ColorScheme::SingleColor { color } => vec![(PROP_CUSTOM_COLOR, color.clone())],
            ColorScheme::StaticGradient { start, end } => vec![(
                PROP_CUSTOM_GRADIENT,
                format!("linear-gradient(to right, {start}, {end})"),
            )],
            ColorScheme::AnimatedGradient { start, end } => vec![
                (PROP_GRADIENT_START, start.clone()),
                (PROP_GRADIENT_END, end.clone()),
            ],
        }
    }
}

pub const PROP_CUSTOM_COLOR: &str = "--custom-color";
pub const PROP_CUSTOM_GRADIENT: &str = "--custom-gradient";
pub const PROP_GRADIENT_START: &str = "--gradient-start";
pub const PROP_GRADIENT_END: &str = "--gradient-end";

pub const ALL_PROPERTIES: [&str; 4] = [
    PROP_CUSTOM_COLOR,
    PROP_CUSTOM_GRADIENT,
    PROP_GRADIENT_START,
    PROP_GRADIENT_END,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub scheme: ColorScheme,
    /// `None` means "leave the current font alone".
    pub font_family: Option<String>,
}

pub fn resolve(settings: &Settings) -> StyleDescriptor {
    StyleDescriptor {
        scheme: resolve_scheme(settings),
        font_family: resolve_font_family(settings),
    }
}

fn resolve_scheme(settings: &Settings) -> ColorScheme {
    match settings.color_mode {
        ColorMode::RgbAnimation => ColorScheme::RgbAnimation,
        ColorMode::Single => ColorScheme::SingleColor {
            color: settings.single_color.clone(),
        },
        ColorMode::Gradient if settings.gradient_animate => ColorScheme::AnimatedGradient {
            start: settings.gradient_start.clone(),
            end: settings.gradient_end.clone(),
        },
        ColorMode::Gradient => ColorScheme::StaticGradient {
            start: settings.gradient_start.clone(),
            end: settings.gradient_end.clone(),
        },
    }
}

fn resolve_font_family(settings: &Settings) -> Option<String> {
    let name = match settings.font_source {
        FontSource::Default => DEFAULT_FONT_FAMILY,
        FontSource::Google => settings.google_font.trim(),
        FontSource::Custom => settings.custom_font_family.trim(),
    };

    if name.is_empty() {
        return None;
    }

    Some(format!("\"{name}\", monospace"))
}

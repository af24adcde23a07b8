// Author: Dustin Pilgrim
// License: MIT

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Local};

use super::theme::{ALL_PROPERTIES, ColorScheme, StyleDescriptor};

pub const BASE_CLASS: &str = "idlestamp-timestamp";

/// Assumed rendered height of one editor line, in pixels.
pub const LINE_HEIGHT_PX: i64 = 20;
/// Distance from the top of the editor element to the first line, in pixels.
pub const BASE_OFFSET_PX: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// The "stopped typing" stamp as handed to the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    id: OverlayId,
    text: String,
    classes: BTreeSet<&'static str>,
    properties: BTreeMap<&'static str, String>,
    font_family: Option<String>,
    top_px: i64,
}

impl Overlay {
    pub fn new(id: OverlayId, text: String, top_px: i64) -> Self {
        let mut classes = BTreeSet::new();
        classes.insert(BASE_CLASS);

        Self {
            id,
            text,
            classes,
            properties: BTreeMap::new(),
            font_family: None,
            top_px,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn top_px(&self) -> i64 {
        self.top_px
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.iter().copied()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.properties.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Active color scheme class, if any.
    pub fn scheme_class(&self) -> Option<&'static str> {
        ColorScheme::ALL_CLASSES
            .iter()
            .copied()
            .find(|c| self.classes.contains(c))
    }

    /// Drop every color-mode class and custom property.
    pub fn reset_colors(&mut self) {
        for class in ColorScheme::ALL_CLASSES {
            self.classes.remove(class);
        }
        for prop in ALL_PROPERTIES {
            self.properties.remove(prop);
        }
    }

    /// Reset, then apply `style`. A style without a font keeps the current one.
    pub fn apply_style(&mut self, style: &StyleDescriptor) {
        self.reset_colors();

        self.classes.insert(style.scheme.class_name());
        for (name, value) in style.scheme.properties() {
            self.properties.insert(name, value);
        }

        if let Some(font) = &style.font_family {
            self.font_family = Some(font.clone());
        }
    }
}

/// Vertical position for an overlay next to `cursor_line`.
///
/// A heuristic from the default line height, not a measurement of the cursor.
pub fn top_offset(cursor_line: i64) -> i64 {
    cursor_line.max(0) * LINE_HEIGHT_PX + BASE_OFFSET_PX
}

pub fn stamp_text(at: DateTime<Local>) -> String {
    format!("Stopped typing at: {}", at.format("%X"))
}

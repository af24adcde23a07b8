// Author: Dustin Pilgrim
// License: MIT

use std::collections::BTreeMap;

use crate::config::model::Settings;
use crate::sdebug;

pub const GOOGLE_FONT_LINK_ID: &str = "idlestamp-google-font";
pub const CUSTOM_FONT_STYLE_ID: &str = "idlestamp-custom-font";

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2";
const SECURE_SCHEME: &str = "https://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadNode {
    /// `<link rel="stylesheet" href=...>`
    StylesheetLink { href: String },
    /// `<style>` block with literal css text
    Style { text: String },
}

/// Document-wide resources, keyed by fixed identifiers so each exists at most once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    nodes: BTreeMap<&'static str, HeadNode>,
}

impl ResourceTable {
    pub fn get(&self, id: &str) -> Option<&HeadNode> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &HeadNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Create the node under `id`, or replace its content in place.
    fn upsert(&mut self, id: &'static str, node: HeadNode) -> bool {
        match self.nodes.get_mut(id) {
            Some(existing) if *existing == node => false,
            Some(existing) => {
                *existing = node;
                true
            }
            None => {
                self.nodes.insert(id, node);
                true
            }
        }
    }

    fn remove(&mut self, id: &str) -> Option<HeadNode> {
        self.nodes.remove(id)
    }
}

/// Manages the two font resources the overlay may depend on.
#[derive(Debug, Default)]
pub struct FontInjector {
    head: ResourceTable,
}

impl FontInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.head
    }

    pub fn load_google_font(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let href = google_font_url(name);
        if self.head.upsert(GOOGLE_FONT_LINK_ID, HeadNode::StylesheetLink { href }) {
            sdebug!("Fonts", "Google font link now points at '{}'", name);
        }
    }

    pub fn load_custom_font(&mut self, settings: &Settings) {
        let url = settings.custom_font_url.trim();
        let family = settings.custom_font_family.trim();

        if url.is_empty() || family.is_empty() {
            return;
        }

        if !url.starts_with(SECURE_SCHEME) {
            sdebug!("Fonts", "Refusing custom font over insecure url");
            return;
        }

        let text = font_face_declaration(family, url);
        if self.head.upsert(CUSTOM_FONT_STYLE_ID, HeadNode::Style { text }) {
            sdebug!("Fonts", "Custom font face '{}' installed", family);
        }
    }

    pub fn remove_all(&mut self) {
        let link = self.head.remove(GOOGLE_FONT_LINK_ID);
        let style = self.head.remove(CUSTOM_FONT_STYLE_ID);

        if link.is_some() || style.is_some() {
            sdebug!("Fonts", "Removed injected font resources");
        }
    }
}

pub fn google_font_url(name: &str) -> String {
    format!(
        "{GOOGLE_FONTS_CSS}?family={}:wght@400;700&display=swap",
        urlencoding::encode(name)
    )
}

pub fn font_face_declaration(family: &str, url: &str) -> String {
    format!(
        "@font-face {{ font-family: '{}'; src: url('{}') format('truetype'); }}",
        escape_css_string(family),
        escape_css_string(url)
    )
}

/// Make `value` safe inside a single-quoted css string.
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

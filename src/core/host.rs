// Author: Dustin Pilgrim
// License: MIT

//! What the tracker needs from the editor it decorates.

use std::sync::Arc;

use super::overlay::{Overlay, OverlayId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: i64,
    pub ch: i64,
}

pub trait Editor: Send + Sync {
    fn cursor(&self) -> Cursor;
}

pub trait EditorView: Send + Sync {
    /// Whether the view's root is still part of the visible document.
    fn is_attached(&self) -> bool;

    /// The element overlays are appended to, if the view currently has one.
    fn editor_element(&self) -> Option<Arc<dyn EditorElement>>;
}

pub trait EditorElement: Send + Sync {
    fn mount(&self, overlay: &Overlay);

    /// The overlay's classes, properties or font changed.
    fn restyle(&self, overlay: &Overlay);

    fn unmount(&self, id: OverlayId);
}

// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc::Sender;

use crate::config::{ColorMode, FontSource, Settings, SettingsStore};
use crate::{sdebug, sinfo, swarn};

use super::events::{SettingChange, TrackerMsg};
use super::fonts::{FontInjector, ResourceTable};
use super::host::{Editor, EditorElement, EditorView};
use super::overlay::{Overlay, OverlayId, stamp_text, top_offset};
use super::theme::resolve;
use super::timer::{DebounceTimer, Ticket};

const SECURE_SCHEME: &str = "https://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scheduled,
    Visible,
}

struct PendingEdit {
    editor: Arc<dyn Editor>,
    view: Arc<dyn EditorView>,
}

struct MountedOverlay {
    overlay: Overlay,
    element: Arc<dyn EditorElement>,
}

/// Watches edits and stamps the stop time once the user has been quiet long enough.
pub struct IdleTracker {
    settings: Settings,
    store: Arc<dyn SettingsStore>,
    fonts: FontInjector,
    timer: DebounceTimer,
    tx: Sender<TrackerMsg>,
    pending: Option<PendingEdit>,
    overlay: Option<MountedOverlay>,
    next_overlay_id: u64,
}

impl IdleTracker {
    pub fn new(settings: Settings, store: Arc<dyn SettingsStore>, tx: Sender<TrackerMsg>) -> Self {
        Self {
            settings,
            store,
            fonts: FontInjector::new(),
            timer: DebounceTimer::new(),
            tx,
            pending: None,
            overlay: None,
            next_overlay_id: 1,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resources(&self) -> &ResourceTable {
        self.fonts.resources()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref().map(|m| &m.overlay)
    }

    pub fn phase(&self) -> Phase {
        if self.overlay.is_some() {
            Phase::Visible
        } else if self.timer.is_pending() {
            Phase::Scheduled
        } else {
            Phase::Idle
        }
    }

    /// Bring injected fonts in line with the loaded settings.
    pub fn start(&mut self) {
        self.apply_configured_fonts();
        sinfo!(
            "Tracker",
            "Ready (threshold {} ms, colors {}, font {})",
            self.settings.effective_threshold_ms(),
            self.settings.color_mode,
            self.settings.font_source
        );
    }

    pub fn handle(&mut self, msg: TrackerMsg) {
        match msg {
            TrackerMsg::Edit { editor, view } => self.notify_edit(editor, view),
            TrackerMsg::TimerFired(ticket) => self.on_timer_fired(ticket),
            TrackerMsg::Setting(change) => self.apply_setting(change),
            TrackerMsg::Teardown => self.teardown(),
        }
    }

    pub fn notify_edit(&mut self, editor: Arc<dyn Editor>, view: Arc<dyn EditorView>) {
        self.pending = Some(PendingEdit { editor, view });
        self.remove_overlay();

        let delay = Duration::from_millis(self.settings.effective_threshold_ms());
        self.timer.schedule(delay, self.tx.clone());
    }

    pub fn on_timer_fired(&mut self, ticket: Ticket) {
        if !self.timer.claim(ticket) {
            sdebug!("Tracker", "Ignoring stale timer fire");
            return;
        }

        let Some(PendingEdit { editor, view }) = self.pending.take() else {
            return;
        };

        self.show_overlay(editor.as_ref(), view.as_ref());
    }

    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.pending = None;
        self.remove_overlay();
        self.fonts.remove_all();
    }

    fn show_overlay(&mut self, editor: &dyn Editor, view: &dyn EditorView) {
        if !view.is_attached() {
            sdebug!("Tracker", "View detached before the timer fired, skipping overlay");
            return;
        }

        let Some(element) = view.editor_element() else {
            sdebug!("Tracker", "View has no editor element, skipping overlay");
            return;
        };

        let id = OverlayId(self.next_overlay_id);
        self.next_overlay_id += 1;

        let cursor = editor.cursor();
        let mut overlay = Overlay::new(id, stamp_text(Local::now()), top_offset(cursor.line));
        overlay.apply_style(&resolve(&self.settings));

        element.mount(&overlay);
        sdebug!("Tracker", "Overlay {} shown at {}px", id.0, overlay.top_px());

        self.overlay = Some(MountedOverlay { overlay, element });
    }

    fn remove_overlay(&mut self) {
        if let Some(MountedOverlay { overlay, element }) = self.overlay.take() {
            element.unmount(overlay.id());
        }
    }

    fn restyle_overlay(&mut self) {
        let Some(mounted) = self.overlay.as_mut() else {
            return;
        };

        mounted.overlay.apply_style(&resolve(&self.settings));
        mounted.element.restyle(&mounted.overlay);
    }

    fn apply_configured_fonts(&mut self) {
        match self.settings.font_source {
            FontSource::Google => self.fonts.load_google_font(&self.settings.google_font),
            FontSource::Custom => self.fonts.load_custom_font(&self.settings),
            FontSource::Default => {}
        }
    }

    fn load_custom_font_if_selected(&mut self) {
        if self.settings.font_source == FontSource::Custom {
            self.fonts.load_custom_font(&self.settings);
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.settings) {
            swarn!("Tracker", "Failed to save settings: {}", e);
        }
    }

    // ---------------- settings mutators ----------------

    pub fn apply_setting(&mut self, change: SettingChange) {
        match change {
            SettingChange::ThresholdSeconds(secs) => {
                self.set_inactivity_threshold_secs(secs);
            }
            SettingChange::ColorMode(mode) => self.set_color_mode(mode),
            SettingChange::SingleColor(color) => self.set_single_color(color),
            SettingChange::GradientStart(color) => self.set_gradient_start(color),
            SettingChange::GradientEnd(color) => self.set_gradient_end(color),
            SettingChange::GradientAnimate(on) => self.set_gradient_animate(on),
            SettingChange::FontSource(source) => self.set_font_source(source),
            SettingChange::GoogleFont(name) => self.set_google_font(name),
            SettingChange::CustomFontUrl(url) => self.set_custom_font_url(url),
            SettingChange::CustomFontFamily(family) => self.set_custom_font_family(family),
        }
    }

    /// Returns false when `secs` does not give a positive finite number of
    /// milliseconds; nothing changes then.
    pub fn set_inactivity_threshold_secs(&mut self, secs: f64) -> bool {
        let ms = secs * 1000.0;
        if !ms.is_finite() || ms <= 0.0 {
            sdebug!("Tracker", "Ignoring threshold of {} seconds", secs);
            return false;
        }

        self.settings.inactivity_threshold = ms;
        self.persist();
        true
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.settings.color_mode = mode;
        self.persist();
        self.restyle_overlay();
    }

    pub fn set_single_color(&mut self, color: String) {
        self.settings.single_color = color;
        self.persist();
        self.restyle_overlay();
    }

    pub fn set_gradient_start(&mut self, color: String) {
        self.settings.gradient_start = color;
        self.persist();
        self.restyle_overlay();
    }

    pub fn set_gradient_end(&mut self, color: String) {
        self.settings.gradient_end = color;
        self.persist();
        self.restyle_overlay();
    }

    pub fn set_gradient_animate(&mut self, animate: bool) {
        self.settings.gradient_animate = animate;
        self.persist();
        self.restyle_overlay();
    }

    pub fn set_font_source(&mut self, source: FontSource) {
        self.settings.font_source = source;
        self.persist();
        self.apply_configured_fonts();
        self.restyle_overlay();
    }

    pub fn set_google_font(&mut self, name: String) {
        self.settings.google_font = name;
        self.persist();
        if self.settings.font_source == FontSource::Google {
            self.fonts.load_google_font(&self.settings.google_font);
        }
        self.restyle_overlay();
    }

    /// Anything that is not an https url is stored as empty.
    pub fn set_custom_font_url(&mut self, url: String) {
        let url = url.trim();
        self.settings.custom_font_url = if url.starts_with(SECURE_SCHEME) {
            url.to_string()
        } else {
            String::new()
        };
        self.persist();
        self.load_custom_font_if_selected();
        self.restyle_overlay();
    }

    pub fn set_custom_font_family(&mut self, family: String) {
        self.settings.custom_font_family = family;
        self.persist();
        self.load_custom_font_if_selected();
        self.restyle_overlay();
    }
}

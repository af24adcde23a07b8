// Author: Dustin Pilgrim
// License: MIT

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::{ColorMode, FontSource, MemoryStore, Settings};
use crate::core::events::{SettingChange, TrackerMsg};
use crate::core::fonts::{CUSTOM_FONT_STYLE_ID, GOOGLE_FONT_LINK_ID};
use crate::core::host::{Cursor, Editor, EditorElement, EditorView};
use crate::core::overlay::{Overlay, OverlayId};
use crate::core::tracker::{IdleTracker, Phase};

struct FakeEditor {
    line: AtomicI64,
}

impl Editor for FakeEditor {
    fn cursor(&self) -> Cursor {
        Cursor {
            line: self.line.load(Ordering::SeqCst),
            ch: 0,
        }
    }
}

#[derive(Default)]
struct FakeElement {
    mounted: Mutex<Vec<Overlay>>,
    restyled: Mutex<Vec<Overlay>>,
    unmounted: Mutex<Vec<OverlayId>>,
}

impl FakeElement {
    fn mounted(&self) -> Vec<Overlay> {
        self.mounted.lock().unwrap().clone()
    }

    fn restyled(&self) -> Vec<Overlay> {
        self.restyled.lock().unwrap().clone()
    }

    fn unmounted(&self) -> Vec<OverlayId> {
        self.unmounted.lock().unwrap().clone()
    }
}

impl EditorElement for FakeElement {
    fn mount(&self, overlay: &Overlay) {
        self.mounted.lock().unwrap().push(overlay.clone());
    }

    fn restyle(&self, overlay: &Overlay) {
        self.restyled.lock().unwrap().push(overlay.clone());
    }

    fn unmount(&self, id: OverlayId) {
        self.unmounted.lock().unwrap().push(id);
    }
}

struct FakeView {
    attached: AtomicBool,
    element: Option<Arc<FakeElement>>,
}

impl EditorView for FakeView {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn editor_element(&self) -> Option<Arc<dyn EditorElement>> {
        self.element.clone().map(|e| e as Arc<dyn EditorElement>)
    }
}

struct Harness {
    tracker: IdleTracker,
    rx: mpsc::Receiver<TrackerMsg>,
    store: Arc<MemoryStore>,
    editor: Arc<FakeEditor>,
    view: Arc<FakeView>,
    element: Arc<FakeElement>,
}

impl Harness {
    fn new(settings: Settings) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let store = Arc::new(MemoryStore::default());
        let element = Arc::new(FakeElement::default());
        let view = Arc::new(FakeView {
            attached: AtomicBool::new(true),
            element: Some(element.clone()),
        });

        Self {
            tracker: IdleTracker::new(settings, store.clone(), tx),
            rx,
            store,
            editor: Arc::new(FakeEditor { line: AtomicI64::new(0) }),
            view,
            element,
        }
    }

    fn with_threshold(ms: f64) -> Self {
        Self::new(Settings {
            inactivity_threshold: ms,
            ..Settings::default()
        })
    }

    fn edit(&mut self) {
        self.tracker.notify_edit(self.editor.clone(), self.view.clone());
    }

    /// Move the paused clock forward and deliver whatever the timer posted.
    async fn advance(&mut self, ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        while let Ok(msg) = self.rx.try_recv() {
            self.tracker.handle(msg);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn default_threshold_shows_rgb_stamp_after_a_minute() {
    let mut h = Harness::new(Settings::default());
    h.edit();
    assert_eq!(h.tracker.phase(), Phase::Scheduled);

    h.advance(59_999).await;
    assert!(h.element.mounted().is_empty());

    h.advance(1).await;
    assert_eq!(h.tracker.phase(), Phase::Visible);

    let mounted = h.element.mounted();
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].scheme_class(), Some("rgb-animation"));
    assert!(mounted[0].text().starts_with("Stopped typing at: "));
    assert_eq!(mounted[0].font_family(), Some("\"Roboto Mono\", monospace"));
}

#[tokio::test(start_paused = true)]
async fn second_edit_restarts_the_countdown() {
    let mut h = Harness::with_threshold(1000.0);

    h.edit();
    h.advance(500).await;
    h.edit();

    h.advance(500).await;
    assert!(h.element.mounted().is_empty());
    assert_eq!(h.tracker.phase(), Phase::Scheduled);

    h.advance(499).await;
    assert!(h.element.mounted().is_empty());

    h.advance(1).await;
    assert_eq!(h.element.mounted().len(), 1);
    assert_eq!(h.tracker.phase(), Phase::Visible);
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_yields_exactly_one_overlay() {
    let mut h = Harness::with_threshold(300.0);

    for _ in 0..20 {
        h.edit();
        h.advance(100).await;
    }
    assert!(h.element.mounted().is_empty());

    h.advance(5_000).await;
    assert_eq!(h.element.mounted().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn tiny_threshold_is_clamped() {
    let mut h = Harness::with_threshold(10.0);
    h.edit();

    h.advance(249).await;
    assert!(h.element.mounted().is_empty());

    h.advance(1).await;
    assert_eq!(h.element.mounted().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn next_edit_removes_visible_overlay() {
    let mut h = Harness::with_threshold(1000.0);
    h.edit();
    h.advance(1000).await;
    let first = h.element.mounted()[0].id();

    h.edit();
    assert_eq!(h.element.unmounted(), vec![first]);
    assert!(h.tracker.overlay().is_none());
    assert_eq!(h.tracker.phase(), Phase::Scheduled);

    h.advance(1000).await;
    let mounted = h.element.mounted();
    assert_eq!(mounted.len(), 2);
    assert_ne!(mounted[1].id(), first);
}

#[tokio::test(start_paused = true)]
async fn overlay_sits_below_the_cursor_line() {
    let mut h = Harness::with_threshold(1000.0);
    h.editor.line.store(5, Ordering::SeqCst);
    h.edit();
    h.advance(1000).await;

    assert_eq!(h.element.mounted()[0].top_px(), 5 * 20 + 40);
}

#[tokio::test(start_paused = true)]
async fn detached_view_is_checked_when_the_timer_fires() {
    let mut h = Harness::with_threshold(1000.0);
    h.edit();

    h.view.attached.store(false, Ordering::SeqCst);
    h.advance(1000).await;

    assert!(h.element.mounted().is_empty());
    assert_eq!(h.tracker.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn view_without_editor_element_renders_nothing() {
    let (tx, mut rx) = mpsc::channel(8);
    let store = Arc::new(MemoryStore::default());
    let mut tracker = IdleTracker::new(
        Settings {
            inactivity_threshold: 1000.0,
            ..Settings::default()
        },
        store,
        tx,
    );
    let view = Arc::new(FakeView {
        attached: AtomicBool::new(true),
        element: None,
    });
    let editor = Arc::new(FakeEditor { line: AtomicI64::new(0) });

    tracker.notify_edit(editor, view);
    let msg = rx.recv().await.expect("timer should fire");
    tracker.handle(msg);

    assert!(tracker.overlay().is_none());
    assert_eq!(tracker.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn teardown_releases_everything_from_any_state() {
    let mut h = Harness::new(Settings {
        inactivity_threshold: 1000.0,
        font_source: FontSource::Custom,
        google_font: "Inter".to_string(),
        custom_font_url: "https://example.com/f.ttf".to_string(),
        custom_font_family: "Mine".to_string(),
        ..Settings::default()
    });
    h.tracker.start();
    h.tracker.set_font_source(FontSource::Google);
    assert_eq!(h.tracker.resources().len(), 2);

    // visible
    h.edit();
    h.advance(1000).await;
    assert_eq!(h.tracker.phase(), Phase::Visible);

    h.tracker.teardown();
    assert_eq!(h.tracker.phase(), Phase::Idle);
    assert!(h.tracker.overlay().is_none());
    assert!(h.tracker.resources().is_empty());
    assert_eq!(h.element.unmounted().len(), 1);

    // scheduled
    h.edit();
    h.tracker.teardown();
    assert_eq!(h.tracker.phase(), Phase::Idle);
    h.advance(5_000).await;
    assert_eq!(h.element.mounted().len(), 1);

    // idle, twice
    h.tracker.teardown();
    h.tracker.handle(TrackerMsg::Teardown);
    assert_eq!(h.tracker.phase(), Phase::Idle);
    assert!(h.tracker.resources().is_empty());
}

#[tokio::test(start_paused = true)]
async fn start_injects_the_configured_font() {
    let mut h = Harness::new(Settings {
        font_source: FontSource::Google,
        google_font: "Fira Code".to_string(),
        ..Settings::default()
    });
    h.tracker.start();
    assert!(h.tracker.resources().get(GOOGLE_FONT_LINK_ID).is_some());

    let mut h = Harness::new(Settings::default());
    h.tracker.start();
    assert!(h.tracker.resources().is_empty());
}

#[tokio::test(start_paused = true)]
async fn switching_gradient_to_single_restyles_cleanly() {
    let mut h = Harness::new(Settings {
        inactivity_threshold: 1000.0,
        color_mode: ColorMode::Gradient,
        gradient_animate: true,
        ..Settings::default()
    });
    h.edit();
    h.advance(1000).await;

    let shown = h.tracker.overlay().unwrap();
    assert_eq!(shown.scheme_class(), Some("animated-gradient"));
    assert_eq!(shown.property("--gradient-start"), Some("#FF0000"));

    h.tracker.set_color_mode(ColorMode::Single);

    let restyled = h.element.restyled();
    assert_eq!(restyled.len(), 1);
    let overlay = &restyled[0];
    assert!(overlay.has_class("single-color"));
    for stale in ["animated-gradient", "static-gradient", "rgb-animation"] {
        assert!(!overlay.has_class(stale));
    }
    assert_eq!(overlay.property("--gradient-start"), None);
    assert_eq!(overlay.property("--gradient-end"), None);
    assert_eq!(overlay.property("--custom-gradient"), None);
    assert_eq!(overlay.property("--custom-color"), Some("#FF0000"));
}

#[tokio::test(start_paused = true)]
async fn font_change_keeps_overlay_font_when_name_is_blank() {
    let mut h = Harness::with_threshold(1000.0);
    h.edit();
    h.advance(1000).await;

    h.tracker.set_font_source(FontSource::Custom);
    let overlay = h.tracker.overlay().unwrap();
    assert_eq!(overlay.font_family(), Some("\"Roboto Mono\", monospace"));

    h.tracker.set_custom_font_family("Mine".to_string());
    let overlay = h.tracker.overlay().unwrap();
    assert_eq!(overlay.font_family(), Some("\"Mine\", monospace"));
}

#[tokio::test(start_paused = true)]
async fn mutators_persist_every_change() {
    let mut h = Harness::new(Settings::default());

    h.tracker.apply_setting(SettingChange::SingleColor("#123456".to_string()));
    let saved = h.store.snapshot().unwrap();
    assert_eq!(saved["singleColor"], "#123456");

    h.tracker.apply_setting(SettingChange::ThresholdSeconds(2.5));
    assert_eq!(h.store.snapshot().unwrap()["inactivityThreshold"], 2500.0);
    assert_eq!(h.tracker.settings().effective_threshold_ms(), 2500);
}

#[tokio::test(start_paused = true)]
async fn invalid_threshold_is_ignored() {
    let mut h = Harness::new(Settings::default());

    assert!(!h.tracker.set_inactivity_threshold_secs(0.0));
    assert!(!h.tracker.set_inactivity_threshold_secs(-3.0));
    assert!(!h.tracker.set_inactivity_threshold_secs(f64::NAN));

    assert!(!h.tracker.set_inactivity_threshold_secs(f64::MAX));

    assert_eq!(h.tracker.settings().inactivity_threshold, 60_000.0);
    assert!(h.store.snapshot().is_none());
}

#[tokio::test(start_paused = true)]
async fn insecure_custom_url_is_stored_empty_and_not_injected() {
    let mut h = Harness::new(Settings {
        font_source: FontSource::Custom,
        ..Settings::default()
    });
    h.tracker.set_custom_font_family("Mine".to_string());
    h.tracker.set_custom_font_url("http://insecure.example/font.ttf".to_string());

    assert_eq!(h.tracker.settings().custom_font_url, "");
    assert!(h.tracker.resources().get(CUSTOM_FONT_STYLE_ID).is_none());

    h.tracker.set_custom_font_url("  https://example.com/f.ttf ".to_string());
    assert_eq!(h.tracker.settings().custom_font_url, "https://example.com/f.ttf");
    assert!(h.tracker.resources().get(CUSTOM_FONT_STYLE_ID).is_some());
}

#[tokio::test(start_paused = true)]
async fn changes_without_overlay_do_not_touch_the_host() {
    let mut h = Harness::new(Settings::default());
    h.tracker.set_color_mode(ColorMode::Gradient);
    h.tracker.set_gradient_animate(true);

    assert!(h.element.restyled().is_empty());
    assert_eq!(h.tracker.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn font_fields_only_inject_for_the_selected_source() {
    let mut h = Harness::new(Settings::default());
    h.tracker.set_google_font("Inter".to_string());
    h.tracker.set_custom_font_family("Mine".to_string());
    h.tracker.set_custom_font_url("https://example.com/f.ttf".to_string());

    assert!(h.tracker.resources().is_empty());
    assert_eq!(h.tracker.settings().google_font, "Inter");
    assert_eq!(h.store.snapshot().unwrap()["customFontFamily"], "Mine");

    h.tracker.set_font_source(FontSource::Google);
    h.tracker.set_google_font("Fira Code".to_string());
    assert!(h.tracker.resources().get(GOOGLE_FONT_LINK_ID).is_some());
    assert!(h.tracker.resources().get(CUSTOM_FONT_STYLE_ID).is_none());

    h.tracker.set_font_source(FontSource::Custom);
    assert!(h.tracker.resources().get(CUSTOM_FONT_STYLE_ID).is_some());
}

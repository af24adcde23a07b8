// Author: Dustin Pilgrim
// License: MIT

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;

use crate::core::events::{SettingChange, TrackerMsg};
use crate::core::host::{Cursor, Editor, EditorElement, EditorView};
use crate::core::overlay::{Overlay, OverlayId};
use crate::core::theme::{PROP_CUSTOM_COLOR, PROP_CUSTOM_GRADIENT, PROP_GRADIENT_END, PROP_GRADIENT_START};
use crate::{sdebug, sinfo, swarn};

const RESET: &str = "\x1b[0m";

/// Stdin as a line editor: every line typed moves the cursor down one line.
#[derive(Debug, Default)]
pub struct TerminalEditor {
    lines: AtomicI64,
}

impl TerminalEditor {
    fn push_line(&self) {
        self.lines.fetch_add(1, Ordering::SeqCst);
    }
}

impl Editor for TerminalEditor {
    fn cursor(&self) -> Cursor {
        Cursor {
            line: self.lines.load(Ordering::SeqCst),
            ch: 0,
        }
    }
}

pub struct TerminalView {
    attached: AtomicBool,
    element: Arc<TerminalElement>,
}

impl TerminalView {
    pub fn new(use_colors: bool) -> Self {
        Self {
            attached: AtomicBool::new(true),
            element: Arc::new(TerminalElement { use_colors }),
        }
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl EditorView for TerminalView {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn editor_element(&self) -> Option<Arc<dyn EditorElement>> {
        Some(self.element.clone())
    }
}

pub struct TerminalElement {
    use_colors: bool,
}

impl TerminalElement {
    fn print(&self, overlay: &Overlay) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", render_overlay(overlay, self.use_colors));
        let _ = out.flush();
    }
}

impl EditorElement for TerminalElement {
    fn mount(&self, overlay: &Overlay) {
        self.print(overlay);
    }

    fn restyle(&self, overlay: &Overlay) {
        self.print(overlay);
    }

    fn unmount(&self, id: OverlayId) {
        sdebug!("Terminal", "Overlay {} dismissed", id.0);
    }
}

/// Feed stdin into the tracker until EOF or `:quit`.
pub async fn run_terminal(tx: Sender<TrackerMsg>, use_colors: bool) {
    let editor = Arc::new(TerminalEditor::default());
    let view = Arc::new(TerminalView::new(use_colors));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    sinfo!("Terminal", "Type away; ':set <field> <value>' changes a setting, ':quit' exits");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                swarn!("Terminal", "Failed to read stdin: {}", e);
                break;
            }
        };

        let msg = if line.trim() == ":quit" {
            break;
        } else if let Some(rest) = line.strip_prefix(":set ") {
            match parse_set_line(rest) {
                Ok(change) => TrackerMsg::Setting(change),
                Err(e) => {
                    swarn!("Terminal", "{}", e);
                    continue;
                }
            }
        } else {
            editor.push_line();
            TrackerMsg::Edit {
                editor: editor.clone(),
                view: view.clone(),
            }
        };

        if tx.send(msg).await.is_err() {
            sdebug!("Terminal", "Tracker is gone, stopping input");
            return;
        }
    }

    view.detach();
    let _ = tx.send(TrackerMsg::Teardown).await;
}

fn parse_set_line(rest: &str) -> Result<SettingChange, String> {
    let rest = rest.trim();
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| "usage: :set <field> <value>".to_string())?;
    SettingChange::parse(field, value.trim())
}

// ---------------- rendering ----------------

pub fn render_overlay(overlay: &Overlay, use_colors: bool) -> String {
    let text = overlay.text();
    if !use_colors {
        return text.to_string();
    }

    let painted = match overlay.scheme_class() {
        Some("rgb-animation") => Some(paint(text, rainbow)),
        Some("single-color") => overlay
            .property(PROP_CUSTOM_COLOR)
            .and_then(parse_hex)
            .map(|rgb| paint(text, |_| rgb)),
        Some("animated-gradient") => {
            let start = overlay.property(PROP_GRADIENT_START).and_then(parse_hex);
            let end = overlay.property(PROP_GRADIENT_END).and_then(parse_hex);
            start.zip(end).map(|(a, b)| paint(text, |t| lerp(a, b, t)))
        }
        Some("static-gradient") => overlay
            .property(PROP_CUSTOM_GRADIENT)
            .and_then(parse_linear_gradient)
            .map(|(a, b)| paint(text, |t| lerp(a, b, t))),
        _ => None,
    };

    painted.unwrap_or_else(|| text.to_string())
}

type Rgb = (u8, u8, u8);

/// Color each character by its relative position in `text` (0.0..=1.0).
fn paint(text: &str, color_at: impl Fn(f32) -> Rgb) -> String {
    let count = text.chars().count().max(2) - 1;
    let mut out = String::with_capacity(text.len() * 20);

    for (i, c) in text.chars().enumerate() {
        let (r, g, b) = color_at(i as f32 / count as f32);
        out.push_str(&format!("\x1b[38;2;{r};{g};{b}m{c}"));
    }
    out.push_str(RESET);
    out
}

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn rainbow(t: f32) -> Rgb {
    let h = (t * 6.0).min(5.999);
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn parse_hex(value: &str) -> Option<Rgb> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn parse_linear_gradient(value: &str) -> Option<(Rgb, Rgb)> {
    let inner = value
        .trim()
        .strip_prefix("linear-gradient(to right,")?
        .strip_suffix(')')?;
    let (start, end) = inner.split_once(',')?;
    Some((parse_hex(start)?, parse_hex(end)?))
}

// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::ConfigError;
use super::model::{LEGACY_THRESHOLD_KEY, Settings, THRESHOLD_KEY};
use crate::{sdebug, swarn};

/// Where settings live between sessions.
pub trait SettingsStore: Send + Sync {
    /// Raw persisted document, `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Value>, ConfigError>;

    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

/// Default data file location
pub fn default_settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    path.push("idlestamp");
    path.push("data.json");
    path
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>, ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut body = serde_json::to_string_pretty(settings)?;
        body.push('\n');
        fs::write(&self.path, body)?;
        Ok(())
    }
}

/// Keeps the document in memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<Option<Value>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn snapshot(&self) -> Option<Value> {
        self.doc.lock().ok().and_then(|d| d.clone())
    }
}

#[cfg(test)]
impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>, ConfigError> {
        Ok(self.snapshot())
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let value = serde_json::to_value(settings)?;
        let mut doc = self.doc.lock().map_err(|_| ConfigError::Poisoned)?;
        *doc = Some(value);
        Ok(())
    }
}

/// Load settings, laying the persisted keys over the defaults.
///
/// A key whose value does not fit its field is dropped on its own; anything
/// unreadable as a whole yields the defaults.
pub fn load_settings(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(doc)) => merge_over_defaults(doc),
        Ok(None) => {
            sdebug!("Config", "No saved settings, using defaults");
            Settings::default()
        }
        Err(e) => {
            swarn!("Config", "Failed to load settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

pub fn merge_over_defaults(doc: Value) -> Settings {
    let Value::Object(loaded) = doc else {
        swarn!("Config", "Saved settings are not an object, using defaults");
        return Settings::default();
    };

    let mut merged: Map<String, Value> = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(map)) => map,
        _ => return Settings::default(),
    };

    let has_current_threshold = loaded.contains_key(THRESHOLD_KEY);

    for (key, value) in loaded {
        if key == LEGACY_THRESHOLD_KEY && has_current_threshold {
            continue;
        }

        let key = if key == LEGACY_THRESHOLD_KEY {
            THRESHOLD_KEY.to_string()
        } else {
            key
        };
        let previous = merged.insert(key.clone(), value);

        if serde_json::from_value::<Settings>(Value::Object(merged.clone())).is_err() {
            swarn!("Config", "Ignoring invalid value for '{}'", key);
            match previous {
                Some(prev) => merged.insert(key, prev),
                None => merged.remove(&key),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ColorMode, FontSource};
    use serde_json::json;

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let s = merge_over_defaults(json!({
            "colorMode": "single",
            "singleColor": "#00FF00",
        }));

        assert_eq!(s.color_mode, ColorMode::Single);
        assert_eq!(s.single_color, "#00FF00");
        assert_eq!(s.inactivity_threshold, 60_000.0);
        assert_eq!(s.font_source, FontSource::Default);
    }

    #[test]
    fn bad_field_is_dropped_alone() {
        let s = merge_over_defaults(json!({
            "colorMode": "plaid",
            "inactivityThreshold": 2000,
            "gradientAnimate": "yes",
        }));

        assert_eq!(s.color_mode, ColorMode::RgbAnimation);
        assert!(!s.gradient_animate);
        assert_eq!(s.inactivity_threshold, 2000.0);
    }

    #[test]
    fn legacy_threshold_key_still_loads() {
        let s = merge_over_defaults(json!({ "inactivityThresholdMs": 1500 }));
        assert_eq!(s.inactivity_threshold, 1500.0);
    }

    #[test]
    fn current_threshold_key_beats_legacy_one() {
        let s = merge_over_defaults(json!({
            "inactivityThreshold": 5000,
            "inactivityThresholdMs": 1500,
        }));
        assert_eq!(s.inactivity_threshold, 5000.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s = merge_over_defaults(json!({ "somethingElse": 1, "googleFont": "Inter" }));
        assert_eq!(s.google_font, "Inter");
    }

    #[test]
    fn non_object_document_gives_defaults() {
        assert_eq!(merge_over_defaults(json!([1, 2, 3])), Settings::default());
    }

    #[test]
    fn file_store_round_trips_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("data.json"));

        assert!(store.load().unwrap().is_none());

        let mut s = Settings::default();
        s.font_source = FontSource::Google;
        s.google_font = "Fira Code".to_string();
        store.save(&s).unwrap();

        assert_eq!(load_settings(&store), s);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_settings(&store), Settings::default());
    }

    #[test]
    fn memory_store_keeps_last_save() {
        let store = MemoryStore::default();
        let mut s = Settings::default();
        s.gradient_animate = true;
        store.save(&s).unwrap();

        assert_eq!(store.snapshot().unwrap()["gradientAnimate"], true);
    }
}

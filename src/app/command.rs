// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;
use std::sync::Arc;

use eyre::{Result, WrapErr, eyre};
use tokio::sync::mpsc;

use crate::cli::{Args, Command};
use crate::config::{JsonFileStore, SettingsStore, default_settings_path, load_settings};
use crate::core::events::SettingChange;
use crate::core::tracker::IdleTracker;

pub fn settings_path(args: &Args) -> PathBuf {
    args.config.clone().unwrap_or_else(default_settings_path)
}

/// One-shot commands: everything except `run`.
pub fn run(args: &Args, cmd: &Command) -> Result<()> {
    let path = settings_path(args);

    match cmd {
        Command::Path => {
            println!("{}", path.display());
            Ok(())
        }

        Command::Show => {
            let store = JsonFileStore::new(&path);
            let settings = load_settings(&store);
            let body = serde_json::to_string_pretty(&settings)
                .wrap_err("failed to render settings")?;
            println!("{body}");
            Ok(())
        }

        Command::Set { field, value } => set(path, field, &value.join(" ")),

        Command::Run => Err(eyre!("`run` is not a one-shot command")),
    }
}

fn set(path: PathBuf, field: &str, value: &str) -> Result<()> {
    let change = SettingChange::parse(field, value).map_err(|e| eyre!(e))?;

    let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::new(&path));
    let settings = load_settings(store.as_ref());
    let before = settings.clone();

    // no event loop here: the tracker only needs the sender to schedule timers
    let (tx, _rx) = mpsc::channel(1);
    let mut tracker = IdleTracker::new(settings, store, tx);
    tracker.apply_setting(change);

    if *tracker.settings() == before {
        println!("{field}: unchanged");
        return Ok(());
    }

    let old = serde_json::to_value(&before).wrap_err("failed to render settings")?;
    let new = serde_json::to_value(tracker.settings()).wrap_err("failed to render settings")?;

    if let Some(fields) = new.as_object() {
        for (key, value) in fields {
            if old.get(key) != Some(value) {
                println!("{key} = {value}");
            }
        }
    }

    Ok(())
}

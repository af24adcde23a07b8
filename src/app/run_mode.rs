// Author: Dustin Pilgrim
// License: MIT

use std::io::IsTerminal;
use std::sync::Arc;

use eyre::{Result, WrapErr};
use tokio::sync::{mpsc, watch};

use crate::cli::Args;
use crate::config::{JsonFileStore, SettingsStore, load_settings};
use crate::core::events::TrackerMsg;
use crate::daemon::Daemon;
use crate::{sdebug, sinfo};

pub async fn run(args: &Args) -> Result<()> {
    crate::log::enable_file_output(true);
    sinfo!("Idlestamp", "idlestamp starting (log: {})", crate::log::log_path().display());

    let path = super::command::settings_path(args);
    sdebug!("Idlestamp", "settings file: {}", path.display());

    let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::new(&path));
    let settings = load_settings(store.as_ref());

    let use_colors = !args.no_color && std::io::stdout().is_terminal();

    let (tx, rx) = mpsc::channel::<TrackerMsg>(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut daemon = Daemon::new(settings, store, tx.clone());
    let mut daemon_task = tokio::spawn(async move {
        daemon.run(rx, shutdown_rx).await;
    });

    tokio::spawn(crate::services::terminal::run_terminal(tx, use_colors));

    tokio::select! {
        res = &mut daemon_task => {
            res.wrap_err("daemon task failed")?;
        }

        _ = tokio::signal::ctrl_c() => {
            sinfo!("Idlestamp", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
            daemon_task.await.wrap_err("daemon task failed")?;
        }
    }

    sinfo!("Idlestamp", "idlestamp stopped");
    Ok(())
}

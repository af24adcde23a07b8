// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};

use crate::core::events::TrackerMsg;
use crate::sinfo;

use super::Daemon;

impl Daemon {
    /// Drive the tracker until the host tears down or shutdown is requested.
    pub async fn run(
        &mut self,
        mut rx: mpsc::Receiver<TrackerMsg>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        sinfo!("Daemon", "daemon starting");
        self.tracker.start();

        loop {
            tokio::select! {
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        sinfo!("Daemon", "daemon stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        sinfo!("Daemon", "daemon stopping (event channel closed)");
                        break;
                    };

                    if !self.handle_message(msg) {
                        sinfo!("Daemon", "daemon stopping (host detached)");
                        break;
                    }
                }
            }
        }

        // teardown is idempotent, so the host-driven path may have run it already
        self.tracker.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{FontSource, MemoryStore, Settings};
    use crate::core::events::SettingChange;
    use crate::core::tracker::Phase;

    #[tokio::test]
    async fn teardown_message_stops_loop_and_clears_fonts() {
        let (tx, rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let store = Arc::new(MemoryStore::default());
        let mut daemon = Daemon::new(Settings::default(), store.clone(), tx.clone());

        tx.send(TrackerMsg::Setting(SettingChange::GoogleFont("Inter".to_string())))
            .await
            .unwrap();
        tx.send(TrackerMsg::Setting(SettingChange::FontSource(FontSource::Google)))
            .await
            .unwrap();
        tx.send(TrackerMsg::Teardown).await.unwrap();

        daemon.run(rx, shutdown_rx).await;

        assert!(daemon.tracker().resources().is_empty());
        assert_eq!(daemon.tracker().settings().font_source, FontSource::Google);
        assert_eq!(store.snapshot().unwrap()["googleFont"], "Inter");
    }

    #[tokio::test]
    async fn shutdown_signal_stops_loop() {
        let (tx, rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut daemon = Daemon::new(Settings::default(), Arc::new(MemoryStore::default()), tx);

        shutdown_tx.send(true).unwrap();
        daemon.run(rx, shutdown_rx).await;

        assert_eq!(daemon.tracker().phase(), Phase::Idle);
    }
}

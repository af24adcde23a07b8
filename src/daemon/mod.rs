// Author: Dustin Pilgrim
// License: MIT

mod run;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{Settings, SettingsStore};
use crate::core::events::TrackerMsg;
use crate::core::fonts::HeadNode;
use crate::core::tracker::IdleTracker;
use crate::{sdebug, sinfo};

pub struct Daemon {
    tracker: IdleTracker,
}

impl Daemon {
    pub fn new(settings: Settings, store: Arc<dyn SettingsStore>, tx: mpsc::Sender<TrackerMsg>) -> Self {
        Self {
            tracker: IdleTracker::new(settings, store, tx),
        }
    }

    pub fn tracker(&self) -> &IdleTracker {
        &self.tracker
    }

    /// Returns false once the host asked for teardown.
    fn handle_message(&mut self, msg: TrackerMsg) -> bool {
        sdebug!("Daemon", "incoming: {:?}", msg);

        match msg {
            TrackerMsg::Teardown => {
                self.tracker.teardown();
                false
            }
            TrackerMsg::Setting(change) => {
                let before = self.tracker.resources().clone();
                self.tracker.apply_setting(change);
                self.log_resource_changes(&before);
                true
            }
            other => {
                self.tracker.handle(other);
                true
            }
        }
    }

    fn log_resource_changes(&self, before: &crate::core::fonts::ResourceTable) {
        let after = self.tracker.resources();
        if after == before {
            return;
        }

        for (id, node) in after.iter() {
            if before.get(id) == Some(node) {
                continue;
            }
            match node {
                HeadNode::StylesheetLink { href } => sinfo!("Fonts", "{} -> {}", id, href),
                HeadNode::Style { text } => sinfo!("Fonts", "{} -> {}", id, text),
            }
        }
    }
}

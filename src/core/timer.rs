// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::events::TrackerMsg;

/// Identifies one scheduling of the debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single-shot timer that posts `TrackerMsg::TimerFired` back to the event loop.
///
/// At most one sleep is outstanding. A fire message is only honoured through
/// `claim`, so a message already queued when the timer was cancelled is dropped.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is pending and start a new countdown, measured from now.
    pub fn schedule(&mut self, delay: Duration, tx: Sender<TrackerMsg>) -> Ticket {
        self.cancel();

        let ticket = Ticket(self.generation);
        let deadline = Instant::now() + delay;
        self.handle = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(TrackerMsg::TimerFired(ticket)).await;
        }));

        ticket
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Accept a fire for `ticket`; false when it belongs to a cancelled countdown.
    pub fn claim(&mut self, ticket: Ticket) -> bool {
        if self.handle.is_none() || ticket.0 != self.generation {
            return false;
        }

        self.handle = None;
        self.generation = self.generation.wrapping_add(1);
        true
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// Fan-out of arena messages to session outboxes.

use super::types::{Outbound, Outbox, Recipients, ServerEvent};
use crate::domain::SessionId;
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Registry of connected sessions' outboxes.
///
/// Sends are fire-and-forget: a full or closed outbox loses that message for that
/// session only, so one slow client never stalls the world task.
#[derive(Debug, Default)]
pub struct Dispatcher {
    outboxes: HashMap<SessionId, Outbox>,
    dropped: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: SessionId, outbox: Outbox) {
        self.outboxes.insert(id, outbox);
    }

    pub fn unregister(&mut self, id: &SessionId) -> bool {
        self.outboxes.remove(id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.outboxes.len()
    }

    /// Messages lost to full or closed outboxes since startup.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn dispatch(&mut self, outbound: Outbound) {
        match outbound.to {
            Recipients::Session(id) => {
                if let Some(outbox) = self.outboxes.get(&id) {
                    if !deliver(&id, outbox, outbound.event) {
                        self.dropped += 1;
                    }
                }
            }
            Recipients::All => {
                let mut dropped = 0;
                for (id, outbox) in &self.outboxes {
                    if !deliver(id, outbox, outbound.event.clone()) {
                        dropped += 1;
                    }
                }
                self.dropped += dropped;
            }
            Recipients::AllExcept(excluded) => {
                let mut dropped = 0;
                for (id, outbox) in self.outboxes.iter().filter(|(id, _)| **id != excluded) {
                    if !deliver(id, outbox, outbound.event.clone()) {
                        dropped += 1;
                    }
                }
                self.dropped += dropped;
            }
        }
    }

    pub fn dispatch_all(&mut self, messages: impl IntoIterator<Item = Outbound>) {
        for outbound in messages {
            self.dispatch(outbound);
        }
    }
}

fn deliver(id: &SessionId, outbox: &Outbox, event: ServerEvent) -> bool {
    match outbox.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(session_id = %id, "session outbox full; dropping message");
            false
        }
        Err(TrySendError::Closed(_)) => {
            // Connection task is gone; its Disconnect event is on the way.
            debug!(session_id = %id, "session outbox closed");
            false
        }
    }
}

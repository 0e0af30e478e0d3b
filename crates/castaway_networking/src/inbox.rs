//! Client-side end of the damage multicast.

use crate::multicast::ObserverId;
use crate::protocol::TakeDamage;
use castaway_core::{report, Diagnostic, SharedSink};
use castaway_shared::{EntityId, NetMode};
use crossbeam_channel::Receiver;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Inbound queue of one observer.
///
/// Tracks the next expected sequence per container. The first message seen
/// for a container sets its baseline, so late joiners start silently.
/// Anomalies are reported, never corrected: messages come out in arrival
/// order.
pub struct ObserverInbox {
    id: ObserverId,
    receiver: Receiver<Vec<u8>>,
    expected: HashMap<EntityId, u32>,
    diagnostics: SharedSink,
}

impl std::fmt::Debug for ObserverInbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverInbox")
            .field("id", &self.id)
            .field("pending", &self.receiver.len())
            .field("containers", &self.expected.len())
            .finish_non_exhaustive()
    }
}

impl ObserverInbox {
    pub(crate) fn new(id: ObserverId, receiver: Receiver<Vec<u8>>, diagnostics: SharedSink) -> Self {
        Self {
            id,
            receiver,
            expected: HashMap::new(),
            diagnostics,
        }
    }

    /// This observer's id.
    #[must_use]
    pub const fn id(&self) -> ObserverId {
        self.id
    }

    /// Redirects decode and sequence reports to `diagnostics`.
    pub fn set_diagnostics(&mut self, diagnostics: SharedSink) {
        self.diagnostics = diagnostics;
    }

    /// Packets waiting to be drained.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Decodes every pending packet in arrival order.
    ///
    /// Undecodable packets are reported and skipped.
    pub fn drain(&mut self) -> Vec<TakeDamage> {
        let mut out = Vec::with_capacity(self.receiver.len());
        while let Ok(bytes) = self.receiver.try_recv() {
            match TakeDamage::decode(&bytes) {
                Ok(message) => {
                    self.track_sequence(&message);
                    out.push(message);
                }
                Err(error) => report(self.diagnostics.as_ref(), NetMode::Client, &error),
            }
        }
        out
    }

    fn track_sequence(&mut self, message: &TakeDamage) {
        let expected = match self.expected.entry(message.container) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(message.sequence.wrapping_add(1));
                return;
            }
        };
        if message.sequence > *expected {
            self.diagnostics.report(
                Diagnostic::warning(
                    "net.sequence_gap",
                    format!(
                        "{}: {} expected sequence {}, got {}",
                        self.id, message.container, *expected, message.sequence
                    ),
                )
                .on(NetMode::Client),
            );
        } else if message.sequence < *expected {
            self.diagnostics.report(
                Diagnostic::warning(
                    "net.sequence_regression",
                    format!(
                        "{}: {} sequence went back to {} (expected {})",
                        self.id, message.container, message.sequence, *expected
                    ),
                )
                .on(NetMode::Client),
            );
            return;
        }
        *expected = message.sequence.wrapping_add(1);
    }
}

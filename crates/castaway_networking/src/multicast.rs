//! # Reliable Multicast
//!
//! Server-side fan-out of `TakeDamage` to every connected observer.
//!
//! Each observer owns one unbounded crossbeam channel. A channel is FIFO and
//! lossless, which is exactly the reliable-ordered contract: an observer
//! sees one sender's broadcasts in issue order.

use crate::inbox::ObserverInbox;
use crate::protocol::TakeDamage;
use castaway_core::SharedSink;
use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU32, Ordering};

/// Outbound edge of the resource core.
pub trait DamageMulticast: Send + Sync {
    /// Delivers `message` to every remote observer.
    ///
    /// Returns the number of observers the message was queued for.
    fn multicast_take_damage(&self, message: &TakeDamage) -> usize;
}

/// Identifier of a connected observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u32);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Multicast statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MulticastStats {
    /// Messages multicast.
    pub messages_sent: u64,
    /// Packets queued across all observers.
    pub packets_delivered: u64,
    /// Bytes queued across all observers.
    pub bytes_sent: u64,
    /// Observers dropped because their inbox was gone.
    pub observers_dropped: u64,
}

#[derive(Debug)]
struct ObserverLink {
    id: ObserverId,
    sender: Sender<Vec<u8>>,
}

/// Fan-out hub owned by the server.
#[derive(Debug, Default)]
pub struct MulticastHub {
    observers: RwLock<Vec<ObserverLink>>,
    next_id: AtomicU32,
    stats: Mutex<MulticastStats>,
}

impl MulticastHub {
    /// Creates a hub with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a new observer and returns its inbox.
    ///
    /// The inbox reports decode errors and sequence anomalies to `diagnostics`.
    pub fn connect(&self, diagnostics: SharedSink) -> ObserverInbox {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = unbounded();
        self.observers.write().push(ObserverLink { id, sender });
        tracing::info!(%id, "observer connected");
        ObserverInbox::new(id, receiver, diagnostics)
    }

    /// Disconnects `id`. Returns false if it was not connected.
    pub fn disconnect(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|link| link.id != id);
        let removed = observers.len() != before;
        if removed {
            tracing::info!(%id, "observer disconnected");
        }
        removed
    }

    /// Number of connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Snapshot of the statistics.
    #[must_use]
    pub fn stats(&self) -> MulticastStats {
        *self.stats.lock()
    }
}

impl DamageMulticast for MulticastHub {
    fn multicast_take_damage(&self, message: &TakeDamage) -> usize {
        let packet = message.encode();
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|link| link.sender.send(packet.clone()).is_ok());
        let delivered = observers.len();
        drop(observers);

        let mut stats = self.stats.lock();
        stats.messages_sent += 1;
        stats.packets_delivered += delivered as u64;
        stats.bytes_sent += (delivered * packet.len()) as u64;
        stats.observers_dropped += (before - delivered) as u64;

        tracing::trace!(
            container = %message.container,
            sequence = message.sequence,
            delivered,
            "take damage multicast"
        );
        delivered
    }
}

/// Multicast that goes nowhere, for standalone play.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMulticast;

impl DamageMulticast for NullMulticast {
    fn multicast_take_damage(&self, _message: &TakeDamage) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_core::MemorySink;
    use castaway_shared::{ComponentIndex, EntityId, HitResult};
    use std::sync::Arc;

    fn message(sequence: u32) -> TakeDamage {
        TakeDamage {
            container: EntityId(1),
            sequence,
            instance_index: 0,
            component_index: ComponentIndex(0),
            magnitude: 1.0,
            hit: HitResult::default(),
        }
    }

    #[test]
    fn test_fan_out_to_every_observer() {
        let hub = MulticastHub::new();
        let sink = MemorySink::shared();
        let mut a = hub.connect(sink.clone());
        let mut b = hub.connect(sink.clone());

        assert_eq!(hub.multicast_take_damage(&message(0)), 2);
        assert_eq!(hub.multicast_take_damage(&message(1)), 2);

        let seqs = |inbox: &mut ObserverInbox| -> Vec<u32> {
            inbox.drain().iter().map(|m| m.sequence).collect()
        };
        assert_eq!(seqs(&mut a), vec![0, 1]);
        assert_eq!(seqs(&mut b), vec![0, 1]);

        let stats = hub.stats();
        assert_eq!(stats.messages_sent, 2);
        assert_eq!(stats.packets_delivered, 4);
        assert_eq!(stats.bytes_sent, 4 * 65);
    }

    #[test]
    fn test_dropped_inbox_is_pruned() {
        let hub = MulticastHub::new();
        let sink: SharedSink = Arc::new(MemorySink::new());
        let keep = hub.connect(sink.clone());
        drop(hub.connect(sink));

        assert_eq!(hub.multicast_take_damage(&message(0)), 1);
        assert_eq!(hub.observer_count(), 1);
        assert_eq!(hub.stats().observers_dropped, 1);
        assert!(hub.disconnect(keep.id()));
        assert!(!hub.disconnect(keep.id()));
    }

    #[test]
    fn test_null_multicast() {
        assert_eq!(NullMulticast.multicast_take_damage(&message(0)), 0);
    }
}

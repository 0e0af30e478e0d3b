//! Where depleted instances are reported, for drops and effects.

use castaway_shared::{ComponentIndex, EntityId, InstanceIndex, NetMode, Transform};
use parking_lot::Mutex;
use std::sync::Arc;

/// An instance whose health just reached zero.
#[derive(Clone, Debug, PartialEq)]
pub struct DepletedInstance {
    /// Owning container.
    pub container: EntityId,
    /// Pool component.
    pub component: ComponentIndex,
    /// Instance within the pool.
    pub instance: InstanceIndex,
    /// Resource id.
    pub resource_id: String,
    /// Item to produce, if any.
    pub yield_item: Option<String>,
    /// Quantity of `yield_item`.
    pub yield_quantity: u32,
    /// Where the instance stood.
    pub transform: Transform,
    /// Side that observed the depletion.
    pub side: NetMode,
}

/// Consumer of depletion events.
///
/// Called exactly once per instance, on the transition to zero health. Every
/// observer sees the transition, so implementations that grant items should
/// check [`DepletedInstance::side`].
pub trait YieldSink: Send + Sync {
    /// An instance was depleted.
    fn instance_depleted(&self, depleted: &DepletedInstance);
}

/// Yield sink handle shared between pool components.
pub type SharedYieldSink = Arc<dyn YieldSink>;

/// Queues depletion events for the game loop to drain.
#[derive(Debug, Default)]
pub struct YieldQueue {
    pending: Mutex<Vec<DepletedInstance>>,
}

impl YieldQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty queue behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Takes every pending event.
    pub fn drain(&self) -> Vec<DepletedInstance> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl YieldSink for YieldQueue {
    fn instance_depleted(&self, depleted: &DepletedInstance) {
        self.pending.lock().push(depleted.clone());
    }
}

/// Ignores depletion events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullYieldSink;

impl YieldSink for NullYieldSink {
    fn instance_depleted(&self, _depleted: &DepletedInstance) {}
}

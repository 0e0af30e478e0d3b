//! # Client World
//!
//! Replica containers driven only by the server's broadcasts. A client
//! spawns the same batches as the server (same config, same seeds) and then
//! never changes health except through [`ClientWorld::pump`].

use crate::containers::ContainerSet;
use crate::error::{WorldError, WorldResult};
use castaway_core::SharedSink;
use castaway_networking::{NullMulticast, ObserverInbox};
use castaway_shared::{ComponentIndex, EntityId, NetMode, Transform};
use castaway_world::{
    ContainerConfig, ContainerServices, DamageOutcome, ResourceContainer, ResourceDefinition,
    WorldConfig, YieldQueue,
};
use std::sync::Arc;

/// What one [`ClientWorld::pump`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Broadcasts drained from the inbox.
    pub received: usize,
    /// Broadcasts that reduced health.
    pub applied: usize,
    /// Broadcasts that changed nothing (zero magnitude or already depleted).
    pub ignored: usize,
    /// Instances depleted by this pump.
    pub depleted: usize,
    /// Broadcasts rejected by the container, or for an unknown container.
    pub rejected: usize,
}

/// A remote client's view of the resource world.
#[derive(Debug)]
pub struct ClientWorld {
    containers: ContainerSet,
    inbox: ObserverInbox,
    yields: Arc<YieldQueue>,
}

impl ClientWorld {
    /// Creates an empty client world reading from `inbox`.
    ///
    /// The inbox's decode and sequence reports go to `diagnostics` too.
    ///
    /// # Errors
    ///
    /// [`WorldError::Config`] if `config` is invalid.
    pub fn new(config: ContainerConfig, mut inbox: ObserverInbox, diagnostics: SharedSink) -> WorldResult<Self> {
        inbox.set_diagnostics(Arc::clone(&diagnostics));
        let yields = YieldQueue::shared();
        let services = ContainerServices {
            diagnostics,
            yields: yields.clone(),
            multicast: Arc::new(NullMulticast),
        };
        Ok(Self {
            containers: ContainerSet::new(NetMode::Client, config, services)?,
            inbox,
            yields,
        })
    }

    /// Creates a client world and spawns everything `config` lists.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new) and [`ContainerSet::spawn_from_config`].
    pub fn from_config(config: &WorldConfig, inbox: ObserverInbox, diagnostics: SharedSink) -> WorldResult<Self> {
        let mut world = Self::new(config.container, inbox, diagnostics)?;
        world.containers.spawn_from_config(config)?;
        Ok(world)
    }

    /// Adds an empty replica container.
    ///
    /// # Errors
    ///
    /// [`WorldError::DuplicateContainer`] if `id` is taken.
    pub fn add_container(&mut self, id: EntityId) -> WorldResult<&mut ResourceContainer> {
        self.containers.add_container(id)
    }

    /// Spawns a batch into a replica container.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownContainer`] or the container's own error.
    pub fn spawn_resource_group(
        &mut self,
        container: EntityId,
        component: ComponentIndex,
        definition: Arc<ResourceDefinition>,
        transforms: &[Transform],
    ) -> WorldResult<usize> {
        self.containers
            .spawn_resource_group(container, component, definition, transforms)
    }

    /// Applies every pending broadcast, in arrival order.
    pub fn pump(&mut self) -> PumpStats {
        let mut stats = PumpStats::default();
        for message in self.inbox.drain() {
            stats.received += 1;
            let Some(container) = self.containers.get_mut(message.container) else {
                self.containers.fail(WorldError::UnknownContainer(message.container));
                stats.rejected += 1;
                continue;
            };
            match container.on_broadcast_received(&message) {
                Ok(DamageOutcome::Damaged { .. }) => stats.applied += 1,
                Ok(DamageOutcome::Depleted) => {
                    stats.applied += 1;
                    stats.depleted += 1;
                }
                Ok(DamageOutcome::Blocked | DamageOutcome::AlreadyDepleted) => stats.ignored += 1,
                Err(_) => stats.rejected += 1,
            }
        }
        if stats.received > 0 {
            tracing::debug!(
                observer = %self.inbox.id(),
                received = stats.received,
                applied = stats.applied,
                rejected = stats.rejected,
                "client pumped"
            );
        }
        stats
    }

    /// The replica containers.
    #[must_use]
    pub fn containers(&self) -> &ContainerSet {
        &self.containers
    }

    /// Replica container `id`, if present.
    #[must_use]
    pub fn container(&self, id: EntityId) -> Option<&ResourceContainer> {
        self.containers.get(id)
    }

    /// Depletions observed on this client.
    #[must_use]
    pub fn yields(&self) -> &Arc<YieldQueue> {
        &self.yields
    }

    /// The inbox this client reads from.
    #[must_use]
    pub fn inbox(&self) -> &ObserverInbox {
        &self.inbox
    }
}

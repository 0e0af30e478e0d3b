//! # Server World
//!
//! The authoritative side. Owns the containers whose health is the truth
//! and the hub that replicates every damage broadcast to connected clients.
//!
//! ```text
//! apply_effect(container, data)
//!     └─> ResourceContainer::receive_effect
//!             ├─> MulticastHub ──> ObserverInbox (one per client)
//!             └─> local apply
//! ```

use crate::containers::ContainerSet;
use crate::error::{WorldError, WorldResult};
use castaway_abilities::EffectModCallbackData;
use castaway_core::{report, SharedSink};
use castaway_networking::{MulticastHub, MulticastStats, ObserverInbox, TakeDamage};
use castaway_shared::{ComponentIndex, EntityId, NetMode, Transform};
use castaway_world::{
    ContainerConfig, ContainerServices, ResourceContainer, ResourceDefinition, ResourceResult,
    WorldConfig, YieldQueue,
};
use std::sync::Arc;

/// Authoritative resource world.
#[derive(Debug)]
pub struct ServerWorld {
    containers: ContainerSet,
    hub: Arc<MulticastHub>,
    yields: Arc<YieldQueue>,
}

impl ServerWorld {
    /// Creates an empty server world.
    ///
    /// # Errors
    ///
    /// - [`WorldError::NotAuthoritative`] if `net_mode` is a client
    /// - [`WorldError::Config`] if `config` is invalid
    pub fn new(net_mode: NetMode, config: ContainerConfig, diagnostics: SharedSink) -> WorldResult<Self> {
        if !net_mode.has_authority() {
            let error = WorldError::NotAuthoritative { net_mode };
            report(diagnostics.as_ref(), net_mode, &error);
            return Err(error);
        }
        let hub = Arc::new(MulticastHub::new());
        let yields = YieldQueue::shared();
        let services = ContainerServices {
            diagnostics,
            yields: yields.clone(),
            multicast: hub.clone(),
        };
        Ok(Self {
            containers: ContainerSet::new(net_mode, config, services)?,
            hub,
            yields,
        })
    }

    /// Creates a server world and spawns everything `config` lists.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new) and [`ContainerSet::spawn_from_config`].
    pub fn from_config(net_mode: NetMode, config: &WorldConfig, diagnostics: SharedSink) -> WorldResult<Self> {
        let mut world = Self::new(net_mode, config.container, diagnostics)?;
        world.containers.spawn_from_config(config)?;
        Ok(world)
    }

    /// Adds an empty container.
    ///
    /// # Errors
    ///
    /// [`WorldError::DuplicateContainer`] if `id` is taken.
    pub fn add_container(&mut self, id: EntityId) -> WorldResult<&mut ResourceContainer> {
        self.containers.add_container(id)
    }

    /// Spawns a batch into `container`.
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

    /// Delivers an effect to `container` and returns one result per damage
    /// notification it raised.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownContainer`] if `container` does not exist.
    pub fn apply_effect(
        &mut self,
        container: EntityId,
        data: EffectModCallbackData,
    ) -> WorldResult<Vec<ResourceResult<TakeDamage>>> {
        Ok(self.containers.require_mut(container)?.receive_effect(data))
    }

    /// Connects a new observer. It receives every broadcast issued from now on.
    ///
    /// Until handed to a [`ClientWorld`](crate::ClientWorld), the inbox
    /// reports to the server's diagnostics.
    #[must_use]
    pub fn connect_client(&self) -> ObserverInbox {
        let inbox = self.hub.connect(Arc::clone(self.containers.diagnostics()));
        tracing::info!(observer = %inbox.id(), observers = self.hub.observer_count(), "client connected");
        inbox
    }

    /// The authoritative containers.
    #[must_use]
    pub fn containers(&self) -> &ContainerSet {
        &self.containers
    }

    /// Container `id`, if present.
    #[must_use]
    pub fn container(&self, id: EntityId) -> Option<&ResourceContainer> {
        self.containers.get(id)
    }

    /// Depletions observed on the server.
    #[must_use]
    pub fn yields(&self) -> &Arc<YieldQueue> {
        &self.yields
    }

    /// Replication counters.
    #[must_use]
    pub fn multicast_stats(&self) -> MulticastStats {
        self.hub.stats()
    }

    /// Connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }
}

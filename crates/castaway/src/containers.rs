//! The set of resource containers one observer holds.

use crate::error::{WorldError, WorldResult};
use crate::placement::scatter_transforms;
use castaway_core::{report, SharedSink};
use castaway_networking::DamageMulticast;
use castaway_shared::{ComponentIndex, EntityId, InstanceIndex, NetMode, Transform};
use castaway_world::{
    ContainerConfig, ContainerServices, ResourceContainer, ResourceDefinition, SharedYieldSink,
    WorldConfig,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One instance's health, as seen by one observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceHealth {
    /// Owning container.
    pub container: EntityId,
    /// Pool component.
    pub component: ComponentIndex,
    /// Instance within the pool.
    pub instance: InstanceIndex,
    /// Current health.
    pub health: f32,
}

/// Containers keyed by entity id, all on the same side.
pub struct ContainerSet {
    net_mode: NetMode,
    config: ContainerConfig,
    containers: BTreeMap<EntityId, ResourceContainer>,
    diagnostics: SharedSink,
    yields: SharedYieldSink,
    multicast: Arc<dyn DamageMulticast>,
}

impl fmt::Debug for ContainerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerSet")
            .field("net_mode", &self.net_mode)
            .field("containers", &self.containers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ContainerSet {
    /// Creates an empty set. Every container added shares these services.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if `config` is invalid.
    pub fn new(
        net_mode: NetMode,
        config: ContainerConfig,
        services: ContainerServices,
    ) -> WorldResult<Self> {
        config.validate()?;
        Ok(Self {
            net_mode,
            config,
            containers: BTreeMap::new(),
            diagnostics: services.diagnostics,
            yields: services.yields,
            multicast: services.multicast,
        })
    }

    /// Adds an empty container.
    ///
    /// # Errors
    ///
    /// [`WorldError::DuplicateContainer`] if `id` is taken.
    pub fn add_container(&mut self, id: EntityId) -> WorldResult<&mut ResourceContainer> {
        if self.containers.contains_key(&id) {
            return Err(self.fail(WorldError::DuplicateContainer(id)));
        }
        let services = ContainerServices {
            diagnostics: Arc::clone(&self.diagnostics),
            yields: Arc::clone(&self.yields),
            multicast: Arc::clone(&self.multicast),
        };
        let container = ResourceContainer::new(id, self.net_mode, &self.config, services)?;
        Ok(self.containers.entry(id).or_insert(container))
    }

    /// Spawns a batch into an existing container.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownContainer`], or the container's own error.
    pub fn spawn_resource_group(
        &mut self,
        container: EntityId,
        component: ComponentIndex,
        definition: Arc<ResourceDefinition>,
        transforms: &[Transform],
    ) -> WorldResult<usize> {
        let target = self.require_mut(container)?;
        Ok(target.spawn_resource_group(component, definition, transforms)?)
    }

    /// Creates every container named by `config.spawns` and populates it.
    ///
    /// Returns the total number of instances spawned.
    ///
    /// # Errors
    ///
    /// Returns the first error hit; containers created before it remain.
    pub fn spawn_from_config(&mut self, config: &WorldConfig) -> WorldResult<usize> {
        let catalog = config.catalog()?;
        let mut total = 0;
        for group in &config.spawns {
            let id = EntityId(group.container);
            if !self.containers.contains_key(&id) {
                self.add_container(id)?;
            }
            let definition = catalog.require(&group.resource)?;
            let transforms = scatter_transforms(group.seed, group.count, group.extent);
            total += self.spawn_resource_group(
                id,
                ComponentIndex(group.component),
                definition,
                &transforms,
            )?;
        }
        tracing::info!(
            side = self.net_mode.side(),
            containers = self.containers.len(),
            instances = total,
            "world spawned"
        );
        Ok(total)
    }

    /// Container `id`, if present.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&ResourceContainer> {
        self.containers.get(&id)
    }

    /// Mutable container `id`, if present.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut ResourceContainer> {
        self.containers.get_mut(&id)
    }

    /// Container `id`, reporting [`WorldError::UnknownContainer`] if absent.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownContainer`] if `id` is not in the set.
    pub fn require_mut(&mut self, id: EntityId) -> WorldResult<&mut ResourceContainer> {
        if !self.containers.contains_key(&id) {
            return Err(self.fail(WorldError::UnknownContainer(id)));
        }
        self.containers
            .get_mut(&id)
            .ok_or(WorldError::UnknownContainer(id))
    }

    /// Containers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceContainer> {
        self.containers.values()
    }

    /// Number of containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns true if the set holds no container.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Side the containers run on.
    #[must_use]
    pub const fn net_mode(&self) -> NetMode {
        self.net_mode
    }

    /// Injected diagnostics sink.
    #[must_use]
    pub fn diagnostics(&self) -> &SharedSink {
        &self.diagnostics
    }

    /// Health of every populated instance, in container, component and
    /// instance order.
    #[must_use]
    pub fn health_snapshot(&self) -> Vec<InstanceHealth> {
        let mut snapshot = Vec::new();
        for container in self.containers.values() {
            for pool in container.pools() {
                snapshot.extend(pool.slots().iter().map(|slot| InstanceHealth {
                    container: container.id(),
                    component: pool.component_index(),
                    instance: slot.index(),
                    health: slot.health(),
                }));
            }
        }
        snapshot
    }

    pub(crate) fn fail(&self, error: WorldError) -> WorldError {
        report(self.diagnostics.as_ref(), self.net_mode, &error);
        error
    }
}

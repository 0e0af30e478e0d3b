//! # Instance Pool Component
//!
//! A fixed-capacity batch of visual instances of one resource definition,
//! with per-instance health.
//!
//! ## Lifecycle
//!
//! ```text
//! set_definition ──> populate(transforms) ──> apply_damage* ──> Depleted
//!                         ▲                                        │
//!                         └──────────── repopulate ────────────────┘
//! ```
//!
//! Instances are hidden on depletion, never removed, so an `InstanceIndex`
//! names the same instance on every observer for the lifetime of a batch.

use crate::config::ContainerConfig;
use crate::definition::ResourceDefinition;
use crate::error::{ResourceError, ResourceResult};
use crate::slot::{DamageOutcome, InstanceSlot};
use crate::yield_sink::{DepletedInstance, SharedYieldSink};
use castaway_core::{report, SharedSink};
use castaway_rendering::{InstanceBuffer, InstanceStore};
use castaway_shared::{ComponentIndex, EntityId, HitResult, InstanceIndex, NetMode, Transform};
use std::fmt;
use std::sync::Arc;

/// Services a pool reports through.
#[derive(Clone)]
pub struct PoolServices {
    /// Side the pool runs on.
    pub net_mode: NetMode,
    /// Diagnostics sink.
    pub diagnostics: SharedSink,
    /// Depletion consumer.
    pub yields: SharedYieldSink,
}

/// One pool component of a resource container.
pub struct InstancePool {
    owner: EntityId,
    component_index: ComponentIndex,
    capacity: usize,
    definition: Option<Arc<ResourceDefinition>>,
    slots: Vec<InstanceSlot>,
    store: Box<dyn InstanceStore>,
    services: PoolServices,
}

impl fmt::Debug for InstancePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstancePool")
            .field("owner", &self.owner)
            .field("component_index", &self.component_index)
            .field("capacity", &self.capacity)
            .field("definition", &self.definition.as_ref().map(|d| d.id.as_str()))
            .field("slots", &self.slots.len())
            .field("net_mode", &self.services.net_mode)
            .finish_non_exhaustive()
    }
}

impl InstancePool {
    /// Creates an empty pool backed by an [`InstanceBuffer`].
    #[must_use]
    pub fn new(
        owner: EntityId,
        component_index: ComponentIndex,
        config: &ContainerConfig,
        services: PoolServices,
    ) -> Self {
        let store = InstanceBuffer::new(
            config.max_instances_per_component,
            config.num_custom_data_floats,
        );
        Self::with_store(
            owner,
            component_index,
            config.max_instances_per_component,
            Box::new(store),
            services,
        )
    }

    /// Creates an empty pool rendering through `store`.
    #[must_use]
    pub fn with_store(
        owner: EntityId,
        component_index: ComponentIndex,
        capacity: usize,
        store: Box<dyn InstanceStore>,
        services: PoolServices,
    ) -> Self {
        Self {
            owner,
            component_index,
            capacity,
            definition: None,
            slots: Vec::new(),
            store,
            services,
        }
    }

    /// Binds the definition used by the next [`populate`](Self::populate).
    pub fn set_definition(&mut self, definition: Arc<ResourceDefinition>) {
        self.definition = Some(definition);
    }

    /// Replaces the batch with one instance per transform.
    ///
    /// Transforms beyond capacity are dropped with a warning. Returns the
    /// number of instances created.
    ///
    /// # Errors
    ///
    /// [`ResourceError::DefinitionUnset`] if no definition is bound; the pool
    /// is left untouched.
    pub fn populate(&mut self, transforms: &[Transform]) -> ResourceResult<usize> {
        let Some(definition) = self.definition.clone() else {
            return Err(self.fail(ResourceError::DefinitionUnset {
                component: self.component_index,
            }));
        };

        self.slots.clear();
        self.store.clear_instances();

        let accepted = transforms.len().min(self.capacity);
        if accepted < transforms.len() {
            let warning = ResourceError::CapacityExceeded {
                component: self.component_index,
                requested: transforms.len(),
                capacity: self.capacity,
                dropped: transforms.len() - accepted,
            };
            report(self.services.diagnostics.as_ref(), self.services.net_mode, &warning);
        }

        let added = self.store.add_instances(&transforms[..accepted]);
        self.slots.reserve(added);
        for (i, transform) in transforms[..added].iter().enumerate() {
            self.slots.push(InstanceSlot::new(
                InstanceIndex(i as u32),
                Arc::clone(&definition),
                *transform,
            ));
            self.store.set_custom_data(i, 0, definition.render_tag);
        }

        tracing::debug!(
            owner = %self.owner,
            component = %self.component_index,
            resource = %definition.id,
            instances = added,
            side = self.services.net_mode.side(),
            "pool populated"
        );
        Ok(added)
    }

    /// Applies `damage` to one instance.
    ///
    /// Negative or non-finite damage counts as zero. The transition to zero
    /// health hides the render instance and notifies the yield sink once.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InstanceIndexOutOfRange`] if `instance` is not in the
    /// batch; nothing is mutated.
    pub fn apply_damage(
        &mut self,
        instance: InstanceIndex,
        damage: f32,
        hit: &HitResult,
    ) -> ResourceResult<DamageOutcome> {
        if instance.get() >= self.slots.len() {
            return Err(self.fail(ResourceError::InstanceIndexOutOfRange {
                component: self.component_index,
                index: i64::from(instance.0),
                count: self.slots.len(),
            }));
        }
        let slot = &mut self.slots[instance.get()];

        let damage = if damage.is_nan() || damage <= 0.0 { 0.0 } else { damage };
        let outcome = slot.take_damage(damage);

        tracing::trace!(
            owner = %self.owner,
            component = %self.component_index,
            %instance,
            damage,
            health = slot.health(),
            impact_x = hit.impact_point.x,
            impact_y = hit.impact_point.y,
            impact_z = hit.impact_point.z,
            side = self.services.net_mode.side(),
            "take damage"
        );

        if outcome == DamageOutcome::Depleted {
            let depleted = DepletedInstance {
                container: self.owner,
                component: self.component_index,
                instance,
                resource_id: slot.definition().id.clone(),
                yield_item: slot.definition().yield_item.clone(),
                yield_quantity: slot.definition().yield_quantity,
                transform: *slot.transform(),
                side: self.services.net_mode,
            };
            self.store.hide_instance(instance.get());
            self.services.yields.instance_depleted(&depleted);
            tracing::debug!(
                owner = %self.owner,
                component = %self.component_index,
                %instance,
                resource = %depleted.resource_id,
                "instance depleted"
            );
        }
        Ok(outcome)
    }

    /// Fixed index within the container.
    #[must_use]
    pub const fn component_index(&self) -> ComponentIndex {
        self.component_index
    }

    /// Owning container.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// The slot for `instance`, if populated.
    #[must_use]
    pub fn slot(&self, instance: InstanceIndex) -> Option<&InstanceSlot> {
        self.slots.get(instance.get())
    }

    /// Every slot in index order.
    #[must_use]
    pub fn slots(&self) -> &[InstanceSlot] {
        &self.slots
    }

    /// Number of slots in the current batch.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Maximum batch size.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The bound definition.
    #[must_use]
    pub fn definition(&self) -> Option<&Arc<ResourceDefinition>> {
        self.definition.as_ref()
    }

    /// The render backing store.
    #[must_use]
    pub fn render_store(&self) -> &dyn InstanceStore {
        self.store.as_ref()
    }

    /// Slots not yet depleted.
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_depleted()).count()
    }

    fn fail(&self, error: ResourceError) -> ResourceError {
        report(self.services.diagnostics.as_ref(), self.services.net_mode, &error);
        error
    }
}

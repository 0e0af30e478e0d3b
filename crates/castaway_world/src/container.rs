//! # Resource Container Entity
//!
//! A replicated actor holding a fixed set of instance pool components and
//! the damage handler that turns effects into broadcasts.
//!
//! ## Damage Path
//!
//! ```text
//! receive_effect ─> AbilitySystem ─> DamageReceived ─> on_damage_received (server)
//!                                                          │ validate, resolve
//!                                                          ▼
//!                                   DamageMulticast <── TakeDamage ──> on_broadcast_received
//!                                        │                                   │
//!                                        ▼                                   ▼
//!                              remote observers ─> on_broadcast_received   pool.apply_damage
//! ```
//!
//! The pool set is a boxed slice sized once at construction. Replication
//! relies on component indices meaning the same thing everywhere, so it is
//! never resized.

use crate::config::{ConfigError, ContainerConfig};
use crate::definition::ResourceDefinition;
use crate::error::{ResourceError, ResourceResult};
use crate::pool::{InstancePool, PoolServices};
use crate::slot::DamageOutcome;
use crate::validator::RequirementValidator;
use crate::yield_sink::{NullYieldSink, SharedYieldSink};
use castaway_abilities::{
    AbilitySystem, AttributeSet, DamageReceived, EffectExecution, EffectModCallbackData,
    NotifiesOnDamage, ReplicationMode, ResourceAttributes, SharedAbilitySystem,
};
use castaway_core::{report, SharedSink};
use castaway_networking::{DamageMulticast, NullMulticast, TakeDamage};
use castaway_shared::{ComponentIndex, ComponentKind, EntityId, HitResult, InstanceIndex, NetMode, Transform};
use crossbeam_channel::Receiver;
use std::fmt;
use std::sync::Arc;

/// Shared services injected into a container.
#[derive(Clone)]
pub struct ContainerServices {
    /// Diagnostics sink.
    pub diagnostics: SharedSink,
    /// Depletion consumer.
    pub yields: SharedYieldSink,
    /// Outbound broadcast channel.
    pub multicast: Arc<dyn DamageMulticast>,
}

impl ContainerServices {
    /// Services for a container with no remote observers and no drops.
    #[must_use]
    pub fn standalone(diagnostics: SharedSink) -> Self {
        Self {
            diagnostics,
            yields: Arc::new(NullYieldSink),
            multicast: Arc::new(NullMulticast),
        }
    }
}

/// A resource container entity.
pub struct ResourceContainer {
    id: EntityId,
    net_mode: NetMode,
    pools: Box<[InstancePool]>,
    ability_system: SharedAbilitySystem,
    damage_events: Receiver<DamageReceived>,
    validator: RequirementValidator,
    multicast: Arc<dyn DamageMulticast>,
    diagnostics: SharedSink,
    next_sequence: u32,
}

impl fmt::Debug for ResourceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContainer")
            .field("id", &self.id)
            .field("net_mode", &self.net_mode)
            .field("pools", &self.pools)
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

impl ResourceContainer {
    /// Creates a container with `config.num_resource_components` empty pools.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn new(
        id: EntityId,
        net_mode: NetMode,
        config: &ContainerConfig,
        services: ContainerServices,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pool_services = PoolServices {
            net_mode,
            diagnostics: Arc::clone(&services.diagnostics),
            yields: services.yields,
        };
        let pools: Box<[InstancePool]> = (0..config.num_resource_components)
            .map(|i| {
                InstancePool::new(id, ComponentIndex(i as u8), config, pool_services.clone())
            })
            .collect();

        let mut attributes = ResourceAttributes::new(0.0);
        let damage_events = attributes.subscribe_damage();
        let ability_system = AbilitySystem::new(id.to_string(), ReplicationMode::Minimal)
            .with_attribute_set(AttributeSet::Resource(attributes))
            .into_shared();

        tracing::debug!(
            %id,
            side = net_mode.side(),
            pools = pools.len(),
            "resource container created"
        );

        Ok(Self {
            id,
            net_mode,
            pools,
            ability_system,
            damage_events,
            validator: RequirementValidator::new(net_mode, Arc::clone(&services.diagnostics)),
            multicast: services.multicast,
            diagnostics: services.diagnostics,
            next_sequence: 0,
        })
    }

    /// Binds `definition` to pool `component` and populates it.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ComponentIndexOutOfRange`] if `component` does not
    /// exist (nothing changes), or any error from
    /// [`InstancePool::populate`].
    pub fn spawn_resource_group(
        &mut self,
        component: ComponentIndex,
        definition: Arc<ResourceDefinition>,
        transforms: &[Transform],
    ) -> ResourceResult<usize> {
        let Some(pool) = self.pools.get_mut(component.get()) else {
            return Err(self.out_of_range(component));
        };
        pool.set_definition(definition);
        pool.populate(transforms)
    }

    /// Inbound edge from the effect pipeline.
    ///
    /// Executes the effect, then handles every damage notification it
    /// produced. Each notification is fully validated and broadcast before
    /// the next one is looked at.
    pub fn receive_effect(&mut self, data: EffectModCallbackData) -> Vec<ResourceResult<TakeDamage>> {
        let execution = self.ability_system.write().execute_effect(data);
        if execution == EffectExecution::Unhandled {
            tracing::debug!(container = %self.id, "effect modified no container attribute");
        }

        let events: Vec<DamageReceived> = self.damage_events.try_iter().collect();
        events
            .iter()
            .map(|event| self.on_damage_received(event))
            .collect()
    }

    /// Server-side damage handler.
    ///
    /// Resolves the struck pool from the hit, gates the magnitude through the
    /// requirement validator, then multicasts the result and applies it
    /// locally. A rejected hit is still broadcast, with zero magnitude.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotAuthoritative`] on a client
    /// - [`ResourceError::MissingHitResult`] if targeting produced no hit
    /// - [`ResourceError::ForeignComponent`] if the hit is not on one of
    ///   this container's pools
    /// - [`ResourceError::DefinitionUnset`] if the struck pool was never spawned
    ///
    /// None of these broadcast.
    pub fn on_damage_received(&mut self, event: &DamageReceived) -> ResourceResult<TakeDamage> {
        if !self.net_mode.has_authority() {
            return Err(self.fail(ResourceError::NotAuthoritative {
                net_mode: self.net_mode,
            }));
        }
        tracing::debug!(container = %self.id, side = self.net_mode.side(), "damage received");

        let spec = &event.spec;
        let Some(hit) = spec.context.hit_result().copied() else {
            return Err(self.fail(ResourceError::MissingHitResult {
                effect: spec.name.clone(),
            }));
        };

        let component = self.resolve_component(&hit)?;
        let Some(definition) = self.pools[component.get()].definition().cloned() else {
            return Err(self.fail(ResourceError::DefinitionUnset { component }));
        };

        let magnitude = if self.validator.validate(spec, &definition) {
            event.magnitude
        } else {
            0.0
        };

        let message = TakeDamage {
            container: self.id,
            sequence: self.next_sequence,
            instance_index: hit.item,
            component_index: component,
            magnitude,
            hit,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);

        let observers = self.multicast.multicast_take_damage(&message);
        tracing::debug!(
            container = %self.id,
            sequence = message.sequence,
            %component,
            instance = message.instance_index,
            magnitude,
            observers,
            "take damage broadcast"
        );

        // Errors are already reported; the broadcast stands either way.
        let _ = self.on_broadcast_received(&message);
        Ok(message)
    }

    /// Applies a broadcast. Runs on every observer, the origin included, and
    /// is the only path that mutates instance health.
    ///
    /// # Errors
    ///
    /// [`ResourceError::WrongContainer`],
    /// [`ResourceError::ComponentIndexOutOfRange`] or
    /// [`ResourceError::InstanceIndexOutOfRange`]; nothing is mutated.
    pub fn on_broadcast_received(&mut self, message: &TakeDamage) -> ResourceResult<DamageOutcome> {
        if message.container != self.id {
            return Err(self.fail(ResourceError::WrongContainer {
                expected: self.id,
                got: message.container,
            }));
        }
        tracing::trace!(
            container = %self.id,
            sequence = message.sequence,
            side = self.net_mode.side(),
            "take damage received"
        );

        let component = message.component_index;
        if component.get() >= self.pools.len() {
            return Err(self.out_of_range(component));
        }
        let Ok(instance) = u32::try_from(message.instance_index) else {
            return Err(self.fail(ResourceError::InstanceIndexOutOfRange {
                component,
                index: i64::from(message.instance_index),
                count: self.pools[component.get()].slot_count(),
            }));
        };

        self.pools[component.get()].apply_damage(InstanceIndex(instance), message.magnitude, &message.hit)
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Side this container runs on.
    #[must_use]
    pub const fn net_mode(&self) -> NetMode {
        self.net_mode
    }

    /// Pool `component`, if it exists.
    #[must_use]
    pub fn pool(&self, component: ComponentIndex) -> Option<&InstancePool> {
        self.pools.get(component.get())
    }

    /// Every pool, in index order.
    #[must_use]
    pub fn pools(&self) -> &[InstancePool] {
        &self.pools
    }

    /// Number of pool components.
    #[must_use]
    pub fn num_resource_components(&self) -> usize {
        self.pools.len()
    }

    /// The container's ability system.
    #[must_use]
    pub fn ability_system(&self) -> &SharedAbilitySystem {
        &self.ability_system
    }

    /// Sequence the next broadcast will carry.
    #[must_use]
    pub const fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    /// Health of one instance, if it exists.
    #[must_use]
    pub fn instance_health(&self, component: ComponentIndex, instance: InstanceIndex) -> Option<f32> {
        self.pool(component)?.slot(instance).map(crate::slot::InstanceSlot::health)
    }

    fn resolve_component(&self, hit: &HitResult) -> ResourceResult<ComponentIndex> {
        match hit.component {
            Some(handle) if handle.owner == self.id => match handle.kind {
                ComponentKind::ResourceInstances { index } if index.get() < self.pools.len() => {
                    Ok(index)
                }
                _ => Err(self.foreign(hit)),
            },
            _ => Err(self.foreign(hit)),
        }
    }

    fn foreign(&self, hit: &HitResult) -> ResourceError {
        self.fail(ResourceError::ForeignComponent {
            container: self.id,
            component: hit.component,
        })
    }

    fn out_of_range(&self, component: ComponentIndex) -> ResourceError {
        self.fail(ResourceError::ComponentIndexOutOfRange {
            index: component.0,
            count: self.pools.len(),
        })
    }

    fn fail(&self, error: ResourceError) -> ResourceError {
        report(self.diagnostics.as_ref(), self.net_mode, &error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yield_sink::YieldQueue;
    use castaway_abilities::{EffectSpec, InstigatorHandle, SurvivorAttributes};
    use castaway_core::MemorySink;
    use castaway_networking::MulticastHub;
    use castaway_shared::{ComponentHandle, Vec3};

    struct Fixture {
        container: ResourceContainer,
        diagnostics: Arc<MemorySink>,
        hub: Arc<MulticastHub>,
        player: SharedAbilitySystem,
    }

    fn fixture(net_mode: NetMode) -> Fixture {
        let diagnostics = MemorySink::shared();
        let hub = Arc::new(MulticastHub::new());
        let services = ContainerServices {
            diagnostics: diagnostics.clone(),
            yields: YieldQueue::shared(),
            multicast: hub.clone(),
        };
        let mut container =
            ResourceContainer::new(EntityId(5), net_mode, &ContainerConfig::default(), services)
                .expect("default config is valid");
        let oak = Arc::new(
            ResourceDefinition::new("oak", 10.0)
                .with_required_tags(["Chop"].into_iter().collect())
                .with_tool_strength(2.0),
        );
        let transforms: Vec<Transform> = (0..4)
            .map(|i| Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        container
            .spawn_resource_group(ComponentIndex(0), oak, &transforms)
            .expect("spawns");

        let player = AbilitySystem::new("player", ReplicationMode::Mixed)
            .with_attribute_set(AttributeSet::Survivor(SurvivorAttributes::with_tool_strength(3.0)))
            .into_shared();
        Fixture {
            container,
            diagnostics,
            hub,
            player,
        }
    }

    fn chop(f: &Fixture, component: u8, instance: u32, magnitude: f32) -> EffectModCallbackData {
        let handle = ComponentHandle::resource_instances(EntityId(5), ComponentIndex(component));
        let spec = EffectSpec::new("chop")
            .with_source_tags(["Chop"].into_iter().collect())
            .with_instigator(InstigatorHandle::new("player", &f.player))
            .with_hit(HitResult::on_instance(handle, InstanceIndex(instance), Vec3::ZERO));
        EffectModCallbackData::damage(spec, magnitude)
    }

    #[test]
    fn test_pools_are_fixed() {
        let f = fixture(NetMode::DedicatedServer);
        assert_eq!(f.container.num_resource_components(), 10);
        for (i, pool) in f.container.pools().iter().enumerate() {
            assert_eq!(pool.component_index(), ComponentIndex(i as u8));
        }
    }

    #[test]
    fn test_spawn_out_of_range_is_noop() {
        let mut f = fixture(NetMode::DedicatedServer);
        let result = f.container.spawn_resource_group(
            ComponentIndex(10),
            Arc::new(ResourceDefinition::new("rock", 5.0)),
            &[Transform::IDENTITY],
        );
        assert!(matches!(
            result,
            Err(ResourceError::ComponentIndexOutOfRange { index: 10, count: 10 })
        ));
        assert_eq!(f.diagnostics.count_code("resource.component_out_of_range"), 1);
    }

    #[test]
    fn test_receive_effect_broadcasts_and_applies() {
        let mut f = fixture(NetMode::ListenServer);
        let mut inbox = f.hub.connect(f.diagnostics.clone());
        let data = chop(&f, 0, 2, 4.0);

        let results = f.container.receive_effect(data);
        assert_eq!(results.len(), 1);
        let message = results[0].clone().expect("broadcast");
        assert_eq!(message.sequence, 0);
        assert_eq!(message.instance_index, 2);
        assert_eq!(message.magnitude, 4.0);

        assert_eq!(
            f.container.instance_health(ComponentIndex(0), InstanceIndex(2)),
            Some(6.0)
        );
        assert_eq!(inbox.drain(), vec![message]);
        assert_eq!(f.container.next_sequence(), 1);
    }

    #[test]
    fn test_client_cannot_originate() {
        let mut f = fixture(NetMode::Client);
        let data = chop(&f, 0, 0, 4.0);
        let results = f.container.receive_effect(data);

        assert!(matches!(
            results.as_slice(),
            [Err(ResourceError::NotAuthoritative { net_mode: NetMode::Client })]
        ));
        assert_eq!(f.container.instance_health(ComponentIndex(0), InstanceIndex(0)), Some(10.0));
    }

    #[test]
    fn test_missing_hit_does_not_broadcast() {
        let mut f = fixture(NetMode::DedicatedServer);
        let inbox = f.hub.connect(f.diagnostics.clone());
        let spec = EffectSpec::new("chop").with_instigator(InstigatorHandle::new("player", &f.player));
        let event = DamageReceived { magnitude: 5.0, spec };

        assert!(matches!(
            f.container.on_damage_received(&event),
            Err(ResourceError::MissingHitResult { .. })
        ));
        assert_eq!(inbox.pending(), 0);
        assert_eq!(f.container.next_sequence(), 0);
    }

    #[test]
    fn test_foreign_component_is_discarded() {
        let mut f = fixture(NetMode::DedicatedServer);
        let inbox = f.hub.connect(f.diagnostics.clone());

        let other_owner = ComponentHandle::resource_instances(EntityId(6), ComponentIndex(0));
        let root = ComponentHandle {
            owner: EntityId(5),
            kind: ComponentKind::Root,
        };
        for handle in [other_owner, root] {
            let mut data = chop(&f, 0, 0, 5.0);
            data.spec.context.hit_result = Some(HitResult::on_instance(handle, InstanceIndex(0), Vec3::ZERO));
            let results = f.container.receive_effect(data);
            assert!(matches!(results.as_slice(), [Err(ResourceError::ForeignComponent { .. })]));
        }
        assert_eq!(inbox.pending(), 0);
        assert_eq!(f.diagnostics.count_code("resource.foreign_component"), 2);
    }

    #[test]
    fn test_unspawned_component_does_not_broadcast() {
        let mut f = fixture(NetMode::DedicatedServer);
        let data = chop(&f, 3, 0, 5.0);
        let results = f.container.receive_effect(data);
        assert!(matches!(results.as_slice(), [Err(ResourceError::DefinitionUnset { .. })]));
        assert_eq!(f.container.next_sequence(), 0);
    }

    #[test]
    fn test_broadcast_component_out_of_range_is_noop() {
        let mut f = fixture(NetMode::Client);
        let message = TakeDamage {
            container: EntityId(5),
            sequence: 0,
            instance_index: 0,
            component_index: ComponentIndex(12),
            magnitude: 3.0,
            hit: HitResult::default(),
        };
        assert!(matches!(
            f.container.on_broadcast_received(&message),
            Err(ResourceError::ComponentIndexOutOfRange { index: 12, .. })
        ));

        let negative = TakeDamage {
            component_index: ComponentIndex(0),
            instance_index: -1,
            ..message
        };
        assert!(matches!(
            f.container.on_broadcast_received(&negative),
            Err(ResourceError::InstanceIndexOutOfRange { index: -1, .. })
        ));

        let misrouted = TakeDamage {
            container: EntityId(99),
            component_index: ComponentIndex(0),
            ..message
        };
        assert!(matches!(
            f.container.on_broadcast_received(&misrouted),
            Err(ResourceError::WrongContainer { .. })
        ));
        assert!(f
            .container
            .pool(ComponentIndex(0))
            .is_some_and(|pool| pool.slots().iter().all(|s| s.health() == 10.0)));
    }
}

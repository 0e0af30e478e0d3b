//! Integration test for server-authoritative resource damage.
//!
//! Every scenario runs a server world and two client worlds connected
//! through the multicast hub, and checks both the authoritative state and
//! the replicas.

use castaway::{ClientWorld, PumpStats, ServerWorld, WorldError};
use castaway_abilities::{
    AbilitySystem, AttributeSet, EffectModCallbackData, EffectSpec, InstigatorHandle,
    ReplicationMode, SharedAbilitySystem, SurvivorAttributes,
};
use castaway_core::MemorySink;
use castaway_networking::TakeDamage;
use castaway_shared::{
    ComponentHandle, ComponentIndex, EntityId, HitResult, InstanceIndex, NetMode, Transform, Vec3,
};
use castaway_world::{
    ContainerConfig, ContainerServices, DamageOutcome, ResourceContainer, ResourceDefinition,
    ResourceError, SlotState,
};
use std::sync::Arc;

const ISLAND: EntityId = EntityId(1);

struct Island {
    server: ServerWorld,
    clients: Vec<ClientWorld>,
    diagnostics: Arc<MemorySink>,
}

impl Island {
    fn pump(&mut self) -> Vec<PumpStats> {
        self.clients.iter_mut().map(ClientWorld::pump).collect()
    }

    fn health(world_health: Option<f32>) -> f32 {
        world_health.expect("instance exists")
    }

    fn server_health(&self, component: u8, instance: u32) -> f32 {
        Self::health(
            self.server
                .container(ISLAND)
                .and_then(|c| c.instance_health(ComponentIndex(component), InstanceIndex(instance))),
        )
    }

    fn client_health(&self, client: usize, component: u8, instance: u32) -> f32 {
        Self::health(
            self.clients[client]
                .container(ISLAND)
                .and_then(|c| c.instance_health(ComponentIndex(component), InstanceIndex(instance))),
        )
    }
}

fn config() -> ContainerConfig {
    ContainerConfig {
        num_resource_components: 3,
        max_instances_per_component: 16,
        ..ContainerConfig::default()
    }
}

fn line(n: usize) -> Vec<Transform> {
    (0..n)
        .map(|i| Transform::from_translation(Vec3::new(i as f32 * 2.0, 0.0, 0.0)))
        .collect()
}

/// One container, `definition` spawned into component 0 with four instances.
fn island(definition: ResourceDefinition) -> Island {
    let diagnostics = MemorySink::shared();
    let definition = Arc::new(definition);

    let mut server = ServerWorld::new(NetMode::DedicatedServer, config(), diagnostics.clone())
        .expect("server world");
    server.add_container(ISLAND).expect("new container");
    server
        .spawn_resource_group(ISLAND, ComponentIndex(0), definition.clone(), &line(4))
        .expect("server spawn");

    let clients = (0..2)
        .map(|_| {
            let mut client = ClientWorld::new(config(), server.connect_client(), diagnostics.clone())
                .expect("client world");
            client.add_container(ISLAND).expect("new container");
            client
                .spawn_resource_group(ISLAND, ComponentIndex(0), definition.clone(), &line(4))
                .expect("client spawn");
            client
        })
        .collect();

    Island {
        server,
        clients,
        diagnostics,
    }
}

fn tree() -> ResourceDefinition {
    ResourceDefinition::new("tree", 10.0)
        .with_required_tags(["Chop"].into_iter().collect())
        .with_tool_strength(2.0)
        .with_yield("log", 2)
}

fn survivor(tool_strength: f32) -> SharedAbilitySystem {
    AbilitySystem::new("survivor", ReplicationMode::Mixed)
        .with_attribute_set(AttributeSet::Survivor(SurvivorAttributes::with_tool_strength(
            tool_strength,
        )))
        .into_shared()
}

fn hit(component: u8, instance: u32) -> HitResult {
    HitResult::on_instance(
        ComponentHandle::resource_instances(ISLAND, ComponentIndex(component)),
        InstanceIndex(instance),
        Vec3::ZERO,
    )
}

fn swing(
    instigator: &SharedAbilitySystem,
    tags: &[&str],
    hit: Option<HitResult>,
    magnitude: f32,
) -> EffectModCallbackData {
    let mut spec = EffectSpec::new("swing")
        .with_source_tags(tags.iter().copied().collect())
        .with_instigator(InstigatorHandle::new("survivor", instigator));
    spec.context.hit_result = hit;
    EffectModCallbackData::damage(spec, magnitude)
}

fn single_broadcast(results: Vec<Result<TakeDamage, ResourceError>>) -> TakeDamage {
    assert_eq!(results.len(), 1, "one damage notification per effect");
    results.into_iter().next().expect("one result").expect("broadcast issued")
}

#[test]
fn test_sufficient_tool_depletes_everywhere() {
    let mut island = island(tree());
    let player = survivor(3.0);

    let results = island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 1)), 10.0))
        .expect("known container");
    let message = single_broadcast(results);
    assert_eq!(message.magnitude, 10.0);
    assert_eq!(message.instance_index, 1);
    assert_eq!(message.component_index, ComponentIndex(0));

    assert_eq!(island.server_health(0, 1), 0.0);
    let slot_state = island
        .server
        .container(ISLAND)
        .and_then(|c| c.pool(ComponentIndex(0)))
        .and_then(|pool| pool.slot(InstanceIndex(1)))
        .map(|slot| slot.state());
    assert_eq!(slot_state, Some(SlotState::Depleted));

    for stats in island.pump() {
        assert_eq!(stats.received, 1);
        assert_eq!(stats.depleted, 1);
    }
    for client in 0..2 {
        assert_eq!(island.client_health(client, 0, 1), 0.0);
        assert_eq!(island.client_health(client, 0, 0), 10.0);
        let yields = island.clients[client].yields().drain();
        assert_eq!(yields.len(), 1);
        assert_eq!(yields[0].side, NetMode::Client);
        assert_eq!(yields[0].yield_item.as_deref(), Some("log"));
    }
    assert_eq!(island.server.yields().drain().len(), 1);
}

#[test]
fn test_weak_tool_broadcasts_zero() {
    let mut island = island(tree());
    let player = survivor(1.0);

    let results = island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 0)), 10.0))
        .expect("known container");
    let message = single_broadcast(results);
    assert_eq!(message.magnitude, 0.0);
    assert_eq!(island.server_health(0, 0), 10.0);
    assert_eq!(island.diagnostics.count_code("requirement.tool_strength_insufficient"), 1);

    for stats in island.pump() {
        assert_eq!(stats.received, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.applied, 0);
    }
    assert_eq!(island.client_health(0, 0, 0), 10.0);
    assert_eq!(island.client_health(1, 0, 0), 10.0);
}

#[test]
fn test_wrong_tags_rejected_regardless_of_strength() {
    let rock = ResourceDefinition::new("rock", 10.0)
        .with_required_tags(["Mine"].into_iter().collect())
        .with_tool_strength(1.0);
    let mut island = island(rock);
    let player = survivor(1000.0);

    let results = island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 2)), 10.0))
        .expect("known container");
    assert_eq!(single_broadcast(results).magnitude, 0.0);
    assert_eq!(island.diagnostics.count_code("requirement.missing_tags"), 1);
    assert_eq!(island.diagnostics.count_code("requirement.tool_strength_insufficient"), 0);

    island.pump();
    assert_eq!(island.client_health(0, 0, 2), 10.0);
}

#[test]
fn test_missing_hit_does_not_broadcast() {
    let mut island = island(tree());
    let player = survivor(3.0);

    let results = island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], None, 10.0))
        .expect("known container");
    assert!(matches!(
        results.as_slice(),
        [Err(ResourceError::MissingHitResult { .. })]
    ));
    assert_eq!(island.server.multicast_stats().messages_sent, 0);
    assert_eq!(island.diagnostics.count_code("resource.missing_hit"), 1);

    for stats in island.pump() {
        assert_eq!(stats, PumpStats::default());
    }
    assert_eq!(island.server_health(0, 0), 10.0);
}

#[test]
fn test_out_of_range_instance_never_mutates() {
    let mut island = island(tree());
    let player = survivor(3.0);

    let mut negative = hit(0, 0);
    negative.item = -1;
    for target in [hit(0, 4), hit(0, 99), negative] {
        let results = island
            .server
            .apply_effect(ISLAND, swing(&player, &["Chop"], Some(target), 10.0))
            .expect("known container");
        assert!(results[0].is_ok(), "the broadcast itself is issued");
    }

    for stats in island.pump() {
        assert_eq!(stats.received, 3);
        assert_eq!(stats.rejected, 3);
    }
    // server + two clients, three hits each
    assert_eq!(island.diagnostics.count_code("resource.instance_out_of_range"), 9);

    let untouched = |health: f32| health == 10.0;
    for instance in 0..4 {
        assert!(untouched(island.server_health(0, instance)));
        assert!(untouched(island.client_health(0, 0, instance)));
        assert!(untouched(island.client_health(1, 0, instance)));
    }
}

#[test]
fn test_two_hits_one_tick() {
    let mut island = island(tree());
    let player = survivor(3.0);

    let first = single_broadcast(
        island
            .server
            .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 0)), 3.0))
            .expect("known container"),
    );
    let second = single_broadcast(
        island
            .server
            .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 3)), 4.0))
            .expect("known container"),
    );

    assert_eq!((first.sequence, first.instance_index, first.magnitude), (0, 0, 3.0));
    assert_eq!((second.sequence, second.instance_index, second.magnitude), (1, 3, 4.0));

    for stats in island.pump() {
        assert_eq!(stats.received, 2);
        assert_eq!(stats.applied, 2);
    }
    for client in 0..2 {
        assert_eq!(island.client_health(client, 0, 0), 7.0);
        assert_eq!(island.client_health(client, 0, 3), 6.0);
        assert_eq!(island.client_health(client, 0, 1), 10.0);
    }
    assert_eq!(
        island.server.containers().health_snapshot(),
        island.clients[0].containers().health_snapshot()
    );
    assert_eq!(island.diagnostics.count_code("net.sequence_gap"), 0);
}

#[test]
fn test_foreign_component_is_discarded() {
    let mut island = island(tree());
    let player = survivor(3.0);

    let other = HitResult::on_instance(
        ComponentHandle::resource_instances(EntityId(2), ComponentIndex(0)),
        InstanceIndex(0),
        Vec3::ZERO,
    );
    let results = island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(other), 10.0))
        .expect("known container");
    assert!(matches!(
        results.as_slice(),
        [Err(ResourceError::ForeignComponent { .. })]
    ));
    assert_eq!(island.server.multicast_stats().messages_sent, 0);
}

#[test]
fn test_component_index_out_of_range() {
    let mut island = island(tree());

    let result = island.server.spawn_resource_group(
        ISLAND,
        ComponentIndex(3),
        Arc::new(tree()),
        &line(2),
    );
    assert!(matches!(
        result,
        Err(WorldError::Resource(ResourceError::ComponentIndexOutOfRange { index: 3, count: 3 }))
    ));
    assert_eq!(island.diagnostics.count_code("resource.component_out_of_range"), 1);

    let diagnostics = MemorySink::shared();
    let mut replica = ResourceContainer::new(
        ISLAND,
        NetMode::Client,
        &config(),
        ContainerServices::standalone(diagnostics.clone()),
    )
    .expect("valid config");
    let message = TakeDamage {
        container: ISLAND,
        sequence: 0,
        instance_index: 0,
        component_index: ComponentIndex(200),
        magnitude: 5.0,
        hit: HitResult::default(),
    };
    assert!(matches!(
        replica.on_broadcast_received(&message),
        Err(ResourceError::ComponentIndexOutOfRange { index: 200, count: 3 })
    ));
    assert_eq!(diagnostics.count_code("resource.component_out_of_range"), 1);
}

#[test]
fn test_hit_on_depleted_instance_is_inert() {
    let mut island = island(tree());
    let player = survivor(3.0);

    for _ in 0..3 {
        island
            .server
            .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 2)), 10.0))
            .expect("known container");
    }
    let outcomes = island.pump();
    assert_eq!(outcomes[0].depleted, 1);
    assert_eq!(outcomes[0].ignored, 2);
    assert_eq!(island.server.yields().len(), 1);
    assert_eq!(island.clients[1].yields().len(), 1);
}

#[test]
fn test_unknown_container_on_client() {
    let diagnostics = MemorySink::shared();
    let mut server = ServerWorld::new(NetMode::ListenServer, config(), diagnostics.clone())
        .expect("server world");
    server.add_container(ISLAND).expect("new container");
    server
        .spawn_resource_group(ISLAND, ComponentIndex(0), Arc::new(tree()), &line(1))
        .expect("spawn");
    let mut client = ClientWorld::new(config(), server.connect_client(), diagnostics.clone())
        .expect("client world");

    server
        .apply_effect(ISLAND, swing(&survivor(3.0), &["Chop"], Some(hit(0, 0)), 1.0))
        .expect("known container");
    let stats = client.pump();
    assert_eq!(stats.rejected, 1);
    assert_eq!(diagnostics.count_code("world.unknown_container"), 1);

    assert!(matches!(
        server.apply_effect(EntityId(42), swing(&survivor(3.0), &["Chop"], Some(hit(0, 0)), 1.0)),
        Err(WorldError::UnknownContainer(EntityId(42)))
    ));
}

#[test]
fn test_infinite_damage_depletes_everywhere() {
    let mut island = island(tree());
    let results = island
        .server
        .apply_effect(ISLAND, swing(&survivor(3.0), &["Chop"], Some(hit(0, 2)), f32::INFINITY))
        .expect("known container");
    assert_eq!(results.len(), 1);
    island.pump();

    assert_eq!(island.server_health(0, 2), 0.0);
    assert_eq!(island.client_health(0, 0, 2), 0.0);
    assert_eq!(island.client_health(1, 0, 2), 0.0);
    assert_eq!(island.server.yields().len(), 1);
    assert_eq!(island.clients[0].yields().len(), 1);
}

#[test]
fn test_late_joiner_reports_to_own_sink() {
    let server_diagnostics = MemorySink::shared();
    let mut server = ServerWorld::new(NetMode::ListenServer, config(), server_diagnostics.clone())
        .expect("server world");
    server.add_container(ISLAND).expect("new container");
    server
        .spawn_resource_group(ISLAND, ComponentIndex(0), Arc::new(tree()), &line(2))
        .expect("spawn");
    let player = survivor(3.0);
    server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 0)), 1.0))
        .expect("known container");

    let client_diagnostics = MemorySink::shared();
    let mut client = ClientWorld::new(config(), server.connect_client(), client_diagnostics.clone())
        .expect("client world");
    client.add_container(ISLAND).expect("new container");
    client
        .spawn_resource_group(ISLAND, ComponentIndex(0), Arc::new(tree()), &line(2))
        .expect("spawn");

    server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 1)), 4.0))
        .expect("known container");
    server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 1)), 4.0))
        .expect("known container");
    let stats = client.pump();

    assert_eq!(stats.applied, 2);
    assert_eq!(
        client
            .container(ISLAND)
            .and_then(|c| c.instance_health(ComponentIndex(0), InstanceIndex(1))),
        Some(2.0)
    );
    assert!(client_diagnostics.records().is_empty());
    assert!(server_diagnostics.records().is_empty());
}

#[test]
fn test_server_world_requires_authority() {
    let diagnostics = MemorySink::shared();
    let result = ServerWorld::new(NetMode::Client, config(), diagnostics.clone());
    assert!(matches!(
        result,
        Err(WorldError::NotAuthoritative { net_mode: NetMode::Client })
    ));
    assert_eq!(diagnostics.count_code("world.not_authoritative"), 1);
}

#[test]
fn test_outcome_of_local_apply_matches_client() {
    let mut island = island(tree());
    let player = survivor(3.0);
    island
        .server
        .apply_effect(ISLAND, swing(&player, &["Chop"], Some(hit(0, 0)), 4.0))
        .expect("known container");

    let mut replica = ResourceContainer::new(
        ISLAND,
        NetMode::Client,
        &config(),
        ContainerServices::standalone(MemorySink::shared()),
    )
    .expect("valid config");
    replica
        .spawn_resource_group(ComponentIndex(0), Arc::new(tree()), &line(4))
        .expect("spawn");
    let message = TakeDamage {
        container: ISLAND,
        sequence: 0,
        instance_index: 0,
        component_index: ComponentIndex(0),
        magnitude: 4.0,
        hit: hit(0, 0),
    };
    assert_eq!(
        replica.on_broadcast_received(&message),
        Ok(DamageOutcome::Damaged { remaining: 6.0 })
    );
    assert_eq!(island.server_health(0, 0), 6.0);
}

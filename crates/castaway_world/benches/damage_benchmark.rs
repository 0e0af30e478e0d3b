//! Benchmark for the resource damage path.
//!
//! TARGET: 100,000 validated hits per second per container
//!
//! Run with: cargo bench --package castaway_world --bench damage_benchmark

#![allow(missing_docs)]

use castaway_abilities::{
    AbilitySystem, AttributeSet, EffectModCallbackData, EffectSpec, InstigatorHandle,
    ReplicationMode, SurvivorAttributes,
};
use castaway_core::MemorySink;
use castaway_shared::{
    ComponentHandle, ComponentIndex, EntityId, HitResult, InstanceIndex, NetMode, Transform, Vec3,
};
use castaway_world::{
    ContainerConfig, ContainerServices, RequirementValidator, ResourceContainer, ResourceDefinition,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

const INSTANCES: u32 = 2048;

fn oak() -> Arc<ResourceDefinition> {
    Arc::new(
        ResourceDefinition::new("oak", f32::MAX)
            .with_required_tags(["Tool.Axe"].into_iter().collect())
            .with_tool_strength(2.0),
    )
}

fn container() -> ResourceContainer {
    let services = ContainerServices::standalone(MemorySink::shared());
    let mut container = ResourceContainer::new(
        EntityId(1),
        NetMode::Standalone,
        &ContainerConfig::default(),
        services,
    )
    .expect("default config is valid");
    let transforms: Vec<Transform> = (0..INSTANCES)
        .map(|i| Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)))
        .collect();
    container
        .spawn_resource_group(ComponentIndex(0), oak(), &transforms)
        .expect("spawns");
    container
}

fn hit(instance: u32) -> HitResult {
    let handle = ComponentHandle::resource_instances(EntityId(1), ComponentIndex(0));
    HitResult::on_instance(handle, InstanceIndex(instance), Vec3::ZERO)
}

/// Validator check alone.
fn benchmark_validator(c: &mut Criterion) {
    let player = AbilitySystem::new("player", ReplicationMode::Mixed)
        .with_attribute_set(AttributeSet::Survivor(SurvivorAttributes::with_tool_strength(3.0)))
        .into_shared();
    let spec = EffectSpec::new("chop")
        .with_source_tags(["Tool.Axe.Stone"].into_iter().collect())
        .with_instigator(InstigatorHandle::new("player", &player));
    let definition = oak();

    c.bench_function("requirement_check", |b| {
        b.iter(|| RequirementValidator::check(black_box(&spec), black_box(&definition)));
    });
}

/// Effect in, broadcast out, local apply.
fn benchmark_receive_effect(c: &mut Criterion) {
    let mut container = container();
    let player = AbilitySystem::new("player", ReplicationMode::Mixed)
        .with_attribute_set(AttributeSet::Survivor(SurvivorAttributes::with_tool_strength(3.0)))
        .into_shared();

    let mut group = c.benchmark_group("receive_effect");
    group.throughput(Throughput::Elements(1));
    group.bench_function("validated_hit", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = (i + 1) % INSTANCES;
            let spec = EffectSpec::new("chop")
                .with_source_tags(["Tool.Axe"].into_iter().collect())
                .with_instigator(InstigatorHandle::new("player", &player))
                .with_hit(hit(i));
            black_box(container.receive_effect(EffectModCallbackData::damage(spec, 1.0)))
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_validator, benchmark_receive_effect);
criterion_main!(benches);

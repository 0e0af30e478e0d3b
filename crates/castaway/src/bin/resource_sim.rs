//! # Resource Simulation
//!
//! Headless listen server plus two clients sharing one island. Survivors
//! with different tools hit random instances; every hit goes through the
//! server's validator and is replicated to both clients.
//!
//! At the end the client replicas must match the server exactly.
//!
//! ```bash
//! resource_sim                      # uses data/world.toml
//! resource_sim path/to/world.toml 500
//! ```

use castaway::{ClientWorld, ServerWorld};
use castaway_abilities::{
    AbilitySystem, AttributeSet, EffectModCallbackData, EffectSpec, InstigatorHandle,
    ReplicationMode, SharedAbilitySystem, SurvivorAttributes,
};
use castaway_core::{debug_sink, ScreenLog};
use castaway_shared::{ComponentHandle, ComponentIndex, HitResult, InstanceIndex, NetMode, TagContainer, Vec3};
use castaway_world::WorldConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_CONFIG: &str = "data/world.toml";
const DEFAULT_TICKS: usize = 300;
const HITS_PER_TICK: usize = 4;
const HIT_DAMAGE: f32 = 12.0;

/// A survivor swinging one tool.
struct Survivor {
    name: &'static str,
    tool_tags: TagContainer,
    ability_system: SharedAbilitySystem,
}

impl Survivor {
    fn new(name: &'static str, tags: &[&str], tool_strength: f32) -> Self {
        let ability_system = AbilitySystem::new(name, ReplicationMode::Mixed)
            .with_attribute_set(AttributeSet::Survivor(SurvivorAttributes::with_tool_strength(
                tool_strength,
            )))
            .into_shared();
        Self {
            name,
            tool_tags: tags.iter().copied().collect(),
            ability_system,
        }
    }

    fn swing(&self, hit: HitResult) -> EffectModCallbackData {
        let spec = EffectSpec::new(format!("{}.swing", self.name))
            .with_source_tags(self.tool_tags.clone())
            .with_instigator(InstigatorHandle::new(self.name, &self.ability_system))
            .with_hit(hit);
        EffectModCallbackData::damage(spec, HIT_DAMAGE)
    }
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                  CASTAWAY RESOURCE SIMULATION");
    println!("═══════════════════════════════════════════════════════════════════");

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let config = match WorldConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            std::process::exit(1);
        }
    };

    let screen = Arc::new(ScreenLog::default());
    let diagnostics = debug_sink(screen.clone());

    let built = ServerWorld::from_config(NetMode::ListenServer, &config, diagnostics.clone())
        .and_then(|server| {
            let clients = (0..2)
                .map(|_| ClientWorld::from_config(&config, server.connect_client(), diagnostics.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((server, clients))
        });
    let (mut server, mut clients) = match built {
        Ok(worlds) => worlds,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            std::process::exit(1);
        }
    };

    let targets: Vec<(ComponentHandle, ComponentIndex, u32)> = server
        .containers()
        .iter()
        .flat_map(|container| {
            container
                .pools()
                .iter()
                .filter(|pool| pool.slot_count() > 0)
                .map(|pool| {
                    let index = pool.component_index();
                    (
                        ComponentHandle::resource_instances(container.id(), index),
                        index,
                        pool.slot_count() as u32,
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect();
    if targets.is_empty() {
        eprintln!("   ✗ FATAL: {path} spawns nothing");
        std::process::exit(1);
    }

    println!("  Config:     {path}");
    println!("  Containers: {}", server.containers().len());
    println!("  Instances:  {}", server.containers().health_snapshot().len());
    println!("  Clients:    {}", server.observer_count());
    println!("  Ticks:      {ticks}");
    println!();

    let survivors = [
        Survivor::new("lumberjack", &["Chop", "Tool.Axe"], 2.0),
        Survivor::new("quarryman", &["Mine", "Tool.Pickaxe"], 3.0),
        Survivor::new("castaway", &["Chop", "Mine"], 1.0),
    ];

    let mut rng = ChaCha8Rng::seed_from_u64(0xCA57_A3A7);
    let mut broadcasts = 0usize;
    let mut rejected = 0usize;
    let start = Instant::now();

    for _ in 0..ticks {
        for _ in 0..HITS_PER_TICK {
            let (handle, component, count) = targets[rng.gen_range(0..targets.len())];
            let instance = InstanceIndex(rng.gen_range(0..count));
            let survivor = &survivors[rng.gen_range(0..survivors.len())];

            let impact = server
                .container(handle.owner)
                .and_then(|container| container.pool(component))
                .and_then(|pool| pool.slot(instance))
                .map_or(Vec3::ZERO, |slot| slot.transform().translation);
            let hit = HitResult::on_instance(handle, instance, impact);

            match server.apply_effect(handle.owner, survivor.swing(hit)) {
                Ok(results) => {
                    for message in results.into_iter().flatten() {
                        broadcasts += 1;
                        if message.magnitude == 0.0 {
                            rejected += 1;
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "effect not applied"),
            }
        }
        for client in &mut clients {
            client.pump();
        }
    }

    let elapsed = start.elapsed();
    let truth = server.containers().health_snapshot();
    let server_depleted = server.yields().drain();

    println!("  Broadcasts: {broadcasts} ({rejected} rejected by requirements)");
    println!("  Depleted:   {} instances", server_depleted.len());
    let stats = server.multicast_stats();
    println!(
        "  Multicast:  {} packets, {} bytes",
        stats.packets_delivered, stats.bytes_sent
    );
    println!("  Elapsed:    {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    println!();

    let mut converged = true;
    for (i, client) in clients.iter().enumerate() {
        let replica = client.containers().health_snapshot();
        let matches = replica == truth;
        let depleted = client.yields().drain().len();
        println!(
            "  Client {i}: {} ({depleted} depletions seen)",
            if matches { "CONVERGED ✓" } else { "DIVERGED ✗" }
        );
        converged &= matches && depleted == server_depleted.len();
    }

    let messages = screen.visible();
    if !messages.is_empty() {
        println!();
        println!("  Recent diagnostics:");
        for message in messages.iter().rev().take(8) {
            println!("    {}", message.text);
        }
    }

    if !converged {
        std::process::exit(1);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for a Rift Siege encounter.
//!
//! Boots a world with stock templates, wires the director, skill scheduler,
//! and basic combat into the command/event loop, and steps the simulation at
//! a fixed rate until the chapter completes. Every event is printed as one
//! log line, so two runs with the same seed produce byte-identical output.

mod templates;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::Rng;

use rift_siege_core::{ActorKind, Command, Event, TemplateSource};
use rift_siege_pool::PoolConfig;
use rift_siege_system_bootstrap::{Bootstrap, EncounterSetup};
use rift_siege_system_combat::BasicCombat;
use rift_siege_system_director::{ChapterPlan, Director, DirectorConfig, StagePlan};
use rift_siege_system_skills::{default_tables, SchedulerConfig, SkillScheduler};
use rift_siege_world::{apply, query, FlatArena, World};

use templates::StockTemplates;

const PLAYER_SWING_INTERVAL: Duration = Duration::from_millis(600);
const PLAYER_SWING_RANGE: f32 = 14.0;
const PLAYER_SWING_DAMAGE: rift_siege_core::Damage = rift_siege_core::Damage::new(7);

/// Command-line arguments for the encounter runner.
#[derive(Debug, Parser)]
#[command(name = "rift-siege", about = "Headless wave-encounter simulator")]
struct Args {
    /// Seed shared by the director and the skill scheduler.
    ///
    /// Omitting it picks a random seed and prints it for replays.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of stages in the chapter.
    #[arg(long, default_value_t = 3)]
    stages: u32,

    /// Length of one round in seconds.
    #[arg(long, default_value_t = 45)]
    round_secs: u64,

    /// Fixed simulation step in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Safety cap on the number of ticks before the runner gives up.
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,

    /// Instances preallocated per actor kind at startup.
    #[arg(long, default_value_t = 4)]
    pool_prewarm: u32,

    /// Hard cap per actor kind's pool; 0 means unbounded.
    #[arg(long, default_value_t = 24)]
    pool_cap: u32,
}

fn encounter_setup(args: &Args) -> EncounterSetup {
    EncounterSetup {
        pool_config: PoolConfig::new(args.pool_prewarm, args.pool_cap),
        ..EncounterSetup::default()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
    println!("seed {seed}");

    let templates = StockTemplates;
    let mut world = World::new();
    let bootstrap = Bootstrap::new(encounter_setup(&args));
    bootstrap
        .prepare_pools(&mut world, &templates)
        .context("preparing actor pools")?;

    let arena = FlatArena::centered(40.0);
    let mut director = Director::new(
        DirectorConfig {
            round_duration: Duration::from_secs(args.round_secs),
            rng_seed: seed,
            ..DirectorConfig::default()
        },
        chapter_plan(args.stages),
        collision_radii(&templates)?,
    );
    let mut scheduler = SkillScheduler::new(
        SchedulerConfig {
            rng_seed: seed,
            ..SchedulerConfig::default()
        },
        default_tables(),
    );
    let mut combat = BasicCombat::new();

    let dt = Duration::from_millis(args.tick_ms);
    let mut events = Vec::new();
    for command in bootstrap.opening_commands() {
        apply(&mut world, command, &mut events);
    }

    // The player shoots back on a fixed cadence so rounds can complete by
    // attrition instead of relying solely on the round timer.
    let mut retaliation = Duration::ZERO;

    for tick in 0..args.max_ticks {
        let actors = query::actor_view(&world);
        let player = query::player(&world);

        let mut commands = Vec::new();
        director.handle(&events, &actors, &player, &arena, &mut commands);
        scheduler.handle(&events, &actors, &player, &arena, &mut commands);
        combat.handle(&events, &actors, &player, &mut commands);

        retaliation = retaliation.saturating_add(dt);
        if retaliation >= PLAYER_SWING_INTERVAL {
            retaliation = Duration::ZERO;
            let target = actors
                .iter()
                .filter(|snapshot| {
                    snapshot.position.distance(player.position) <= PLAYER_SWING_RANGE
                })
                .min_by(|a, b| {
                    a.position
                        .distance(player.position)
                        .total_cmp(&b.position.distance(player.position))
                });
            if let Some(snapshot) = target {
                commands.push(Command::DamageActor {
                    actor: snapshot.id,
                    amount: PLAYER_SWING_DAMAGE,
                });
            }
        }
        commands.push(Command::Tick { dt });

        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        let now = query::clock(&world);
        for event in &events {
            if let Some(line) = describe(event) {
                println!("[{:>7.2}s] {line}", now.as_secs_f64());
            }
        }

        if director.is_chapter_complete() {
            let player = query::player(&world);
            println!(
                "chapter complete after {tick} ticks; player health {}",
                player.health.get(),
            );
            return Ok(());
        }
        if query::player(&world).health.is_depleted() {
            println!("player defeated at {:.2}s", now.as_secs_f64());
            return Ok(());
        }
    }

    anyhow::bail!("chapter did not finish within {} ticks", args.max_ticks)
}

fn chapter_plan(stages: u32) -> ChapterPlan {
    // Later stages field more and tougher kinds; the last stage always
    // brings a Colossus.
    let bosses = [
        ActorKind::Brute,
        ActorKind::Stalker,
        ActorKind::Warden,
        ActorKind::Ravager,
        ActorKind::Harbinger,
    ];
    let plans = (0..stages)
        .map(|stage| {
            let mut entries = vec![(ActorKind::Husk, 3 + stage)];
            entries.push((bosses[stage as usize % bosses.len()], 1));
            if stage + 1 == stages {
                entries.push((ActorKind::Colossus, 1));
            }
            StagePlan::new(entries)
        })
        .collect();
    ChapterPlan::new(plans)
}

fn collision_radii(templates: &StockTemplates) -> anyhow::Result<BTreeMap<ActorKind, f32>> {
    let mut radii = BTreeMap::new();
    for kind in ActorKind::ALL {
        let template = templates
            .load_template(kind)
            .with_context(|| format!("loading template for {kind:?}"))?;
        let _ = radii.insert(kind, template.radius);
    }
    Ok(radii)
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::StageBegan { stage } => Some(format!("stage {} began", stage.get())),
        Event::ActorSpawned {
            actor,
            kind,
            position,
        } => Some(format!(
            "{kind:?} #{} spawned at ({:.1}, {:.1})",
            actor.slot(),
            position.x(),
            position.z(),
        )),
        Event::ActorEvicted { actor, kind } => {
            Some(format!("{kind:?} #{} evicted under pool pressure", actor.slot()))
        }
        Event::SpawnRejected { kind } => Some(format!("{kind:?} spawn rejected")),
        Event::ActorDied { actor, kind } => Some(format!("{kind:?} #{} died", actor.slot())),
        Event::SpawningFinished { stage } => {
            Some(format!("stage {} spawning finished", stage.get()))
        }
        Event::RoundCompleted { stage, expired } => Some(if *expired {
            format!("stage {} round expired", stage.get())
        } else {
            format!("stage {} round completed", stage.get())
        }),
        Event::TelegraphShown { owner, .. } => {
            Some(format!("{:?} #{} telegraphs", owner.kind(), owner.slot()))
        }
        Event::PlayerDamaged { amount, remaining } => Some(format!(
            "player hit for {} ({} left)",
            amount.get(),
            remaining.get(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_arguments_reach_the_encounter_setup() {
        let args =
            Args::try_parse_from(["rift-siege", "--pool-prewarm", "2", "--pool-cap", "6"])
                .expect("arguments parse");

        let setup = encounter_setup(&args);
        assert_eq!(setup.pool_config.prewarm_count(), 2);
        assert_eq!(setup.pool_config.hard_cap(), 6);
    }

    #[test]
    fn default_pool_arguments_match_the_stock_setup() {
        let args = Args::try_parse_from(["rift-siege"]).expect("arguments parse");
        let setup = encounter_setup(&args);
        assert_eq!(
            setup.pool_config.prewarm_count(),
            EncounterSetup::default().pool_config.prewarm_count(),
        );
    }
}

//! Round lifecycle coverage driven through the public command surface.

use std::time::Duration;

use rift_siege_core::{
    ActorId, ActorKind, ActorTemplate, Command, Damage, Event, Footprint, Health, LoadError,
    StageIndex, Team, TemplateSource, WorldPoint,
};
use rift_siege_pool::PoolConfig;
use rift_siege_world::{apply, query, World};

struct StubTemplates;

impl TemplateSource for StubTemplates {
    fn load_template(&self, kind: ActorKind) -> Result<ActorTemplate, LoadError> {
        Ok(ActorTemplate {
            kind,
            team: Team::Raiders,
            max_health: Health::new(5),
            radius: 0.5,
            move_speed: 2.0,
            attack_range: 1.5,
            attack_damage: Damage::new(2),
            attack_interval: Duration::from_secs(1),
            invulnerable: false,
        })
    }
}

fn prepared_world() -> World {
    let mut world = World::new();
    world
        .initialize_pool(ActorKind::Husk, PoolConfig::new(4, 16), &StubTemplates)
        .expect("husk pool");
    world
}

fn spawn(world: &mut World, x: f32) -> ActorId {
    let mut events = Vec::new();
    apply(
        world,
        Command::SpawnActor {
            kind: ActorKind::Husk,
            position: WorldPoint::new(x, 0.0),
            facing: 0.0,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::ActorSpawned { actor, .. }] => *actor,
        other => panic!("expected ActorSpawned, got {other:?}"),
    }
}

fn kill(world: &mut World, actor: ActorId, events: &mut Vec<Event>) {
    apply(
        world,
        Command::DamageActor {
            actor,
            amount: Damage::new(99),
        },
        events,
    );
}

#[test]
fn round_completes_only_after_spawning_finished_and_arena_cleared() {
    let mut world = prepared_world();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(0),
        },
        &mut events,
    );

    let first = spawn(&mut world, 3.0);
    let second = spawn(&mut world, 5.0);

    events.clear();
    kill(&mut world, first, &mut events);
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::RoundCompleted { .. })),
        "round stays open while spawning may continue",
    );

    events.clear();
    apply(&mut world, Command::MarkSpawningFinished, &mut events);
    assert_eq!(
        events,
        vec![Event::SpawningFinished {
            stage: StageIndex::new(0),
        }],
        "one live actor still blocks completion",
    );

    events.clear();
    kill(&mut world, second, &mut events);
    assert!(
        events.contains(&Event::RoundCompleted {
            stage: StageIndex::new(0),
            expired: false,
        }),
        "last death closes the round, got {events:?}",
    );
    assert!(!query::round_state(&world).round_active);
}

#[test]
fn empty_stage_completes_the_moment_spawning_finishes() {
    let mut world = prepared_world();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(2),
        },
        &mut events,
    );

    events.clear();
    apply(&mut world, Command::MarkSpawningFinished, &mut events);
    assert_eq!(
        events,
        vec![
            Event::SpawningFinished {
                stage: StageIndex::new(2),
            },
            Event::RoundCompleted {
                stage: StageIndex::new(2),
                expired: false,
            },
        ],
    );
}

#[test]
fn marking_spawning_finished_twice_emits_once() {
    let mut world = prepared_world();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(0),
        },
        &mut events,
    );
    let _survivor = spawn(&mut world, 4.0);

    events.clear();
    apply(&mut world, Command::MarkSpawningFinished, &mut events);
    assert_eq!(events.len(), 1);

    events.clear();
    apply(&mut world, Command::MarkSpawningFinished, &mut events);
    assert!(events.is_empty(), "repeat marks are no-ops");
}

#[test]
fn expiry_sweeps_survivors_and_force_completes() {
    let mut world = prepared_world();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(1),
        },
        &mut events,
    );
    let lingering = spawn(&mut world, 6.0);
    let other = spawn(&mut world, 8.0);

    apply(
        &mut world,
        Command::ShowTelegraph {
            owner: lingering,
            footprint: Footprint::Circle {
                center: WorldPoint::new(6.0, 0.0),
                radius: 2.0,
            },
            duration: Duration::from_secs(30),
        },
        &mut events,
    );

    events.clear();
    apply(&mut world, Command::ExpireRound, &mut events);

    let despawned: Vec<ActorId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ActorDespawned { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect();
    assert_eq!(despawned, vec![lingering, other], "sweep removes survivors");
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::TelegraphHidden { .. })),
        "swept actors take their warnings with them",
    );
    assert_eq!(
        events.last(),
        Some(&Event::RoundCompleted {
            stage: StageIndex::new(1),
            expired: true,
        }),
    );
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::ActorDied { .. })),
        "a sweep is not a death",
    );
    assert_eq!(query::round_state(&world).active_actor_count, 0);
    assert_eq!(query::telegraph_view(&world).len(), 0);

    events.clear();
    apply(&mut world, Command::ExpireRound, &mut events);
    assert!(events.is_empty(), "expiring a closed round is a no-op");
}

#[test]
fn begin_stage_resets_the_round_ledger() {
    let mut world = prepared_world();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(0),
        },
        &mut events,
    );
    apply(&mut world, Command::MarkSpawningFinished, &mut events);
    assert!(!query::round_state(&world).round_active);

    events.clear();
    apply(
        &mut world,
        Command::BeginStage {
            stage: StageIndex::new(1),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::StageBegan {
            stage: StageIndex::new(1),
        }],
    );
    let round = query::round_state(&world);
    assert!(round.round_active);
    assert!(!round.spawning_finished);
    assert_eq!(round.stage, StageIndex::new(1));
}

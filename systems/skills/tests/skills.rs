//! Scheduler and world wired together through the command/event loop.

use std::collections::BTreeMap;
use std::time::Duration;

use rift_siege_core::{
    ActorKind, ActorTemplate, Command, Damage, Event, Health, LoadError, Team, TemplateSource,
    WorldPoint,
};
use rift_siege_pool::PoolConfig;
use rift_siege_system_skills::{default_tables, SchedulerConfig, SkillScheduler};
use rift_siege_world::{apply, query, FlatArena, World};

struct StubTemplates;

impl TemplateSource for StubTemplates {
    fn load_template(&self, kind: ActorKind) -> Result<ActorTemplate, LoadError> {
        Ok(ActorTemplate {
            kind,
            team: Team::Raiders,
            max_health: Health::new(60),
            radius: 1.0,
            move_speed: 0.0,
            attack_range: 2.0,
            attack_damage: Damage::new(2),
            attack_interval: Duration::from_secs(1),
            invulnerable: false,
        })
    }
}

#[test]
fn brute_slam_telegraphs_then_damages_the_player() {
    let mut world = World::new();
    world
        .initialize_pool(ActorKind::Brute, PoolConfig::new(1, 4), &StubTemplates)
        .expect("brute pool");

    let arena = FlatArena::centered(30.0);
    let mut scheduler = SkillScheduler::new(
        SchedulerConfig {
            default_gate: Duration::from_millis(500),
            rng_seed: 3,
        },
        default_tables(),
    );

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigurePlayer {
            position: WorldPoint::ORIGIN,
            health: Health::new(100),
        },
        &mut events,
    );
    // Inside the slam's 3.5 radius so the strike is guaranteed to connect.
    apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Brute,
            position: WorldPoint::new(2.0, 0.0),
            facing: 0.0,
        },
        &mut events,
    );

    let mut log = Vec::new();
    for _ in 0..40 {
        let mut commands = Vec::new();
        scheduler.handle(
            &events,
            &query::actor_view(&world),
            &query::player(&world),
            &arena,
            &mut commands,
        );
        commands.push(Command::Tick {
            dt: Duration::from_millis(250),
        });

        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        log.extend(events.iter().cloned());
    }

    assert!(
        log.iter()
            .any(|event| matches!(event, Event::TelegraphShown { .. })),
        "windup must show a telegraph",
    );
    assert!(
        log.iter()
            .any(|event| matches!(event, Event::TelegraphHidden { .. })),
        "windup telegraph must come back down",
    );
    assert!(
        log.iter().any(|event| matches!(
            event,
            Event::CastingChanged { casting: true, .. },
        )),
        "cast lock must engage",
    );
    assert!(
        log.iter().any(|event| matches!(
            event,
            Event::CastingChanged { casting: false, .. },
        )),
        "cast lock must release",
    );
    assert!(
        log.iter()
            .any(|event| matches!(event, Event::PlayerDamaged { .. })),
        "the slam must reach the player, got {log:?}",
    );

    let player = query::player(&world);
    assert!(player.health < Health::new(100));
}

#[test]
fn paused_world_freezes_cooldowns_and_phases() {
    let mut world = World::new();
    world
        .initialize_pool(ActorKind::Brute, PoolConfig::new(1, 4), &StubTemplates)
        .expect("brute pool");

    let arena = FlatArena::centered(30.0);
    let mut scheduler = SkillScheduler::new(SchedulerConfig::default(), default_tables());

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Brute,
            position: WorldPoint::new(2.0, 0.0),
            facing: 0.0,
        },
        &mut events,
    );
    apply(&mut world, Command::SetPaused { paused: true }, &mut events);

    let mut log = Vec::new();
    for _ in 0..40 {
        let mut commands = Vec::new();
        scheduler.handle(
            &events,
            &query::actor_view(&world),
            &query::player(&world),
            &arena,
            &mut commands,
        );
        commands.push(Command::Tick {
            dt: Duration::from_millis(250),
        });

        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        log.extend(events.iter().cloned());
    }

    assert!(
        !log.iter()
            .any(|event| matches!(event, Event::CastingChanged { .. })),
        "no cast may start while paused, got {log:?}",
    );
    assert_eq!(query::clock(&world), Duration::ZERO);
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares an encounter for its first tick.

use rift_siege_core::{ActorKind, Command, Health, StageIndex, TemplateSource, WorldPoint};
use rift_siege_pool::PoolConfig;
use rift_siege_world::{PoolInitError, World};

/// Initial encounter parameters supplied by the embedding adapter.
#[derive(Clone, Copy, Debug)]
pub struct EncounterSetup {
    /// Ground-plane position the player defends from.
    pub player_position: WorldPoint,
    /// Hit points granted to the player.
    pub player_health: Health,
    /// Capacity applied to every actor kind's pool.
    pub pool_config: PoolConfig,
}

impl Default for EncounterSetup {
    fn default() -> Self {
        Self {
            player_position: WorldPoint::ORIGIN,
            player_health: Health::new(100),
            pool_config: PoolConfig::new(4, 24),
        }
    }
}

/// Produces the opening command batch and prewarms the actor pools.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    setup: EncounterSetup,
}

impl Bootstrap {
    /// Creates a bootstrap system for the provided setup.
    #[must_use]
    pub const fn new(setup: EncounterSetup) -> Self {
        Self { setup }
    }

    /// Loads templates and prewarms a pool for every spawnable kind.
    ///
    /// Kinds whose template fails to load stay disabled; the first failure
    /// is surfaced so the adapter can abort before the encounter starts.
    pub fn prepare_pools(
        &self,
        world: &mut World,
        source: &dyn TemplateSource,
    ) -> Result<(), PoolInitError> {
        for kind in ActorKind::ALL {
            world.initialize_pool(kind, self.setup.pool_config, source)?;
        }
        Ok(())
    }

    /// Commands that place the player and open the chapter's first stage.
    #[must_use]
    pub fn opening_commands(&self) -> Vec<Command> {
        vec![
            Command::ConfigurePlayer {
                position: self.setup.player_position,
                health: self.setup.player_health,
            },
            Command::BeginStage {
                stage: StageIndex::new(0),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_siege_core::{ActorTemplate, Damage, Event, LoadError, Team};
    use rift_siege_world::{apply, query};
    use std::time::Duration;

    struct StubTemplates;

    impl TemplateSource for StubTemplates {
        fn load_template(&self, kind: ActorKind) -> Result<ActorTemplate, LoadError> {
            Ok(ActorTemplate {
                kind,
                team: Team::Raiders,
                max_health: Health::new(10),
                radius: 0.6,
                move_speed: 2.0,
                attack_range: 1.5,
                attack_damage: Damage::new(2),
                attack_interval: Duration::from_secs(1),
                invulnerable: false,
            })
        }
    }

    #[test]
    fn opening_batch_places_the_player_and_opens_stage_zero() {
        let bootstrap = Bootstrap::new(EncounterSetup {
            player_position: WorldPoint::new(1.0, -2.0),
            player_health: Health::new(80),
            ..EncounterSetup::default()
        });
        let mut world = World::new();
        bootstrap
            .prepare_pools(&mut world, &StubTemplates)
            .expect("pools prewarm");

        let mut events = Vec::new();
        for command in bootstrap.opening_commands() {
            apply(&mut world, command, &mut events);
        }

        assert_eq!(
            events,
            vec![Event::StageBegan {
                stage: StageIndex::new(0),
            }],
        );
        let player = query::player(&world);
        assert_eq!(player.position, WorldPoint::new(1.0, -2.0));
        assert_eq!(player.health, Health::new(80));
        assert!(query::round_state(&world).round_active);
    }

    #[test]
    fn every_kind_spawns_after_preparation() {
        let bootstrap = Bootstrap::new(EncounterSetup::default());
        let mut world = World::new();
        bootstrap
            .prepare_pools(&mut world, &StubTemplates)
            .expect("pools prewarm");

        for kind in ActorKind::ALL {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::SpawnActor {
                    kind,
                    position: WorldPoint::new(8.0, 0.0),
                    facing: 0.0,
                },
                &mut events,
            );
            assert!(
                matches!(events.as_slice(), [Event::ActorSpawned { .. }]),
                "{kind:?} must spawn, got {events:?}",
            );
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative encounter state for Rift Siege.
//!
//! The world owns the simulation clock, the pause flag, the defending player,
//! the per-kind actor pools, the telegraph board, and the round ledger. All
//! mutation flows through [`apply`], which executes one [`Command`] and
//! broadcasts the resulting [`Event`] values; systems observe those events
//! and immutable [`query`] snapshots and answer with new command batches.
//! There is exactly one writer, so pool mutation never races even when the
//! host embeds the simulation in a larger runtime.

use std::time::Duration;

use rift_siege_core::{
    ActorId, ActorKind, Command, Damage, Event, Health, StageIndex, Team, TemplateSource,
    WorldPoint,
};
use rift_siege_pool::PoolConfig;
use rift_siege_telegraph::{TelegraphBoard, TelegraphBoardConfig};

mod actors;
mod arena;

pub use actors::PoolInitError;
pub use arena::FlatArena;

use actors::ActorPools;

const DEFAULT_PLAYER_HEALTH: Health = Health::new(100);

#[derive(Debug)]
struct PlayerState {
    position: WorldPoint,
    health: Health,
    invulnerable: bool,
}

#[derive(Debug)]
struct RoundState {
    stage: StageIndex,
    spawning_finished: bool,
    round_active: bool,
}

/// Represents the authoritative encounter state.
#[derive(Debug)]
pub struct World {
    clock: Duration,
    paused: bool,
    player: PlayerState,
    actors: ActorPools,
    board: TelegraphBoard,
    round: RoundState,
}

impl World {
    /// Creates a new world with default telegraph capacity.
    #[must_use]
    pub fn new() -> Self {
        let board = TelegraphBoard::new(TelegraphBoardConfig::default())
            .expect("default telegraph config is valid");
        Self {
            clock: Duration::ZERO,
            paused: false,
            player: PlayerState {
                position: WorldPoint::ORIGIN,
                health: DEFAULT_PLAYER_HEALTH,
                invulnerable: false,
            },
            actors: ActorPools::default(),
            board,
            round: RoundState {
                stage: StageIndex::new(0),
                spawning_finished: false,
                round_active: false,
            },
        }
    }

    /// Loads the backing template for a kind and prewarms its pool.
    ///
    /// A failed load leaves the kind disabled: later spawn commands for it
    /// emit [`Event::SpawnRejected`] instead of materializing an actor.
    pub fn initialize_pool(
        &mut self,
        kind: ActorKind,
        config: PoolConfig,
        source: &dyn TemplateSource,
    ) -> Result<(), PoolInitError> {
        self.actors.initialize(kind, config, source)
    }

    fn remove_actor(&mut self, actor: ActorId, out_events: &mut Vec<Event>) -> bool {
        let mut hidden = Vec::new();
        self.board.hide_owned(actor, &mut hidden);
        for id in hidden {
            out_events.push(Event::TelegraphHidden { id });
        }
        self.actors.despawn(actor)
    }

    fn damage_actor(&mut self, actor: ActorId, amount: Damage, out_events: &mut Vec<Event>) {
        let Some(body) = self.actors.get_mut(actor) else {
            return;
        };
        if body.invulnerable {
            return;
        }

        body.health = body.health.saturating_sub(amount);
        let remaining = body.health;
        let kind = body.kind;
        out_events.push(Event::ActorDamaged {
            actor,
            amount,
            remaining,
        });

        if remaining.is_depleted() {
            let _ = self.remove_actor(actor, out_events);
            out_events.push(Event::ActorDied { actor, kind });
            self.check_round_completion(out_events);
        }
    }

    fn damage_player(&mut self, amount: Damage, out_events: &mut Vec<Event>) {
        if self.player.invulnerable || self.player.health.is_depleted() {
            return;
        }
        self.player.health = self.player.health.saturating_sub(amount);
        out_events.push(Event::PlayerDamaged {
            amount,
            remaining: self.player.health,
        });
    }

    /// Round completion law: complete iff spawning finished and none alive.
    fn check_round_completion(&mut self, out_events: &mut Vec<Event>) {
        if self.round.round_active
            && self.round.spawning_finished
            && self.actors.active_count() == 0
        {
            self.round.round_active = false;
            out_events.push(Event::RoundCompleted {
                stage: self.round.stage,
                expired: false,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigurePlayer { position, health } => {
            world.player.position = position;
            world.player.health = health;
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PausedChanged { paused });
            }
        }
        Command::Tick { dt } => {
            if world.paused {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let player_position = world.player.position;
            let step_seconds = dt.as_secs_f32();
            for (_, body) in world.actors.iter_active_mut() {
                body.facing = body.position.angle_to(player_position);
                if body.casting {
                    continue;
                }
                let distance = body.position.distance(player_position);
                if distance > body.attack_range {
                    let step = (body.move_speed * step_seconds).min(distance - body.attack_range);
                    body.position = body.position.offset(body.facing, step);
                }
            }

            let mut expired = Vec::new();
            world.board.tick(dt, &mut expired);
            for id in expired {
                out_events.push(Event::TelegraphHidden { id });
            }
        }
        Command::BeginStage { stage } => {
            world.round = RoundState {
                stage,
                spawning_finished: false,
                round_active: true,
            };
            out_events.push(Event::StageBegan { stage });
        }
        Command::SpawnActor {
            kind,
            position,
            facing,
        } => {
            let Some(spawn) = world.actors.spawn(kind, position, facing) else {
                out_events.push(Event::SpawnRejected { kind });
                return;
            };
            if let Some(evicted) = spawn.evicted {
                let mut hidden = Vec::new();
                world.board.hide_owned(evicted, &mut hidden);
                for id in hidden {
                    out_events.push(Event::TelegraphHidden { id });
                }
                out_events.push(Event::ActorEvicted {
                    actor: evicted,
                    kind: evicted.kind(),
                });
            }
            out_events.push(Event::ActorSpawned {
                actor: spawn.actor,
                kind,
                position,
            });
        }
        Command::MarkSpawningFinished => {
            if world.round.round_active && !world.round.spawning_finished {
                world.round.spawning_finished = true;
                out_events.push(Event::SpawningFinished {
                    stage: world.round.stage,
                });
                world.check_round_completion(out_events);
            }
        }
        Command::ExpireRound => {
            if !world.round.round_active {
                return;
            }
            for actor in world.actors.active_ids() {
                if world.remove_actor(actor, out_events) {
                    out_events.push(Event::ActorDespawned {
                        actor,
                        kind: actor.kind(),
                    });
                }
            }
            world.round.spawning_finished = true;
            world.round.round_active = false;
            out_events.push(Event::RoundCompleted {
                stage: world.round.stage,
                expired: true,
            });
        }
        Command::SetCasting { actor, casting } => {
            if let Some(body) = world.actors.get_mut(actor) {
                if body.casting != casting {
                    body.casting = casting;
                    out_events.push(Event::CastingChanged { actor, casting });
                }
            }
        }
        Command::ShowTelegraph {
            owner,
            footprint,
            duration,
        } => {
            if world.actors.get(owner).is_none() {
                return;
            }
            let shown = world.board.show(owner, footprint, duration);
            if let Some(evicted) = shown.evicted {
                out_events.push(Event::TelegraphHidden { id: evicted });
            }
            out_events.push(Event::TelegraphShown {
                id: shown.id,
                owner,
                footprint,
                duration,
            });
        }
        Command::HideTelegraph { id } => {
            if world.board.hide(id) {
                out_events.push(Event::TelegraphHidden { id });
            }
        }
        Command::AreaStrike {
            attacker,
            footprint,
            amount,
        } => {
            let Some(attacker_team) = world.actors.get(attacker).map(|body| body.team) else {
                return;
            };

            if attacker_team != Team::Defenders && footprint.contains(world.player.position) {
                world.damage_player(amount, out_events);
            }

            let victims: Vec<ActorId> = world
                .actors
                .iter_active()
                .filter(|(_, body)| {
                    body.team != attacker_team && footprint.contains(body.position)
                })
                .map(|(id, _)| id)
                .collect();
            for victim in victims {
                world.damage_actor(victim, amount, out_events);
            }
        }
        Command::Strike { attacker, amount } => {
            let Some(body) = world.actors.get(attacker) else {
                return;
            };
            if body.casting || body.team == Team::Defenders {
                return;
            }
            if body.position.distance(world.player.position) > body.attack_range {
                return;
            }
            world.damage_player(amount, out_events);
        }
        Command::DamageActor { actor, amount } => {
            world.damage_actor(actor, amount, out_events);
        }
        Command::DespawnActor { actor } => {
            if world.remove_actor(actor, out_events) {
                out_events.push(Event::ActorDespawned {
                    actor,
                    kind: actor.kind(),
                });
                world.check_round_completion(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use rift_siege_core::{
        ActorSnapshot, ActorView, PlayerSnapshot, RoundSnapshot, TelegraphView,
    };

    /// Captures a read-only view of every live actor.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        let snapshots: Vec<ActorSnapshot> = world
            .actors
            .iter_active()
            .map(|(id, body)| ActorSnapshot {
                id,
                kind: body.kind,
                team: body.team,
                position: body.position,
                facing: body.facing,
                radius: body.radius,
                health: body.health,
                casting: body.casting,
                attack_range: body.attack_range,
                attack_damage: body.attack_damage,
                attack_interval: body.attack_interval,
                invulnerable: body.invulnerable,
            })
            .collect();
        ActorView::from_snapshots(snapshots)
    }

    /// Captures the defending player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            invulnerable: world.player.invulnerable,
        }
    }

    /// Captures the round ledger used by the director and adapters.
    #[must_use]
    pub fn round_state(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            stage: world.round.stage,
            spawning_finished: world.round.spawning_finished,
            round_active: world.round.round_active,
            active_actor_count: world.actors.active_count(),
        }
    }

    /// Simulated time accumulated since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Reports whether every simulation timer is currently frozen.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Captures a read-only view of every visible telegraph.
    #[must_use]
    pub fn telegraph_view(world: &World) -> TelegraphView {
        TelegraphView::from_snapshots(world.board.snapshots())
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Skill phase scheduler shared by every boss kind.
//!
//! One generic windup/active/recovery state machine drives all boss
//! behavior; the differences between kinds live entirely in per-kind skill
//! tables. Each skill cools down independently, a shared gate spaces casts
//! apart, and when several skills are ready at once the scheduler picks one
//! uniformly at random so no table entry starves another. Telegraphs are
//! shown for the windup, hidden at its end, and re-shown briefly for each
//! sub-strike of a multi-strike skill. The scheduler's clock only advances on
//! `TimeAdvanced`, so pausing the world freezes every cooldown and phase.

mod tables;

pub use tables::default_tables;

use std::collections::BTreeMap;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rift_siege_core::{
    ActorId, ActorKind, ActorSnapshot, ActorView, Command, Damage, Event, Footprint, NavSurface,
    PlayerSnapshot, SkillKind, TelegraphId, WorldPoint,
};

/// Tuning parameters for the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// Minimum spacing between two cast starts of the same actor.
    pub default_gate: Duration,
    /// Seed for the ready-skill selection stream.
    pub rng_seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_gate: Duration::from_secs(1),
            rng_seed: 0,
        }
    }
}

/// Aimed geometry a skill projects when cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillShape {
    /// Disc centered on the caster.
    SelfCircle {
        /// Radius of the disc.
        radius: f32,
    },
    /// Disc dropped on the player, clamped to a maximum cast range.
    TargetCircle {
        /// Radius of the disc.
        radius: f32,
        /// Furthest distance from the caster the disc's center may land.
        max_range: f32,
    },
    /// Strip from the caster toward the player, clamped to the surface.
    Lane {
        /// Length of the strip.
        length: f32,
        /// Full width of the strip.
        width: f32,
    },
    /// Sector opening from the caster toward the player.
    Fan {
        /// Radius of the sector.
        radius: f32,
        /// Half of the sector's opening angle, in radians.
        half_angle: f32,
    },
}

/// One entry of a boss kind's skill table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillSpec {
    /// Named ability the entry describes.
    pub kind: SkillKind,
    /// Delay before the skill becomes ready again after recovery ends.
    pub cooldown: Duration,
    /// Telegraphed preparation phase; movement is halted throughout.
    pub windup: Duration,
    /// Phase during which strikes land.
    pub active: Duration,
    /// Trailing lock after the last strike.
    pub recovery: Duration,
    /// Number of strikes dealt across the active phase.
    pub strikes: u32,
    /// Spacing between consecutive strikes of a multi-strike skill.
    pub strike_interval: Duration,
    /// Geometry the skill projects.
    pub shape: SkillShape,
    /// Damage each strike applies inside the footprint.
    pub damage: Damage,
}

/// Ordered list of skills one boss kind can cast.
#[derive(Clone, Debug, Default)]
pub struct SkillTable {
    skills: Vec<SkillSpec>,
}

impl SkillTable {
    /// Creates a table from its skills in declaration order.
    #[must_use]
    pub fn new(skills: Vec<SkillSpec>) -> Self {
        Self { skills }
    }

    /// Number of skills in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Reports whether the table holds no skills.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Windup,
    Active,
    Recovery,
}

#[derive(Debug)]
struct CastState {
    skill_index: usize,
    phase: Phase,
    phase_remaining: Duration,
    telegraph: Option<TelegraphId>,
    strikes_done: u32,
    strike_timer: Duration,
    footprint: Footprint,
}

#[derive(Debug)]
struct ActorState {
    ready_in: Vec<Duration>,
    gate: Duration,
    cast: Option<CastState>,
}

impl ActorState {
    fn fresh(table: &SkillTable, gate: Duration) -> Self {
        Self {
            ready_in: vec![Duration::ZERO; table.skills.len()],
            gate,
            cast: None,
        }
    }
}

/// Pure system that runs every boss's skill state machine.
#[derive(Debug)]
pub struct SkillScheduler {
    config: SchedulerConfig,
    tables: BTreeMap<ActorKind, SkillTable>,
    rng: ChaCha8Rng,
    states: BTreeMap<ActorId, ActorState>,
}

impl SkillScheduler {
    /// Creates a scheduler driving the provided per-kind skill tables.
    #[must_use]
    pub fn new(config: SchedulerConfig, tables: BTreeMap<ActorKind, SkillTable>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self {
            config,
            tables,
            rng,
            states: BTreeMap::new(),
        }
    }

    /// Number of actors the scheduler currently tracks.
    #[must_use]
    pub fn tracked_actors(&self) -> usize {
        self.states.len()
    }

    /// Consumes events and immutable views to emit cast-flow commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        actors: &ActorView,
        player: &PlayerSnapshot,
        surface: &dyn NavSurface,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::ActorSpawned { actor, kind, .. } => self.track(*actor, *kind),
                Event::ActorDied { actor, .. }
                | Event::ActorEvicted { actor, .. }
                | Event::ActorDespawned { actor, .. } => self.forget(*actor, out),
                Event::TelegraphShown { id, owner, .. } => self.learn_telegraph(*owner, *id),
                Event::TimeAdvanced { dt } => self.advance(*dt, actors, player, surface, out),
                _ => {}
            }
        }
    }

    fn track(&mut self, actor: ActorId, kind: ActorKind) {
        let Some(table) = self.tables.get(&kind) else {
            return;
        };
        if table.is_empty() {
            return;
        }
        let _ = self
            .states
            .insert(actor, ActorState::fresh(table, self.config.default_gate));
    }

    /// Drops an actor's cast state, force-hiding any telegraph it still
    /// tracked. The world hides owned telegraphs on despawn as well; hiding
    /// is idempotent so the duplicate command is harmless.
    fn forget(&mut self, actor: ActorId, out: &mut Vec<Command>) {
        let Some(state) = self.states.remove(&actor) else {
            return;
        };
        if let Some(cast) = state.cast {
            if let Some(id) = cast.telegraph {
                out.push(Command::HideTelegraph { id });
            }
        }
    }

    fn learn_telegraph(&mut self, owner: ActorId, id: TelegraphId) {
        if let Some(state) = self.states.get_mut(&owner) {
            if let Some(cast) = state.cast.as_mut() {
                if cast.telegraph.is_none() {
                    cast.telegraph = Some(id);
                }
            }
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        actors: &ActorView,
        player: &PlayerSnapshot,
        surface: &dyn NavSurface,
        out: &mut Vec<Command>,
    ) {
        let Self {
            config,
            tables,
            rng,
            states,
        } = self;

        for (actor, state) in states.iter_mut() {
            let Some(table) = tables.get(&actor.kind()) else {
                continue;
            };
            let Some(snapshot) = actors.get(*actor) else {
                // Despawn event not yet observed; freeze every timer until
                // it arrives so a stale entry never accrues readiness.
                continue;
            };

            for remaining in state.ready_in.iter_mut() {
                *remaining = remaining.saturating_sub(dt);
            }
            state.gate = state.gate.saturating_sub(dt);

            if state.cast.is_some() {
                step_cast(*actor, state, table, config, dt, snapshot, player, surface, out);
            } else if state.gate.is_zero() {
                try_start_cast(*actor, state, table, rng, snapshot, player, surface, out);
            }
        }
    }
}

fn try_start_cast(
    actor: ActorId,
    state: &mut ActorState,
    table: &SkillTable,
    rng: &mut ChaCha8Rng,
    snapshot: &ActorSnapshot,
    player: &PlayerSnapshot,
    surface: &dyn NavSurface,
    out: &mut Vec<Command>,
) {
    let ready: Vec<usize> = state
        .ready_in
        .iter()
        .enumerate()
        .filter_map(|(index, remaining)| remaining.is_zero().then_some(index))
        .collect();
    if ready.is_empty() {
        return;
    }

    // Uniform choice among ready skills keeps long-cooldown entries from
    // being starved by short ones.
    let skill_index = ready[rng.gen_range(0..ready.len())];
    let spec = &table.skills[skill_index];
    let footprint = aim(spec.shape, snapshot.position, player.position, surface);

    out.push(Command::SetCasting {
        actor,
        casting: true,
    });
    out.push(Command::ShowTelegraph {
        owner: actor,
        footprint,
        duration: spec.windup,
    });

    state.cast = Some(CastState {
        skill_index,
        phase: Phase::Windup,
        phase_remaining: spec.windup,
        telegraph: None,
        strikes_done: 0,
        strike_timer: Duration::ZERO,
        footprint,
    });
}

fn step_cast(
    actor: ActorId,
    state: &mut ActorState,
    table: &SkillTable,
    config: &SchedulerConfig,
    dt: Duration,
    snapshot: &ActorSnapshot,
    player: &PlayerSnapshot,
    surface: &dyn NavSurface,
    out: &mut Vec<Command>,
) {
    let cast = state
        .cast
        .as_mut()
        .expect("step_cast is only called with an active cast");
    let spec = &table.skills[cast.skill_index];
    cast.phase_remaining = cast.phase_remaining.saturating_sub(dt);

    match cast.phase {
        Phase::Windup => {
            if !cast.phase_remaining.is_zero() {
                return;
            }
            if let Some(id) = cast.telegraph.take() {
                out.push(Command::HideTelegraph { id });
            }
            cast.phase = Phase::Active;
            cast.phase_remaining = spec.active;
            fire_strike(actor, cast, spec, snapshot, player, surface, out);
        }
        Phase::Active => {
            if cast.strikes_done < spec.strikes {
                cast.strike_timer = cast.strike_timer.saturating_add(dt);
                while cast.strikes_done < spec.strikes && cast.strike_timer >= spec.strike_interval
                {
                    cast.strike_timer = cast.strike_timer.saturating_sub(spec.strike_interval);
                    fire_strike(actor, cast, spec, snapshot, player, surface, out);
                }
            }
            if cast.phase_remaining.is_zero() {
                cast.phase = Phase::Recovery;
                cast.phase_remaining = spec.recovery;
            }
        }
        Phase::Recovery => {
            if !cast.phase_remaining.is_zero() {
                return;
            }
            state.ready_in[cast.skill_index] = spec.cooldown;
            state.gate = config.default_gate;
            state.cast = None;
            out.push(Command::SetCasting {
                actor,
                casting: false,
            });
        }
    }
}

/// Lands one strike: multi-strike skills re-aim at the player and flash a
/// short-lived marker; single-strike skills reuse the windup footprint.
fn fire_strike(
    actor: ActorId,
    cast: &mut CastState,
    spec: &SkillSpec,
    snapshot: &ActorSnapshot,
    player: &PlayerSnapshot,
    surface: &dyn NavSurface,
    out: &mut Vec<Command>,
) {
    let footprint = if spec.strikes > 1 {
        let aimed = aim(spec.shape, snapshot.position, player.position, surface);
        out.push(Command::ShowTelegraph {
            owner: actor,
            footprint: aimed,
            duration: spec.strike_interval,
        });
        aimed
    } else {
        cast.footprint
    };

    cast.strikes_done += 1;
    out.push(Command::AreaStrike {
        attacker: actor,
        footprint,
        amount: spec.damage,
    });
}

/// Builds the skill's footprint aimed from the caster toward the player.
fn aim(
    shape: SkillShape,
    caster: WorldPoint,
    target: WorldPoint,
    surface: &dyn NavSurface,
) -> Footprint {
    let facing = caster.angle_to(target);
    match shape {
        SkillShape::SelfCircle { radius } => Footprint::Circle {
            center: caster,
            radius,
        },
        SkillShape::TargetCircle { radius, max_range } => {
            let center = if caster.distance(target) > max_range {
                caster.offset(facing, max_range)
            } else {
                target
            };
            let center = surface.raycast(caster, center).unwrap_or(center);
            Footprint::Circle { center, radius }
        }
        SkillShape::Lane { length, width } => {
            let reach = caster.offset(facing, length);
            let to = surface.raycast(caster, reach).unwrap_or(reach);
            Footprint::Line {
                from: caster,
                to,
                width,
            }
        }
        SkillShape::Fan { radius, half_angle } => Footprint::Arc {
            center: caster,
            radius,
            facing,
            half_angle,
        },
    }
}

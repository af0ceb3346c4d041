#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rift Siege encounter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches. External collaborators (content loading, the navigable surface)
//! are expressed as traits so the simulation core never owns them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod geometry;

pub use geometry::{wrap_angle, Bounds, Footprint, WorldPoint};

/// Team affiliation used by the damageable-actor contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The player and anything fighting alongside them.
    Defenders,
    /// Hostile actors spawned by the director.
    Raiders,
}

/// Kinds of hostile actors the director can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorKind {
    /// Fodder melee actor with no skills.
    Husk,
    /// Boss that slams the ground around itself.
    Brute,
    /// Boss that dashes along a line toward its target.
    Stalker,
    /// Boss that sweeps a wide frontal arc.
    Warden,
    /// Boss that lands a barrage of repeated strikes.
    Ravager,
    /// Boss that detonates a large shockwave after a long windup.
    Colossus,
    /// Boss that lunges down a narrow lane and follows with a sweep.
    Harbinger,
}

impl ActorKind {
    /// Every spawnable actor kind in deterministic order.
    pub const ALL: [ActorKind; 7] = [
        ActorKind::Husk,
        ActorKind::Brute,
        ActorKind::Stalker,
        ActorKind::Warden,
        ActorKind::Ravager,
        ActorKind::Colossus,
        ActorKind::Harbinger,
    ];
}

/// Named abilities available to boss actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    /// Circular ground slam centered on the caster.
    Slam,
    /// Linear dash strike toward the target.
    Dash,
    /// Frontal arc sweep.
    Sweep,
    /// Repeated strikes landing over the active phase.
    Barrage,
    /// Large delayed detonation around the caster.
    Shockwave,
    /// Narrow long-range lane strike.
    Lunge,
}

/// Zero-based index of a stage within the current chapter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct StageIndex(u32);

impl StageIndex {
    /// Creates a new stage index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the stage that follows this one.
    #[must_use]
    pub const fn next(&self) -> StageIndex {
        StageIndex(self.0.saturating_add(1))
    }
}

/// Remaining hit points of an actor or the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Health remaining after absorbing the provided damage.
    #[must_use]
    pub const fn saturating_sub(&self, damage: Damage) -> Health {
        Health(self.0.saturating_sub(damage.get()))
    }
}

/// Amount of damage dealt by a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Damage(u32);

impl Damage {
    /// Creates a damage amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric damage amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Arena-pattern handle identifying a pooled actor instance.
///
/// The slot addresses the instance's storage inside its kind's pool while the
/// generation guards against recycled slots: a command carrying a stale
/// generation is a defined no-op rather than an aliasing hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId {
    kind: ActorKind,
    slot: u32,
    generation: u32,
}

impl ActorId {
    /// Creates an actor identifier from its pool coordinates.
    #[must_use]
    pub const fn new(kind: ActorKind, slot: u32, generation: u32) -> Self {
        Self {
            kind,
            slot,
            generation,
        }
    }

    /// Pool the actor was drawn from.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Storage slot inside the owning pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Recycling generation of the storage slot.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Shape class that determines which primitive pool backs a telegraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TelegraphClass {
    /// Strip between two endpoints.
    Line,
    /// Filled disc.
    Circle,
    /// Circular sector.
    Arc,
}

impl TelegraphClass {
    /// Shape class backing the provided footprint.
    #[must_use]
    pub const fn of(footprint: &Footprint) -> TelegraphClass {
        match footprint {
            Footprint::Line { .. } => TelegraphClass::Line,
            Footprint::Circle { .. } => TelegraphClass::Circle,
            Footprint::Arc { .. } => TelegraphClass::Arc,
        }
    }
}

/// Arena-pattern handle identifying a live telegraph primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TelegraphId {
    class: TelegraphClass,
    slot: u32,
    generation: u32,
}

impl TelegraphId {
    /// Creates a telegraph identifier from its pool coordinates.
    #[must_use]
    pub const fn new(class: TelegraphClass, slot: u32, generation: u32) -> Self {
        Self {
            class,
            slot,
            generation,
        }
    }

    /// Primitive pool the telegraph was drawn from.
    #[must_use]
    pub const fn class(&self) -> TelegraphClass {
        self.class
    }

    /// Storage slot inside the owning pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Recycling generation of the storage slot.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Immutable description of an actor kind loaded from content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    /// Kind the template describes.
    pub kind: ActorKind,
    /// Team the actor fights for.
    pub team: Team,
    /// Hit points granted on spawn.
    pub max_health: Health,
    /// Collision radius in world units.
    pub radius: f32,
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Distance at which basic attacks connect.
    pub attack_range: f32,
    /// Damage dealt by one basic attack.
    pub attack_damage: Damage,
    /// Minimum delay between two basic attacks.
    pub attack_interval: Duration,
    /// Whether incoming damage is ignored entirely.
    pub invulnerable: bool,
}

/// Errors raised while loading a backing template for a pool.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The content source has no template for the requested kind.
    #[error("no template registered for actor kind {0:?}")]
    MissingTemplate(ActorKind),
    /// The content source produced a template that fails validation.
    #[error("template for {kind:?} is invalid: {reason}")]
    InvalidTemplate {
        /// Kind whose template failed validation.
        kind: ActorKind,
        /// Human-readable validation failure.
        reason: String,
    },
}

/// Content-loading collaborator consulted once per pool at initialization.
pub trait TemplateSource {
    /// Loads the backing template for the provided actor kind.
    fn load_template(&self, kind: ActorKind) -> Result<ActorTemplate, LoadError>;
}

/// Navigable-surface collaborator consumed for placement and aim clamping.
///
/// The surface representation is built elsewhere; this core only samples it.
pub trait NavSurface {
    /// Snaps a point onto the surface, searching up to `max_distance` away.
    fn sample_nearest_point(&self, point: WorldPoint, max_distance: f32) -> Option<WorldPoint>;

    /// Axis-aligned extent enclosing the walkable surface.
    fn bounding_extent(&self) -> Bounds;

    /// Walks from `from` toward `to`, returning the furthest reachable point.
    fn raycast(&self, from: WorldPoint, to: WorldPoint) -> Option<WorldPoint>;
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Positions the defending player inside the arena.
    ConfigurePlayer {
        /// Ground-plane position the player occupies.
        position: WorldPoint,
        /// Hit points granted to the player.
        health: Health,
    },
    /// Freezes or resumes every simulation timer.
    SetPaused {
        /// Desired pause state.
        paused: bool,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Opens a new round for the provided stage.
    BeginStage {
        /// Stage the round belongs to.
        stage: StageIndex,
    },
    /// Requests that an actor of the given kind materialize at a position.
    SpawnActor {
        /// Kind of actor to draw from its pool.
        kind: ActorKind,
        /// Placement already validated by the director.
        position: WorldPoint,
        /// Initial facing in radians.
        facing: f32,
    },
    /// Declares that the director has exhausted the stage's spawn queue.
    MarkSpawningFinished,
    /// Force-completes the round after its timer lapsed.
    ExpireRound,
    /// Locks or releases an actor's movement and basic attacks while casting.
    SetCasting {
        /// Actor whose cast state changes.
        actor: ActorId,
        /// Whether the actor is now casting.
        casting: bool,
    },
    /// Shows a timed warning primitive owned by an actor.
    ShowTelegraph {
        /// Actor the telegraph belongs to.
        owner: ActorId,
        /// Geometry the warning covers.
        footprint: Footprint,
        /// Time until the telegraph auto-hides.
        duration: Duration,
    },
    /// Hides a telegraph and returns its primitive to the pool.
    HideTelegraph {
        /// Telegraph to hide; stale identifiers are ignored.
        id: TelegraphId,
    },
    /// Applies damage to everything hostile inside a footprint.
    AreaStrike {
        /// Actor dealing the damage.
        attacker: ActorId,
        /// Geometry tested against victims.
        footprint: Footprint,
        /// Damage applied to each victim.
        amount: Damage,
    },
    /// Applies one basic melee strike from an actor to the player.
    Strike {
        /// Actor dealing the strike.
        attacker: ActorId,
        /// Damage applied when the strike connects.
        amount: Damage,
    },
    /// Applies damage to a single actor.
    DamageActor {
        /// Actor absorbing the damage; stale identifiers are ignored.
        actor: ActorId,
        /// Damage applied.
        amount: Damage,
    },
    /// Returns an actor to its pool without treating it as a death.
    DespawnActor {
        /// Actor to despawn; stale identifiers are ignored.
        actor: ActorId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced. Never emitted while
    /// paused, which is the single pause check every timer relies on.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a pause-state change.
    PausedChanged {
        /// Pause state that became active.
        paused: bool,
    },
    /// Confirms that a round opened for the provided stage.
    StageBegan {
        /// Stage the round belongs to.
        stage: StageIndex,
    },
    /// Confirms that an actor materialized inside the arena.
    ActorSpawned {
        /// Identifier assigned by the actor's pool.
        actor: ActorId,
        /// Kind of the spawned actor.
        kind: ActorKind,
        /// Position the actor was warped to.
        position: WorldPoint,
    },
    /// Reports that the pool recycled its oldest active actor under pressure.
    ActorEvicted {
        /// Identifier the evicted actor held; stale from now on.
        actor: ActorId,
        /// Kind of the evicted actor.
        kind: ActorKind,
    },
    /// Reports that a spawn request could not be honored.
    ///
    /// Emitted when the kind's pool was never initialized; callers treat the
    /// entry as skipped rather than fatal.
    SpawnRejected {
        /// Kind whose spawn was rejected.
        kind: ActorKind,
    },
    /// Confirms that an actor returned to its pool without dying.
    ///
    /// Emitted for explicit despawns and for the sweep that clears the arena
    /// when a round expires.
    ActorDespawned {
        /// Identifier the actor held; stale from now on.
        actor: ActorId,
        /// Kind of the despawned actor.
        kind: ActorKind,
    },
    /// Confirms that an actor's health depleted and it left the arena.
    ActorDied {
        /// Identifier the actor held; stale from now on.
        actor: ActorId,
        /// Kind of the dead actor.
        kind: ActorKind,
    },
    /// Confirms that the stage's spawn queue is exhausted.
    SpawningFinished {
        /// Stage whose spawning finished.
        stage: StageIndex,
    },
    /// Announces that the round finished.
    RoundCompleted {
        /// Stage whose round completed.
        stage: StageIndex,
        /// Whether the round-timer expiry forced completion.
        expired: bool,
    },
    /// Announces a cast-lock change for an actor.
    CastingChanged {
        /// Actor whose cast state changed.
        actor: ActorId,
        /// Whether the actor is now casting.
        casting: bool,
    },
    /// Confirms that a telegraph primitive is now visible.
    TelegraphShown {
        /// Identifier assigned by the shape-class pool.
        id: TelegraphId,
        /// Actor the telegraph belongs to.
        owner: ActorId,
        /// Geometry the warning covers.
        footprint: Footprint,
        /// Time until the telegraph auto-hides.
        duration: Duration,
    },
    /// Confirms that a telegraph primitive returned to its pool.
    TelegraphHidden {
        /// Identifier of the hidden telegraph; stale from now on.
        id: TelegraphId,
    },
    /// Reports damage applied to an actor.
    ActorDamaged {
        /// Actor that absorbed the damage.
        actor: ActorId,
        /// Damage applied.
        amount: Damage,
        /// Health remaining after the strike.
        remaining: Health,
    },
    /// Reports damage applied to the player.
    PlayerDamaged {
        /// Damage applied.
        amount: Damage,
        /// Health remaining after the strike.
        remaining: Health,
    },
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Identifier assigned by the actor's pool.
    pub id: ActorId,
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Team the actor fights for.
    pub team: Team,
    /// Ground-plane position.
    pub position: WorldPoint,
    /// Facing in radians.
    pub facing: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Remaining hit points.
    pub health: Health,
    /// Whether a skill cast currently locks the actor.
    pub casting: bool,
    /// Distance at which basic attacks connect.
    pub attack_range: f32,
    /// Damage dealt by one basic attack.
    pub attack_damage: Damage,
    /// Minimum delay between two basic attacks.
    pub attack_interval: Duration,
    /// Whether incoming damage is ignored entirely.
    pub invulnerable: bool,
}

/// Read-only snapshot describing all live actors, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live actors captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot for a specific actor.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Ground-plane position of the player.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Whether incoming damage is ignored entirely.
    pub invulnerable: bool,
}

/// Immutable representation of the round's progress used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    /// Stage the current round belongs to.
    pub stage: StageIndex,
    /// Whether the director exhausted the stage's spawn queue.
    pub spawning_finished: bool,
    /// Whether a round is currently in progress.
    pub round_active: bool,
    /// Number of actors currently alive.
    pub active_actor_count: usize,
}

/// Immutable representation of one visible telegraph used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelegraphSnapshot {
    /// Identifier of the telegraph primitive.
    pub id: TelegraphId,
    /// Actor the telegraph belongs to.
    pub owner: ActorId,
    /// Geometry the warning covers.
    pub footprint: Footprint,
    /// Time until the telegraph auto-hides.
    pub duration: Duration,
    /// Portion of the final geometry currently filled, in `[0, 1]`.
    pub fill_progress: f32,
}

/// Read-only snapshot describing all visible telegraphs, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct TelegraphView {
    snapshots: Vec<TelegraphSnapshot>,
}

impl TelegraphView {
    /// Creates a new telegraph view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TelegraphSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TelegraphSnapshot> {
        self.snapshots.iter()
    }

    /// Number of visible telegraphs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no telegraphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn director that paces waves and places actors.
//!
//! The director expands each stage's plan into a flat spawn queue, spreads
//! the queue across one third of the round duration, and computes a ground
//! placement for every spawn: an annulus sample around the player snapped to
//! the navigable surface, rejected on overlap, with an unconditional fallback
//! just outside the no-spawn radius. It also owns stage progression: it marks
//! spawning finished on queue exhaustion, expires overlong rounds on every
//! stage except the chapter's last, and opens the next stage when the world
//! reports a completed round.

use std::collections::{BTreeMap, VecDeque};
use std::f32::consts::PI;
use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rift_siege_core::{
    ActorKind, ActorView, Command, Event, NavSurface, PlayerSnapshot, StageIndex, WorldPoint,
};

/// Search distance used when snapping candidates onto the surface.
const PLACEMENT_SNAP_DISTANCE: f32 = 4.0;

/// Collision radius assumed for kinds the director was not told about.
const DEFAULT_ACTOR_RADIUS: f32 = 0.5;

/// Tuning parameters for spawn pacing and placement.
#[derive(Clone, Copy, Debug)]
pub struct DirectorConfig {
    /// Radius around the player inside which nothing may spawn.
    pub no_spawn_radius: f32,
    /// Clearance kept between placements and the surface boundary.
    pub boundary_padding: f32,
    /// Annulus samples attempted before the fallback placement.
    pub placement_tries: u32,
    /// Clearance added on top of collision radii when spacing actors.
    pub min_extra_spacing: f32,
    /// Width of the spawn ring beyond its inner radius.
    pub ring_extra_radius: f32,
    /// Wall-clock length of one round; spawns occupy the first third.
    pub round_duration: Duration,
    /// Seed for the placement and pacing random stream.
    pub rng_seed: u64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            no_spawn_radius: 6.0,
            boundary_padding: 1.0,
            placement_tries: 16,
            min_extra_spacing: 0.5,
            ring_extra_radius: 8.0,
            round_duration: Duration::from_secs(60),
            rng_seed: 0,
        }
    }
}

/// Spawn entries for a single stage, expanded in declaration order.
#[derive(Clone, Debug, Default)]
pub struct StagePlan {
    entries: Vec<(ActorKind, u32)>,
}

impl StagePlan {
    /// Creates a stage plan from `(kind, count)` entries.
    #[must_use]
    pub fn new(entries: Vec<(ActorKind, u32)>) -> Self {
        Self { entries }
    }

    /// Total number of actors the stage will spawn.
    #[must_use]
    pub fn actor_count(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    fn expand(&self) -> VecDeque<ActorKind> {
        self.entries
            .iter()
            .flat_map(|(kind, count)| std::iter::repeat(*kind).take(*count as usize))
            .collect()
    }
}

/// Ordered list of stages making up one chapter.
#[derive(Clone, Debug, Default)]
pub struct ChapterPlan {
    stages: Vec<StagePlan>,
}

impl ChapterPlan {
    /// Creates a chapter plan from its stages in play order.
    #[must_use]
    pub fn new(stages: Vec<StagePlan>) -> Self {
        Self { stages }
    }

    /// Number of stages in the chapter.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn stage(&self, stage: StageIndex) -> Option<&StagePlan> {
        self.stages.get(stage.get() as usize)
    }

    fn is_final(&self, stage: StageIndex) -> bool {
        stage.get() as usize + 1 >= self.stages.len()
    }
}

/// Pure system that paces spawns and drives stage progression.
#[derive(Debug)]
pub struct Director {
    config: DirectorConfig,
    plan: ChapterPlan,
    radii: BTreeMap<ActorKind, f32>,
    rng: ChaCha8Rng,
    queue: VecDeque<ActorKind>,
    spawn_interval: Duration,
    accumulator: Duration,
    round_elapsed: Duration,
    stage: StageIndex,
    round_open: bool,
    spawning_finished: bool,
    expire_sent: bool,
    chapter_complete: bool,
}

impl Director {
    /// Creates a director for the provided chapter.
    ///
    /// `radii` maps each spawnable kind to its collision radius; kinds left
    /// out fall back to a conservative default.
    #[must_use]
    pub fn new(config: DirectorConfig, plan: ChapterPlan, radii: BTreeMap<ActorKind, f32>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        Self {
            config,
            plan,
            radii,
            rng,
            queue: VecDeque::new(),
            spawn_interval: Duration::ZERO,
            accumulator: Duration::ZERO,
            round_elapsed: Duration::ZERO,
            stage: StageIndex::new(0),
            round_open: false,
            spawning_finished: false,
            expire_sent: false,
            chapter_complete: false,
        }
    }

    /// Reports whether every stage of the chapter has completed.
    #[must_use]
    pub fn is_chapter_complete(&self) -> bool {
        self.chapter_complete
    }

    /// Stage the director is currently running or about to run.
    #[must_use]
    pub fn current_stage(&self) -> StageIndex {
        self.stage
    }

    /// Consumes events and immutable views to emit spawn-flow commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        actors: &ActorView,
        player: &PlayerSnapshot,
        surface: &dyn NavSurface,
        out: &mut Vec<Command>,
    ) {
        // Placements accepted earlier in this same batch also count as
        // occupied space for the overlap check.
        let mut placed: Vec<(WorldPoint, f32)> = Vec::new();
        for event in events {
            match event {
                Event::StageBegan { stage } => self.open_round(*stage, out),
                Event::RoundCompleted { stage, .. } => self.close_round(*stage, out),
                Event::TimeAdvanced { dt } => {
                    self.advance(*dt, actors, player, surface, &mut placed, out);
                }
                _ => {}
            }
        }
    }

    fn open_round(&mut self, stage: StageIndex, out: &mut Vec<Command>) {
        self.stage = stage;
        self.queue = self
            .plan
            .stage(stage)
            .map(StagePlan::expand)
            .unwrap_or_default();
        self.accumulator = Duration::ZERO;
        self.round_elapsed = Duration::ZERO;
        self.round_open = true;
        self.expire_sent = false;

        let spread = self.config.round_duration / 3;
        self.spawn_interval = match u32::try_from(self.queue.len()) {
            Ok(len) if len > 0 => spread / len,
            _ => Duration::ZERO,
        };

        self.spawning_finished = self.queue.is_empty();
        if self.spawning_finished {
            out.push(Command::MarkSpawningFinished);
        }
    }

    fn close_round(&mut self, stage: StageIndex, out: &mut Vec<Command>) {
        self.round_open = false;
        let next = stage.next();
        if (next.get() as usize) < self.plan.stage_count() {
            out.push(Command::BeginStage { stage: next });
        } else {
            self.chapter_complete = true;
        }
    }

    fn advance(
        &mut self,
        dt: Duration,
        actors: &ActorView,
        player: &PlayerSnapshot,
        surface: &dyn NavSurface,
        placed: &mut Vec<(WorldPoint, f32)>,
        out: &mut Vec<Command>,
    ) {
        if !self.round_open {
            return;
        }
        self.round_elapsed = self.round_elapsed.saturating_add(dt);

        if !self.spawning_finished {
            self.accumulator = self.accumulator.saturating_add(dt);
            while !self.queue.is_empty() && self.accumulator >= self.spawn_interval {
                self.accumulator = self.accumulator.saturating_sub(self.spawn_interval);
                let kind = self
                    .queue
                    .pop_front()
                    .expect("loop condition guarantees a queued kind");
                let position = self.place(kind, actors, player, surface, placed);
                out.push(Command::SpawnActor {
                    kind,
                    position,
                    facing: position.angle_to(player.position),
                });
            }
            if self.queue.is_empty() {
                self.spawning_finished = true;
                out.push(Command::MarkSpawningFinished);
            }
        }

        if self.round_elapsed >= self.config.round_duration
            && !self.expire_sent
            && !self.plan.is_final(self.stage)
        {
            self.expire_sent = true;
            out.push(Command::ExpireRound);
        }
    }

    fn place(
        &mut self,
        kind: ActorKind,
        actors: &ActorView,
        player: &PlayerSnapshot,
        surface: &dyn NavSurface,
        placed: &mut Vec<(WorldPoint, f32)>,
    ) -> WorldPoint {
        let radius = self.radius_of(kind);
        let min_r = self
            .config
            .no_spawn_radius
            .max(radius + self.config.min_extra_spacing);
        let reach = surface.bounding_extent().distance_to_edge(player.position)
            - self.config.boundary_padding;
        let max_r = reach
            .max(min_r)
            .min(min_r + self.config.ring_extra_radius);

        for _ in 0..self.config.placement_tries {
            let candidate = self.sample_annulus(player.position, min_r, max_r);
            let Some(snapped) = surface.sample_nearest_point(candidate, PLACEMENT_SNAP_DISTANCE)
            else {
                continue;
            };
            if snapped.distance(player.position) < self.config.no_spawn_radius {
                continue;
            }
            if self.overlaps(snapped, radius, actors, placed) {
                continue;
            }
            placed.push((snapped, radius));
            return snapped;
        }

        let point = self.fallback(radius, player.position, surface);
        placed.push((point, radius));
        point
    }

    /// Uniform-by-area sample in the ring `[min_r, max_r]` around `center`.
    fn sample_annulus(&mut self, center: WorldPoint, min_r: f32, max_r: f32) -> WorldPoint {
        let theta = self.rng.gen_range(-PI..PI);
        let area = self.rng.gen_range(0.0f32..1.0);
        let r = (area * (max_r * max_r - min_r * min_r) + min_r * min_r).sqrt();
        let offset = Vec2::from_angle(theta) * r;
        WorldPoint::new(center.x() + offset.x, center.z() + offset.y)
    }

    fn overlaps(
        &self,
        point: WorldPoint,
        radius: f32,
        actors: &ActorView,
        placed: &[(WorldPoint, f32)],
    ) -> bool {
        let clearance = 2.0 * radius + self.config.min_extra_spacing;
        actors
            .iter()
            .any(|snapshot| snapshot.position.distance(point) < clearance)
            || placed
                .iter()
                .any(|(other, _)| other.distance(point) < clearance)
    }

    /// Unconditional placement just outside the no-spawn radius.
    ///
    /// Accepted even when it overlaps another actor; if snapping pulled the
    /// point inside the forbidden disc it is pushed back out along its
    /// bearing from the player.
    fn fallback(&mut self, radius: f32, player: WorldPoint, surface: &dyn NavSurface) -> WorldPoint {
        let theta = self.rng.gen_range(-PI..PI);
        let candidate = player.offset(theta, self.config.no_spawn_radius + radius);
        let snapped = surface
            .sample_nearest_point(candidate, PLACEMENT_SNAP_DISTANCE)
            .unwrap_or(candidate);
        if snapped.distance(player) >= self.config.no_spawn_radius {
            return snapped;
        }

        let bearing = if snapped.distance_squared(player) <= f32::EPSILON {
            theta
        } else {
            player.angle_to(snapped)
        };
        player.offset(bearing, self.config.no_spawn_radius)
    }

    fn radius_of(&self, kind: ActorKind) -> f32 {
        self.radii.get(&kind).copied().unwrap_or(DEFAULT_ACTOR_RADIUS)
    }
}

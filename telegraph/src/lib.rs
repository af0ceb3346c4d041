#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-boxed warning primitives drawn from per-shape pools.
//!
//! A telegraph renders a base outline immediately and a fill overlay that
//! grows linearly from nothing to the final geometry over its duration. The
//! board guarantees that every primitive returns to its pool exactly once:
//! hiding is idempotent, and an auto-hide fires when the duration lapses even
//! if the owning cast was aborted mid-flight.

use std::time::Duration;

use rift_siege_core::{
    ActorId, ActorKind, Footprint, TelegraphClass, TelegraphId, TelegraphSnapshot, WorldPoint,
};
use rift_siege_pool::{Handle, Pool, PoolConfig, PoolConfigError};

/// Capacity configuration for the three shape-class pools.
#[derive(Clone, Copy, Debug)]
pub struct TelegraphBoardConfig {
    /// Pool capacity for line primitives.
    pub lines: PoolConfig,
    /// Pool capacity for circle primitives.
    pub circles: PoolConfig,
    /// Pool capacity for arc primitives.
    pub arcs: PoolConfig,
    /// Width substituted when a line footprint carries no usable width.
    pub default_line_width: f32,
}

impl Default for TelegraphBoardConfig {
    fn default() -> Self {
        Self {
            lines: PoolConfig::new(8, 32),
            circles: PoolConfig::new(8, 32),
            arcs: PoolConfig::new(8, 32),
            default_line_width: 1.0,
        }
    }
}

#[derive(Debug)]
struct Primitive {
    owner: ActorId,
    footprint: Footprint,
    duration: Duration,
    elapsed: Duration,
}

impl Primitive {
    fn dormant() -> Self {
        Self {
            owner: ActorId::new(ActorKind::Husk, 0, 0),
            footprint: Footprint::Circle {
                center: WorldPoint::ORIGIN,
                radius: 0.0,
            },
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    fn fill_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Result of showing a telegraph, including any primitive recycled for room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowOutcome {
    /// Identifier of the freshly shown telegraph.
    pub id: TelegraphId,
    /// Telegraph force-hidden to make room, when the class pool was full.
    pub evicted: Option<TelegraphId>,
}

/// Registry of visible telegraphs backed by per-shape pools.
#[derive(Debug)]
pub struct TelegraphBoard {
    lines: Pool<Primitive>,
    circles: Pool<Primitive>,
    arcs: Pool<Primitive>,
    default_line_width: f32,
}

impl TelegraphBoard {
    /// Creates a board and prewarms the three shape-class pools.
    pub fn new(config: TelegraphBoardConfig) -> Result<Self, PoolConfigError> {
        Ok(Self {
            lines: Pool::initialize(config.lines, Primitive::dormant)?,
            circles: Pool::initialize(config.circles, Primitive::dormant)?,
            arcs: Pool::initialize(config.arcs, Primitive::dormant)?,
            default_line_width: config.default_line_width,
        })
    }

    /// Shows a telegraph covering the provided footprint for `duration`.
    ///
    /// A line footprint whose width is not a positive finite number receives
    /// the board's default width instead.
    pub fn show(&mut self, owner: ActorId, footprint: Footprint, duration: Duration) -> ShowOutcome {
        let footprint = self.normalize(footprint);
        let class = TelegraphClass::of(&footprint);
        let outcome = self.pool_mut(class).spawn(Primitive::dormant);
        let primitive = self
            .pool_mut(class)
            .get_mut(outcome.handle)
            .expect("freshly spawned primitive is live");
        primitive.owner = owner;
        primitive.footprint = footprint;
        primitive.duration = duration;
        primitive.elapsed = Duration::ZERO;

        ShowOutcome {
            id: id_of(class, outcome.handle),
            evicted: outcome.evicted.map(|handle| id_of(class, handle)),
        }
    }

    /// Hides a telegraph, returning its primitive to the shape pool.
    ///
    /// Hiding twice, or after the auto-hide already fired, is a no-op that
    /// returns `false`; the primitive is never returned more than once.
    pub fn hide(&mut self, id: TelegraphId) -> bool {
        self.pool_mut(id.class()).despawn(handle_of(id))
    }

    /// Force-hides every telegraph owned by the provided actor.
    ///
    /// Hidden identifiers are appended to `out` in deterministic order.
    pub fn hide_owned(&mut self, owner: ActorId, out: &mut Vec<TelegraphId>) {
        for class in CLASS_ORDER {
            let pool = self.pool_mut(class);
            let owned: Vec<Handle> = pool
                .iter_active()
                .filter(|(_, primitive)| primitive.owner == owner)
                .map(|(handle, _)| handle)
                .collect();
            for handle in owned {
                if pool.despawn(handle) {
                    out.push(id_of(class, handle));
                }
            }
        }
    }

    /// Advances every fill and auto-hides primitives whose duration lapsed.
    ///
    /// Expired identifiers are appended to `out` in deterministic order.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<TelegraphId>) {
        for class in CLASS_ORDER {
            let pool = self.pool_mut(class);
            let mut expired: Vec<Handle> = Vec::new();
            for (handle, primitive) in pool.iter_active_mut() {
                primitive.elapsed = primitive.elapsed.saturating_add(dt);
                if primitive.elapsed >= primitive.duration {
                    expired.push(handle);
                }
            }
            for handle in expired {
                if pool.despawn(handle) {
                    out.push(id_of(class, handle));
                }
            }
        }
    }

    /// Current fill progress of a telegraph, if it is still visible.
    #[must_use]
    pub fn fill_progress(&self, id: TelegraphId) -> Option<f32> {
        self.pool(id.class())
            .get(handle_of(id))
            .map(Primitive::fill_progress)
    }

    /// Number of telegraphs currently visible across all shape classes.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        CLASS_ORDER
            .into_iter()
            .map(|class| self.pool(class).active_count())
            .sum()
    }

    /// Captures read-only snapshots of every visible telegraph.
    #[must_use]
    pub fn snapshots(&self) -> Vec<TelegraphSnapshot> {
        let mut snapshots = Vec::with_capacity(self.visible_count());
        for class in CLASS_ORDER {
            for (handle, primitive) in self.pool(class).iter_active() {
                snapshots.push(TelegraphSnapshot {
                    id: id_of(class, handle),
                    owner: primitive.owner,
                    footprint: primitive.footprint,
                    duration: primitive.duration,
                    fill_progress: primitive.fill_progress(),
                });
            }
        }
        snapshots
    }

    fn normalize(&self, footprint: Footprint) -> Footprint {
        match footprint {
            Footprint::Line { from, to, width } if !(width.is_finite() && width > 0.0) => {
                Footprint::Line {
                    from,
                    to,
                    width: self.default_line_width,
                }
            }
            other => other,
        }
    }

    fn pool(&self, class: TelegraphClass) -> &Pool<Primitive> {
        match class {
            TelegraphClass::Line => &self.lines,
            TelegraphClass::Circle => &self.circles,
            TelegraphClass::Arc => &self.arcs,
        }
    }

    fn pool_mut(&mut self, class: TelegraphClass) -> &mut Pool<Primitive> {
        match class {
            TelegraphClass::Line => &mut self.lines,
            TelegraphClass::Circle => &mut self.circles,
            TelegraphClass::Arc => &mut self.arcs,
        }
    }
}

const CLASS_ORDER: [TelegraphClass; 3] = [
    TelegraphClass::Line,
    TelegraphClass::Circle,
    TelegraphClass::Arc,
];

fn id_of(class: TelegraphClass, handle: Handle) -> TelegraphId {
    TelegraphId::new(class, handle.slot(), handle.generation())
}

fn handle_of(id: TelegraphId) -> Handle {
    Handle::new(id.slot(), id.generation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_siege_core::ActorKind;

    fn board() -> TelegraphBoard {
        TelegraphBoard::new(TelegraphBoardConfig::default()).expect("valid config")
    }

    fn owner(slot: u32) -> ActorId {
        ActorId::new(ActorKind::Warden, slot, 1)
    }

    fn circle(radius: f32) -> Footprint {
        Footprint::Circle {
            center: WorldPoint::ORIGIN,
            radius,
        }
    }

    #[test]
    fn hide_is_idempotent() {
        let mut board = board();
        let shown = board.show(owner(0), circle(2.0), Duration::from_secs(1));

        assert!(board.hide(shown.id));
        assert!(!board.hide(shown.id), "second hide is a no-op");
        assert_eq!(board.visible_count(), 0);
    }

    #[test]
    fn hide_after_auto_hide_is_a_no_op() {
        let mut board = board();
        let shown = board.show(owner(0), circle(2.0), Duration::from_millis(500));

        let mut expired = Vec::new();
        board.tick(Duration::from_secs(1), &mut expired);
        assert_eq!(expired, vec![shown.id]);

        assert!(!board.hide(shown.id));
        assert_eq!(board.visible_count(), 0);
    }

    #[test]
    fn fill_progress_grows_monotonically_to_one() {
        let mut board = board();
        let shown = board.show(owner(0), circle(2.0), Duration::from_secs(2));
        assert_eq!(board.fill_progress(shown.id), Some(0.0));

        let mut expired = Vec::new();
        board.tick(Duration::from_millis(500), &mut expired);
        let quarter = board.fill_progress(shown.id).expect("visible");
        assert!((quarter - 0.25).abs() < 1e-5);

        board.tick(Duration::from_millis(1_000), &mut expired);
        let three_quarters = board.fill_progress(shown.id).expect("visible");
        assert!(three_quarters > quarter);
        assert!((three_quarters - 0.75).abs() < 1e-5);

        board.tick(Duration::from_millis(500), &mut expired);
        assert_eq!(expired, vec![shown.id], "fill reached one and auto-hid");
    }

    #[test]
    fn owned_telegraphs_are_force_hidden_together() {
        let mut board = board();
        let caster = owner(3);
        let other = owner(4);
        let first = board.show(caster, circle(1.0), Duration::from_secs(5));
        let second = board.show(
            caster,
            Footprint::Line {
                from: WorldPoint::ORIGIN,
                to: WorldPoint::new(4.0, 0.0),
                width: 1.0,
            },
            Duration::from_secs(5),
        );
        let unrelated = board.show(other, circle(1.0), Duration::from_secs(5));

        let mut hidden = Vec::new();
        board.hide_owned(caster, &mut hidden);
        assert_eq!(hidden.len(), 2);
        assert!(hidden.contains(&first.id));
        assert!(hidden.contains(&second.id));
        assert_eq!(board.visible_count(), 1);
        assert!(board.fill_progress(unrelated.id).is_some());
    }

    #[test]
    fn full_class_pool_evicts_oldest_warning() {
        let mut board = TelegraphBoard::new(TelegraphBoardConfig {
            circles: PoolConfig::new(0, 2),
            ..TelegraphBoardConfig::default()
        })
        .expect("valid config");

        let first = board.show(owner(0), circle(1.0), Duration::from_secs(9));
        let _second = board.show(owner(0), circle(1.0), Duration::from_secs(9));
        let third = board.show(owner(0), circle(1.0), Duration::from_secs(9));

        assert_eq!(third.evicted, Some(first.id));
        assert_eq!(board.visible_count(), 2);
        assert!(board.fill_progress(first.id).is_none());
    }

    #[test]
    fn non_positive_line_width_receives_default() {
        let mut board = board();
        let shown = board.show(
            owner(0),
            Footprint::Line {
                from: WorldPoint::ORIGIN,
                to: WorldPoint::new(3.0, 0.0),
                width: 0.0,
            },
            Duration::from_secs(1),
        );

        let snapshots = board.snapshots();
        let snapshot = snapshots
            .iter()
            .find(|snapshot| snapshot.id == shown.id)
            .expect("visible");
        match snapshot.footprint {
            Footprint::Line { width, .. } => assert!((width - 1.0).abs() < f32::EPSILON),
            other => panic!("expected line footprint, got {other:?}"),
        }
    }

    #[test]
    fn zero_duration_telegraph_reports_full_fill_and_expires() {
        let mut board = board();
        let shown = board.show(owner(0), circle(1.0), Duration::ZERO);
        assert_eq!(board.fill_progress(shown.id), Some(1.0));

        let mut expired = Vec::new();
        board.tick(Duration::ZERO, &mut expired);
        assert_eq!(expired, vec![shown.id]);
    }
}

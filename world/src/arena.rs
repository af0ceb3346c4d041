//! Flat rectangular stand-in for the navigable-surface provider.
//!
//! The real surface representation is built by an excluded subsystem; this
//! implementation exists so the CLI adapter and tests can exercise placement
//! and aim clamping without it.

use rift_siege_core::{Bounds, NavSurface, WorldPoint};

/// Rectangular walkable plane with clamp-based sampling.
#[derive(Clone, Copy, Debug)]
pub struct FlatArena {
    bounds: Bounds,
}

impl FlatArena {
    /// Creates a square arena spanning `half_extent` in every direction.
    #[must_use]
    pub fn centered(half_extent: f32) -> Self {
        Self {
            bounds: Bounds::new(
                WorldPoint::new(-half_extent, -half_extent),
                WorldPoint::new(half_extent, half_extent),
            ),
        }
    }

    /// Creates an arena covering the provided extent.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

impl NavSurface for FlatArena {
    fn sample_nearest_point(&self, point: WorldPoint, max_distance: f32) -> Option<WorldPoint> {
        let snapped = self.bounds.clamp(point);
        (snapped.distance(point) <= max_distance).then_some(snapped)
    }

    fn bounding_extent(&self) -> Bounds {
        self.bounds
    }

    fn raycast(&self, from: WorldPoint, to: WorldPoint) -> Option<WorldPoint> {
        if !self.bounds.contains(from) {
            return None;
        }
        if self.bounds.contains(to) {
            return Some(to);
        }

        let dx = to.x() - from.x();
        let dz = to.z() - from.z();
        let mut t = 1.0f32;
        if dx > 0.0 {
            t = t.min((self.bounds.max().x() - from.x()) / dx);
        } else if dx < 0.0 {
            t = t.min((self.bounds.min().x() - from.x()) / dx);
        }
        if dz > 0.0 {
            t = t.min((self.bounds.max().z() - from.z()) / dz);
        } else if dz < 0.0 {
            t = t.min((self.bounds.min().z() - from.z()) / dz);
        }
        let t = t.clamp(0.0, 1.0);
        Some(WorldPoint::new(from.x() + dx * t, from.z() + dz * t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_clamps_onto_the_plane() {
        let arena = FlatArena::centered(10.0);
        let snapped = arena
            .sample_nearest_point(WorldPoint::new(12.0, 3.0), 5.0)
            .expect("within snap distance");
        assert_eq!(snapped, WorldPoint::new(10.0, 3.0));
    }

    #[test]
    fn sampling_fails_beyond_the_search_distance() {
        let arena = FlatArena::centered(10.0);
        assert!(arena
            .sample_nearest_point(WorldPoint::new(30.0, 0.0), 5.0)
            .is_none());
    }

    #[test]
    fn raycast_stops_at_the_boundary() {
        let arena = FlatArena::centered(10.0);
        let hit = arena
            .raycast(WorldPoint::ORIGIN, WorldPoint::new(20.0, 0.0))
            .expect("cast from inside");
        assert!((hit.x() - 10.0).abs() < 1e-5);
        assert!(hit.z().abs() < 1e-5);
    }

    #[test]
    fn raycast_passes_through_interior_targets() {
        let arena = FlatArena::centered(10.0);
        let target = WorldPoint::new(4.0, -3.0);
        assert_eq!(arena.raycast(WorldPoint::ORIGIN, target), Some(target));
    }
}

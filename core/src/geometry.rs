//! Ground-plane geometry shared by placement, telegraphs, and damage checks.

use serde::{Deserialize, Serialize};

/// Point on the walkable ground plane expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    z: f32,
}

impl WorldPoint {
    /// Origin of the ground plane.
    pub const ORIGIN: WorldPoint = WorldPoint::new(0.0, 0.0);

    /// Creates a new ground-plane point.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Depth coordinate of the point.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    /// Returns the point displaced by `length` along `angle` radians.
    #[must_use]
    pub fn offset(self, angle: f32, length: f32) -> WorldPoint {
        WorldPoint::new(self.x + angle.cos() * length, self.z + angle.sin() * length)
    }

    /// Angle in radians from this point toward `other`.
    #[must_use]
    pub fn angle_to(self, other: WorldPoint) -> f32 {
        (other.z - self.z).atan2(other.x - self.x)
    }
}

/// Axis-aligned extent of the navigable surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: WorldPoint,
    max: WorldPoint,
}

impl Bounds {
    /// Creates bounds from opposite corners.
    #[must_use]
    pub const fn new(min: WorldPoint, max: WorldPoint) -> Self {
        Self { min, max }
    }

    /// Lower corner of the extent.
    #[must_use]
    pub const fn min(&self) -> WorldPoint {
        self.min
    }

    /// Upper corner of the extent.
    #[must_use]
    pub const fn max(&self) -> WorldPoint {
        self.max
    }

    /// Reports whether the point lies inside the extent.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.z() >= self.min.z()
            && point.z() <= self.max.z()
    }

    /// Clamps the point onto the extent.
    #[must_use]
    pub fn clamp(&self, point: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            point.x().clamp(self.min.x(), self.max.x()),
            point.z().clamp(self.min.z(), self.max.z()),
        )
    }

    /// Smallest distance from an interior point to any boundary edge.
    ///
    /// Returns zero when the point lies on or outside the boundary.
    #[must_use]
    pub fn distance_to_edge(&self, point: WorldPoint) -> f32 {
        let left = point.x() - self.min.x();
        let right = self.max.x() - point.x();
        let near = point.z() - self.min.z();
        let far = self.max.z() - point.z();
        left.min(right).min(near).min(far).max(0.0)
    }
}

/// Damage-relevant geometry shared by telegraphs and area strikes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    /// Capsule-like strip between two points.
    Line {
        /// Starting endpoint of the strip.
        from: WorldPoint,
        /// Final endpoint of the strip.
        to: WorldPoint,
        /// Full width of the strip in world units.
        width: f32,
    },
    /// Filled disc around a center.
    Circle {
        /// Center of the disc.
        center: WorldPoint,
        /// Radius of the disc in world units.
        radius: f32,
    },
    /// Circular sector opening around a facing direction.
    Arc {
        /// Apex of the sector.
        center: WorldPoint,
        /// Radius of the sector in world units.
        radius: f32,
        /// Direction the sector opens toward, in radians.
        facing: f32,
        /// Half of the sector's opening angle, in radians.
        half_angle: f32,
    },
}

impl Footprint {
    /// Reports whether the point lies inside the footprint.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        match *self {
            Footprint::Line { from, to, width } => {
                distance_to_segment(point, from, to) <= width * 0.5
            }
            Footprint::Circle { center, radius } => center.distance(point) <= radius,
            Footprint::Arc {
                center,
                radius,
                facing,
                half_angle,
            } => {
                if center.distance(point) > radius {
                    return false;
                }
                if center.distance_squared(point) <= f32::EPSILON {
                    return true;
                }
                let bearing = center.angle_to(point);
                wrap_angle(bearing - facing).abs() <= half_angle
            }
        }
    }
}

fn distance_to_segment(point: WorldPoint, from: WorldPoint, to: WorldPoint) -> f32 {
    let length_squared = from.distance_squared(to);
    if length_squared <= f32::EPSILON {
        return from.distance(point);
    }

    let dx = to.x() - from.x();
    let dz = to.z() - from.z();
    let px = point.x() - from.x();
    let pz = point.z() - from.z();
    let t = ((px * dx + pz * dz) / length_squared).clamp(0.0, 1.0);
    let closest = WorldPoint::new(from.x() + t * dx, from.z() + t * dz);
    closest.distance(point)
}

/// Normalizes an angle into the `[-PI, PI]` range.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut wrapped = angle % std::f32::consts::TAU;
    if wrapped > std::f32::consts::PI {
        wrapped -= std::f32::consts::TAU;
    } else if wrapped < -std::f32::consts::PI {
        wrapped += std::f32::consts::TAU;
    }
    wrapped
}

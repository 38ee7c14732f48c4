use std::ops::{Add, Div, Sub};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point2
// ─────────────────────────────────────────────────────────────────────────────

/// A point in the plane. Serializes as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Polar angle in `[0, 2π)`.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x).rem_euclid(std::f64::consts::TAU)
    }

    /// Z component of the cross product `(b - self) × (c - b)`.
    ///
    /// Positive for a left (counter-clockwise) turn at `b`.
    #[must_use]
    pub fn turn(self, b: Self, c: Self) -> f64 {
        let (ux, uy) = (b.x - self.x, b.y - self.y);
        let (vx, vy) = (c.x - b.x, c.y - b.y);
        ux * vy - uy * vx
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Convert point to a position vector from the origin.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point2_angle_wraps_into_positive_range() {
        assert!((Point2::new(0.0, -1.0).angle() - 1.5 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(Point2::new(1.0, 0.0).angle(), 0.0);
    }

    #[test]
    fn point2_turn_sign() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(a.turn(b, Point2::new(1.0, 1.0)) > 0.0);
        assert!(a.turn(b, Point2::new(1.0, -1.0)) < 0.0);
        assert_eq!(a.turn(b, Point2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn vec3_cross_is_right_handed() {
        let z = Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vec3::new(0.0, 0.0, 1.0));
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn point3_lerp_and_vec3_centroid() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::from_array([2.0, 4.0, -6.0]);
        assert_eq!(a.lerp(b, 0.5).to_array(), [1.0, 2.0, -3.0]);

        let c = Vec3::from([3.0, 0.0, 0.0]);
        let centroid = (a.to_vec3() + b.to_vec3() + c) / 3.0;
        assert_eq!(centroid, Vec3::new(5.0 / 3.0, 4.0 / 3.0, -2.0));
        assert_eq!((b.to_vec3() - c).to_array(), [-1.0, 4.0, -6.0]);
    }
}

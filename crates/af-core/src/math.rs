//! Small vector math for blackboard values.
//!
//! Only what the blackboard needs: storage, approximate equality, and a
//! display format.  Float keys compare with [`SMALL_NUMBER`]; vectors and
//! rotators compare component-wise with [`KINDA_SMALL_NUMBER`].

use std::fmt;

/// Tolerance for float entry comparisons.
pub const SMALL_NUMBER: f32 = 1.0e-8;

/// Tolerance for component-wise vector and rotator comparisons.
pub const KINDA_SMALL_NUMBER: f64 = 1.0e-4;

/// `|a - b| <= tolerance`.
#[inline]
pub fn nearly_equal(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

// ── Vector ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise approximate equality.
    pub fn equals(self, other: Vector, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X={:.3} Y={:.3} Z={:.3}", self.x, self.y, self.z)
    }
}

// ── Rotator ───────────────────────────────────────────────────────────────────

/// Euler rotation in degrees.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotator {
    pub pitch: f64,
    pub yaw:   f64,
    pub roll:  f64,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator { pitch: 0.0, yaw: 0.0, roll: 0.0 };

    #[inline]
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Wrap an angle into `(-180, 180]`.
    pub fn normalize_axis(angle: f64) -> f64 {
        let mut a = angle % 360.0;
        if a < 0.0 {
            a += 360.0;
        }
        if a > 180.0 {
            a -= 360.0;
        }
        a
    }

    /// Per-axis approximate equality after normalizing the difference, so
    /// `359°` and `-1°` are equal.
    pub fn equals(self, other: Rotator, tolerance: f64) -> bool {
        Self::normalize_axis(self.pitch - other.pitch).abs() <= tolerance
            && Self::normalize_axis(self.yaw - other.yaw).abs() <= tolerance
            && Self::normalize_axis(self.roll - other.roll).abs() <= tolerance
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P={:.6} Y={:.6} R={:.6}", self.pitch, self.yaw, self.roll)
    }
}

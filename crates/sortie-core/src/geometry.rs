//! 3D position helpers.
//!
//! Positions are plain [`glam::Vec3`] values. Callers guard zero-distance
//! cases before asking for a direction.

use glam::Vec3;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).length()
}

/// Unit vector pointing from `from` to `to`.
///
/// Returns `None` when the points coincide; there is no meaningful heading
/// and the caller should skip the move.
#[must_use]
pub fn direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = to - from;
    let len = delta.length();
    if len > f32::EPSILON && len.is_finite() {
        Some(delta / len)
    } else {
        None
    }
}

/// Moves `pos` along `dir` by `speed`, clamped against a reference point.
///
/// `cap` is the remaining distance to the reference point. If the step would
/// cover more than `cap`, the unit stops `buffer` short of the reference
/// instead (never moving backwards).
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use sortie_core::geometry::advance;
///
/// // 150 step toward a point 100 away stops 50 short of it
/// let pos = advance(Vec3::ZERO, Vec3::X, 150.0, 100.0, 50.0);
/// assert_eq!(pos, Vec3::new(50.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn advance(pos: Vec3, dir: Vec3, speed: f32, cap: f32, buffer: f32) -> Vec3 {
    if speed > cap {
        pos + dir * (cap - buffer).max(0.0)
    } else {
        pos + dir * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 12.0));
        assert!((d - 13.0).abs() < 1e-5);
    }

    #[test]
    fn direction_is_unit_length() {
        let dir = direction(Vec3::new(1.0, 1.0, 1.0), Vec3::new(4.0, 5.0, 1.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dir.x - 0.6).abs() < 1e-5);
        assert!((dir.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn direction_of_coincident_points_is_none() {
        let p = Vec3::new(10.0, -3.0, 2.0);
        assert!(direction(p, p).is_none());
    }

    #[test]
    fn advance_full_step_when_far() {
        let pos = advance(Vec3::ZERO, Vec3::X, 150.0, 1000.0, 50.0);
        assert_eq!(pos, Vec3::new(150.0, 0.0, 0.0));
    }

    #[test]
    fn advance_never_moves_backwards() {
        // Already inside the buffer: stay put rather than back off
        let pos = advance(Vec3::ZERO, Vec3::X, 150.0, 30.0, 50.0);
        assert_eq!(pos, Vec3::ZERO);
    }
}

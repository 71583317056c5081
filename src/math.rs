//! 2D helpers on top of `glam::Vec2`.

use glam::Vec2;

/// Scalar cross product `a x b`.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Cross of a scalar angular velocity with a vector: `w x r`.
#[inline]
pub fn cross_sv(w: f32, r: Vec2) -> Vec2 {
    Vec2::new(-w * r.y, w * r.x)
}

/// Rotate `v` by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    Vec2::from_angle(angle).rotate(v)
}

/// Clamp `x` into `[-max, max]`. A negative or NaN bound clamps to zero, so
/// this never panics the way `f32::clamp` does on a bad range.
#[inline]
pub fn clamp_abs(x: f32, max: f32) -> f32 {
    let max = max.max(0.0);
    x.max(-max).min(max)
}

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn union(self, other: Aabb) -> Aabb {
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), core::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cross_sv_matches_perp() {
        let r = Vec2::new(2.0, 0.0);
        assert_eq!(cross_sv(3.0, r), Vec2::new(0.0, 6.0));
        assert_eq!(cross(Vec2::X, Vec2::Y), 1.0);
    }

    #[test]
    fn clamp_abs_tolerates_bad_bounds() {
        assert_eq!(clamp_abs(7.0, 5.0), 5.0);
        assert_eq!(clamp_abs(-7.0, 5.0), -5.0);
        assert_eq!(clamp_abs(3.0, 5.0), 3.0);
        assert_eq!(clamp_abs(3.0, -1.0), 0.0);
        assert_eq!(clamp_abs(3.0, f32::NAN), 0.0);
    }

    #[test]
    fn aabb_union_and_center() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 0.5));
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(0.0, -1.0));
        assert_eq!(u.max, Vec2::new(3.0, 1.0));
        assert_eq!(u.center(), Vec2::new(1.5, 0.0));
        assert!(a.overlaps(&u));
        assert!(!a.overlaps(&Aabb::new(Vec2::splat(1.5), Vec2::splat(2.0))));
    }
}

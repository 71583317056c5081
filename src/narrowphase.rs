use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::body::Body;
use crate::math::rotate;
use crate::types::*;

/// Exact overlap tests for circles and oriented rectangles.
pub struct Narrowphase;

impl Narrowphase {
    /// Dispatch on the shapes of two bodies. Normal points from `b` into `a`.
    pub fn overlap_bodies(a: &Body, b: &Body) -> Option<Overlap> {
        match (a.shape, b.shape) {
            (Shape::Circle { radius: r0 }, Shape::Circle { radius: r1 }) => {
                Self::overlap_circle_circle(a.position, r0, b.position, r1)
            }
            (Shape::Circle { radius }, Shape::Rectangle { width, height }) => Self::overlap_circle_rect(
                a.position,
                radius,
                b.position,
                Vec2::new(0.5 * width, 0.5 * height),
                b.angle,
            ),
            (Shape::Rectangle { width, height }, Shape::Circle { radius }) => {
                // Swap and invert normal
                let ov = Self::overlap_circle_rect(
                    b.position,
                    radius,
                    a.position,
                    Vec2::new(0.5 * width, 0.5 * height),
                    a.angle,
                )?;
                Some(Overlap { normal: -ov.normal, ..ov })
            }
            (Shape::Rectangle { width: w0, height: h0 }, Shape::Rectangle { width: w1, height: h1 }) => {
                Self::overlap_rect_rect(
                    a.position,
                    Vec2::new(0.5 * w0, 0.5 * h0),
                    a.angle,
                    b.position,
                    Vec2::new(0.5 * w1, 0.5 * h1),
                    b.angle,
                )
            }
        }
    }
}

impl NarrowphaseApi for Narrowphase {
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap> {
        let delta = c0 - c1;
        let dist2 = delta.length_squared();
        let rsum = r0 + r1;
        if dist2 >= rsum * rsum {
            return None;
        }
        if dist2 == 0.0 {
            // Coincident centers; pick a fixed axis so the pair still separates.
            let normal = Vec2::new(0.0, -1.0);
            return Some(Overlap { normal, depth: rsum, contact: c0 });
        }
        let dist = dist2.sqrt();
        let normal = delta / dist; // from B into A
        let depth = rsum - dist;
        let contact = c0 - normal * r0;
        Some(Overlap { normal, depth, contact })
    }

    fn overlap_circle_rect(c: Vec2, r: f32, box_c: Vec2, box_h: Vec2, box_angle: f32) -> Option<Overlap> {
        // Work in the box frame
        let local = rotate(c - box_c, -box_angle);
        let closest = local.clamp(-box_h, box_h);
        let d = local - closest;
        let dist2 = d.length_squared();

        if dist2 > 0.0 {
            if dist2 >= r * r {
                return None;
            }
            let dist = dist2.sqrt();
            let normal = rotate(d / dist, box_angle);
            let contact = box_c + rotate(closest, box_angle);
            return Some(Overlap { normal, depth: r - dist, contact });
        }

        // Center inside the box: push out through the nearest face.
        let to_x = box_h.x - local.x.abs();
        let to_y = box_h.y - local.y.abs();
        let (local_n, face_dist, face_point) = if to_x <= to_y {
            let sx = if local.x >= 0.0 { 1.0 } else { -1.0 };
            (Vec2::new(sx, 0.0), to_x, Vec2::new(sx * box_h.x, local.y))
        } else {
            let sy = if local.y >= 0.0 { 1.0 } else { -1.0 };
            (Vec2::new(0.0, sy), to_y, Vec2::new(local.x, sy * box_h.y))
        };
        Some(Overlap {
            normal: rotate(local_n, box_angle),
            depth: r + face_dist,
            contact: box_c + rotate(face_point, box_angle),
        })
    }

    fn overlap_rect_rect(
        c0: Vec2,
        h0: Vec2,
        angle0: f32,
        c1: Vec2,
        h1: Vec2,
        angle1: f32,
    ) -> Option<Overlap> {
        // Separating axis test over both boxes' local axes
        let ax0 = [rotate(Vec2::X, angle0), rotate(Vec2::Y, angle0)];
        let ax1 = [rotate(Vec2::X, angle1), rotate(Vec2::Y, angle1)];
        let d = c0 - c1;

        let radius_on = |axes: &[Vec2; 2], h: Vec2, n: Vec2| -> f32 {
            h.x * axes[0].dot(n).abs() + h.y * axes[1].dot(n).abs()
        };

        let mut best_depth = f32::INFINITY;
        let mut best_normal = Vec2::ZERO;
        for n in ax0.iter().chain(ax1.iter()).copied() {
            let overlap = radius_on(&ax0, h0, n) + radius_on(&ax1, h1, n) - d.dot(n).abs();
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best_depth {
                best_depth = overlap;
                best_normal = if d.dot(n) >= 0.0 { n } else { -n };
            }
        }

        // Contact point: A's center clamped into B's box, in B's frame
        let local = rotate(c0 - c1, -angle1).clamp(-h1, h1);
        let contact = c1 + rotate(local, angle1);
        Some(Overlap { normal: best_normal, depth: best_depth, contact })
    }

    fn point_in_circle(p: Vec2, c: Vec2, r: f32) -> bool {
        (p - c).length_squared() <= r * r
    }

    fn point_in_rect(p: Vec2, c: Vec2, h: Vec2, angle: f32) -> bool {
        let local = rotate(p - c, -angle);
        local.x.abs() <= h.x && local.y.abs() <= h.y
    }
}

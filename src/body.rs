//! Rigid point masses and static boundaries.

use glam::Vec2;

use crate::config::BodyOptions;
use crate::error::ConfigError;
use crate::math::{rotate, Aabb};
use crate::types::{BodyId, BodyRole, BodySnapshot, CompositeId, Pose, Shape, UserKey};

#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) id: BodyId,
    pub(crate) composite: CompositeId,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub angular_velocity: f32,
    /// Accumulated for the current step, cleared by the integrator.
    pub force: Vec2,
    pub torque: f32,
    pub(crate) mass: f32,
    pub(crate) inv_mass: f32,
    pub(crate) inertia: f32,
    pub(crate) inv_inertia: f32,
    pub(crate) density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub air_friction: f32,
    pub(crate) is_static: bool,
    pub role: Option<BodyRole>,
    pub user_key: Option<UserKey>,
}

impl Body {
    /// Build an unattached body. The world assigns id and composite on insertion.
    pub fn new(shape: Shape, pose: Pose, opts: &BodyOptions) -> Result<Self, ConfigError> {
        if !shape.is_valid() {
            return Err(ConfigError::InvalidShape);
        }
        if !pose.position.is_finite() || !pose.angle.is_finite() {
            return Err(ConfigError::InvalidPose);
        }
        opts.validate()?;

        let (mass, inv_mass, inertia, inv_inertia) = if opts.is_static {
            (f32::INFINITY, 0.0, f32::INFINITY, 0.0)
        } else {
            let mass = opts.density * shape.area();
            let inertia = shape.inertia(mass);
            (mass, 1.0 / mass, inertia, 1.0 / inertia)
        };

        Ok(Self {
            id: BodyId(u32::MAX),
            composite: CompositeId::ROOT,
            shape,
            position: pose.position,
            velocity: Vec2::ZERO,
            angle: pose.angle,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            inv_mass,
            inertia,
            inv_inertia,
            density: opts.density,
            friction: opts.friction,
            restitution: opts.restitution,
            air_friction: opts.air_friction,
            is_static: opts.is_static,
            role: None,
            user_key: opts.user_key,
        })
    }

    pub fn circle(center: Vec2, radius: f32, opts: &BodyOptions) -> Result<Self, ConfigError> {
        Self::new(Shape::circle(radius), Pose::at(center), opts)
    }

    pub fn rectangle(center: Vec2, width: f32, height: f32, opts: &BodyOptions) -> Result<Self, ConfigError> {
        Self::new(Shape::rectangle(width, height), Pose::at(center), opts)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn composite(&self) -> CompositeId {
        self.composite
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Moment of inertia about the center; infinite for static bodies.
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Accumulate a force at a world point; off-center points add torque.
    pub fn apply_force(&mut self, point: Vec2, force: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
        self.torque += crate::math::cross(point - self.position, force);
    }

    /// Accumulate a force through the center of mass.
    pub fn apply_central_force(&mut self, force: Vec2) {
        if !self.is_static {
            self.force += force;
        }
    }

    /// World-space velocity of a point rigidly attached to this body.
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.velocity + crate::math::cross_sv(self.angular_velocity, point - self.position)
    }

    /// Transform a body-local offset to world space.
    pub fn local_to_world(&self, offset: Vec2) -> Vec2 {
        self.position + rotate(offset, self.angle)
    }

    /// Transform a world point to a body-local offset.
    pub fn world_to_local(&self, point: Vec2) -> Vec2 {
        rotate(point - self.position, -self.angle)
    }

    pub fn aabb(&self) -> Aabb {
        match self.shape {
            Shape::Circle { radius } => Aabb::from_center_half(self.position, Vec2::splat(radius)),
            Shape::Rectangle { width, height } => {
                let (s, c) = self.angle.sin_cos();
                let hw = 0.5 * width;
                let hh = 0.5 * height;
                let half = Vec2::new(hw * c.abs() + hh * s.abs(), hw * s.abs() + hh * c.abs());
                Aabb::from_center_half(self.position, half)
            }
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        use crate::api::NarrowphaseApi;
        use crate::narrowphase::Narrowphase;
        match self.shape {
            Shape::Circle { radius } => Narrowphase::point_in_circle(p, self.position, radius),
            Shape::Rectangle { width, height } => Narrowphase::point_in_rect(
                p,
                self.position,
                Vec2::new(0.5 * width, 0.5 * height),
                self.angle,
            ),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.angle.is_finite()
            && self.angular_velocity.is_finite()
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            position: self.position,
            angle: self.angle,
            shape: self.shape,
            is_static: self.is_static,
            user_key: self.user_key,
        }
    }
}

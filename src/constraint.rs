//! Damped distance springs between two bodies or a body and a fixed point.

use glam::Vec2;

use crate::config::{check_damping, check_stiffness};
use crate::error::ConfigError;
use crate::types::{BodyId, ConstraintId};

/// Second endpoint of a constraint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Endpoint {
    /// A point attached to a body, as a local offset from its center.
    Body { body: BodyId, offset: Vec2 },
    /// A world-space pin.
    Fixed(Vec2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Structural,
    Pointer,
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub(crate) id: ConstraintId,
    pub body_a: BodyId,
    /// Local offset of the anchor on body A.
    pub offset_a: Vec2,
    pub end_b: Endpoint,
    pub(crate) rest_length: f32,
    pub(crate) stiffness: f32,
    pub(crate) damping: f32,
    pub(crate) kind: ConstraintKind,
}

impl Constraint {
    /// Spring between the centers of two bodies.
    pub fn between(a: BodyId, b: BodyId, rest_length: f32, stiffness: f32, damping: f32) -> Result<Self, ConfigError> {
        Self::new(
            a,
            Vec2::ZERO,
            Endpoint::Body { body: b, offset: Vec2::ZERO },
            rest_length,
            stiffness,
            damping,
        )
    }

    /// Pin from an anchor on `a` to a world point.
    pub fn pin(a: BodyId, offset_a: Vec2, point: Vec2, rest_length: f32, stiffness: f32, damping: f32) -> Result<Self, ConfigError> {
        Self::new(a, offset_a, Endpoint::Fixed(point), rest_length, stiffness, damping)
    }

    pub fn new(
        body_a: BodyId,
        offset_a: Vec2,
        end_b: Endpoint,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Result<Self, ConfigError> {
        if !(rest_length.is_finite() && rest_length >= 0.0) {
            return Err(ConfigError::InvalidRestLength(rest_length));
        }
        check_stiffness(stiffness)?;
        check_damping(damping)?;
        Ok(Self {
            id: ConstraintId(u32::MAX),
            body_a,
            offset_a,
            end_b,
            rest_length,
            stiffness,
            damping,
            kind: ConstraintKind::Structural,
        })
    }

    pub(crate) fn into_pointer(mut self) -> Self {
        self.kind = ConstraintKind::Pointer;
        self
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn body_b(&self) -> Option<BodyId> {
        match self.end_b {
            Endpoint::Body { body, .. } => Some(body),
            Endpoint::Fixed(_) => None,
        }
    }

    /// Move the fixed endpoint. No-op for body-to-body springs.
    pub fn set_fixed_point(&mut self, point: Vec2) {
        if let Endpoint::Fixed(p) = &mut self.end_b {
            *p = point;
        }
    }

    pub fn references(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b() == Some(body)
    }
}

//! Composites and the ring-blob builder.
//!
//! A composite groups bodies and constraints that belong together. Storage lives
//! in the [`World`] arenas; a composite holds the ids of its members, and each
//! body records the single composite it belongs to.

use glam::Vec2;

use crate::body::Body;
use crate::config::{check_damping, check_stiffness, BlobConfig};
use crate::constraint::Constraint;
use crate::error::{ConfigError, SimError};
use crate::types::{BodyId, BodyRole, CompositeId, ConstraintId};
use crate::world::World;

#[derive(Clone, Debug)]
pub struct Composite {
    pub(crate) id: CompositeId,
    pub label: Option<String>,
    pub(crate) parent: Option<CompositeId>,
    pub(crate) children: Vec<CompositeId>,
    pub(crate) bodies: Vec<BodyId>,
    pub(crate) constraints: Vec<ConstraintId>,
}

impl Composite {
    pub(crate) fn new(id: CompositeId, parent: Option<CompositeId>, label: Option<String>) -> Self {
        Self { id, label, parent, children: Vec::new(), bodies: Vec::new(), constraints: Vec::new() }
    }

    pub fn id(&self) -> CompositeId {
        self.id
    }

    pub fn parent(&self) -> Option<CompositeId> {
        self.parent
    }

    pub fn children(&self) -> &[CompositeId] {
        &self.children
    }

    /// Direct member bodies, in insertion order.
    pub fn bodies(&self) -> &[BodyId] {
        &self.bodies
    }

    /// Direct member constraints, in insertion order.
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.children.is_empty()
    }
}

/// Upper bound on bodies in one blob. The complete spring graph grows as n^2,
/// so 512 bodies already means 130 816 springs.
pub const MAX_BLOB_BODIES: usize = 512;

/// Number of bodies that fit on a ring: `floor(radius / (2 * body_radius))`.
pub fn bodies_in_radius(radius: f32, body_radius: f32) -> Result<usize, ConfigError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ConfigError::InvalidRadius { name: "radius", value: radius });
    }
    if !(body_radius.is_finite() && body_radius > 0.0) {
        return Err(ConfigError::InvalidRadius { name: "body_radius", value: body_radius });
    }
    let n = (radius / (2.0 * body_radius)).floor();
    if n < 1.0 {
        return Err(ConfigError::NoBodies { radius, body_radius });
    }
    if n > MAX_BLOB_BODIES as f32 {
        return Err(ConfigError::TooManyBodies { count: n, max: MAX_BLOB_BODIES });
    }
    Ok(n as usize)
}

/// Evenly spaced points on a circle, computed per index (exactly `n` points).
pub fn ring_positions(center: Vec2, radius: f32, n: usize) -> Vec<Vec2> {
    let step = core::f32::consts::TAU / n as f32;
    (0..n)
        .map(|i| {
            let theta = i as f32 * step;
            center + Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Build a ring blob under `parent`: `n` circles on the ring, springs over every pair.
///
/// Everything is validated before the world is touched, so a failed call leaves
/// no partial composite behind. The complete graph costs O(n^2) springs.
pub fn build_blob(world: &mut World, parent: CompositeId, cfg: &BlobConfig) -> Result<CompositeId, SimError> {
    if world.composite(parent).is_none() {
        return Err(SimError::UnknownComposite(parent));
    }
    if !cfg.center.is_finite() {
        return Err(ConfigError::InvalidPose.into());
    }
    let n = bodies_in_radius(cfg.radius, cfg.body_radius)?;
    check_stiffness(cfg.stiffness)?;
    check_damping(cfg.damping)?;

    let positions = ring_positions(cfg.center, cfg.radius, n);
    let mut bodies = Vec::with_capacity(n);
    for (i, &p) in positions.iter().enumerate() {
        let mut body = Body::circle(p, cfg.body_radius, &cfg.body)?;
        body.role = Some(BodyRole::from_index(i));
        bodies.push(body);
    }

    let spring_count = n
        .checked_mul(n - 1)
        .map(|pairs| pairs / 2)
        .ok_or(ConfigError::TooManyBodies { count: n as f32, max: MAX_BLOB_BODIES })?;
    let mut springs = Vec::with_capacity(spring_count);
    for i in 0..n {
        for j in (i + 1)..n {
            let rest = positions[i].distance(positions[j]);
            springs.push((i, j, rest));
        }
    }

    let blob = world.create_composite(parent, cfg.label.clone())?;
    let ids: Vec<BodyId> = bodies
        .into_iter()
        .map(|b| world.add_body(blob, b))
        .collect::<Result<_, _>>()?;
    for (i, j, rest) in springs {
        let c = Constraint::between(ids[i], ids[j], rest, cfg.stiffness, cfg.damping)?;
        world.add_constraint(blob, c)?;
    }
    Ok(blob)
}

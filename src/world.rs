use glam::Vec2;

use crate::body::Body;
use crate::composite::Composite;
use crate::constraint::{Constraint, Endpoint};
use crate::error::SimError;
use crate::math::Aabb;
use crate::types::*;

/// Arena owning every body, constraint and composite of a simulation.
///
/// Composite 0 is the root. Bodies and constraints are never removed, so their
/// ids are stable indices and insertion order is the solve order.
pub struct World {
    bodies: Vec<Body>,
    constraints: Vec<Constraint>,
    composites: Vec<Composite>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            constraints: Vec::new(),
            composites: vec![Composite::new(CompositeId::ROOT, None, Some("world".to_string()))],
        }
    }

    // --- Insertion ---------------------------------------------------------

    pub fn create_composite(&mut self, parent: CompositeId, label: Option<String>) -> Result<CompositeId, SimError> {
        if self.composite(parent).is_none() {
            return Err(SimError::UnknownComposite(parent));
        }
        let id = CompositeId(self.composites.len() as u32);
        self.composites.push(Composite::new(id, Some(parent), label));
        self.composites[parent.0 as usize].children.push(id);
        Ok(id)
    }

    pub fn add_body(&mut self, composite: CompositeId, mut body: Body) -> Result<BodyId, SimError> {
        if self.composite(composite).is_none() {
            return Err(SimError::UnknownComposite(composite));
        }
        let id = BodyId(self.bodies.len() as u32);
        body.id = id;
        body.composite = composite;
        self.bodies.push(body);
        self.composites[composite.0 as usize].bodies.push(id);
        Ok(id)
    }

    /// Add a constraint; every body it references must already be in the world.
    pub fn add_constraint(&mut self, composite: CompositeId, mut constraint: Constraint) -> Result<ConstraintId, SimError> {
        if self.composite(composite).is_none() {
            return Err(SimError::UnknownComposite(composite));
        }
        self.check_references(&constraint)?;
        let id = ConstraintId(self.constraints.len() as u32);
        constraint.id = id;
        self.constraints.push(constraint);
        self.composites[composite.0 as usize].constraints.push(id);
        Ok(id)
    }

    pub(crate) fn check_references(&self, constraint: &Constraint) -> Result<(), SimError> {
        if self.body(constraint.body_a).is_none() {
            return Err(SimError::InvalidReference { body: constraint.body_a });
        }
        if let Endpoint::Body { body, .. } = constraint.end_b {
            if self.body(body).is_none() {
                return Err(SimError::InvalidReference { body });
            }
        }
        Ok(())
    }

    /// Transfer a body to another composite; it stays a member of exactly one.
    pub fn move_body(&mut self, body: BodyId, to: CompositeId) -> Result<(), SimError> {
        if self.composite(to).is_none() {
            return Err(SimError::UnknownComposite(to));
        }
        let from = self.body(body).ok_or(SimError::InvalidReference { body })?.composite;
        if from == to {
            return Ok(());
        }
        self.composites[from.0 as usize].bodies.retain(|b| *b != body);
        self.composites[to.0 as usize].bodies.push(body);
        self.bodies[body.0 as usize].composite = to;
        Ok(())
    }

    // --- Access ------------------------------------------------------------

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.0 as usize)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn composite(&self, id: CompositeId) -> Option<&Composite> {
        self.composites.get(id.0 as usize)
    }

    pub fn composites(&self) -> &[Composite] {
        &self.composites
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn composite_count(&self) -> usize {
        self.composites.len()
    }

    /// Explicit repositioning; the only way a static body moves.
    pub fn set_position(&mut self, id: BodyId, position: Vec2) -> Result<(), SimError> {
        let body = self.body_mut(id).ok_or(SimError::InvalidReference { body: id })?;
        body.position = position;
        Ok(())
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> Result<(), SimError> {
        let body = self.body_mut(id).ok_or(SimError::InvalidReference { body: id })?;
        if !body.is_static {
            body.velocity = velocity;
        }
        Ok(())
    }

    // --- Queries -----------------------------------------------------------

    /// Every body in the composite and its descendants, in composite order.
    pub fn all_bodies(&self, id: CompositeId) -> Vec<BodyId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cid) = stack.pop() {
            if let Some(c) = self.composite(cid) {
                out.extend_from_slice(&c.bodies);
                stack.extend(c.children.iter().rev());
            }
        }
        out
    }

    /// Union of member body AABBs; `None` for unknown or empty composites.
    pub fn bounds(&self, id: CompositeId) -> Option<Aabb> {
        self.all_bodies(id)
            .into_iter()
            .filter_map(|b| self.body(b))
            .map(|b| b.aabb())
            .reduce(Aabb::union)
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(Body::snapshot).collect()
    }

    /// Bodies whose shape contains `p`, in id order.
    pub fn query_point(&self, p: Vec2) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.aabb().contains(p) && b.contains_point(p))
            .map(|b| b.id)
            .collect()
    }

    /// Bodies whose bounds overlap the region, in id order.
    pub fn query_aabb(&self, region: &Aabb) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.aabb().overlaps(region))
            .map(|b| b.id)
            .collect()
    }
}

//! Grab-and-drag: a transient spring from the grabbed body to the pointer.

use glam::Vec2;

use crate::config::{check_damping, check_stiffness, PointerConfig};
use crate::constraint::Constraint;
use crate::error::ConfigError;
use crate::types::BodyId;
use crate::world::World;

/// What a pointer update did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Grabbed(BodyId),
    Released(BodyId),
}

/// Pointer state plus the at-most-one active pointer constraint.
///
/// The constraint lives here, not in the [`World`]; the world never holds a
/// reference to it, so releasing drops it completely.
pub struct Pointer {
    cfg: PointerConfig,
    position: Vec2,
    pressed: bool,
    grab: Option<Constraint>,
}

impl Default for Pointer {
    fn default() -> Self {
        Self { cfg: PointerConfig::default(), position: Vec2::ZERO, pressed: false, grab: None }
    }
}

impl Pointer {
    pub fn new(cfg: PointerConfig) -> Result<Self, ConfigError> {
        check_stiffness(cfg.stiffness)?;
        check_damping(cfg.damping)?;
        Ok(Self { cfg, ..Self::default() })
    }

    pub fn config(&self) -> PointerConfig {
        self.cfg
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn grabbed(&self) -> Option<BodyId> {
        self.grab.as_ref().map(|c| c.body_a)
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.grab.as_ref()
    }

    /// Record the latest pointer sample. A press edge over a dynamic body grabs it;
    /// releasing drops the constraint.
    pub fn update(&mut self, world: &World, position: Vec2, pressed: bool) -> Option<PointerEvent> {
        let was_pressed = self.pressed;
        self.position = position;
        self.pressed = pressed;

        if !pressed {
            return self.release();
        }
        if was_pressed || self.grab.is_some() {
            return None;
        }

        let body = world
            .bodies()
            .iter()
            .find(|b| !b.is_static() && b.aabb().contains(position) && b.contains_point(position))?;
        let offset = body.world_to_local(position);
        let constraint = Constraint::pin(body.id(), offset, position, 0.0, self.cfg.stiffness, self.cfg.damping)
            .ok()?
            .into_pointer();
        self.grab = Some(constraint);
        Some(PointerEvent::Grabbed(body.id()))
    }

    /// Move the fixed end to the latest pointer position; run once per tick before solving.
    pub fn refresh_anchor(&mut self) {
        let position = self.position;
        if let Some(c) = self.grab.as_mut() {
            c.set_fixed_point(position);
        }
    }

    pub fn release(&mut self) -> Option<PointerEvent> {
        self.grab.take().map(|c| PointerEvent::Released(c.body_a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::config::BodyOptions;
    use crate::constraint::{ConstraintKind, Endpoint};
    use crate::types::CompositeId;

    fn world() -> World {
        let mut w = World::new();
        let ground = Body::rectangle(Vec2::new(0.0, 50.0), 200.0, 20.0, &BodyOptions::fixed()).unwrap();
        w.add_body(CompositeId::ROOT, ground).unwrap();
        w.add_body(CompositeId::ROOT, Body::circle(Vec2::ZERO, 5.0, &BodyOptions::default()).unwrap())
            .unwrap();
        w
    }

    #[test]
    fn grab_drag_release() {
        let w = world();
        let mut p = Pointer::default();
        assert_eq!(p.update(&w, Vec2::new(2.0, 1.0), true), Some(PointerEvent::Grabbed(BodyId(1))));
        let c = p.constraint().unwrap();
        assert_eq!(c.kind(), ConstraintKind::Pointer);
        assert_eq!(c.rest_length(), 0.0);
        assert_eq!(c.stiffness(), 0.2);
        assert_eq!(c.offset_a, Vec2::new(2.0, 1.0));

        assert_eq!(p.update(&w, Vec2::new(30.0, -10.0), true), None);
        p.refresh_anchor();
        assert_eq!(p.constraint().unwrap().end_b, Endpoint::Fixed(Vec2::new(30.0, -10.0)));

        assert_eq!(p.update(&w, Vec2::new(30.0, -10.0), false), Some(PointerEvent::Released(BodyId(1))));
        assert!(p.constraint().is_none());
    }

    #[test]
    fn static_bodies_and_empty_space_are_not_grabbed() {
        let w = world();
        let mut p = Pointer::default();
        assert_eq!(p.update(&w, Vec2::new(0.0, 50.0), true), None);
        assert_eq!(p.grabbed(), None);
        // Sliding onto a body while held does not grab it
        assert_eq!(p.update(&w, Vec2::ZERO, true), None);
        assert_eq!(p.grabbed(), None);
    }

    #[test]
    fn rejects_bad_config() {
        assert!(Pointer::new(PointerConfig { stiffness: 0.0, damping: 0.0 }).is_err());
        assert!(Pointer::new(PointerConfig::default()).is_ok());
    }
}

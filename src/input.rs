//! Held-direction input and its mapping to per-body forces.

use crate::body::Body;
use crate::config::InputForceConfig;
use crate::types::{BodyRole, Direction};

/// Level-triggered direction flags; last write wins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
            Direction::Up => self.up = active,
            Direction::Down => self.down = active,
        }
    }

    pub fn is_active(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputForceConfig {
    /// Multiplier for a role on the axis of `direction`.
    pub fn multiplier(&self, role: BodyRole, direction: Direction) -> f32 {
        match role {
            BodyRole::Primary => self.primary,
            BodyRole::Secondary if direction.is_horizontal() => self.secondary_horizontal,
            BodyRole::Secondary => self.secondary_vertical,
        }
    }

    pub fn magnitude(&self, direction: Direction) -> f32 {
        if direction.is_horizontal() { self.horizontal } else { self.vertical }
    }
}

/// Add one step's worth of directional forces to every body that has a role.
///
/// Each held flag contributes once; flags add up. Returns the number of force
/// applications made.
pub fn apply_directional_forces(bodies: &mut [Body], input: &InputState, cfg: &InputForceConfig) -> usize {
    let mut applied = 0;
    for direction in Direction::ALL {
        if !input.is_active(direction) {
            continue;
        }
        let base = direction.unit() * cfg.magnitude(direction);
        for body in bodies.iter_mut().filter(|b| !b.is_static) {
            let Some(role) = body.role else { continue };
            body.apply_central_force(base * cfg.multiplier(role, direction));
            applied += 1;
        }
    }
    applied
}

//! Integration halves for a position-based step.
//!
//! The engine integrates velocities from forces and gravity, predicts positions
//! with those velocities, lets the solver project the predicted positions, and
//! finally recovers velocities from the net displacement over the step.

use glam::Vec2;

use crate::body::Body;

/// Air friction coefficients are expressed per 1/60 s.
const AIR_FRICTION_RATE: f32 = 60.0;

/// Integrates velocities (applies forces and gravity) and clears the accumulators.
pub fn integrate_velocity(body: &mut Body, gravity: Vec2, dt: f32) {
    if body.is_static {
        body.force = Vec2::ZERO;
        body.torque = 0.0;
        return;
    }

    body.velocity += (body.force * body.inv_mass + gravity) * dt;
    body.angular_velocity += body.torque * body.inv_inertia * dt;

    if body.air_friction > 0.0 {
        let keep = (1.0 - body.air_friction.min(1.0)).powf(dt * AIR_FRICTION_RATE);
        body.velocity *= keep;
        body.angular_velocity *= keep;
    }

    body.force = Vec2::ZERO;
    body.torque = 0.0;
}

/// Integrates positions (applies velocities to position and angle).
pub fn integrate_position(body: &mut Body, dt: f32) {
    if body.is_static {
        return;
    }
    body.position += body.velocity * dt;
    body.angle += body.angular_velocity * dt;
}

/// Velocity is the displacement since `prev` over `dt`, so positional
/// corrections made by the solver carry into the next step.
pub fn update_velocity(body: &mut Body, prev: (Vec2, f32), dt: f32) {
    if body.is_static {
        return;
    }
    body.velocity = (body.position - prev.0) / dt;
    body.angular_velocity = (body.angle - prev.1) / dt;
}

/// Full step for a lone body: velocity half then position half.
pub fn integrate_semi_implicit_euler(body: &mut Body, gravity: Vec2, dt: f32) {
    integrate_velocity(body, gravity, dt);
    integrate_position(body, dt);
}

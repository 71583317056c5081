//! Position-based solver for springs and contacts.
//!
//! The engine predicts positions from the integrated velocities, then this solver
//! projects every spring and contact back toward its rest state for
//! `params.iterations` passes. Each pass moves a spring's anchors by `stiffness`
//! times the remaining length error, split by generalized inverse mass, and pushes
//! overlapping pairs apart by `position_correction` times the depth beyond `slop`.
//! Contacts are re-tested against current positions on every pass.
//!
//! After the engine recovers velocities from the displacement, [`Solver::solve_velocities`]
//! applies spring damping, restitution and Coulomb friction. Friction is bounded by
//! the normal push the contact received, so it can only slow relative sliding.
//!
//! All corrections are clamped and non-finite results are dropped and reported.

use glam::Vec2;

use crate::body::Body;
use crate::config::EngineConfig;
use crate::constraint::{Constraint, Endpoint};
use crate::error::{InstabilityStage, StepWarning};
use crate::math::{clamp_abs, cross, rotate};
use crate::narrowphase::Narrowphase;
use crate::types::{BodyId, Contact};

#[derive(Copy, Clone, Debug)]
pub struct SolverParams {
    pub iterations: usize,
    pub position_correction: f32,
    pub slop: f32,
    pub restitution_threshold: f32,
    pub max_velocity_correction: f32,
    pub max_position_correction: f32,
}

impl From<&EngineConfig> for SolverParams {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            iterations: cfg.iterations.max(1),
            position_correction: cfg.position_correction,
            slop: cfg.slop,
            restitution_threshold: cfg.restitution_threshold,
            max_velocity_correction: cfg.max_velocity_correction,
            max_position_correction: cfg.max_position_correction,
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

#[derive(Copy, Clone)]
enum SpringEnd {
    Fixed(Vec2),
    Body { index: usize, offset: Vec2 },
}

struct SpringRow {
    a: usize,
    offset_a: Vec2,
    end: SpringEnd,
    rest: f32,
    stiffness: f32,
    damping: f32,
}

struct ContactRow {
    a: usize,
    b: usize,
    /// Latest normal (from `b` into `a`) and contact point seen during projection.
    normal: Vec2,
    contact: Vec2,
    /// Normal velocity before this step's corrections; negative when approaching.
    approach: f32,
    restitution: f32,
    friction: f32,
    /// Total positional push along the normal, in mass-weighted px.
    pushed: f32,
}

/// Reusable solver state; buffers are kept between steps.
#[derive(Default)]
pub struct Solver {
    springs: Vec<SpringRow>,
    contacts: Vec<ContactRow>,
    unstable: Vec<(BodyId, InstabilityStage)>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Snapshot springs and contacts for this step. Velocities must already
    /// include this step's forces; they set each contact's approach speed.
    pub fn prepare<'a>(
        &mut self,
        bodies: &[Body],
        constraints: impl IntoIterator<Item = &'a Constraint>,
        contacts: &[Contact],
    ) {
        self.springs.clear();
        self.contacts.clear();
        self.unstable.clear();

        for c in constraints {
            if let Some(row) = spring_row(bodies, c) {
                self.springs.push(row);
            }
        }
        for c in contacts {
            if let Some(row) = contact_row(bodies, c) {
                self.contacts.push(row);
            }
        }
    }

    /// Run `params.iterations` projection passes over springs then contacts.
    pub fn solve_positions(&mut self, bodies: &mut [Body], params: &SolverParams) {
        for _ in 0..params.iterations.max(1) {
            for s in &self.springs {
                if !project_spring(bodies, s, params) {
                    note(&mut self.unstable, bodies[s.a].id, InstabilityStage::Constraint);
                }
            }
            for c in self.contacts.iter_mut() {
                if !project_contact(bodies, c, params) {
                    note(&mut self.unstable, bodies[c.a].id, InstabilityStage::Contact);
                }
            }
        }
    }

    /// Spring damping, then restitution and friction, on velocities recovered
    /// from the projected positions.
    pub fn solve_velocities(&mut self, bodies: &mut [Body], params: &SolverParams, dt: f32) {
        for s in &self.springs {
            if s.damping > 0.0 && !damp_spring(bodies, s, params) {
                note(&mut self.unstable, bodies[s.a].id, InstabilityStage::Constraint);
            }
        }
        for c in &self.contacts {
            if !resolve_contact_velocity(bodies, c, params, dt) {
                note(&mut self.unstable, bodies[c.a].id, InstabilityStage::Contact);
            }
        }
    }

    /// Move the non-finite results seen since `prepare` into `warnings`.
    pub fn drain_warnings(&mut self, warnings: &mut Vec<StepWarning>) {
        warnings.extend(
            self.unstable
                .drain(..)
                .map(|(body, stage)| StepWarning::NumericInstability { body, stage }),
        );
    }
}

fn note(list: &mut Vec<(BodyId, InstabilityStage)>, body: BodyId, stage: InstabilityStage) {
    if !list.contains(&(body, stage)) {
        list.push((body, stage));
    }
}

/// Two distinct mutable bodies.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i != j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Inverse mass felt at lever arm `r` along direction `n`.
fn inv_mass_along(body: &Body, r: Vec2, n: Vec2) -> f32 {
    if body.is_static {
        return 0.0;
    }
    let rn = cross(r, n);
    body.inv_mass + body.inv_inertia * rn * rn
}

/// Positional counterpart of an impulse: move and turn by `p` applied at `r`.
fn shift(body: &mut Body, p: Vec2, r: Vec2) {
    if body.is_static {
        return;
    }
    body.position += p * body.inv_mass;
    body.angle += body.inv_inertia * cross(r, p);
}

fn apply_impulse(body: &mut Body, impulse: Vec2, r: Vec2) {
    if body.is_static {
        return;
    }
    body.velocity += impulse * body.inv_mass;
    body.angular_velocity += body.inv_inertia * cross(r, impulse);
}

fn spring_row(bodies: &[Body], c: &Constraint) -> Option<SpringRow> {
    let a = c.body_a.0 as usize;
    bodies.get(a)?;
    let end = match c.end_b {
        Endpoint::Fixed(p) => SpringEnd::Fixed(p),
        Endpoint::Body { body, offset } => {
            let index = body.0 as usize;
            if index == a {
                return None;
            }
            bodies.get(index)?;
            SpringEnd::Body { index, offset }
        }
    };
    Some(SpringRow {
        a,
        offset_a: c.offset_a,
        end,
        rest: c.rest_length,
        stiffness: c.stiffness,
        damping: c.damping,
    })
}

/// Unit axis and length error (`> 0` when stretched) for an anchor gap.
/// `None` for a zero-length gap; `Err` for a non-finite one.
fn spring_axis(delta: Vec2, rest: f32) -> Result<Option<(Vec2, f32)>, ()> {
    if !delta.is_finite() {
        return Err(());
    }
    let len = delta.length();
    if len <= 1e-6 {
        // Direction undefined; nothing sensible to push along
        return Ok(None);
    }
    Ok(Some((delta / len, len - rest)))
}

fn project_spring(bodies: &mut [Body], s: &SpringRow, params: &SolverParams) -> bool {
    match s.end {
        SpringEnd::Fixed(point) => {
            let a = &mut bodies[s.a];
            let ra = rotate(s.offset_a, a.angle);
            let (normal, error) = match spring_axis(point - (a.position + ra), s.rest) {
                Ok(Some(axis)) => axis,
                Ok(None) => return true,
                Err(()) => return false,
            };
            let w = inv_mass_along(a, ra, normal);
            if w <= 0.0 {
                return true;
            }
            let lambda = clamp_abs(s.stiffness * error, params.max_position_correction) / w;
            if !lambda.is_finite() {
                return false;
            }
            shift(a, normal * lambda, ra);
        }
        SpringEnd::Body { index, offset } => {
            let (a, b) = pair_mut(bodies, s.a, index);
            let ra = rotate(s.offset_a, a.angle);
            let rb = rotate(offset, b.angle);
            let (normal, error) = match spring_axis((b.position + rb) - (a.position + ra), s.rest) {
                Ok(Some(axis)) => axis,
                Ok(None) => return true,
                Err(()) => return false,
            };
            let w = inv_mass_along(a, ra, normal) + inv_mass_along(b, rb, normal);
            if w <= 0.0 {
                return true;
            }
            let lambda = clamp_abs(s.stiffness * error, params.max_position_correction) / w;
            if !lambda.is_finite() {
                return false;
            }
            shift(a, normal * lambda, ra);
            shift(b, -normal * lambda, rb);
        }
    }
    true
}

/// Remove `damping` of the relative anchor velocity along the spring axis.
fn damp_spring(bodies: &mut [Body], s: &SpringRow, params: &SolverParams) -> bool {
    match s.end {
        SpringEnd::Fixed(point) => {
            let a = &mut bodies[s.a];
            let ra = rotate(s.offset_a, a.angle);
            let pa = a.position + ra;
            let normal = match spring_axis(point - pa, s.rest) {
                Ok(Some((normal, _))) => normal,
                Ok(None) => return true,
                Err(()) => return false,
            };
            let w = inv_mass_along(a, ra, normal);
            if w <= 0.0 {
                return true;
            }
            let vrel = -a.velocity_at(pa).dot(normal);
            let j = clamp_abs(s.damping * vrel, params.max_velocity_correction) / w;
            if !j.is_finite() {
                return false;
            }
            apply_impulse(a, normal * j, ra);
        }
        SpringEnd::Body { index, offset } => {
            let (a, b) = pair_mut(bodies, s.a, index);
            let ra = rotate(s.offset_a, a.angle);
            let rb = rotate(offset, b.angle);
            let (pa, pb) = (a.position + ra, b.position + rb);
            let normal = match spring_axis(pb - pa, s.rest) {
                Ok(Some((normal, _))) => normal,
                Ok(None) => return true,
                Err(()) => return false,
            };
            let w = inv_mass_along(a, ra, normal) + inv_mass_along(b, rb, normal);
            if w <= 0.0 {
                return true;
            }
            let vrel = (b.velocity_at(pb) - a.velocity_at(pa)).dot(normal);
            let j = clamp_abs(s.damping * vrel, params.max_velocity_correction) / w;
            if !j.is_finite() {
                return false;
            }
            apply_impulse(a, normal * j, ra);
            apply_impulse(b, -normal * j, rb);
        }
    }
    true
}

fn contact_row(bodies: &[Body], c: &Contact) -> Option<ContactRow> {
    let ai = c.a.0 as usize;
    let bi = c.b.0 as usize;
    if ai == bi {
        return None;
    }
    let a = bodies.get(ai)?;
    let b = bodies.get(bi)?;
    if a.is_static && b.is_static {
        return None;
    }
    let normal = c.overlap.normal;
    if !normal.is_finite() || normal.length_squared() < 1e-12 {
        return None;
    }
    let point = c.overlap.contact;
    Some(ContactRow {
        a: ai,
        b: bi,
        normal,
        contact: point,
        approach: (a.velocity_at(point) - b.velocity_at(point)).dot(normal),
        restitution: a.restitution.max(b.restitution).clamp(0.0, 1.0),
        friction: a.friction.min(b.friction).max(0.0),
        pushed: 0.0,
    })
}

fn project_contact(bodies: &mut [Body], c: &mut ContactRow, params: &SolverParams) -> bool {
    let (a, b) = pair_mut(bodies, c.a, c.b);
    let Some(overlap) = Narrowphase::overlap_bodies(a, b) else {
        return true;
    };
    if !(overlap.normal.is_finite() && overlap.depth.is_finite() && overlap.contact.is_finite()) {
        return false;
    }
    c.normal = overlap.normal;
    c.contact = overlap.contact;

    let depth = overlap.depth - params.slop;
    if depth <= 0.0 {
        return true;
    }
    let ra = overlap.contact - a.position;
    let rb = overlap.contact - b.position;
    let w = inv_mass_along(a, ra, c.normal) + inv_mass_along(b, rb, c.normal);
    if w <= 0.0 {
        return true;
    }
    let push = (params.position_correction * depth).min(params.max_position_correction.max(0.0));
    let lambda = push / w;
    if !lambda.is_finite() {
        return false;
    }
    shift(a, c.normal * lambda, ra);
    shift(b, -c.normal * lambda, rb);
    c.pushed += lambda;
    true
}

fn resolve_contact_velocity(bodies: &mut [Body], c: &ContactRow, params: &SolverParams, dt: f32) -> bool {
    let (a, b) = pair_mut(bodies, c.a, c.b);
    let n = c.normal;
    let ra = c.contact - a.position;
    let rb = c.contact - b.position;
    let max_dv = params.max_velocity_correction;

    // Normal: stop the approach, or bounce when it was fast enough
    let vn = (a.velocity_at(c.contact) - b.velocity_at(c.contact)).dot(n);
    let target = if c.approach < -params.restitution_threshold { -c.restitution * c.approach } else { 0.0 };
    let mut jn = 0.0;
    if vn < target {
        let kn = inv_mass_along(a, ra, n) + inv_mass_along(b, rb, n);
        if kn > 0.0 {
            jn = clamp_abs(target - vn, max_dv) / kn;
            if !jn.is_finite() {
                return false;
            }
            apply_impulse(a, n * jn, ra);
            apply_impulse(b, -n * jn, rb);
        }
    }

    // Friction: cancel sliding up to the Coulomb bound of this step's normal response
    let t = n.perp();
    let vt = (a.velocity_at(c.contact) - b.velocity_at(c.contact)).dot(t);
    let kt = inv_mass_along(a, ra, t) + inv_mass_along(b, rb, t);
    if kt > 0.0 && vt != 0.0 {
        if !vt.is_finite() {
            return false;
        }
        let limit = c.friction * (c.pushed / dt + jn);
        let jt = clamp_abs(-clamp_abs(vt, max_dv) / kt, limit);
        if !jt.is_finite() {
            return false;
        }
        apply_impulse(a, t * jt, ra);
        apply_impulse(b, -t * jt, rb);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyOptions;
    use crate::types::Overlap;

    fn ball(p: Vec2) -> Body {
        Body::circle(p, 1.0, &BodyOptions::default().with_density(1.0)).unwrap()
    }

    fn with_ids(mut bodies: Vec<Body>) -> Vec<Body> {
        for (i, b) in bodies.iter_mut().enumerate() {
            b.id = BodyId(i as u32);
        }
        bodies
    }

    fn one_pass() -> SolverParams {
        SolverParams { iterations: 1, ..SolverParams::default() }
    }

    /// Ball resting 0.5 px into a static slab whose top face is y = 1.
    fn ball_on_slab(ball_opts: BodyOptions, slab_opts: BodyOptions) -> (Vec<Body>, Contact) {
        let slab = Body::rectangle(Vec2::new(0.0, 11.0), 40.0, 20.0, &slab_opts).unwrap();
        let resting = Body::circle(Vec2::new(0.0, 0.5), 1.0, &ball_opts.with_density(1.0)).unwrap();
        let bodies = with_ids(vec![resting, slab]);
        let contact = Contact {
            a: BodyId(0),
            b: BodyId(1),
            overlap: Overlap { normal: Vec2::new(0.0, -1.0), depth: 0.5, contact: Vec2::new(0.0, 1.0) },
        };
        (bodies, contact)
    }

    #[test]
    fn rigid_spring_fixes_error_in_one_pass() {
        let mut bodies = with_ids(vec![ball(Vec2::ZERO), ball(Vec2::new(12.0, 0.0))]);
        let c = Constraint::between(BodyId(0), BodyId(1), 10.0, 1.0, 0.0).unwrap();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [&c], &[]);
        solver.solve_positions(&mut bodies, &one_pass());
        let mut warnings = Vec::new();
        solver.drain_warnings(&mut warnings);
        assert!(warnings.is_empty());

        assert!((bodies[0].position.distance(bodies[1].position) - 10.0).abs() < 1e-4);
        // Equal masses share the correction
        assert!((bodies[0].position.x - 1.0).abs() < 1e-4);
        assert!((bodies[1].position.x - 11.0).abs() < 1e-4);
    }

    #[test]
    fn soft_spring_is_proportional_to_stiffness() {
        let run = |stiffness: f32| {
            let mut bodies = with_ids(vec![ball(Vec2::ZERO), ball(Vec2::new(12.0, 0.0))]);
            let c = Constraint::between(BodyId(0), BodyId(1), 10.0, stiffness, 0.0).unwrap();
            let mut solver = Solver::new();
            solver.prepare(&bodies, [&c], &[]);
            solver.solve_positions(&mut bodies, &one_pass());
            12.0 - bodies[0].position.distance(bodies[1].position)
        };
        let closed_a = run(0.1);
        let closed_b = run(0.2);
        assert!((closed_a - 0.2).abs() < 1e-4);
        assert!((closed_b / closed_a - 2.0).abs() < 1e-3);
    }

    #[test]
    fn pin_pulls_body_toward_point() {
        let mut bodies = with_ids(vec![ball(Vec2::ZERO)]);
        let c = Constraint::pin(BodyId(0), Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0, 0.2, 0.0).unwrap();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [&c], &[]);
        solver.solve_positions(&mut bodies, &one_pass());
        // 20% of the 10 px gap per pass
        assert!((bodies[0].position.x - 2.0).abs() < 1e-4);
        assert!(bodies[0].position.y.abs() < 1e-6);

        // More passes close more of the gap, never past the point
        let mut bodies = with_ids(vec![ball(Vec2::ZERO)]);
        solver.prepare(&bodies, [&c], &[]);
        solver.solve_positions(&mut bodies, &SolverParams::default());
        let x = bodies[0].position.x;
        assert!(x > 7.0 && x < 10.0, "x = {}", x);
    }

    #[test]
    fn damping_removes_relative_speed_along_axis() {
        let mut bodies = with_ids(vec![ball(Vec2::ZERO), ball(Vec2::new(10.0, 0.0))]);
        bodies[1].velocity = Vec2::new(40.0, 5.0);
        let c = Constraint::between(BodyId(0), BodyId(1), 10.0, 0.5, 0.25).unwrap();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [&c], &[]);
        solver.solve_velocities(&mut bodies, &SolverParams::default(), 1.0 / 60.0);
        let vrel = bodies[1].velocity - bodies[0].velocity;
        assert!((vrel.x - 30.0).abs() < 1e-3, "vrel = {}", vrel);
        // Off-axis motion is untouched
        assert!((vrel.y - 5.0).abs() < 1e-5);
        // Momentum is conserved
        assert!((bodies[0].velocity.x + bodies[1].velocity.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn contact_pushes_out_and_never_moves_static() {
        let (mut bodies, contact) = ball_on_slab(BodyOptions::default(), BodyOptions::fixed());
        let params = SolverParams::default();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);

        // Remaining overlap is close to the slop after six passes
        let y = bodies[0].position.y;
        assert!(y < 0.5 && y > -params.slop, "y = {}", y);
        // Overlap depth equals y here
        assert!((y - params.slop).abs() < 0.01, "y = {}", y);
        assert_eq!(bodies[1].position, Vec2::new(0.0, 11.0));
        assert_eq!(bodies[1].angle, 0.0);
    }

    #[test]
    fn approaching_contact_stops_without_bounce() {
        let (mut bodies, contact) = ball_on_slab(BodyOptions::default(), BodyOptions::fixed());
        bodies[0].velocity = Vec2::new(0.0, 50.0);
        let params = SolverParams::default();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);
        solver.solve_velocities(&mut bodies, &params, 1.0 / 60.0);
        assert!(bodies[0].velocity.y.abs() < 1e-4, "vy = {}", bodies[0].velocity.y);
        assert_eq!(bodies[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn restitution_bounces() {
        let (mut bodies, contact) = ball_on_slab(BodyOptions::default(), BodyOptions::fixed().with_restitution(1.0));
        bodies[0].velocity = Vec2::new(0.0, 100.0);
        let params = SolverParams::default();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);
        solver.solve_velocities(&mut bodies, &params, 1.0 / 60.0);
        assert!((bodies[0].velocity.y + 100.0).abs() < 1e-2, "vy = {}", bodies[0].velocity.y);

        // Below the threshold nothing bounces
        let (mut bodies, contact) = ball_on_slab(BodyOptions::default(), BodyOptions::fixed().with_restitution(1.0));
        bodies[0].velocity = Vec2::new(0.0, 0.5 * params.restitution_threshold);
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);
        solver.solve_velocities(&mut bodies, &params, 1.0 / 60.0);
        assert!(bodies[0].velocity.y.abs() < 1e-4);
    }

    #[test]
    fn friction_slows_sliding_without_reversing_it() {
        let opts = BodyOptions::default().with_friction(0.5);
        let (mut bodies, contact) = ball_on_slab(opts, BodyOptions::fixed().with_friction(0.5));
        bodies[0].velocity = Vec2::new(50.0, 0.0);
        let params = SolverParams::default();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);
        let before = bodies[0].velocity.x + bodies[0].angular_velocity.abs();
        solver.solve_velocities(&mut bodies, &params, 1.0 / 60.0);

        // Contact point speed shrinks toward zero but keeps its sign
        let slip = bodies[0].velocity_at(Vec2::new(bodies[0].position.x, 1.0)).x;
        assert!(slip >= -1e-4 && slip < 50.0, "slip = {}", slip);
        assert!(bodies[0].velocity.x < before);

        // Without a normal push there is no friction at all
        let (mut bodies, mut contact) = ball_on_slab(opts, BodyOptions::fixed().with_friction(0.5));
        bodies[0].position.y = -0.5;
        contact.overlap.depth = 0.0;
        bodies[0].velocity = Vec2::new(50.0, 0.0);
        solver.prepare(&bodies, [], &[contact]);
        solver.solve_positions(&mut bodies, &params);
        solver.solve_velocities(&mut bodies, &params, 1.0 / 60.0);
        assert_eq!(bodies[0].velocity.x, 50.0);
    }

    #[test]
    fn resting_ball_stays_put_over_many_steps() {
        let dt = 1.0 / 60.0;
        let gravity = Vec2::new(0.0, 1000.0);
        let params = SolverParams::default();
        let (mut bodies, _) = ball_on_slab(BodyOptions::default(), BodyOptions::fixed());
        bodies[0].position.y = params.slop;
        bodies[0].velocity = Vec2::new(3.0, 0.0);
        // A puck: friction cannot turn sliding into rolling
        bodies[0].inv_inertia = 0.0;
        let mut solver = Solver::new();
        for _ in 0..600 {
            let prev = bodies[0].position;
            bodies[0].velocity += gravity * dt;
            let v = bodies[0].velocity;
            bodies[0].position += v * dt;
            let contacts: Vec<Contact> = Narrowphase::overlap_bodies(&bodies[0], &bodies[1])
                .map(|overlap| Contact { a: BodyId(0), b: BodyId(1), overlap })
                .into_iter()
                .collect();
            solver.prepare(&bodies, [], &contacts);
            solver.solve_positions(&mut bodies, &params);
            bodies[0].velocity = (bodies[0].position - prev) / dt;
            solver.solve_velocities(&mut bodies, &params, dt);
        }
        // Friction brought the slide to rest and nothing crept afterwards
        let b = &bodies[0];
        assert!(b.velocity.length() < 1.0, "v = {}", b.velocity);
        assert!(b.position.x > 0.0 && b.position.x < 0.5, "x = {}", b.position.x);
        assert!((b.position.y - params.slop).abs() < 0.3, "y = {}", b.position.y);
    }

    #[test]
    fn non_finite_state_is_reported_not_propagated() {
        let mut bodies = with_ids(vec![ball(Vec2::ZERO), ball(Vec2::new(12.0, 0.0))]);
        bodies[0].position.x = f32::NAN;
        let c = Constraint::between(BodyId(0), BodyId(1), 10.0, 1.0, 0.0).unwrap();
        let mut solver = Solver::new();
        solver.prepare(&bodies, [&c], &[]);
        solver.solve_positions(&mut bodies, &SolverParams::default());
        let mut warnings = Vec::new();
        solver.drain_warnings(&mut warnings);
        assert_eq!(bodies[1].position, Vec2::new(12.0, 0.0));
        assert_eq!(
            warnings,
            vec![StepWarning::NumericInstability { body: BodyId(0), stage: InstabilityStage::Constraint }]
        );
        // Drained
        solver.drain_warnings(&mut warnings);
        assert_eq!(warnings.len(), 1);
    }
}

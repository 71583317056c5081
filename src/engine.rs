use glam::Vec2;

use std::time::Instant;

use crate::api::SimulationApi;
use crate::body::Body;
use crate::broadphase::UniformGrid;
use crate::composite::build_blob;
use crate::config::{BlobConfig, BodyOptions, EngineConfig, InputForceConfig, PointerConfig};
use crate::constraint::Constraint;
use crate::error::{ConfigError, InstabilityStage, SimError, StepWarning};
use crate::input::{apply_directional_forces, InputState};
use crate::integrator::{integrate_position, integrate_velocity, update_velocity};
use crate::math::Aabb;
use crate::narrowphase::Narrowphase;
use crate::pointer::{Pointer, PointerEvent};
use crate::solver::{Solver, SolverParams};
use crate::types::*;
use crate::world::World;

/// Outcome of one tick.
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Number of completed ticks after this call.
    pub tick: u64,
    pub contacts: usize,
    pub warnings: Vec<StepWarning>,
    pub timing: Option<StepTiming>,
}

impl StepReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// The simulation: world, input state, pointer and the per-tick pipeline.
pub struct Engine {
    cfg: EngineConfig,
    world: World,
    pointer: Pointer,
    input: InputState,
    input_forces: InputForceConfig,

    // Per-step scratch, reused between ticks
    grid: UniformGrid,
    solver: Solver,
    aabbs: Vec<Aabb>,
    contacts: Vec<Contact>,
    poses: Vec<(Vec2, f32)>,

    tick: u64,
    last_timing: Option<StepTiming>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

impl Engine {
    /// Empty engine. Fails when a setting is out of range (see [`EngineConfig::validate`]).
    pub fn new(cfg: EngineConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::with_valid_config(cfg))
    }

    fn with_valid_config(cfg: EngineConfig) -> Self {
        Self {
            grid: UniformGrid::new(cfg.cell_size),
            cfg,
            world: World::new(),
            pointer: Pointer::default(),
            input: InputState::default(),
            input_forces: InputForceConfig::default(),
            solver: Solver::new(),
            aabbs: Vec::new(),
            contacts: Vec::new(),
            poses: Vec::new(),
            tick: 0,
            last_timing: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Swap settings between ticks. The world and any grab are kept.
    pub fn set_config(&mut self, cfg: EngineConfig) -> Result<(), ConfigError> {
        cfg.validate()?;
        if cfg.cell_size != self.cfg.cell_size {
            self.grid = UniformGrid::new(cfg.cell_size);
        }
        self.cfg = cfg;
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Replace the pointer settings; drops any active grab.
    pub fn set_pointer_config(&mut self, cfg: PointerConfig) -> Result<(), ConfigError> {
        self.pointer = Pointer::new(cfg)?;
        Ok(())
    }

    pub fn set_input_forces(&mut self, cfg: InputForceConfig) {
        self.input_forces = cfg;
    }

    pub fn input_forces(&self) -> &InputForceConfig {
        &self.input_forces
    }

    /// Pointer update that also reports grab/release.
    pub fn update_pointer(&mut self, position: Vec2, pressed: bool) -> Option<PointerEvent> {
        self.pointer.update(&self.world, position, pressed)
    }

    /// Static body with explicit material (friction, restitution, user key).
    pub fn create_static_boundary_with(&mut self, shape: Shape, pose: Pose, opts: BodyOptions) -> Result<BodyId, SimError> {
        let body = Body::new(shape, pose, &BodyOptions { is_static: true, ..opts })?;
        self.world.add_body(CompositeId::ROOT, body)
    }

    /// Dynamic body in the root composite.
    pub fn create_body(&mut self, shape: Shape, pose: Pose, opts: BodyOptions) -> Result<BodyId, SimError> {
        let body = Body::new(shape, pose, &opts)?;
        self.world.add_body(CompositeId::ROOT, body)
    }

    /// Structural constraint in the root composite.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, SimError> {
        self.world.add_constraint(CompositeId::ROOT, constraint)
    }

    /// World constraints in solve order, followed by the pointer constraint if active.
    pub fn active_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.world.constraints().iter().chain(self.pointer.constraint())
    }

    /// Contacts found during the last step.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn broadphase_stats(&self) -> BroadphaseStats {
        let bodies = self.world.bodies();
        self.grid.stats(|a, b| bodies[a].is_static() && bodies[b].is_static())
    }

    pub fn timing(&self) -> Option<StepTiming> {
        self.last_timing
    }

    fn advance(&mut self, dt: f32) -> StepReport {
        let mut warnings = Vec::new();
        if !(dt.is_finite() && dt > 0.0) {
            warnings.push(StepWarning::InvalidTimestep(dt));
            return StepReport { tick: self.tick, contacts: 0, warnings, timing: None };
        }

        let timed = self.cfg.enable_timing;
        let clock = || if timed { Some(Instant::now()) } else { None };
        let elapsed = |t: Option<Instant>| t.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);
        let mut timing = StepTiming::default();
        let t_all = clock();

        self.poses.clear();
        self.poses.extend(self.world.bodies().iter().map(|b| (b.position, b.angle)));

        // (1) directional forces, (2) pointer anchor
        let t0 = clock();
        apply_directional_forces(self.world.bodies_mut(), &self.input, &self.input_forces);
        self.pointer.refresh_anchor();
        timing.forces_ms = elapsed(t0);

        // (3) velocities from forces, then predicted positions
        let t0 = clock();
        let gravity = self.cfg.gravity;
        for body in self.world.bodies_mut() {
            integrate_velocity(body, gravity, dt);
            integrate_position(body, dt);
        }
        timing.integrate_ms = elapsed(t0);

        // (4) broadphase + narrowphase on the predicted positions
        let t0 = clock();
        let bodies = self.world.bodies();
        self.aabbs.clear();
        self.aabbs.extend(bodies.iter().map(Body::aabb));
        self.grid.rebuild(&self.aabbs);
        let pairs = self.grid.candidate_pairs(|a, b| bodies[a].is_static() && bodies[b].is_static());
        timing.broadphase_ms = elapsed(t0);

        let t0 = clock();
        self.contacts.clear();
        for (a, b) in pairs {
            if !self.aabbs[a].overlaps(&self.aabbs[b]) {
                continue;
            }
            if let Some(overlap) = Narrowphase::overlap_bodies(&bodies[a], &bodies[b]) {
                self.contacts.push(Contact { a: BodyId(a as u32), b: BodyId(b as u32), overlap });
            }
        }
        timing.narrowphase_ms = elapsed(t0);

        // (5) positional projection, velocity recovery, velocity pass
        let t0 = clock();
        let params = SolverParams::from(&self.cfg);
        self.solver.prepare(
            self.world.bodies(),
            self.world.constraints().iter().chain(self.pointer.constraint()),
            &self.contacts,
        );
        self.solver.solve_positions(self.world.bodies_mut(), &params);
        for (body, &prev) in self.world.bodies_mut().iter_mut().zip(self.poses.iter()) {
            update_velocity(body, prev, dt);
        }
        self.solver.solve_velocities(self.world.bodies_mut(), &params, dt);
        self.solver.drain_warnings(&mut warnings);
        timing.solve_ms = elapsed(t0);

        // (6) non-finite recovery
        let t0 = clock();
        for (body, &(position, angle)) in self.world.bodies_mut().iter_mut().zip(self.poses.iter()) {
            if !body.is_finite() {
                body.position = position;
                body.angle = angle;
                body.velocity = Vec2::ZERO;
                body.angular_velocity = 0.0;
                warnings.push(StepWarning::NumericInstability {
                    body: body.id(),
                    stage: InstabilityStage::Integration,
                });
            }
        }
        timing.integrate_ms += elapsed(t0);

        self.tick += 1;
        let timing = t_all.map(|t| StepTiming { step_ms: elapsed(Some(t)), ..timing });
        self.last_timing = timing;
        StepReport { tick: self.tick, contacts: self.contacts.len(), warnings, timing }
    }
}

impl SimulationApi for Engine {
    fn create_blob(
        &mut self,
        center: Vec2,
        radius: f32,
        body_radius: f32,
        density: f32,
        stiffness: f32,
    ) -> Result<CompositeId, SimError> {
        let cfg = BlobConfig::new(center, radius, body_radius)
            .with_density(density)
            .with_stiffness(stiffness);
        self.create_blob_with(cfg)
    }

    fn create_blob_with(&mut self, cfg: BlobConfig) -> Result<CompositeId, SimError> {
        build_blob(&mut self.world, CompositeId::ROOT, &cfg)
    }

    fn create_static_boundary(&mut self, shape: Shape, pose: Pose) -> Result<BodyId, SimError> {
        self.create_static_boundary_with(shape, pose, BodyOptions::fixed())
    }

    fn step(&mut self, dt: f32) -> StepReport {
        self.advance(dt)
    }

    fn set_pointer(&mut self, position: Vec2, pressed: bool) {
        self.update_pointer(position, pressed);
    }

    fn set_directional_input(&mut self, direction: Direction, active: bool) {
        self.input.set(direction, active);
    }

    fn bounds(&self, composite: CompositeId) -> Option<Aabb> {
        self.world.bounds(composite)
    }

    fn body_snapshot(&self) -> Vec<BodySnapshot> {
        self.world.snapshot()
    }
}

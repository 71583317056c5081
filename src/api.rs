use glam::Vec2;

use crate::config::BlobConfig;
use crate::error::SimError;
use crate::math::Aabb;
use crate::types::*;

/// Public contract between the simulation core and its renderer/input collaborator.
pub trait SimulationApi {
    // --- Construction ------------------------------------------------------

    /// Build a ring blob with default material and damping.
    fn create_blob(
        &mut self,
        center: Vec2,
        radius: f32,
        body_radius: f32,
        density: f32,
        stiffness: f32,
    ) -> Result<CompositeId, SimError>;

    /// Build a ring blob from a full configuration.
    fn create_blob_with(&mut self, cfg: BlobConfig) -> Result<CompositeId, SimError>;

    /// Add a static body to the root composite.
    fn create_static_boundary(&mut self, shape: Shape, pose: Pose) -> Result<BodyId, SimError>;

    // --- Stepping ----------------------------------------------------------

    /// Advance by one fixed tick.
    fn step(&mut self, dt: f32) -> crate::engine::StepReport;

    // --- Input -------------------------------------------------------------

    /// Update pointer position and button state (grab on press, release on up).
    fn set_pointer(&mut self, position: Vec2, pressed: bool);

    /// Set one held-direction flag (level-triggered).
    fn set_directional_input(&mut self, direction: Direction, active: bool);

    // --- Pull API ----------------------------------------------------------

    /// Bounding box of every body in the composite (and its children).
    fn bounds(&self, composite: CompositeId) -> Option<Aabb>;

    /// Read-only view of all bodies, in id order.
    fn body_snapshot(&self) -> Vec<BodySnapshot>;
}

/// Narrowphase primitive tests.
///
/// Every overlap reports a normal pointing from the second shape into the first.
pub trait NarrowphaseApi {
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap>;

    /// Circle against a (possibly rotated) rectangle given by center, half extents and angle.
    fn overlap_circle_rect(c: Vec2, r: f32, box_c: Vec2, box_h: Vec2, box_angle: f32) -> Option<Overlap>;

    fn overlap_rect_rect(
        c0: Vec2,
        h0: Vec2,
        angle0: f32,
        c1: Vec2,
        h1: Vec2,
        angle1: f32,
    ) -> Option<Overlap>;

    fn point_in_circle(p: Vec2, c: Vec2, r: f32) -> bool;
    fn point_in_rect(p: Vec2, c: Vec2, h: Vec2, angle: f32) -> bool;
}

//! The enclosed playground: a box of static walls, a floating platform and one blob.

use glam::Vec2;

use crate::api::SimulationApi;
use crate::config::{BlobConfig, EngineConfig};
use crate::engine::Engine;
use crate::error::{ConfigError, SimError};
use crate::types::{BodyId, CompositeId, Pose, Shape};

/// Static walls around a `width` x `height` screen, centered on its edges.
#[derive(Copy, Clone, Debug)]
pub struct BoundaryBox {
    pub width: f32,
    pub height: f32,
    /// Wall thickness. Default: 60.
    pub thickness: f32,
    /// Add a platform of width/3 across the middle of the screen.
    pub platform: bool,
}

/// Ids of the boundary bodies, in creation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boundaries {
    pub ground: BodyId,
    pub ceiling: BodyId,
    pub left: BodyId,
    pub right: BodyId,
    pub platform: Option<BodyId>,
}

impl BoundaryBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, thickness: 60.0, platform: true }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_platform(mut self, platform: bool) -> Self {
        self.platform = platform;
        self
    }

    /// `(shape, center)` for ground, ceiling, left, right and, if enabled, the platform.
    pub fn layout(&self) -> Vec<(Shape, Vec2)> {
        let (w, h, t) = (self.width, self.height, self.thickness);
        let mut parts = vec![
            (Shape::rectangle(w, t), Vec2::new(w / 2.0, h)),
            (Shape::rectangle(w, t), Vec2::new(w / 2.0, 0.0)),
            (Shape::rectangle(t, h), Vec2::new(0.0, h / 2.0)),
            (Shape::rectangle(t, h), Vec2::new(w, h / 2.0)),
        ];
        if self.platform {
            parts.push((Shape::rectangle(w / 3.0, t), Vec2::new(w / 2.0, h / 2.0)));
        }
        parts
    }

    pub fn build<S: SimulationApi>(&self, sim: &mut S) -> Result<Boundaries, SimError> {
        if !(self.width > 0.0 && self.height > 0.0 && self.thickness > 0.0) {
            return Err(ConfigError::InvalidShape.into());
        }
        let mut ids = Vec::with_capacity(5);
        for (shape, center) in self.layout() {
            ids.push(sim.create_static_boundary(shape, Pose::at(center))?);
        }
        Ok(Boundaries {
            ground: ids[0],
            ceiling: ids[1],
            left: ids[2],
            right: ids[3],
            platform: ids.get(4).copied(),
        })
    }
}

/// A ready-to-run playground.
pub struct Scene {
    pub engine: Engine,
    pub blob: CompositeId,
    pub boundaries: Boundaries,
}

/// Blob placement for a screen: centered at a quarter of each dimension, R 60, r 2.
pub fn classic_blob(width: f32, height: f32) -> BlobConfig {
    BlobConfig::new(Vec2::new(width / 4.0, height / 4.0), 60.0, 2.0)
}

/// Walls, platform and the classic blob on a `width` x `height` screen.
pub fn classic_scene(width: f32, height: f32, cfg: EngineConfig) -> Result<Scene, SimError> {
    let mut engine = Engine::new(cfg)?;
    let blob = engine.create_blob_with(classic_blob(width, height))?;
    let boundaries = BoundaryBox::new(width, height).build(&mut engine)?;
    Ok(Scene { engine, blob, boundaries })
}

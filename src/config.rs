//! Typed configuration for the engine and everything it builds.
//!
//! Units are pixels and seconds, +y pointing down (screen space).
//!
//! # Builder Pattern
//! ```
//! use wobble::config::EngineConfig;
//! use glam::Vec2;
//!
//! let config = EngineConfig::default()
//!     .with_gravity(Vec2::new(0.0, 2000.0))
//!     .with_iterations(8)
//!     .with_cell_size(32.0);
//! assert_eq!(config.iterations, 8);
//! ```

use glam::Vec2;

use crate::error::ConfigError;
use crate::types::UserKey;

/// Solver, integrator and broadphase settings.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Gravity acceleration in px/s². Default: (0, 1000).
    pub gravity: Vec2,
    /// Solver passes over constraints and contacts per step. Default: 6.
    pub iterations: usize,
    /// Fraction of penetration (beyond `slop`) removed per step. Default: 0.8.
    pub position_correction: f32,
    /// Penetration allowed without positional correction, in px. Default: 0.05.
    pub slop: f32,
    /// Approach speed (px/s) below which restitution is ignored. Default: 30.
    pub restitution_threshold: f32,
    /// Largest velocity change a single correction may apply, in px/s. Default: 10 000.
    pub max_velocity_correction: f32,
    /// Largest positional push a single contact iteration may apply, in px. Default: 20.
    pub max_position_correction: f32,
    /// Broadphase grid cell size in px. Default: 64.
    pub cell_size: f32,
    /// Enable per-stage timing in step reports (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 1000.0),
            iterations: 6,
            position_correction: 0.8,
            slop: 0.05,
            restitution_threshold: 30.0,
            max_velocity_correction: 10_000.0,
            max_position_correction: 20.0,
            cell_size: 64.0,
            enable_timing: false,
        }
    }
}

impl EngineConfig {
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_timing(mut self, enable: bool) -> Self {
        self.enable_timing = enable;
        self
    }

    pub fn with_max_corrections(mut self, velocity: f32, position: f32) -> Self {
        self.max_velocity_correction = velocity;
        self.max_position_correction = position;
        self
    }

    /// Check every numeric setting. `Engine::new` refuses configs that fail this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |name: &'static str, value: f32| Err(ConfigError::InvalidEngineSetting { name, value });
        if !self.gravity.is_finite() {
            let value = if self.gravity.x.is_finite() { self.gravity.y } else { self.gravity.x };
            return bad("gravity", value);
        }
        if self.iterations == 0 {
            return bad("iterations", 0.0);
        }
        if !(self.position_correction > 0.0 && self.position_correction <= 1.0) {
            return bad("position_correction", self.position_correction);
        }
        let non_negative = [("slop", self.slop), ("restitution_threshold", self.restitution_threshold)];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return bad(name, value);
            }
        }
        let positive = [
            ("max_velocity_correction", self.max_velocity_correction),
            ("max_position_correction", self.max_position_correction),
            ("cell_size", self.cell_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return bad(name, value);
            }
        }
        Ok(())
    }
}

/// Material and metadata for a single body.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyOptions {
    /// Mass per px². Default: 0.001.
    pub density: f32,
    /// Coulomb friction coefficient. Default: 0.1.
    pub friction: f32,
    /// Bounciness in [0, 1]. Default: 0.
    pub restitution: f32,
    /// Fraction of velocity lost per 1/60 s. Default: 0.01.
    pub air_friction: f32,
    pub is_static: bool,
    /// Opaque handle echoed in snapshots.
    pub user_key: Option<UserKey>,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            density: 0.001,
            friction: 0.1,
            restitution: 0.0,
            air_friction: 0.01,
            is_static: false,
            user_key: None,
        }
    }
}

impl BodyOptions {
    pub fn fixed() -> Self {
        Self { is_static: true, ..Self::default() }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_air_friction(mut self, air_friction: f32) -> Self {
        self.air_friction = air_friction;
        self
    }

    pub fn with_user_key(mut self, key: UserKey) -> Self {
        self.user_key = Some(key);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_static && !(self.density.is_finite() && self.density > 0.0) {
            return Err(ConfigError::InvalidDensity(self.density));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(ConfigError::InvalidFriction(self.friction));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::InvalidRestitution(self.restitution));
        }
        if !(0.0..=1.0).contains(&self.air_friction) {
            return Err(ConfigError::InvalidAirFriction(self.air_friction));
        }
        Ok(())
    }
}

/// Everything needed to build a ring blob.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobConfig {
    pub center: Vec2,
    /// Ring radius in px.
    pub radius: f32,
    /// Radius of each circular body in px.
    pub body_radius: f32,
    /// Spring stiffness in (0, 1]. Default: 0.005.
    pub stiffness: f32,
    /// Spring damping in [0, 1]. Default: 0.
    pub damping: f32,
    /// Material of every ring body. Default density: 2.
    pub body: BodyOptions,
    pub label: Option<String>,
}

impl BlobConfig {
    pub fn new(center: Vec2, radius: f32, body_radius: f32) -> Self {
        Self {
            center,
            radius,
            body_radius,
            stiffness: 0.005,
            damping: 0.0,
            body: BodyOptions::default().with_density(2.0),
            label: Some("blob".to_string()),
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.body.density = density;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_body(mut self, body: BodyOptions) -> Self {
        self.body = body;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Grab-and-drag spring settings.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerConfig {
    /// Default: 0.2, looser than structural springs.
    pub stiffness: f32,
    /// Default: 0.1.
    pub damping: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self { stiffness: 0.2, damping: 0.1 }
    }
}

/// Directional force magnitudes and role multipliers.
///
/// Defaults reproduce the classic blob controls: 0.05 / 0.1 force units per
/// millisecond² expressed in px·mass/s².
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputForceConfig {
    /// Force along x for left/right. Default: 50 000.
    pub horizontal: f32,
    /// Force along y for up/down. Default: 100 000.
    pub vertical: f32,
    /// Multiplier for primary bodies on either axis. Default: 1.
    pub primary: f32,
    /// Multiplier for secondary bodies on left/right. Default: 0.75.
    pub secondary_horizontal: f32,
    /// Multiplier for secondary bodies on up/down. Default: 1.5.
    pub secondary_vertical: f32,
}

impl Default for InputForceConfig {
    fn default() -> Self {
        Self {
            horizontal: 50_000.0,
            vertical: 100_000.0,
            primary: 1.0,
            secondary_horizontal: 0.75,
            secondary_vertical: 1.5,
        }
    }
}

/// Real-time pacing for [`Runner`](crate::Runner).
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerConfig {
    /// Fixed step in seconds. Default: 1/60.
    pub timestep: f32,
    /// Steps allowed per frame before the backlog is dropped. Default: 5.
    pub max_steps_per_frame: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { timestep: 1.0 / 60.0, max_steps_per_frame: 5 }
    }
}

pub(crate) fn check_stiffness(stiffness: f32) -> Result<(), ConfigError> {
    if stiffness.is_finite() && stiffness > 0.0 && stiffness <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStiffness(stiffness))
    }
}

pub(crate) fn check_damping(damping: f32) -> Result<(), ConfigError> {
    if damping.is_finite() && (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(ConfigError::InvalidDamping(damping))
    }
}

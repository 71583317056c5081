//! Error and warning types.

use core::fmt;

use crate::types::{BodyId, CompositeId};

/// Degenerate construction parameters, rejected before anything is created.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A radius must be positive and finite.
    InvalidRadius { name: &'static str, value: f32 },
    /// `floor(radius / (2 * body_radius))` came out as zero.
    NoBodies { radius: f32, body_radius: f32 },
    /// Density must be positive and finite.
    InvalidDensity(f32),
    /// Stiffness must be in (0, 1].
    InvalidStiffness(f32),
    /// Damping must be in [0, 1].
    InvalidDamping(f32),
    /// Rest length must be finite and non-negative.
    InvalidRestLength(f32),
    /// Shape extents must be positive and finite.
    InvalidShape,
    /// Pose position and angle must be finite.
    InvalidPose,
    /// Timestep must be positive and finite.
    InvalidTimestep(f32),
    /// Friction must be finite and non-negative.
    InvalidFriction(f32),
    /// Restitution must be in [0, 1].
    InvalidRestitution(f32),
    /// Air friction must be in [0, 1].
    InvalidAirFriction(f32),
    /// The ring would hold more bodies than a single blob supports.
    TooManyBodies { count: f32, max: usize },
    /// An engine setting is out of range.
    InvalidEngineSetting { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRadius { name, value } => {
                write!(f, "{} must be positive and finite (got {})", name, value)
            }
            ConfigError::NoBodies { radius, body_radius } => write!(
                f,
                "blob radius {} with body radius {} yields no bodies",
                radius, body_radius
            ),
            ConfigError::InvalidDensity(v) => write!(f, "density must be positive and finite (got {})", v),
            ConfigError::InvalidStiffness(v) => write!(f, "stiffness must be in (0, 1] (got {})", v),
            ConfigError::InvalidDamping(v) => write!(f, "damping must be in [0, 1] (got {})", v),
            ConfigError::InvalidRestLength(v) => {
                write!(f, "rest length must be finite and non-negative (got {})", v)
            }
            ConfigError::InvalidShape => write!(f, "shape extents must be positive and finite"),
            ConfigError::InvalidPose => write!(f, "pose must be finite"),
            ConfigError::InvalidTimestep(v) => write!(f, "timestep must be positive and finite (got {})", v),
            ConfigError::InvalidFriction(v) => write!(f, "friction must be finite and non-negative (got {})", v),
            ConfigError::InvalidRestitution(v) => write!(f, "restitution must be in [0, 1] (got {})", v),
            ConfigError::InvalidAirFriction(v) => write!(f, "air friction must be in [0, 1] (got {})", v),
            ConfigError::TooManyBodies { count, max } => {
                write!(f, "blob would hold {} bodies, more than the limit of {}", count, max)
            }
            ConfigError::InvalidEngineSetting { name, value } => write!(f, "{} is out of range (got {})", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by world and engine construction calls.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Config(ConfigError),
    /// A constraint or move referenced a body that is not in the world.
    InvalidReference { body: BodyId },
    UnknownComposite(CompositeId),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "invalid configuration: {}", e),
            SimError::InvalidReference { body } => write!(f, "body {} is not in the world", body.0),
            SimError::UnknownComposite(id) => write!(f, "composite {} does not exist", id.0),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

/// Where a non-finite value was caught.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstabilityStage {
    Constraint,
    Contact,
    Integration,
}

/// Recoverable problems surfaced in a step report. The step itself always completes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepWarning {
    /// A non-finite correction or state was discarded for this body.
    NumericInstability { body: BodyId, stage: InstabilityStage },
    /// `step` was called with a non-positive or non-finite dt; nothing advanced.
    InvalidTimestep(f32),
}

impl fmt::Display for StepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepWarning::NumericInstability { body, stage } => {
                write!(f, "non-finite {:?} result discarded for body {}", stage, body.0)
            }
            StepWarning::InvalidTimestep(dt) => write!(f, "ignored step with dt = {}", dt),
        }
    }
}

//! wobble: soft-body blob physics (ring of circles, complete-graph springs, static walls)

pub mod types;
pub mod error;
pub mod math;
pub mod config;
pub mod api;
pub mod body;
pub mod constraint;
pub mod composite;
pub mod world;
pub mod broadphase;
pub mod narrowphase;
pub mod integrator;
pub mod solver;
pub mod input;
pub mod pointer;
pub mod engine;
pub mod runner;
pub mod scene;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::{ConfigError, InstabilityStage, SimError, StepWarning};
pub use crate::math::Aabb;
pub use crate::config::{BlobConfig, BodyOptions, EngineConfig, InputForceConfig, PointerConfig, RunnerConfig};
pub use crate::body::Body;
pub use crate::constraint::{Constraint, ConstraintKind, Endpoint};
pub use crate::composite::Composite;
pub use crate::world::World;
pub use crate::input::InputState;
pub use crate::pointer::{Pointer, PointerEvent};
pub use crate::engine::{Engine, StepReport};
pub use crate::runner::{FrameClock, ManualClock, Runner, SleepClock, StopHandle, TickReport};
pub use crate::scene::{BoundaryBox, Scene};

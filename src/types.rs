use glam::Vec2;

/// User-defined opaque key carried through snapshots (e.g., a sprite or style handle).
pub type UserKey = u64;

/// Stable handle of a body inside a [`World`](crate::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub u32);

/// Stable handle of a world-owned constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(pub u32);

/// Stable handle of a composite. `CompositeId::ROOT` is the world itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeId(pub u32);

impl CompositeId {
    pub const ROOT: CompositeId = CompositeId(0);
}

/// Supported collision shapes, centered on the body position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Circle { radius: f32 },
    /// Full extents along the body's local X/Y axes.
    Rectangle { width: f32, height: f32 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn rectangle(width: f32, height: f32) -> Self {
        Shape::Rectangle { width, height }
    }

    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => core::f32::consts::PI * radius * radius,
            Shape::Rectangle { width, height } => width * height,
        }
    }

    /// Moment of inertia about the centroid for the given mass.
    pub fn inertia(&self, mass: f32) -> f32 {
        match *self {
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
            Shape::Rectangle { width, height } => mass * (width * width + height * height) / 12.0,
        }
    }

    /// True when every extent is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Shape::Circle { radius } => ok(radius),
            Shape::Rectangle { width, height } => ok(width) && ok(height),
        }
    }
}

/// Position and rotation (radians) of a body.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose {
    pub fn at(position: Vec2) -> Self {
        Self { position, angle: 0.0 }
    }

    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// Tag assigned at construction that selects the directional force multiplier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyRole {
    Primary,
    Secondary,
}

impl BodyRole {
    /// Even ring index is primary, odd is secondary.
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 { BodyRole::Primary } else { BodyRole::Secondary }
    }
}

/// One of the four held-direction inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Unit vector in screen space (+y is down).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
        }
    }
}

/// Overlap contact result (discrete).
#[derive(Copy, Clone, Debug)]
pub struct Overlap {
    /// Unit separating normal, points from B into A.
    pub normal: Vec2,
    /// Penetration depth (> 0 for reported overlaps).
    pub depth: f32,
    /// A representative contact point in world space.
    pub contact: Vec2,
}

/// A narrowphase overlap bound to the pair of bodies that produced it.
#[derive(Copy, Clone, Debug)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub overlap: Overlap,
}

/// Read-only per-body view for drawing.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vec2,
    pub angle: f32,
    pub shape: Shape,
    pub is_static: bool,
    pub user_key: Option<UserKey>,
}

/// Debug/performance statistics for the last broadphase build.
#[derive(Copy, Clone, Debug, Default)]
pub struct BroadphaseStats {
    pub entries: usize,
    pub cells: usize,
    /// Sum of per-cell pair counts (n*(n-1)/2), counts duplicates across cells.
    pub candidate_pairs: usize,
    /// Unique pairs after deduplication and static-static filtering.
    pub unique_pairs: usize,
}

/// Timing breakdown for the last completed step.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepTiming {
    pub step_ms: f64,
    pub forces_ms: f64,
    pub broadphase_ms: f64,
    pub narrowphase_ms: f64,
    pub solve_ms: f64,
    pub integrate_ms: f64,
}

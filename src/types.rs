use glam::Vec2;
use serde::{Deserialize, Serialize};

/// User-defined opaque key carried through obstacles and events (e.g., pack your entity id).
pub type ColKey = u64;

/// Tile code stored in a [`Tilemap`](crate::tilemap::Tilemap) cell.
pub type TileCode = u16;

/// Axis-aligned box in world space (+Y down, so `top < bottom`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Build from edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Centered box (center + half extents), the shape convention bodies use.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            left: center.x - half_extents.x,
            right: center.x + half_extents.x,
            top: center.y - half_extents.y,
            bottom: center.y + half_extents.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Strict overlap: touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grow every edge outward by `margin`.
    pub fn inflate(&self, margin: f32) -> Aabb {
        Aabb {
            left: self.left - margin,
            right: self.right + margin,
            top: self.top - margin,
            bottom: self.bottom + margin,
        }
    }
}

/// Frame-local handle for obstacles pushed this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObstacleId(pub u32);

/// Where a [`Solid`] came from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SolidOrigin {
    Tile { col: i32, row: i32, code: TileCode },
    Obstacle { id: ObstacleId, key: Option<ColKey> },
}

/// Anything a body can be resolved against: a tile cell or another collider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Solid {
    pub aabb: Aabb,
    /// Only blocks bodies landing on its top face.
    pub one_way: bool,
    pub origin: SolidOrigin,
}

/// Resolution axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Side of the body that made contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Head bonk.
    Top,
    /// Feet; the body was pushed up.
    Bottom,
    Left,
    Right,
}

/// Narrow-phase contact emitted while resolving a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub side: Side,
    pub axis: Axis,
    /// Push-out distance applied to the body.
    pub depth: f32,
    pub solid: Solid,
}

/// Per-tick player or AI intent. Sampled by the caller, never read from global state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Horizontal intent in [-1, 1].
    pub axis: f32,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    /// Jump is currently held.
    pub jump_held: bool,
    /// Down is held (drops through one-way platforms).
    pub down_held: bool,
    /// Dash went down this tick.
    pub dash_pressed: bool,
}

/// Which jump branch fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Coyote,
    Buffered,
    Air,
    Wall,
}

/// Everything a tick produced for one character.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// `dt` after clamping.
    pub dt: f32,
    pub events: Vec<CollisionEvent>,
    /// Damaging tiles the body touched after resolution.
    pub hazards: Vec<(i32, i32)>,
    pub landed: bool,
    pub left_ground: bool,
    pub jump: Option<JumpKind>,
    pub dashed: bool,
}

impl TickReport {
    pub fn touched(&self, side: Side) -> bool {
        self.events.iter().any(|e| e.side == side)
    }
}

/// Debug/performance statistics for the current frame.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldStats {
    pub obstacles: usize,
    pub cells: usize,
    /// Tile solids gathered by the broad phase since `begin_frame`.
    pub tile_candidates: usize,
    /// Obstacle solids gathered by the broad phase since `begin_frame`.
    pub obstacle_candidates: usize,
    /// Candidates that actually overlapped and were pushed out.
    pub resolved: usize,
}

/// Timing breakdown for the last completed frame operations.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldTiming {
    pub end_frame_ms: f64,
    pub step_ms: f64,
    pub step_broadphase_ms: f64,
    pub step_resolve_ms: f64,
    pub steps: usize,
    pub events_emitted: usize,
}

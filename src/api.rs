use crate::character::Character;
use crate::config::WorldConfig;
use crate::error::ConfigError;
use crate::tilemap::Tilemap;
use crate::types::*;

/// Broad-phase seam: anything that can hand out candidate solids for a box.
pub trait SolidSource {
    /// Append every solid that may overlap `aabb` to `out`. Solids carrying the
    /// `exclude` key (the body's own collider) are skipped. May over-report;
    /// the resolver does the exact test.
    fn candidates(&self, aabb: &Aabb, exclude: Option<ColKey>, out: &mut Vec<Solid>);
}

impl SolidSource for [Solid] {
    fn candidates(&self, aabb: &Aabb, exclude: Option<ColKey>, out: &mut Vec<Solid>) {
        for s in self {
            if let SolidOrigin::Obstacle { key: Some(k), .. } = s.origin {
                if Some(k) == exclude {
                    continue;
                }
            }
            if s.aabb.overlaps(aabb) {
                out.push(*s);
            }
        }
    }
}

/// Public API contract for the per-tick platformer world.
pub trait PlatformerWorldApi {
    /// Construct a new world; rejects nonsensical tuning.
    fn new(cfg: WorldConfig) -> Result<Self, ConfigError>
    where
        Self: Sized;

    // --- Frame lifecycle ---------------------------------------------------

    /// Begin a new frame. Clears obstacles, events and counters from the previous frame.
    fn begin_frame(&mut self);

    /// Insert a non-tile collider (other entity, moving platform) for this frame.
    fn push_obstacle(&mut self, aabb: Aabb, one_way: bool, user_key: Option<ColKey>) -> ObstacleId;

    /// Finalize insertions and build the uniform grid.
    fn end_frame(&mut self);

    // --- Simulation ---------------------------------------------------------

    /// Advance one character by `dt` seconds against the tilemap and this frame's obstacles.
    fn step(&mut self, character: &mut Character, intent: &InputIntent, tilemap: &Tilemap, dt: f32) -> TickReport;

    /// Drain and return the collision events buffered this frame.
    fn drain_events(&mut self) -> Vec<(Option<ColKey>, CollisionEvent)>;

    // --- Queries -----------------------------------------------------------

    /// Obstacles whose grid cell is the one containing `point` or one of its 8 neighbors.
    fn nearby_obstacles(&self, point: glam::Vec2) -> Vec<(ObstacleId, Option<ColKey>)>;

    /// Obstacles strictly overlapping `aabb`.
    fn query_aabb(&self, aabb: &Aabb) -> Vec<(ObstacleId, Option<ColKey>)>;
}

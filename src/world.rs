use glam::Vec2;

use std::collections::HashMap;
use std::time::Instant;

use crate::api::{PlatformerWorldApi, SolidSource};
use crate::broadphase::SpatialGrid;
use crate::character::Character;
use crate::config::{clamp_dt, WorldConfig};
use crate::error::ConfigError;
use crate::jump::JumpController;
use crate::mover::Mover;
use crate::resolver::{resolve_all, ResolveContext};
use crate::tilemap::Tilemap;
use crate::types::*;

/// Thickness of the strips used to detect resting contact (walls while
/// dashing or idle, floor while dashing).
pub const CONTACT_PROBE: f32 = 1.0;

/// Per-tick platformer world: this frame's obstacles, the movement rules and
/// an event buffer.
pub struct PlatformerWorld {
    pub cfg: WorldConfig,
    pub frame_counter: u32,

    mover: Mover,
    jumper: JumpController,

    // Frame-local storage
    obstacles: Vec<Obstacle>,
    key_to_id: HashMap<ColKey, ObstacleId>,
    grid: SpatialGrid,
    built: bool,

    // Event buffer for this frame
    events: Vec<(Option<ColKey>, CollisionEvent)>,
    scratch: Vec<Solid>,

    stats: WorldStats,
    last_timing: Option<WorldTiming>,
}

#[derive(Copy, Clone, Debug)]
struct Obstacle {
    aabb: Aabb,
    one_way: bool,
    user_key: Option<ColKey>,
}

impl PlatformerWorldApi for PlatformerWorld {
    fn new(cfg: WorldConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        log::debug!("platformer world: cell_size={} max_dt={}", cfg.cell_size, cfg.max_dt);
        Ok(Self {
            mover: Mover::new(cfg.movement.clone()),
            jumper: JumpController::new(cfg.jump.clone()),
            grid: SpatialGrid::new(cfg.cell_size),
            cfg,
            frame_counter: 0,
            obstacles: Vec::new(),
            key_to_id: HashMap::new(),
            built: false,
            events: Vec::new(),
            scratch: Vec::new(),
            stats: WorldStats::default(),
            last_timing: None,
        })
    }

    fn begin_frame(&mut self) {
        // Clear ephemeral state
        self.obstacles.clear();
        self.key_to_id.clear();
        self.grid.clear();
        self.built = false;
        self.events.clear();
        self.stats = WorldStats::default();
        self.last_timing = None;
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }

    fn push_obstacle(&mut self, aabb: Aabb, one_way: bool, user_key: Option<ColKey>) -> ObstacleId {
        let id = ObstacleId(self.obstacles.len() as u32);
        if let Some(k) = user_key {
            debug_assert!(
                !self.key_to_id.contains_key(&k),
                "Duplicate user_key encountered within a frame"
            );
            self.key_to_id.insert(k, id);
        }
        self.obstacles.push(Obstacle { aabb, one_way, user_key });
        id
    }

    fn end_frame(&mut self) {
        let t0 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        self.grid.clear();
        for (i, o) in self.obstacles.iter().enumerate() {
            self.grid.insert(i, &o.aabb);
        }
        self.built = true;
        self.stats.obstacles = self.obstacles.len();
        self.stats.cells = self.grid.cell_count();
        if let Some(t0) = t0 {
            self.last_timing = Some(WorldTiming {
                end_frame_ms: t0.elapsed().as_secs_f64() * 1000.0,
                ..Default::default()
            });
        }
    }

    fn step(&mut self, character: &mut Character, intent: &InputIntent, tilemap: &Tilemap, dt: f32) -> TickReport {
        debug_assert!(
            self.built || self.obstacles.is_empty(),
            "step() called before end_frame(); this frame's obstacles are invisible"
        );
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut bp_ms = 0.0;
        let mut resolve_ms = 0.0;

        let dt = clamp_dt(dt, self.cfg.max_dt);
        let mut report = TickReport { dt, ..Default::default() };
        let Character { body, jump, dash, key } = character;
        let key = *key;
        let was_grounded = body.grounded;

        // --- Dash / horizontal intent --------------------------------------
        let mut dashing = false;
        if let Some(d) = dash.as_mut() {
            d.update(&self.cfg.dash, body, intent.axis, dt);
            if intent.dash_pressed && d.try_start(&self.cfg.dash, body, intent.axis) {
                report.dashed = true;
            }
            if d.is_dashing() {
                d.drive(&self.cfg.dash, body);
                dashing = true;
            }
        }
        if !dashing {
            let grounded = body.grounded;
            self.mover.apply_horizontal(body, intent.axis, dt, grounded);
        }

        // --- X: move, then resolve fully ------------------------------------
        let prev_bottom = body.bottom();
        let ctx = ResolveContext {
            prev_bottom,
            drop_through: intent.down_held,
            one_way_tolerance: self.cfg.one_way_tolerance,
        };
        let sweep_x = body.swept_aabb(Vec2::new(body.velocity.x * dt, 0.0)).inflate(CONTACT_PROBE);
        let candidates = self.gather(tilemap, &sweep_x, key, &mut bp_ms);
        let t_res = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        body.integrate_x(dt);
        let first_x = report.events.len();
        self.stats.resolved += resolve_all(body, &candidates, Axis::X, &ctx, &mut report.events);
        body.on_wall_left = false;
        body.on_wall_right = false;
        for ev in &report.events[first_x..] {
            match ev.side {
                Side::Left => body.on_wall_left = true,
                Side::Right => body.on_wall_right = true,
                _ => {}
            }
        }
        let a = body.aabb();
        let left_strip = Aabb::new(a.left - CONTACT_PROBE, a.top + CONTACT_PROBE, a.left, a.bottom - CONTACT_PROBE);
        let right_strip = Aabb::new(a.right, a.top + CONTACT_PROBE, a.right + CONTACT_PROBE, a.bottom - CONTACT_PROBE);
        for s in candidates.iter().filter(|s| !s.one_way) {
            body.on_wall_left |= s.aabb.overlaps(&left_strip);
            body.on_wall_right |= s.aabb.overlaps(&right_strip);
        }
        if let Some(t) = t_res {
            resolve_ms += t.elapsed().as_secs_f64() * 1000.0;
        }
        self.recycle(candidates);

        // --- Y: gravity, move, then resolve ---------------------------------
        let vy0 = body.velocity.y;
        if !dashing {
            self.mover.apply_gravity(body, dt);
            self.mover.apply_wall_slide(body, intent.axis);
        }
        let dy = 0.5 * (vy0 + body.velocity.y) * dt;
        let sweep_y = body.swept_aabb(Vec2::new(0.0, dy)).inflate(CONTACT_PROBE);
        let candidates = self.gather(tilemap, &sweep_y, key, &mut bp_ms);
        let t_res = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let ctx = ResolveContext { drop_through: intent.down_held || body.dropping, ..ctx };
        body.integrate_y_from(vy0, dt);
        body.grounded = false;
        self.stats.resolved += resolve_all(body, &candidates, Axis::Y, &ctx, &mut report.events);
        if dashing && !body.grounded {
            body.grounded = Self::supported(body.aabb(), &candidates, ctx.drop_through);
        }
        let a = body.aabb();
        body.dropping = ctx.drop_through && candidates.iter().any(|s| s.one_way && s.aabb.overlaps(&a));
        if let Some(t) = t_res {
            resolve_ms += t.elapsed().as_secs_f64() * 1000.0;
        }
        self.recycle(candidates);

        report.landed = body.grounded && !was_grounded;
        report.left_ground = !body.grounded && was_grounded;
        tilemap.hazards_touching(&body.aabb().inflate(CONTACT_PROBE * 0.5), &mut report.hazards);

        // --- Jump: bookkeeping, then this tick's press/release --------------
        if let Some(js) = jump.as_mut() {
            report.jump = self.jumper.tick(js, body, intent, dt).jump;
        }
        if let Some(kind) = report.jump {
            log::trace!("jump {:?} vy={}", kind, body.velocity.y);
        }

        // --- Events ---------------------------------------------------------
        for ev in &report.events {
            if self.events.len() >= self.cfg.max_events {
                log::debug!("event buffer full ({}), dropping", self.cfg.max_events);
                break;
            }
            self.events.push((key, *ev));
        }

        if let Some(t_all) = t_all {
            let timing = self.last_timing.get_or_insert_with(WorldTiming::default);
            timing.step_ms += t_all.elapsed().as_secs_f64() * 1000.0;
            timing.step_broadphase_ms += bp_ms;
            timing.step_resolve_ms += resolve_ms;
            timing.steps += 1;
            timing.events_emitted = self.events.len();
        }
        report
    }

    fn drain_events(&mut self) -> Vec<(Option<ColKey>, CollisionEvent)> {
        std::mem::take(&mut self.events)
    }

    fn nearby_obstacles(&self, point: Vec2) -> Vec<(ObstacleId, Option<ColKey>)> {
        self.grid
            .get_nearby(point)
            .into_iter()
            .map(|i| (ObstacleId(i as u32), self.obstacles[i].user_key))
            .collect()
    }

    fn query_aabb(&self, aabb: &Aabb) -> Vec<(ObstacleId, Option<ColKey>)> {
        self.grid
            .query_aabb(aabb)
            .into_iter()
            .filter(|&i| self.obstacles[i].aabb.overlaps(aabb))
            .map(|i| (ObstacleId(i as u32), self.obstacles[i].user_key))
            .collect()
    }
}

impl SolidSource for PlatformerWorld {
    fn candidates(&self, aabb: &Aabb, exclude: Option<ColKey>, out: &mut Vec<Solid>) {
        for i in self.grid.query_aabb(aabb) {
            let o = &self.obstacles[i];
            if o.user_key.is_some() && o.user_key == exclude {
                continue;
            }
            out.push(Solid {
                aabb: o.aabb,
                one_way: o.one_way,
                origin: SolidOrigin::Obstacle { id: ObstacleId(i as u32), key: o.user_key },
            });
        }
    }
}

impl PlatformerWorld {
    /// Tiles first, then obstacles, into the reusable scratch buffer.
    fn gather(&mut self, tilemap: &Tilemap, aabb: &Aabb, exclude: Option<ColKey>, bp_ms: &mut f64) -> Vec<Solid> {
        let t0 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut out = std::mem::take(&mut self.scratch);
        out.clear();
        tilemap.candidates(aabb, exclude, &mut out);
        let tiles = out.len();
        self.candidates(aabb, exclude, &mut out);
        self.stats.tile_candidates += tiles;
        self.stats.obstacle_candidates += out.len() - tiles;
        if let Some(t0) = t0 {
            *bp_ms += t0.elapsed().as_secs_f64() * 1000.0;
        }
        out
    }

    fn recycle(&mut self, buf: Vec<Solid>) {
        self.scratch = buf;
    }

    /// Something to stand on directly below the feet.
    fn supported(a: Aabb, candidates: &[Solid], drop_through: bool) -> bool {
        let strip = Aabb::new(a.left, a.bottom, a.right, a.bottom + CONTACT_PROBE);
        candidates.iter().any(|s| {
            if !s.aabb.overlaps(&strip) {
                return false;
            }
            !s.one_way || (!drop_through && (s.aabb.top - a.bottom).abs() <= CONTACT_PROBE)
        })
    }

    pub fn movement(&self) -> &Mover {
        &self.mover
    }

    pub fn jumps(&self) -> &JumpController {
        &self.jumper
    }

    /// Look up an obstacle pushed this frame by its user key.
    pub fn id_for_key(&self, key: ColKey) -> Option<ObstacleId> {
        self.key_to_id.get(&key).copied()
    }

    pub fn obstacle_aabb(&self, id: ObstacleId) -> Option<Aabb> {
        self.obstacles.get(id.0 as usize).map(|o| o.aabb)
    }

    /// Return debug/perf stats for the current frame.
    pub fn debug_stats(&self) -> WorldStats {
        self.stats
    }

    /// Return timing breakdown for the last `end_frame`/`step` runs.
    pub fn timing(&self) -> Option<WorldTiming> {
        self.last_timing
    }
}

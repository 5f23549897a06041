//! Tuning data. Every struct deserializes with per-field defaults, so a JSON file
//! only has to name the values it changes.

use serde::{Deserialize, Serialize};

use crate::error::{positive, within, ConfigError};

/// Rate the friction factors are expressed against (one factor application per 1/60 s).
pub const REFERENCE_RATE: f32 = 60.0;

/// Smallest `dt` a tick integrates with; zero/negative/NaN steps are clamped here.
pub const MIN_DT: f32 = 1e-6;

/// Horizontal speeds below this snap to zero.
pub const VELOCITY_EPSILON: f32 = 0.1;

/// Ground vs air movement regimes plus gravity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// px/s² while grounded.
    pub ground_accel: f32,
    /// px/s² while airborne (typically 40-60% of ground).
    pub air_accel: f32,
    /// Velocity factor kept per 1/60 s on the ground, in (0, 1].
    pub ground_friction: f32,
    /// Velocity factor kept per 1/60 s in the air, in (0, 1].
    pub air_friction: f32,
    pub max_speed: f32,
    /// px/s², positive is down.
    pub gravity: f32,
    /// Terminal velocity.
    pub max_fall_speed: f32,
    /// Fall speed cap while pressing into a wall; `None` disables wall sliding.
    pub wall_slide_speed: Option<f32>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            ground_accel: 4000.0,
            air_accel: 2000.0,
            ground_friction: 0.8,
            air_friction: 0.95,
            max_speed: 300.0,
            gravity: 980.0,
            max_fall_speed: 600.0,
            wall_slide_speed: None,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        within("ground_accel", self.ground_accel, 0.0, f32::MAX)?;
        within("air_accel", self.air_accel, 0.0, f32::MAX)?;
        within("ground_friction", self.ground_friction, f32::MIN_POSITIVE, 1.0)?;
        within("air_friction", self.air_friction, f32::MIN_POSITIVE, 1.0)?;
        positive("max_speed", self.max_speed)?;
        // Resting contact is re-detected by sinking into the floor each tick.
        positive("gravity", self.gravity)?;
        positive("max_fall_speed", self.max_fall_speed)?;
        if let Some(s) = self.wall_slide_speed {
            within("wall_slide_speed", s, 0.0, self.max_fall_speed)?;
        }
        Ok(())
    }

    #[inline]
    pub fn accel(&self, grounded: bool) -> f32 {
        if grounded { self.ground_accel } else { self.air_accel }
    }

    #[inline]
    pub fn friction(&self, grounded: bool) -> f32 {
        if grounded { self.ground_friction } else { self.air_friction }
    }
}

/// Wall jump kick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallJumpConfig {
    /// Fraction of `jump_speed` applied upward.
    pub vertical_multiplier: f32,
    /// Horizontal speed away from the wall.
    pub push_speed: f32,
}

impl Default for WallJumpConfig {
    fn default() -> Self {
        Self { vertical_multiplier: 1.0, push_speed: 250.0 }
    }
}

/// Jump shaping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Upward launch speed in px/s (applied as `-jump_speed`).
    pub jump_speed: f32,
    /// Total jumps per airtime, ground jump included (2 = double jump).
    pub max_jumps: u32,
    /// Power of air jumps relative to the ground jump.
    pub air_jump_multiplier: f32,
    /// Seconds after walking off a ledge during which a ground jump still fires.
    pub coyote_duration: f32,
    /// Seconds an early press is remembered before landing.
    pub buffer_duration: f32,
    /// Rising velocity kept when jump is released early.
    pub release_multiplier: f32,
    pub wall_jump: Option<WallJumpConfig>,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_speed: 450.0,
            max_jumps: 2,
            air_jump_multiplier: 0.9,
            coyote_duration: 0.1,
            buffer_duration: 0.1,
            release_multiplier: 0.5,
            wall_jump: None,
        }
    }
}

impl JumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("jump_speed", self.jump_speed)?;
        if self.max_jumps < 1 {
            return Err(ConfigError::TooSmall { field: "max_jumps", value: self.max_jumps, min: 1 });
        }
        positive("air_jump_multiplier", self.air_jump_multiplier)?;
        within("coyote_duration", self.coyote_duration, 0.0, f32::MAX)?;
        within("buffer_duration", self.buffer_duration, 0.0, f32::MAX)?;
        within("release_multiplier", self.release_multiplier, 0.0, 1.0)?;
        if let Some(w) = &self.wall_jump {
            positive("wall_jump.vertical_multiplier", w.vertical_multiplier)?;
            within("wall_jump.push_speed", w.push_speed, 0.0, f32::MAX)?;
        }
        Ok(())
    }
}

/// Dash burst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub speed: f32,
    pub duration: f32,
    pub cooldown: f32,
    /// Dashes available per airtime; refilled on landing.
    pub air_dashes: u32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self { speed: 600.0, duration: 0.15, cooldown: 0.4, air_dashes: 1 }
    }
}

impl DashConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dash.speed", self.speed)?;
        positive("dash.duration", self.duration)?;
        within("dash.cooldown", self.cooldown, 0.0, f32::MAX)?;
        Ok(())
    }
}

/// World-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub dash: DashConfig,
    /// Obstacle grid cell size in world units; at least the largest obstacle keeps
    /// `get_nearby` exact.
    pub cell_size: f32,
    /// Upper clamp for `dt` (tab-away spikes).
    pub max_dt: f32,
    /// How far below a one-way top a body's feet may have been before the move and
    /// still land on it.
    pub one_way_tolerance: f32,
    /// Maximum number of events buffered per frame; extra are dropped.
    pub max_events: usize,
    /// Enable internal timing instrumentation (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            jump: JumpConfig::default(),
            dash: DashConfig::default(),
            cell_size: 64.0,
            max_dt: 0.1,
            one_way_tolerance: 5.0,
            max_events: 1024,
            enable_timing: false,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.jump.validate()?;
        self.dash.validate()?;
        positive("cell_size", self.cell_size)?;
        within("max_dt", self.max_dt, MIN_DT, f32::MAX)?;
        within("one_way_tolerance", self.one_way_tolerance, 0.0, f32::MAX)?;
        Ok(())
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WorldConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Clamp a raw frame delta into `[MIN_DT, max_dt]`. NaN counts as degenerate.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt < MIN_DT {
        log::trace!("degenerate dt {dt}, clamping to {MIN_DT}");
        return MIN_DT;
    }
    if dt > max_dt {
        log::debug!("dt spike {dt:.4}s clamped to {max_dt}s");
        return max_dt;
    }
    dt
}

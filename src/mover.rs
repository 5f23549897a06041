//! Velocity shaping. The mover only touches velocity; moving the position is
//! the caller's integration step.

use crate::body::KinematicBody;
use crate::config::{MovementConfig, REFERENCE_RATE, VELOCITY_EPSILON};

#[derive(Clone, Debug)]
pub struct Mover {
    pub cfg: MovementConfig,
}

impl Mover {
    pub fn new(cfg: MovementConfig) -> Self {
        Self { cfg }
    }

    /// Accelerate toward `axis`, clamp to `max_speed`, then decay by friction
    /// normalized to 60 Hz so the result does not depend on the tick rate.
    pub fn apply_horizontal(&self, body: &mut KinematicBody, axis: f32, dt: f32, grounded: bool) {
        let axis = if axis.is_finite() { axis.clamp(-1.0, 1.0) } else { 0.0 };
        let max = self.cfg.max_speed;
        let mut vx = body.velocity.x + axis * self.cfg.accel(grounded) * dt;
        vx = vx.clamp(-max, max);
        vx *= self.cfg.friction(grounded).powf(dt * REFERENCE_RATE);
        if vx.abs() < VELOCITY_EPSILON {
            vx = 0.0;
        }
        body.velocity.x = vx;
    }

    /// `velocity.y += gravity * dt`, capped at terminal velocity.
    pub fn apply_gravity(&self, body: &mut KinematicBody, dt: f32) {
        body.velocity.y = (body.velocity.y + self.cfg.gravity * dt).min(self.cfg.max_fall_speed);
    }

    /// Cap the fall speed while airborne and pushing into a touched wall.
    pub fn apply_wall_slide(&self, body: &mut KinematicBody, axis: f32) {
        let Some(cap) = self.cfg.wall_slide_speed else { return };
        if body.grounded || body.velocity.y <= cap {
            return;
        }
        let pressing = (body.on_wall_left && axis < 0.0) || (body.on_wall_right && axis > 0.0);
        if pressing {
            body.velocity.y = cap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn body() -> KinematicBody {
        KinematicBody::new(Vec2::ZERO, Vec2::splat(16.0))
    }

    #[test]
    fn test_terminal_velocity_monotonic_clamp() {
        let mover = Mover::new(MovementConfig::default());
        let mut b = body();
        let mut last = b.velocity.y;
        for _ in 0..600 {
            mover.apply_gravity(&mut b, 1.0 / 60.0);
            assert!(b.velocity.y >= last);
            assert!(b.velocity.y <= mover.cfg.max_fall_speed);
            last = b.velocity.y;
        }
        assert_eq!(b.velocity.y, mover.cfg.max_fall_speed);
    }

    #[test]
    fn test_gravity_does_not_move_position() {
        let mover = Mover::new(MovementConfig::default());
        let mut b = body();
        mover.apply_gravity(&mut b, 0.1);
        mover.apply_horizontal(&mut b, 1.0, 0.1, true);
        assert_eq!(b.position, Vec2::ZERO);
    }

    #[test]
    fn test_friction_decay_is_frame_rate_independent() {
        let mover = Mover::new(MovementConfig::default());
        let run = |hz: u32| {
            let mut b = body();
            b.velocity.x = 200.0;
            for _ in 0..hz / 2 {
                mover.apply_horizontal(&mut b, 0.0, 1.0 / hz as f32, true);
            }
            b.velocity.x
        };
        let at30 = run(30);
        let at60 = run(60);
        let at120 = run(120);
        let expected = 200.0 * 0.8f32.powf(30.0);
        assert!((at30 - expected).abs() < 1e-3, "{at30} vs {expected}");
        assert!((at30 - at60).abs() < 1e-3);
        assert!((at60 - at120).abs() < 1e-3);
    }

    #[test]
    fn test_speed_clamped_and_air_is_weaker() {
        let mover = Mover::new(MovementConfig { ground_friction: 1.0, air_friction: 1.0, ..Default::default() });
        let mut ground = body();
        let mut air = body();
        mover.apply_horizontal(&mut ground, 1.0, 0.01, true);
        mover.apply_horizontal(&mut air, 1.0, 0.01, false);
        assert!(air.velocity.x < ground.velocity.x);
        for _ in 0..1000 {
            mover.apply_horizontal(&mut ground, 1.0, 0.01, true);
        }
        assert_eq!(ground.velocity.x, mover.cfg.max_speed);
    }

    #[test]
    fn test_snap_to_zero_and_bad_axis() {
        let mover = Mover::new(MovementConfig::default());
        let mut b = body();
        b.velocity.x = 0.05;
        mover.apply_horizontal(&mut b, 0.0, 1.0 / 60.0, true);
        assert_eq!(b.velocity.x, 0.0);
        mover.apply_horizontal(&mut b, f32::NAN, 1.0 / 60.0, true);
        assert_eq!(b.velocity.x, 0.0);
        // Overdriven axis behaves like full input.
        let mut c = body();
        let mut d = body();
        mover.apply_horizontal(&mut c, 5.0, 1.0 / 60.0, true);
        mover.apply_horizontal(&mut d, 1.0, 1.0 / 60.0, true);
        assert_eq!(c.velocity.x, d.velocity.x);
    }

    #[test]
    fn test_wall_slide_caps_fall_only_when_pressing() {
        let mover = Mover::new(MovementConfig { wall_slide_speed: Some(80.0), ..Default::default() });
        let mut b = body();
        b.velocity.y = 400.0;
        b.on_wall_right = true;
        mover.apply_wall_slide(&mut b, -1.0);
        assert_eq!(b.velocity.y, 400.0);
        mover.apply_wall_slide(&mut b, 1.0);
        assert_eq!(b.velocity.y, 80.0);
    }
}

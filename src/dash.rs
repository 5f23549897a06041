use crate::body::KinematicBody;
use crate::config::DashConfig;

/// Optional dash component. While active the dash owns horizontal velocity
/// and gravity is suspended.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DashState {
    /// Seconds of dash left; > 0 while dashing.
    pub timer: f32,
    pub cooldown: f32,
    /// -1 or +1.
    pub direction: f32,
    /// Air dashes left this airtime.
    pub dashes_remaining: u32,
    /// Last non-zero horizontal intent, used when dashing from a standstill.
    pub facing: f32,
}

impl DashState {
    pub fn new(cfg: &DashConfig) -> Self {
        Self { dashes_remaining: cfg.air_dashes, facing: 1.0, ..Default::default() }
    }

    pub fn is_dashing(&self) -> bool {
        self.timer > 0.0
    }

    /// Tick timers, track facing and refill on the ground.
    pub fn update(&mut self, cfg: &DashConfig, body: &KinematicBody, axis: f32, dt: f32) {
        let dt = dt.max(0.0);
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
            if self.timer == 0.0 {
                self.cooldown = cfg.cooldown;
            }
        } else {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if axis.is_finite() && axis != 0.0 {
            self.facing = axis.signum();
        }
        if body.grounded {
            self.dashes_remaining = cfg.air_dashes;
        }
    }

    /// Start a dash if off cooldown. Grounded dashes are free; airborne ones use
    /// up `dashes_remaining`.
    pub fn try_start(&mut self, cfg: &DashConfig, body: &mut KinematicBody, axis: f32) -> bool {
        if self.is_dashing() || self.cooldown > 0.0 {
            return false;
        }
        if !body.grounded {
            if self.dashes_remaining == 0 {
                return false;
            }
            self.dashes_remaining -= 1;
        }
        self.direction = if axis.is_finite() && axis != 0.0 { axis.signum() } else { self.facing };
        self.timer = cfg.duration;
        self.drive(cfg, body);
        log::trace!("dash dir={} grounded={}", self.direction, body.grounded);
        true
    }

    /// Hold the dash velocity for this tick.
    pub fn drive(&self, cfg: &DashConfig, body: &mut KinematicBody) {
        body.velocity.x = self.direction * cfg.speed;
        body.velocity.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_dash_lifecycle() {
        let cfg = DashConfig::default();
        let mut d = DashState::new(&cfg);
        let mut b = KinematicBody::new(Vec2::ZERO, Vec2::splat(16.0));
        b.velocity.y = 100.0;
        assert!(d.try_start(&cfg, &mut b, -0.5));
        assert_eq!(b.velocity, Vec2::new(-cfg.speed, 0.0));
        assert_eq!(d.dashes_remaining, 0);
        assert!(!d.try_start(&cfg, &mut b, 1.0));

        d.update(&cfg, &b, 0.0, cfg.duration + 0.001);
        assert!(!d.is_dashing());
        assert_eq!(d.cooldown, cfg.cooldown);
        d.update(&cfg, &b, 0.0, cfg.cooldown + 0.001);
        // Off cooldown but no air dash left.
        assert!(!d.try_start(&cfg, &mut b, 1.0));

        b.grounded = true;
        d.update(&cfg, &b, 0.0, 0.01);
        assert_eq!(d.dashes_remaining, cfg.air_dashes);
    }

    #[test]
    fn test_dash_uses_facing_from_standstill() {
        let cfg = DashConfig::default();
        let mut d = DashState::new(&cfg);
        let mut b = KinematicBody::new(Vec2::ZERO, Vec2::splat(16.0));
        b.grounded = true;
        d.update(&cfg, &b, -1.0, 0.01);
        assert!(d.try_start(&cfg, &mut b, 0.0));
        assert_eq!(d.direction, -1.0);
        assert_eq!(d.dashes_remaining, cfg.air_dashes);
    }
}

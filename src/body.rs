use glam::Vec2;

use crate::types::Aabb;

/// Kinematic body: center-based position, velocity in px/s, full size.
///
/// Pure data plus integration helpers. Mutated each tick by the mover, the
/// resolver and the jump controller, in that order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// Touched a wall on its left during this tick's X pass.
    pub on_wall_left: bool,
    /// Touched a wall on its right during this tick's X pass.
    pub on_wall_right: bool,
    /// Passing down through a one-way platform; kept until clear of it.
    pub dropping: bool,
}

impl KinematicBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
            on_wall_left: false,
            on_wall_right: false,
            dropping: false,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents())
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.size.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn top(&self) -> f32 {
        self.position.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y * 0.5
    }

    pub fn touching_wall(&self) -> bool {
        self.on_wall_left || self.on_wall_right
    }

    /// -1 for a wall on the left, +1 on the right, 0 for none or both.
    pub fn wall_direction(&self) -> f32 {
        match (self.on_wall_left, self.on_wall_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// `position.x += velocity.x * dt`
    #[inline]
    pub fn integrate_x(&mut self, dt: f32) {
        self.position.x += self.velocity.x * dt;
    }

    /// `position.y += velocity.y * dt`
    #[inline]
    pub fn integrate_y(&mut self, dt: f32) {
        self.position.y += self.velocity.y * dt;
    }

    /// Move on Y using the mean of the velocity before and after this tick's
    /// acceleration. Exact for constant gravity.
    #[inline]
    pub fn integrate_y_from(&mut self, previous_vy: f32, dt: f32) {
        self.position.y += 0.5 * (previous_vy + self.velocity.y) * dt;
    }

    /// Box swept over a displacement, used to gather broad-phase candidates.
    pub fn swept_aabb(&self, displacement: Vec2) -> Aabb {
        let now = self.aabb();
        let h = self.half_extents();
        now.union(&Aabb::from_center(self.position + displacement, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_center_based() {
        let b = KinematicBody::new(Vec2::new(100.0, 100.0), Vec2::new(32.0, 32.0));
        assert_eq!(b.left(), 84.0);
        assert_eq!(b.right(), 116.0);
        assert_eq!(b.top(), 84.0);
        assert_eq!(b.bottom(), 116.0);
        assert_eq!(b.aabb(), Aabb::new(84.0, 84.0, 116.0, 116.0));
    }

    #[test]
    fn test_integrate_from_is_exact_for_constant_accel() {
        let mut b = KinematicBody::new(Vec2::new(0.0, 100.0), Vec2::splat(10.0));
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            let vy0 = b.velocity.y;
            b.velocity.y += 980.0 * dt;
            b.integrate_y_from(vy0, dt);
        }
        assert!((b.position.y - 590.0).abs() < 1e-2);
    }

    #[test]
    fn test_swept_covers_both_ends() {
        let b = KinematicBody::new(Vec2::ZERO, Vec2::splat(2.0));
        let s = b.swept_aabb(Vec2::new(10.0, -4.0));
        assert_eq!(s, Aabb::new(-1.0, -5.0, 11.0, 1.0));
    }

    #[test]
    fn test_wall_direction() {
        let mut b = KinematicBody::new(Vec2::ZERO, Vec2::splat(2.0));
        assert_eq!(b.wall_direction(), 0.0);
        b.on_wall_right = true;
        assert_eq!(b.wall_direction(), 1.0);
        b.on_wall_left = true;
        assert_eq!(b.wall_direction(), 0.0);
        assert!(b.touching_wall());
    }
}

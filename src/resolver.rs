//! Narrow phase: per-axis overlap and push-out against candidate solids.
//!
//! Callers must move and resolve X completely before moving on Y. Resolving both
//! axes from one diagonal overlap is what snags bodies on tile seams and corners.

use crate::body::KinematicBody;
use crate::types::*;

/// Per-pass facts the one-way rule needs.
#[derive(Copy, Clone, Debug)]
pub struct ResolveContext {
    /// Body bottom before this tick's Y move.
    pub prev_bottom: f32,
    /// "Down" is held; one-way solids are ignored.
    pub drop_through: bool,
    /// How far below a one-way top the feet may have been and still land.
    pub one_way_tolerance: f32,
}

impl ResolveContext {
    /// Context that lets every one-way solid through unless the body was above it.
    pub fn from_body(body: &KinematicBody, one_way_tolerance: f32) -> Self {
        Self { prev_bottom: body.bottom(), drop_through: false, one_way_tolerance }
    }
}

/// Strict AABB overlap between a body and a solid.
#[inline]
pub fn overlaps(body: &KinematicBody, solid: &Solid) -> bool {
    body.aabb().overlaps(&solid.aabb)
}

/// One-way solids only catch a body falling onto their top face.
#[inline]
fn one_way_blocks(body: &KinematicBody, solid: &Solid, ctx: &ResolveContext) -> bool {
    !ctx.drop_through
        && body.velocity.y >= 0.0
        && ctx.prev_bottom <= solid.aabb.top + ctx.one_way_tolerance
}

/// One ulp from `v` toward `dir` (which must be non-zero).
#[inline]
fn ulp_toward(v: f32, dir: f32) -> f32 {
    if v == 0.0 {
        return f32::from_bits(1).copysign(dir);
    }
    let bits = v.to_bits();
    if (v > 0.0) == (dir > 0.0) { f32::from_bits(bits + 1) } else { f32::from_bits(bits - 1) }
}

/// `position ± half` is rounded, so the edge rebuilt from a placed center can
/// land an ulp inside the face it was placed against. Walk the center out until
/// the rebuilt edge is flush or clear.
fn settle_flush(body: &mut KinematicBody, side: Side, face: f32) {
    match side {
        Side::Right => {
            while body.right() > face {
                body.position.x = ulp_toward(body.position.x, -1.0);
            }
        }
        Side::Left => {
            while body.left() < face {
                body.position.x = ulp_toward(body.position.x, 1.0);
            }
        }
        Side::Bottom => {
            while body.bottom() > face {
                body.position.y = ulp_toward(body.position.y, -1.0);
            }
        }
        Side::Top => {
            while body.top() < face {
                body.position.y = ulp_toward(body.position.y, 1.0);
            }
        }
    }
}

/// Push `body` out of `solid` along `axis` and zero that velocity component.
///
/// Both candidate push distances are computed and the smaller wins; on a tie
/// the body goes back the way it came. Returns `None` when nothing overlapped.
pub fn resolve_axis(body: &mut KinematicBody, solid: &Solid, axis: Axis, ctx: &ResolveContext) -> Option<CollisionEvent> {
    if !overlaps(body, solid) {
        return None;
    }
    let b = body.aabb();
    let s = &solid.aabb;
    let half = body.half_extents();
    match axis {
        Axis::X => {
            if solid.one_way {
                return None;
            }
            let overlap_left = b.right - s.left;
            let overlap_right = s.right - b.left;
            let push_left = overlap_left < overlap_right
                || (overlap_left == overlap_right && body.velocity.x >= 0.0);
            body.velocity.x = 0.0;
            if push_left {
                body.position.x = s.left - half.x;
                settle_flush(body, Side::Right, s.left);
                Some(CollisionEvent { side: Side::Right, axis, depth: overlap_left, solid: *solid })
            } else {
                body.position.x = s.right + half.x;
                settle_flush(body, Side::Left, s.right);
                Some(CollisionEvent { side: Side::Left, axis, depth: overlap_right, solid: *solid })
            }
        }
        Axis::Y => {
            let overlap_top = b.bottom - s.top;
            let overlap_bottom = s.bottom - b.top;
            let push_up = if solid.one_way {
                if !one_way_blocks(body, solid, ctx) {
                    return None;
                }
                true
            } else {
                overlap_top < overlap_bottom || (overlap_top == overlap_bottom && body.velocity.y >= 0.0)
            };
            body.velocity.y = 0.0;
            if push_up {
                body.position.y = s.top - half.y;
                settle_flush(body, Side::Bottom, s.top);
                body.grounded = true;
                Some(CollisionEvent { side: Side::Bottom, axis, depth: overlap_top, solid: *solid })
            } else {
                body.position.y = s.bottom + half.y;
                settle_flush(body, Side::Top, s.bottom);
                Some(CollisionEvent { side: Side::Top, axis, depth: overlap_bottom, solid: *solid })
            }
        }
    }
}

/// Resolve `axis` against every candidate in order, appending an event per push.
/// Returns the number of pushes.
pub fn resolve_all(
    body: &mut KinematicBody,
    candidates: &[Solid],
    axis: Axis,
    ctx: &ResolveContext,
    events: &mut Vec<CollisionEvent>,
) -> usize {
    let mut n = 0;
    for solid in candidates {
        if let Some(ev) = resolve_axis(body, solid, axis, ctx) {
            events.push(ev);
            n += 1;
        }
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn solid(left: f32, top: f32, right: f32, bottom: f32) -> Solid {
        Solid {
            aabb: Aabb::new(left, top, right, bottom),
            one_way: false,
            origin: SolidOrigin::Obstacle { id: ObstacleId(0), key: None },
        }
    }

    fn one_way(left: f32, top: f32, right: f32, bottom: f32) -> Solid {
        Solid { one_way: true, ..solid(left, top, right, bottom) }
    }

    fn ctx(body: &KinematicBody) -> ResolveContext {
        ResolveContext::from_body(body, 5.0)
    }

    #[test]
    fn test_strict_overlap_excludes_touching() {
        let b = KinematicBody::new(Vec2::new(100.0, 100.0), Vec2::splat(32.0));
        assert!(!overlaps(&b, &solid(116.0, 0.0, 200.0, 200.0)));
        assert!(overlaps(&b, &solid(115.9, 0.0, 200.0, 200.0)));
    }

    #[test]
    fn test_wall_push_out_on_x() {
        // Body centered at (100,100) moved right into a wall whose left edge is 148.
        let mut b = KinematicBody::new(Vec2::new(100.0, 100.0), Vec2::splat(32.0));
        b.velocity.x = 200.0;
        b.position.x += 40.0;
        let wall = solid(148.0, 0.0, 180.0, 200.0);
        let c = ctx(&b);
        let ev = resolve_axis(&mut b, &wall, Axis::X, &c).unwrap();
        assert_eq!(ev.side, Side::Right);
        assert_eq!(b.position.x, 132.0);
        assert_eq!(b.right(), 148.0);
        assert_eq!(b.velocity.x, 0.0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut b = KinematicBody::new(Vec2::new(50.0, 45.0), Vec2::new(20.0, 30.0));
        b.velocity = Vec2::new(-30.0, 120.0);
        let floor = [solid(0.0, 50.0, 32.0, 82.0), solid(32.0, 50.0, 64.0, 82.0), solid(64.0, 50.0, 96.0, 82.0)];
        let c = ctx(&b);
        let mut events = Vec::new();
        let n = resolve_all(&mut b, &floor, Axis::Y, &c, &mut events);
        assert_eq!(n, 1);
        assert!(b.grounded);
        assert_eq!(b.bottom(), 50.0);
        for s in &floor {
            assert!(!overlaps(&b, s));
        }
        let before = b.position;
        events.clear();
        assert_eq!(resolve_all(&mut b, &floor, Axis::Y, &c, &mut events), 0);
        assert!(events.is_empty());
        assert_eq!(b.position, before);
    }

    #[test]
    fn test_head_bonk_pushes_down() {
        let mut b = KinematicBody::new(Vec2::new(16.0, 40.0), Vec2::splat(16.0));
        b.velocity.y = -300.0;
        let ceiling = solid(0.0, 0.0, 32.0, 34.0);
        let c = ctx(&b);
        let ev = resolve_axis(&mut b, &ceiling, Axis::Y, &c).unwrap();
        assert_eq!(ev.side, Side::Top);
        assert_eq!(b.top(), 34.0);
        assert_eq!(b.velocity.y, 0.0);
        assert!(!b.grounded);
    }

    #[test]
    fn test_one_way_ignored_on_x_and_when_rising() {
        let platform = one_way(0.0, 100.0, 64.0, 110.0);
        let mut b = KinematicBody::new(Vec2::new(10.0, 104.0), Vec2::splat(16.0));
        let c = ctx(&b);
        assert!(resolve_axis(&mut b, &platform, Axis::X, &c).is_none());

        b.velocity.y = -200.0;
        let c = ResolveContext { prev_bottom: 116.0, drop_through: false, one_way_tolerance: 5.0 };
        assert!(resolve_axis(&mut b, &platform, Axis::Y, &c).is_none());
        assert_eq!(b.velocity.y, -200.0);
    }

    #[test]
    fn test_one_way_lands_from_above_within_tolerance() {
        let platform = one_way(0.0, 100.0, 64.0, 110.0);
        let mut b = KinematicBody::new(Vec2::new(32.0, 95.0), Vec2::splat(16.0));
        b.velocity.y = 250.0;
        let c = ResolveContext { prev_bottom: 99.0, drop_through: false, one_way_tolerance: 5.0 };
        let ev = resolve_axis(&mut b, &platform, Axis::Y, &c).unwrap();
        assert_eq!(ev.side, Side::Bottom);
        assert_eq!(b.bottom(), 100.0);
        assert!(b.grounded);
    }

    #[test]
    fn test_one_way_not_caught_from_deep_below_or_dropping() {
        let platform = one_way(0.0, 100.0, 64.0, 110.0);
        let mut b = KinematicBody::new(Vec2::new(32.0, 105.0), Vec2::splat(16.0));
        b.velocity.y = 50.0;
        let below = ResolveContext { prev_bottom: 111.0, drop_through: false, one_way_tolerance: 5.0 };
        assert!(resolve_axis(&mut b, &platform, Axis::Y, &below).is_none());
        let dropping = ResolveContext { prev_bottom: 100.0, drop_through: true, one_way_tolerance: 5.0 };
        assert!(resolve_axis(&mut b, &platform, Axis::Y, &dropping).is_none());
    }

    #[test]
    fn test_x_then_y_slides_along_floor_seam() {
        // Body resting on a floor made of two tiles, moving right across the seam.
        let floor = [solid(0.0, 100.0, 32.0, 132.0), solid(32.0, 100.0, 64.0, 132.0)];
        let mut b = KinematicBody::new(Vec2::new(24.0, 92.0), Vec2::splat(16.0));
        b.velocity = Vec2::new(120.0, 30.0);
        let dt = 0.1;
        let c = ctx(&b);
        let mut events = Vec::new();
        b.integrate_x(dt);
        resolve_all(&mut b, &floor, Axis::X, &c, &mut events);
        assert!(events.is_empty(), "feet resting on the seam must not block X");
        b.integrate_y(dt);
        resolve_all(&mut b, &floor, Axis::Y, &c, &mut events);
        assert_eq!(b.position.x, 36.0);
        assert_eq!(b.bottom(), 100.0);
        assert!(b.grounded);
        assert!(events.iter().all(|e| e.axis == Axis::Y));
    }

    #[test]
    fn test_push_out_leaves_no_rounding_overlap() {
        // An awkward top and height whose center/edge round trip lands an ulp low.
        let floor = solid(0.0, 1001.6518, 300.0, 1100.0);
        let mut b = KinematicBody::new(Vec2::new(292.0, 990.0), Vec2::new(16.0, 42.42279));
        b.velocity.y = 120.0;
        let c = ctx(&b);
        resolve_axis(&mut b, &floor, Axis::Y, &c).unwrap();
        assert!(b.bottom() <= 1001.6518);
        assert!(!overlaps(&b, &floor));
        assert!(b.grounded);
    }

    #[test]
    fn test_push_out_flush_on_every_side_for_odd_sizes() {
        let mut seed = 12345u32;
        let mut next = || {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            (seed >> 8) as f32 / (1u32 << 24) as f32
        };
        for _ in 0..500 {
            let size = Vec2::new(4.0 + next() * 60.0, 4.0 + next() * 60.0);
            let (x0, y0) = (next() * 4000.0 - 2000.0, next() * 4000.0 - 2000.0);
            let block = solid(x0, y0, x0 + 32.0 + next() * 100.0, y0 + 32.0 + next() * 100.0);
            let s = block.aabb;
            let c = ResolveContext { prev_bottom: f32::MIN, drop_through: false, one_way_tolerance: 5.0 };
            // Sink slightly into each face in turn.
            let d = 0.01 + next() * 2.0;
            let cases = [
                (Axis::X, Vec2::new(s.left - size.x * 0.5 + d, s.center().y)),
                (Axis::X, Vec2::new(s.right + size.x * 0.5 - d, s.center().y)),
                (Axis::Y, Vec2::new(s.center().x, s.top - size.y * 0.5 + d)),
                (Axis::Y, Vec2::new(s.center().x, s.bottom + size.y * 0.5 - d)),
            ];
            for (axis, pos) in cases {
                let mut b = KinematicBody::new(pos, size);
                if !overlaps(&b, &block) {
                    continue;
                }
                resolve_axis(&mut b, &block, axis, &c).unwrap();
                assert!(!overlaps(&b, &block), "{axis:?} size={size:?} block={s:?} pos={:?}", b.position);
            }
        }
    }
}

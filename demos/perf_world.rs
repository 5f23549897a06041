use glam::Vec2;
use boing::*;
use std::time::Instant;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn main() {
    env_logger::init();

    let mut world = match PlatformerWorld::new(WorldConfig {
        cell_size: 64.0,
        max_events: 1_000_000,
        enable_timing: true,
        ..Default::default()
    }) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    // Empty map: everything collides through obstacles.
    let map = match Tilemap::empty(1, 1, 64.0) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let n = 5_000usize; // number of characters
    let mut seed = 1u32;
    let jcfg = world.cfg.jump.clone();
    let mut chars: Vec<Character> = (0..n)
        .map(|i| {
            let x = unit(&mut seed) * 4000.0;
            let y = unit(&mut seed) * 400.0;
            Character::new(Vec2::new(x, y), Vec2::new(16.0, 24.0))
                .with_jump(&jcfg)
                .with_key(i as ColKey)
        })
        .collect();

    let frames = 60;
    let dt = 1.0 / 60.0;
    let t0 = Instant::now();
    let mut n_events = 0;
    for frame in 0..frames {
        world.begin_frame();
        // Long ground strip plus every character as an obstacle for the others.
        world.push_obstacle(Aabb::new(-100.0, 600.0, 4100.0, 664.0), false, None);
        for (i, c) in chars.iter().enumerate() {
            world.push_obstacle(c.body.aabb(), false, Some(i as ColKey));
        }
        world.end_frame();
        for c in chars.iter_mut() {
            let intent = InputIntent {
                axis: (lcg(&mut seed) % 3) as f32 - 1.0,
                jump_pressed: lcg(&mut seed) % 30 == 0,
                jump_held: true,
                ..Default::default()
            };
            world.step(c, &intent, &map, dt);
        }
        n_events += world.drain_events().len();
        if frame == frames - 1 {
            let s = world.debug_stats();
            println!(
                "stats: obstacles={} cells={} tile_cands={} obstacle_cands={} resolved={}",
                s.obstacles, s.cells, s.tile_candidates, s.obstacle_candidates, s.resolved
            );
        }
    }
    let total = t0.elapsed();

    let grounded = chars.iter().filter(|c| c.body.grounded).count();
    if let Some(t) = world.timing() {
        println!(
            "N={} cell_size={} end={:.3}ms step={:.3}ms (broad={:.3}ms resolve={:.3}ms) last frame",
            n, world.cfg.cell_size, t.end_frame_ms, t.step_ms, t.step_broadphase_ms, t.step_resolve_ms
        );
    }
    println!("frames={} total={:?} events={} grounded={}/{}", frames, total, n_events, grounded, n);
}

use glam::Vec2;
use boing::*;
use std::time::Instant;

fn main() {
    env_logger::init();

    // 256x256 map of 16px tiles: solid floor and walls, one-way ledges in a
    // checkerboard-ish pattern.
    let w = 256u32;
    let h = 256u32;
    let mut cells = vec![TILE_EMPTY; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize;
            if y == h - 1 || x == 0 || x == w - 1 {
                cells[i] = TILE_SOLID;
            } else if y % 8 == 0 && (x ^ y) & 0x7 < 3 {
                cells[i] = TILE_ONE_WAY;
            } else if y % 16 == 4 && x % 32 == 0 {
                cells[i] = TILE_SOLID;
            }
        }
    }
    let map = match Tilemap::new(w, h, 16.0, cells) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let mut world = match PlatformerWorld::new(WorldConfig::default()) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    world.begin_frame();
    world.end_frame();

    // Candidate gathering throughput
    let n_queries = 200_000;
    let t0 = Instant::now();
    let mut out = Vec::new();
    let mut acc = 0usize;
    for i in 0..n_queries {
        let x = 16.0 + (i % 4000) as f32;
        let y = 16.0 + ((i * 7) % 4000) as f32;
        out.clear();
        map.candidates(&Aabb::from_center(Vec2::new(x, y), Vec2::new(8.0, 12.0)), None, &mut out);
        acc += out.len();
    }
    let dt = t0.elapsed().as_secs_f64();
    println!("tile_candidates: queries={} secs={:.3} throughput={:.0} q/s checksum={}", n_queries, dt, n_queries as f64 / dt, acc);

    // Step throughput
    let jcfg = world.cfg.jump.clone();
    let mut chars: Vec<Character> = (0..2_000)
        .map(|i| {
            let x = 24.0 + (i * 37 % 4000) as f32;
            let y = 24.0 + (i * 53 % 3900) as f32;
            Character::new(Vec2::new(x, y), Vec2::new(12.0, 14.0)).with_jump(&jcfg)
        })
        .collect();
    let n_ticks = 120;
    let t1 = Instant::now();
    for tick in 0..n_ticks {
        for (i, c) in chars.iter_mut().enumerate() {
            let intent = InputIntent {
                axis: if (tick / 30 + i) % 2 == 0 { 1.0 } else { -1.0 },
                jump_pressed: (tick + i) % 40 == 0,
                jump_held: (tick + i) % 40 < 12,
                down_held: (tick + i) % 97 == 0,
                ..Default::default()
            };
            world.step(c, &intent, &map, 1.0 / 60.0);
        }
        world.drain_events();
    }
    let dt2 = t1.elapsed().as_secs_f64();
    let steps = n_ticks * chars.len();
    let grounded = chars.iter().filter(|c| c.body.grounded).count();
    println!("steps: n={} secs={:.3} throughput={:.0} steps/s grounded={}", steps, dt2, steps as f64 / dt2, grounded);
}

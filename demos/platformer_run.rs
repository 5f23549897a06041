use glam::Vec2;
use boing::*;

const LEVEL: &str = r#"{
    "tile_size": 16.0,
    "rows": [
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,2,2,2,2,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,2,2,2,2,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
        [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,3,3,0,0,1],
        [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1]
    ],
    "properties": { "3": { "solid": true, "damaging": true } }
}"#;

fn main() {
    env_logger::init();

    let map = match Tilemap::from_json_str(LEVEL) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("bad level: {e}");
            return;
        }
    };
    let cfg = WorldConfig {
        jump: JumpConfig { wall_jump: Some(WallJumpConfig::default()), ..Default::default() },
        enable_timing: true,
        ..Default::default()
    };
    let mut world = match PlatformerWorld::new(cfg) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };

    let jcfg = world.cfg.jump.clone();
    let dcfg = world.cfg.dash.clone();
    let mut player = Character::new(Vec2::new(40.0, 120.0), Vec2::new(12.0, 14.0))
        .with_jump(&jcfg)
        .with_dash(&dcfg)
        .with_key(1);

    let dt = 1.0 / 60.0;
    // A one-way crate that slides back and forth, pushed fresh every frame.
    let crate_x = |tick: u32| 200.0 + 60.0 * (tick as f32 * 0.02).sin();
    let ticks = 360u32;
    for tick in 0..ticks {
        let platform_x = crate_x(tick);
        world.begin_frame();
        world.push_obstacle(player.body.aabb(), false, Some(1));
        let crate_id = world.push_obstacle(Aabb::new(platform_x, 120.0, platform_x + 32.0, 128.0), true, Some(2));
        world.end_frame();

        let intent = InputIntent {
            axis: if tick < 200 { 1.0 } else { -1.0 },
            jump_pressed: tick % 45 == 10,
            jump_held: tick % 45 >= 10 && tick % 45 < 25,
            down_held: (300..310).contains(&tick),
            dash_pressed: tick == 150,
        };
        let report = world.step(&mut player, &intent, &map, dt);

        if let Some(kind) = report.jump {
            println!("t={tick:3} jump {kind:?} remaining={:?}", player.jumps_remaining());
        }
        if report.landed {
            println!("t={tick:3} landed at ({:.1},{:.1})", player.body.position.x, player.body.position.y);
        }
        if report.dashed {
            println!("t={tick:3} dash");
        }
        if !report.hazards.is_empty() {
            println!("t={tick:3} hazard tiles {:?}", report.hazards);
        }
        for (_, ev) in world.drain_events() {
            if let SolidOrigin::Obstacle { id, .. } = ev.solid.origin {
                if id == crate_id {
                    println!("t={tick:3} riding crate ({:?} depth={:.2})", ev.side, ev.depth);
                }
            }
        }
    }

    let b = player.body;
    println!(
        "final pos=({:.1},{:.1}) vel=({:.1},{:.1}) grounded={} crate_x={:.1}",
        b.position.x, b.position.y, b.velocity.x, b.velocity.y, b.grounded, crate_x(ticks - 1)
    );
    if let Some(t) = world.timing() {
        println!(
            "timing: end_frame={:.3}ms step={:.3}ms (broad={:.3}ms resolve={:.3}ms) steps={} events={}",
            t.end_frame_ms, t.step_ms, t.step_broadphase_ms, t.step_resolve_ms, t.steps, t.events_emitted
        );
    }
}

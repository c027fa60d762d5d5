//! Headless симуляция Ashfall
//!
//! Игрок (скриптованный input) против пяти базовых врагов.
//! Usage: ashfall_simulation [config.ron]

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use ashfall_simulation::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

const SEED: u64 = 42;
const TICKS: usize = 1200;
const ARENA_CENTER: Vec2 = Vec2::new(960.0, 540.0);

fn main() -> ExitCode {
    let mut app = create_headless_app(SEED);

    if let Some(path) = std::env::args().nth(1) {
        match SimulationConfig::load(Path::new(&path)) {
            Ok(config) => {
                log_info(&format!("Loaded tuning from {}", path));
                app.insert_resource(config);
            }
            Err(err) => {
                log_error(&format!("{}", err));
                return ExitCode::FAILURE;
            }
        }
    }

    // Каждый update = ровно один fixed тик
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .add_plugins(SimulationPlugin);

    log_info(&format!("Starting Ashfall headless simulation (seed: {})", SEED));

    let player = spawn_player(app.world_mut(), ARENA_CENTER);
    for i in 0..5 {
        let position = ARENA_CENTER + Vec2::new((i as f32 - 2.0) * 200.0, 300.0);
        spawn_enemy(app.world_mut(), position, Some(player));
    }

    for tick in 0..TICKS {
        drive_player(app.world_mut(), player, tick);
        app.update();

        if tick % 100 == 0 {
            report(app.world_mut(), player, tick);
        }

        let Some(agent) = app.world().get::<PlayerAgent>(player) else {
            break;
        };
        if !agent.actor.active {
            log_info(&format!("Tick {}: player is gone, stopping", tick));
            break;
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}

/// Скриптованный input: идём к ближайшему врагу, бьём в упор,
/// периодически уворачиваемся в сторону
fn drive_player(world: &mut World, player: Entity, tick: usize) {
    let Some(agent) = world.get::<PlayerAgent>(player) else {
        return;
    };
    let position = agent.actor.position;

    let mut enemies = world.query::<&EnemyAgent>();
    let nearest = enemies
        .iter(world)
        .filter(|enemy| enemy.is_active() && !enemy.is_dead())
        .map(|enemy| enemy.position())
        .min_by(|a, b| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        });

    let Some(mut input) = world.get_mut::<PlayerInput>(player) else {
        return;
    };

    let Some(target) = nearest else {
        input.movement = Vec2::ZERO;
        return;
    };

    let to_target = target - position;
    input.aim_position = target;
    input.movement = if to_target.length() > 50.0 {
        to_target.normalize_or_zero()
    } else {
        Vec2::ZERO
    };
    input.attack_pressed = to_target.length() < 90.0;
    input.dodge_pressed = tick % 90 == 45;
    if input.dodge_pressed {
        input.movement = to_target.perp().normalize_or_zero();
    }
}

fn report(world: &mut World, player: Entity, tick: usize) {
    let mut enemies = world.query::<&EnemyAgent>();
    let alive = enemies.iter(world).filter(|e| e.is_active()).count();

    if let Some(agent) = world.get::<PlayerAgent>(player) {
        log_info(&format!(
            "Tick {}: player hp {:.0}/{:.0} at ({:.0}, {:.0}), enemies alive {}, shake {:.2}, numbers {}, particles {}",
            tick,
            agent.health.current,
            agent.health.max,
            agent.actor.position.x,
            agent.actor.position.y,
            alive,
            agent.feedback.shake_amount(),
            agent.feedback.damage_numbers.len(),
            agent.feedback.particles.len(),
        ));
    }
}

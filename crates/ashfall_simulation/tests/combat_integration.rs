//! Combat integration test
//!
//! Полный SimulationPlugin headless: игрок против базовых врагов.
//!
//! Проверяем:
//! - Enemy FSM догоняет и бьёт игрока через EnemyStrike → PlayerHit
//! - Swing игрока убивает врага, труп деспавнится
//! - Health инварианты (0 ≤ hp ≤ max) на каждом тике
//! - Death sequence игрока не мгновенная

use std::time::Duration;

use ashfall_simulation::*;
use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

/// Helper: полный App, один update = один fixed тик (1/60s)
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .add_plugins(SimulationPlugin);

    // Первый update только инициализирует Time (delta = 0, fixed тика нет)
    app.update();
    app
}

fn player_agent(app: &App, player: Entity) -> &PlayerAgent {
    app.world()
        .get::<PlayerAgent>(player)
        .expect("player entity exists")
}

fn set_input(app: &mut App, player: Entity, input: PlayerInput) {
    *app.world_mut()
        .get_mut::<PlayerInput>(player)
        .expect("player has input") = input;
}

fn check_invariants(app: &mut App, tick: usize) {
    let world = app.world_mut();

    let mut players = world.query::<&PlayerAgent>();
    for player in players.iter(world) {
        assert!(
            player.health.current >= 0.0 && player.health.current <= player.health.max,
            "tick {}: player hp out of range: {:?}",
            tick,
            player.health
        );
    }

    let mut enemies = world.query::<&EnemyAgent>();
    for enemy in enemies.iter(world) {
        assert!(
            enemy.health.current >= 0.0 && enemy.health.current <= enemy.health.max,
            "tick {}: enemy hp out of range: {:?}",
            tick,
            enemy.health
        );
        if enemy.health.current == 0.0 {
            assert_eq!(enemy.state, EnemyState::Dead, "tick {}", tick);
        }
    }
}

/// Test: враг подходит и бьёт стоящего игрока, игрок в итоге умирает
#[test]
fn test_enemy_chases_and_kills_idle_player() {
    let mut app = create_combat_app(42);

    let player = spawn_player(app.world_mut(), Vec2::ZERO);
    let enemy = spawn_enemy(app.world_mut(), Vec2::new(300.0, 0.0), Some(player));

    let mut cursor = EventCursor::<PlayerHit>::default();
    let mut hits = Vec::new();
    let mut first_chase_tick = None;
    let mut death_tick = None;
    let mut inactive_tick = None;

    for tick in 0..1200 {
        app.update();
        check_invariants(&mut app, tick);

        hits.extend(
            cursor
                .read(app.world().resource::<Events<PlayerHit>>())
                .cloned(),
        );

        if first_chase_tick.is_none() {
            if let Some(agent) = app.world().get::<EnemyAgent>(enemy) {
                if agent.state == EnemyState::Chase {
                    first_chase_tick = Some(tick);
                }
            }
        }

        let agent = player_agent(&app, player);
        if death_tick.is_none() && agent.is_dying() {
            death_tick = Some(tick);
        }
        if !agent.actor.active {
            inactive_tick = Some(tick);
            break;
        }
    }

    assert!(
        first_chase_tick.is_some_and(|tick| tick <= 1),
        "enemy aggroes within detection range"
    );

    // 100 hp / 10 dmg = 10 ударов
    let applied: Vec<_> = hits.iter().filter(|h| h.outcome.health_lost()).collect();
    assert_eq!(applied.len(), 10);
    assert!(applied.iter().all(|h| h.attacker == enemy && h.damage == 10.0));

    let death_tick = death_tick.expect("player entered death sequence");
    let inactive_tick = inactive_tick.expect("player became inactive");
    // 1.5s death sequence = ~90 тиков
    assert!(
        inactive_tick - death_tick >= 89,
        "death sequence too short: {} → {}",
        death_tick,
        inactive_tick
    );

    // Мёртвый игрок: не цель
    let agent = app.world().get::<EnemyAgent>(enemy).expect("enemy alive");
    assert_eq!(agent.state, EnemyState::Idle);
}

/// Test: игрок разрубает врага, труп слетает и деспавнится
#[test]
fn test_player_kills_enemy_and_corpse_despawns() {
    let mut app = create_combat_app(7);

    let player = spawn_player(app.world_mut(), Vec2::ZERO);
    if let Some(mut agent) = app.world_mut().get_mut::<PlayerAgent>(player) {
        agent.weapon = Weapon {
            damage: 60.0,
            critical_chance: 0.0,
            ..Weapon::basic_sword()
        };
    }
    let enemy = spawn_enemy(app.world_mut(), Vec2::new(50.0, 0.0), Some(player));

    set_input(
        &mut app,
        player,
        PlayerInput {
            attack_pressed: true,
            aim_position: Vec2::new(50.0, 0.0),
            ..Default::default()
        },
    );
    app.update();

    let died = app.world().resource::<Events<EnemyDied>>();
    let mut cursor = died.get_cursor();
    let events: Vec<_> = cursor.read(died).cloned().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity, enemy);
    assert_eq!(events[0].killer, Some(player));

    // Hit-pause + shake + feedback pools на игроке
    let agent = player_agent(&app, player);
    assert!(agent.feedback.is_hit_paused());
    assert!(agent.feedback.shake_amount() > 0.0);
    assert_eq!(agent.feedback.damage_numbers.len(), 1);
    assert!(!agent.feedback.particles.is_empty());

    let corpse = app.world().get::<EnemyAgent>(enemy).expect("corpse still present");
    assert_eq!(corpse.state, EnemyState::Dead);
    let launch_start = corpse.actor.position;

    let mut despawned_at = None;
    for tick in 0..60 {
        app.update();
        if app.world().get_entity(enemy).is_err() {
            despawned_at = Some(tick);
            break;
        }
        let corpse = app.world().get::<EnemyAgent>(enemy).expect("corpse");
        assert!(corpse.actor.position.x >= launch_start.x);
    }

    assert!(despawned_at.is_some(), "dead enemy was never despawned");
}

/// Test: perfect dodge через полный pipeline EnemyStrike
#[test]
fn test_perfect_dodge_through_enemy_strike() {
    let mut app = create_combat_app(3);

    let player = spawn_player(app.world_mut(), Vec2::ZERO);
    let enemy = spawn_enemy(app.world_mut(), Vec2::new(500.0, 0.0), None);

    set_input(
        &mut app,
        player,
        PlayerInput {
            dodge_pressed: true,
            movement: Vec2::Y,
            ..Default::default()
        },
    );
    app.update();
    assert!(player_agent(&app, player).is_dodging());

    // elapsed 0.2s
    for _ in 0..12 {
        app.update();
    }

    app.world_mut().send_event(EnemyStrike {
        attacker: enemy,
        target: player,
        damage: 25.0,
        origin: Vec2::new(500.0, 0.0),
    });
    app.update();

    let events = app.world().resource::<Events<PlayerHit>>();
    let mut cursor = events.get_cursor();
    let outcomes: Vec<_> = cursor.read(events).map(|h| h.outcome).collect();
    assert_eq!(outcomes, vec![DamageOutcome::PerfectDodge]);

    let agent = player_agent(&app, player);
    assert!(agent.is_perfect_dodge_active());
    assert_eq!(agent.health.current, 100.0);

    // Slow-mo: остаток dodge тикает ×0.3, глобальный clock не замедлен
    app.update();
    let agent = player_agent(&app, player);
    assert!(agent.is_dodging());
    assert_eq!(agent.actor.tint, VisualHint::PerfectDodge);
    let clock = app.world().resource::<SimulationClock>();
    assert!(!clock.is_dilated());
}

/// Test: 1000 тиков скриптованного боя без паники и с инвариантами
#[test]
fn test_scripted_brawl_1000_ticks() {
    let mut app = create_combat_app(123);

    let player = spawn_player(app.world_mut(), Vec2::ZERO);
    for i in 0..5 {
        spawn_enemy(
            app.world_mut(),
            Vec2::new((i as f32 - 2.0) * 120.0, 250.0),
            Some(player),
        );
    }

    for tick in 0..1000 {
        set_input(
            &mut app,
            player,
            PlayerInput {
                movement: Vec2::ZERO,
                attack_pressed: tick % 10 == 0,
                dodge_pressed: tick % 120 == 60,
                aim_position: Vec2::new(0.0, 250.0),
            },
        );
        app.update();

        if tick % 50 == 0 {
            check_invariants(&mut app, tick);
        }
    }

    log("✓ Combat integration: 1000 ticks completed without crash");
}

/// Test: fixed timestep 60Hz задаёт SimulationPlugin
#[test]
fn test_plugin_sets_fixed_timestep() {
    let app = create_combat_app(1);

    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    assert_eq!(timestep, Duration::from_secs_f64(1.0 / 60.0));
}

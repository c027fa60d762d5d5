//! Tests for AI target systems.

#[cfg(test)]
mod tests {
    use super::super::fsm::*;
    use crate::ai::{EnemyAgent, EnemyState};
    use crate::clock::SimulationClock;
    use crate::combat::EnemyStrike;
    use crate::config::SimulationConfig;
    use crate::player::PlayerAgent;
    use bevy::prelude::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(SimulationClock::new(1.0 / 60.0))
            .add_event::<EnemyStrike>()
            .add_systems(Update, (assign_enemy_targets, tick_enemies).chain());
        app
    }

    fn spawn_player(app: &mut App, config: &SimulationConfig, position: Vec2) -> Entity {
        app.world_mut()
            .spawn(PlayerAgent::new(position, &config.player, &config.feedback))
            .id()
    }

    fn spawn_enemy(app: &mut App, config: &SimulationConfig, target: Option<Entity>) -> Entity {
        let mut enemy = EnemyAgent::basic(Vec2::ZERO, config);
        enemy.target = target;
        app.world_mut().spawn(enemy).id()
    }

    fn enemy(app: &App, entity: Entity) -> &EnemyAgent {
        app.world().get::<EnemyAgent>(entity).expect("enemy exists")
    }

    #[test]
    fn test_despawned_target_drops_to_idle() {
        let config = SimulationConfig::default();
        let mut app = test_app();

        let player = spawn_player(&mut app, &config, Vec2::new(200.0, 0.0));
        let chaser = spawn_enemy(&mut app, &config, Some(player));

        app.update();
        assert_eq!(enemy(&app, chaser).state, EnemyState::Chase);

        app.world_mut().despawn(player);
        for _ in 0..3 {
            app.update();
        }

        let agent = enemy(&app, chaser);
        assert_eq!(agent.target, None);
        assert_eq!(agent.state, EnemyState::Idle);
        assert_eq!(agent.actor.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_stale_target_retargets_nearest_live_player() {
        let config = SimulationConfig::default();
        let mut app = test_app();

        let gone = spawn_player(&mut app, &config, Vec2::new(50.0, 0.0));
        let chaser = spawn_enemy(&mut app, &config, Some(gone));
        app.world_mut().despawn(gone);

        // Ближайший игрок умирает, дальний жив
        let mut dying = PlayerAgent::new(Vec2::new(30.0, 0.0), &config.player, &config.feedback);
        dying.take_damage(1000.0, Vec2::ZERO);
        assert!(dying.is_dying());
        let dying = app.world_mut().spawn(dying).id();
        let live = spawn_player(&mut app, &config, Vec2::new(0.0, 300.0));

        app.update();

        let agent = enemy(&app, chaser);
        assert_ne!(agent.target, Some(dying));
        assert_eq!(agent.target, Some(live));
        assert_eq!(agent.state, EnemyState::Chase);
    }

    #[test]
    fn test_untargeted_enemy_stays_idle() {
        let config = SimulationConfig::default();
        let mut app = test_app();

        spawn_player(&mut app, &config, Vec2::new(100.0, 0.0));
        let idle = spawn_enemy(&mut app, &config, None);

        for _ in 0..3 {
            app.update();
        }

        let agent = enemy(&app, idle);
        assert_eq!(agent.target, None);
        assert_eq!(agent.state, EnemyState::Idle);
        assert_eq!(agent.actor.position, Vec2::ZERO);
        assert!(app.world().resource::<Events<EnemyStrike>>().is_empty());
    }
}

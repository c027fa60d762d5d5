//! Combat module
//!
//! Value types (без ECS):
//! - weapon: статы оружия, пресеты
//! - combo: таблицы шагов + ComboResolver
//! - attack: AttackInstance (конус, lifetime, hit-once)
//! - feedback: hit-pause, shake, damage numbers, particles
//!
//! ECS слой:
//! - events: EnemyStrike, EnemyHit, PlayerHit, EnemyDied, PlayerDied
//! - systems: overlap loop swing → враги, удары врагов → игрок, cleanup

use bevy::prelude::*;

pub mod attack;
pub mod combo;
pub mod events;
pub mod feedback;
pub mod systems;
pub mod weapon;

// Re-export основных типов
pub use attack::{swing_lifetime, wrap_angle, AttackInstance};
pub use combo::{combo_steps, ComboResolver, ComboStep};
pub use events::{EnemyDied, EnemyHit, EnemyStrike, PlayerDied, PlayerHit};
pub use feedback::{CombatFeedback, DamageNumber, HitParticle};
pub use weapon::{Weapon, WeaponClass};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (после Player и AI тиков):
/// 1. resolve_player_attack_hits: swing игрока → урон врагам + feedback
/// 2. apply_enemy_strikes: EnemyStrike → PlayerAgent::take_damage
/// 3. despawn_inactive_enemies: удаление неактивных врагов (Cleanup)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyStrike>()
            .add_event::<EnemyHit>()
            .add_event::<PlayerHit>()
            .add_event::<EnemyDied>()
            .add_event::<PlayerDied>();

        app.add_systems(
            FixedUpdate,
            (
                systems::resolve_player_attack_hits,
                systems::apply_enemy_strikes,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );

        app.add_systems(
            FixedUpdate,
            systems::despawn_inactive_enemies.in_set(SimulationSet::Cleanup),
        );
    }
}

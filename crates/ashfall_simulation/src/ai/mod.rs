//! AI decision-making module
//!
//! Simple FSM для врагов: Idle / Chase / Attack / Hurt / Dead.
//! Hit-stun и knockback приходят из combat (EnemyAgent::take_damage).

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{
    EnemyAgent, EnemyArchetype, EnemyState, StrikeIntent, TargetSnapshot,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. assign_enemy_targets: валидация / назначение target handle
/// 2. tick_enemies: FSM transitions + behavior, генерация EnemyStrike
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (systems::assign_enemy_targets, systems::tick_enemies)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Ai),
        );
    }
}

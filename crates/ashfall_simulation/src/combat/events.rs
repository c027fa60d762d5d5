//! Combat events (для аудио, UI, статистики)

use bevy::prelude::*;

use crate::player::DamageOutcome;

/// Враг решил ударить цель (генерируется AI тиком)
#[derive(Event, Debug, Clone)]
pub struct EnemyStrike {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    /// Позиция врага в момент удара
    pub origin: Vec2,
}

/// Swing игрока попал по врагу
#[derive(Event, Debug, Clone)]
pub struct EnemyHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub is_critical: bool,
    pub combo_index: usize,
    pub target_died: bool,
}

/// Результат EnemyStrike по игроку
#[derive(Event, Debug, Clone)]
pub struct PlayerHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub outcome: DamageOutcome,
}

#[derive(Event, Debug, Clone)]
pub struct EnemyDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Игрок получил смертельный удар (death sequence только началась)
#[derive(Event, Debug, Clone)]
pub struct PlayerDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

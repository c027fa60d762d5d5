//! Player input intent (заполняется внешним input слоем)

use bevy::prelude::*;

/// Входные данные игрока на один тик
///
/// - `movement`: уже нормализован/обрезан до длины 1 внешним слоем
/// - `dodge_pressed` / `attack_pressed`: edge-triggered, сбрасываются после тика
/// - `aim_position`: world-space точка прицела (направление атаки)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    pub movement: Vec2,
    pub dodge_pressed: bool,
    pub attack_pressed: bool,
    pub aim_position: Vec2,
}

impl PlayerInput {
    /// Сбросить edge-triggered кнопки (movement/aim остаются held)
    pub fn consume_edges(&mut self) {
        self.dodge_pressed = false;
        self.attack_pressed = false;
    }
}

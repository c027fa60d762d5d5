//! Weapon descriptor (value type, без cooldown state)
//!
//! Cooldown живёт в PlayerAgent, здесь только базовые статы оружия.
//! Эффективные значения удара = base × ComboStep multipliers (см. AttackInstance).

use bevy::prelude::*;
use serde::Deserialize;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

/// Класс оружия: ключ таблицы комбо
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Reflect)]
pub enum WeaponClass {
    Sword,
    Axe,
    Hammer,
    Dagger,
    /// Без таблицы комбо: всегда neutral step
    Staff,
}

/// Статы оружия
#[derive(Debug, Clone, PartialEq, Deserialize, Reflect)]
pub struct Weapon {
    pub name: String,
    pub class: WeaponClass,
    /// Базовый урон за удар
    pub damage: f32,
    /// Ударов в секунду (swing lifetime = 1 / attack_speed)
    pub attack_speed: f32,
    /// Радиус конуса удара
    pub range: f32,
    pub knockback_force: f32,
    /// Вес (для UI / будущих модификаторов)
    pub weight: f32,
    /// Вероятность крита [0, 1]
    pub critical_chance: f32,
    pub critical_multiplier: f32,
    /// Полный угол конуса (радианы)
    pub swing_angle: f32,
    /// Hit-stun цели (секунды)
    pub hit_stun: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::basic_sword()
    }
}

impl Weapon {
    /// Стартовый меч игрока
    pub fn basic_sword() -> Self {
        Self {
            name: "Basic Sword".to_string(),
            class: WeaponClass::Sword,
            damage: 20.0,
            attack_speed: 2.0,
            range: 80.0,
            knockback_force: 150.0,
            weight: 1.0,
            critical_chance: 0.1,
            critical_multiplier: 2.0,
            swing_angle: FRAC_PI_2,
            hit_stun: 0.2,
        }
    }

    pub fn war_axe() -> Self {
        Self {
            name: "War Axe".to_string(),
            class: WeaponClass::Axe,
            damage: 28.0,
            attack_speed: 1.4,
            range: 85.0,
            knockback_force: 200.0,
            weight: 2.0,
            critical_chance: 0.15,
            critical_multiplier: 1.8,
            swing_angle: FRAC_PI_2,
            hit_stun: 0.3,
        }
    }

    pub fn great_hammer() -> Self {
        Self {
            name: "Great Hammer".to_string(),
            class: WeaponClass::Hammer,
            damage: 40.0,
            attack_speed: 0.9,
            range: 90.0,
            knockback_force: 300.0,
            weight: 3.5,
            critical_chance: 0.05,
            critical_multiplier: 2.5,
            swing_angle: FRAC_PI_3 * 2.0,
            hit_stun: 0.45,
        }
    }

    pub fn twin_daggers() -> Self {
        Self {
            name: "Twin Daggers".to_string(),
            class: WeaponClass::Dagger,
            damage: 12.0,
            attack_speed: 3.0,
            range: 55.0,
            knockback_force: 80.0,
            weight: 0.5,
            critical_chance: 0.25,
            critical_multiplier: 2.0,
            swing_angle: FRAC_PI_3,
            hit_stun: 0.1,
        }
    }

    pub fn oak_staff() -> Self {
        Self {
            name: "Oak Staff".to_string(),
            class: WeaponClass::Staff,
            damage: 15.0,
            attack_speed: 1.5,
            range: 100.0,
            knockback_force: 120.0,
            weight: 1.5,
            critical_chance: 0.05,
            critical_multiplier: 1.5,
            swing_angle: FRAC_PI_2,
            hit_stun: 0.2,
        }
    }

    /// Базовая длительность swing (секунды), без combo multiplier
    pub fn swing_duration(&self) -> f32 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            0.0
        }
    }
}

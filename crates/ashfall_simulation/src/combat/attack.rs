//! AttackInstance: один swing оружия в полёте
//!
//! Конус удара (range + swing angle), привязан к владельцу каждый тик.
//! Hit-once: orchestrator проверяет `has_hit` перед уроном и вызывает `register_hit`.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::combo::ComboStep;
use super::weapon::Weapon;

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct AttackInstance {
    /// Центр конуса (= позиция владельца)
    pub position: Vec2,
    /// Направление центра конуса (радианы)
    pub direction: f32,
    /// Полный угол конуса (радианы)
    pub swing_angle: f32,
    pub range: f32,
    pub damage: f32,
    pub knockback_force: f32,
    pub hit_stun: f32,
    pub is_critical: bool,
    /// Индекс шага комбо этого swing
    pub combo_index: usize,
    /// Полная длительность swing
    pub duration: f32,
    /// Сколько осталось
    pub remaining: f32,
    active: bool,
    /// Цели уже получившие урон от этой активации
    hit_targets: Vec<Entity>,
}

impl AttackInstance {
    /// Начать swing.
    ///
    /// range/damage/knockback = weapon × step multipliers,
    /// crit ролл с `weapon.critical_chance` умножает урон на `critical_multiplier`.
    pub fn start(
        &mut self,
        origin: Vec2,
        direction: f32,
        weapon: &Weapon,
        step: &ComboStep,
        rng: &mut impl Rng,
    ) {
        self.position = origin;
        self.direction = direction;
        self.swing_angle = weapon.swing_angle;
        self.range = weapon.range * step.range_multiplier;
        self.damage = weapon.damage * step.damage_multiplier;
        self.knockback_force = weapon.knockback_force * step.knockback_multiplier;
        self.hit_stun = weapon.hit_stun;
        self.combo_index = step.index;

        self.is_critical = rng.gen::<f32>() < weapon.critical_chance;
        if self.is_critical {
            self.damage *= weapon.critical_multiplier;
        }

        self.duration = swing_lifetime(weapon, step);
        self.remaining = self.duration;
        self.active = self.duration > 0.0;
        self.hit_targets.clear();
    }

    /// Hitbox следует за владельцем, lifetime уменьшается
    pub fn update(&mut self, delta: f32, owner_position: Vec2) {
        if !self.active {
            return;
        }

        self.position = owner_position;
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Прогресс swing [0, 1] (для анимации дуги)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.remaining / self.duration
        }
    }

    /// Цель внутри конуса удара?
    ///
    /// active && distance ≤ range && |wrap(bearing − direction)| ≤ swing_angle / 2.
    /// Цель ровно в центре конуса считается попавшей.
    pub fn is_in_hit_area(&self, target_position: Vec2) -> bool {
        if !self.active {
            return false;
        }

        let to_target = target_position - self.position;
        let distance = to_target.length();
        if distance > self.range {
            return false;
        }
        if distance <= f32::EPSILON {
            return true;
        }

        let bearing = to_target.y.atan2(to_target.x);
        wrap_angle(bearing - self.direction).abs() <= self.swing_angle / 2.0
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_targets.contains(&target)
    }

    /// Записать попадание. false если цель уже была задета этой активацией.
    pub fn register_hit(&mut self, target: Entity) -> bool {
        if self.has_hit(target) {
            return false;
        }
        self.hit_targets.push(target);
        true
    }

    pub fn hit_count(&self) -> usize {
        self.hit_targets.len()
    }
}

/// Длительность swing = (1 / attack_speed) / speed_multiplier
pub fn swing_lifetime(weapon: &Weapon, step: &ComboStep) -> f32 {
    if step.speed_multiplier <= 0.0 {
        return weapon.swing_duration();
    }
    weapon.swing_duration() / step.speed_multiplier
}

/// Угол в [-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

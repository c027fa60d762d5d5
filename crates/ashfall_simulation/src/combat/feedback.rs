//! Combat feedback: hit-pause, screen shake, damage numbers, hit particles
//!
//! Всё здесь косметика или тайминг: рендер/камера читают state read-only.
//! Пулы unordered: удаление истёкших через swap_remove, порядок не важен.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_3;

use crate::clock::decay_factor;
use super::combo::ComboResolver;

pub const DAMAGE_NUMBER_LIFETIME: f32 = 1.0;
/// Смещение над точкой попадания (y вниз → вверх = минус)
pub const DAMAGE_NUMBER_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, -20.0);
pub const DAMAGE_NUMBER_DRIFT: Vec2 = Vec2::new(0.0, -30.0);

pub const PARTICLE_LIFETIME: f32 = 0.5;
/// Затухание скорости частицы за тик (60Hz)
pub const PARTICLE_DAMPING: f32 = 0.95;
pub const PARTICLE_MIN_SPEED: f32 = 100.0;
pub const PARTICLE_SPEED_SPREAD: f32 = 200.0;

const GOLD: [u8; 3] = [255, 215, 0];
const WHITE: [u8; 3] = [255, 255, 255];
const YELLOW: [u8; 3] = [255, 255, 0];

/// Всплывающее число урона
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct DamageNumber {
    pub position: Vec2,
    pub value: f32,
    pub is_critical: bool,
    pub age: f32,
    pub duration: f32,
}

impl DamageNumber {
    pub fn new(position: Vec2, value: f32, is_critical: bool) -> Self {
        Self {
            position: position + DAMAGE_NUMBER_SPAWN_OFFSET,
            value,
            is_critical,
            age: 0.0,
            duration: DAMAGE_NUMBER_LIFETIME,
        }
    }

    fn update(&mut self, delta: f32) {
        self.age += delta;
        self.position += DAMAGE_NUMBER_DRIFT * delta;
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.duration
    }

    fn remaining_fraction(&self) -> f32 {
        (1.0 - self.age / self.duration).clamp(0.0, 1.0)
    }

    /// Alpha линейно гаснет с остатком жизни
    pub fn alpha(&self) -> f32 {
        self.remaining_fraction()
    }

    /// Крит: 1.5 → 2.0, обычный: 1.0 → 1.3
    pub fn scale(&self) -> f32 {
        let progress = 1.0 - self.remaining_fraction();
        if self.is_critical {
            1.5 + progress * 0.5
        } else {
            1.0 + progress * 0.3
        }
    }

    /// RGBA: крит золотой, обычный белый
    pub fn color(&self) -> [u8; 4] {
        let [r, g, b] = if self.is_critical { GOLD } else { WHITE };
        [r, g, b, (255.0 * self.alpha()) as u8]
    }
}

/// Искра от попадания
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct HitParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub age: f32,
    pub duration: f32,
}

impl HitParticle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
            duration: PARTICLE_LIFETIME,
        }
    }

    fn update(&mut self, delta: f32) {
        self.age += delta;
        self.position += self.velocity * delta;
        self.velocity *= decay_factor(PARTICLE_DAMPING, delta);
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.duration
    }

    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.duration).clamp(0.0, 1.0)
    }

    pub fn color(&self) -> [u8; 4] {
        let [r, g, b] = YELLOW;
        [r, g, b, (255.0 * self.alpha()) as u8]
    }
}

/// Feedback state игрока (один экземпляр на игрока)
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct CombatFeedback {
    pub combo: ComboResolver,
    hit_pause_timer: f32,
    shake_amount: f32,
    shake_duration: f32,
    shake_timer: f32,
    pub damage_numbers: Vec<DamageNumber>,
    pub particles: Vec<HitParticle>,
}

impl CombatFeedback {
    /// Глобальный slow-motion на `duration` секунд
    pub fn trigger_hit_pause(&mut self, duration: f32) {
        self.hit_pause_timer = duration.max(0.0);
    }

    pub fn is_hit_paused(&self) -> bool {
        self.hit_pause_timer > 0.0
    }

    /// Амплитуда линейно падает от `amount` до 0 за `duration`
    pub fn trigger_screen_shake(&mut self, amount: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.shake_amount = amount.max(0.0);
        self.shake_duration = duration;
        self.shake_timer = duration;
    }

    /// Текущая амплитуда тряски (камера сама генерирует random offset)
    pub fn shake_amount(&self) -> f32 {
        if self.shake_timer <= 0.0 || self.shake_duration <= 0.0 {
            return 0.0;
        }
        self.shake_amount * (self.shake_timer / self.shake_duration)
    }

    pub fn spawn_damage_number(&mut self, position: Vec2, value: f32, is_critical: bool) {
        self.damage_numbers
            .push(DamageNumber::new(position, value, is_critical));
    }

    /// `count` частиц в конусе ±π/6 вокруг `direction`, скорость 100..300
    pub fn spawn_hit_particles(
        &mut self,
        position: Vec2,
        direction: Vec2,
        count: usize,
        rng: &mut impl Rng,
    ) {
        let base_angle = direction.y.atan2(direction.x);
        for _ in 0..count {
            let angle = base_angle + (rng.gen::<f32>() - 0.5) * FRAC_PI_3;
            let speed = PARTICLE_MIN_SPEED + rng.gen::<f32>() * PARTICLE_SPEED_SPREAD;
            self.particles
                .push(HitParticle::new(position, Vec2::from_angle(angle) * speed));
        }
    }

    pub fn reset_combo(&mut self) {
        self.combo.reset();
    }

    /// Продвинуть все таймеры и пулы (real dt, без dilation)
    pub fn update(&mut self, delta: f32) {
        self.combo.tick(delta);

        if self.hit_pause_timer > 0.0 {
            self.hit_pause_timer = (self.hit_pause_timer - delta).max(0.0);
        }

        if self.shake_timer > 0.0 {
            self.shake_timer = (self.shake_timer - delta).max(0.0);
        }

        let mut i = 0;
        while i < self.damage_numbers.len() {
            self.damage_numbers[i].update(delta);
            if self.damage_numbers[i].is_expired() {
                self.damage_numbers.swap_remove(i);
            } else {
                i += 1;
            }
        }

        let mut i = 0;
        while i < self.particles.len() {
            self.particles[i].update(delta);
            if self.particles[i].is_expired() {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

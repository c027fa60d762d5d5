//! Enemy FSM component (EnemyAgent)
//!
//! Приоритет на тике:
//! 1. Hit-stun замораживает переходы, скорость = затухающий knockback
//! 2. Иначе transitions → behavior
//!
//! Target хранится как Entity handle и резолвится системой каждый тик
//! (`TargetSnapshot`), агент никогда не предполагает что цель жива.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::clock::{decay_factor, SimulationClock};
use crate::components::{Actor, ActorView, Health, VisualHint};
use crate::config::{EnemyArchetypeConfig, SimulationConfig};

/// Длительность knockback импульса (секунды)
pub const KNOCKBACK_DURATION: f32 = 0.3;
/// Затухание knockback за тик (60Hz)
pub const KNOCKBACK_DAMPING: f32 = 0.9;
/// Множитель knockback на смертельном ударе
pub const DEATH_LAUNCH_MULTIPLIER: f32 = 2.0;
/// Chase → Idle только дальше detection_range × 1.5
pub const DEAGGRO_FACTOR: f32 = 1.5;
/// Attack → Chase только дальше attack_range × 1.2
pub const REENGAGE_FACTOR: f32 = 1.2;

/// AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EnemyState {
    #[default]
    Idle,
    /// Зарезервирован (базовый архетип не патрулирует)
    Patrol,
    Chase,
    Attack,
    Hurt,
    /// Терминальный
    Dead,
}

/// Архетип врага → набор tuning параметров
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EnemyArchetype {
    #[default]
    Basic,
}

impl EnemyArchetype {
    pub fn tuning<'a>(&self, config: &'a SimulationConfig) -> &'a EnemyArchetypeConfig {
        match self {
            EnemyArchetype::Basic => &config.enemy,
        }
    }
}

/// Резолвнутая живая цель на этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub position: Vec2,
}

/// Запрос на удар по цели (orchestrator превращает в EnemyStrike event)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeIntent {
    pub damage: f32,
    pub origin: Vec2,
}

/// Враг (fat component: тело + здоровье + FSM)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyAgent {
    pub actor: Actor,
    pub health: Health,
    pub state: EnemyState,
    pub archetype: EnemyArchetype,
    /// Handle цели (может указывать на despawned/мёртвую entity)
    pub target: Option<Entity>,

    pub move_speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub detection_range: f32,
    pub attack_cooldown: f32,

    pub attack_timer: f32,
    pub hit_stun_timer: f32,
    pub knockback_timer: f32,
    pub knockback_velocity: Vec2,
}

impl ActorView for EnemyAgent {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn health(&self) -> &Health {
        &self.health
    }
}

impl EnemyAgent {
    pub fn new(position: Vec2, archetype: EnemyArchetype, tuning: &EnemyArchetypeConfig) -> Self {
        Self {
            actor: Actor::new(position, Vec2::from_array(tuning.extents)),
            health: Health::new(tuning.max_health),
            state: EnemyState::Idle,
            archetype,
            target: None,
            move_speed: tuning.move_speed,
            damage: tuning.damage,
            attack_range: tuning.attack_range,
            detection_range: tuning.detection_range,
            attack_cooldown: tuning.attack_cooldown,
            attack_timer: 0.0,
            hit_stun_timer: 0.0,
            knockback_timer: 0.0,
            knockback_velocity: Vec2::ZERO,
        }
    }

    pub fn basic(position: Vec2, config: &SimulationConfig) -> Self {
        let archetype = EnemyArchetype::Basic;
        Self::new(position, archetype, archetype.tuning(config))
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_stunned(&self) -> bool {
        self.hit_stun_timer > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Один тик FSM. Возвращает удар если Attack cooldown истёк.
    pub fn tick(
        &mut self,
        clock: &SimulationClock,
        target: Option<TargetSnapshot>,
    ) -> Option<StrikeIntent> {
        if !self.actor.active {
            return None;
        }

        let delta = clock.effective_delta;
        self.tick_timers(delta);

        let strike = if self.is_stunned() {
            self.actor.velocity = self.knockback_velocity;
            None
        } else {
            self.update_state(target);
            self.update_behavior(target)
        };

        self.actor.integrate(delta);
        self.refresh_tint();
        strike
    }

    fn tick_timers(&mut self, delta: f32) {
        if self.attack_timer > 0.0 {
            self.attack_timer = (self.attack_timer - delta).max(0.0);
        }

        if self.hit_stun_timer > 0.0 {
            self.hit_stun_timer -= delta;
            if self.hit_stun_timer <= 0.0 {
                self.hit_stun_timer = 0.0;
                // Dead терминален: stun lapse его не сбрасывает
                if self.state != EnemyState::Dead {
                    self.state = EnemyState::Idle;
                }
            }
        }

        if self.knockback_timer > 0.0 {
            self.knockback_timer -= delta;
            self.knockback_velocity *= decay_factor(KNOCKBACK_DAMPING, delta);
            if self.knockback_timer <= 0.0 {
                self.knockback_timer = 0.0;
                self.knockback_velocity = Vec2::ZERO;
            }
        }
    }

    fn update_state(&mut self, target: Option<TargetSnapshot>) {
        let distance = target.map(|t| self.actor.position.distance(t.position));

        let next = match (self.state, distance) {
            (EnemyState::Dead, _) => {
                self.actor.active = false;
                self.actor.velocity = Vec2::ZERO;
                return;
            }
            (EnemyState::Idle, Some(d)) if d <= self.detection_range => EnemyState::Chase,
            (EnemyState::Chase | EnemyState::Attack, None) => EnemyState::Idle,
            (EnemyState::Chase, Some(d)) if d <= self.attack_range => EnemyState::Attack,
            (EnemyState::Chase, Some(d)) if d > self.detection_range * DEAGGRO_FACTOR => {
                EnemyState::Idle
            }
            (EnemyState::Attack, Some(d)) if d > self.attack_range * REENGAGE_FACTOR => {
                EnemyState::Chase
            }
            // Hurt без stun: дослушиваем knockback, затем Idle
            (EnemyState::Hurt, _) if self.knockback_timer <= 0.0 => EnemyState::Idle,
            (state, _) => state,
        };

        self.state = next;
    }

    fn update_behavior(&mut self, target: Option<TargetSnapshot>) -> Option<StrikeIntent> {
        match self.state {
            EnemyState::Idle | EnemyState::Patrol | EnemyState::Dead => {
                self.actor.velocity = Vec2::ZERO;
                None
            }
            EnemyState::Chase => {
                let to_target = target.map(|t| t.position - self.actor.position);
                match to_target.and_then(|v| v.try_normalize()) {
                    Some(direction) => {
                        self.actor.velocity = direction * self.move_speed;
                        self.actor.face_towards(direction);
                    }
                    None => self.actor.velocity = Vec2::ZERO,
                }
                None
            }
            EnemyState::Attack => {
                self.actor.velocity = Vec2::ZERO;
                let target = target?;
                self.actor.face_towards(target.position - self.actor.position);

                if self.attack_timer > 0.0 {
                    return None;
                }
                self.attack_timer = self.attack_cooldown;
                Some(StrikeIntent {
                    damage: self.damage,
                    origin: self.actor.position,
                })
            }
            EnemyState::Hurt => {
                self.actor.velocity = self.knockback_velocity;
                None
            }
        }
    }

    /// Урон от игрока.
    ///
    /// Возвращает true если этот удар убил агента.
    pub fn take_damage(
        &mut self,
        amount: f32,
        attacker_position: Vec2,
        knockback_force: f32,
        hit_stun: f32,
        is_critical: bool,
        rng: &mut impl Rng,
    ) -> bool {
        if self.state == EnemyState::Dead {
            return false;
        }

        self.health.take_damage(amount);
        self.state = EnemyState::Hurt;
        self.hit_stun_timer = hit_stun.max(0.0);

        // Позиции совпали → случайное единичное направление
        let direction = (self.actor.position - attacker_position)
            .try_normalize()
            .unwrap_or_else(|| Vec2::from_angle(rng.gen_range(0.0..TAU)));
        self.knockback_velocity = direction * knockback_force;
        self.knockback_timer = KNOCKBACK_DURATION;

        if self.health.is_alive() {
            if is_critical {
                crate::log(&format!(
                    "💥 Critical hit: {:.1} dmg, enemy hp {:.1}/{:.1}",
                    amount, self.health.current, self.health.max
                ));
            }
            return false;
        }

        self.health.current = 0.0;
        self.state = EnemyState::Dead;
        self.knockback_velocity *= DEATH_LAUNCH_MULTIPLIER;
        crate::log(&format!(
            "☠️ Enemy killed ({:.1} dmg{})",
            amount,
            if is_critical { ", crit" } else { "" }
        ));
        true
    }

    fn refresh_tint(&mut self) {
        self.actor.tint = match self.state {
            EnemyState::Dead => VisualHint::Dying,
            EnemyState::Hurt if self.hit_stun_timer > 0.0 => VisualHint::Hurt {
                flash: (self.hit_stun_timer * 20.0).sin() * 0.5 + 0.5,
            },
            _ => VisualHint::Normal,
        };
    }
}

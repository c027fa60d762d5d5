//! PlayerAgent: dodge / attack / death state machine игрока
//!
//! Порядок тика (`PlayerAgent::tick`):
//! 1. Локальный clock (hit-pause ×0.1, иначе perfect dodge ×0.3)
//! 2. Таймеры: attack cooldown, dodge, dodge cooldown, death sequence
//! 3. Input: dodge → attack → movement
//! 4. Swing (AttackInstance следует за игроком)
//! 5. Интеграция позиции (effective dt)
//! 6. CombatFeedback (real dt: hit-pause не замедляет сам себя)

use bevy::prelude::*;
use rand::Rng;

use crate::clock::SimulationClock;
use crate::combat::{swing_lifetime, AttackInstance, CombatFeedback, Weapon};
use crate::components::{Actor, ActorView, Health, PlayerInput, VisualHint};
use crate::config::{FeedbackConfig, PlayerConfig};

/// Направление dodge без movement input ("вверх" экрана)
pub const DEFAULT_DODGE_DIRECTION: Vec2 = Vec2::new(0.0, -1.0);

/// Результат попытки нанести урон игроку
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageOutcome {
    /// Dodge i-frames, урон отброшен
    Negated,
    /// Попадание в perfect window: урон отброшен + slow-mo
    PerfectDodge,
    /// Урон применён, игрок жив
    Applied,
    /// Урон применён, началась death sequence
    Killed,
    /// Игрок уже умирает / неактивен
    Ignored,
}

impl DamageOutcome {
    pub fn health_lost(&self) -> bool {
        matches!(self, DamageOutcome::Applied | DamageOutcome::Killed)
    }
}

/// Dodge sub-state
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct DodgeState {
    pub is_dodging: bool,
    /// Сколько осталось текущего dodge
    pub timer: f32,
    pub cooldown_timer: f32,
    pub direction: Vec2,
    /// Perfect dodge сработал: slow-mo до конца dodge
    pub perfect_active: bool,
}

/// Игрок (fat component: тело + здоровье + оружие + feedback)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerAgent {
    pub actor: Actor,
    pub health: Health,
    pub weapon: Weapon,
    pub current_attack: AttackInstance,
    pub attack_cooldown_timer: f32,
    pub dodge: DodgeState,
    pub feedback: CombatFeedback,
    /// Some(remaining) пока идёт death sequence
    pub death_timer: Option<f32>,
    pub tuning: PlayerConfig,
    pub feedback_tuning: FeedbackConfig,
}

impl ActorView for PlayerAgent {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn health(&self) -> &Health {
        &self.health
    }
}

impl PlayerAgent {
    pub fn new(position: Vec2, tuning: &PlayerConfig, feedback_tuning: &FeedbackConfig) -> Self {
        Self {
            actor: Actor::new(position, Vec2::from_array(tuning.extents)),
            health: Health::new(tuning.max_health),
            weapon: Weapon::basic_sword(),
            current_attack: AttackInstance::default(),
            attack_cooldown_timer: 0.0,
            dodge: DodgeState::default(),
            feedback: CombatFeedback::default(),
            death_timer: None,
            tuning: tuning.clone(),
            feedback_tuning: feedback_tuning.clone(),
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.equip(weapon);
        self
    }

    /// Сменить оружие (combo цепочка другого класса начинается заново)
    pub fn equip(&mut self, weapon: Weapon) {
        self.weapon = weapon;
        self.feedback.reset_combo();
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.is_dodging
    }

    pub fn is_perfect_dodge_active(&self) -> bool {
        self.dodge.perfect_active
    }

    pub fn is_dying(&self) -> bool {
        self.death_timer.is_some()
    }

    /// Жив и управляем (не в death sequence)
    pub fn is_controllable(&self) -> bool {
        self.actor.active && !self.is_dying()
    }

    pub fn can_dodge(&self) -> bool {
        self.is_controllable() && !self.dodge.is_dodging && self.dodge.cooldown_timer <= 0.0
    }

    pub fn can_attack(&self) -> bool {
        self.is_controllable()
            && !self.dodge.is_dodging
            && self.attack_cooldown_timer <= 0.0
            && !self.feedback.is_hit_paused()
    }

    /// Внутри perfect window (последние N секунд dodge)?
    pub fn in_perfect_dodge_window(&self) -> bool {
        self.dodge.is_dodging
            && self.dodge.timer > 0.0
            && self.dodge.timer <= self.tuning.perfect_dodge_window
    }

    /// Clock для собственного тика игрока.
    ///
    /// Hit-pause приоритетнее perfect dodge (эффекты не складываются).
    pub fn local_clock(&self, clock: &SimulationClock) -> SimulationClock {
        if self.feedback.is_hit_paused() {
            clock.dilated(self.tuning.hit_pause_time_scale)
        } else if self.dodge.perfect_active {
            clock.dilated(self.tuning.perfect_dodge_time_scale)
        } else {
            *clock
        }
    }

    /// Один тик игрока
    pub fn tick(&mut self, clock: &SimulationClock, input: &PlayerInput, rng: &mut impl Rng) {
        if !self.actor.active {
            return;
        }

        let local = self.local_clock(clock);
        let delta = local.effective_delta;

        if self.tick_death_sequence(delta) {
            self.feedback.update(clock.real_delta);
            return;
        }

        self.tick_timers(delta);

        // Swing ещё в полёте → follow-up window отсчитывается от конца swing
        if self.current_attack.is_active() {
            self.feedback.combo.hold_window();
        }

        self.handle_input(input, rng);

        let owner_position = self.actor.position;
        self.current_attack.update(delta, owner_position);

        self.actor.integrate(delta);
        self.refresh_tint();

        self.feedback.update(clock.real_delta);
    }

    /// true пока death sequence идёт (обычный тик пропускается)
    fn tick_death_sequence(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.death_timer.as_mut() else {
            return false;
        };

        *remaining -= delta;
        self.actor.velocity = Vec2::ZERO;
        if *remaining <= 0.0 {
            *remaining = 0.0;
            self.actor.active = false;
            crate::log("💀 Player death sequence finished");
        }
        true
    }

    fn tick_timers(&mut self, delta: f32) {
        if self.attack_cooldown_timer > 0.0 {
            self.attack_cooldown_timer = (self.attack_cooldown_timer - delta).max(0.0);
        }

        if self.dodge.cooldown_timer > 0.0 {
            self.dodge.cooldown_timer = (self.dodge.cooldown_timer - delta).max(0.0);
        }

        if self.dodge.is_dodging {
            self.dodge.timer -= delta;
            if self.dodge.timer <= 0.0 {
                self.dodge.timer = 0.0;
                self.dodge.is_dodging = false;
                self.dodge.perfect_active = false;
                self.actor.velocity = Vec2::ZERO;
            }
        }
    }

    fn handle_input(&mut self, input: &PlayerInput, rng: &mut impl Rng) {
        if self.dodge.is_dodging {
            // Movement/attack игнорируются, скорость задаёт dodge
            self.actor.velocity = self.dodge.direction * self.tuning.dodge_speed;
            return;
        }

        if input.dodge_pressed && self.can_dodge() {
            self.start_dodge(input.movement);
            return;
        }

        if input.attack_pressed && self.can_attack() {
            self.start_attack(input.aim_position, rng);
        }

        if input.movement.length_squared() > 0.0 {
            self.actor.velocity = input.movement * self.tuning.move_speed;
            self.actor.face_towards(input.movement);
        } else {
            self.actor.velocity = Vec2::ZERO;
        }
    }

    /// Начать dodge в направлении movement (или "вверх" без input)
    pub fn start_dodge(&mut self, movement: Vec2) {
        let direction = movement.try_normalize().unwrap_or(DEFAULT_DODGE_DIRECTION);

        self.dodge = DodgeState {
            is_dodging: true,
            timer: self.tuning.dodge_duration,
            cooldown_timer: self.tuning.dodge_cooldown,
            direction,
            perfect_active: false,
        };
        self.actor.velocity = direction * self.tuning.dodge_speed;
        self.actor.face_towards(direction);
    }

    /// Начать swing в сторону aim точки
    pub fn start_attack(&mut self, aim_position: Vec2, rng: &mut impl Rng) {
        let to_aim = aim_position - self.actor.position;
        let direction = if to_aim.length_squared() > 0.0 {
            to_aim.y.atan2(to_aim.x)
        } else {
            // Aim совпадает с игроком → бьём туда, куда смотрит спрайт
            self.actor.rotation - std::f32::consts::FRAC_PI_2
        };

        // Окно комбо удерживается hold_window() пока swing в полёте и отсчитывается
        // с конца swing, поэтому активный swing тоже считается "в атаке"
        let is_attacking = self.current_attack.is_active() || self.feedback.combo.is_in_combo();
        let step = self.feedback.combo.next_step(self.weapon.class, is_attacking);

        self.current_attack
            .start(self.actor.position, direction, &self.weapon, &step, rng);
        self.attack_cooldown_timer = swing_lifetime(&self.weapon, &step);

        crate::log(&format!(
            "⚔️ Player swing: {} step {} (dmg {:.1}{}, cooldown {:.3}s)",
            self.weapon.name,
            step.index,
            self.current_attack.damage,
            if self.current_attack.is_critical { ", CRIT" } else { "" },
            self.attack_cooldown_timer
        ));
    }

    /// Входящий урон.
    ///
    /// Dodge даёт полную неуязвимость; perfect window поверх неё
    /// включает slow-mo и shake вместо урона.
    pub fn take_damage(&mut self, amount: f32, attacker_position: Vec2) -> DamageOutcome {
        if !self.is_controllable() {
            return DamageOutcome::Ignored;
        }

        if self.dodge.is_dodging {
            if self.in_perfect_dodge_window() {
                self.dodge.perfect_active = true;
                self.feedback.trigger_screen_shake(
                    self.feedback_tuning.perfect_dodge_shake_amount,
                    self.feedback_tuning.perfect_dodge_shake_duration,
                );
                crate::log(&format!(
                    "✨ Perfect dodge! (attack from {:.0},{:.0})",
                    attacker_position.x, attacker_position.y
                ));
                return DamageOutcome::PerfectDodge;
            }
            return DamageOutcome::Negated;
        }

        self.health.take_damage(amount);
        if self.health.is_alive() {
            return DamageOutcome::Applied;
        }

        self.begin_death_sequence();
        DamageOutcome::Killed
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.is_controllable() {
            return;
        }
        self.health.heal(amount);
    }

    fn begin_death_sequence(&mut self) {
        self.death_timer = Some(self.tuning.death_sequence_duration.max(0.0));
        self.actor.velocity = Vec2::ZERO;
        self.actor.tint = VisualHint::Dying;
        self.current_attack = AttackInstance::default();
        self.dodge = DodgeState::default();
        self.feedback.reset_combo();
        crate::log_info("💀 Player died, death sequence started");
    }

    fn refresh_tint(&mut self) {
        self.actor.tint = if self.is_dying() {
            VisualHint::Dying
        } else if self.dodge.perfect_active {
            VisualHint::PerfectDodge
        } else if self.dodge.is_dodging {
            VisualHint::Dodging
        } else {
            VisualHint::Normal
        };
    }
}

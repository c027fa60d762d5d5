//! Hit resolution: swing игрока → враги, удары врагов → игрок

use bevy::prelude::*;

use crate::ai::{EnemyAgent, EnemyState};
use crate::combat::{EnemyDied, EnemyHit, EnemyStrike, PlayerDied, PlayerHit};
use crate::components::ActorView;
use crate::player::{DamageOutcome, PlayerAgent};
use crate::DeterministicRng;

/// Система: overlap loop активного swing против живых врагов
///
/// Для каждой пары (swing, враг) один раз за тик:
/// 1. Пропускаем неактивных / мёртвых и уже задетых этой активацией
/// 2. `is_in_hit_area` → `register_hit` → `EnemyAgent::take_damage`
/// 3. Feedback: hit-pause, shake, damage number, particles
pub fn resolve_player_attack_hits(
    mut players: Query<(Entity, &mut PlayerAgent)>,
    mut enemies: Query<(Entity, &mut EnemyAgent)>,
    mut rng: ResMut<DeterministicRng>,
    mut hit_events: EventWriter<EnemyHit>,
    mut died_events: EventWriter<EnemyDied>,
) {
    for (player_entity, mut player) in players.iter_mut() {
        if !player.is_controllable() || !player.current_attack.is_active() {
            continue;
        }

        let player = &mut *player;
        let tuning = player.feedback_tuning.clone();
        let player_position = player.actor.position;

        for (enemy_entity, mut enemy) in enemies.iter_mut() {
            if !enemy.is_active() || enemy.state == EnemyState::Dead {
                continue;
            }
            if player.current_attack.has_hit(enemy_entity) {
                continue;
            }

            let enemy_position = enemy.position();
            if !player.current_attack.is_in_hit_area(enemy_position) {
                continue;
            }
            player.current_attack.register_hit(enemy_entity);

            let attack = &player.current_attack;
            let killed = enemy.take_damage(
                attack.damage,
                player_position,
                attack.knockback_force,
                attack.hit_stun,
                attack.is_critical,
                &mut rng.rng,
            );

            let hit_direction = (enemy_position - player_position)
                .normalize_or(Vec2::from_angle(attack.direction));

            hit_events.write(EnemyHit {
                attacker: player_entity,
                target: enemy_entity,
                damage: attack.damage,
                is_critical: attack.is_critical,
                combo_index: attack.combo_index,
                target_died: killed,
            });

            let (damage, is_critical) = (attack.damage, attack.is_critical);
            let feedback = &mut player.feedback;
            feedback.trigger_hit_pause(tuning.hit_pause_duration);
            feedback.trigger_screen_shake(tuning.hit_shake_amount, tuning.hit_shake_duration);
            feedback.spawn_damage_number(enemy_position, damage, is_critical);
            feedback.spawn_hit_particles(
                enemy_position,
                hit_direction,
                tuning.hit_particle_count,
                &mut rng.rng,
            );

            if killed {
                died_events.write(EnemyDied {
                    entity: enemy_entity,
                    killer: Some(player_entity),
                });
            }
        }
    }
}

/// Система: EnemyStrike → PlayerAgent::take_damage
///
/// Dodge / perfect dodge решает сам PlayerAgent, здесь только
/// маршрутизация и события.
pub fn apply_enemy_strikes(
    mut strikes: EventReader<EnemyStrike>,
    mut players: Query<&mut PlayerAgent>,
    mut hit_events: EventWriter<PlayerHit>,
    mut died_events: EventWriter<PlayerDied>,
) {
    for strike in strikes.read() {
        let Ok(mut player) = players.get_mut(strike.target) else {
            crate::log_warning(&format!(
                "EnemyStrike: target {:?} has no PlayerAgent (despawned?)",
                strike.target
            ));
            continue;
        };

        let outcome = player.take_damage(strike.damage, strike.origin);
        if outcome == DamageOutcome::Ignored {
            continue;
        }

        crate::log(&format!(
            "🩸 {:?} → {:?}: {:.1} dmg → {:?} (hp {:.1}/{:.1})",
            strike.attacker,
            strike.target,
            strike.damage,
            outcome,
            player.health.current,
            player.health.max
        ));

        hit_events.write(PlayerHit {
            attacker: strike.attacker,
            target: strike.target,
            damage: strike.damage,
            outcome,
        });

        if outcome == DamageOutcome::Killed {
            died_events.write(PlayerDied {
                entity: strike.target,
                killer: Some(strike.attacker),
            });
        }
    }
}

/// Система: despawn врагов, ставших неактивными (Dead отработал)
pub fn despawn_inactive_enemies(
    mut commands: Commands,
    enemies: Query<(Entity, &EnemyAgent)>,
) {
    for (entity, enemy) in enemies.iter() {
        if !enemy.is_active() {
            commands.entity(entity).despawn();
            crate::log(&format!("🧹 Despawned inactive enemy {:?}", entity));
        }
    }
}

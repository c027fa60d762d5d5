//! FSM AI systems (target handles, per-tick FSM update).

use bevy::prelude::*;

use crate::ai::{EnemyAgent, TargetSnapshot};
use crate::clock::SimulationClock;
use crate::combat::EnemyStrike;
use crate::components::ActorView;
use crate::player::PlayerAgent;

/// Живая цель: активна и HP > 0 (умирающий игрок целью не считается)
fn is_live_target(target: &impl ActorView) -> bool {
    target.is_active() && target.health().is_alive()
}

/// Система: валидация target handle врагов
///
/// Handle, указывающий на despawned entity, заменяется ближайшим живым
/// игроком (или None, если таких нет). `None` означает "без цели" и не
/// трогается: цель задаёт только хост. Handle на живую, но мёртвую цель
/// остаётся: FSM сам трактует его как "нет цели".
pub fn assign_enemy_targets(
    mut enemies: Query<(Entity, &mut EnemyAgent)>,
    players: Query<(Entity, &PlayerAgent)>,
) {
    for (entity, mut enemy) in enemies.iter_mut() {
        if !enemy.is_active() {
            continue;
        }

        let Some(current) = enemy.target else {
            continue;
        };
        if players.get(current).is_ok() {
            continue;
        }

        let position = enemy.position();
        let nearest = players
            .iter()
            .filter(|(_, player)| is_live_target(*player))
            .min_by(|(_, a), (_, b)| {
                a.position()
                    .distance_squared(position)
                    .total_cmp(&b.position().distance_squared(position))
            })
            .map(|(target, _)| target);

        enemy.target = nearest;
        match nearest {
            Some(target) => crate::log(&format!(
                "🎯 Enemy {:?} lost {:?}, retargets {:?}",
                entity, current, target
            )),
            None => crate::log(&format!("Enemy {:?} lost {:?}, no live target", entity, current)),
        }
    }
}

/// Система: FSM тик каждого врага
///
/// Target handle резолвится через query игроков → `TargetSnapshot`.
/// Удары в Attack state уходят как EnemyStrike события.
pub fn tick_enemies(
    mut enemies: Query<(Entity, &mut EnemyAgent)>,
    players: Query<&PlayerAgent>,
    clock: Res<SimulationClock>,
    mut strike_events: EventWriter<EnemyStrike>,
) {
    for (entity, mut enemy) in enemies.iter_mut() {
        let target_entity = enemy.target;
        let snapshot = target_entity
            .and_then(|target| players.get(target).ok())
            .filter(|player| is_live_target(*player))
            .map(|player| TargetSnapshot {
                position: player.position(),
            });

        let previous_state = enemy.state;
        let strike = enemy.tick(&clock, snapshot);

        if enemy.state != previous_state {
            crate::log(&format!(
                "AI: {:?} {:?} → {:?}",
                entity, previous_state, enemy.state
            ));
        }

        if let (Some(strike), Some(target)) = (strike, target_entity) {
            strike_events.write(EnemyStrike {
                attacker: entity,
                target,
                damage: strike.damage,
                origin: strike.origin,
            });
        }
    }
}

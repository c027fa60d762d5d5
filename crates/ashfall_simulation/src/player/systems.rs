//! Player systems

use bevy::prelude::*;

use crate::clock::SimulationClock;
use crate::components::PlayerInput;
use crate::player::PlayerAgent;
use crate::DeterministicRng;

/// Система: тик игрока + сброс edge-triggered input
///
/// Глобальный clock не замедляется: dilation игрок считает сам.
pub fn tick_players(
    mut players: Query<(Entity, &mut PlayerAgent, &mut PlayerInput)>,
    clock: Res<SimulationClock>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (entity, mut player, mut input) in players.iter_mut() {
        let was_active = player.actor.active;

        player.tick(&clock, &input, &mut rng.rng);
        input.consume_edges();

        if was_active && !player.actor.active {
            crate::log_info(&format!("🪦 Player {:?} is now inactive", entity));
        }
    }
}

//! Player module
//!
//! PlayerAgent владеет своим CombatFeedback (combo, hit-pause, shake, pools).
//! Input приходит через PlayerInput компонент от внешнего input слоя.

use bevy::prelude::*;

pub mod agent;
pub mod systems;


pub use agent::{DamageOutcome, DodgeState, PlayerAgent, DEFAULT_DODGE_DIRECTION};
pub use systems::tick_players;

use crate::SimulationSet;

/// Player Plugin
///
/// tick_players: первым после обновления SimulationClock,
/// до AI и combat resolution.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, tick_players.in_set(SimulationSet::Player));
    }
}

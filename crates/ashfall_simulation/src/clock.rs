//! SimulationClock: явное время тика
//!
//! Вместо глобального "hit-pause" флага каждый update получает clock:
//! - `real_delta`: wall-clock шаг (фиксированный тик)
//! - `effective_delta`: шаг после time dilation (hit-pause / slow-mo)
//!
//! Глобальный clock никогда не замедляется. Замедление применяет только
//! игрок к своему собственному тику (см. `PlayerAgent::tick`).

use bevy::prelude::*;

/// Эталонная частота тика для per-tick коэффициентов затухания
pub const REFERENCE_TICK_RATE: f32 = 60.0;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    pub real_delta: f32,
    pub effective_delta: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1.0 / REFERENCE_TICK_RATE)
    }
}

impl SimulationClock {
    pub fn new(delta: f32) -> Self {
        let delta = delta.max(0.0);
        Self {
            real_delta: delta,
            effective_delta: delta,
        }
    }

    /// Тот же тик, но с замедленным effective шагом
    pub fn dilated(&self, scale: f32) -> Self {
        Self {
            real_delta: self.real_delta,
            effective_delta: self.real_delta * scale.clamp(0.0, 1.0),
        }
    }

    pub fn is_dilated(&self) -> bool {
        self.effective_delta < self.real_delta
    }
}

/// Per-tick коэффициент затухания, пересчитанный на произвольный dt.
///
/// При 60Hz даёт ровно `per_tick` за тик.
pub fn decay_factor(per_tick: f32, delta: f32) -> f32 {
    per_tick.powf(delta * REFERENCE_TICK_RATE)
}

/// System: обновление SimulationClock из Time<Fixed>
pub fn sync_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time<Fixed>>) {
    *clock = SimulationClock::new(time.delta_secs());
}

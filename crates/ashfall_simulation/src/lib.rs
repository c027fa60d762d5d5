//! Ashfall Simulation Core
//!
//! Headless ECS-симуляция top-down action combat на Bevy 0.16.
//!
//! Симуляция отдаёт наружу только числа и state (позиции, tint hints,
//! HP, feedback pools). Рендер, камера, input polling: внешний слой.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod clock;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, EnemyAgent, EnemyArchetype, EnemyState};
pub use clock::{decay_factor, sync_simulation_clock, SimulationClock};
pub use combat::{
    AttackInstance, CombatFeedback, CombatPlugin, ComboResolver, ComboStep, EnemyDied, EnemyHit,
    EnemyStrike, PlayerDied, PlayerHit, Weapon, WeaponClass,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use player::{DamageOutcome, PlayerAgent, PlayerPlugin};

/// Фазы fixed тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// SimulationClock ← Time<Fixed>
    Clock,
    Player,
    Ai,
    /// Overlap swing → враги, EnemyStrike → игрок
    Combat,
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SimulationClock>()
            // Tuning: хост может вставить свой SimulationConfig до plugin
            .init_resource::<SimulationConfig>();

        // Seeded RNG из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Clock,
                SimulationSet::Player,
                SimulationSet::Ai,
                SimulationSet::Combat,
                SimulationSet::Cleanup,
            )
                .chain(),
        )
        .add_systems(
            FixedUpdate,
            sync_simulation_clock.in_set(SimulationSet::Clock),
        )
        // Подсистемы
        .add_plugins((PlayerPlugin, AIPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности: crit rolls, knockback fallback, particle spread.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Spawn игрока с tuning из SimulationConfig
pub fn spawn_player(world: &mut World, position: Vec2) -> Entity {
    let config = world
        .get_resource::<SimulationConfig>()
        .cloned()
        .unwrap_or_default();
    world
        .spawn((
            PlayerAgent::new(position, &config.player, &config.feedback),
            PlayerInput::default(),
        ))
        .id()
}

/// Spawn базового врага, нацеленного на `target` (`None`: без цели, стоит в Idle)
pub fn spawn_enemy(world: &mut World, position: Vec2, target: Option<Entity>) -> Entity {
    let config = world
        .get_resource::<SimulationConfig>()
        .cloned()
        .unwrap_or_default();
    let mut enemy = EnemyAgent::basic(position, &config);
    enemy.target = target;
    world.spawn(enemy).id()
}

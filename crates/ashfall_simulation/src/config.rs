//! Tuning конфигурация симуляции (RON)
//!
//! Все значения имеют Default: RON файл может переопределить любое подмножество.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Ошибка загрузки tuning конфигурации
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Корневой конфиг симуляции
#[derive(Resource, Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub player: PlayerConfig,
    pub enemy: EnemyArchetypeConfig,
    pub feedback: FeedbackConfig,
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }
}

/// Параметры игрока (движение, dodge, смерть, time dilation)
#[derive(Debug, Clone, Deserialize, PartialEq, Reflect)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub move_speed: f32,
    pub dodge_speed: f32,
    pub dodge_duration: f32,
    pub dodge_cooldown: f32,
    /// Последние N секунд dodge: окно perfect dodge
    pub perfect_dodge_window: f32,
    pub death_sequence_duration: f32,
    /// Множитель dt игрока во время hit-pause
    pub hit_pause_time_scale: f32,
    /// Множитель dt игрока во время perfect dodge
    pub perfect_dodge_time_scale: f32,
    /// Размер спрайта (для bounds)
    pub extents: [f32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 300.0,
            dodge_speed: 600.0,
            dodge_duration: 0.3,
            dodge_cooldown: 0.5,
            perfect_dodge_window: 0.15,
            death_sequence_duration: 1.5,
            hit_pause_time_scale: 0.1,
            perfect_dodge_time_scale: 0.3,
            extents: [32.0, 32.0],
        }
    }
}

/// Параметры базового врага
#[derive(Debug, Clone, Deserialize, PartialEq, Reflect)]
#[serde(default)]
pub struct EnemyArchetypeConfig {
    pub max_health: f32,
    pub move_speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub detection_range: f32,
    /// Секунды между ударами в Attack state
    pub attack_cooldown: f32,
    pub extents: [f32; 2],
}

impl Default for EnemyArchetypeConfig {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            move_speed: 150.0,
            damage: 10.0,
            attack_range: 60.0,
            detection_range: 400.0,
            attack_cooldown: 1.0,
            extents: [24.0, 24.0],
        }
    }
}

/// Параметры combat feedback на попадании
#[derive(Debug, Clone, Deserialize, PartialEq, Reflect)]
#[serde(default)]
pub struct FeedbackConfig {
    pub hit_pause_duration: f32,
    pub hit_shake_amount: f32,
    pub hit_shake_duration: f32,
    pub hit_particle_count: usize,
    pub perfect_dodge_shake_amount: f32,
    pub perfect_dodge_shake_duration: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            hit_pause_duration: 0.05,
            hit_shake_amount: 3.0,
            hit_shake_duration: 0.15,
            hit_particle_count: 5,
            perfect_dodge_shake_amount: 5.0,
            perfect_dodge_shake_duration: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_overrides_defaults() {
        let config = SimulationConfig::from_ron_str(
            "(player: (max_health: 150.0), feedback: (hit_particle_count: 8))",
        )
        .expect("valid RON");

        assert_eq!(config.player.max_health, 150.0);
        assert_eq!(config.player.dodge_duration, 0.3);
        assert_eq!(config.feedback.hit_particle_count, 8);
        assert_eq!(config.enemy, EnemyArchetypeConfig::default());
    }

    #[test]
    fn test_empty_ron_is_default() {
        let config = SimulationConfig::from_ron_str("()").expect("valid RON");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let result = SimulationConfig::from_ron_str("(player: (max_health: \"lots\"))");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load(Path::new("/definitely/not/here.ron"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}

//! Общие компоненты агентов
//!
//! - actor: тело актора, здоровье, визуальная подсказка
//! - input: intent игрока от внешнего input слоя

pub mod actor;
pub mod input;

pub use actor::*;
pub use input::*;

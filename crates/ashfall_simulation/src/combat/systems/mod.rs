//! Combat systems (orchestrator слой поверх value types)

pub mod hits;


pub use hits::*;

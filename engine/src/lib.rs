//! Cypher TCK engine boundary
//!
//! The harness never parses, plans or executes queries itself. Everything it
//! needs from a graph engine goes through the [`GraphEngine`] trait defined
//! here, together with the dynamically-typed [`Value`] rows an engine hands
//! back and the [`SideEffects`] derived from before/after graph counts.

pub mod engine;
pub mod side_effects;
pub mod stub;
pub mod value;

pub use engine::{EngineError, GraphEngine, GraphSnapshot, Params, ResultTable, Row};
pub use side_effects::{SideEffectKey, SideEffects, SideEffectsMap};
pub use stub::StubEngine;
pub use value::Value;

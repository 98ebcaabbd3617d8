//! shiftsense-core: predictive crew scheduling engine.
//!
//! Six stateless calculators over read-only roster data:
//!   - fatigue scoring (14-day composite index)
//!   - skill decay tracking
//!   - swap matching
//!   - wellness exposure tracking
//!   - competency pairing
//!   - demand prediction
//!
//! The engine computes; callers decide what to persist. All reads go
//! through the `RosterReader` seam; `SqliteRoster` is one
//! implementation, used by tests and the report-runner.

pub mod config;
pub mod demand_predictor;
pub mod engine;
pub mod error;
pub mod fatigue_scorer;
pub mod model;
pub mod pairing_engine;
pub mod reader;
pub mod skill_decay_tracker;
pub mod store;
pub mod swap_matcher;
pub mod types;
pub mod wellness_tracker;

pub use config::EngineConfig;
pub use engine::ScoringEngine;
pub use error::{EngineError, EngineResult};
pub use reader::RosterReader;
pub use store::SqliteRoster;

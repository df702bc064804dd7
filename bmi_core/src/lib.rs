#![forbid(unsafe_code)]

//! Core domain model and business logic for bmifit.
//!
//! This crate provides:
//! - Domain types (BMI records, exercises, workout sessions)
//! - Unit conversion and the BMI engine
//! - The category-keyed exercise catalog
//! - The workout session state machine and its timer clock
//! - History persistence (trait, in-memory and JSON file stores, CSV export)

pub mod types;
pub mod error;
pub mod units;
pub mod bmi;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod json_store;
pub mod workout;
pub mod clock;
pub mod summary;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use units::{normalize, Measurements};
pub use catalog::plan_for;
pub use config::Config;
pub use store::{HistoryStore, MemoryStore};
pub use json_store::JsonFileStore;
pub use workout::{Advance, TickOutcome, TimerState, Workout, WorkoutState};
pub use clock::{run_timer, IntervalTicker, Ticker};
pub use summary::{format_clock, WorkoutSummary};

#![forbid(unsafe_code)]

//! Core domain model and persistence for the IronNote workout log.
//!
//! This crate provides:
//! - Domain types (exercises, sets, exercise sessions, workouts)
//! - The exercise catalog (seed list plus custom exercises)
//! - The workout store (one record per calendar day)
//! - The in-memory active logging session
//! - CSV export

pub mod types;
pub mod error;
pub mod clock;
pub mod table;
pub mod catalog;
pub mod workouts;
pub mod active;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use catalog::ExerciseCatalog;
pub use workouts::{date_key, WorkoutStore};
pub use active::{is_set_logged, set_data, ActiveSession};
pub use config::Config;

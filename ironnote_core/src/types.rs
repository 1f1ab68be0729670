//! Core domain types for IronNote.
//!
//! This module defines the data model shared by every layer:
//! - Exercises and their body-part categories
//! - Sets, exercise sessions and daily workouts
//! - Partial updates and per-exercise history entries

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Types
// ============================================================================

/// Body-part category an exercise belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Chest,
    Back,
    Shoulders,
    Legs,
    Core,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Chest,
        Category::Back,
        Category::Shoulders,
        Category::Legs,
        Category::Core,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chest => "CHEST",
            Category::Back => "BACK",
            Category::Shoulders => "SHOULDERS",
            Category::Legs => "LEGS",
            Category::Core => "CORE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "CHEST" => Ok(Category::Chest),
            "BACK" => Ok(Category::Back),
            "SHOULDERS" => Ok(Category::Shoulders),
            "LEGS" => Ok(Category::Legs),
            "CORE" => Ok(Category::Core),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// An exercise in the catalog (e.g., "Barbell Squat")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub is_custom: bool,
}

// ============================================================================
// Set and Session Types
// ============================================================================

/// Position of a set within an exercise session, always 1 through 5
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct SetNumber(u8);

impl SetNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(n: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(SetNumber(n))
        } else {
            Err(Error::InvalidSetNumber(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SetNumber {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        SetNumber::new(n)
    }
}

impl From<SetNumber> for u8 {
    fn from(n: SetNumber) -> u8 {
        n.0
    }
}

impl fmt::Display for SetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged set. Weight is in pounds. Negative and zero values are kept as
/// given; only a non-finite weight is refused, since the table can't hold it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub set_number: SetNumber,
    pub reps: i32,
    pub weight: f64,
}

/// One exercise's logged sets within one day's workout
///
/// Name and category are copied from the catalog at logging time so the
/// record survives later catalog edits or deletions.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSession {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub category: Category,
    pub sets: Vec<WorkoutSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: i64,
}

/// Partial update for an [`ExerciseSession`]; `None` fields are left as-is
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseSessionUpdate {
    pub exercise_id: Option<String>,
    pub exercise_name: Option<String>,
    pub category: Option<Category>,
    pub sets: Option<Vec<WorkoutSet>>,
    pub notes: Option<String>,
    pub timestamp: Option<i64>,
}

impl ExerciseSessionUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ExerciseSession {
    /// Shallow merge: every field present in `update` replaces ours
    pub fn apply(&mut self, update: ExerciseSessionUpdate) {
        if let Some(exercise_id) = update.exercise_id {
            self.exercise_id = exercise_id;
        }
        if let Some(exercise_name) = update.exercise_name {
            self.exercise_name = exercise_name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(sets) = update.sets {
            self.sets = sets;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = timestamp;
        }
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// The durable record of everything performed on one calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    /// MM/DD/YY, the natural key for "today's workout"
    pub date: String,
    /// Milliseconds since the Unix epoch; ordering and range-query key
    pub timestamp: i64,
    pub exercises: Vec<ExerciseSession>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Workout {
    pub fn session(&self, session_id: &str) -> Option<&ExerciseSession> {
        self.exercises.iter().find(|s| s.id == session_id)
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|s| s.sets.len()).sum()
    }
}

/// One past performance of a single exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistoryEntry {
    pub date: String,
    pub sets: Vec<WorkoutSet>,
    pub notes: Option<String>,
}

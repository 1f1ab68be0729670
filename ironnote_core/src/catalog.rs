//! Exercise catalog: the built-in seed list plus user-added exercises.
//!
//! Seed exercises are written once into a fresh exercises table with ids
//! derived from their position (`default-<index>`). Custom exercises get
//! `custom-<millis>` ids and are the only ones that can be deleted.

use crate::clock::{Clock, SystemClock};
use crate::table::{JsonTable, Record};
use crate::types::*;
use crate::Result;
use std::path::Path;

/// File name of the exercises table inside the data directory
pub const EXERCISES_FILE: &str = "exercises.json";

/// Built-in exercises, in seed order
pub const SEED_EXERCISES: &[(&str, Category)] = &[
    // CHEST
    ("Barbell Bench Press", Category::Chest),
    ("Dumbbell Bench Press", Category::Chest),
    ("Incline Barbell Press", Category::Chest),
    ("Incline Dumbbell Press", Category::Chest),
    ("Decline Barbell Press", Category::Chest),
    ("Chest Fly (Machine)", Category::Chest),
    ("Cable Crossover", Category::Chest),
    ("Push-ups", Category::Chest),
    ("Dips (Chest)", Category::Chest),
    // BACK
    ("Deadlift", Category::Back),
    ("Barbell Row", Category::Back),
    ("Dumbbell Row", Category::Back),
    ("Lat Pulldown", Category::Back),
    ("Pull-ups", Category::Back),
    ("Chin-ups", Category::Back),
    ("Cable Row", Category::Back),
    ("T-Bar Row", Category::Back),
    ("Face Pulls", Category::Back),
    // SHOULDERS
    ("Overhead Press", Category::Shoulders),
    ("Dumbbell Shoulder Press", Category::Shoulders),
    ("Lateral Raises", Category::Shoulders),
    ("Front Raises", Category::Shoulders),
    ("Rear Delt Fly", Category::Shoulders),
    ("Arnold Press", Category::Shoulders),
    ("Shrugs", Category::Shoulders),
    ("Upright Row", Category::Shoulders),
    // LEGS
    ("Barbell Squat", Category::Legs),
    ("Front Squat", Category::Legs),
    ("Leg Press", Category::Legs),
    ("Romanian Deadlift", Category::Legs),
    ("Leg Curl", Category::Legs),
    ("Leg Extension", Category::Legs),
    ("Lunges", Category::Legs),
    ("Bulgarian Split Squat", Category::Legs),
    ("Calf Raises", Category::Legs),
    ("Hip Thrust", Category::Legs),
    // CORE
    ("Plank", Category::Core),
    ("Crunches", Category::Core),
    ("Hanging Leg Raises", Category::Core),
    ("Russian Twists", Category::Core),
    ("Cable Crunches", Category::Core),
    ("Ab Wheel Rollout", Category::Core),
    ("Mountain Climbers", Category::Core),
    ("Bicycle Crunches", Category::Core),
];

/// Builds the seed exercises with their deterministic ids
pub fn build_seed_exercises() -> Vec<Exercise> {
    SEED_EXERCISES
        .iter()
        .enumerate()
        .map(|(index, (name, category))| Exercise {
            id: format!("default-{}", index),
            name: (*name).into(),
            category: *category,
            is_custom: false,
        })
        .collect()
}

impl Record for Exercise {
    const TABLE: &'static str = "exercises";

    fn key(&self) -> &str {
        &self.id
    }
}

/// The set of known exercises, seed and custom, backed by the exercises table
pub struct ExerciseCatalog<C = SystemClock> {
    table: JsonTable<Exercise>,
    clock: C,
}

impl ExerciseCatalog<SystemClock> {
    /// Open the catalog stored in `data_dir`
    pub fn open(data_dir: &Path) -> Self {
        Self::with_clock(JsonTable::new(data_dir.join(EXERCISES_FILE)), SystemClock)
    }
}

impl<C: Clock> ExerciseCatalog<C> {
    pub fn with_clock(table: JsonTable<Exercise>, clock: C) -> Self {
        Self { table, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Seed the table if it is empty; a non-empty table is left untouched
    pub fn initialize(&self) -> Result<()> {
        if self.table.count()? > 0 {
            tracing::debug!("Exercise catalog already initialized");
            return Ok(());
        }

        let seed = build_seed_exercises();
        let count = seed.len();
        self.table.insert_all(seed)?;
        tracing::info!("Seeded exercise catalog with {} exercises", count);
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<Exercise>> {
        self.table.load()
    }

    pub fn list_by_category(&self, category: Category) -> Result<Vec<Exercise>> {
        Ok(self
            .table
            .load()?
            .into_iter()
            .filter(|e| e.category == category)
            .collect())
    }

    pub fn get(&self, id: &str) -> Result<Option<Exercise>> {
        self.table.get(id)
    }

    /// Create and persist a user-defined exercise
    ///
    /// Names are not checked for uniqueness; only the id has to be unique.
    pub fn add_custom(&self, name: &str, category: Category) -> Result<Exercise> {
        let exercise = Exercise {
            id: format!("custom-{}", self.clock.now_millis()),
            name: name.to_string(),
            category,
            is_custom: true,
        };
        self.table.insert(exercise.clone())?;
        tracing::info!("Added custom exercise {} ({})", exercise.id, exercise.name);
        Ok(exercise)
    }

    /// Delete a custom exercise
    ///
    /// Unknown ids and seed exercises are left alone. Returns whether an
    /// exercise was removed.
    pub fn delete_custom(&self, id: &str) -> Result<bool> {
        match self.table.get(id)? {
            Some(exercise) if exercise.is_custom => {
                let removed = self.table.delete(id)?;
                tracing::info!("Deleted custom exercise {}", id);
                Ok(removed)
            }
            Some(_) => {
                tracing::warn!("Refusing to delete built-in exercise {}", id);
                Ok(false)
            }
            None => {
                tracing::debug!("No exercise {} to delete", id);
                Ok(false)
            }
        }
    }
}

//! Workout store: one durable record per calendar day.
//!
//! The day's `MM/DD/YY` date string is the natural key. Every mutation that
//! targets "today" goes through [`WorkoutStore::get_or_create_today`], so
//! repeated calls on the same day always land on the same record.

use crate::clock::{Clock, SystemClock};
use crate::table::{JsonTable, Record};
use crate::types::*;
use crate::Result;
use chrono::{DateTime, Local, TimeZone};
use std::path::Path;

/// File name of the workouts table inside the data directory
pub const WORKOUTS_FILE: &str = "workouts.json";

/// Date-key format for workouts (two-digit month/day/year)
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// Canonical date key for a point in time
pub fn date_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(DATE_FORMAT).to_string()
}

impl Record for Workout {
    const TABLE: &'static str = "workouts";

    fn key(&self) -> &str {
        &self.id
    }
}

/// Durable storage for daily workouts, backed by the workouts table
pub struct WorkoutStore<C = SystemClock> {
    table: JsonTable<Workout>,
    clock: C,
}

impl WorkoutStore<SystemClock> {
    /// Open the workout store in `data_dir`
    pub fn open(data_dir: &Path) -> Self {
        Self::with_clock(JsonTable::new(data_dir.join(WORKOUTS_FILE)), SystemClock)
    }
}

impl<C: Clock> WorkoutStore<C> {
    pub fn with_clock(table: JsonTable<Workout>, clock: C) -> Self {
        Self { table, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Date key for "now"
    pub fn today_date(&self) -> String {
        date_key(&self.clock.now())
    }

    /// Fetch today's workout, creating and persisting an empty one if needed
    pub fn get_or_create_today(&self) -> Result<Workout> {
        let today = self.today_date();
        if let Some(workout) = self.table.load()?.into_iter().find(|w| w.date == today) {
            return Ok(workout);
        }

        let now = self.clock.now_millis();
        let workout = Workout {
            id: format!("workout-{}", now),
            date: today,
            timestamp: now,
            exercises: Vec::new(),
            is_active: false,
            completed_at: None,
        };
        self.table.insert(workout.clone())?;
        tracing::info!("Created workout {} for {}", workout.id, workout.date);
        Ok(workout)
    }

    /// Mark today's workout as in progress
    pub fn start_session(&self) -> Result<Workout> {
        let workout = self.get_or_create_today()?;
        let updated = self.table.update(&workout.id, |w| w.is_active = true)?;
        tracing::info!("Started workout session {}", workout.id);
        Ok(updated.unwrap_or(workout))
    }

    /// Mark today's workout as finished and stamp the completion time
    ///
    /// No prior [`start_session`](Self::start_session) is required.
    pub fn end_session(&self) -> Result<Workout> {
        let workout = self.get_or_create_today()?;
        let completed_at = self.clock.now_millis();
        let updated = self.table.update(&workout.id, |w| {
            w.is_active = false;
            w.completed_at = Some(completed_at);
        })?;
        tracing::info!("Ended workout session {}", workout.id);
        Ok(updated.unwrap_or(workout))
    }

    /// Append an exercise session to today's workout
    pub fn append_exercise_session(&self, session: ExerciseSession) -> Result<Workout> {
        let workout = self.get_or_create_today()?;
        let session_id = session.id.clone();
        let updated = self
            .table
            .update(&workout.id, move |w| w.exercises.push(session))?;
        tracing::info!("Appended session {} to workout {}", session_id, workout.id);
        Ok(updated.unwrap_or(workout))
    }

    /// Merge `update` into one session of one workout
    ///
    /// Missing workouts or sessions are silently ignored. Returns whether a
    /// session was updated.
    pub fn update_exercise_session(
        &self,
        workout_id: &str,
        session_id: &str,
        update: ExerciseSessionUpdate,
    ) -> Result<bool> {
        let Some(workout) = self.table.get(workout_id)? else {
            tracing::debug!("No workout {} to update", workout_id);
            return Ok(false);
        };
        if workout.session(session_id).is_none() {
            tracing::debug!("No session {} in workout {}", session_id, workout_id);
            return Ok(false);
        }

        self.table.update(workout_id, |w| {
            if let Some(session) = w.exercises.iter_mut().find(|s| s.id == session_id) {
                session.apply(update);
            }
        })?;
        tracing::info!("Updated session {} in workout {}", session_id, workout_id);
        Ok(true)
    }

    /// Every workout, most recent first
    pub fn list_all(&self) -> Result<Vec<Workout>> {
        let mut workouts = self.table.load()?;
        workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(workouts)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Workout>> {
        self.table.get(id)
    }

    /// Workouts whose timestamp lies in `[start, end]`, both ends inclusive
    pub fn list_by_date_range<Tz: TimeZone>(
        &self,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Result<Vec<Workout>> {
        let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
        let mut workouts: Vec<_> = self
            .table
            .load()?
            .into_iter()
            .filter(|w| (start..=end).contains(&w.timestamp))
            .collect();
        workouts.sort_by_key(|w| w.timestamp);
        Ok(workouts)
    }

    /// Permanently remove a workout and its embedded sessions
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.table.delete(id)?;
        if removed {
            tracing::info!("Deleted workout {}", id);
        }
        Ok(removed)
    }

    /// Every logged performance of one exercise, most recent workout first
    pub fn exercise_history(&self, exercise_id: &str) -> Result<Vec<ExerciseHistoryEntry>> {
        let history = self
            .list_all()?
            .into_iter()
            .flat_map(|w| {
                let date = w.date;
                w.exercises
                    .into_iter()
                    .filter(|s| s.exercise_id == exercise_id)
                    .map(move |s| ExerciseHistoryEntry {
                        date: date.clone(),
                        sets: s.sets,
                        notes: s.notes,
                    })
            })
            .collect();
        Ok(history)
    }
}

/// Local midnight at the start of `date`, for building date-range queries
pub fn start_of_day(date: chrono::NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
}

/// The last millisecond of `date` in local time
pub fn end_of_day(date: chrono::NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()
}

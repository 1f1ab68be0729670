//! In-memory state for the exercise currently being logged.
//!
//! Nothing here touches storage. Callers commit the result through
//! [`WorkoutStore::append_exercise_session`](crate::WorkoutStore::append_exercise_session),
//! usually via [`ActiveSession::to_exercise_session`]. State is lost when the
//! process exits.

use crate::types::*;
use uuid::Uuid;

/// Active logging session: `idle` until an exercise is started, `logging`
/// until it is finished or reset.
///
/// Sequencing is the caller's job: `add_set` while idle is accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveSession {
    current_exercise: Option<Exercise>,
    current_sets: Vec<WorkoutSet>,
    is_logging: bool,
}

impl ActiveSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current_exercise.as_ref()
    }

    /// In-progress sets, sorted by set number
    pub fn current_sets(&self) -> &[WorkoutSet] {
        &self.current_sets
    }

    pub fn is_logging(&self) -> bool {
        self.is_logging
    }

    /// Select an exercise and discard any sets from the previous one
    pub fn start_exercise(&mut self, exercise: Exercise) {
        tracing::debug!("Logging exercise {}", exercise.id);
        self.current_exercise = Some(exercise);
        self.current_sets.clear();
        self.is_logging = true;
    }

    /// Record a set, replacing any earlier set with the same number
    pub fn add_set(&mut self, set_number: SetNumber, reps: i32, weight: f64) {
        self.current_sets.retain(|s| s.set_number != set_number);
        self.current_sets.push(WorkoutSet {
            set_number,
            reps,
            weight,
        });
        self.current_sets.sort_by_key(|s| s.set_number);
    }

    pub fn remove_set(&mut self, set_number: SetNumber) {
        self.current_sets.retain(|s| s.set_number != set_number);
    }

    /// Leave `logging`; the exercise and its sets stay readable
    pub fn finish_exercise(&mut self) {
        self.is_logging = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the session to commit for the current exercise
    ///
    /// Returns `None` when no exercise has been selected.
    pub fn to_exercise_session(
        &self,
        notes: Option<String>,
        timestamp: i64,
    ) -> Option<ExerciseSession> {
        let exercise = self.current_exercise.as_ref()?;
        Some(ExerciseSession {
            id: Uuid::new_v4().to_string(),
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            category: exercise.category,
            sets: self.current_sets.clone(),
            notes: notes.filter(|n| !n.trim().is_empty()),
            timestamp,
        })
    }
}

/// Whether `set_number` has been logged in the current session
pub fn is_set_logged(session: &ActiveSession, set_number: SetNumber) -> bool {
    session
        .current_sets
        .iter()
        .any(|s| s.set_number == set_number)
}

/// The logged reps and weight for `set_number`, if any
pub fn set_data(session: &ActiveSession, set_number: SetNumber) -> Option<&WorkoutSet> {
    session
        .current_sets
        .iter()
        .find(|s| s.set_number == set_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(set: u8) -> SetNumber {
        SetNumber::new(set).unwrap()
    }

    fn squat() -> Exercise {
        Exercise {
            id: "default-26".into(),
            name: "Barbell Squat".into(),
            category: Category::Legs,
            is_custom: false,
        }
    }

    fn set_numbers(session: &ActiveSession) -> Vec<u8> {
        session.current_sets().iter().map(|s| s.set_number.get()).collect()
    }

    #[test]
    fn test_starts_idle() {
        let session = ActiveSession::new();
        assert!(!session.is_logging());
        assert!(session.current_exercise().is_none());
        assert!(session.current_sets().is_empty());
    }

    #[test]
    fn test_start_exercise_clears_previous_sets() {
        let mut session = ActiveSession::new();
        session.start_exercise(squat());
        session.add_set(n(1), 5, 135.0);

        session.start_exercise(squat());
        assert!(session.is_logging());
        assert!(session.current_sets().is_empty());
    }

    #[test]
    fn test_add_set_replaces_same_number_and_sorts() {
        let mut session = ActiveSession::new();
        session.start_exercise(squat());
        session.add_set(n(3), 5, 155.0);
        session.add_set(n(1), 5, 135.0);
        session.add_set(n(2), 5, 145.0);
        session.add_set(n(1), 6, 140.0);

        assert_eq!(set_numbers(&session), vec![1, 2, 3]);
        let first = set_data(&session, n(1)).unwrap();
        assert_eq!(first.reps, 6);
        assert_eq!(first.weight, 140.0);
    }

    #[test]
    fn test_add_set_while_idle_is_accepted() {
        let mut session = ActiveSession::new();
        session.add_set(n(2), 10, 0.0);
        assert!(!session.is_logging());
        assert!(is_set_logged(&session, n(2)));
    }

    #[test]
    fn test_remove_set() {
        let mut session = ActiveSession::new();
        session.start_exercise(squat());
        session.add_set(n(1), 5, 135.0);
        session.add_set(n(2), 5, 135.0);

        session.remove_set(n(1));
        session.remove_set(n(5));
        assert_eq!(set_numbers(&session), vec![2]);
        assert!(!is_set_logged(&session, n(1)));
        assert!(set_data(&session, n(1)).is_none());
    }

    #[test]
    fn test_finish_keeps_exercise_and_sets() {
        let mut session = ActiveSession::new();
        session.start_exercise(squat());
        session.add_set(n(1), 5, 135.0);
        session.finish_exercise();

        assert!(!session.is_logging());
        assert_eq!(session.current_exercise(), Some(&squat()));
        assert_eq!(session.current_sets().len(), 1);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut session = ActiveSession::new();
        session.start_exercise(squat());
        session.add_set(n(4), 8, 95.0);
        session.reset();
        assert_eq!(session, ActiveSession::new());
    }

    #[test]
    fn test_to_exercise_session() {
        let mut session = ActiveSession::new();
        assert!(session.to_exercise_session(None, 0).is_none());

        session.start_exercise(squat());
        session.add_set(n(2), 5, 145.0);
        session.add_set(n(1), 5, 135.0);

        let committed = session
            .to_exercise_session(Some("  ".into()), 1_700_000_000_000)
            .unwrap();
        assert_eq!(committed.exercise_id, "default-26");
        assert_eq!(committed.exercise_name, "Barbell Squat");
        assert_eq!(committed.category, Category::Legs);
        assert_eq!(committed.sets.len(), 2);
        assert_eq!(committed.sets[0].set_number, n(1));
        assert!(committed.notes.is_none());
        assert!(Uuid::parse_str(&committed.id).is_ok());
    }
}

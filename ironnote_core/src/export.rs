//! CSV export of committed workouts.
//!
//! One row per (exercise session, set) pair under a fixed header. Fields
//! containing a comma, quote or line break are quoted with inner quotes
//! doubled.

use crate::types::{ExerciseSession, Workout, WorkoutSet};
use crate::Result;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column headers, in output order
pub const HEADERS: [&str; 7] = [
    "Date",
    "Exercise",
    "Category",
    "Set",
    "Reps",
    "Weight (lbs)",
    "Notes",
];

/// Prefix shared by every exported file name
pub const FILE_PREFIX: &str = "iron-note";

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    exercise: &'a str,
    category: &'static str,
    set: u8,
    reps: i32,
    weight: String,
    notes: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(workout: &'a Workout, session: &'a ExerciseSession, set: &WorkoutSet) -> Self {
        CsvRow {
            date: &workout.date,
            exercise: &session.exercise_name,
            category: session.category.as_str(),
            set: set.set_number.get(),
            reps: set.reps,
            // Display drops the trailing ".0" on whole numbers
            weight: set.weight.to_string(),
            notes: session.notes.as_deref().unwrap_or(""),
        }
    }
}

/// Write the header and every row of `workouts`, in order, to `writer`
pub fn write_workouts_csv<W: Write>(writer: W, workouts: &[Workout]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADERS)?;

    let mut rows = 0;
    for workout in workouts {
        for session in &workout.exercises {
            for set in &session.sets {
                csv.serialize(CsvRow::new(workout, session, set))?;
                rows += 1;
            }
        }
    }

    csv.flush()?;
    tracing::debug!("Wrote {} CSV rows for {} workouts", rows, workouts.len());
    Ok(())
}

pub fn write_workout_csv<W: Write>(writer: W, workout: &Workout) -> Result<()> {
    write_workouts_csv(writer, std::slice::from_ref(workout))
}

pub fn workouts_csv_string(workouts: &[Workout]) -> Result<String> {
    let mut buf = Vec::new();
    write_workouts_csv(&mut buf, workouts)?;
    String::from_utf8(buf).map_err(|e| crate::Error::Other(format!("CSV is not UTF-8: {}", e)))
}

pub fn workout_csv_string(workout: &Workout) -> Result<String> {
    workouts_csv_string(std::slice::from_ref(workout))
}

/// File name for a single-workout export, e.g. `iron-note-01-02-24.csv`
pub fn workout_file_name(workout: &Workout) -> String {
    let date = workout.date.replace(&['/', '\\', ':'][..], "-");
    format!("{}-{}.csv", FILE_PREFIX, date)
}

/// File name for a full-history export, stamped with `now` in milliseconds
pub fn all_workouts_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{}-all-workouts-{}.csv", FILE_PREFIX, now.timestamp_millis())
}

/// Export one workout into `dir`, returning the written path
pub fn export_workout(dir: &Path, workout: &Workout) -> Result<PathBuf> {
    let path = dir.join(workout_file_name(workout));
    write_file(&path, std::slice::from_ref(workout))?;
    tracing::info!("Exported workout {} to {:?}", workout.id, path);
    Ok(path)
}

/// Export a list of workouts into `dir`, returning the written path
pub fn export_all_workouts<Tz: TimeZone>(
    dir: &Path,
    workouts: &[Workout],
    now: &DateTime<Tz>,
) -> Result<PathBuf> {
    let path = dir.join(all_workouts_file_name(now));
    write_file(&path, workouts)?;
    tracing::info!("Exported {} workouts to {:?}", workouts.len(), path);
    Ok(path)
}

fn write_file(path: &Path, workouts: &[Workout]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_workouts_csv(&file, workouts)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, SetNumber};
    use chrono::Utc;

    fn set(n: u8, reps: i32, weight: f64) -> WorkoutSet {
        WorkoutSet {
            set_number: SetNumber::new(n).unwrap(),
            reps,
            weight,
        }
    }

    fn session(name: &str, category: Category, sets: Vec<WorkoutSet>) -> ExerciseSession {
        ExerciseSession {
            id: format!("session-{}", name),
            exercise_id: "default-26".into(),
            exercise_name: name.into(),
            category,
            sets,
            notes: None,
            timestamp: 0,
        }
    }

    fn workout(date: &str, exercises: Vec<ExerciseSession>) -> Workout {
        Workout {
            id: "workout-1".into(),
            date: date.into(),
            timestamp: 1,
            exercises,
            is_active: false,
            completed_at: None,
        }
    }

    #[test]
    fn test_single_workout_export() {
        let w = workout(
            "01/02/24",
            vec![session("Barbell Squat", Category::Legs, vec![set(1, 5, 135.0)])],
        );

        let csv = workout_csv_string(&w).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Date,Exercise,Category,Set,Reps,Weight (lbs),Notes",
                "01/02/24,Barbell Squat,LEGS,1,5,135,",
            ]
        );
    }

    #[test]
    fn test_fractional_weight_and_notes() {
        let mut s = session("Plank", Category::Core, vec![set(2, 1, 22.5)]);
        s.notes = Some("held 60s".into());
        let csv = workout_csv_string(&workout("03/04/24", vec![s])).unwrap();
        assert!(csv.contains("03/04/24,Plank,CORE,2,1,22.5,held 60s\n"));
    }

    #[test]
    fn test_comma_in_name_is_quoted() {
        let w = workout(
            "01/02/24",
            vec![session("Row, Cable", Category::Back, vec![set(1, 10, 90.0)])],
        );
        let csv = workout_csv_string(&w).unwrap();
        assert!(csv.contains("01/02/24,\"Row, Cable\",BACK,1,10,90,"));
    }

    #[test]
    fn test_quotes_are_doubled() {
        let mut s = session("The \"Big\" Lift", Category::Legs, vec![set(1, 1, 405.0)]);
        s.notes = Some("line one\nline two".into());
        let csv = workout_csv_string(&workout("01/02/24", vec![s])).unwrap();
        assert!(csv.contains("\"The \"\"Big\"\" Lift\""));
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_empty_workout_has_header_only() {
        let csv = workout_csv_string(&workout("01/02/24", vec![])).unwrap();
        assert_eq!(csv, "Date,Exercise,Category,Set,Reps,Weight (lbs),Notes\n");
    }

    #[test]
    fn test_multiple_workouts_share_one_header() {
        let a = workout(
            "01/02/24",
            vec![session(
                "Barbell Squat",
                Category::Legs,
                vec![set(1, 5, 135.0), set(2, 5, 145.0)],
            )],
        );
        let b = workout(
            "01/03/24",
            vec![session("Deadlift", Category::Back, vec![set(1, 3, 225.0)])],
        );

        let csv = workouts_csv_string(&[a, b]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Date,")).count(), 1);
        assert_eq!(lines[3], "01/03/24,Deadlift,BACK,1,3,225,");
    }

    #[test]
    fn test_file_names() {
        let w = workout("01/02/24", vec![]);
        assert_eq!(workout_file_name(&w), "iron-note-01-02-24.csv");

        let now = Utc.timestamp_millis_opt(1_704_186_000_000).unwrap();
        assert_eq!(
            all_workouts_file_name(&now),
            "iron-note-all-workouts-1704186000000.csv"
        );
    }

    #[test]
    fn test_export_writes_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let w = workout(
            "01/02/24",
            vec![session("Barbell Squat", Category::Legs, vec![set(1, 5, 135.0)])],
        );

        let path = export_workout(temp_dir.path(), &w).unwrap();
        assert_eq!(path, temp_dir.path().join("iron-note-01-02-24.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADERS.to_vec());
        assert_eq!(reader.records().count(), 1);

        let all_path =
            export_all_workouts(&temp_dir.path().join("exports"), &[w], &Utc::now()).unwrap();
        assert!(all_path.exists());
    }
}

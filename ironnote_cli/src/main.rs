use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use ironnote_core::export;
use ironnote_core::workouts::{end_of_day, start_of_day};
use ironnote_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ironnote")]
#[command(about = "Local-first workout log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout (default)
    Today,

    /// List the exercise catalog
    Exercises {
        /// Only show one category (chest, back, shoulders, legs, core)
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a custom exercise
    AddExercise {
        name: String,

        #[arg(long)]
        category: String,
    },

    /// Delete a custom exercise (built-in exercises are kept)
    DeleteExercise { id: String },

    /// Mark today's workout as in progress
    Start,

    /// Mark today's workout as finished
    End,

    /// Log sets for one exercise into today's workout
    Log {
        exercise_id: String,

        /// Set as NUMBER:REPS:WEIGHT, e.g. 1:5:135 (repeatable)
        #[arg(long = "set", value_name = "N:REPS:WEIGHT", required = true)]
        sets: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change the sets or notes of a logged exercise session
    UpdateSession {
        workout_id: String,
        session_id: String,

        /// Replacement sets as NUMBER:REPS:WEIGHT (repeatable)
        #[arg(long = "set", value_name = "N:REPS:WEIGHT")]
        sets: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List workouts, newest first
    History {
        /// First day to include (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },

    /// Show one workout
    Show { id: String },

    /// Delete one workout
    Delete { id: String },

    /// Show every logged performance of one exercise
    ExerciseHistory { exercise_id: String },

    /// Export workouts to CSV
    Export {
        /// Export a single workout instead of all of them
        #[arg(long)]
        workout: Option<String>,

        /// Output directory (defaults to the configured export directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    // Initialize logging
    ironnote_core::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let catalog = ExerciseCatalog::open(&data_dir);
    catalog.initialize()?;
    let store = WorkoutStore::open(&data_dir);

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => cmd_today(&store),
        Commands::Exercises { category } => cmd_exercises(&catalog, category),
        Commands::AddExercise { name, category } => {
            let exercise = catalog.add_custom(&name, category.parse()?)?;
            println!("✓ Added {} [{}] ({})", exercise.name, exercise.category, exercise.id);
            Ok(())
        }
        Commands::DeleteExercise { id } => {
            if catalog.delete_custom(&id)? {
                println!("✓ Deleted exercise {}", id);
            } else {
                println!("Nothing deleted: {} is not a custom exercise.", id);
            }
            Ok(())
        }
        Commands::Start => {
            let workout = store.start_session()?;
            println!("✓ Workout started for {}", workout.date);
            Ok(())
        }
        Commands::End => {
            let workout = store.end_session()?;
            println!("✓ Workout finished for {}", workout.date);
            Ok(())
        }
        Commands::Log {
            exercise_id,
            sets,
            notes,
        } => cmd_log(&catalog, &store, &exercise_id, &sets, notes),
        Commands::UpdateSession {
            workout_id,
            session_id,
            sets,
            notes,
        } => cmd_update_session(&store, &workout_id, &session_id, &sets, notes),
        Commands::History { from, to } => cmd_history(&store, from, to),
        Commands::Show { id } => {
            let workout = store.get_by_id(&id)?.ok_or_else(|| unknown_workout(&id))?;
            display_workout(&workout);
            Ok(())
        }
        Commands::Delete { id } => {
            if store.delete(&id)? {
                println!("✓ Deleted workout {}", id);
            } else {
                println!("No workout with id {}", id);
            }
            Ok(())
        }
        Commands::ExerciseHistory { exercise_id } => cmd_exercise_history(&store, &exercise_id),
        Commands::Export { workout, out } => {
            let out = out.unwrap_or_else(|| config.export.export_dir.clone());
            cmd_export(&store, workout, out)
        }
    }
}

fn cmd_today(store: &WorkoutStore) -> Result<()> {
    let workout = store.get_or_create_today()?;
    display_workout(&workout);
    Ok(())
}

fn cmd_exercises(catalog: &ExerciseCatalog, category: Option<String>) -> Result<()> {
    let exercises = match category {
        Some(c) => catalog.list_by_category(c.parse()?)?,
        None => catalog.list_all()?,
    };

    for exercise in &exercises {
        let marker = if exercise.is_custom { " *" } else { "" };
        println!(
            "{:<12} {:<10} {}{}",
            exercise.id, exercise.category, exercise.name, marker
        );
    }
    Ok(())
}

fn cmd_log(
    catalog: &ExerciseCatalog,
    store: &WorkoutStore,
    exercise_id: &str,
    sets: &[String],
    notes: Option<String>,
) -> Result<()> {
    let exercise = catalog
        .get(exercise_id)?
        .ok_or_else(|| Error::Other(format!("Unknown exercise: {}", exercise_id)))?;

    let mut active = ActiveSession::new();
    active.start_exercise(exercise);
    for raw in sets {
        let set = parse_set(raw)?;
        active.add_set(set.set_number, set.reps, set.weight);
    }

    let Some(session) = active.to_exercise_session(notes, store.clock().now_millis()) else {
        return Ok(());
    };
    let workout = store.append_exercise_session(session.clone())?;
    active.finish_exercise();

    println!(
        "✓ Logged {} set(s) of {} to {}",
        session.sets.len(),
        session.exercise_name,
        workout.date
    );
    println!("  Session: {}", session.id);
    Ok(())
}

fn cmd_update_session(
    store: &WorkoutStore,
    workout_id: &str,
    session_id: &str,
    sets: &[String],
    notes: Option<String>,
) -> Result<()> {
    let mut update = ExerciseSessionUpdate {
        notes,
        ..Default::default()
    };
    if !sets.is_empty() {
        // Same replace-and-sort rules as logging a fresh session
        let mut active = ActiveSession::new();
        for raw in sets {
            let set = parse_set(raw)?;
            active.add_set(set.set_number, set.reps, set.weight);
        }
        update.sets = Some(active.current_sets().to_vec());
    }

    if update.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }

    if store.update_exercise_session(workout_id, session_id, update)? {
        println!("✓ Updated session {}", session_id);
    } else {
        println!("No session {} in workout {}", session_id, workout_id);
    }
    Ok(())
}

fn cmd_history(
    store: &WorkoutStore,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let workouts = match (from, to) {
        (Some(from), Some(to)) => {
            let (Some(start), Some(end)) = (start_of_day(from), end_of_day(to)) else {
                return Err(Error::Other(format!("Invalid date range {} - {}", from, to)));
            };
            let mut workouts = store.list_by_date_range(&start, &end)?;
            workouts.reverse();
            workouts
        }
        _ => store.list_all()?,
    };

    if workouts.is_empty() {
        println!("No workouts logged.");
        return Ok(());
    }

    for workout in &workouts {
        let status = if workout.is_active { " (in progress)" } else { "" };
        println!(
            "{}  {:<22} {} exercise(s), {} set(s){}",
            workout.date,
            workout.id,
            workout.exercises.len(),
            workout.set_count(),
            status
        );
    }
    Ok(())
}

fn cmd_exercise_history(store: &WorkoutStore, exercise_id: &str) -> Result<()> {
    let history = store.exercise_history(exercise_id)?;
    if history.is_empty() {
        println!("No history for {}", exercise_id);
        return Ok(());
    }

    for entry in &history {
        let sets: Vec<_> = entry
            .sets
            .iter()
            .map(|s| format!("{}x{}@{}", s.set_number, s.reps, s.weight))
            .collect();
        print!("{}  {}", entry.date, sets.join("  "));
        match &entry.notes {
            Some(notes) => println!("  ({})", notes),
            None => println!(),
        }
    }
    Ok(())
}

fn cmd_export(store: &WorkoutStore, workout_id: Option<String>, out: PathBuf) -> Result<()> {
    let path = match workout_id {
        Some(id) => {
            let workout = store.get_by_id(&id)?.ok_or_else(|| unknown_workout(&id))?;
            export::export_workout(&out, &workout)?
        }
        None => export::export_all_workouts(&out, &store.list_all()?, &Local::now())?,
    };

    println!("✓ Exported to {}", path.display());
    Ok(())
}

fn unknown_workout(id: &str) -> Error {
    Error::Other(format!("No workout with id {}", id))
}

/// Parse `N:REPS:WEIGHT` into a set
///
/// Reps and weight may be zero or negative, but the weight has to be finite.
fn parse_set(raw: &str) -> Result<WorkoutSet> {
    let invalid = || Error::Other(format!("Invalid set '{}': expected N:REPS:WEIGHT", raw));

    let mut parts = raw.split(':');
    let (Some(n), Some(reps), Some(weight), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let n: u8 = n.trim().parse().map_err(|_| invalid())?;
    let weight: f64 = weight.trim().parse().map_err(|_| invalid())?;
    if !weight.is_finite() {
        return Err(Error::InvalidWeight(weight));
    }

    Ok(WorkoutSet {
        set_number: SetNumber::new(n)?,
        reps: reps.trim().parse().map_err(|_| invalid())?,
        weight,
    })
}

fn display_workout(workout: &Workout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT {}", workout.date);
    println!("╰─────────────────────────────────────────╯");
    println!("  Id: {}", workout.id);
    if workout.is_active {
        println!("  Status: in progress");
    } else if workout.completed_at.is_some() {
        println!("  Status: finished");
    }
    println!();

    if workout.exercises.is_empty() {
        println!("  No exercises logged yet.");
    }

    for session in &workout.exercises {
        println!("  {} [{}]", session.exercise_name, session.category);
        println!("    Session: {}", session.id);
        for set in &session.sets {
            println!(
                "    → Set {}: {} reps @ {} lbs",
                set.set_number, set.reps, set.weight
            );
        }
        if let Some(ref notes) = session.notes {
            println!("    ℹ {}", notes);
        }
    }

    println!();
}

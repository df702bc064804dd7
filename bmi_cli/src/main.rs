use bmi_core::*;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bmifit")]
#[command(about = "BMI calculator with category-based workout plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI and record it in history
    Calc(MeasurementArgs),

    /// Compute BMI and create a workout plan for its category
    Plan(MeasurementArgs),

    /// Walk through (or resume) a workout session
    Workout {
        /// Workout session id
        id: String,

        /// Auto-complete (for testing) - run every step without prompts
        #[arg(long)]
        auto: bool,

        /// Override the timer tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// List recorded BMI results and workouts
    History,

    /// Show the summary of a workout session
    Summary {
        /// Workout session id
        id: String,
    },

    /// Export history to CSV files
    Export {
        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
struct MeasurementArgs {
    /// Your name
    #[arg(long)]
    name: String,

    /// male, female or other
    #[arg(long, default_value = "other")]
    gender: String,

    /// metric or imperial (defaults to the configured system)
    #[arg(long)]
    system: Option<String>,

    /// Height value
    #[arg(long, allow_hyphen_values = true)]
    height: String,

    /// cm, m or in (defaults to the configured unit, or inches for imperial)
    #[arg(long)]
    height_unit: Option<String>,

    /// Weight value, kilograms (metric) or pounds (imperial)
    #[arg(long, allow_hyphen_values = true)]
    weight: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bmi_core::logging::init(cli.verbose);

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Calc(args) => cmd_calc(&data_dir, &args, &config).map(|_| ()),
        Commands::Plan(args) => cmd_plan(&data_dir, &args, &config),
        Commands::Workout { id, auto, tick_ms } => cmd_workout(
            &data_dir,
            &id,
            auto,
            tick_ms.unwrap_or(config.workout.tick_interval_ms),
        ),
        Commands::History => cmd_history(&data_dir),
        Commands::Summary { id } => cmd_summary(&data_dir, &id),
        Commands::Export { out } => cmd_export(&data_dir, &out),
    }
}

fn compute_from_args(args: &MeasurementArgs, config: &Config) -> Result<BmiRecord> {
    let system: UnitSystem = match &args.system {
        Some(s) => s.parse()?,
        None => config.units.system()?,
    };

    let height_unit: HeightUnit = match &args.height_unit {
        Some(u) => u.parse()?,
        None => {
            let configured = config.units.height_unit()?;
            match (system, configured) {
                (UnitSystem::Imperial, HeightUnit::Inches) => configured,
                (UnitSystem::Imperial, _) => system.default_height_unit(),
                (UnitSystem::Metric, HeightUnit::Inches) => system.default_height_unit(),
                (UnitSystem::Metric, _) => configured,
            }
        }
    };

    let gender: Gender = args.gender.parse()?;
    let measurements = normalize(
        &args.height,
        height_unit,
        &args.weight,
        system.weight_unit(),
        system,
    )?;

    bmi::compute(measurements, &args.name, gender)
}

fn cmd_calc(data_dir: &Path, args: &MeasurementArgs, config: &Config) -> Result<BmiRecord> {
    let record = compute_from_args(args, config)?;

    let mut store = JsonFileStore::new(data_dir);
    store.append_bmi(&record)?;

    display_result(&record);
    Ok(record)
}

fn cmd_plan(data_dir: &Path, args: &MeasurementArgs, config: &Config) -> Result<()> {
    let record = cmd_calc(data_dir, args, config)?;

    let mut workout = Workout::plan(JsonFileStore::new(data_dir), record);
    workout.start()?;

    println!("Your {} workout plan:", workout.session().bmi_snapshot.category().label());
    for (i, exercise) in workout.session().exercises.iter().enumerate() {
        println!(
            "  {}. {:<24} {}",
            i + 1,
            exercise.name,
            summary::describe_target(&exercise.kind)
        );
    }
    println!();
    println!("Workout id: {}", workout.id());
    println!("Start it with: bmifit workout {}", workout.id());

    Ok(())
}

fn cmd_workout(data_dir: &Path, id: &str, auto: bool, tick_ms: u64) -> Result<()> {
    let mut workout = Workout::resume(JsonFileStore::new(data_dir), id)?;
    let mut ticker = IntervalTicker::from_millis(tick_ms);

    while let Some(exercise) = workout.current_exercise().cloned() {
        let (number, total) = workout.position().unwrap_or((1, 1));
        display_exercise(&exercise, number, total, workout.progress_percent());

        if let Some(duration) = exercise.kind.duration_seconds() {
            println!("  Duration: {}", format_clock(duration));
            if !auto && !prompt("Press Enter to start the timer")? {
                return pause(&workout);
            }

            if !workout.start_timer() {
                tracing::warn!(
                    "Timer for {} did not start (state {:?})",
                    exercise.name,
                    workout.state()
                );
            }
            run_timer(&mut workout, &mut ticker, |remaining| {
                if !auto {
                    print!("\r  ⏱ {}  ", format_clock(remaining));
                    let _ = io::stdout().flush();
                }
            });
            if !auto {
                println!();
            }
            println!("  Time's up!");
        }

        let label = if number == total {
            "Press Enter to complete the workout"
        } else {
            "Press Enter for the next exercise"
        };
        if !auto && !prompt(label)? {
            return pause(&workout);
        }

        workout.complete_exercise()?;
        println!("  ✓ {} done", exercise.name);
    }

    println!();
    print!("{}", WorkoutSummary::from_session(workout.session()));
    Ok(())
}

fn cmd_history(data_dir: &Path) -> Result<()> {
    let store = JsonFileStore::new(data_dir);
    let records = store.list_bmi()?;
    let sessions = store.list_sessions()?;

    if records.is_empty() && sessions.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    println!("BMI history:");
    for record in &records {
        println!(
            "  {}  {:<16} {:>6.2}  {}",
            record.computed_at().format("%Y-%m-%d %H:%M"),
            record.subject_name(),
            record.value(),
            record.category().label()
        );
    }

    println!();
    println!("Workouts:");
    for session in &sessions {
        let status = if session.completed { "completed" } else { "in progress" };
        println!(
            "  {}  {}  {:<11} {}/{}  {}",
            session.id,
            session.created_at.format("%Y-%m-%d"),
            session.bmi_snapshot.category(),
            session.completed_count(),
            session.exercises.len(),
            status
        );
    }

    Ok(())
}

fn cmd_summary(data_dir: &Path, id: &str) -> Result<()> {
    let store = JsonFileStore::new(data_dir);
    let session = store.find_session(id)?;
    print!("{}", WorkoutSummary::from_session(&session));
    Ok(())
}

fn cmd_export(data_dir: &Path, out: &Path) -> Result<()> {
    let store = JsonFileStore::new(data_dir);

    let bmi_path = out.join("bmi_history.csv");
    let sessions_path = out.join("sessions.csv");
    let bmi_rows = export::export_bmi_history(&store, &bmi_path)?;
    let session_rows = export::export_sessions(&store, &sessions_path)?;

    println!("✓ Exported {} BMI records to {}", bmi_rows, bmi_path.display());
    println!(
        "✓ Exported {} workouts to {}",
        session_rows,
        sessions_path.display()
    );
    Ok(())
}

fn display_result(record: &BmiRecord) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Your BMI: {:.2}", record.value());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Category: {}", record.category().label());
    println!("  {}", record.message());
    println!(
        "  Scale:    {}",
        gauge(bmi::scale_position(record.value()))
    );
    println!();
}

fn gauge(percent: f64) -> String {
    const WIDTH: usize = 30;
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] 10 → 40",
        "█".repeat(filled.min(WIDTH)),
        "░".repeat(WIDTH - filled.min(WIDTH))
    )
}

fn display_exercise(exercise: &Exercise, number: usize, total: usize, progress: f64) {
    println!("\n─────────────────────────────────────────");
    println!("  Exercise {} of {} ({:.0}% done)", number, total, progress);
    println!("  {}", exercise.name);
    println!("  {}", exercise.description);
    if let ExerciseKind::Reps { sets, reps } = exercise.kind {
        println!("  Complete {} sets of {} repetitions", sets, reps);
    }
    println!("  ℹ {}", exercise.media_ref);
}

/// Wait for Enter; false if stdin is closed
fn prompt(message: &str) -> Result<bool> {
    println!("{}", message);
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    Ok(read > 0)
}

fn pause<S: HistoryStore>(workout: &Workout<S>) -> Result<()> {
    println!();
    println!(
        "Workout paused. Resume with: bmifit workout {}",
        workout.id()
    );
    Ok(())
}

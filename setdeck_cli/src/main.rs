use clap::{Parser, Subcommand};
use setdeck_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "setdeck")]
#[command(about = "Swipe-driven workout set tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current card (default)
    Show,

    /// Swipe left: defer the current card
    Skip,

    /// Swipe right and log a set for the current card
    Log {
        /// Weight lifted (blank to leave out)
        #[arg(long)]
        weight: Option<String>,

        /// Repetitions performed
        #[arg(long)]
        reps: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Drag the current card and let the gesture decide what happens
    Drag {
        /// Horizontal travel in pixels (negative drags left)
        #[arg(long, allow_negative_numbers = true)]
        dx: f64,

        /// Vertical travel in pixels
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        dy: f64,

        /// How long the drag takes
        #[arg(long, default_value_t = 250)]
        duration_ms: u64,

        /// Weight to log if the drag opens the log
        #[arg(long)]
        weight: Option<String>,

        /// Reps to log if the drag opens the log
        #[arg(long)]
        reps: Option<String>,

        /// Notes to log if the drag opens the log
        #[arg(long)]
        notes: Option<String>,

        /// Cancel the log instead of saving it
        #[arg(long, conflicts_with_all = ["weight", "reps", "notes"])]
        cancel: bool,
    },

    /// Work through the deck interactively
    Review,

    /// List all exercises
    List,

    /// Add an exercise to the catalog and the back of the deck
    Add {
        /// Display name
        name: String,

        /// Target muscle label
        #[arg(long)]
        muscle: Option<String>,
    },

    /// Remove an exercise and its history
    Remove {
        /// Exercise id (see `list`)
        id: String,
    },

    /// Show every set logged for an exercise
    History {
        /// Exercise id (see `list`)
        id: String,
    },

    /// Export all logged sets to CSV
    Export {
        /// Output file (defaults to history.csv in the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Keep stdout for command output
    setdeck_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let mut tracker = Tracker::open(JsonFileStore::new(&data_dir), &config);
    let unit = config.display.weight_unit.as_str();

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            display_card(&tracker, unit);
            Ok(())
        }
        Commands::Skip => cmd_skip(&mut tracker, unit),
        Commands::Log {
            weight,
            reps,
            notes,
        } => {
            let form = SetForm::new(
                weight.unwrap_or_default(),
                reps.unwrap_or_default(),
                notes.unwrap_or_default(),
            );
            cmd_log(&mut tracker, form, unit)
        }
        Commands::Drag {
            dx,
            dy,
            duration_ms,
            weight,
            reps,
            notes,
            cancel,
        } => {
            let form = (!cancel).then(|| {
                SetForm::new(
                    weight.unwrap_or_default(),
                    reps.unwrap_or_default(),
                    notes.unwrap_or_default(),
                )
            });
            cmd_drag(&mut tracker, dx, dy, duration_ms, form, unit)
        }
        Commands::Review => cmd_review(&mut tracker, unit),
        Commands::List => {
            cmd_list(&tracker);
            Ok(())
        }
        Commands::Add { name, muscle } => cmd_add(&mut tracker, &name, muscle.as_deref()),
        Commands::Remove { id } => cmd_remove(&mut tracker, &id),
        Commands::History { id } => cmd_history(&tracker, &id, unit),
        Commands::Export { out } => {
            let csv_path = out.unwrap_or_else(|| data_dir.join("history.csv"));
            let count = export_history_csv(tracker.catalog(), &csv_path)?;
            println!("✓ Exported {} sets", count);
            println!("  CSV: {}", csv_path.display());
            Ok(())
        }
    }
}

fn cmd_skip(tracker: &mut Tracker<JsonFileStore>, unit: &str) -> Result<()> {
    match tracker.skip()? {
        Some(id) => {
            println!("⏭ Skipped {}", id);
            display_card(tracker, unit);
        }
        None => display_empty(),
    }
    Ok(())
}

fn cmd_log(tracker: &mut Tracker<JsonFileStore>, form: SetForm, unit: &str) -> Result<()> {
    if tracker.begin_completion()?.is_none() {
        display_empty();
        return Ok(());
    }
    save_form(tracker, form, unit)
}

/// Fill the open modal and save it, cancelling if the input is rejected
fn save_form(tracker: &mut Tracker<JsonFileStore>, form: SetForm, unit: &str) -> Result<()> {
    if let Some(fields) = tracker.form_mut() {
        *fields = form;
    }

    let pending = tracker.modal().pending_id().unwrap_or_default().to_string();

    match tracker.save_set() {
        Ok(entry) => {
            println!("✓ Logged {}: {}", pending, entry.summary(unit));
            display_card(tracker, unit);
            Ok(())
        }
        Err(e) => {
            tracker.cancel_set()?;
            Err(e)
        }
    }
}

fn cmd_drag(
    tracker: &mut Tracker<JsonFileStore>,
    dx: f64,
    dy: f64,
    duration_ms: u64,
    form: Option<SetForm>,
    unit: &str,
) -> Result<()> {
    let trace = [
        PointerEvent::Down(PointerSample::new(0.0, 0.0, 0)),
        PointerEvent::Move(PointerSample::new(dx / 2.0, dy / 2.0, duration_ms / 2)),
        PointerEvent::Up(PointerSample::new(dx, dy, duration_ms)),
    ];

    let mut effect = None;
    for event in trace {
        if let Some(e) = tracker.handle_pointer(event)? {
            effect = Some(e);
        }
    }

    match effect.unwrap_or(SwipeEffect::Ignored) {
        SwipeEffect::Skipped(id) => {
            println!("⏭ Skipped {}", id);
            display_card(tracker, unit);
            Ok(())
        }
        SwipeEffect::OpenedLog(id) => match form {
            Some(form) => save_form(tracker, form, unit),
            None => {
                tracker.cancel_set()?;
                println!("Cancelled logging {} - deck unchanged", id);
                Ok(())
            }
        },
        SwipeEffect::Ignored => {
            if tracker.current().is_none() {
                display_empty();
            } else {
                println!("Drag released without swiping - card stays");
            }
            Ok(())
        }
    }
}

fn cmd_review(tracker: &mut Tracker<JsonFileStore>, unit: &str) -> Result<()> {
    loop {
        if tracker.current().is_none() {
            display_empty();
            return Ok(());
        }
        display_card(tracker, unit);

        println!("─────────────────────────────────────────");
        println!("Press Enter (or 'l' + Enter) to log a set");
        println!("  's' + Enter to skip");
        println!("  'q' + Enter to quit");
        let Some(input) = prompt("> ")? else {
            return Ok(());
        };

        match input.to_lowercase().as_str() {
            "q" => return Ok(()),
            "s" => {
                if let Some(id) = tracker.skip()? {
                    println!("\n⏭ Skipped {}\n", id);
                }
            }
            "" | "l" => {
                tracker.begin_completion()?;
                if !review_log(tracker, unit)? {
                    return Ok(());
                }
            }
            other => println!("\nUnknown choice {:?}\n", other),
        }
    }
}

/// Prompt for the modal fields until saved or cancelled
///
/// Returns false if input ended.
fn review_log(tracker: &mut Tracker<JsonFileStore>, unit: &str) -> Result<bool> {
    println!("\nLog a set (leave blank to omit, 'c' to cancel)");
    loop {
        let mut fields = Vec::with_capacity(3);
        for label in [format!("Weight ({})", unit), "Reps".into(), "Notes".into()] {
            match prompt(&format!("  {}: ", label))? {
                None => {
                    tracker.cancel_set()?;
                    return Ok(false);
                }
                Some(value) if value.eq_ignore_ascii_case("c") => {
                    tracker.cancel_set()?;
                    println!("\nCancelled - deck unchanged\n");
                    return Ok(true);
                }
                Some(value) => fields.push(value),
            }
        }

        if let Some(form) = tracker.form_mut() {
            form.weight = fields[0].clone();
            form.reps = fields[1].clone();
            form.notes = fields[2].clone();
        }

        match tracker.save_set() {
            Ok(entry) => {
                println!("\n✓ Logged {}\n", entry.summary(unit));
                return Ok(true);
            }
            Err(Error::InvalidInput(msg)) => {
                println!("  ✗ {}", msg);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Read one trimmed line, `None` at end of input
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn cmd_list(tracker: &Tracker<JsonFileStore>) {
    if tracker.catalog().is_empty() {
        println!("No exercises yet. Add one with `setdeck add <name>`.");
        return;
    }

    for exercise in tracker.catalog().iter() {
        let marker = if tracker.deck().current() == Some(exercise.id.as_str()) {
            "▶"
        } else {
            " "
        };
        let position = tracker
            .deck()
            .position(&exercise.id)
            .map(|p| format!("#{}", p + 1))
            .unwrap_or_else(|| "-".into());
        let muscle = exercise
            .muscle
            .as_ref()
            .map(|m| format!(" ({})", m))
            .unwrap_or_default();

        println!(
            "{} {:<4} {:<20} {}{}  [{} sets]",
            marker,
            position,
            exercise.id,
            exercise.name,
            muscle,
            exercise.history.len()
        );
    }
}

fn cmd_add(tracker: &mut Tracker<JsonFileStore>, name: &str, muscle: Option<&str>) -> Result<()> {
    match tracker.add_exercise(name, muscle)? {
        Some(id) => println!("✓ Added {} ({})", name.trim(), id),
        None => println!("Nothing added: name is empty or already in use"),
    }
    Ok(())
}

fn cmd_remove(tracker: &mut Tracker<JsonFileStore>, id: &str) -> Result<()> {
    match tracker.remove_exercise(id)? {
        Some(exercise) => println!(
            "✓ Removed {} ({} sets discarded)",
            exercise.name,
            exercise.history.len()
        ),
        None => println!("No exercise with id {}", id),
    }
    Ok(())
}

fn cmd_history(tracker: &Tracker<JsonFileStore>, id: &str, unit: &str) -> Result<()> {
    let exercise = tracker
        .catalog()
        .get(id)
        .ok_or_else(|| Error::Other(format!("Unknown exercise: {}", id)))?;

    println!("{}", exercise.name);
    if exercise.history.is_empty() {
        println!("  No sets logged yet");
    }
    for entry in &exercise.history {
        println!("  {}  {}", format_date(entry), entry.summary(unit));
    }
    Ok(())
}

fn display_card(tracker: &Tracker<JsonFileStore>, unit: &str) {
    let Some(exercise) = tracker.current() else {
        display_empty();
        return;
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CARD 1 of {}", tracker.deck().len());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", exercise.name);
    if let Some(ref muscle) = exercise.muscle {
        println!("  Muscle: {}", muscle);
    }
    match exercise.last_entry() {
        Some(entry) => println!("  Last: {}  ({})", entry.summary(unit), format_date(entry)),
        None => println!("  No sets logged yet"),
    }
    println!();
}

fn display_empty() {
    println!("No exercises in the deck. Add one with `setdeck add <name>`.");
}

fn format_date(entry: &SetEntry) -> String {
    entry
        .date
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

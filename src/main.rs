use anyhow::{bail, Context as _};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;

use lanes::board::{column_ids, columns, plan_move, project, resolve_target};
use lanes::model::{parse_tags, ColumnKind, Context, Task, ViewKind};
use lanes::tui::state::hex_to_rgb;
use lanes::{BoardSnapshot, Config, Database, DragEnd, DragSession, Mutation};

#[derive(Parser, Debug)]
#[command(name = "lanes")]
#[command(author, version, about = "A kanban board for your terminal, grouped by status or by context")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive board (default)
    Tui,

    /// Create .lanes/ with a config and a seeded board
    Init,

    /// Print the board
    Board {
        /// Group by "status" or "context"
        #[arg(long)]
        view: Option<ViewKind>,

        /// Emit the raw board as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a task
    Add {
        title: String,

        /// Status id (defaults to the configured default status)
        #[arg(short, long)]
        status: Option<String>,

        /// Context id (defaults to the configured default context)
        #[arg(short, long)]
        context: Option<String>,

        /// Comma separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Card colour, e.g. "#fff0f0"
        #[arg(long)]
        color: Option<String>,
    },

    /// Change fields of a task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        context: Option<String>,

        /// Comma separated tags (replaces existing)
        #[arg(short, long)]
        tags: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a task
    Rm { id: String },

    /// Move a task onto another task or into a column
    Move {
        id: String,

        /// Task id or column id to drop onto
        over: String,

        /// View whose columns `over` refers to
        #[arg(long, default_value = "status")]
        view: ViewKind,
    },

    /// Add a context list
    Context {
        title: String,

        /// List colour; random when omitted
        #[arg(long)]
        color: Option<String>,
    },

    /// Rename a status or context column
    Rename {
        id: String,
        title: String,

        #[arg(long)]
        kind: ColumnKind,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum, default_value_t = Shell::Bash)]
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Reported once logging is up
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let command = args.command.unwrap_or(Command::Tui);

    match command {
        Command::Init => {
            let cwd = std::env::current_dir().context("could not read current directory")?;
            return lanes::init::init_project(&cwd).map_err(anyhow::Error::msg);
        }
        Command::Completion { shell } => {
            let mut cmd = Args::command();
            generate(shell, &mut cmd, "lanes", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let db_path = Database::db_path();
    let log_dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    let _guard = lanes::logging::init(&log_dir, &config.log.level)?;
    if let Some(e) = config_error {
        tracing::warn!("{}", e);
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let db = Database::open()
        .with_context(|| format!("could not open board at {}", db_path.display()))?;

    match command {
        Command::Tui => lanes::tui::run(db, &config),

        Command::Board { view, json } => {
            let board = db.fetch_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                print_board(&board, view.unwrap_or(config.board.default_view));
            }
            Ok(())
        }

        Command::Add {
            title,
            status,
            context,
            tags,
            color,
        } => {
            let status = status.unwrap_or(config.board.default_status);
            let context = context.unwrap_or(config.board.default_context);
            let mut task = Task::new(&title, &status, &context);
            if let Some(tags) = tags {
                task.tags = parse_tags(&tags);
            }
            if color.is_some() {
                task.color = color;
            }
            let created = db.create_task(&task)?;
            println!("{} task {} ({})", "Created".green(), created.id.cyan(), created.title);
            Ok(())
        }

        Command::Edit {
            id,
            title,
            status,
            context,
            tags,
            color,
        } => {
            let mut task = db.get_task(&id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(status) = status {
                task.status = status;
            }
            if let Some(context) = context {
                task.context = context;
            }
            if let Some(tags) = tags {
                task.tags = parse_tags(&tags);
            }
            if color.is_some() {
                task.color = color;
            }
            db.update_task(&task)?;
            println!("{} task {}", "Updated".green(), id.cyan());
            Ok(())
        }

        Command::Rm { id } => {
            db.delete_task(&id)?;
            println!("{} task {}", "Deleted".green(), id.cyan());
            Ok(())
        }

        Command::Move { id, over, view } => {
            let board = db.fetch_all()?;
            let ids = column_ids(view, &board.statuses, &board.contexts);
            let target = resolve_target(&board.tasks, &ids, Some(&over));
            let Some(session) = DragSession::start(&board.tasks, &id) else {
                bail!("no task with id '{}'", id);
            };
            match session.end(&board.tasks, &target, view) {
                DragEnd::Commit(finalized) => {
                    let plan = plan_move(&board.tasks, &finalized);
                    Mutation::Move(plan).apply(&db)?;
                    println!("{} {} onto {}", "Moved".green(), id.cyan(), over.cyan());
                    Ok(())
                }
                DragEnd::Cancel(_) => {
                    bail!("'{}' is not a task or a {} column", over, view)
                }
            }
        }

        Command::Context { title, color } => {
            let mut context = Context::new(&title);
            if let Some(color) = color {
                context.color = color;
            }
            let created = db.create_context(&context)?;
            println!("{} context {} ({})", "Created".green(), created.id.cyan(), created.title);
            Ok(())
        }

        Command::Rename { id, title, kind } => {
            db.update_column_title(&id, &title, kind)?;
            println!("{} {} {} to '{}'", "Renamed".green(), kind, id.cyan(), title);
            Ok(())
        }

        Command::Init | Command::Completion { .. } => Ok(()),
    }
}

/// Print each column with its cards, in board order
fn print_board(board: &BoardSnapshot, view: ViewKind) {
    let cols = columns(view, &board.statuses, &board.contexts);
    for column in project(&board.tasks, view, &cols) {
        let heading = format!("{} ({})", column.column.title, column.tasks.len());
        let heading = match column.column.color.and_then(hex_to_rgb) {
            Some((r, g, b)) => heading.truecolor(r, g, b).bold(),
            None => heading.bold(),
        };
        println!("{}", heading);

        if column.tasks.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for task in column.tasks {
            let badge = match view {
                ViewKind::Status => board
                    .contexts
                    .iter()
                    .find(|c| c.id == task.context)
                    .map(|c| c.title.as_str()),
                ViewKind::Context => board
                    .statuses
                    .iter()
                    .find(|s| s.id == task.status)
                    .map(|s| s.title.as_str()),
            }
            .unwrap_or("?");
            let tags: String = task.tags.iter().map(|t| format!(" #{}", t)).collect();
            println!(
                "  {}  {}  {}{}",
                task.id.dimmed(),
                task.title,
                format!("[{}]", badge).cyan(),
                tags.dimmed()
            );
        }
        println!();
    }
}

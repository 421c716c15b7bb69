//! TaskDash - terminal dashboard for the task-processing backend.

mod config;
mod render;

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use taskdash_client::{
    BoardSnapshot, ClientError, CreateTaskRequest, CreatedTask, DetailSurface, DetailView, FileTokenStore, HttpClient,
    SearchMode, TaskBoard, TokenStore,
};
use taskdash_core::{TaskDetailProjector, TaskId};

use config::Config;
use render::{write_board, JsonSurface, Painter, TerminalSurface};

/// TaskDash - submit tasks and watch their progress
#[derive(Parser, Debug)]
#[command(name = "taskdash", about = "Dashboard client for the task-processing backend")]
struct Cli {
    /// Backend base URL (default: $TASKDASH_URL or http://localhost:5000)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Path to the task token file
    #[arg(long, global = true)]
    token_store: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a new task and remember its token
    Submit {
        /// Task description
        task: String,

        /// Submitting user
        #[arg(short, long)]
        user_id: Option<String>,

        /// URL to notify when the task completes
        #[arg(short, long)]
        webhook_url: Option<String>,
    },

    /// Show a task's details
    Show {
        /// Task ID
        id: String,

        /// Token to use instead of the stored one
        #[arg(short, long)]
        token: Option<String>,

        /// Print the display model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep refreshing the list of known tasks
    Watch {
        /// Refresh interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Refresh once and exit
        #[arg(long)]
        once: bool,
    },

    /// List task IDs with a stored token
    Tokens,

    /// Switch the backend search mode
    #[command(name = "search-mode")]
    SearchMode {
        /// mock or online
        mode: SearchMode,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries rendered output
    let directive = if cli.verbose { "taskdash=debug" } else { "taskdash=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let interval = match &cli.command {
        Commands::Watch { interval, .. } => *interval,
        _ => None,
    };
    let config = Config::default().with_overrides(cli.base_url, cli.token_store, interval);
    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
    let painter = Painter::new(color);
    let client = HttpClient::new(&config.base_url);

    debug!(backend = %config.base_url, "TaskDash starting");

    match cli.command {
        Commands::Submit {
            task,
            user_id,
            webhook_url,
        } => submit(&client, &config, task, user_id, webhook_url).await,
        Commands::Show { id, token, json } => show(&client, &config, id, token, json, color).await,
        Commands::Watch { once, .. } => watch(&client, &config, painter, once).await,
        Commands::Tokens => list_tokens(&config),
        Commands::SearchMode { mode } => search_mode(&client, mode).await,
    }
}

async fn submit(
    client: &HttpClient,
    config: &Config,
    task: String,
    user_id: Option<String>,
    webhook_url: Option<String>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut request = CreateTaskRequest::new(task);
    request.user_id = user_id;
    request.webhook_url = webhook_url;

    let created = match client.create_task(&request).await {
        Ok(created) => created,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let stored = report_created(&mut io::stdout().lock(), &created, &config.token_store_path)?;
    Ok(if stored {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print a newly created task, then remember its token.
///
/// The token is printed before it is persisted, so a broken token file never
/// loses it. Returns whether the token was stored.
fn report_created<W: Write>(
    out: &mut W,
    created: &CreatedTask,
    store_path: &Path,
) -> io::Result<bool> {
    writeln!(out, "Task created:")?;
    writeln!(out, "  ID:      {}", created.task_id)?;
    writeln!(out, "  Status:  {}", created.status)?;
    writeln!(out, "  Token:   {}", created.token)?;
    out.flush()?;

    let stored = FileTokenStore::open(store_path)
        .and_then(|mut store| store.put(&created.task_id, &created.token));
    match stored {
        Ok(()) => {
            info!(task_id = %created.task_id, store = %store_path.display(), "Task token stored");
            Ok(true)
        }
        Err(e) => {
            warn!(task_id = %created.task_id, error = %e, "Failed to store task token");
            eprintln!(
                "warning: token not saved to {}; keep the token above to read this task",
                store_path.display()
            );
            Ok(false)
        }
    }
}

async fn show(
    client: &HttpClient,
    config: &Config,
    id: String,
    token: Option<String>,
    json: bool,
    color: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let task_id = TaskId::new(id);
    let store = FileTokenStore::open(&config.token_store_path)?;
    let projector = TaskDetailProjector::new();

    let shown = if json {
        let view = DetailView::new(JsonSurface::stdio(), projector);
        present(view, client, &store, &task_id, token.as_deref()).await
    } else {
        let view = DetailView::new(TerminalSurface::stdio(color), projector);
        present(view, client, &store, &task_id, token.as_deref()).await
    };

    Ok(if shown {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Open one task on a view. Failures are reported by the view's surface.
async fn present<S: DetailSurface>(
    mut view: DetailView<S>,
    client: &HttpClient,
    store: &FileTokenStore,
    task_id: &TaskId,
    token: Option<&str>,
) -> bool {
    let result = match token {
        Some(token) => view.open(client, task_id, token).await,
        None => view.open_with_store(client, store, task_id).await,
    };
    result.is_ok()
}

async fn watch(
    client: &HttpClient,
    config: &Config,
    painter: Painter,
    once: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let board = TaskBoard::new(TaskDetailProjector::new());
    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_interval_secs));
    let mut previous: Option<BoardSnapshot> = None;

    info!(interval_secs = config.refresh_interval_secs, "Watching tasks");

    loop {
        let next = async {
            ticker.tick().await;
            // Reopen each time to pick up tasks submitted since the last refresh.
            match FileTokenStore::open(&config.token_store_path) {
                Ok(store) => board.refresh(client, &store).await,
                Err(e) => Err(ClientError::from(e)),
            }
        };
        let Some(refreshed) = unless_stopped(next, tokio::signal::ctrl_c()).await else {
            info!("Stopped watching");
            break;
        };

        match refreshed {
            Ok(snapshot) => {
                if let Some(previous) = &previous {
                    for change in snapshot.changes(previous) {
                        info!(
                            task_id = %change.task_id,
                            from = change.from.as_deref().unwrap_or("-"),
                            to = %change.to,
                            "Task status changed"
                        );
                    }
                }

                let mut out = io::stdout().lock();
                if painter.is_color() && !once {
                    // Clear and home, then draw the whole snapshot at once.
                    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
                }
                write_board(&mut out, &snapshot, painter)?;
                previous = Some(snapshot);
            }
            Err(e) => warn!(error = %e, "Board refresh failed"),
        }

        if once {
            break;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run `work` to completion unless `stop` resolves first.
async fn unless_stopped<T>(work: impl Future<Output = T>, stop: impl Future) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = stop => None,
    }
}

fn list_tokens(config: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileTokenStore::open(&config.token_store_path)?;
    let entries = store.entries()?;

    println!("Stored tasks ({}):", entries.len());
    for (task_id, _) in entries {
        println!("  {}", task_id);
    }
    Ok(ExitCode::SUCCESS)
}

async fn search_mode(
    client: &HttpClient,
    mode: SearchMode,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match client.set_search_mode(mode).await {
        Ok(mode) => {
            let state = if mode == SearchMode::Mock { "ON" } else { "OFF" };
            println!("Mock Mode ({})", state);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: Failed to update search mode: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

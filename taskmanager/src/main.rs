use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use taskmanager::config::Config;
use taskmanager::task::{SeaOrmTaskDao, Task, TaskDao, TaskService, TaskStatus};
use tracing_subscriber::EnvFilter;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser, Debug)]
#[command(version, about = "Keep track of your personal tasks")]
struct Cli {
    /// Path to a configuration file (defaults to ./taskmanager.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Todo,
    InProgress,
    Done,
}

impl From<StatusArg> for TaskStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Todo => TaskStatus::Todo,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Done => TaskStatus::Done,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// List tasks, optionally only those with the given status
    List {
        #[arg(long, short, value_enum)]
        status: Option<StatusArg>,
    },
    /// Find tasks whose title or description contains the query, ignoring case
    Search { query: String },
    /// Show every field of a single task
    Show { id: i32 },
    /// Add a new task
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short, value_enum, default_value = "todo")]
        status: StatusArg,
    },
    /// Change the fields of an existing task
    Edit {
        id: i32,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long, short, value_enum)]
        status: Option<StatusArg>,
    },
    /// Delete a task for good
    Delete {
        id: i32,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let db = taskmanager::db::connect(&config)
        .await
        .context("Failed to open the task database")?;

    let result = {
        let service = TaskService::new(SeaOrmTaskDao::new(&db));
        let mut out = io::stdout().lock();
        run(&service, cli.command, &mut out).await
    };

    db.close().await?;
    result
}

async fn run<D: TaskDao>(
    service: &TaskService<D>,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::List { status } => {
            let tasks = match status {
                Some(status) => service.get_tasks_by_status(status.into()).await?,
                None => service.get_all_tasks().await?,
            };
            print_tasks(out, &tasks)?;
        }
        Commands::Search { query } => {
            let tasks = service.search_tasks(&query).await?;
            print_tasks(out, &tasks)?;
        }
        Commands::Show { id } => {
            let task = service
                .get_task(id)
                .await?
                .ok_or_else(|| anyhow!("Task with ID {} not found", id))?;
            print_details(out, &task)?;
        }
        Commands::Add {
            title,
            description,
            status,
        } => {
            let task = service
                .create_task(title, description, Some(status.into()))
                .await?;
            writeln!(out, "Task added with ID {}", task.id())?;
        }
        Commands::Edit {
            id,
            title,
            description,
            clear_description,
            status,
        } => {
            let mut task = service
                .get_task(id)
                .await?
                .ok_or_else(|| anyhow!("Task with ID {} not found", id))?;
            if let Some(title) = title {
                task.set_title(title);
            }
            if clear_description {
                task.set_description(None);
            } else if description.is_some() {
                task.set_description(description);
            }
            if let Some(status) = status {
                task.set_status(Some(status.into()));
            }
            let task = service.update_task(task).await?;
            writeln!(out, "Task {} updated", task.id())?;
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(out, &format!("Delete task {}?", id))? {
                writeln!(out, "Aborted")?;
                return Ok(());
            }
            service.delete_task(id).await?;
            writeln!(out, "Task {} deleted", id)?;
        }
    }
    Ok(())
}

fn confirm(out: &mut impl Write, prompt: &str) -> io::Result<bool> {
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_TIME_FORMAT).to_string()
}

fn format_status(task: &Task) -> &'static str {
    task.status().map_or("-", |status| status.as_str())
}

fn format_row(task: &Task) -> String {
    format!(
        "{:>5} | {:<40} | {:<11} | {} | {}",
        task.id(),
        task.title(),
        format_status(task),
        format_timestamp(task.created_at()),
        format_timestamp(task.updated_at()),
    )
}

fn print_tasks(out: &mut impl Write, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No tasks found");
    }
    writeln!(
        out,
        "{:>5} | {:<40} | {:<11} | {:<16} | {:<16}",
        "ID", "Title", "Status", "Created", "Updated"
    )?;
    for task in tasks {
        writeln!(out, "{}", format_row(task))?;
    }
    Ok(())
}

fn print_details(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(out, "ID:          {}", task.id())?;
    writeln!(out, "Title:       {}", task.title())?;
    writeln!(out, "Description: {}", task.description().unwrap_or("-"))?;
    writeln!(out, "Status:      {}", format_status(task))?;
    writeln!(out, "Created:     {}", format_timestamp(task.created_at()))?;
    writeln!(out, "Updated:     {}", format_timestamp(task.updated_at()))
}

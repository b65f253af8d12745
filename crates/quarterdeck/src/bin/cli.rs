//! Quarterdeck CLI - Governance documents for a small crew.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use quarterdeck::config::DocumentsConfig;
use quarterdeck::entities::{SectionEdit, TaskDraft, TaskUpdate};
use quarterdeck::errors::{QuarterdeckError, QuarterdeckResult};
use quarterdeck::storage::PartnerDoc;
use quarterdeck::tools::Toolbox;
use quarterdeck::ui;

#[derive(Parser)]
#[command(name = "quarterdeck")]
#[command(about = "Governance documents for a small crew", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Documents base directory
    #[arg(long, global = true, env = "DOCUMENTS_DIR", default_value = "documents")]
    documents_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a user's task list
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage the crew charter
    Charter {
        #[command(subcommand)]
        command: CharterCommands,
    },

    /// Manage meeting logs
    Meeting {
        #[command(subcommand)]
        command: MeetingCommands,
    },

    /// Show a crew member's profile
    Profile {
        /// Crew member name
        member: String,
    },

    /// Show a partnership document
    Partner {
        /// Which document: agreement or companion
        document: String,
    },

    /// Classify a request into a governance context
    Route {
        /// The request to classify
        request: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List all tasks for a user
    List {
        /// User whose list to read
        user: String,
    },

    /// Add a new task
    Add {
        /// User whose list to modify
        user: String,

        /// Task title
        #[arg(short, long)]
        title: String,

        /// Who the task is assigned to
        #[arg(short, long)]
        assignee: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(short = 'D', long)]
        deadline: String,

        /// Task description
        #[arg(short, long)]
        description: String,
    },

    /// Edit fields of an existing task
    Edit {
        /// User whose list to modify
        user: String,

        /// Task ID
        id: u32,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New assignee
        #[arg(long)]
        assignee: Option<String>,

        /// New deadline
        #[arg(long)]
        deadline: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New status
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a task
    Delete {
        /// User whose list to modify
        user: String,

        /// Task ID
        id: u32,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CharterCommands {
    /// Print the full charter
    Show,

    /// List article titles
    List,

    /// Append a new article
    Add {
        /// Article title (e.g. 'Article VI: Keep the Ship Tidy')
        #[arg(short, long)]
        title: String,

        /// Article text
        #[arg(short = 'x', long)]
        text: String,
    },

    /// Replace an article's body
    Edit {
        /// Exact article title
        title: String,

        /// New article body
        #[arg(short, long)]
        body: String,
    },

    /// Remove an article
    Remove {
        /// Exact article title
        title: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum MeetingCommands {
    /// Print the meeting log for a date
    Show {
        /// Meeting date (YYYY-MM-DD)
        date: String,
    },

    /// Create or overwrite the meeting log for a date
    Log {
        /// Meeting date (YYYY-MM-DD)
        date: String,

        /// Participant names, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        participants: Vec<String>,

        /// Meeting notes
        #[arg(short, long)]
        notes: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> QuarterdeckResult<()> {
    let toolbox = Toolbox::initialize(DocumentsConfig::new(&cli.documents_dir)).await?;

    match cli.command {
        Commands::Task { command } => run_task(&toolbox, command).await,
        Commands::Charter { command } => run_charter(&toolbox, command).await,
        Commands::Meeting { command } => run_meeting(&toolbox, command).await,
        Commands::Profile { member } => {
            let content = toolbox.records().read_profile(&member).await?;
            println!("{content}");
            Ok(())
        }
        Commands::Partner { document } => {
            let doc: PartnerDoc = document.parse()?;
            let content = toolbox.records().read_partner_doc(doc).await?;
            println!("{content}");
            Ok(())
        }
        Commands::Route { request } => {
            run_route(&request.join(" "));
            Ok(())
        }
    }
}

async fn run_task(toolbox: &Toolbox, command: TaskCommands) -> QuarterdeckResult<()> {
    match command {
        TaskCommands::List { user } => {
            let listing = toolbox.tasks().list_tasks(&user).await?;
            if listing.tasks.is_empty() {
                ui::print_warning(&format!("No tasks found for {user}"));
            } else {
                println!("{}", ui::task_table(&listing.tasks));
            }
        }
        TaskCommands::Add {
            user,
            title,
            assignee,
            deadline,
            description,
        } => {
            let draft = TaskDraft {
                title,
                assignee,
                deadline,
                description,
            };
            let task = toolbox.tasks().append_task(&user, draft).await?;
            ui::print_success(&format!(
                "Added task '{}' (ID: {}) to {user}'s list",
                task.title, task.id
            ));
        }
        TaskCommands::Edit {
            user,
            id,
            title,
            assignee,
            deadline,
            description,
            status,
        } => {
            let updates = TaskUpdate {
                title,
                assignee,
                deadline,
                description,
                status,
            };
            let task = toolbox.tasks().update_task(&user, id, updates).await?;
            ui::print_success(&format!(
                "Modified task '{}' (ID: {id}); status is now {}",
                task.title,
                ui::status_colored(&task.status)
            ));
        }
        TaskCommands::Delete { user, id, yes } => {
            if !yes && !confirm(&format!("Delete task {id} from {user}'s list?"))? {
                ui::print_warning("Aborted");
                return Ok(());
            }
            toolbox.tasks().delete_task(&user, id).await?;
            ui::print_success(&format!("Deleted task {id} from {user}'s list"));
        }
    }
    Ok(())
}

async fn run_charter(toolbox: &Toolbox, command: CharterCommands) -> QuarterdeckResult<()> {
    match command {
        CharterCommands::Show => {
            let content = toolbox.charter().read().await?;
            println!("{content}");
        }
        CharterCommands::List => {
            let sections = toolbox.charter().sections().await?;
            if sections.is_empty() {
                ui::print_warning("The charter has no articles yet");
            } else {
                for section in sections {
                    println!("{}", section.title.bold());
                }
            }
        }
        CharterCommands::Add { title, text } => {
            toolbox.charter().append_section(&title, &text).await?;
            ui::print_success(&format!("Added '{title}' to the charter"));
        }
        CharterCommands::Edit { title, body } => {
            toolbox
                .charter()
                .edit_section(&title, SectionEdit::Modify { body })
                .await?;
            ui::print_success(&format!("Modified article '{title}'"));
        }
        CharterCommands::Remove { title, yes } => {
            if !yes && !confirm(&format!("Remove article '{title}' from the charter?"))? {
                ui::print_warning("Aborted");
                return Ok(());
            }
            toolbox
                .charter()
                .edit_section(&title, SectionEdit::Delete)
                .await?;
            ui::print_success(&format!("Removed article '{title}'"));
        }
    }
    Ok(())
}

async fn run_meeting(toolbox: &Toolbox, command: MeetingCommands) -> QuarterdeckResult<()> {
    match command {
        MeetingCommands::Show { date } => {
            let content = toolbox.records().read_meeting_log(&date).await?;
            println!("{content}");
        }
        MeetingCommands::Log {
            date,
            participants,
            notes,
        } => {
            toolbox
                .records()
                .write_meeting_log(&date, &participants, &notes)
                .await?;
            ui::print_success(&format!("Meeting log for {date} saved"));
        }
    }
    Ok(())
}

fn run_route(request: &str) {
    match quarterdeck::domain::routing::infer_context(request) {
        Some(context) => {
            println!(
                "{} {}",
                "Context:".bold(),
                context.as_str().cyan().bold()
            );
            println!("{}", context.description().dimmed());
            println!("\n{}", "Delegation sequence:".bold());
            for (i, specialist) in context.delegation().iter().enumerate() {
                println!(
                    "  {}. {} - {}",
                    i + 1,
                    specialist.as_str().green(),
                    specialist.role_description().dimmed()
                );
            }
        }
        None => {
            ui::print_warning(
                "Request is ambiguous; specify a context (planning, execution, evaluation, reflection, resolution)",
            );
        }
    }
}

fn confirm(prompt: &str) -> QuarterdeckResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| QuarterdeckError::Io {
            reason: e.to_string(),
        })
}

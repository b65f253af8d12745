//! Terminal UI helpers for the CLI.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::entities::Task;

/// Color a free-form status string by its conventional meaning.
pub fn status_colored(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "pending" => status.yellow().to_string(),
        "in progress" | "in-progress" => status.cyan().to_string(),
        "done" | "completed" => status.green().to_string(),
        "blocked" => status.red().bold().to_string(),
        "cancelled" | "canceled" => status.red().to_string(),
        _ => status.normal().to_string(),
    }
}

fn status_cell_color(status: &str) -> Color {
    match status.to_lowercase().as_str() {
        "pending" => Color::Yellow,
        "in progress" | "in-progress" => Color::Cyan,
        "done" | "completed" => Color::Green,
        "blocked" | "cancelled" | "canceled" => Color::Red,
        _ => Color::White,
    }
}

/// Create a table for displaying tasks
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Assignee").fg(Color::Cyan),
        Cell::new("Deadline").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for task in tasks {
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.title),
            Cell::new(&task.assignee),
            Cell::new(&task.deadline),
            Cell::new(&task.status).fg(status_cell_color(&task.status)),
        ]);
    }

    table
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

//! # Quarterdeck
//!
//! Governance document management for a small partner-run crew and the agents
//! that work on its behalf.
//!
//! This crate provides:
//! - Per-user task lists stored as markdown tables
//! - Section-level editing of the crew charter (append/modify/delete articles)
//! - Meeting logs, team profiles, and partnership document records
//! - A static routing table mapping requests to governance contexts
//! - CLI and MCP server interfaces
//!
//! ## Example
//!
//! ```rust,ignore
//! use quarterdeck::{DocumentsConfig, Toolbox};
//!
//! let toolbox = Toolbox::initialize(DocumentsConfig::from_env()).await?;
//! let outcome = toolbox.read_task_list("Philipp").await;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Path layout and configuration
pub mod config;

// Storage engines
pub mod storage;

// Routing domain
pub mod domain;

// Agent-facing tool layer
pub mod tools;

// Terminal UI helpers
pub mod ui;

// Re-export key types for convenience
pub use config::DocumentsConfig;
pub use entities::{SectionEdit, Task, TaskDraft, TaskUpdate};
pub use errors::{ErrorKind, QuarterdeckError, QuarterdeckResult};
pub use storage::{FileTaskStore, RecordStore, SectionEditor, TaskListing, TaskStorage};
pub use tools::{ToolOutcome, Toolbox};

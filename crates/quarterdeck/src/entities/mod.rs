//! Core entity types shared by the storage engines and the tool layer.

mod section;
mod task;

pub use section::{Section, SectionEdit, BODY_MARKER, SECTION_MARKER};
pub use task::{Task, TaskDraft, TaskUpdate, DEFAULT_STATUS};

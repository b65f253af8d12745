//! Agent-facing tool layer.
//!
//! Each tool maps named arguments onto one engine operation and resolves to
//! the uniform result envelope the orchestration layer consumes. Failures are
//! envelope values, never panics.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::fs;

use crate::config::DocumentsConfig;
use crate::domain::routing::{infer_context, Context};
use crate::entities::{SectionEdit, TaskDraft, TaskUpdate};
use crate::errors::{ErrorKind, QuarterdeckError, QuarterdeckResult};
use crate::storage::{FileTaskStore, PartnerDoc, RecordStore, SectionEditor, TaskStorage};

/// Uniform result envelope for every tool call.
///
/// Serializes to `{"status": "success", "result": ...}` or
/// `{"status": "error", "kind": ..., "error_message": ...}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success { result: Value },
    Error { kind: ErrorKind, error_message: String },
}

impl ToolOutcome {
    /// Wrap a successful payload.
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    /// True when the outcome carries a successful result.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    fn from_result<T>(result: QuarterdeckResult<T>, wrap: impl FnOnce(T) -> Value) -> Self {
        match result {
            Ok(value) => Self::Success {
                result: wrap(value),
            },
            Err(e) => e.into(),
        }
    }
}

impl From<QuarterdeckError> for ToolOutcome {
    fn from(err: QuarterdeckError) -> Self {
        Self::Error {
            kind: err.kind(),
            error_message: err.to_string(),
        }
    }
}

/// The assembled engines behind the tool layer.
///
/// Construction is explicit: `initialize` creates the runtime directories and
/// must be called once by the hosting application at startup.
pub struct Toolbox {
    tasks: Arc<dyn TaskStorage>,
    charter: SectionEditor,
    records: RecordStore,
}

impl Toolbox {
    /// Create the runtime directories and assemble the engines.
    pub async fn initialize(config: DocumentsConfig) -> QuarterdeckResult<Self> {
        fs::create_dir_all(config.base_dir()).await?;
        fs::create_dir_all(config.meetings_dir()).await?;
        fs::create_dir_all(config.profiles_dir()).await?;

        Ok(Self {
            tasks: Arc::new(FileTaskStore::new(config.clone())),
            charter: SectionEditor::new(config.charter_file()),
            records: RecordStore::new(config),
        })
    }

    /// The task storage engine.
    pub fn tasks(&self) -> &Arc<dyn TaskStorage> {
        &self.tasks
    }

    /// The charter section editor.
    pub fn charter(&self) -> &SectionEditor {
        &self.charter
    }

    /// The whole-file record store.
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    // === Task tools ===

    /// Read a user's task list.
    pub async fn read_task_list(&self, user_name: &str) -> ToolOutcome {
        ToolOutcome::from_result(self.tasks.list_tasks(user_name).await, |listing| {
            json!({
                "tasks": listing.tasks,
                "raw_content": listing.raw_content,
            })
        })
    }

    /// Add a new task to a user's list.
    pub async fn write_task(&self, user_name: &str, draft: TaskDraft) -> ToolOutcome {
        let user = user_name.to_string();
        ToolOutcome::from_result(self.tasks.append_task(user_name, draft).await, |task| {
            json!({
                "message": format!(
                    "Successfully added task '{}' (ID: {}) to {user}'s list.",
                    task.title, task.id
                ),
                "task_id": task.id,
                "task": task,
            })
        })
    }

    /// Modify or delete an existing task.
    ///
    /// `action` is `"modify"` (with an `updates` object) or `"delete"`.
    pub async fn edit_task(
        &self,
        user_name: &str,
        task_id: u32,
        action: &str,
        updates: Option<&Value>,
    ) -> ToolOutcome {
        match action {
            "modify" => {
                let updates = match updates {
                    Some(value) => match TaskUpdate::from_json(value) {
                        Ok(updates) => updates,
                        Err(e) => return e.into(),
                    },
                    None => {
                        return QuarterdeckError::validation(
                            "modification action requires an 'updates' object",
                        )
                        .into()
                    }
                };
                let user = user_name.to_string();
                ToolOutcome::from_result(
                    self.tasks.update_task(user_name, task_id, updates).await,
                    |task| {
                        json!({
                            "message": format!(
                                "Successfully modified task '{}' (ID: {task_id}) in {user}'s list.",
                                task.title
                            ),
                            "task_id": task_id,
                            "task": task,
                        })
                    },
                )
            }
            "delete" => {
                let user = user_name.to_string();
                ToolOutcome::from_result(self.tasks.delete_task(user_name, task_id).await, |()| {
                    json!({
                        "message": format!(
                            "Successfully deleted task with ID {task_id} from {user}'s list."
                        ),
                        "task_id": task_id,
                    })
                })
            }
            other => QuarterdeckError::validation(format!(
                "invalid action '{other}'; must be 'modify' or 'delete'"
            ))
            .into(),
        }
    }

    // === Charter tools ===

    /// Read the full charter document.
    pub async fn read_charter(&self) -> ToolOutcome {
        ToolOutcome::from_result(self.charter.read().await, |content| {
            json!({ "content": content })
        })
    }

    /// Append a new article to the charter.
    pub async fn write_charter_article(&self, title: &str, text: &str) -> ToolOutcome {
        let title_owned = title.to_string();
        ToolOutcome::from_result(self.charter.append_section(title, text).await, |()| {
            json!({
                "message": format!("Added '{title_owned}' to the crew charter."),
            })
        })
    }

    /// Modify or delete an existing charter article.
    pub async fn edit_charter_article(
        &self,
        target_title: &str,
        action: &str,
        new_body: Option<&str>,
    ) -> ToolOutcome {
        let edit = match SectionEdit::from_action(action, new_body) {
            Ok(edit) => edit,
            Err(e) => return e.into(),
        };
        let verb = match &edit {
            SectionEdit::Modify { .. } => "Modified",
            SectionEdit::Delete => "Deleted",
        };
        let title_owned = target_title.to_string();
        ToolOutcome::from_result(self.charter.edit_section(target_title, edit).await, |()| {
            json!({
                "message": format!("{verb} charter article '{title_owned}'."),
            })
        })
    }

    // === Record tools ===

    /// Read the meeting log for one date.
    pub async fn read_meeting_log(&self, date: &str) -> ToolOutcome {
        ToolOutcome::from_result(self.records.read_meeting_log(date).await, |content| {
            json!({ "log_content": content })
        })
    }

    /// Create or overwrite the meeting log for one date.
    pub async fn write_meeting_log(
        &self,
        date: &str,
        participants: &[String],
        content: &str,
    ) -> ToolOutcome {
        let date_owned = date.to_string();
        ToolOutcome::from_result(
            self.records.write_meeting_log(date, participants, content).await,
            |()| {
                json!({
                    "message": format!("Meeting log for {date_owned} saved successfully."),
                })
            },
        )
    }

    /// Read a crew member's profile.
    pub async fn read_team_profile(&self, member_name: &str) -> ToolOutcome {
        ToolOutcome::from_result(self.records.read_profile(member_name).await, |content| {
            json!({ "profile_content": content })
        })
    }

    /// Read a partnership document by type (`agreement` or `companion`).
    pub async fn read_partner_doc(&self, document_type: &str) -> ToolOutcome {
        let doc: PartnerDoc = match document_type.parse() {
            Ok(doc) => doc,
            Err(e) => return e.into(),
        };
        ToolOutcome::from_result(self.records.read_partner_doc(doc).await, |content| {
            json!({ "document_content": content })
        })
    }

    // === Routing ===

    /// Classify a request into a governance context and report the context's
    /// delegation sequence. An ambiguous request yields a null context.
    pub fn route_request(&self, request: &str) -> ToolOutcome {
        match infer_context(request) {
            Some(context) => ToolOutcome::success(json!({
                "context": context.as_str(),
                "description": context.description(),
                "delegation": context
                    .delegation()
                    .iter()
                    .map(|s| json!({
                        "specialist": s.as_str(),
                        "role": s.role_description(),
                    }))
                    .collect::<Vec<_>>(),
            })),
            None => ToolOutcome::success(json!({
                "context": Value::Null,
                "note": "request is ambiguous; ask the user which governance context applies",
                "available": Context::ALL.iter().map(Context::as_str).collect::<Vec<_>>(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Toolbox) {
        let temp_dir = TempDir::new().unwrap();
        let toolbox = Toolbox::initialize(DocumentsConfig::new(temp_dir.path()))
            .await
            .unwrap();
        (temp_dir, toolbox)
    }

    fn as_json(outcome: &ToolOutcome) -> Value {
        serde_json::to_value(outcome).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_directories() {
        let (temp_dir, _toolbox) = setup().await;
        assert!(temp_dir.path().join("meetings").is_dir());
        assert!(temp_dir.path().join("profiles").is_dir());
    }

    #[tokio::test]
    async fn test_success_envelope_shape() {
        let (_temp_dir, toolbox) = setup().await;

        let outcome = toolbox.read_task_list("Philipp").await;
        let value = as_json(&outcome);
        assert_eq!(value["status"], "success");
        assert!(value["result"]["tasks"].as_array().unwrap().is_empty());
        assert!(value["result"]["raw_content"]
            .as_str()
            .unwrap()
            .starts_with("# Task List for Philipp"));
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let (_temp_dir, toolbox) = setup().await;

        let outcome = toolbox.read_charter().await;
        let value = as_json(&outcome);
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "document_not_found");
        assert!(value["error_message"].as_str().unwrap().contains("charter.md"));
    }

    #[tokio::test]
    async fn test_edit_task_rejects_unknown_action() {
        let (_temp_dir, toolbox) = setup().await;

        let outcome = toolbox.edit_task("Philipp", 1, "rename", None).await;
        let value = as_json(&outcome);
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "validation");
    }

    #[tokio::test]
    async fn test_edit_task_rejects_unknown_update_key() {
        let (_temp_dir, toolbox) = setup().await;

        toolbox
            .write_task(
                "Philipp",
                TaskDraft {
                    title: "T".to_string(),
                    assignee: "A".to_string(),
                    deadline: "2025-01-01".to_string(),
                    description: "D".to_string(),
                },
            )
            .await;

        let outcome = toolbox
            .edit_task("Philipp", 1, "modify", Some(&json!({"priority": "high"})))
            .await;
        let value = as_json(&outcome);
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "validation");

        // Nothing was mutated.
        let listing = toolbox.read_task_list("Philipp").await;
        let listing = as_json(&listing);
        assert_eq!(listing["result"]["tasks"][0]["status"], "Pending");
    }

    #[tokio::test]
    async fn test_route_request_reports_delegation() {
        let (_temp_dir, toolbox) = setup().await;

        let value = as_json(&toolbox.route_request("Mark task 3 as complete"));
        assert_eq!(value["result"]["context"], "execution");
        assert_eq!(value["result"]["delegation"][0]["specialist"], "business");

        let value = as_json(&toolbox.route_request("Hello"));
        assert_eq!(value["result"]["context"], Value::Null);
    }
}

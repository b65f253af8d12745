//! Task entity and edit-input types.

use serde::{Deserialize, Serialize};

use crate::errors::{QuarterdeckError, QuarterdeckResult};

/// Status assigned to newly created tasks.
pub const DEFAULT_STATUS: &str = "Pending";

/// One row of a user's task table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within the user's list, assigned at creation, never reused.
    pub id: u32,

    /// Brief, descriptive title
    pub title: String,

    /// Who the task is assigned to
    pub assignee: String,

    /// Due date, conventionally `YYYY-MM-DD` but stored free-form
    pub deadline: String,

    /// Detailed description of the task
    pub description: String,

    /// Current status (e.g. Pending, In Progress, Done). Free-form.
    pub status: String,
}

/// Input for creating a task. The id and status are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub assignee: String,
    pub deadline: String,
    pub description: String,
}

impl TaskDraft {
    /// Check that every required field carries a non-empty value.
    pub fn validate(&self) -> QuarterdeckResult<()> {
        let fields = [
            ("title", &self.title),
            ("assignee", &self.assignee),
            ("deadline", &self.deadline),
            ("description", &self.description),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(QuarterdeckError::validation(format!(
                    "missing required field '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Promote the draft to a full task under the assigned id.
    pub fn into_task(self, id: u32) -> Task {
        Task {
            id,
            title: self.title,
            assignee: self.assignee,
            deadline: self.deadline,
            description: self.description,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

/// Partial update for an existing task. `None` leaves a field unchanged.
///
/// Deserialization rejects keys outside the editable set, so an update built
/// from caller-supplied JSON can never touch the id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub deadline: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TaskUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.assignee.is_none()
            && self.deadline.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }

    /// Parse an `updates` JSON object, rejecting unknown keys.
    pub fn from_json(value: &serde_json::Value) -> QuarterdeckResult<Self> {
        if !value.is_object() {
            return Err(QuarterdeckError::validation(
                "'updates' must be an object of field names to new values",
            ));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| QuarterdeckError::validation(e.to_string()))
    }

    /// Apply the present fields onto a task.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = assignee.clone();
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = deadline.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = &self.status {
            task.status = status.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_validation() {
        let draft = TaskDraft {
            title: "Review Q3 budget".to_string(),
            assignee: "Philipp".to_string(),
            deadline: "2025-09-30".to_string(),
            description: "Walk through the spreadsheet".to_string(),
        };
        assert!(draft.validate().is_ok());

        let mut empty = draft.clone();
        empty.assignee = "  ".to_string();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_draft_into_task_defaults_status() {
        let draft = TaskDraft {
            title: "T".to_string(),
            assignee: "A".to_string(),
            deadline: "2025-01-01".to_string(),
            description: "D".to_string(),
        };
        let task = draft.into_task(3);
        assert_eq!(task.id, 3);
        assert_eq!(task.status, DEFAULT_STATUS);
    }

    #[test]
    fn test_update_rejects_unknown_keys() {
        let err = TaskUpdate::from_json(&json!({"priority": "high"})).unwrap_err();
        assert!(err.to_string().contains("priority"));
    }

    #[test]
    fn test_update_null_leaves_field_unchanged() {
        let update = TaskUpdate::from_json(&json!({"status": "Done", "title": null})).unwrap();
        let mut task = Task {
            id: 1,
            title: "Original".to_string(),
            assignee: "A".to_string(),
            deadline: "2025-01-01".to_string(),
            description: "D".to_string(),
            status: "Pending".to_string(),
        };
        update.apply(&mut task);
        assert_eq!(task.title, "Original");
        assert_eq!(task.status, "Done");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate::from_json(&json!({"status": "Done"})).unwrap();
        assert!(!update.is_empty());
    }
}

//! File-backed task tables, one markdown file per user.
//!
//! Every operation re-reads the backing file, mutates the parsed rows in
//! memory, and rewrites the whole file. Read-modify-write sequences for the
//! same file are serialized through a per-file lock so concurrent in-process
//! callers cannot lose updates.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::traits::{TaskListing, TaskStorage};
use crate::config::DocumentsConfig;
use crate::entities::{Task, TaskDraft, TaskUpdate};
use crate::errors::{QuarterdeckError, QuarterdeckResult};

/// Fixed table header every task file carries, separator row included.
pub const TASK_TABLE_HEADER: &str =
    "| ID | Title | Assignee | Deadline | Description | Status |\n|---|---|---|---|---|---|\n";

/// File-backed task store.
pub struct FileTaskStore {
    config: DocumentsConfig,

    /// Per-file write locks, created lazily per user file.
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileTaskStore {
    /// Create a store over the given documents layout.
    pub fn new(config: DocumentsConfig) -> Self {
        Self {
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the task file path, rejecting empty user names.
    fn task_file_path(&self, user_name: &str) -> QuarterdeckResult<PathBuf> {
        if user_name.trim().is_empty() {
            return Err(QuarterdeckError::InvalidUser);
        }
        Ok(self.config.task_file(user_name))
    }

    async fn file_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Header block used when the backing file does not exist yet.
    fn default_header(user_name: &str) -> String {
        format!("# Task List for {user_name}\n\n{TASK_TABLE_HEADER}")
    }

    /// Parse the rows following the table header. Rows that don't carry
    /// exactly 6 columns or a numeric id are skipped, not failed.
    fn parse_rows(table_content: &str) -> Vec<Task> {
        let mut tasks = Vec::new();
        for line in table_content.trim().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.trim_matches('|').split('|').map(str::trim).collect();
            if cells.len() != 6 {
                warn!("skipping task row with {} columns: {line}", cells.len());
                continue;
            }
            let Ok(id) = cells[0].parse::<u32>() else {
                warn!("skipping task row with non-numeric id: {line}");
                continue;
            };
            tasks.push(Task {
                id,
                title: cells[1].to_string(),
                assignee: cells[2].to_string(),
                deadline: cells[3].to_string(),
                description: cells[4].to_string(),
                status: cells[5].to_string(),
            });
        }
        tasks
    }

    /// Read and parse the user's file. A missing file yields an empty list
    /// and the default header; the file is not created.
    async fn read_listing(&self, path: &Path, user_name: &str) -> QuarterdeckResult<TaskListing> {
        let raw_content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TaskListing {
                    tasks: Vec::new(),
                    raw_content: Self::default_header(user_name),
                });
            }
            Err(e) => {
                return Err(QuarterdeckError::FileReadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        // An existing file without the header block parses to no tasks.
        let Some(header_start) = raw_content.find(TASK_TABLE_HEADER) else {
            return Ok(TaskListing {
                tasks: Vec::new(),
                raw_content,
            });
        };

        let table_content = &raw_content[header_start + TASK_TABLE_HEADER.len()..];
        Ok(TaskListing {
            tasks: Self::parse_rows(table_content),
            raw_content,
        })
    }

    /// Rewrite the whole file, rows sorted ascending by id.
    async fn write_table(
        &self,
        path: &Path,
        user_name: &str,
        tasks: &mut Vec<Task>,
    ) -> QuarterdeckResult<()> {
        tasks.sort_unstable_by_key(|t| t.id);

        let mut content = Self::default_header(user_name);
        for task in tasks.iter() {
            writeln!(
                content,
                "| {} | {} | {} | {} | {} | {} |",
                task.id, task.title, task.assignee, task.deadline, task.description, task.status
            )
            .ok();
        }

        fs::write(path, content)
            .await
            .map_err(|e| QuarterdeckError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl TaskStorage for FileTaskStore {
    async fn list_tasks(&self, user_name: &str) -> QuarterdeckResult<TaskListing> {
        let path = self.task_file_path(user_name)?;
        let lock = self.file_lock(&path).await;
        let _guard = lock.lock().await;
        self.read_listing(&path, user_name).await
    }

    async fn append_task(&self, user_name: &str, draft: TaskDraft) -> QuarterdeckResult<Task> {
        draft.validate()?;
        let path = self.task_file_path(user_name)?;
        let lock = self.file_lock(&path).await;
        let _guard = lock.lock().await;

        let mut listing = self.read_listing(&path, user_name).await?;
        let next_id = listing.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = draft.into_task(next_id);
        listing.tasks.push(task.clone());

        self.write_table(&path, user_name, &mut listing.tasks)
            .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        user_name: &str,
        task_id: u32,
        updates: TaskUpdate,
    ) -> QuarterdeckResult<Task> {
        if updates.is_empty() {
            return Err(QuarterdeckError::validation(
                "modification requires at least one field to change",
            ));
        }
        let path = self.task_file_path(user_name)?;
        let lock = self.file_lock(&path).await;
        let _guard = lock.lock().await;

        let mut listing = self.read_listing(&path, user_name).await?;
        let Some(task) = listing.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Err(QuarterdeckError::TaskNotFound {
                user: user_name.to_string(),
                task_id,
            });
        };
        updates.apply(task);
        let updated = task.clone();

        self.write_table(&path, user_name, &mut listing.tasks)
            .await?;
        Ok(updated)
    }

    async fn delete_task(&self, user_name: &str, task_id: u32) -> QuarterdeckResult<()> {
        let path = self.task_file_path(user_name)?;
        let lock = self.file_lock(&path).await;
        let _guard = lock.lock().await;

        let mut listing = self.read_listing(&path, user_name).await?;
        let len_before = listing.tasks.len();
        listing.tasks.retain(|t| t.id != task_id);
        if listing.tasks.len() == len_before {
            return Err(QuarterdeckError::TaskNotFound {
                user: user_name.to_string(),
                task_id,
            });
        }

        self.write_table(&path, user_name, &mut listing.tasks)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            assignee: "Philipp".to_string(),
            deadline: "2025-07-01".to_string(),
            description: "Details".to_string(),
        }
    }

    fn setup() -> (TempDir, FileTaskStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTaskStore::new(DocumentsConfig::new(temp_dir.path()));
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_list_missing_file_does_not_create_it() {
        let (temp_dir, store) = setup();

        let listing = store.list_tasks("Philipp").await.unwrap();
        assert!(listing.tasks.is_empty());
        assert_eq!(
            listing.raw_content,
            format!("# Task List for Philipp\n\n{TASK_TABLE_HEADER}")
        );
        assert!(!temp_dir.path().join("tasks_Philipp.md").exists());
    }

    #[tokio::test]
    async fn test_append_assigns_monotonic_ids() {
        let (_temp_dir, store) = setup();

        for (i, title) in ["First", "Second", "Third"].iter().enumerate() {
            let task = store.append_task("Philipp", draft(title)).await.unwrap();
            assert_eq!(task.id, u32::try_from(i).unwrap() + 1);
            assert_eq!(task.status, "Pending");
        }

        // Other users' lists do not interfere.
        let task = store.append_task("Guillaume", draft("Solo")).await.unwrap();
        assert_eq!(task.id, 1);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_tasks() {
        let (_temp_dir, store) = setup();

        store.append_task("Philipp", draft("One")).await.unwrap();
        store.append_task("Philipp", draft("Two")).await.unwrap();

        let listing = store.list_tasks("Philipp").await.unwrap();
        assert_eq!(listing.tasks.len(), 2);
        assert_eq!(listing.tasks[0].id, 1);
        assert_eq!(listing.tasks[0].title, "One");
        assert_eq!(listing.tasks[1].id, 2);
        assert_eq!(listing.tasks[1].title, "Two");
    }

    #[tokio::test]
    async fn test_file_format_is_exact() {
        let (temp_dir, store) = setup();

        store.append_task("Philipp", draft("One")).await.unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("tasks_Philipp.md")).unwrap();
        assert_eq!(
            content,
            "# Task List for Philipp\n\n\
             | ID | Title | Assignee | Deadline | Description | Status |\n\
             |---|---|---|---|---|---|\n\
             | 1 | One | Philipp | 2025-07-01 | Details | Pending |\n"
        );
    }

    #[tokio::test]
    async fn test_id_not_reused_after_delete() {
        let (_temp_dir, store) = setup();

        store.append_task("Philipp", draft("One")).await.unwrap();
        store.append_task("Philipp", draft("Two")).await.unwrap();
        store.delete_task("Philipp", 1).await.unwrap();

        let task = store.append_task("Philipp", draft("Three")).await.unwrap();
        assert_eq!(task.id, 3);
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_file_untouched() {
        let (temp_dir, store) = setup();

        store.append_task("Philipp", draft("One")).await.unwrap();
        let path = temp_dir.path().join("tasks_Philipp.md");
        let before = std::fs::read(&path).unwrap();

        let err = store.delete_task("Philipp", 42).await.unwrap_err();
        assert!(matches!(
            err,
            QuarterdeckError::TaskNotFound { task_id: 42, .. }
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_selective_update() {
        let (_temp_dir, store) = setup();

        store.append_task("Philipp", draft("One")).await.unwrap();
        let updates =
            TaskUpdate::from_json(&serde_json::json!({"status": "Done"})).unwrap();
        let task = store.update_task("Philipp", 1, updates).await.unwrap();

        assert_eq!(task.status, "Done");
        assert_eq!(task.title, "One");
        assert_eq!(task.assignee, "Philipp");
        assert_eq!(task.deadline, "2025-07-01");
        assert_eq!(task.description, "Details");
    }

    #[tokio::test]
    async fn test_empty_update_rejected_before_read() {
        let (temp_dir, store) = setup();

        let err = store
            .update_task("Philipp", 1, TaskUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, QuarterdeckError::Validation { .. }));
        assert!(!temp_dir.path().join("tasks_Philipp.md").exists());
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let (temp_dir, store) = setup();
        let path = temp_dir.path().join("tasks_Philipp.md");

        let content = format!(
            "# Task List for Philipp\n\n{TASK_TABLE_HEADER}\
             | 1 | Good | Philipp | 2025-07-01 | Fine | Pending |\n\
             | not-a-number | Bad | Philipp | 2025-07-01 | Skipped | Pending |\n\
             | 2 | Short row |\n\
             | 3 | Also good | Guillaume | 2025-07-02 | Fine | Done |\n"
        );
        std::fs::write(&path, content).unwrap();

        let listing = store.list_tasks("Philipp").await.unwrap();
        let ids: Vec<u32> = listing.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_file_without_header_parses_to_empty() {
        let (temp_dir, store) = setup();
        let path = temp_dir.path().join("tasks_Philipp.md");
        std::fs::write(&path, "Just some notes, no table here.\n").unwrap();

        let listing = store.list_tasks("Philipp").await.unwrap();
        assert!(listing.tasks.is_empty());
        assert_eq!(listing.raw_content, "Just some notes, no table here.\n");
    }

    #[tokio::test]
    async fn test_empty_user_name_rejected() {
        let (_temp_dir, store) = setup();
        let err = store.list_tasks("").await.unwrap_err();
        assert!(matches!(err, QuarterdeckError::InvalidUser));
    }

    #[tokio::test]
    async fn test_rows_persist_sorted_by_id() {
        let (temp_dir, store) = setup();
        let path = temp_dir.path().join("tasks_Philipp.md");

        // Seed a file with rows out of order.
        let content = format!(
            "# Task List for Philipp\n\n{TASK_TABLE_HEADER}\
             | 5 | Late | Philipp | 2025-07-05 | D | Pending |\n\
             | 2 | Early | Philipp | 2025-07-02 | D | Pending |\n"
        );
        std::fs::write(&path, content).unwrap();

        store.append_task("Philipp", draft("New")).await.unwrap();

        let listing = store.list_tasks("Philipp").await.unwrap();
        let ids: Vec<u32> = listing.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 5, 6]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_lose_tasks() {
        let (_temp_dir, store) = setup();
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append_task("Philipp", draft(&format!("Task {i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let listing = store.list_tasks("Philipp").await.unwrap();
        let ids: Vec<u32> = listing.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<u32>>());
    }
}

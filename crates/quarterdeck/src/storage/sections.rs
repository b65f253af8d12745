//! Section-level editing of flat markdown documents.
//!
//! A document is an optional preamble followed by `## `-titled sections.
//! Edits locate a section by exact title match and rewrite the whole file;
//! every untouched section keeps its original bytes.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::entities::{Section, SectionEdit, BODY_MARKER, SECTION_MARKER};
use crate::errors::{QuarterdeckError, QuarterdeckResult};

/// Boundary between sections: the title marker with any newlines before it.
fn section_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"\n*## ").expect("valid section boundary pattern"))
}

/// Ensure a title carries the section marker.
fn normalize_title(title: &str) -> String {
    if title.starts_with(SECTION_MARKER) {
        title.to_string()
    } else {
        format!("{SECTION_MARKER}{title}")
    }
}

/// Ensure a body carries the line marker and a trailing newline.
fn normalize_body(body: &str) -> String {
    let mut body = if body.starts_with(BODY_MARKER) {
        body.to_string()
    } else {
        format!("{BODY_MARKER}{body}")
    };
    if !body.ends_with('\n') {
        body.push('\n');
    }
    body
}

/// Split a document into its preamble and (delimiter, block) pairs.
///
/// The delimiter is the matched boundary text, newlines included, so joining
/// `preamble + delimiter + block + ...` reproduces the input byte-for-byte.
fn split_document(content: &str) -> (&str, Vec<(&str, &str)>) {
    let matches: Vec<_> = section_boundary().find_iter(content).collect();
    let preamble_end = matches.first().map_or(content.len(), regex::Match::start);
    let mut pairs = Vec::with_capacity(matches.len());
    for (i, m) in matches.iter().enumerate() {
        let block_end = matches.get(i + 1).map_or(content.len(), regex::Match::start);
        pairs.push((&content[m.start()..m.end()], &content[m.end()..block_end]));
    }
    (&content[..preamble_end], pairs)
}

/// Reconstruct the comparable title of a block: marker + trimmed first line.
fn block_title(block: &str) -> String {
    let first_line = block.lines().next().unwrap_or("").trim();
    format!("{SECTION_MARKER}{first_line}")
}

/// Editor over one sectioned markdown document.
pub struct SectionEditor {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SectionEditor {
    /// Create an editor over the given document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the document's full raw content.
    pub async fn read(&self) -> QuarterdeckResult<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(QuarterdeckError::DocumentNotFound {
                    path: self.path.display().to_string(),
                })
            }
            Err(e) => Err(QuarterdeckError::FileReadError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Parse the document into display sections (title text + raw body).
    pub async fn sections(&self) -> QuarterdeckResult<Vec<Section>> {
        let content = self.read().await?;
        let (_, pairs) = split_document(&content);
        Ok(pairs
            .iter()
            .map(|(_, block)| {
                let title = block.lines().next().unwrap_or("").trim().to_string();
                let body = block
                    .split_once('\n')
                    .map_or(String::new(), |(_, rest)| rest.to_string());
                Section { title, body }
            })
            .collect())
    }

    /// Append a new section at the end of the document.
    ///
    /// The document must already exist; this engine never creates it.
    pub async fn append_section(&self, title: &str, body: &str) -> QuarterdeckResult<()> {
        if title.trim().is_empty() {
            return Err(QuarterdeckError::validation("section title must not be empty"));
        }
        if body.trim().is_empty() {
            return Err(QuarterdeckError::validation("section body must not be empty"));
        }

        let title = normalize_title(title);
        let body = normalize_body(body);

        let _guard = self.lock.lock().await;
        let mut file = match fs::OpenOptions::new().append(true).open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(QuarterdeckError::DocumentNotFound {
                    path: self.path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(QuarterdeckError::FileWriteError {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        file.write_all(format!("\n\n{title}\n{body}").as_bytes())
            .await
            .map_err(|e| QuarterdeckError::FileWriteError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Modify or delete the first section whose title matches exactly.
    ///
    /// On a match the whole document is rewritten; every other section keeps
    /// its original bytes. Without a match the file is left untouched.
    pub async fn edit_section(
        &self,
        target_title: &str,
        edit: SectionEdit,
    ) -> QuarterdeckResult<()> {
        let target = normalize_title(target_title);

        let _guard = self.lock.lock().await;
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(QuarterdeckError::DocumentNotFound {
                    path: self.path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(QuarterdeckError::FileReadError {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let (preamble, pairs) = split_document(&content);

        let mut rebuilt = String::with_capacity(content.len());
        if !preamble.trim().is_empty() {
            rebuilt.push_str(preamble);
        }

        let mut found = false;
        for (delimiter, block) in pairs {
            if !found && block_title(block) == target {
                found = true;
                match &edit {
                    SectionEdit::Modify { body } => {
                        let title_line = block.lines().next().unwrap_or("").trim();
                        rebuilt.push_str(delimiter);
                        rebuilt.push_str(title_line);
                        rebuilt.push('\n');
                        rebuilt.push_str(&normalize_body(body));
                    }
                    SectionEdit::Delete => {}
                }
            } else {
                rebuilt.push_str(delimiter);
                rebuilt.push_str(block);
            }
        }

        if !found {
            return Err(QuarterdeckError::SectionNotFound { title: target });
        }

        fs::write(&self.path, rebuilt)
            .await
            .map_err(|e| QuarterdeckError::FileWriteError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

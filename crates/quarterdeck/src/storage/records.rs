//! Whole-file governance records: meeting logs, team profiles, and the
//! partnership documents. No structural parsing; reads and full overwrites
//! only.

use std::path::Path;

use chrono::NaiveDate;
use tokio::fs;

use crate::config::DocumentsConfig;
use crate::errors::{QuarterdeckError, QuarterdeckResult};

/// The two partnership documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerDoc {
    Agreement,
    Companion,
}

impl PartnerDoc {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::Companion => "companion",
        }
    }
}

impl std::fmt::Display for PartnerDoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartnerDoc {
    type Err = QuarterdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agreement" => Ok(Self::Agreement),
            "companion" => Ok(Self::Companion),
            _ => Err(QuarterdeckError::validation(format!(
                "invalid document type '{s}'; must be 'agreement' or 'companion'"
            ))),
        }
    }
}

/// Store for the whole-file records under the documents directory.
pub struct RecordStore {
    config: DocumentsConfig,
}

impl RecordStore {
    pub fn new(config: DocumentsConfig) -> Self {
        Self { config }
    }

    /// Meeting logs are keyed by date; anything else is a caller mistake.
    fn validate_meeting_date(date: &str) -> QuarterdeckResult<()> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            QuarterdeckError::validation(format!(
                "invalid date '{date}' for meeting log; expected YYYY-MM-DD"
            ))
        })?;
        Ok(())
    }

    async fn read_file(path: &Path) -> QuarterdeckResult<String> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(QuarterdeckError::DocumentNotFound {
                    path: path.display().to_string(),
                })
            }
            Err(e) => Err(QuarterdeckError::FileReadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Read the meeting log for one date.
    pub async fn read_meeting_log(&self, date: &str) -> QuarterdeckResult<String> {
        Self::validate_meeting_date(date)?;
        Self::read_file(&self.config.meeting_file(date)).await
    }

    /// Create or overwrite the meeting log for one date.
    pub async fn write_meeting_log(
        &self,
        date: &str,
        participants: &[String],
        content: &str,
    ) -> QuarterdeckResult<()> {
        Self::validate_meeting_date(date)?;

        let participant_list = participants
            .iter()
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n");
        let full_content = format!(
            "# Meeting Log: {date}\n\n## Participants\n{participant_list}\n\n## Notes\n{content}\n"
        );

        let path = self.config.meeting_file(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, full_content)
            .await
            .map_err(|e| QuarterdeckError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Read a crew member's profile. A missing or blank profile yields the
    /// default placeholder rather than an error.
    pub async fn read_profile(&self, member_name: &str) -> QuarterdeckResult<String> {
        if member_name.trim().is_empty() {
            return Err(QuarterdeckError::InvalidUser);
        }

        let path = self.config.profile_file(member_name);
        match fs::read_to_string(&path).await {
            Ok(content) if !content.trim().is_empty() => Ok(content),
            Ok(_) => Ok(Self::default_profile(member_name)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default_profile(member_name))
            }
            Err(e) => Err(QuarterdeckError::FileReadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn default_profile(member_name: &str) -> String {
        format!("# Profile: {member_name}\n\n(No details added yet.)")
    }

    /// Read one of the partnership documents.
    pub async fn read_partner_doc(&self, doc: PartnerDoc) -> QuarterdeckResult<String> {
        let path = match doc {
            PartnerDoc::Agreement => self.config.agreement_file(),
            PartnerDoc::Companion => self.config.companion_file(),
        };
        Self::read_file(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(DocumentsConfig::new(temp_dir.path()));
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_meeting_log_round_trip() {
        let (_temp_dir, store) = setup();

        store
            .write_meeting_log(
                "2025-06-01",
                &["Philipp".to_string(), "Guillaume".to_string()],
                "Agreed on the Q3 roadmap.",
            )
            .await
            .unwrap();

        let content = store.read_meeting_log("2025-06-01").await.unwrap();
        assert_eq!(
            content,
            "# Meeting Log: 2025-06-01\n\n\
             ## Participants\n- Philipp\n- Guillaume\n\n\
             ## Notes\nAgreed on the Q3 roadmap.\n"
        );
    }

    #[tokio::test]
    async fn test_meeting_log_rejects_bad_date() {
        let (_temp_dir, store) = setup();
        assert!(store.read_meeting_log("June 1st").await.is_err());
        assert!(store
            .write_meeting_log("2025-13-40", &[], "notes")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_missing_meeting_log() {
        let (_temp_dir, store) = setup();
        let err = store.read_meeting_log("2025-06-02").await.unwrap_err();
        assert!(matches!(err, QuarterdeckError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_profile_defaults_when_missing_or_blank() {
        let (temp_dir, store) = setup();

        let content = store.read_profile("Guillaume").await.unwrap();
        assert_eq!(content, "# Profile: Guillaume\n\n(No details added yet.)");

        std::fs::create_dir_all(temp_dir.path().join("profiles")).unwrap();
        std::fs::write(temp_dir.path().join("profiles/Philipp.md"), "   \n").unwrap();
        let content = store.read_profile("Philipp").await.unwrap();
        assert_eq!(content, "# Profile: Philipp\n\n(No details added yet.)");
    }

    #[tokio::test]
    async fn test_profile_reads_existing_content() {
        let (temp_dir, store) = setup();
        std::fs::create_dir_all(temp_dir.path().join("profiles")).unwrap();
        std::fs::write(
            temp_dir.path().join("profiles/Philipp.md"),
            "# Profile: Philipp\n\nLikes early meetings.\n",
        )
        .unwrap();

        let content = store.read_profile("Philipp").await.unwrap();
        assert!(content.contains("Likes early meetings."));
    }

    #[tokio::test]
    async fn test_partner_doc_read() {
        let (temp_dir, store) = setup();
        std::fs::write(
            temp_dir.path().join("partnership_agreement.md"),
            "# Partnership Agreement\n",
        )
        .unwrap();

        let content = store.read_partner_doc(PartnerDoc::Agreement).await.unwrap();
        assert!(content.starts_with("# Partnership Agreement"));

        let err = store
            .read_partner_doc(PartnerDoc::Companion)
            .await
            .unwrap_err();
        assert!(matches!(err, QuarterdeckError::DocumentNotFound { .. }));
    }

    #[test]
    fn test_partner_doc_parsing() {
        assert_eq!("agreement".parse::<PartnerDoc>().unwrap(), PartnerDoc::Agreement);
        assert_eq!("Companion".parse::<PartnerDoc>().unwrap(), PartnerDoc::Companion);
        assert!("minutes".parse::<PartnerDoc>().is_err());
    }
}

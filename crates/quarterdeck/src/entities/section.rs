//! Sectioned-document entity types.

use serde::Serialize;

use crate::errors::{QuarterdeckError, QuarterdeckResult};

/// Marker prefix identifying a section title line.
pub const SECTION_MARKER: &str = "## ";

/// Conventional prefix for section body lines.
pub const BODY_MARKER: &str = "- ";

/// A titled block of a sectioned document, as parsed for display.
///
/// `title` carries the text after the marker; `body` is the raw remainder of
/// the block, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Edit applied to a titled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionEdit {
    /// Replace the section body, keeping its title and position.
    Modify { body: String },
    /// Remove the section entirely, including its title line.
    Delete,
}

impl SectionEdit {
    /// Build from the wire-level `action` + optional `new_body` pair.
    pub fn from_action(action: &str, new_body: Option<&str>) -> QuarterdeckResult<Self> {
        match action {
            "modify" => match new_body {
                Some(body) => Ok(Self::Modify {
                    body: body.to_string(),
                }),
                None => Err(QuarterdeckError::validation(
                    "modification action requires 'new_body'",
                )),
            },
            "delete" => Ok(Self::Delete),
            other => Err(QuarterdeckError::validation(format!(
                "invalid action '{other}'; must be 'modify' or 'delete'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_action_modify_requires_body() {
        assert!(SectionEdit::from_action("modify", None).is_err());
        assert_eq!(
            SectionEdit::from_action("modify", Some("- rule")).unwrap(),
            SectionEdit::Modify {
                body: "- rule".to_string()
            }
        );
    }

    #[test]
    fn test_from_action_delete_ignores_body() {
        assert_eq!(
            SectionEdit::from_action("delete", Some("ignored")).unwrap(),
            SectionEdit::Delete
        );
    }

    #[test]
    fn test_from_action_rejects_unknown() {
        let err = SectionEdit::from_action("rename", None).unwrap_err();
        assert!(err.to_string().contains("rename"));
    }
}

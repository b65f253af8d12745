//! Governance context routing.
//!
//! A request is classified into one of five governance contexts; each context
//! delegates to the three specialists in a fixed order. The delegation graph
//! is static configuration, not behavior.

use serde::Serialize;

use crate::errors::QuarterdeckError;

/// The three specialist capabilities a context delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Specialist {
    /// Drafts plans, extracts tasks and decisions, writes governance documents
    Business,
    /// Checks plans and outcomes against the partnership's stated values
    ValueSoul,
    /// Reads team context and analyzes interactions and sentiment
    TeamSpirit,
}

impl Specialist {
    /// The specialist name as a lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::ValueSoul => "value-soul",
            Self::TeamSpirit => "team-spirit",
        }
    }

    /// One-line role description for this specialist.
    #[must_use]
    pub const fn role_description(&self) -> &'static str {
        match self {
            Self::Business => {
                "Operational lead: drafts plans, extracts tasks and decisions, and keeps the governance documents current"
            }
            Self::ValueSoul => {
                "Values steward: evaluates plans, outcomes, and decisions against the partnership's stated values"
            }
            Self::TeamSpirit => {
                "Team lead: reads profiles and meeting context, analyzes interactions and team sentiment"
            }
        }
    }
}

impl std::fmt::Display for Specialist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five governance contexts a request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Planning,
    Execution,
    Evaluation,
    Reflection,
    Resolution,
}

impl Context {
    /// All contexts, in routing-priority order.
    pub const ALL: [Self; 5] = [
        Self::Planning,
        Self::Execution,
        Self::Evaluation,
        Self::Reflection,
        Self::Resolution,
    ];

    /// The context name as a lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Evaluation => "evaluation",
            Self::Reflection => "reflection",
            Self::Resolution => "resolution",
        }
    }

    /// What this context covers.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Planning => {
                "Creating or refining plans, tasks, timelines, and resources; analyzing meetings for planning purposes"
            }
            Self::Execution => {
                "Tracking progress, status updates, logging work, marking tasks complete"
            }
            Self::Evaluation => {
                "Assessing outcomes, checking alignment with goals and values, evaluating meetings or tasks"
            }
            Self::Reflection => {
                "Facilitating team learning, gathering sentiment, capturing lessons learned"
            }
            Self::Resolution => {
                "Addressing conflicts, making decisions between options, formalizing agreements"
            }
        }
    }

    /// The ordered specialist sequence of this context's primary workflow.
    ///
    /// Planning, Execution, and Evaluation lead with the operational
    /// specialist; Reflection and Resolution lead with the team specialist.
    #[must_use]
    pub const fn delegation(&self) -> &'static [Specialist] {
        match self {
            Self::Planning | Self::Evaluation => {
                &[Specialist::Business, Specialist::ValueSoul, Specialist::TeamSpirit]
            }
            Self::Execution => {
                &[Specialist::Business, Specialist::TeamSpirit, Specialist::ValueSoul]
            }
            Self::Reflection | Self::Resolution => {
                &[Specialist::TeamSpirit, Specialist::ValueSoul, Specialist::Business]
            }
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Context {
    type Err = QuarterdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "execution" => Ok(Self::Execution),
            "evaluation" => Ok(Self::Evaluation),
            "reflection" => Ok(Self::Reflection),
            "resolution" => Ok(Self::Resolution),
            _ => Err(QuarterdeckError::validation(format!(
                "unknown governance context '{s}'"
            ))),
        }
    }
}

/// Infer the governance context for a request from its wording.
///
/// Keyword matching over the lowercased request, most specific signals first.
/// `None` means the request is ambiguous and the caller should ask for
/// clarification rather than guess.
#[must_use]
pub fn infer_context(request: &str) -> Option<Context> {
    let content = request.to_lowercase();

    // An explicit context name always wins.
    for context in Context::ALL {
        if content.contains(context.as_str()) {
            return Some(context);
        }
    }

    // Conflict/decision language (before evaluation; "decide between options"
    // often mentions assessing them too)
    if content.contains("conflict")
        || content.contains("disagree")
        || content.contains("dispute")
        || content.contains("decide")
        || content.contains("decision")
        || content.contains("mediate")
        || content.contains("formalize")
    {
        return Some(Context::Resolution);
    }

    // Team-learning language
    if content.contains("retrospective")
        || content.contains("lessons learned")
        || content.contains("sentiment")
        || content.contains("morale")
        || content.contains("reflect")
        || content.contains("feeling")
    {
        return Some(Context::Reflection);
    }

    // Assessment language
    if content.contains("evaluate")
        || content.contains("assess")
        || content.contains("alignment")
        || content.contains("aligned with")
        || content.contains("against our values")
    {
        return Some(Context::Evaluation);
    }

    // Progress language
    if content.contains("progress")
        || content.contains("status")
        || content.contains("mark ")
        || content.contains("complete")
        || content.contains("done")
        || content.contains("log work")
    {
        return Some(Context::Execution);
    }

    // Planning language
    if content.contains("plan")
        || content.contains("timeline")
        || content.contains("milestone")
        || content.contains("schedule")
        || content.contains("new task")
        || content.contains("add a task")
    {
        return Some(Context::Planning);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_context_keywords() {
        let cases = vec![
            ("Draft a plan for the autumn voyage", Some(Context::Planning)),
            ("Mark task 3 as complete", Some(Context::Execution)),
            ("What's the status of the refit?", Some(Context::Execution)),
            (
                "Evaluate last week's meeting against our values",
                Some(Context::Evaluation),
            ),
            (
                "Run a retrospective on the launch",
                Some(Context::Reflection),
            ),
            (
                "We disagree about the hiring budget",
                Some(Context::Resolution),
            ),
            ("Hello there", None),
        ];

        for (request, expected) in cases {
            assert_eq!(infer_context(request), expected, "Failed for: {request}");
        }
    }

    #[test]
    fn test_explicit_context_name_wins() {
        assert_eq!(
            infer_context("This is an execution concern about our plan"),
            Some(Context::Execution)
        );
    }

    #[test]
    fn test_delegation_is_total_and_ordered() {
        for context in Context::ALL {
            let plan = context.delegation();
            assert_eq!(plan.len(), 3, "each context delegates to all specialists");
        }
        assert_eq!(Context::Planning.delegation()[0], Specialist::Business);
        assert_eq!(Context::Reflection.delegation()[0], Specialist::TeamSpirit);
    }

    #[test]
    fn test_context_parsing() {
        assert_eq!("planning".parse::<Context>().unwrap(), Context::Planning);
        assert_eq!("Resolution".parse::<Context>().unwrap(), Context::Resolution);
        assert!("invalid".parse::<Context>().is_err());
    }
}

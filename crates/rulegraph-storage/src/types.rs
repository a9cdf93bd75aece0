//! Rule identity and metadata as served by the rule-metadata service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(s: &str) -> Self {
        RuleId(s.to_string())
    }
}

/// Summary of a stored rule (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Lifecycle status as reported by the backend (e.g. `DRAFT`, `ACTIVE`).
    #[serde(default)]
    pub status: String,
}

impl RuleSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        RuleSummary {
            id: RuleId(id.into()),
            name: name.into(),
            description: String::new(),
            status: String::new(),
        }
    }
}

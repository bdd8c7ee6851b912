use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Candidates a vote can be cast for. Stored as `CHAR(6)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Candidate {
    Tabs,
    Spaces,
}

impl Candidate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Candidate::Tabs => "TABS",
            Candidate::Spaces => "SPACES",
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Candidate {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TABS" => Ok(Candidate::Tabs),
            "SPACES" => Ok(Candidate::Spaces),
            other => Err(AppError::Validation(format!(
                "Unknown candidate {other:?}, expected TABS or SPACES"
            ))),
        }
    }
}

/// A row of the `votes` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub vote_id: u64,
    pub time_cast: DateTime<Utc>,
    pub candidate: String,
}

/// Vote counts per candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub tabs: i64,
    pub spaces: i64,
}

impl Tally {
    /// Candidate currently ahead, `None` on a tie.
    pub fn leader(&self) -> Option<Candidate> {
        match self.tabs.cmp(&self.spaces) {
            std::cmp::Ordering::Greater => Some(Candidate::Tabs),
            std::cmp::Ordering::Less => Some(Candidate::Spaces),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Row of the `Testing_model` table: an identity key and an `active` flag.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestingModel {
    pub id: Option<i64>,
    pub active: bool,
}

impl Default for TestingModel {
    fn default() -> Self {
        Self {
            id: None,
            active: true,
        }
    }
}

//! 5-Why root cause analysis records.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of steps in a 5-Why causal chain.
pub const WHY_DEPTH: usize = 5;

/// Whether an analysis is still being worked on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Open for edits.
    #[default]
    Draft,
    /// Signed off.
    Final,
}

impl AnalysisStatus {
    /// The stored and exported label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "final" => Ok(Self::Final),
            _ => Err(Error::invalid_field(
                "status",
                format!("unknown analysis status '{s}'"),
            )),
        }
    }
}

/// A 5-Why root cause analysis.
///
/// `whys[n]` is the reason at depth `n + 1` of the causal chain; any step may
/// be left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseRecord {
    /// Opaque unique id, assigned at creation.
    pub id: String,
    /// Short title; required.
    pub title: String,
    /// Problem under analysis; required.
    pub problem_statement: String,
    /// The causal chain, shallowest reason first.
    pub whys: [String; WHY_DEPTH],
    /// Conclusion drawn from the chain.
    pub root_cause_summary: String,
    /// Actions taken or planned against the root cause.
    pub corrective_actions: String,
    /// Draft or final.
    pub status: AnalysisStatus,
    /// Responsible person.
    pub owner: String,
    /// Day the record was created.
    pub date_created: NaiveDate,
    /// Day the record was last changed.
    pub date_modified: NaiveDate,
}

/// Partial root cause record used for both creation and merge updates.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootCauseDraft {
    pub title: Option<String>,
    pub problem_statement: Option<String>,
    pub whys: [Option<String>; WHY_DEPTH],
    pub root_cause_summary: Option<String>,
    pub corrective_actions: Option<String>,
    pub status: Option<AnalysisStatus>,
    pub owner: Option<String>,
}

impl RootCauseDraft {
    /// A draft carrying just the two required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, problem_statement: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            problem_statement: Some(problem_statement.into()),
            ..Self::default()
        }
    }

    /// Set the reason at `depth` (1-based). Depths outside 1..=5 are ignored.
    #[must_use]
    pub fn with_why(mut self, depth: usize, reason: impl Into<String>) -> Self {
        if let Some(slot) = depth.checked_sub(1).and_then(|i| self.whys.get_mut(i)) {
            *slot = Some(reason.into());
        }
        self
    }
}

impl RootCauseRecord {
    /// Build a new record from a draft, filling defaults for unset fields.
    #[must_use]
    pub fn from_draft(id: String, today: NaiveDate, draft: RootCauseDraft, owner: &str) -> Self {
        Self {
            id,
            title: draft.title.unwrap_or_default(),
            problem_statement: draft.problem_statement.unwrap_or_default(),
            whys: draft.whys.map(Option::unwrap_or_default),
            root_cause_summary: draft.root_cause_summary.unwrap_or_default(),
            corrective_actions: draft.corrective_actions.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            owner: draft
                .owner
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| owner.to_string()),
            date_created: today,
            date_modified: today,
        }
    }

    /// Overwrite every field the draft provides.
    pub fn merge(&mut self, draft: RootCauseDraft) {
        if let Some(title) = draft.title {
            self.title = title;
        }
        if let Some(problem) = draft.problem_statement {
            self.problem_statement = problem;
        }
        for (slot, why) in self.whys.iter_mut().zip(draft.whys) {
            if let Some(why) = why {
                *slot = why;
            }
        }
        if let Some(summary) = draft.root_cause_summary {
            self.root_cause_summary = summary;
        }
        if let Some(actions) = draft.corrective_actions {
            self.corrective_actions = actions;
        }
        if let Some(status) = draft.status {
            self.status = status;
        }
        if let Some(owner) = draft.owner {
            self.owner = owner;
        }
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming every blank required field.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.problem_statement.trim().is_empty() {
            missing.push("problemStatement");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing(missing))
        }
    }

    /// The reason at `depth` (1-based), if in range.
    #[must_use]
    pub fn why(&self, depth: usize) -> Option<&str> {
        depth
            .checked_sub(1)
            .and_then(|i| self.whys.get(i))
            .map(String::as_str)
    }

    /// Answered steps of the chain as `(depth, reason)` pairs.
    pub fn causal_chain(&self) -> impl Iterator<Item = (usize, &str)> {
        self.whys
            .iter()
            .enumerate()
            .filter(|(_, why)| !why.trim().is_empty())
            .map(|(i, why)| (i + 1, why.as_str()))
    }
}

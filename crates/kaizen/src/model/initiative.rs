//! Kaizen initiative records.
//!
//! An initiative is a tracked continuous-improvement effort with a
//! lifecycle status, measured savings, and an append-only comment thread.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle status of an initiative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum InitiativeStatus {
    /// Suggested but not started.
    #[default]
    Proposed,
    /// Work underway.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Finished; savings count towards rollups.
    Completed,
    /// Shelved.
    Archived,
}

impl InitiativeStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Proposed,
        Self::InProgress,
        Self::Completed,
        Self::Archived,
    ];

    /// The display label, as stored and exported.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }
}

impl std::fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InitiativeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "proposed" => Ok(Self::Proposed),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(Error::invalid_field(
                "status",
                format!("unknown initiative status '{s}'"),
            )),
        }
    }
}

/// A comment on an initiative. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier within the parent's thread.
    pub id: String,
    /// Comment body; never blank.
    pub text: String,
    /// Who wrote it.
    pub author: String,
    /// Day it was written.
    pub date: NaiveDate,
}

/// A Kaizen initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    /// Opaque unique id, assigned at creation.
    pub id: String,
    /// Short title; required.
    pub title: String,
    /// When work started.
    pub date_started: NaiveDate,
    /// When work finished, if it has.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<NaiveDate>,
    /// Owning department; may be empty.
    pub department: String,
    /// Problem being addressed; required.
    pub problem_statement: String,
    /// Summary of the diagnosed root cause.
    pub root_cause_summary: String,
    /// Planned countermeasures.
    pub action_plan: String,
    /// Responsible person.
    pub owner: String,
    /// Lifecycle status.
    pub status: InitiativeStatus,
    /// Key performance indicators before the change.
    #[serde(rename = "beforeKPIs")]
    pub before_kpis: String,
    /// Key performance indicators after the change.
    #[serde(rename = "afterKPIs")]
    pub after_kpis: String,
    /// Hours saved; never negative.
    pub time_saved: f64,
    /// Currency units saved; never negative.
    pub cost_savings: f64,
    /// Day the record was created.
    pub date_created: NaiveDate,
    /// Day the record was last changed.
    pub date_modified: NaiveDate,
    /// Comment thread in insertion order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Partial initiative used for both creation and merge updates.
///
/// `None` means "not provided": on create the field takes its default, on
/// update the existing value is kept.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitiativeDraft {
    pub title: Option<String>,
    pub date_started: Option<NaiveDate>,
    /// `Some(None)` clears the completion date.
    pub date_completed: Option<Option<NaiveDate>>,
    pub department: Option<String>,
    pub problem_statement: Option<String>,
    pub root_cause_summary: Option<String>,
    pub action_plan: Option<String>,
    pub owner: Option<String>,
    pub status: Option<InitiativeStatus>,
    pub before_kpis: Option<String>,
    pub after_kpis: Option<String>,
    pub time_saved: Option<f64>,
    pub cost_savings: Option<f64>,
}

impl InitiativeDraft {
    /// A draft carrying just the two required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, problem_statement: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            problem_statement: Some(problem_statement.into()),
            ..Self::default()
        }
    }
}

impl Initiative {
    /// Build a new initiative from a draft, filling defaults for unset fields.
    ///
    /// Does not validate; see [`Initiative::validate`].
    #[must_use]
    pub fn from_draft(id: String, today: NaiveDate, draft: InitiativeDraft, owner: &str) -> Self {
        Self {
            id,
            title: draft.title.unwrap_or_default(),
            date_started: draft.date_started.unwrap_or(today),
            date_completed: draft.date_completed.flatten(),
            department: draft.department.unwrap_or_default(),
            problem_statement: draft.problem_statement.unwrap_or_default(),
            root_cause_summary: draft.root_cause_summary.unwrap_or_default(),
            action_plan: draft.action_plan.unwrap_or_default(),
            owner: draft
                .owner
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| owner.to_string()),
            status: draft.status.unwrap_or_default(),
            before_kpis: draft.before_kpis.unwrap_or_default(),
            after_kpis: draft.after_kpis.unwrap_or_default(),
            time_saved: draft.time_saved.unwrap_or(0.0),
            cost_savings: draft.cost_savings.unwrap_or(0.0),
            date_created: today,
            date_modified: today,
            comments: Vec::new(),
        }
    }

    /// Overwrite every field the draft provides.
    pub fn merge(&mut self, draft: InitiativeDraft) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.title, draft.title);
        set(&mut self.date_started, draft.date_started);
        set(&mut self.date_completed, draft.date_completed);
        set(&mut self.department, draft.department);
        set(&mut self.problem_statement, draft.problem_statement);
        set(&mut self.root_cause_summary, draft.root_cause_summary);
        set(&mut self.action_plan, draft.action_plan);
        set(&mut self.owner, draft.owner);
        set(&mut self.status, draft.status);
        set(&mut self.before_kpis, draft.before_kpis);
        set(&mut self.after_kpis, draft.after_kpis);
        set(&mut self.time_saved, draft.time_saved);
        set(&mut self.cost_savings, draft.cost_savings);
    }

    /// Check required fields and record invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming every blank required field, or
    /// [`Error::InvalidField`] for the first broken invariant.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.problem_statement.trim().is_empty() {
            missing.push("problemStatement");
        }
        if !missing.is_empty() {
            return Err(Error::missing(missing));
        }

        non_negative("timeSaved", self.time_saved)?;
        non_negative("costSavings", self.cost_savings)?;

        if let Some(completed) = self.date_completed {
            if completed < self.date_started {
                return Err(Error::invalid_field(
                    "dateCompleted",
                    format!(
                        "{completed} is before the start date {}",
                        self.date_started
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Whether savings from this initiative count towards rollups.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == InitiativeStatus::Completed
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    // NaN fails this comparison too
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_field(
            field,
            format!("must be a non-negative number, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_labels_round_trip_through_from_str() {
        for status in InitiativeStatus::ALL {
            assert_eq!(status.label().parse::<InitiativeStatus>().unwrap(), status);
        }
        assert_eq!(
            "in-progress".parse::<InitiativeStatus>().unwrap(),
            InitiativeStatus::InProgress
        );
        assert!("done".parse::<InitiativeStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&InitiativeStatus::InProgress).unwrap();
        assert_eq!(json, r#""In Progress""#);
    }

    #[test]
    fn test_from_draft_fills_defaults() {
        let today = day("2024-03-01");
        let initiative = Initiative::from_draft(
            "1".to_string(),
            today,
            InitiativeDraft::new("T", "P"),
            "Current User",
        );

        assert_eq!(initiative.owner, "Current User");
        assert_eq!(initiative.department, "");
        assert_eq!(initiative.status, InitiativeStatus::Proposed);
        assert_eq!(initiative.date_started, today);
        assert_eq!(initiative.date_created, today);
        assert_eq!(initiative.date_modified, today);
        assert!(initiative.date_completed.is_none());
        assert!(initiative.comments.is_empty());
        assert!(initiative.validate().is_ok());
    }

    #[test]
    fn test_blank_owner_falls_back_to_default() {
        let draft = InitiativeDraft {
            owner: Some(String::new()),
            ..InitiativeDraft::new("T", "P")
        };
        let initiative = Initiative::from_draft("1".into(), day("2024-03-01"), draft, "Ops");
        assert_eq!(initiative.owner, "Ops");
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let initiative = Initiative::from_draft(
            "1".into(),
            day("2024-03-01"),
            InitiativeDraft::default(),
            "Current User",
        );
        match initiative.validate() {
            Err(Error::Validation { missing_fields }) => {
                assert_eq!(missing_fields, vec!["title", "problemStatement"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_savings() {
        let draft = InitiativeDraft {
            cost_savings: Some(-1.0),
            ..InitiativeDraft::new("T", "P")
        };
        let initiative = Initiative::from_draft("1".into(), day("2024-03-01"), draft, "U");
        let err = initiative.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "costSavings", .. }));
    }

    #[test]
    fn test_validate_rejects_nan_time_saved() {
        let draft = InitiativeDraft {
            time_saved: Some(f64::NAN),
            ..InitiativeDraft::new("T", "P")
        };
        let initiative = Initiative::from_draft("1".into(), day("2024-03-01"), draft, "U");
        assert!(initiative.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_completion_before_start() {
        let draft = InitiativeDraft {
            date_started: Some(day("2024-03-10")),
            date_completed: Some(Some(day("2024-03-01"))),
            ..InitiativeDraft::new("T", "P")
        };
        let initiative = Initiative::from_draft("1".into(), day("2024-03-10"), draft, "U");
        let err = initiative.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "dateCompleted", .. }));
    }

    #[test]
    fn test_merge_only_touches_provided_fields() {
        let mut initiative =
            Initiative::from_draft("1".into(), day("2024-03-01"), InitiativeDraft::new("T", "P"), "U");
        let before = initiative.clone();

        initiative.merge(InitiativeDraft {
            status: Some(InitiativeStatus::Completed),
            ..InitiativeDraft::default()
        });

        assert_eq!(initiative.status, InitiativeStatus::Completed);
        assert_eq!(initiative.title, before.title);
        assert_eq!(initiative.owner, before.owner);
        assert_eq!(initiative.date_started, before.date_started);
    }

    #[test]
    fn test_merge_clears_completion_date() {
        let draft = InitiativeDraft {
            date_completed: Some(Some(day("2024-03-05"))),
            ..InitiativeDraft::new("T", "P")
        };
        let mut initiative = Initiative::from_draft("1".into(), day("2024-03-01"), draft, "U");

        initiative.merge(InitiativeDraft::default());
        assert_eq!(initiative.date_completed, Some(day("2024-03-05")));

        initiative.merge(InitiativeDraft {
            date_completed: Some(None),
            ..InitiativeDraft::default()
        });
        assert!(initiative.date_completed.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let initiative =
            Initiative::from_draft("1".into(), day("2024-03-01"), InitiativeDraft::new("T", "P"), "U");
        let json = serde_json::to_value(&initiative).unwrap();

        assert_eq!(json["problemStatement"], "P");
        assert_eq!(json["dateCreated"], "2024-03-01");
        assert!(json.get("beforeKPIs").is_some());
        assert!(json.get("afterKPIs").is_some());
        assert!(json.get("dateCompleted").is_none());
    }
}

//! Search and attribute filtering over record collections.
//!
//! [`apply`] is a pure, stable filter: it keeps the input order, never
//! mutates its input, and each active criterion is an independent
//! conjunctive predicate, so the result does not depend on the order the
//! criteria are checked in.

use crate::model::{AnalysisStatus, Initiative, InitiativeStatus, RootCauseRecord};

/// A record that can be narrowed by [`apply`].
pub trait Filterable {
    /// Status type compared by the status filter.
    type Status: PartialEq + Copy;

    /// Fields searched by free text, in a fixed per-kind list.
    fn search_fields(&self) -> Vec<&str>;

    /// The record's status.
    fn status(&self) -> Self::Status;

    /// Secondary attribute (department) if the kind has one.
    fn secondary(&self) -> Option<&str> {
        None
    }
}

impl Filterable for Initiative {
    type Status = InitiativeStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.problem_statement.as_str(),
            self.owner.as_str(),
            self.department.as_str(),
        ]
    }

    fn status(&self) -> InitiativeStatus {
        self.status
    }

    fn secondary(&self) -> Option<&str> {
        Some(&self.department)
    }
}

impl Filterable for RootCauseRecord {
    type Status = AnalysisStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.problem_statement.as_str(),
            self.owner.as_str(),
        ]
    }

    fn status(&self) -> AnalysisStatus {
        self.status
    }
}

/// A filter dimension that is either disabled ("all") or an exact match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<V> {
    /// Filter disabled.
    #[default]
    All,
    /// Keep only records equal to this value.
    Only(V),
}

impl<V: PartialEq> Selection<V> {
    /// Whether `value` passes this selection.
    pub fn accepts(&self, value: &V) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<V> From<Option<V>> for Selection<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// Filter criteria for one record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria<S> {
    /// Case-insensitive substring searched in the kind's search fields.
    /// Empty means no search.
    pub search: String,
    /// Exact status match.
    pub status: Selection<S>,
    /// Exact secondary attribute (department) match.
    pub secondary: Selection<String>,
}

impl<S> Default for Criteria<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: Selection::All,
            secondary: Selection::All,
        }
    }
}

impl<S> Criteria<S> {
    /// Criteria with every filter disabled.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Keep only records with `status`.
    #[must_use]
    pub fn status(mut self, status: S) -> Self {
        self.status = Selection::Only(status);
        self
    }

    /// Keep only records whose secondary attribute equals `value`.
    #[must_use]
    pub fn secondary(mut self, value: impl Into<String>) -> Self {
        self.secondary = Selection::Only(value.into());
        self
    }
}

/// Narrow `records` to those matching every active criterion, keeping order.
#[must_use]
pub fn apply<'a, T: Filterable>(records: &'a [T], criteria: &Criteria<T::Status>) -> Vec<&'a T> {
    let needle = criteria.search.to_lowercase();

    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|record| criteria.status.accepts(&record.status()))
        .filter(|record| match &criteria.secondary {
            Selection::All => true,
            Selection::Only(wanted) => record.secondary() == Some(wanted.as_str()),
        })
        .collect()
}

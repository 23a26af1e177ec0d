//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and how their
//! arguments turn into record drafts and filter criteria.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::error::{Error, Result};
use crate::filter::{Criteria, Selection};
use crate::model::{
    AnalysisStatus, InitiativeDraft, InitiativeStatus, RootCauseDraft, WHY_DEPTH,
};

/// Initiative commands.
#[derive(Debug, Subcommand)]
pub enum InitiativeCommand {
    /// List initiatives, optionally filtered
    List(InitiativeListCommand),

    /// Show one initiative with its comments
    Show {
        /// Initiative id
        id: String,
    },

    /// Create an initiative
    Create(InitiativeFields),

    /// Change fields of an existing initiative
    Update {
        /// Initiative id
        id: String,

        #[command(flatten)]
        fields: InitiativeFields,
    },

    /// Delete an initiative and its comments
    Delete {
        /// Initiative id
        id: String,
    },

    /// Add a comment to an initiative
    Comment {
        /// Initiative id
        id: String,

        /// Comment text
        text: String,

        /// Comment author (defaults to `records.comment_author`)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Export every initiative as CSV
    Export {
        /// Output file, or `-` for stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Export one initiative as label,value lines
    ExportOne {
        /// Initiative id
        id: String,

        /// Output file, or `-` for stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Show dashboard aggregates
    Dashboard {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Initiative list arguments.
#[derive(Debug, Args)]
pub struct InitiativeListCommand {
    /// Case-insensitive text searched in title, problem, owner and department
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Keep only this status
    #[arg(long, value_enum)]
    pub status: Option<InitiativeStatusArg>,

    /// Keep only this department (exact match)
    #[arg(short, long)]
    pub department: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl InitiativeListCommand {
    /// Filter criteria for these arguments.
    #[must_use]
    pub fn criteria(&self) -> Criteria<InitiativeStatus> {
        Criteria {
            search: self.search.clone(),
            status: Selection::from(self.status.map(InitiativeStatus::from)),
            secondary: Selection::from(self.department.clone()),
        }
    }
}

/// Editable initiative fields. Every field is optional; unset fields keep
/// their current value on update and their default on create.
#[derive(Debug, Default, Args)]
pub struct InitiativeFields {
    /// Short title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Problem being addressed
    #[arg(short, long)]
    pub problem: Option<String>,

    /// Owning department
    #[arg(short, long)]
    pub department: Option<String>,

    /// Responsible person
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Lifecycle status
    #[arg(long, value_enum)]
    pub status: Option<InitiativeStatusArg>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub started: Option<NaiveDate>,

    /// Completion date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", conflicts_with = "clear_completed")]
    pub completed: Option<NaiveDate>,

    /// Remove the completion date
    #[arg(long)]
    pub clear_completed: bool,

    /// Root cause summary
    #[arg(long)]
    pub root_cause: Option<String>,

    /// Action plan
    #[arg(long)]
    pub action_plan: Option<String>,

    /// KPIs before the change
    #[arg(long)]
    pub before_kpis: Option<String>,

    /// KPIs after the change
    #[arg(long)]
    pub after_kpis: Option<String>,

    /// Hours saved
    #[arg(long, value_name = "HOURS")]
    pub time_saved: Option<f64>,

    /// Cost savings
    #[arg(long, value_name = "AMOUNT")]
    pub cost_savings: Option<f64>,
}

impl From<InitiativeFields> for InitiativeDraft {
    fn from(fields: InitiativeFields) -> Self {
        Self {
            title: fields.title,
            date_started: fields.started,
            date_completed: if fields.clear_completed {
                Some(None)
            } else {
                fields.completed.map(Some)
            },
            department: fields.department,
            problem_statement: fields.problem,
            root_cause_summary: fields.root_cause,
            action_plan: fields.action_plan,
            owner: fields.owner,
            status: fields.status.map(InitiativeStatus::from),
            before_kpis: fields.before_kpis,
            after_kpis: fields.after_kpis,
            time_saved: fields.time_saved,
            cost_savings: fields.cost_savings,
        }
    }
}

/// Root cause analysis commands.
#[derive(Debug, Subcommand)]
pub enum RcaCommand {
    /// List analyses, optionally filtered
    List(RcaListCommand),

    /// Show one analysis with its causal chain
    Show {
        /// Analysis id
        id: String,
    },

    /// Create an analysis
    Create(RcaFields),

    /// Change fields of an existing analysis
    Update {
        /// Analysis id
        id: String,

        #[command(flatten)]
        fields: RcaFields,
    },

    /// Delete an analysis
    Delete {
        /// Analysis id
        id: String,
    },

    /// Export one analysis as label,value lines
    Export {
        /// Analysis id
        id: String,

        /// Output file, or `-` for stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Root cause analysis list arguments.
#[derive(Debug, Args)]
pub struct RcaListCommand {
    /// Case-insensitive text searched in title, problem and owner
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Keep only this status
    #[arg(long, value_enum)]
    pub status: Option<AnalysisStatusArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RcaListCommand {
    /// Filter criteria for these arguments.
    #[must_use]
    pub fn criteria(&self) -> Criteria<AnalysisStatus> {
        Criteria {
            search: self.search.clone(),
            status: Selection::from(self.status.map(AnalysisStatus::from)),
            secondary: Selection::All,
        }
    }
}

/// Editable root cause analysis fields.
#[derive(Debug, Default, Args)]
pub struct RcaFields {
    /// Short title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Problem being analysed
    #[arg(short, long)]
    pub problem: Option<String>,

    /// Reasons of the causal chain, first why first (up to five)
    #[arg(short = 'w', long = "why", value_name = "REASON")]
    pub whys: Vec<String>,

    /// Root cause summary
    #[arg(long)]
    pub root_cause: Option<String>,

    /// Corrective actions
    #[arg(long)]
    pub corrective_actions: Option<String>,

    /// Analysis status
    #[arg(long, value_enum)]
    pub status: Option<AnalysisStatusArg>,

    /// Responsible person
    #[arg(short, long)]
    pub owner: Option<String>,
}

impl TryFrom<RcaFields> for RootCauseDraft {
    type Error = Error;

    fn try_from(fields: RcaFields) -> Result<Self> {
        if fields.whys.len() > WHY_DEPTH {
            return Err(Error::invalid_field(
                "whys",
                format!(
                    "at most {WHY_DEPTH} reasons allowed, got {}",
                    fields.whys.len()
                ),
            ));
        }

        let mut draft = Self {
            title: fields.title,
            problem_statement: fields.problem,
            root_cause_summary: fields.root_cause,
            corrective_actions: fields.corrective_actions,
            status: fields.status.map(AnalysisStatus::from),
            owner: fields.owner,
            ..Self::default()
        };
        for (index, reason) in fields.whys.into_iter().enumerate() {
            draft = draft.with_why(index + 1, reason);
        }
        Ok(draft)
    }
}

/// Collection targeted by a bulk reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResetTarget {
    /// Kaizen initiatives
    Initiatives,
    /// Root cause analyses
    Rca,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Collection to delete
    #[arg(value_enum)]
    pub target: ResetTarget,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Initiative status argument for filtering and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitiativeStatusArg {
    /// Suggested but not started
    Proposed,
    /// Work underway
    InProgress,
    /// Finished
    Completed,
    /// Shelved
    Archived,
}

impl From<InitiativeStatusArg> for InitiativeStatus {
    fn from(arg: InitiativeStatusArg) -> Self {
        match arg {
            InitiativeStatusArg::Proposed => Self::Proposed,
            InitiativeStatusArg::InProgress => Self::InProgress,
            InitiativeStatusArg::Completed => Self::Completed,
            InitiativeStatusArg::Archived => Self::Archived,
        }
    }
}

/// Analysis status argument for filtering and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalysisStatusArg {
    /// Open for edits
    Draft,
    /// Signed off
    Final,
}

impl From<AnalysisStatusArg> for AnalysisStatus {
    fn from(arg: AnalysisStatusArg) -> Self {
        match arg {
            AnalysisStatusArg::Draft => Self::Draft,
            AnalysisStatusArg::Final => Self::Final,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

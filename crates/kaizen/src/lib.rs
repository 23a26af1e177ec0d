//! `kaizen` - Record keeping for continuous-improvement work
//!
//! This library keeps Kaizen initiatives and 5-Why root cause analyses in
//! durable local storage, and derives filtered views, dashboard rollups and
//! CSV exports from them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod comments;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repository;
pub mod seed;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{
    AnalysisStatus, Comment, Initiative, InitiativeDraft, InitiativeStatus, RootCauseDraft,
    RootCauseRecord,
};
pub use repository::{Record, Repository};
pub use storage::{Store, StoreStats};

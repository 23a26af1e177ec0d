//! Record types kept by the portal.

pub mod initiative;
pub mod root_cause;

pub use initiative::{Comment, Initiative, InitiativeDraft, InitiativeStatus};
pub use root_cause::{AnalysisStatus, RootCauseDraft, RootCauseRecord, WHY_DEPTH};

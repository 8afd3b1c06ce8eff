//! Resume builder library

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod processing;
pub mod record;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{Result, ResumeBuilderError};
pub use processing::ats_scorer::{score, AtsScorer, ScoreBand, ScoreBreakdown};
pub use processing::text_improver::TextImprover;
pub use record::{ExperienceEntry, ResumeField, ResumeRecord};
pub use session::ResumeSession;

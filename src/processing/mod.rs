//! Scoring and text improvement

pub mod ats_scorer;
pub mod text_improver;

//! What the live preview shows for a record

use crate::processing::ats_scorer::{AtsScorer, ScoreBand, ScoreBreakdown};
use crate::record::{
    ExperienceEntry, ResumeField, ResumeRecord, DEFAULT_FONT, DEFAULT_TEMPLATE, DEFAULT_THEME_COLOR,
};
use serde::{Deserialize, Serialize};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const TITLE_PLACEHOLDER: &str = "Professional Title";
pub const SUMMARY_PLACEHOLDER: &str = "Summary...";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePreview {
    pub name: String,
    pub title: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    /// Entries with a role or a company; blank ones are hidden
    pub experience: Vec<ExperienceEntry>,
    pub logo: Option<String>,
    pub template: String,
    pub theme_color: String,
    pub font: String,
    pub score: ScoreBreakdown,
    pub band: ScoreBand,
}

impl ResumePreview {
    pub fn build(record: &ResumeRecord, scorer: &AtsScorer) -> Self {
        let score = scorer.breakdown(record);
        let band = ScoreBand::from_score(score.total);

        Self {
            name: or_placeholder(record.get(ResumeField::FullName), NAME_PLACEHOLDER),
            title: or_placeholder(record.get(ResumeField::JobTitle), TITLE_PLACEHOLDER),
            email: non_empty(record.get(ResumeField::Email)),
            phone: non_empty(record.get(ResumeField::Phone)),
            summary: or_placeholder(record.get(ResumeField::Summary), SUMMARY_PLACEHOLDER),
            skills: record.skill_list().into_iter().map(str::to_string).collect(),
            experience: record
                .experience()
                .iter()
                .filter(|entry| entry.has_heading())
                .cloned()
                .collect(),
            logo: non_empty(record.get(ResumeField::Logo)),
            template: or_placeholder(record.get(ResumeField::Template), DEFAULT_TEMPLATE),
            theme_color: or_placeholder(record.get(ResumeField::ThemeColor), DEFAULT_THEME_COLOR),
            font: or_placeholder(record.get(ResumeField::Font), DEFAULT_FONT),
            score,
            band,
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

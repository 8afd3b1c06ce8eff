//! Heuristic ATS (Applicant Tracking System) score for a resume record
//!
//! The score is the sum of three capped components:
//! - completeness of the core fields (max 50)
//! - distinct keyword presence in the serialized record (max 30)
//! - size of the serialized record (max 20)

use crate::record::{utf16_len, ResumeRecord};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

pub const ATS_KEYWORDS: [&str; 12] = [
    "team",
    "led",
    "developed",
    "design",
    "analysis",
    "project",
    "managed",
    "customer",
    "javascript",
    "html",
    "python",
    "sales",
];

pub const MAX_COMPLETENESS: u8 = 50;
pub const MAX_KEYWORDS: u8 = 30;
pub const MAX_FORMAT: u8 = 20;
pub const POINTS_PER_KEYWORD: usize = 3;
/// Serialized length at which the format bonus is complete
pub const FULL_FORMAT_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u8,
    pub completeness: u8,
    pub keywords: u8,
    pub format: u8,
    pub matched_keywords: Vec<String>,
    pub serialized_length: usize,
}

/// Colour band of the score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => ScoreBand::Low,
            50..=79 => ScoreBand::Medium,
            _ => ScoreBand::High,
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            ScoreBand::Low => "#ef4444",
            ScoreBand::Medium => "#f59e0b",
            ScoreBand::High => "#10b981",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Low => write!(f, "low"),
            ScoreBand::Medium => write!(f, "medium"),
            ScoreBand::High => write!(f, "high"),
        }
    }
}

pub struct AtsScorer {
    keyword_matcher: AhoCorasick,
}

impl Default for AtsScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtsScorer {
    pub fn new() -> Self {
        // Standard match kind is required for overlapping search
        let keyword_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(ATS_KEYWORDS)
            .expect("Invalid ATS keyword automaton");

        Self { keyword_matcher }
    }

    /// Score in `0..=100`.
    pub fn score(&self, record: &ResumeRecord) -> u8 {
        self.breakdown(record).total
    }

    pub fn breakdown(&self, record: &ResumeRecord) -> ScoreBreakdown {
        let blob = serialize_lowercase(record);
        let serialized_length = utf16_len(&blob);

        let completeness = completeness_score(record);
        let matched_keywords = self.matched_keywords(&blob);
        let keywords = (matched_keywords.len() * POINTS_PER_KEYWORD).min(MAX_KEYWORDS as usize) as u8;
        let format = format_score(serialized_length);

        let total = (completeness as u16 + keywords as u16 + format as u16).min(100) as u8;
        debug!(
            "ATS score {} (completeness {}, keywords {}, format {})",
            total, completeness, keywords, format
        );

        ScoreBreakdown {
            total,
            completeness,
            keywords,
            format,
            matched_keywords,
            serialized_length,
        }
    }

    /// Distinct keywords occurring anywhere in `blob`, in keyword-list order.
    /// Substring presence, not whole words: "led" is found inside "skilled".
    pub fn matched_keywords(&self, blob: &str) -> Vec<String> {
        let found: BTreeSet<usize> = self
            .keyword_matcher
            .find_overlapping_iter(blob)
            .map(|mat| mat.pattern().as_usize())
            .collect();

        found.into_iter().map(|id| ATS_KEYWORDS[id].to_string()).collect()
    }
}

/// Score a record with a shared scorer.
pub fn score(record: &ResumeRecord) -> u8 {
    static SCORER: OnceLock<AtsScorer> = OnceLock::new();
    SCORER.get_or_init(AtsScorer::new).score(record)
}

fn completeness_score(record: &ResumeRecord) -> u8 {
    let mut points = 0;

    if record.fullname.as_deref().is_some_and(|name| utf16_len(name) > 2) {
        points += 10;
    }
    if record.email.as_deref().is_some_and(|email| email.contains('@')) {
        points += 10;
    }
    if record.phone.as_deref().is_some_and(|phone| utf16_len(phone) > 8) {
        points += 5;
    }
    if record.summary.as_deref().is_some_and(|summary| utf16_len(summary) > 50) {
        points += 10;
    }
    if record.experience().iter().any(|entry| entry.is_filled()) {
        points += 10;
    }
    if record.skills.as_deref().is_some_and(|skills| !skills.is_empty()) {
        points += 5;
    }

    points.min(MAX_COMPLETENESS)
}

fn format_score(serialized_length: usize) -> u8 {
    if serialized_length > FULL_FORMAT_LENGTH {
        MAX_FORMAT
    } else {
        (MAX_FORMAT as usize * serialized_length / FULL_FORMAT_LENGTH) as u8
    }
}

fn serialize_lowercase(record: &ResumeRecord) -> String {
    match serde_json::to_string(record) {
        Ok(json) => json.to_lowercase(),
        Err(e) => {
            warn!("Could not serialize record for scoring: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ExperienceEntry, ResumeField};

    #[test]
    fn test_empty_record_scores_zero() {
        let scorer = AtsScorer::new();
        let breakdown = scorer.breakdown(&ResumeRecord::default());
        assert_eq!(breakdown.serialized_length, 2);
        assert_eq!(breakdown.total, 0);
        assert_eq!(score(&ResumeRecord::default()), 0);
    }

    #[test]
    fn test_fresh_builder_record() {
        let breakdown = AtsScorer::new().breakdown(&ResumeRecord::new());
        assert_eq!(breakdown.completeness, 0);
        assert!(breakdown.matched_keywords.is_empty());
        // floor(20 * 184 / 500)
        assert_eq!(breakdown.serialized_length, 184);
        assert_eq!(breakdown.format, 7);
        assert_eq!(breakdown.total, 7);
    }

    #[test]
    fn test_completeness_points() {
        let mut record = ResumeRecord::default();
        record.set(ResumeField::FullName, "Al");
        assert_eq!(completeness_score(&record), 0);
        record.set(ResumeField::FullName, "Ada");
        assert_eq!(completeness_score(&record), 10);
        record.set(ResumeField::Email, "ada@example.com");
        assert_eq!(completeness_score(&record), 20);
        record.set(ResumeField::Phone, "12345678");
        assert_eq!(completeness_score(&record), 20);
        record.set(ResumeField::Phone, "123456789");
        assert_eq!(completeness_score(&record), 25);
        record.set(ResumeField::Summary, "x".repeat(51));
        assert_eq!(completeness_score(&record), 35);
        record.experience_mut().push(ExperienceEntry::new("Engineer", "", ""));
        assert_eq!(completeness_score(&record), 35);
        record.experience_mut().push(ExperienceEntry::new("Engineer", "Acme", ""));
        assert_eq!(completeness_score(&record), 45);
        record.set(ResumeField::Skills, "Rust");
        assert_eq!(completeness_score(&record), 50);
    }

    #[test]
    fn test_keywords_are_substrings_counted_once() {
        let scorer = AtsScorer::new();
        let found = scorer.matched_keywords("skilled teamwork, team, team, salesforce");
        assert_eq!(found, vec!["team", "led", "sales"]);
    }

    #[test]
    fn test_overlapping_keywords_all_count() {
        let scorer = AtsScorer::new();
        let found = scorer.matched_keywords("designed and developed");
        assert_eq!(found, vec!["developed", "design"]);
    }

    #[test]
    fn test_keyword_component_caps_at_thirty() {
        let mut record = ResumeRecord::default();
        record.set(ResumeField::Summary, ATS_KEYWORDS.join(" "));
        let breakdown = AtsScorer::new().breakdown(&record);
        assert_eq!(breakdown.matched_keywords.len(), 12);
        assert_eq!(breakdown.keywords, 30);
    }

    #[test]
    fn test_keywords_match_case_insensitively_via_lowercase_blob() {
        let mut record = ResumeRecord::default();
        record.set(ResumeField::Skills, "JavaScript, HTML, Python");
        let breakdown = AtsScorer::new().breakdown(&record);
        assert_eq!(breakdown.matched_keywords, vec!["javascript", "html", "python"]);
        assert_eq!(breakdown.keywords, 9);
    }

    #[test]
    fn test_format_bonus() {
        assert_eq!(format_score(0), 0);
        assert_eq!(format_score(24), 0);
        assert_eq!(format_score(25), 1);
        assert_eq!(format_score(499), 19);
        assert_eq!(format_score(500), 20);
        assert_eq!(format_score(10_000), 20);
    }

    #[test]
    fn test_missing_entry_keys_add_no_length() {
        let record = ResumeRecord::from_json(r#"{"experience":[{"role":"Dev"}]}"#).unwrap();
        let breakdown = AtsScorer::new().breakdown(&record);
        assert_eq!(breakdown.serialized_length, 31);
        assert_eq!(breakdown.format, 1);
        assert_eq!(breakdown.total, 1);
    }

    #[test]
    fn test_malformed_fields_lower_the_score() {
        let scorer = AtsScorer::new();

        let record = ResumeRecord::from_json(
            r#"{"fullname":"Ada Lovelace","experience":[{"role":null,"company":"Acme"}]}"#,
        )
        .unwrap();
        let breakdown = scorer.breakdown(&record);
        assert_eq!(breakdown.completeness, 10);
        assert_eq!(breakdown.serialized_length, 61);
        assert_eq!(breakdown.total, 12);

        let record = ResumeRecord::from_json(
            r#"{"fullname":"Ada Lovelace","email":"ada@example.com","phone":5551234567}"#,
        )
        .unwrap();
        let breakdown = scorer.breakdown(&record);
        assert_eq!(breakdown.completeness, 20);
        assert_eq!(breakdown.serialized_length, 53);
        assert_eq!(breakdown.total, 22);
    }

    #[test]
    fn test_demo_record_score() {
        let breakdown = AtsScorer::new().breakdown(&ResumeRecord::demo());
        assert_eq!(breakdown.completeness, 50);
        assert_eq!(breakdown.format, 20);
        assert_eq!(breakdown.matched_keywords, vec!["javascript", "html"]);
        assert_eq!(breakdown.total, 76);
    }

    #[test]
    fn test_maximum_is_one_hundred() {
        let mut record = ResumeRecord::demo();
        record.set(ResumeField::Summary, format!("{} {}", ATS_KEYWORDS.join(" "), "x".repeat(600)));
        let scorer = AtsScorer::new();
        assert_eq!(scorer.score(&record), 100);
    }

    #[test]
    fn test_monotonic_as_fields_fill() {
        let scorer = AtsScorer::new();
        let mut record = ResumeRecord::new();
        let mut last = scorer.score(&record);

        let steps: Vec<Box<dyn Fn(&mut ResumeRecord)>> = vec![
            Box::new(|r: &mut ResumeRecord| r.set(ResumeField::FullName, "Grace Hopper")),
            Box::new(|r: &mut ResumeRecord| r.set(ResumeField::Email, "grace@navy.mil")),
            Box::new(|r: &mut ResumeRecord| r.set(ResumeField::Phone, "+1 555 010 0199")),
            Box::new(|r: &mut ResumeRecord| {
                r.set(
                    ResumeField::Summary,
                    "Computer scientist who pioneered compilers and machine-independent languages.",
                )
            }),
            Box::new(|r: &mut ResumeRecord| r.experience_mut().push(ExperienceEntry::new("Rear Admiral", "US Navy", "Led COBOL design"))),
            Box::new(|r: &mut ResumeRecord| r.set(ResumeField::Skills, "COBOL, FLOW-MATIC")),
        ];

        for step in steps {
            step(&mut record);
            let current = scorer.score(&record);
            assert!(current >= last, "score dropped from {} to {}", last, current);
            last = current;
        }
        assert!(last > 50);
    }

    #[test]
    fn test_idempotent() {
        let scorer = AtsScorer::new();
        let record = ResumeRecord::demo();
        assert_eq!(scorer.breakdown(&record), scorer.breakdown(&record));
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::High);
        assert_eq!(ScoreBand::High.hex_color(), "#10b981");
    }
}

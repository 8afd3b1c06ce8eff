//! Mock "AI" text improvement: dictionary rewriting plus cosmetic polish

use crate::config::ImproverConfig;
use crate::record::utf16_len;
use log::{debug, warn};
use regex::{NoExpand, Regex};
use std::time::Duration;

/// Weak wording and its stronger replacement, applied in this order.
pub const IMPROVEMENT_DICTIONARY: [(&str, &str); 11] = [
    ("managed", "Orchestrated"),
    ("led", "Spearheaded"),
    ("worked on", "Executed"),
    ("made", "Developed"),
    ("helped", "Facilitated"),
    ("fixed", "Resolved"),
    ("talked", "Negotiated"),
    ("sold", "Generated revenue of"),
    ("responsive", "mobile-first, responsive"),
    ("good", "exceptional"),
    ("fast", "high-performance"),
];

/// Openers prepended to short summaries.
pub const PROFESSIONAL_PHRASES: [&str; 6] = [
    "Demonstrated strong leadership in...",
    "Proven track record of...",
    "Successfully implemented...",
    "Collaborated with cross-functional teams to...",
    "Optimized workflow efficiency by...",
    "Leveraged advanced technologies to...",
];

pub const SUMMARY_CONTEXT: &str = "summary";
pub const EXPERIENCE_CONTEXT: &str = "experience";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(800);
pub const DEFAULT_SHORT_TEXT_THRESHOLD: usize = 50;

/// Source of the phrase index for short summaries.
pub trait PhraseRng: Send + Sync {
    /// Returns an index in `0..len`; `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Operating system randomness.
pub struct OsRng;

impl PhraseRng for OsRng {
    fn pick(&self, len: usize) -> usize {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => (u64::from_le_bytes(buf) % len as u64) as usize,
            Err(e) => {
                warn!("OS randomness unavailable, using first phrase: {}", e);
                0
            }
        }
    }
}

/// Always picks the same phrase. Useful for reproducible output.
pub struct FixedPick(pub usize);

impl PhraseRng for FixedPick {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

struct SubstitutionRule {
    pattern: Regex,
    replacement: &'static str,
}

pub struct TextImprover {
    rules: Vec<SubstitutionRule>,
    rng: Box<dyn PhraseRng>,
    delay: Duration,
    short_text_threshold: usize,
}

impl Default for TextImprover {
    fn default() -> Self {
        Self::new()
    }
}

impl TextImprover {
    pub fn new() -> Self {
        let rules = IMPROVEMENT_DICTIONARY
            .iter()
            .map(|&(weak, strong)| SubstitutionRule {
                // ASCII word boundaries and ASCII case folding
                pattern: Regex::new(&format!(r"(?i-u)\b{}\b", regex::escape(weak)))
                    .expect("Invalid substitution regex"),
                replacement: strong,
            })
            .collect();

        Self {
            rules,
            rng: Box::new(OsRng),
            delay: DEFAULT_DELAY,
            short_text_threshold: DEFAULT_SHORT_TEXT_THRESHOLD,
        }
    }

    pub fn from_config(config: &ImproverConfig) -> Self {
        Self::new()
            .with_delay(Duration::from_millis(config.delay_ms))
            .with_short_text_threshold(config.short_text_threshold)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_rng(mut self, rng: impl PhraseRng + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_short_text_threshold(mut self, threshold: usize) -> Self {
        self.short_text_threshold = threshold;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Improve `text` after the simulated latency. Never fails.
    ///
    /// Callers are expected to skip blank input; an empty string comes back
    /// as `"."`.
    pub async fn improve(&self, text: &str, context: &str) -> String {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.improve_now(text, context)
    }

    /// The rewrite itself, without the delay.
    pub fn improve_now(&self, text: &str, context: &str) -> String {
        let substituted = self.substitute(text);
        let polished = polish(&substituted);

        if context == SUMMARY_CONTEXT && utf16_len(text) < self.short_text_threshold {
            let phrase = PROFESSIONAL_PHRASES[self.rng.pick(PROFESSIONAL_PHRASES.len())];
            debug!("Short summary, prepending \"{}\"", phrase);
            format!("{} {}", phrase, polished)
        } else {
            polished
        }
    }

    /// Apply every dictionary rule in order.
    pub fn substitute(&self, text: &str) -> String {
        let mut improved = text.to_string();
        for rule in &self.rules {
            let hits = rule.pattern.find_iter(&improved).count();
            if hits > 0 {
                debug!("Replacing {} occurrence(s) with \"{}\"", hits, rule.replacement);
                improved = rule
                    .pattern
                    .replace_all(&improved, NoExpand(rule.replacement))
                    .into_owned();
            }
        }
        improved
    }
}

/// Uppercase the first character and make sure the text ends with a period.
fn polish(text: &str) -> String {
    let mut chars = text.chars();
    let mut polished: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !polished.ends_with('.') {
        polished.push('.');
    }
    polished
}

//! Editing session around a single resume record

use crate::error::{Result, ResumeBuilderError};
use crate::processing::ats_scorer::{AtsScorer, ScoreBreakdown};
use crate::processing::text_improver::{TextImprover, EXPERIENCE_CONTEXT};
use crate::record::{ExperienceEntry, ResumeField, ResumeRecord};
use crate::storage::store::{load_record, save_record, KeyValueStore};
use log::{debug, info};

/// Fields the demo fills in; presentation settings are left alone.
const DEMO_FIELDS: [ResumeField; 6] = [
    ResumeField::FullName,
    ResumeField::JobTitle,
    ResumeField::Email,
    ResumeField::Phone,
    ResumeField::Summary,
    ResumeField::Skills,
];

/// Owns the one mutable copy of the record. Everything else gets snapshots.
pub struct ResumeSession {
    record: ResumeRecord,
    improver: TextImprover,
    scorer: AtsScorer,
}

impl ResumeSession {
    pub fn new(improver: TextImprover) -> Self {
        Self::with_record(ResumeRecord::new(), improver)
    }

    pub fn with_record(record: ResumeRecord, improver: TextImprover) -> Self {
        Self {
            record,
            improver,
            scorer: AtsScorer::new(),
        }
    }

    /// Open the saved record, or a blank one when nothing is saved.
    pub fn load(store: &dyn KeyValueStore, improver: TextImprover) -> Result<Self> {
        let record = load_record(store)?.unwrap_or_else(|| {
            info!("No saved resume, starting blank");
            ResumeRecord::new()
        });
        Ok(Self::with_record(record, improver))
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        save_record(store, &self.record)
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn snapshot(&self) -> ResumeRecord {
        self.record.clone()
    }

    pub fn set_field(&mut self, field: ResumeField, value: impl Into<String>) {
        let value = value.into();
        debug!("Setting {} ({} chars)", field, value.chars().count());
        self.record.set(field, value);
    }

    /// Append an entry; returns its index.
    pub fn add_experience(&mut self, entry: ExperienceEntry) -> usize {
        let entries = self.record.experience_mut();
        entries.push(entry);
        entries.len() - 1
    }

    pub fn update_experience(&mut self, index: usize, entry: ExperienceEntry) -> Result<()> {
        *self.experience_at(index)? = entry;
        Ok(())
    }

    /// Remove an entry; later entries keep their relative order.
    pub fn remove_experience(&mut self, index: usize) -> Result<ExperienceEntry> {
        self.experience_at(index)?;
        Ok(self.record.experience_mut().remove(index))
    }

    /// Rewrite a text field in place. Blank fields are left untouched and
    /// yield `None`.
    pub async fn improve_field(&mut self, field: ResumeField) -> Option<String> {
        let original = self.record.get(field).to_string();
        if original.trim().is_empty() {
            debug!("Skipping improvement of empty {}", field);
            return None;
        }

        let improved = self.improver.improve(&original, field.key()).await;
        self.record.set(field, improved.clone());
        Some(improved)
    }

    /// Rewrite an experience description in place.
    pub async fn improve_experience(&mut self, index: usize) -> Result<Option<String>> {
        let original = self.experience_at(index)?.description().to_string();
        if original.trim().is_empty() {
            debug!("Skipping improvement of empty description #{}", index);
            return Ok(None);
        }

        let improved = self.improver.improve(&original, EXPERIENCE_CONTEXT).await;
        self.experience_at(index)?.description = Some(improved.clone());
        Ok(Some(improved))
    }

    pub fn auto_fill_demo(&mut self) {
        let demo = ResumeRecord::demo();
        for field in DEMO_FIELDS {
            self.record.set(field, demo.get(field));
        }
        self.record.experience = demo.experience;
    }

    pub fn reset(&mut self) {
        self.record = ResumeRecord::new();
    }

    pub fn score(&self) -> u8 {
        self.scorer.score(&self.record)
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        self.scorer.breakdown(&self.record)
    }

    fn experience_at(&mut self, index: usize) -> Result<&mut ExperienceEntry> {
        let entries = self.record.experience_mut();
        let count = entries.len();
        entries.get_mut(index).ok_or_else(|| {
            ResumeBuilderError::InvalidInput(format!(
                "No experience entry #{} (have {})",
                index, count
            ))
        })
    }
}

//! Resume record model shared by the scorer, the improver and the session

use crate::error::ResumeBuilderError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEMPLATE: &str = "template-classic";
pub const DEFAULT_THEME_COLOR: &str = "#6366f1";
pub const DEFAULT_FONT: &str = "'Inter', sans-serif";

/// One resume as entered by the user.
///
/// Every field is optional so that partially saved or hand-written records
/// load without complaint. Absent fields are omitted when serialized; the
/// field order here is the serialization order the scorer relies on.
/// Text fields holding `null` or a non-string value load as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub jobtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    /// Comma separated
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    /// Embedded image as a data URI
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(
        default,
        rename = "themeColor",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// One job. Missing keys stay missing so the scored size matches what was saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExperienceEntry {
    pub fn new(role: impl Into<String>, company: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            company: Some(company.into()),
            description: Some(description.into()),
        }
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or("")
    }

    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Entries without role and company are kept but not rendered or scored.
    pub fn is_filled(&self) -> bool {
        !self.role().is_empty() && !self.company().is_empty()
    }

    /// Shown in the preview when either half of the heading is there.
    pub fn has_heading(&self) -> bool {
        !self.role().is_empty() || !self.company().is_empty()
    }
}

/// The settable text fields of a record, named after their JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeField {
    FullName,
    JobTitle,
    Email,
    Phone,
    Summary,
    Skills,
    Logo,
    Template,
    ThemeColor,
    Font,
}

impl ResumeField {
    pub const ALL: [ResumeField; 10] = [
        ResumeField::FullName,
        ResumeField::JobTitle,
        ResumeField::Email,
        ResumeField::Phone,
        ResumeField::Summary,
        ResumeField::Skills,
        ResumeField::Logo,
        ResumeField::Template,
        ResumeField::ThemeColor,
        ResumeField::Font,
    ];

    /// JSON key, also used as the improver context
    pub fn key(&self) -> &'static str {
        match self {
            ResumeField::FullName => "fullname",
            ResumeField::JobTitle => "jobtitle",
            ResumeField::Email => "email",
            ResumeField::Phone => "phone",
            ResumeField::Summary => "summary",
            ResumeField::Skills => "skills",
            ResumeField::Logo => "logo",
            ResumeField::Template => "template",
            ResumeField::ThemeColor => "themeColor",
            ResumeField::Font => "font",
        }
    }
}

impl fmt::Display for ResumeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResumeField {
    type Err = ResumeBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ResumeField::ALL
            .iter()
            .copied()
            .find(|field| field.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ResumeField::ALL.iter().map(|f| f.key()).collect();
                ResumeBuilderError::InvalidInput(format!(
                    "Unknown field: {}. Supported: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl ResumeRecord {
    /// The state of a freshly opened builder: empty text, default presentation.
    pub fn new() -> Self {
        Self {
            fullname: Some(String::new()),
            jobtitle: Some(String::new()),
            email: Some(String::new()),
            phone: Some(String::new()),
            summary: Some(String::new()),
            experience: Some(Vec::new()),
            skills: Some(String::new()),
            logo: Some(String::new()),
            template: Some(DEFAULT_TEMPLATE.to_string()),
            theme_color: Some(DEFAULT_THEME_COLOR.to_string()),
            font: Some(DEFAULT_FONT.to_string()),
        }
    }

    pub fn demo() -> Self {
        Self {
            fullname: Some("Shang".to_string()),
            jobtitle: Some("Full Stack Developer".to_string()),
            email: Some("shang@example.com".to_string()),
            phone: Some("+1 555-0123".to_string()),
            summary: Some(
                "Passionate developer with experience in building web applications using modern technologies. Strong problem-solving skills."
                    .to_string(),
            ),
            experience: Some(vec![ExperienceEntry::new(
                "Frontend Developer",
                "Tech Corp",
                "Worked on the main website dashboard. Fixed bugs and improved performance.",
            )]),
            skills: Some("JavaScript, HTML5, CSS3, Node.js, React".to_string()),
            ..Self::new()
        }
    }

    /// Value of a text field, empty when absent.
    pub fn get(&self, field: ResumeField) -> &str {
        self.slot(field).as_deref().unwrap_or("")
    }

    pub fn set(&mut self, field: ResumeField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn experience(&self) -> &[ExperienceEntry] {
        self.experience.as_deref().unwrap_or(&[])
    }

    pub fn experience_mut(&mut self) -> &mut Vec<ExperienceEntry> {
        self.experience.get_or_insert_with(Vec::new)
    }

    /// Skills split on commas, trimmed, blanks dropped.
    pub fn skill_list(&self) -> Vec<&str> {
        self.get(ResumeField::Skills)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn slot(&self, field: ResumeField) -> &Option<String> {
        match field {
            ResumeField::FullName => &self.fullname,
            ResumeField::JobTitle => &self.jobtitle,
            ResumeField::Email => &self.email,
            ResumeField::Phone => &self.phone,
            ResumeField::Summary => &self.summary,
            ResumeField::Skills => &self.skills,
            ResumeField::Logo => &self.logo,
            ResumeField::Template => &self.template,
            ResumeField::ThemeColor => &self.theme_color,
            ResumeField::Font => &self.font,
        }
    }

    fn slot_mut(&mut self, field: ResumeField) -> &mut Option<String> {
        match field {
            ResumeField::FullName => &mut self.fullname,
            ResumeField::JobTitle => &mut self.jobtitle,
            ResumeField::Email => &mut self.email,
            ResumeField::Phone => &mut self.phone,
            ResumeField::Summary => &mut self.summary,
            ResumeField::Skills => &mut self.skills,
            ResumeField::Logo => &mut self.logo,
            ResumeField::Template => &mut self.template,
            ResumeField::ThemeColor => &mut self.theme_color,
            ResumeField::Font => &mut self.font,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// A non-array loads as absent; items that are not objects are dropped.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<ExperienceEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Length in UTF-16 code units, the unit the browser builder measured in.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

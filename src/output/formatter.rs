//! Output formatters for the resume preview

use crate::config::PreviewFormat;
use crate::error::Result;
use crate::output::preview::ResumePreview;
use crate::processing::ats_scorer::{ScoreBand, MAX_COMPLETENESS, MAX_FORMAT, MAX_KEYWORDS};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

const SCORE_BAR_WIDTH: usize = 20;

/// Trait for rendering a resume preview
pub trait OutputFormatter {
    fn format_preview(&self, preview: &ResumePreview) -> Result<String>;
    fn supports_format(&self) -> PreviewFormat;
}

/// Terminal preview with an ATS score bar
pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_score: bool,
}

/// Standalone HTML page styled with the record's theme colour and font
pub struct HtmlFormatter;

/// Coordinates the formatters
pub struct PreviewRenderer {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ name }}</title>
    <style>
        :root { --resume-color: {{ theme_color }}; }
        body { background: #f3f4f6; margin: 0; padding: 30px; }
        .resume { background: white; max-width: 800px; margin: 0 auto; padding: 40px; }
        .resume h1 { color: var(--resume-color); margin-bottom: 0; }
        .resume h2 { border-bottom: 2px solid var(--resume-color); padding-bottom: 4px; }
        .logo { max-height: 80px; float: right; }
        .contact span { margin-right: 15px; }
        .exp-item { margin-bottom: 15px; }
        .exp-head { display: flex; justify-content: space-between; align-items: center; }
        .exp-role { font-weight: 700; font-size: 1.05rem; }
        .exp-company { font-style: italic; }
        .exp-desc { font-size: 0.9rem; color: #444; margin-top: 4px; }
        .skill { background: #f3f4f6; padding: 4px 10px; border-radius: 4px; font-size: 0.85rem; font-weight: 500; margin-right: 6px; }
        .ats { margin-top: 30px; font-size: 0.85rem; }
        .ats-bar { background: #e5e7eb; height: 8px; border-radius: 4px; }
        .ats-fill { height: 8px; border-radius: 4px; }
    </style>
</head>
<body>
    <div id="resume-preview" class="resume {{ template }}" style="font-family: {{ font }};">
        {% if let Some(logo) = logo %}
        <img class="logo" src="{{ logo }}" alt="Logo">
        {% endif %}
        <h1>{{ name }}</h1>
        <div class="title">{{ title }}</div>
        <div class="contact">
            {% if let Some(email) = email %}<span>✉ {{ email }}</span>{% endif %}
            {% if let Some(phone) = phone %}<span>☎ {{ phone }}</span>{% endif %}
        </div>

        <h2>Summary</h2>
        <p>{{ summary }}</p>

        {% if !experience.is_empty() %}
        <h2>Experience</h2>
        {% for exp in experience %}
        <div class="exp-item">
            <div class="exp-head">
                <div class="exp-role">{{ exp.role() }}</div>
                <div class="exp-company">{{ exp.company() }}</div>
            </div>
            <div class="exp-desc">{{ exp.description() }}</div>
        </div>
        {% endfor %}
        {% endif %}

        {% if !skills.is_empty() %}
        <h2>Skills</h2>
        <div>
            {% for skill in skills %}<span class="skill">{{ skill }}</span>{% endfor %}
        </div>
        {% endif %}
    </div>

    <div class="resume ats">
        <div>ATS score: <strong>{{ score }}%</strong></div>
        <div class="ats-bar"><div class="ats-fill" style="width: {{ score }}%; background-color: {{ band_color }};"></div></div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate<'a> {
    name: &'a str,
    title: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    summary: &'a str,
    experience: &'a [crate::record::ExperienceEntry],
    skills: &'a [String],
    logo: Option<&'a str>,
    template: &'a str,
    theme_color: &'a str,
    font: &'a str,
    score: u8,
    band_color: &'a str,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_bar(&self, score: u8, band: ScoreBand) -> String {
        let filled = score as usize * SCORE_BAR_WIDTH / 100;
        let bar = format!(
            "{}{}",
            "■".repeat(filled),
            "·".repeat(SCORE_BAR_WIDTH - filled)
        );
        let color = match band {
            ScoreBand::Low => Color::Red,
            ScoreBand::Medium => Color::Yellow,
            ScoreBand::High => Color::Green,
        };
        format!("[{}] {}%", self.colorize(&bar, color), score)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_preview(&self, preview: &ResumePreview) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&preview.name, 1));
        output.push_str(&format!("{}\n", self.colorize(&preview.title, Color::Cyan)));

        let contact: Vec<String> = [
            preview.email.as_ref().map(|email| format!("✉ {}", email)),
            preview.phone.as_ref().map(|phone| format!("☎ {}", phone)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !contact.is_empty() {
            output.push_str(&format!("{}\n", contact.join("  ")));
        }
        if preview.logo.is_some() {
            output.push_str(&self.colorize("[logo attached]\n", Color::BrightBlack));
        }

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!("{}\n", preview.summary));

        if !preview.experience.is_empty() {
            output.push_str(&self.format_header("Experience", 2));
            for entry in &preview.experience {
                output.push_str(&format!(
                    "  {} {}\n",
                    self.colorize(entry.role(), Color::White),
                    self.colorize(&format!("@ {}", entry.company()), Color::BrightBlack)
                ));
                if !entry.description().is_empty() {
                    output.push_str(&format!("    {}\n", entry.description()));
                }
            }
        }

        if !preview.skills.is_empty() {
            output.push_str(&self.format_header("Skills", 2));
            output.push_str(&format!("  {}\n", preview.skills.join(" · ")));
        }

        output.push_str(&self.format_header("ATS Score", 3));
        output.push_str(&format!("{}\n", self.format_score_bar(preview.score.total, preview.band)));
        output.push_str(&format!(
            "completeness {}/{} | keywords {}/{} | format {}/{}\n",
            preview.score.completeness,
            MAX_COMPLETENESS,
            preview.score.keywords,
            MAX_KEYWORDS,
            preview.score.format,
            MAX_FORMAT
        ));

        Ok(output)
    }

    fn supports_format(&self) -> PreviewFormat {
        PreviewFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_preview(&self, preview: &ResumePreview) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(preview)?)
        } else {
            Ok(serde_json::to_string(preview)?)
        }
    }

    fn supports_format(&self) -> PreviewFormat {
        PreviewFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_score: bool) -> Self {
        Self { include_score }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_preview(&self, preview: &ResumePreview) -> Result<String> {
        let mut content = String::new();

        content.push_str(&format!("# {}\n\n", preview.name));
        content.push_str(&format!("**{}**\n\n", preview.title));

        let contact: Vec<&str> = [preview.email.as_deref(), preview.phone.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !contact.is_empty() {
            content.push_str(&format!("{}\n\n", contact.join(" | ")));
        }

        content.push_str("## Summary\n\n");
        content.push_str(&format!("{}\n\n", preview.summary));

        if !preview.experience.is_empty() {
            content.push_str("## Experience\n\n");
            for entry in &preview.experience {
                content.push_str(&format!("### {} - *{}*\n\n", entry.role(), entry.company()));
                if !entry.description().is_empty() {
                    content.push_str(&format!("{}\n\n", entry.description()));
                }
            }
        }

        if !preview.skills.is_empty() {
            content.push_str("## Skills\n\n");
            for skill in &preview.skills {
                content.push_str(&format!("- {}\n", skill));
            }
            content.push('\n');
        }

        if self.include_score {
            content.push_str("---\n\n");
            content.push_str(&format!(
                "ATS score: **{}%** ({}) - completeness {}, keywords {}, format {}\n",
                preview.score.total,
                preview.band,
                preview.score.completeness,
                preview.score.keywords,
                preview.score.format
            ));
        }

        Ok(content)
    }

    fn supports_format(&self) -> PreviewFormat {
        PreviewFormat::Markdown
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_preview(&self, preview: &ResumePreview) -> Result<String> {
        let template = HtmlTemplate {
            name: &preview.name,
            title: &preview.title,
            email: preview.email.as_deref(),
            phone: preview.phone.as_deref(),
            summary: &preview.summary,
            experience: &preview.experience,
            skills: &preview.skills,
            logo: preview.logo.as_deref(),
            template: &preview.template,
            theme_color: &preview.theme_color,
            font: &preview.font,
            score: preview.score.total,
            band_color: preview.band.hex_color(),
        };
        Ok(template.render()?)
    }

    fn supports_format(&self) -> PreviewFormat {
        PreviewFormat::Html
    }
}

impl PreviewRenderer {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter,
        }
    }

    pub fn render(&self, preview: &ResumePreview, format: PreviewFormat) -> Result<String> {
        match format {
            PreviewFormat::Console => self.console_formatter.format_preview(preview),
            PreviewFormat::Json => self.json_formatter.format_preview(preview),
            PreviewFormat::Markdown => self.markdown_formatter.format_preview(preview),
            PreviewFormat::Html => self.html_formatter.format_preview(preview),
        }
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn save_preview_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ats_scorer::AtsScorer;
    use crate::record::{ExperienceEntry, ResumeField, ResumeRecord};

    fn demo_preview() -> ResumePreview {
        ResumePreview::build(&ResumeRecord::demo(), &AtsScorer::new())
    }

    #[test]
    fn test_formatters_report_their_format() {
        assert_eq!(ConsoleFormatter::new(false).supports_format(), PreviewFormat::Console);
        assert_eq!(JsonFormatter::new(true).supports_format(), PreviewFormat::Json);
        assert_eq!(MarkdownFormatter::new(true).supports_format(), PreviewFormat::Markdown);
        assert_eq!(HtmlFormatter.supports_format(), PreviewFormat::Html);
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_preview(&demo_preview()).unwrap();
        assert!(output.contains("█ Shang"));
        assert!(output.contains("Frontend Developer @ Tech Corp"));
        assert!(output.contains("JavaScript · HTML5"));
        assert!(output.contains("[■■■■■■■■■■■■■■■·····] 76%"));
        assert!(output.contains("completeness 50/50 | keywords 6/30 | format 20/20"));
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_preview(&demo_preview()).unwrap();
        assert!(output.starts_with("# Shang\n\n**Full Stack Developer**"));
        assert!(output.contains("### Frontend Developer - *Tech Corp*"));
        assert!(output.contains("- Node.js\n"));
        assert!(output.contains("ATS score: **76%** (medium)"));

        let without = MarkdownFormatter::new(false).format_preview(&demo_preview()).unwrap();
        assert!(!without.contains("ATS score"));
    }

    #[test]
    fn test_json_preview() {
        let output = JsonFormatter::new(false).format_preview(&demo_preview()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "Shang");
        assert_eq!(value["score"]["total"], 76);
        assert_eq!(value["band"], "Medium");
    }

    #[test]
    fn test_html_escapes_and_themes() {
        let mut record = ResumeRecord::demo();
        record.set(ResumeField::FullName, "<script>alert(1)</script>");
        record.set(ResumeField::ThemeColor, "#ff0000");
        record.set(ResumeField::Logo, "data:image/png;base64,AAAA");
        record.experience_mut().push(ExperienceEntry::new("Lead", "R&D", ""));

        let preview = ResumePreview::build(&record, &AtsScorer::new());
        let html = PreviewRenderer::new(false).render(&preview, PreviewFormat::Html).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("--resume-color: #ff0000"));
        assert!(html.contains("R&amp;D"));
        assert!(html.contains(r#"class="logo""#));
        assert!(html.contains(preview.band.hex_color()));
    }

    #[test]
    fn test_save_preview_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resume.md");
        save_preview_to_file("# hi\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi\n");
    }
}

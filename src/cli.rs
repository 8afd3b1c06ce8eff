//! CLI interface for the resume builder

use crate::config::PreviewFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-builder")]
#[command(about = "Build a resume with live preview, autosave and an ATS score")]
#[command(long_about = "Edit a locally saved resume field by field, polish wording with the mock AI improver, and watch the heuristic ATS score")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory (overrides the configured one)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the resume preview
    Show {
        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        format: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Disable colored console output
        #[arg(long)]
        no_color: bool,
    },

    /// Set a text field (fullname, jobtitle, email, phone, summary, skills, logo, template, themeColor, font)
    Set {
        field: String,
        value: String,
    },

    /// Rewrite a text field with the mock AI improver
    Improve {
        field: String,
    },

    /// Manage experience entries
    Experience {
        #[command(subcommand)]
        action: ExperienceAction,
    },

    /// Show the ATS score
    Score {
        /// Score a record JSON file instead of the saved resume
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Show the score components
        #[arg(short, long)]
        detailed: bool,
    },

    /// Fill in demo content
    Demo,

    /// Discard the saved resume
    Reset,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ExperienceAction {
    /// List entries with their positions
    List,

    /// Append an entry
    Add {
        #[arg(long)]
        role: String,

        #[arg(long)]
        company: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change fields of an entry
    Update {
        /// Position as shown by `experience list` (1-based)
        position: usize,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove an entry
    Remove {
        /// Position as shown by `experience list` (1-based)
        position: usize,
    },

    /// Rewrite an entry's description with the mock AI improver
    Improve {
        /// Position as shown by `experience list` (1-based)
        position: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate preview format
pub fn parse_preview_format(format: &str) -> Result<PreviewFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(PreviewFormat::Console),
        "json" => Ok(PreviewFormat::Json),
        "markdown" | "md" => Ok(PreviewFormat::Markdown),
        "html" => Ok(PreviewFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Turn a 1-based position into an index
pub fn position_to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "Positions start at 1".to_string())
}

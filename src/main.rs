//! Resume builder: edit, preview, autosave and score a resume

use anyhow::{anyhow, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_builder::cli::{self, Cli, Commands, ConfigAction, ExperienceAction};
use resume_builder::config::Config;
use resume_builder::output::{save_preview_to_file, PreviewRenderer, ResumePreview};
use resume_builder::processing::ats_scorer::{AtsScorer, ScoreBand};
use resume_builder::processing::text_improver::TextImprover;
use resume_builder::record::{ExperienceEntry, ResumeField, ResumeRecord};
use resume_builder::session::ResumeSession;
use resume_builder::storage::store::{clear_record, FileStore};
use resume_builder::storage::AutoSaver;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let store_dir = cli
        .store
        .clone()
        .unwrap_or_else(|| config.autosave.storage_dir.clone());

    // Execute command
    if let Err(e) = run_command(cli.command, config, config_path, store_dir).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    config_path: PathBuf,
    store_dir: PathBuf,
) -> anyhow::Result<()> {
    let store = Arc::new(FileStore::new(store_dir));
    // Only commands that read or edit the record open it, so `reset` and
    // `config` still work when the saved blob is corrupt
    let open_session = || {
        ResumeSession::load(&*store, TextImprover::from_config(&config.improver))
            .with_context(|| format!("Failed to open saved resume in {}", store.root().display()))
    };

    let session = match command {
        Commands::Show { format, save, no_color } => {
            let format = match format {
                Some(format) => cli::parse_preview_format(&format).map_err(|e| anyhow!(e))?,
                None => config.output.format,
            };
            let use_colors = config.output.color_output && !no_color && save.is_none();

            let session = open_session()?;
            let preview = ResumePreview::build(session.record(), &AtsScorer::new());
            let rendered = PreviewRenderer::new(use_colors).render(&preview, format)?;

            match save {
                Some(path) => {
                    save_preview_to_file(&rendered, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("💾 Preview saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
            return Ok(());
        }

        Commands::Set { field, value } => {
            let field: ResumeField = field.parse()?;
            let mut session = open_session()?;
            session.set_field(field, value);
            println!("✏️  Updated {}", field);
            session
        }

        Commands::Improve { field } => {
            let field: ResumeField = field.parse()?;
            let mut session = open_session()?;
            let spinner = improving_spinner(format!("Improving {}...", field));
            let improved = session.improve_field(field).await;
            spinner.finish_and_clear();

            match improved {
                Some(text) => println!("🤖 {}: {}", field, text),
                None => {
                    println!("⚠️  {} is empty, nothing to improve", field);
                    return Ok(());
                }
            }
            session
        }

        Commands::Experience { action } => {
            let mut session = open_session()?;
            match action {
                ExperienceAction::List => {
                    let entries = session.record().experience();
                    if entries.is_empty() {
                        println!("No experience entries yet");
                    }
                    for (i, entry) in entries.iter().enumerate() {
                        println!("{}. {} @ {}", i + 1, entry.role(), entry.company());
                        if !entry.description().is_empty() {
                            println!("   {}", entry.description());
                        }
                    }
                    return Ok(());
                }
                ExperienceAction::Add { role, company, description } => {
                    let index = session.add_experience(ExperienceEntry::new(role, company, description));
                    println!("➕ Added experience #{}", index + 1);
                }
                ExperienceAction::Update { position, role, company, description } => {
                    let index = cli::position_to_index(position).map_err(|e| anyhow!(e))?;
                    let mut entry = session
                        .record()
                        .experience()
                        .get(index)
                        .cloned()
                        .ok_or_else(|| anyhow!("No experience entry #{}", position))?;
                    if role.is_some() {
                        entry.role = role;
                    }
                    if company.is_some() {
                        entry.company = company;
                    }
                    if description.is_some() {
                        entry.description = description;
                    }
                    session.update_experience(index, entry)?;
                    println!("✏️  Updated experience #{}", position);
                }
                ExperienceAction::Remove { position } => {
                    let index = cli::position_to_index(position).map_err(|e| anyhow!(e))?;
                    let removed = session.remove_experience(index)?;
                    println!("🗑️  Removed {} @ {}", removed.role(), removed.company());
                }
                ExperienceAction::Improve { position } => {
                    let index = cli::position_to_index(position).map_err(|e| anyhow!(e))?;
                    let spinner = improving_spinner(format!("Improving experience #{}...", position));
                    let improved = session.improve_experience(index).await;
                    spinner.finish_and_clear();

                    match improved? {
                        Some(text) => println!("🤖 {}", text),
                        None => {
                            println!("⚠️  Experience #{} has no description to improve", position);
                            return Ok(());
                        }
                    }
                }
            }
            session
        }

        Commands::Score { file, detailed } => {
            let record = match file {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    ResumeRecord::from_json(&json)
                        .with_context(|| format!("{} is not a resume record", path.display()))?
                }
                None => open_session()?.snapshot(),
            };

            let breakdown = AtsScorer::new().breakdown(&record);
            let band = ScoreBand::from_score(breakdown.total);
            println!("📊 ATS score: {}% ({})", breakdown.total, band);
            if detailed {
                println!("  • Completeness: {}", breakdown.completeness);
                println!("  • Keywords: {} ({})", breakdown.keywords, breakdown.matched_keywords.join(", "));
                println!("  • Format: {} ({} characters)", breakdown.format, breakdown.serialized_length);
            }
            return Ok(());
        }

        Commands::Demo => {
            let mut session = open_session()?;
            session.auto_fill_demo();
            println!("✨ Demo content filled in");
            session
        }

        Commands::Reset => {
            clear_record(&*store)?;
            println!("🧹 Saved resume discarded");
            return Ok(());
        }

        Commands::Config { action } => {
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => print!("{}", config.to_toml()?),
                ConfigAction::Reset => {
                    Config::default().save_to(&config_path)?;
                    println!("🔄 Configuration reset: {}", config_path.display());
                }
                ConfigAction::Path => println!("{}", config_path.display()),
            }
            return Ok(());
        }
    };

    // Every edit goes through the debounced saver, which flushes on shutdown
    let saver = AutoSaver::spawn(store.clone(), Duration::from_millis(config.autosave.debounce_ms));
    let events = saver.subscribe();
    saver.update(session.snapshot())?;
    saver.shutdown().await?;

    let event = events.borrow().clone();
    match event {
        Some(event) if event.is_saved() => {
            info!("Saved at {}", event.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("✅ Saved | ATS score {}%", event.score);
            Ok(())
        }
        Some(event) => Err(anyhow!(
            "Autosave failed: {}",
            event.error.unwrap_or_default()
        )),
        None => Err(anyhow!("Autosave did not run")),
    }
}

fn improving_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

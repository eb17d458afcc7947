use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use rtn_settings::models::{AttributeRecord, RankCategory};
use rtn_settings::services::{
    ConfigCodec, ConfigValidator, PatternRuleSet, ProfileCatalog, resolver, settings_io,
};
use rtn_settings::state::{FileBlobStore, SessionStore};
use rtn_settings::{APP_NAME, ConfigManager, VERSION};
use serde_json::Value;
use std::fs;

#[derive(Parser, Debug)]
#[command(
    name = "rtn-settings",
    about = "Manage ranking profiles, custom ranks and filter patterns for release names",
    version
)]
struct Cli {
    /// Directory holding rtn-settings.yaml and the session blob
    #[arg(long, default_value = ".rtn-settings")]
    config_dir: Utf8PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in profiles, or show one profile's weights
    Profiles { name: Option<String> },
    /// Print the current configuration and its encoded blob
    Show,
    /// Encode a configuration JSON file into a blob
    Encode { file: Utf8PathBuf },
    /// Decode a blob and print the configuration it holds
    Decode { blob: String },
    /// Replace the current configuration with the one in a blob
    Load { blob: String },
    /// Write the settings model to a JSON file
    Export { file: Utf8PathBuf },
    /// Replace the settings model from a JSON file
    Import { file: Utf8PathBuf },
    /// Print the effective weight and fetch flag of every attribute
    Resolve,
    /// Evaluate the filter patterns against a parsed title record
    Check { record: Utf8PathBuf },
    /// Restore the generated default configuration
    Reset,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_app_settings()?;
    let _guard = rtn_settings::logging::setup_logging(&settings.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let session = SessionStore::load(FileBlobStore::new(config_manager.session_path(&settings)))?;
    let result = dispatch(&session, cli.command);

    session.metrics().log_summary();
    result
}

fn dispatch(session: &SessionStore<FileBlobStore>, command: Command) -> Result<()> {
    match command {
        Command::Profiles { name } => profiles(name.as_deref()),
        Command::Show => {
            let config = session.config();
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("\n{}", session.encoded());
            Ok(())
        }
        Command::Encode { file } => encode(&file),
        Command::Decode { blob } => {
            let config = ConfigCodec::decode(&blob)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Load { blob } => {
            let changes = session.load_blob(&blob)?;
            println!("Loaded configuration ({} change(s))", changes.len());
            Ok(())
        }
        Command::Export { file } => {
            settings_io::export_settings_file(&session.config().settings_model, &file)
        }
        Command::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read settings file: {}", file))?;
            let changes = session.import_settings(&json)?;
            println!("Imported settings from {} ({} change(s))", file, changes.len());
            Ok(())
        }
        Command::Resolve => {
            resolve(session);
            Ok(())
        }
        Command::Check { record } => check(session, &record),
        Command::Reset => {
            session.reset()?;
            println!("Configuration reset to defaults");
            Ok(())
        }
    }
}

fn profiles(name: Option<&str>) -> Result<()> {
    let catalog = ProfileCatalog::global();

    match name {
        Some(name) => {
            let profile = catalog.get(name);
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
        None => {
            for profile in catalog.list() {
                let weighted = profile.weights().filter(|(_, weight)| *weight != 0).count();
                println!("{:<12} {} weighted attributes", profile.name().as_str(), weighted);
            }
        }
    }
    Ok(())
}

fn encode(file: &Utf8Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read configuration file: {}", file))?;
    let value: Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse configuration file: {}", file))?;

    let config = ConfigValidator::validate(value);
    println!("{}", ConfigCodec::encode(&config)?);
    Ok(())
}

fn resolve(session: &SessionStore<FileBlobStore>) {
    let table = session.read(|config| resolver::resolve_settings(&config.settings_model));

    for category in RankCategory::ALL {
        println!("[{}]", category.label());
        for attribute in category.attributes() {
            let entry = table.get(attribute);
            println!(
                "  {:<16} {:>7}  {}",
                attribute.as_str(),
                entry.weight,
                if entry.fetch { "fetch" } else { "skip" }
            );
        }
    }
}

fn check(session: &SessionStore<FileBlobStore>, path: &Utf8Path) -> Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path))?;
    let record: AttributeRecord = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse record file: {}", path))?;

    let (rules, table) = session.read(|config| {
        (
            PatternRuleSet::from_settings(&config.settings_model),
            resolver::resolve_settings(&config.settings_model),
        )
    });

    let outcome = rules.evaluate(&record);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    for error in &outcome.errors {
        println!("warning: {}", error);
    }

    for (attribute, entry) in table.restricted_to(&record.present_attributes()) {
        println!(
            "  {:<16} {:>7}  {}",
            attribute.as_str(),
            entry.weight,
            if entry.fetch { "fetch" } else { "skip" }
        );
    }
    Ok(())
}

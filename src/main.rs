#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{error, info};

use medtour_home::home::EditOutcome;
use medtour_home::store::{ConfigStore, FileDraftCache, HttpPublishedSource};
use medtour_home::{Mode, Settings, logging};

/// Inspect and edit home page drafts
#[derive(Debug, Parser)]
#[command(name = "home-config", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the hydrated config for a mode
    Show {
        #[arg(long, value_enum, default_value = "medical")]
        mode: Mode,
        /// Include disabled sections
        #[arg(long)]
        all: bool,
        /// Dump the full JSON document
        #[arg(long)]
        json: bool,
    },
    /// Enable or disable a section
    Toggle {
        #[arg(value_enum)]
        mode: Mode,
        id: String,
    },
    /// Move the section at FROM to TO (0-based positions)
    Reorder {
        #[arg(value_enum)]
        mode: Mode,
        from: usize,
        to: usize,
    },
    /// Set one value by dot path, e.g. content.title.line1 '"Hello"'
    Set {
        #[arg(value_enum)]
        mode: Mode,
        id: String,
        path: String,
        /// JSON value
        value: String,
    },
    /// Merge top-level fields given as a JSON object, e.g. '{"enabled":false}'
    Update {
        #[arg(value_enum)]
        mode: Mode,
        id: String,
        fields: String,
    },
    /// Drop both drafts and go back to the bundled defaults
    Reset,
}

/// Bare words are taken as strings so `set ... content.badge Hello` works
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn require_applied(outcome: EditOutcome, id: &str) -> Result<()> {
    match outcome {
        EditOutcome::Applied => Ok(()),
        EditOutcome::UnknownSection => bail!("no section with id '{id}'"),
        EditOutcome::PathNotApplicable(reason) => bail!("edit rejected: {reason}"),
    }
}

fn print_summary(store: &ConfigStore<FileDraftCache>, mode: Mode, all: bool) {
    let config = store.config(mode);
    println!("{} (version {}, modified {})", mode, config.version, config.last_modified.to_rfc3339());

    for (position, section) in config.sections.iter().enumerate() {
        if !all && !section.enabled {
            continue;
        }
        println!(
            "  [{position}] order={:<2} {:<16} {:<14} {}",
            section.order,
            section.id,
            section.section_type(),
            if section.enabled { "enabled" } else { "disabled" },
        );
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    info!(api = %settings.api_base_url, drafts = %settings.draft_dir.display(), "settings loaded");

    let source = HttpPublishedSource::new(&settings.api_base_url, settings.fetch_timeout())?;
    let cache = FileDraftCache::new(settings.draft_dir.clone());
    let mut store = ConfigStore::load(&source, cache, settings.fetch_timeout()).await;

    match cli.command {
        Command::Show { mode, all, json } => {
            if json {
                let text = serde_json::to_string_pretty(store.config(mode)).context("Failed to serialize config")?;
                println!("{text}");
            } else {
                print_summary(&store, mode, all);
            }
            return Ok(());
        }
        Command::Toggle { mode, id } => {
            store.switch_mode(mode);
            require_applied(store.toggle_section(&id), &id)?;
        }
        Command::Reorder { mode, from, to } => {
            store.switch_mode(mode);
            store.reorder_sections(from, to);
        }
        Command::Set { mode, id, path, value } => {
            store.switch_mode(mode);
            require_applied(store.update_section_content(&id, &path, parse_value(&value)), &id)?;
        }
        Command::Update { mode, id, fields } => {
            store.switch_mode(mode);
            let fields: Map<String, Value> =
                serde_json::from_str(&fields).context("fields must be a JSON object")?;
            require_applied(store.update_section(&id, &fields), &id)?;
        }
        Command::Reset => {
            store.reset_config()?;
            println!("Drafts cleared, defaults restored");
            return Ok(());
        }
    }

    if store.has_unsaved_changes() {
        store.save_config()?;
    }
    print_summary(&store, store.mode(), true);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init()?;

    let cli = Cli::parse();
    run(cli)
        .await
        .inspect_err(|e| error!(error = ?e, "home-config failed"))
}

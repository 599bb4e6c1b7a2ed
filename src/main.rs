mod cli;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OptionsCommand};
use soundfaith_embed::options::{activate, deactivate, update_options};
use soundfaith_embed::prelude::*;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => soundfaith_embed::file_store::default_settings_path()?
            .with_file_name("config.toml"),
    };
    let mut config = EmbedConfig::load(&config_path)?.with_env();
    if let Some(w) = cli.width {
        config.content_width = Some(w);
    }
    if let Some(p) = &cli.settings {
        config.settings_path = Some(p.clone());
    }

    let settings_path = config.settings_path.clone();

    match cli.command {
        Commands::Embed { url } => {
            let store = read_store(settings_path.as_deref());
            let sf = SoundFaithEmbed::new(StoredOptions::new(store), config)?;
            let html = sf.embed(&url).ok_or_else(|| anyhow!("not a SoundFaith sermon or profile URL: {url}"))?;
            println!("{html}");
        }
        Commands::Url { url } => {
            let store = read_store(settings_path.as_deref());
            let sf = SoundFaithEmbed::new(StoredOptions::new(store), config)?;
            let (request, _) = sf
                .patterns()
                .match_url(&url)
                .ok_or_else(|| anyhow!("not a SoundFaith sermon or profile URL: {url}"))?;
            println!("{}", sf.embed_url(&request));
        }
        Commands::Render { file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
                    buf
                }
            };
            let store = read_store(settings_path.as_deref());
            let sf = Arc::new(SoundFaithEmbed::new(StoredOptions::new(store), config)?);
            let mut host = AutoEmbed::new();
            sf.register(&mut host);
            print!("{}", host.render(&content));
        }
        Commands::Activate => {
            let mut store = FileStore::open(settings_path.as_deref())?;
            activate(&mut store)?;
            println!("Initialized display options in {}", store.path().display());
        }
        Commands::Deactivate => {
            let mut store = FileStore::open(settings_path.as_deref())?;
            deactivate(&mut store)?;
            println!("Removed display options from {}", store.path().display());
        }
        Commands::Options { command: OptionsCommand::Show } => {
            let provider = StoredOptions::new(read_store(settings_path.as_deref()));
            let mut out = serde_json::Map::new();
            for t in ContentType::ALL {
                out.insert(t.to_string(), provider.display_options(t).to_value());
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Options { command: OptionsCommand::Set { content_type, pairs } } => {
            let mut store = FileStore::open(settings_path.as_deref())?;
            let content_type: ContentType = content_type.parse()?;
            let current = StoredOptions::new(store.clone()).display_options(content_type);
            let options = apply_pairs(content_type, current, &pairs)?;
            let saved = update_options(&mut store, content_type, &options)?;
            println!("{}", serde_json::to_string_pretty(&saved.to_value())?);
        }
    }
    Ok(())
}

// Read-only commands render with defaults when the settings file is broken;
// commands that write open the file strictly so they never overwrite it.
fn read_store(path: Option<&Path>) -> Box<dyn SettingsStore> {
    match FileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "settings unreadable; using default display options");
            Box::new(MemoryStore::new())
        }
    }
}

/// Apply `KEY=true|false` pairs on top of `options`. Every key must apply
/// to `content_type`.
fn apply_pairs(
    content_type: ContentType,
    mut options: DisplayOptions,
    pairs: &[String],
) -> Result<DisplayOptions> {
    for pair in pairs {
        let (option, enabled) = parse_pair(pair)?;
        if !content_type.applicable_options().contains(&option) {
            bail!("{option} does not apply to {content_type} embeds");
        }
        options.set(option, enabled);
    }
    Ok(options)
}

fn parse_pair(pair: &str) -> Result<(DisplayOption, bool)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=true|false, got {pair}"))?;
    let option = DisplayOption::from_key(key.trim())
        .ok_or_else(|| anyhow!("unknown display option: {}", key.trim()))?;
    let enabled = value
        .trim()
        .parse::<bool>()
        .with_context(|| format!("invalid value for {option}: {value}"))?;
    Ok((option, enabled))
}

// Logs go to stderr; stdout carries only HTML and URLs.
fn init_tracing() {
    let filter = std::env::var("SOUNDFAITH_EMBED_LOG")
        .ok()
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Turn SoundFaith.com links into embeddable iframes
#[derive(Parser)]
#[command(name = "soundfaith-embed", version)]
#[command(about = "Turn SoundFaith.com sermon and profile links into iframe embeds", long_about = None)]
pub struct Cli {
    /// Host configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Stored display options file (TOML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Content width in pixels (defaults to 600)
    #[arg(short, long, global = true)]
    pub width: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the iframe for a SoundFaith URL
    Embed {
        url: String,
    },
    /// Print only the resolved embed URL
    Url {
        url: String,
    },
    /// Auto-embed bare URLs in a content file (stdin when omitted)
    Render {
        file: Option<PathBuf>,
    },
    /// Initialize stored display options to the defaults
    Activate,
    /// Remove stored display options
    Deactivate,
    /// Inspect or change stored display options
    Options {
        #[command(subcommand)]
        command: OptionsCommand,
    },
}

#[derive(Subcommand)]
pub enum OptionsCommand {
    /// Print the effective options for sermons and profiles as JSON
    Show,
    /// Update options for one content type, e.g. `set profile includeSeries=false`
    Set {
        /// `sermon` or `profile`
        content_type: String,
        /// `KEY=true|false` pairs
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

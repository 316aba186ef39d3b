//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `import`: match a batch and append it to a playlist
//! - `resolve`: matching dry runs (`resolve`, `queries`)
//! - `authorize`: OAuth setup and config file location

mod authorize;
mod import;
mod resolve;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::{self, Config, Credentials};
use crate::error::{Error, Result};
use crate::model::{self, TrackDescriptor};

pub use authorize::{cmd_authorize, cmd_config_path};
pub use import::cmd_import;
pub use resolve::{cmd_queries, cmd_resolve};

/// Playlist Porter CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

/// Credential overrides; each one wins over the config file.
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// OAuth client ID
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_ID")]
    pub client_id: Option<String>,
    /// OAuth client secret
    #[arg(long, global = true, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    /// Redirect URI registered for the client
    #[arg(long, global = true, env = "SPOTIFY_REDIRECT_URI")]
    pub redirect_uri: Option<String>,
    /// Long-lived refresh token
    #[arg(long, global = true, env = "SPOTIFY_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,
    /// Ready-made access token; skips the refresh
    #[arg(long, global = true, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl CredentialArgs {
    /// Overlay the non-empty overrides onto `credentials`
    pub fn apply(&self, credentials: &mut Credentials) {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

        if let Some(client_id) = non_empty(&self.client_id) {
            credentials.client_id = client_id;
        }
        if let Some(client_secret) = non_empty(&self.client_secret) {
            credentials.client_secret = client_secret;
        }
        if let Some(redirect_uri) = non_empty(&self.redirect_uri) {
            credentials.redirect_uri = redirect_uri;
        }
        if let Some(refresh_token) = non_empty(&self.refresh_token) {
            credentials.refresh_token = Some(refresh_token);
        }
        if let Some(access_token) = non_empty(&self.access_token) {
            credentials.access_token = Some(access_token);
        }
    }
}

/// Where a descriptor batch is read from
#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file holding an array of track descriptors, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Match a batch of tracks and add them to a playlist
    Import(ImportArgs),
    /// Match a batch without touching any playlist
    Resolve {
        #[command(flatten)]
        input: InputArgs,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the search queries each descriptor would try (offline)
    Queries {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Authorize playlist access and store the refresh token
    Authorize {
        /// Authorization code, or the full redirect URL it arrived on
        #[arg(long)]
        code: Option<String>,
    },
    /// Print the config file location
    ConfigPath,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Name of a new playlist to create
    #[arg(long, required_unless_present = "playlist", conflicts_with = "playlist")]
    pub name: Option<String>,

    /// Description of the new playlist
    #[arg(long, requires = "name")]
    pub description: Option<String>,

    /// Existing playlist: URL, `spotify:playlist:` URI or bare ID
    #[arg(long)]
    pub playlist: Option<String>,

    /// Skip tracks the existing playlist already holds
    #[arg(long, requires = "playlist")]
    pub add_new: bool,

    /// Print the report (or the error) as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let file_config = load_config(cli.config.as_deref())?;
    let mut config = file_config.clone();
    cli.credentials.apply(&mut config.credentials);

    match &cli.command {
        Commands::Import(args) => {
            let rt = Runtime::new()?;
            cmd_import(&rt, &config, args)
        }
        Commands::Resolve { input, json } => {
            let rt = Runtime::new()?;
            cmd_resolve(&rt, &config, &input.input, *json)
        }
        Commands::Queries { input } => cmd_queries(&input.input),
        Commands::Authorize { code } => {
            let rt = Runtime::new()?;
            cmd_authorize(
                &rt,
                &config,
                file_config,
                cli.config.as_deref(),
                code.as_deref(),
            )
        }
        Commands::ConfigPath => cmd_config_path(cli.config.as_deref()),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// An explicit `--config` must load; the default location falls back quietly
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) if path.exists() => Ok(config::load_from(path)?),
        Some(path) => {
            tracing::debug!("Config file {:?} does not exist yet, using defaults", path);
            Ok(Config::default())
        }
        None => Ok(config::load()),
    }
}

/// Read and parse a descriptor batch from a file or stdin.
///
/// The raw text is dropped once parsed.
pub(crate) fn read_batch(input: &Path) -> Result<Vec<TrackDescriptor>> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", input.display(), e)))?
    };

    let descriptors = model::parse_batch(&text)?;
    tracing::info!("Read {} track descriptors", descriptors.len());
    Ok(descriptors)
}

/// Pretty-print a value as JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the structured error when `--json` is set, then hand it back
pub(crate) fn fail(error: Error, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&error.report())?;
    }
    Err(error.into())
}

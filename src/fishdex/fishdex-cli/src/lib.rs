//! CLI for fishdex: browse the fish catalog from the terminal.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fishdex_catalog::{Fish, FishListDocument};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub mod selection;
mod tui;

pub use selection::{Entry, SelectionController, SelectionObserver, Transition};

/// Endpoint of the catalog service when `--url` is not given.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000/get_fish_list";

/// Shown wherever an empty catalog would be.
pub const EMPTY_STATE: &str = "No fish yet.";

const USER_AGENT: &str = concat!("fishdex/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(name = "fishdex")]
#[command(version, about = "Browse the fish catalog", long_about = None)]
pub struct Cli {
    /// Catalog endpoint returning `{"fish": [...]}`
    #[arg(long, env = "FISHDEX_URL", default_value = DEFAULT_URL, global = true)]
    pub url: String,

    /// Read the catalog from a local JSON file instead (takes precedence over --url)
    #[arg(long, env = "FISHDEX_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Append log output to this file
    #[arg(long, env = "FISHDEX_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the catalog interactively (the default)
    Browse {
        /// Only show fish whose name contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Print fish names, one per line
    List {
        /// Only show fish whose name contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Print the detail card of one fish
    Show {
        /// Fish name (case-insensitive)
        name: String,
    },
}

impl Cli {
    pub fn source(&self) -> CatalogSource {
        match &self.file {
            Some(path) => CatalogSource::Local(path.clone()),
            None => CatalogSource::Remote(self.url.clone()),
        }
    }
}

/// Main entry point for the CLI.
pub fn main() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let source = cli.source();
    let command = cli.command.unwrap_or(Commands::Browse { filter: None });
    let interactive = matches!(command, Commands::Browse { .. });
    init_logging(cli.log_file.as_deref(), cli.verbose, interactive)?;

    match command {
        Commands::Browse { filter } => tui::run_browse(source, filter),
        Commands::List { filter } => {
            let fish = load_catalog(&source, filter.as_deref());
            write_list(&mut std::io::stdout().lock(), &fish)?;
            Ok(())
        }
        Commands::Show { name } => show_fish(&source, &name),
    }
}

// ============================================================================
// Logging
// ============================================================================

fn init_logging(log_file: Option<&Path>, verbose: bool, interactive: bool) -> Result<()> {
    let default_directive = if verbose {
        "fishdex_cli=debug"
    } else {
        "fishdex_cli=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        // The TUI owns the terminal; without a log file there is nowhere to write.
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

// ============================================================================
// Catalog source
// ============================================================================

/// Where the catalog is read from.
#[derive(Clone, Debug)]
pub enum CatalogSource {
    /// HTTP GET against the catalog service.
    Remote(String),
    /// A JSON file on disk with the same shape as the service response.
    Local(PathBuf),
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Remote(url) => write!(f, "{url}"),
            CatalogSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the catalog, optionally keeping only fish whose name contains `filter`.
pub fn fetch_fish_list(source: &CatalogSource, filter: Option<&str>) -> Result<Vec<Fish>> {
    let fish = match source {
        CatalogSource::Remote(url) => fetch_remote(url)?,
        CatalogSource::Local(path) => fishdex_catalog::read_fish_list(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
    };
    debug!(count = fish.len(), %source, "fetched catalog");

    Ok(match filter {
        Some(filter) => {
            let fish = fishdex_catalog::filter_by_name(fish, filter);
            debug!(count = fish.len(), filter, "filtered catalog");
            fish
        }
        None => fish,
    })
}

/// Like [`fetch_fish_list`], but a failed fetch yields an empty catalog.
pub fn load_catalog(source: &CatalogSource, filter: Option<&str>) -> Vec<Fish> {
    match fetch_fish_list(source, filter) {
        Ok(fish) => fish,
        Err(e) => {
            warn!("catalog unavailable, showing an empty list: {e:#}");
            Vec::new()
        }
    }
}

fn fetch_remote(url: &str) -> Result<Vec<Fish>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to query catalog at {url}"))?;

    if !response.status().is_success() {
        bail!(
            "Catalog request to {} failed (status: {})",
            url,
            response.status()
        );
    }

    let doc: FishListDocument = response
        .json()
        .with_context(|| format!("Failed to parse catalog response from {url}"))?;

    doc.into_fish()
        .with_context(|| format!("Malformed catalog response from {url}"))
}

// ============================================================================
// Plain output
// ============================================================================

/// Print fish names in catalog order, or the empty-state text.
pub fn write_list(out: &mut impl Write, fish: &[Fish]) -> std::io::Result<()> {
    if fish.is_empty() {
        return writeln!(out, "{EMPTY_STATE}");
    }
    for f in fish {
        writeln!(out, "{}", f.name)?;
    }
    Ok(())
}

/// Print the detail card for one fish.
pub fn write_card(out: &mut impl Write, fish: &Fish) -> std::io::Result<()> {
    use console::style;

    writeln!(
        out,
        "{}",
        style(fishdex_catalog::card_title(fish)).bold().underlined()
    )?;
    for (field, line) in fishdex_catalog::card_rows(fish) {
        if field.is_months() {
            writeln!(out, "  {}", style(line).dim())?;
        } else {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "  Image: {}", fish.image_url)?;
    Ok(())
}

fn show_fish(source: &CatalogSource, name: &str) -> Result<()> {
    let fish = fetch_fish_list(source, None)?;
    let Some(found) = fishdex_catalog::find_by_name(&fish, name) else {
        bail!("fish '{}' not found", name);
    };
    write_card(&mut std::io::stdout().lock(), found)?;
    Ok(())
}

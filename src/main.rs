mod board;
mod export;
mod render;

use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert a Trello board export JSON into a Markdown note vault.
/// One directory per list, one frontmatter-tagged file per card.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Trello board export JSON.
    /// Defaults to ./tmp/trello_export.json if not set in config.
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Directory to write the Markdown tree into.
    /// Defaults to ./tmp/kanban if not set in config.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/trello-md-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("trello-md-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve input path (CLI > Config > Default)
    let input_path = cli
        .input
        .or(file_cfg.input_path)
        .unwrap_or_else(|| PathBuf::from("tmp/trello_export.json"));

    // 3. Resolve output directory (CLI > Config > Default)
    let output_dir = cli
        .output
        .or(file_cfg.output_dir)
        .unwrap_or_else(|| PathBuf::from("tmp/kanban"));

    // 4. Run the conversion
    export::run(&export::ExportConfig {
        input_path,
        output_dir,
        quiet: cli.quiet,
    })
}

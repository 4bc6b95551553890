//! CLI for snout.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use snout_core::config::{self, SnoutConfig};
use std::path::PathBuf;

use commands::{run_check_file, run_completions, run_fetch, run_man, run_resolve};

/// Top-level CLI for snout.
#[derive(Debug, Parser)]
#[command(name = "snout")]
#[command(about = "snout: find the image behind a pasted link and check it for a cat or dog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve pasted links or snippets to the image URL they point at.
    Resolve {
        /// URLs, HTML/Markdown/JSON snippets or wrapper links.
        #[arg(required_unless_present = "stdin")]
        inputs: Vec<String>,

        /// Print one JSON report per input.
        #[arg(long)]
        json: bool,

        /// Read a single snippet from stdin instead of arguments.
        #[arg(long, conflicts_with = "inputs")]
        stdin: bool,
    },

    /// Check whether a local file would be accepted as an upload.
    CheckFile {
        /// Path to the image file.
        path: PathBuf,
    },

    /// Resolve an input and download the image it points at.
    Fetch {
        /// URL or snippet to resolve.
        input: String,

        /// Where to write the image bytes.
        #[arg(long, short, value_name = "PATH")]
        output: PathBuf,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Resolve {
                inputs,
                json,
                stdin,
            } => run_resolve(&load_config()?, &inputs, json, stdin).await?,
            CliCommand::CheckFile { path } => run_check_file(&load_config()?, &path).await?,
            CliCommand::Fetch { input, output } => {
                run_fetch(&load_config()?, &input, &output).await?
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<SnoutConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;

//! CLI for the downgate download gate.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use downgate_core::config::FilePreferences;
use std::path::PathBuf;

use commands::{run_classify, run_reconcile, run_resolve, run_simulate};

/// Top-level CLI for the downgate download gate.
#[derive(Debug, Parser)]
#[command(name = "downgate")]
#[command(about = "downgate: download target resolution and safety gating", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the destination path a download would get (dry run).
    Resolve {
        /// Download URL the filename is derived from.
        url: String,

        /// Target directory (defaults to the configured download dir, then cwd).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Content-Disposition header value, if the server sent one.
        #[arg(long, value_name = "HEADER")]
        content_disposition: Option<String>,

        /// Filename suggested by the page or the embedder.
        #[arg(long, value_name = "NAME")]
        suggested_filename: Option<String>,

        /// MIME type, used as a fallback filename source.
        #[arg(long, value_name = "TYPE")]
        mime_type: Option<String>,

        /// Overwrite an existing file instead of uniquifying the name.
        #[arg(long)]
        overwrite: bool,
    },

    /// Show the static danger classification of a filename.
    Classify {
        /// Filename or path to classify.
        path: PathBuf,
    },

    /// Reconcile a checker verdict with a static danger level.
    Reconcile {
        /// Checker verdict: safe, unknown, dangerous, uncommon,
        /// dangerous-host or potentially-unwanted.
        verdict: String,

        /// Static level: not-dangerous, allow-on-user-gesture or
        /// requires-explicit-consent.
        level: String,
    },

    /// Run one download through the full gate with a scripted verdict.
    Simulate {
        /// Download URL.
        url: String,

        /// Verdict the simulated checker reports (default: safe).
        #[arg(long, default_value = "safe", value_name = "VERDICT")]
        verdict: String,

        /// Target directory (defaults to the configured download dir, then cwd).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Simulate a build without any checker capability.
        #[arg(long)]
        no_checker: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let prefs = FilePreferences::load_or_init()?;
        tracing::debug!("loaded config: {:?}", prefs.config());

        match cli.command {
            CliCommand::Resolve {
                url,
                download_dir,
                content_disposition,
                suggested_filename,
                mime_type,
                overwrite,
            } => run_resolve(
                &prefs,
                &url,
                download_dir,
                content_disposition.as_deref(),
                suggested_filename.as_deref(),
                mime_type.as_deref(),
                overwrite,
            )?,
            CliCommand::Classify { path } => run_classify(&path)?,
            CliCommand::Reconcile { verdict, level } => run_reconcile(&prefs, &verdict, &level)?,
            CliCommand::Simulate {
                url,
                verdict,
                download_dir,
                no_checker,
            } => run_simulate(prefs, &url, &verdict, download_dir, no_checker).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

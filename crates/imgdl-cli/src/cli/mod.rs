//! CLI for imgdl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_all_phases, run_fetch_worker};

/// Download images three times over: with threads, with processes, and with async tasks.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "Download images using threads, processes and async tasks in turn", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Folder to save images into (default: the directory containing this program).
    pub output_folder: Option<PathBuf>,

    /// Image URLs to download (default: a built-in list of three images).
    pub urls: Vec<String>,

    /// TOML file with HTTP settings (timeouts, redirects, user agent).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a single URL and exit. Started by the process phase, one per URL.
    #[command(hide = true)]
    FetchWorker {
        /// Prefix for the output file name.
        #[arg(long)]
        prefix: String,

        /// URL to download.
        url: String,

        /// Folder to save into.
        output_folder: PathBuf,

        /// TOML file with HTTP settings, forwarded from the parent.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            Some(CliCommand::FetchWorker {
                prefix,
                url,
                output_folder,
                config,
            }) => run_fetch_worker(config.as_deref(), &prefix, &url, &output_folder),
            None => run_all_phases(cli.config.as_deref(), cli.output_folder, cli.urls),
        }
    }
}

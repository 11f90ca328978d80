// Copyright 2026 Planscrape Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use planscrape::cli;
use planscrape::config::{self, ControlConfig, WarrantConfig};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(
    name = "planscrape",
    about = "Planscrape: scrape UK planning and building-control cases to JSON",
    version,
    after_help = "Run 'planscrape <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a building-warrant case through Chromium
    Warrant {
        /// Case URL (scottishBuildingWarrantDetails.do?keyVal=...)
        #[arg(long, default_value = config::DEFAULT_WARRANT_CASE_URL)]
        case_url: Url,
        /// Where to write the JSON result
        #[arg(long, short, default_value = config::DEFAULT_WARRANT_OUTPUT)]
        output: PathBuf,
        /// Show the browser window
        #[arg(long)]
        headful: bool,
        /// Tab navigation timeout in milliseconds
        #[arg(long, default_value = "30000")]
        navigation_timeout: u64,
        /// Map tab load timeout in milliseconds
        #[arg(long, default_value = "60000")]
        map_timeout: u64,
        /// Map frame wait in milliseconds
        #[arg(long, default_value = "10000")]
        frame_timeout: u64,
        /// Certificate subtab whose links name the plots it covers
        #[arg(long, default_value = config::DEFAULT_PLOT_LINKS_SUBTAB)]
        plot_links_subtab: String,
    },
    /// Scrape a building-control application over HTTP
    Control {
        /// Portal base URL
        #[arg(long, default_value = config::DEFAULT_CONTROL_BASE_URL)]
        base_url: String,
        /// Disclaimer page, relative to the base URL
        #[arg(long, default_value = config::DEFAULT_DISCLAIMER_PATH)]
        disclaimer_path: String,
        /// Application page, relative to the base URL
        #[arg(long, default_value = config::DEFAULT_APPLICATION_PATH)]
        application_path: String,
        /// Where to write the JSON result
        #[arg(long, short, default_value = config::DEFAULT_CONTROL_OUTPUT)]
        output: PathBuf,
        /// Per-request timeout in milliseconds
        #[arg(long, default_value = "30000")]
        timeout: u64,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose {
        "planscrape=debug"
    } else {
        "planscrape=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Warrant {
            case_url,
            output,
            headful,
            navigation_timeout,
            map_timeout,
            frame_timeout,
            plot_links_subtab,
        } => {
            let config = WarrantConfig {
                case_url,
                output,
                navigation_timeout_ms: navigation_timeout,
                map_timeout_ms: map_timeout,
                frame_timeout_ms: frame_timeout,
                plot_links_subtab,
                headless: !headful,
            };
            cli::warrant_cmd::run(&config).await
        }
        Commands::Control {
            base_url,
            disclaimer_path,
            application_path,
            output,
            timeout,
        } => {
            let config = ControlConfig {
                base_url,
                disclaimer_path,
                application_path,
                output,
                timeout_ms: timeout,
            };
            cli::control_cmd::run(&config).await
        }
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "planscrape", &mut std::io::stdout());
            Ok(())
        }
    };

    // A failed run is reported but still exits 0; no output file is written.
    if let Err(e) = &result {
        tracing::error!("Error during scraping: {e:#}");
    }

    Ok(())
}

// Copyright 2026 Paperflow Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use paperflow_runtime::cli;

#[derive(Parser)]
#[command(
    name = "paperflow",
    about = "Paperflow: exam paper crawler, answer drafter and site screenshotter",
    version,
    after_help = "Run 'paperflow <command> --help' for details on each command.\nCredentials are read from the environment or a .env file."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl exam papers for the given labels into the article store
    Crawl {
        /// Label codes (default: every crawlable label)
        labels: Vec<String>,
        /// Keep articles in memory instead of writing to Supabase
        #[arg(long)]
        dry_run: bool,
        /// Seconds to wait for a paper page to finish loading
        #[arg(long, default_value = "8")]
        ready_timeout: u64,
        /// Seconds to let the page log its data before reading the console
        #[arg(long, default_value = "5")]
        capture_delay: u64,
        /// Seconds to pause between papers
        #[arg(long, default_value = "15")]
        paper_delay: u64,
    },
    /// Draft answers for stored articles that have none
    Answer {
        /// Label codes (default: every answerable label)
        labels: Vec<String>,
        /// Ask each question separately instead of only the essay
        #[arg(long)]
        per_question: bool,
    },
    /// List articles still waiting for an answer
    Pending {
        /// Label code
        label: String,
        /// Maximum rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Screenshot sites and publish them to the image host
    Siteshot {
        /// Site URLs (scheme optional)
        #[arg(required = true)]
        urls: Vec<String>,
        /// Directory for the PNG files
        #[arg(long, default_value = "./siteshots")]
        output_dir: PathBuf,
        /// Only capture, skip uploading
        #[arg(long)]
        no_upload: bool,
        /// Upload but do not write KV entries
        #[arg(long)]
        no_kv: bool,
        /// Label stored in the KV metadata
        #[arg(long)]
        label: Option<String>,
        /// List type stored in the KV metadata
        #[arg(long)]
        list_type: Option<String>,
    },
    /// Inspect the screenshot KV namespace
    Kv {
        #[command(subcommand)]
        action: KvAction,
    },
    /// Print what a page logs to its console
    Console {
        /// Page URL
        url: String,
        /// Seconds to keep listening after load
        #[arg(long, default_value = "5")]
        wait: u64,
    },
    /// Check environment and credentials
    Doctor,
    /// Show the exam label catalogue
    Labels,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum KvAction {
    /// List every key with its metadata
    List,
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Global flags travel through the environment so every command sees them.
    if cli.json {
        std::env::set_var("PAPERFLOW_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("PAPERFLOW_QUIET", "1");
    }
    init_tracing(&cli);

    let result = match cli.command {
        Commands::Crawl {
            labels,
            dry_run,
            ready_timeout,
            capture_delay,
            paper_delay,
        } => {
            cli::crawl_cmd::run(cli::crawl_cmd::CrawlArgs {
                labels,
                dry_run,
                ready_timeout,
                capture_delay,
                paper_delay,
            })
            .await
        }
        Commands::Answer {
            labels,
            per_question,
        } => cli::answer_cmd::run(labels, per_question).await,
        Commands::Pending { label, limit } => cli::pending_cmd::run(&label, limit).await,
        Commands::Siteshot {
            urls,
            output_dir,
            no_upload,
            no_kv,
            label,
            list_type,
        } => {
            cli::siteshot_cmd::run(cli::siteshot_cmd::SiteshotArgs {
                urls,
                output_dir,
                no_upload,
                no_kv,
                label,
                list_type,
            })
            .await
        }
        Commands::Kv { action } => match action {
            KvAction::List => cli::kv_cmd::run_list().await,
        },
        Commands::Console { url, wait } => cli::console_cmd::run(&url, wait).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Labels => cli::labels_cmd::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "paperflow", &mut std::io::stdout());
            Ok(())
        }
    };

    // Exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !cli::output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

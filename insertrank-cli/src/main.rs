mod config;
mod output;
mod session;
mod source;

use clap::Parser;
use insertrank_core::{Item, RankingEngine, seed_queue};
use reqwest::Client;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::session::{SessionEnd, run_session};
use crate::source::{AniListConfig, MediaKind, SourceError};

/// Default maximum title length in comparison prompts.
const DEFAULT_LABEL_WIDTH: usize = 60;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "insertrank", version, about = "Rank a list by answering one head-to-head question at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch a list and rank it interactively
    Rank(RankArgs),
    /// Create a default config file at ~/.config/insertrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// AniList user whose completed list should be ranked
    #[arg(long)]
    user: Option<String>,

    /// "anime" or "manga"
    #[arg(long)]
    media: Option<String>,

    /// Rank items from a JSON file instead of AniList.
    /// Format: [{"id": 1, "title": "...", "prior_score": 8.5}, ...]
    #[arg(long)]
    items: Option<PathBuf>,

    /// AniList GraphQL endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// HTTP timeout for the list fetch, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Shorten titles longer than this many characters in prompts
    #[arg(long)]
    label_width: Option<usize>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Log engine and fetch activity to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/insertrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => {
            init_tracing(args.verbose);
            run_rank(args).await
        }
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default user and media type.");
        }
    }
}

async fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let label_width = args.label_width.or(cfg.label_width).unwrap_or(DEFAULT_LABEL_WIDTH);

    let (items, source_label) = match args.items {
        Some(ref path) => {
            let items = load_or_empty(source::load_items_file(path));
            (items, path.display().to_string())
        }
        None => {
            let user = args.user.clone().or(cfg.user).unwrap_or_else(|| {
                bail(format!("No user specified. Pass --user or set it in {}", config_path.display()));
            });
            let media = args.media.clone().or(cfg.media).unwrap_or_else(|| "anime".to_string());
            let kind = MediaKind::parse(&media)
                .unwrap_or_else(|| bail(format!("Unknown media type \"{media}\". Use \"anime\" or \"manga\".")));

            let defaults = AniListConfig::default();
            let anilist = AniListConfig {
                endpoint: args.endpoint.clone().or(cfg.endpoint).unwrap_or(defaults.endpoint),
                timeout: args
                    .timeout
                    .or(cfg.timeout_secs)
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            };

            eprintln!("Fetching completed {} for {user}...", kind.label());
            let client = Client::new();
            let items = load_or_empty(source::fetch_completed_list(&client, &anilist, &user, kind).await);
            (items, format!("completed {} for {user}", kind.label()))
        }
    };

    if items.is_empty() {
        eprintln!("Nothing to rank: no items found in {source_label}.");
        return;
    }

    let queue = seed_queue(items);
    tracing::info!(items = queue.len(), source = %source_label, "starting tournament");

    // The engine is synchronous; the terminal session blocks on stdin.
    let session = tokio::task::spawn_blocking(move || {
        let mut engine = RankingEngine::new(queue);
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        let end = run_session(&mut engine, stdin.lock(), &mut stderr, label_width);
        (engine, end)
    });

    let (engine, end) = session
        .await
        .unwrap_or_else(|e| bail(format!("Ranking session crashed: {e}")));
    let end = end.unwrap_or_else(|e| bail(format!("Terminal I/O failed: {e}")));

    let complete = end == SessionEnd::Finished;
    let comparisons = engine.comparisons_made();
    let ranking: Vec<Item> = engine.into_ranking();

    if args.json {
        output::print_json(&ranking, comparisons, complete);
    } else {
        output::print_table(&ranking, comparisons, complete);
    }
}

/// Source failures degrade to "no items available".
fn load_or_empty(result: Result<Vec<Item>, SourceError>) -> Vec<Item> {
    result.unwrap_or_else(|e| {
        tracing::error!("item source unavailable: {e}");
        Vec::new()
    })
}

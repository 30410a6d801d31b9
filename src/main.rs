//! Searchlight main entry point
//!
//! Command-line interface for the Searchlight site-search engine: crawl a
//! host into its index database, query the index, or show index statistics.

use anyhow::Context;
use clap::{Parser, Subcommand};
use searchlight::config::{load_config_with_hash, Config};
use searchlight::crawler::crawl_site;
use searchlight::index::{database_path, InvertedIndex};
use searchlight::rank::Ranker;
use searchlight::text::{load_stopwords, TermFilter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Searchlight: a polite single-host site-search engine
#[derive(Parser, Debug)]
#[command(name = "searchlight")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-host site-search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "searchlight.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and build its index database
    Crawl {
        /// Seed URL of the host to crawl
        url: String,
    },

    /// Query a previously built index
    Search {
        /// Site URL the index was built for (selects the database file)
        site: String,

        /// Search term: one word, or exactly two words for a bigram query
        term: String,

        /// Treat the (final) word as a prefix
        #[arg(long)]
        wildcard: bool,
    },

    /// Show statistics for a previously built index
    Stats {
        /// Site URL the index was built for (selects the database file)
        site: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl { url } => handle_crawl(config, &url).await,
        Command::Search {
            site,
            term,
            wildcard,
        } => handle_search(config, &site, &term, wildcard),
        Command::Stats { site } => handle_stats(config, &site),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("searchlight=info,warn"),
            1 => EnvFilter::new("searchlight=debug,info"),
            2 => EnvFilter::new("searchlight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens the index database for a crawl target
fn open_index(config: &Config, site: &str) -> anyhow::Result<InvertedIndex> {
    let stopwords = load_stopwords(Path::new(&config.stopwords.path))
        .with_context(|| format!("failed to load stopwords from {}", config.stopwords.path))?;
    let filter = TermFilter::new(stopwords);

    let db_path = database_path(&config.output.database_dir, site)?;
    tracing::info!("Index database: {}", db_path.display());

    // Opening the store or creating the schema is the one unrecoverable
    // setup step; everything past this point degrades per operation.
    Ok(InvertedIndex::open(&db_path, filter)?)
}

/// Handles the crawl subcommand
async fn handle_crawl(config: Config, url: &str) -> anyhow::Result<()> {
    let index = open_index(&config, url)?;
    let index = Arc::new(Mutex::new(index));

    let summary = crawl_site(&config, index, url).await?;

    println!(
        "Crawled {} target(s): {} indexed, {} already indexed, {} denied by robots.txt",
        summary.targets, summary.indexed, summary.skipped, summary.denied
    );

    Ok(())
}

/// Handles the search subcommand
fn handle_search(config: Config, site: &str, term: &str, wildcard: bool) -> anyhow::Result<()> {
    let index = open_index(&config, site)?;
    let ranker = Ranker::new(&index);

    let hits = ranker.query(term, wildcard)?;
    if hits.is_empty() {
        println!("Term not found: {}", term);
        return Ok(());
    }

    for hit in &hits {
        println!(
            "{}  [{:.6}]",
            hit.title.as_deref().unwrap_or("(untitled)"),
            hit.tfidf
        );
        println!("  {}", hit.url);
        if let Some(sentence) = &hit.sentence {
            println!("  \"{}\"", sentence);
        }
    }

    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: Config, site: &str) -> anyhow::Result<()> {
    let index = open_index(&config, site)?;
    let stats = index.store().stats()?;

    println!("Documents:   {}", stats.documents);
    println!("Words:       {}", stats.words);
    println!("Occurrences: {}", stats.occurrences);
    println!("Bigrams:     {}", stats.bigrams);
    println!("Sentences:   {}", stats.sentences);

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Dataset;
use engine::EngineError;
use metadata::{CachedProvider, ProviderConfig, TmdbProvider};
use server::{ItemPreview, Recommendation, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// WhyWatch - explainable movie recommendations
#[derive(Parser)]
#[command(name = "whywatch")]
#[command(about = "Recommends similar movies and explains why", long_about = None)]
struct Cli {
    /// Directory containing items.dat and similarity.dat
    #[arg(short, long, env = "WHYWATCH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// TMDB API key used for metadata and posters
    #[arg(long, env = "TMDB_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// TMDB API base URL
    #[arg(long, env = "TMDB_API_URL", default_value = "https://api.themoviedb.org/3")]
    api_url: String,

    /// Prefix for poster image URLs
    #[arg(long, env = "TMDB_IMAGE_BASE_URL", default_value = "https://image.tmdb.org/t/p/w500/")]
    image_base_url: String,

    /// Timeout for each metadata request, in seconds
    #[arg(long, env = "WHYWATCH_TIMEOUT_SECS", default_value = "8")]
    timeout_secs: u64,

    /// Maximum metadata requests in flight
    #[arg(long, env = "WHYWATCH_CONCURRENCY", default_value = "8")]
    concurrency: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact catalog title
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(1..=8))]
        limit: u8,

        /// Show why each movie was recommended
        #[arg(long)]
        explain: bool,
    },

    /// Search the catalog by title
    Search {
        /// Case-insensitive substring to look for
        #[arg(long)]
        title: String,

        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show poster and metadata for one title
    Show {
        /// Exact catalog title
        #[arg(long)]
        title: String,
    },

    /// Time similarity ranking for random titles (no network)
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..))]
        requests: u32,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before clap reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load dataset (this may take a moment)
    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let dataset = Arc::new(
        Dataset::load_from_files(&cli.data_dir).context("Failed to load dataset")?,
    );
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let orchestrator = build_orchestrator(&cli, dataset)?;

    // Dispatch to appropriate command handler
    let outcome = match cli.command {
        Commands::Recommend {
            title,
            limit,
            explain,
        } => handle_recommend(&orchestrator, &title, limit as usize, explain).await,
        Commands::Search { title, limit } => handle_search(&orchestrator, &title, limit),
        Commands::Show { title } => handle_show(&orchestrator, &title).await,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&orchestrator, requests as usize, concurrent).await,
    };

    if let Err(err) = &outcome {
        if let Some(EngineError::NotFound { title }) = err.downcast_ref::<EngineError>() {
            println!(
                "{} '{}' is not in the catalog. Try `whywatch search --title ...` to pick a valid title.",
                "✗".red(),
                title
            );
        }
    }
    outcome
}

fn build_orchestrator(cli: &Cli, dataset: Arc<Dataset>) -> Result<RecommendationOrchestrator> {
    let timeout = Duration::from_secs(cli.timeout_secs);
    let config = ProviderConfig {
        api_key: cli.api_key.clone(),
        api_url: cli.api_url.clone(),
        image_base_url: cli.image_base_url.clone(),
        timeout,
    };
    if config.api_key.is_empty() {
        tracing::warn!("TMDB_API_KEY is not set, explanations and posters will be empty");
    }

    let provider = TmdbProvider::new(config).context("Failed to build metadata provider")?;
    let provider = Arc::new(CachedProvider::new(provider));

    Ok(RecommendationOrchestrator::new(dataset, provider)
        .with_concurrency(cli.concurrency)
        .with_lookup_timeout(timeout))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    title: &str,
    limit: usize,
    explain: bool,
) -> Result<()> {
    // Selected item panel
    let preview = orchestrator.item_preview(title).await?;
    print_preview(&preview);
    println!();

    let recommendations = orchestrator.recommend_with_explanations(title, limit).await?;

    println!(
        "{}",
        format!("Movies similar to \"{}\":", title).bold().blue()
    );
    for rec in &recommendations {
        // Metadata is cached by now, this does not hit the network again
        let details = orchestrator.item_preview(&rec.item.title).await?;
        print_recommendation(rec, &details, explain);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(orchestrator: &RecommendationOrchestrator, query: &str, limit: usize) -> Result<()> {
    let results = orchestrator.dataset().catalog.search(query, limit);

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if results.is_empty() {
        println!("  No titles match.");
    }
    for item in results {
        println!("  {}: {}", item.id, item.title);
    }
    Ok(())
}

/// Handle the 'show' command
async fn handle_show(orchestrator: &RecommendationOrchestrator, title: &str) -> Result<()> {
    let preview = orchestrator.item_preview(title).await?;
    print_preview(&preview);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: &RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let catalog = &orchestrator.dataset().catalog;
    anyhow::ensure!(!catalog.is_empty(), "Catalog is empty");

    // Random titles from the catalog
    let titles: Vec<String> = (0..requests)
        .filter_map(|_| {
            let row = rand::random::<u32>() as usize % catalog.len();
            catalog.get_by_row(row).map(|item| item.title.clone())
        })
        .collect();

    let wall_clock = Instant::now();
    let mut timings = Vec::with_capacity(titles.len());
    for batch in titles.chunks(concurrent.max(1)) {
        let mut handles = Vec::with_capacity(batch.len());
        for title in batch {
            let orchestrator = orchestrator.clone();
            let title = title.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                orchestrator.recommend(&title, 5)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            }));
        }
        for handle in handles {
            timings.push(handle.await??);
        }
    }
    let total_time = wall_clock.elapsed();

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Print the selected-item panel
fn print_preview(preview: &ItemPreview) {
    println!("{}", "Selected movie".bold().blue());
    println!("{}", preview.item.title.bold());
    match &preview.poster_url {
        Some(url) => println!("{}Poster: {}", "• ".green(), url),
        None => println!("{}Poster not available", "• ".green()),
    }

    let Some(meta) = &preview.metadata else {
        return;
    };
    if !meta.categories.is_empty() {
        println!("{}Genres: {}", "• ".cyan(), first_n(&meta.categories, 3));
    }
    if let Some(director) = &meta.lead_contributor {
        println!("{}Director: {}", "• ".cyan(), director);
    }
    if !meta.cast.is_empty() {
        println!("{}Cast: {}", "• ".cyan(), first_n(&meta.cast, 3));
    }
}

/// Print one ranked recommendation
fn print_recommendation(rec: &Recommendation, details: &ItemPreview, explain: bool) {
    println!(
        "{}. {} - Score: {:.3}",
        rec.rank.to_string().green(),
        rec.item.title.bold(),
        rec.score
    );
    match &rec.poster_url {
        Some(url) => println!("   Poster: {}", url),
        None => println!("   Poster not available"),
    }
    if let Some(meta) = &details.metadata {
        println!(
            "   Genres: {} | Director: {}",
            first_n(&meta.categories, 3),
            meta.lead_contributor.as_deref().unwrap_or("Unknown")
        );
    }
    if explain && !rec.explanation.is_empty() {
        println!("   {} {}", "Why this recommendation?".yellow(), rec.explanation);
    }
}

fn first_n(names: &[String], n: usize) -> String {
    names.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

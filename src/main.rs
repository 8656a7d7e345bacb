mod csfd;
mod dataset;
mod error;
mod fetch;
mod imdb;
mod pipeline;
mod progress;
mod rank;
mod record;
mod report;
mod settings;
mod text;
mod viz;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::dataset::Dataset;
use crate::fetch::HttpFetcher;
use crate::pipeline::{ScrapeOptions, ScrapeStats};
use crate::rank::RankOptions;
use crate::record::FilmRow;
use crate::settings::Settings;
use crate::viz::{BarSpec, Histogram, HistogramPair, RegressionSpec, ScatterSpec};

#[derive(Parser)]
#[command(name = "csfd_scraper", about = "ČSFD film scraper with IMDb rating linkage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape films from the ČSFD listing, optionally enriched from IMDb
    Scrape {
        /// Listing pages to crawl
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Skip the IMDb rating lookup
        #[arg(long)]
        no_imdb: bool,
        /// Write the dataset as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write an HTML report with posters
        #[arg(long)]
        html: Option<PathBuf>,
        /// Max rows in the overview table
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// HTTP timeout in seconds (overrides CSFD_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Rank films by a blended ČSFD/IMDb rating with optional filters
    Rank {
        /// Load a previously exported dataset instead of scraping
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Listing pages to crawl when no input file is given
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Skip the IMDb rating lookup when scraping
        #[arg(long)]
        no_imdb: bool,
        /// Keep only the best N films
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Genre substring filter (e.g. "drama")
        #[arg(short, long)]
        genre: Option<String>,
        /// Country substring filter (e.g. "Česko")
        #[arg(short, long)]
        country: Option<String>,
        /// First year to include
        #[arg(long, default_value = "0")]
        year_from: i32,
        /// First year to exclude
        #[arg(long, default_value = "2100")]
        year_to: i32,
        /// Shortest runtime to include (minutes)
        #[arg(long, default_value = "0")]
        runtime_from: u32,
        /// Shortest runtime to exclude (minutes)
        #[arg(long, default_value = "50000")]
        runtime_to: u32,
        /// Director substring filter
        #[arg(short, long)]
        director: Option<String>,
        /// ČSFD share of the blended rating, 0 (pure IMDb) to 1 (pure ČSFD)
        #[arg(short, long, default_value = "1.0")]
        weight: f64,
        /// Write the ranked rows as an HTML report
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Build plot specifications from the dataset
    Plot {
        /// Load a previously exported dataset instead of scraping
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Listing pages to crawl when no input file is given
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Write all four plot specs as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            pages,
            no_imdb,
            json,
            html,
            limit,
            timeout_secs,
        } => {
            let mut settings = Settings::load();
            if timeout_secs.is_some() {
                settings.timeout_secs = timeout_secs;
            }
            let fetcher = HttpFetcher::new(&settings)?;
            let options = ScrapeOptions {
                pages,
                enrich: !no_imdb,
            };
            let (dataset, stats) = pipeline::run(&fetcher, &options);

            print_overview(&dataset, limit);
            print_stats(&stats);

            if let Some(path) = json {
                dataset.save_json(&path)?;
                println!("Dataset written to {}", path.display());
            }
            if let Some(path) = html {
                let rows: Vec<&FilmRow> = dataset.rows().iter().collect();
                std::fs::write(&path, report::render("ČSFD films", &rows))?;
                println!("Report written to {}", path.display());
            }
            Ok(())
        }
        Commands::Rank {
            input,
            pages,
            no_imdb,
            top,
            genre,
            country,
            year_from,
            year_to,
            runtime_from,
            runtime_to,
            director,
            weight,
            html,
        } => {
            let dataset = load_or_scrape(input, pages, !no_imdb)?;
            let options = RankOptions {
                top,
                genre,
                country,
                years: year_from..year_to,
                runtime: runtime_from..runtime_to,
                director,
                weight,
            };
            let ranked = rank::rank(&dataset, &options)?;
            if ranked.is_empty() {
                println!("No films match the filters.");
                return Ok(());
            }

            print_ranked(&ranked, options.weight);

            if let Some(path) = html {
                std::fs::write(&path, report::render("Ranked films", &ranked))?;
                println!("Report written to {}", path.display());
            }
            Ok(())
        }
        Commands::Plot { input, pages, out } => {
            let dataset = load_or_scrape(input, pages, true)?;
            if dataset.complete().next().is_none() {
                println!("No films with both ratings; nothing to plot.");
                return Ok(());
            }

            let scatter = viz::rating_scatter(&dataset);
            let bars = viz::genre_gender_gap(&dataset);
            let histograms = viz::origin_histograms(&dataset);
            let regression = viz::rating_discrepancy_regression(&dataset);

            print_plots(&scatter, &bars, &histograms, regression.as_ref());

            if let Some(path) = out {
                let specs = serde_json::json!({
                    "scatter": scatter,
                    "genre_gender_gap": bars,
                    "origin_histograms": histograms,
                    "regression": regression,
                });
                std::fs::write(&path, serde_json::to_string_pretty(&specs)?)?;
                println!("Plot specs written to {}", path.display());
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Rank and plot work from a JSON export when one is given; otherwise they
/// scrape first.
fn load_or_scrape(input: Option<PathBuf>, pages: u32, enrich: bool) -> anyhow::Result<Dataset> {
    match input {
        Some(path) => Dataset::load_json(&path),
        None => {
            let settings = Settings::load();
            let fetcher = HttpFetcher::new(&settings)?;
            let options = ScrapeOptions { pages, enrich };
            let (dataset, _) = pipeline::run(&fetcher, &options);
            Ok(dataset)
        }
    }
}

fn print_overview(dataset: &Dataset, limit: usize) {
    if dataset.is_empty() {
        println!("No films scraped.");
        return;
    }

    println!(
        "{:>3} | {:<28} | {:>4} | {:<20} | {:>5} | {:>7} | {:>5}",
        "#", "Title", "Year", "Genres", "ČSFD", "Votes", "IMDb"
    );
    println!("{}", "-".repeat(90));

    for (i, row) in dataset.rows().iter().take(limit).enumerate() {
        let film = &row.film;
        let imdb = row
            .imdb
            .as_ref()
            .map(|e| format!("{:.1}", e.rating))
            .unwrap_or_else(|| "-".into());

        println!(
            "{:>3} | {:<28} | {:>4} | {:<20} | {:>4.0}% | {:>7} | {:>5}",
            i + 1,
            truncate(&film.title, 28),
            film.year,
            truncate(&film.genres.iter().join(" / "), 20),
            film.rating_pct,
            film.rating_count,
            imdb,
        );
    }

    if dataset.len() > limit {
        println!("... and {} more", dataset.len() - limit);
    }
}

fn print_stats(stats: &ScrapeStats) {
    println!("\nPages:    {}", stats.pages);
    println!("Links:    {}", stats.links);
    println!("Films:    {}", stats.items);
    println!("Skipped:  {}", stats.skipped);
    println!("Enriched: {}", stats.enriched);
    println!("Misses:   {}", stats.misses);
}

fn print_ranked(rows: &[&FilmRow], weight: f64) {
    println!(
        "{:>3} | {:<28} | {:>4} | {:>5} | {:>5} | {:>7} | {:<20}",
        "#", "Title", "Year", "ČSFD", "IMDb", "Blended", "Director"
    );
    println!("{}", "-".repeat(90));

    for (i, row) in rows.iter().enumerate() {
        let film = &row.film;
        let imdb = row
            .imdb
            .as_ref()
            .map(|e| format!("{:.1}", e.rating))
            .unwrap_or_else(|| "-".into());
        let blended = rank::blended_rating(row, weight)
            .map(|b| format!("{:.1}", b))
            .unwrap_or_else(|| "-".into());

        println!(
            "{:>3} | {:<28} | {:>4} | {:>4.0}% | {:>5} | {:>7} | {:<20}",
            i + 1,
            truncate(&film.title, 28),
            film.year,
            film.rating_pct,
            imdb,
            blended,
            truncate(&film.director, 20),
        );
    }
}

fn print_plots(
    scatter: &ScatterSpec,
    bars: &BarSpec,
    histograms: &HistogramPair,
    regression: Option<&RegressionSpec>,
) {
    println!("Scatter: {} film(s) with both ratings", scatter.points.len());

    println!("\nGender rating gap by genre (male - female):");
    for bar in &bars.bars {
        if let Some(diff) = bar.mean_gender_diff {
            let marks = "#".repeat(((diff.abs() * 50.0).round() as usize).min(40));
            println!("  {:<14} {:>+6.2} {}", bar.genre, diff, marks);
        }
    }

    println!("\nRating histograms (percent scale):");
    print_histogram("local / IMDb", &histograms.local.imdb);
    print_histogram("local / ČSFD", &histograms.local.csfd);
    print_histogram("abroad / IMDb", &histograms.abroad.imdb);
    print_histogram("abroad / ČSFD", &histograms.abroad.csfd);

    match regression {
        Some(reg) => println!(
            "\nDiscrepancy vs origin-difference regression: slope {:.3}, intercept {:.3} over {} point(s)",
            reg.slope,
            reg.intercept,
            reg.points.len()
        ),
        None => println!("\nRegression skipped: fewer than two complete rows"),
    }
}

fn print_histogram(label: &str, histogram: &Histogram) {
    let total: u64 = histogram.counts.iter().sum();
    if total == 0 {
        println!("  {:<14} no films", label);
        return;
    }
    let bins = histogram.counts.iter().map(u64::to_string).join(" ");
    println!(
        "  {:<14} {:>3} film(s), {:.0}..{:.0}  [{}]",
        label, total, histogram.min, histogram.max, bins
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

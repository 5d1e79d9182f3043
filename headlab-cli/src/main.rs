//! HeadLab CLI — download, analyze, and cache management commands.
//!
//! Commands:
//! - `download` — fetch closing prices from Yahoo Finance and cache as CSV
//! - `impact` — run the sentiment-vs-returns lag correlation sweep
//! - `temporal` — profile when headlines are published
//! - `coverage` — publisher and symbol coverage of a news file
//! - `tokens` — most frequent headline tokens after stopword removal
//! - `cache status` — report cache size, symbol count, date ranges
//! - `cache clean` — remove symbols cached before a cutoff

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use headlab_core::data::{CacheMeta, CircuitBreaker, MarketDataProvider, PriceCache, YahooProvider};
use headlab_core::domain::Article;
use headlab_core::ingest::{read_articles, DatePolicy};
use headlab_core::text::{token_frequencies, top_tokens};
use headlab_runner::report::save_artifacts;
use headlab_runner::runner::run_impact_analysis;
use headlab_runner::{
    AnalysisConfig, ImpactReport, PublisherCoverage, StockCoverage, TemporalProfile, DEFAULT_LAGS,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "headlab",
    about = "HeadLab CLI — financial news headline analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download closing prices from Yahoo Finance and cache as CSV.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 5 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Run the sentiment-vs-returns lag correlation sweep.
    Impact {
        /// Path to a TOML config file (overrides the individual flags).
        #[arg(long)]
        config: Option<PathBuf>,

        /// News CSV file (required without --config).
        #[arg(long)]
        news: Option<PathBuf>,

        /// Ticker symbol (required without --config).
        #[arg(long)]
        symbol: Option<String>,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Comma-separated lags in trading days (e.g., 0,1,2,3).
        #[arg(long)]
        lags: Option<String>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback when prices are unavailable.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Output directory for the report JSON and CSV.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Profile when headlines are published (hourly, weekday, monthly).
    Temporal {
        /// News CSV file.
        #[arg(long)]
        news: PathBuf,
    },
    /// Publisher and symbol coverage of a news file.
    Coverage {
        /// News CSV file.
        #[arg(long)]
        news: PathBuf,
    },
    /// Most frequent headline tokens after stopword removal.
    Tokens {
        /// News CSV file.
        #[arg(long)]
        news: PathBuf,

        /// How many tokens to show.
        #[arg(long, default_value_t = 25)]
        top: usize,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cache size, symbol count, and date ranges.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Remove symbols cached more than the given number of days ago.
    Clean {
        /// Remove symbols cached more than this many days ago.
        #[arg(long)]
        older_than_days: u64,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Actually delete (without this flag, only previews what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, start, end, force, cache_dir),
        Commands::Impact {
            config,
            news,
            symbol,
            start,
            end,
            lags,
            offline,
            synthetic,
            cache_dir,
            output_dir,
        } => run_impact_cmd(
            config, news, symbol, start, end, lags, offline, synthetic, cache_dir, output_dir,
        ),
        Commands::Temporal { news } => run_temporal(&news),
        Commands::Coverage { news } => run_coverage(&news),
        Commands::Tokens { news, top } => run_tokens(&news, top),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
            CacheAction::Clean {
                older_than_days,
                cache_dir,
                confirm,
            } => run_cache_clean(&cache_dir, older_than_days, confirm),
        },
    }
}

fn parse_date_or(value: Option<&str>, fallback_days_ago: i64) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)")),
        None => Ok(chrono::Local::now().date_naive() - chrono::Duration::days(fallback_days_ago)),
    }
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let start_date = parse_date_or(start.as_deref(), 365 * 5)?;
    let end_date = parse_date_or(end.as_deref(), 0)?;

    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker)?;
    let cache = PriceCache::new(cache_dir);

    let mut failures = 0;
    for symbol in &symbols {
        if !force && cache.contains(symbol) {
            println!("{symbol}: already cached (use --force to re-download)");
            continue;
        }
        print!("{symbol}: downloading... ");
        match provider.fetch(symbol, start_date, end_date) {
            Ok(fetched) => {
                cache.write(symbol, &fetched.bars, provider.name())?;
                println!("{} bars cached", fetched.bars.len());
            }
            Err(e) => {
                println!("FAILED");
                eprintln!("Error for {symbol}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_impact_cmd(
    config_path: Option<PathBuf>,
    news: Option<PathBuf>,
    symbol: Option<String>,
    start: Option<String>,
    end: Option<String>,
    lags: Option<String>,
    offline: bool,
    synthetic: bool,
    cache_dir: PathBuf,
    output_dir: PathBuf,
) -> Result<()> {
    let config = if let Some(path) = config_path {
        AnalysisConfig::load(&path)?
    } else {
        let Some(news_csv) = news else {
            bail!("one of --config or --news is required");
        };
        let Some(symbol) = symbol else {
            bail!("--symbol is required without --config");
        };
        AnalysisConfig {
            symbol,
            news_csv,
            start_date: parse_date_or(start.as_deref(), 365)?,
            end_date: parse_date_or(end.as_deref(), 0)?,
            lags: match lags.as_deref() {
                Some(s) => parse_lags(s)?,
                None => DEFAULT_LAGS.to_vec(),
            },
            cache_dir,
            offline,
            synthetic,
        }
    };

    let report = run_impact_analysis(&config)?;
    print_report(&report);

    let json_path = save_artifacts(&report, &output_dir)?;
    println!("Artifacts saved to: {}", json_path.display());

    Ok(())
}

fn parse_lags(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<usize>()
                .with_context(|| format!("invalid lag '{p}'"))
        })
        .collect()
}

fn print_report(report: &ImpactReport) {
    println!();
    println!("=== Sentiment Impact: {} ===", report.symbol);
    println!(
        "Period:     {} to {}",
        report.start_date, report.end_date
    );
    println!("Articles:   {}", report.article_count);
    println!("Scorer:     {}", report.sentiment_source);
    println!("Prices:     {:?}", report.price_source);
    println!();
    println!(
        "{:>4} {:>12} {:>12} {:>6}",
        "Lag", "Correlation", "P-value", "N"
    );
    println!("{}", "-".repeat(38));
    for row in &report.rows {
        if row.is_defined() {
            println!(
                "{:>4} {:>12.4} {:>12.4} {:>6}",
                row.lag, row.correlation, row.p_value, row.n_obs
            );
        } else {
            println!("{:>4} {:>12} {:>12} {:>6}", row.lag, "n/a", "n/a", row.n_obs);
        }
    }
}

fn load_news(path: &Path) -> Result<Vec<Article>> {
    let report = read_articles(path, DatePolicy::DropUnparseable)
        .with_context(|| format!("reading {}", path.display()))?;
    if report.dropped > 0 {
        eprintln!(
            "WARNING: dropped {} rows with unparseable dates",
            report.dropped
        );
    }
    if report.articles.is_empty() {
        bail!("no usable articles in {}", path.display());
    }
    Ok(report.articles)
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn run_temporal(news: &Path) -> Result<()> {
    let articles = load_news(news)?;
    let profile = TemporalProfile::compute(&articles);

    println!("=== Temporal Profile ===");
    println!("Articles:       {}", articles.len());
    println!("Active days:    {}", profile.total_days);
    println!("Avg per day:    {:.1}", profile.avg_daily);
    println!("Max in a day:   {}", profile.max_daily);
    if let Some(hour) = profile.peak_hour {
        println!("Peak hour:      {hour:02}:00 ET");
    }
    println!("Weekend share:  {:.1}%", profile.weekend_ratio * 100.0);

    println!();
    println!("By weekday:");
    for (name, count) in WEEKDAYS.iter().zip(profile.weekday_counts.iter()) {
        println!("  {name}  {count}");
    }

    println!();
    println!("By hour (ET):");
    for (hour, count) in profile.hourly_counts.iter().enumerate() {
        if *count > 0 {
            println!("  {hour:02}:00  {count}");
        }
    }

    println!();
    println!("By month:");
    for (month, count) in &profile.monthly_counts {
        println!("  {month}  {count}");
    }

    Ok(())
}

fn run_coverage(news: &Path) -> Result<()> {
    let articles = load_news(news)?;
    let publishers = PublisherCoverage::compute(&articles);
    let stocks = StockCoverage::compute(&articles);

    println!("=== Publisher Coverage ===");
    println!("Publishers: {}", publishers.total_publishers);
    println!();
    println!("{:<30} {:>8} {:>10}", "Publisher", "Articles", "Avg/day");
    println!("{}", "-".repeat(50));
    for (name, count) in publishers.publisher_counts.iter().take(20) {
        let avg = publishers
            .avg_articles_per_day
            .get(name)
            .copied()
            .unwrap_or(0.0);
        println!("{name:<30} {count:>8} {avg:>10.2}");
    }

    println!();
    println!("=== Symbol Coverage ===");
    println!("Symbols: {}", stocks.total_symbols);
    println!();
    println!(
        "{:<8} {:>8} {:>10} {:>12}",
        "Symbol", "Articles", "Avg/day", "Publishers"
    );
    println!("{}", "-".repeat(42));
    for (symbol, count) in stocks.stock_counts.iter().take(20) {
        let avg = stocks.avg_daily_volume.get(symbol).copied().unwrap_or(0.0);
        let diversity = stocks
            .publisher_diversity
            .get(symbol)
            .copied()
            .unwrap_or(0);
        println!("{symbol:<8} {count:>8} {avg:>10.2} {diversity:>12}");
    }

    Ok(())
}

fn run_tokens(news: &Path, top: usize) -> Result<()> {
    let articles = load_news(news)?;
    let counts = token_frequencies(articles.iter().map(|a| a.headline.as_str()));

    println!("=== Top Tokens ===");
    println!("Articles:        {}", articles.len());
    println!("Distinct tokens: {}", counts.len());
    println!();
    for (token, count) in top_tokens(&counts, top) {
        println!("{token:<20} {count}");
    }

    Ok(())
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let mut total_size: u64 = 0;
    let mut rows: Vec<(String, String, String, u64)> = Vec::new();

    for entry in std::fs::read_dir(cache_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with("symbol=") {
            continue;
        }
        let symbol = name.trim_start_matches("symbol=").to_string();

        let meta_path = entry.path().join("meta.json");
        let (date_range, bar_count) = match std::fs::read_to_string(&meta_path)
            .ok()
            .and_then(|c| serde_json::from_str::<CacheMeta>(&c).ok())
        {
            Some(meta) => (
                format!("{} to {}", meta.start_date, meta.end_date),
                meta.bar_count,
            ),
            None => ("(no meta)".into(), 0),
        };

        let size = dir_size(&entry.path());
        total_size += size;
        rows.push((symbol, date_range, format!("{bar_count} bars"), size));
    }

    if rows.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    rows.sort_by(|a, b| a.0.cmp(&b.0));

    println!("Cache: {}", cache_dir.display());
    println!("Symbols: {}", rows.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<8} {:<25} {:<12} {:>10}",
        "Symbol", "Date Range", "Bars", "Size"
    );
    println!("{}", "-".repeat(58));
    for (sym, range, bars, size) in &rows {
        println!("{:<8} {:<25} {:<12} {:>10}", sym, range, bars, format_size(*size));
    }

    Ok(())
}

fn run_cache_clean(cache_dir: &Path, older_than_days: u64, confirm: bool) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cutoff = chrono::Local::now().naive_local() - chrono::Duration::days(older_than_days as i64);
    let cache = PriceCache::new(cache_dir);

    let mut to_remove: Vec<String> = Vec::new();
    for symbol in cache.list_symbols() {
        match cache.load_meta(&symbol) {
            Ok(meta) if meta.cached_at >= cutoff => {}
            // Missing or stale meta both mean the entry is a removal candidate.
            _ => to_remove.push(symbol),
        }
    }

    if to_remove.is_empty() {
        println!("Nothing to clean.");
        return Ok(());
    }

    for symbol in &to_remove {
        if confirm {
            cache.remove(symbol)?;
            println!("Removed {symbol}");
        } else {
            println!("Would remove {symbol} (pass --confirm to delete)");
        }
    }

    Ok(())
}

fn dir_size(path: &Path) -> u64 {
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|e| e.metadata().ok())
                .filter(|m| m.is_file())
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0)
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.1} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{bytes} B")
    }
}

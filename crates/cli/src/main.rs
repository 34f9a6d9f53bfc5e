use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use termbot_model::{sanitize_query, validate_days, validate_limit, Lang};
use termbot_session::format_record;

mod app;
mod auth;
mod config;
mod repl;

use app::App;
use config::{Config, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "termbot")]
#[command(about = "Bilingual terminology lookup service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: termbot.toml, optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a navigation session interactively on stdin
    Repl {
        #[arg(long, default_value_t = 0)]
        user_id: i64,
    },

    /// Global search across the whole catalog
    Search {
        query: String,

        /// Maximum results (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Catalog summary per language
    Check,

    /// Usage statistics over a trailing window
    Stats {
        #[arg(long, default_value_t = 7)]
        days: i64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Searches that returned nothing — candidates for the catalog
    #[command(name = "failed-queries")]
    FailedQueries {
        #[arg(long, default_value_t = 7)]
        days: i64,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Event counts per day
    Activity {
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// Copy the analytics log to a timestamped file (admin only)
    Export {
        #[arg(long, default_value_t = 0)]
        user_id: i64,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Copy the term catalog to a timestamped backup (admin only)
    Backup {
        #[arg(long, default_value_t = 0)]
        user_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path, cli.config.is_some())?;
    let app = App::init(config)?;

    run_command(&app, cli.command)?;

    // Flush anything the command queued before the process exits.
    app.analytics.shutdown().await;
    Ok(())
}

fn run_command(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Repl { user_id } => repl::run(app, user_id)?,

        Commands::Search { query, limit } => {
            let query = sanitize_query(&query, app.config.ui.max_query_len)
                .context("query is empty or too long after cleanup")?;
            let limit = resolve_limit(limit, app.config.ui.max_search_results)?;
            let hits = app.store.search(&query, limit);
            if hits.is_empty() {
                println!("nothing found for \"{query}\"");
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. {}\n", i + 1, format_record(hit, true, true));
            }
        }

        Commands::Check => {
            println!("terms: {}", app.store.len());
            for lang in Lang::ALL {
                let categories = app.store.categories(lang);
                let subcategories: usize = categories
                    .iter()
                    .map(|c| app.store.subcategories(c, lang).len())
                    .sum();
                println!(
                    "{lang}: {} categories, {subcategories} subcategories",
                    categories.len()
                );
            }
        }

        Commands::Stats { days, json } => {
            let days = validate_days(days).context("days must be in 1..=365")?;
            let report = app.analytics.stats(days);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_stats(&report);
            }
        }

        Commands::FailedQueries { days, limit } => {
            let days = validate_days(days).context("days must be in 1..=365")?;
            let limit = validate_limit(limit).context("limit must be in 1..=1000")?;
            let failed = app.analytics.failed_queries(days, limit);
            if failed.is_empty() {
                println!("no failed queries in the last {days} days");
            }
            for entry in failed {
                println!("{:>5}  {}", entry.count, entry.query);
            }
        }

        Commands::Activity { days } => {
            let days = validate_days(days).context("days must be in 1..=365")?;
            for (day, count) in app.analytics.user_activity(days) {
                println!("{day}  {count}");
            }
        }

        Commands::Export { user_id, output } => {
            app.admins.require(user_id)?;
            let path = app.analytics.export(output)?;
            println!("exported to {}", path.display());
        }

        Commands::Backup { user_id } => {
            app.admins.require(user_id)?;
            let path = app
                .analytics
                .backup_file(&app.config.catalog.terms_file)?;
            println!("backed up to {}", path.display());
        }
    }
    Ok(())
}

/// An explicit `--limit` goes through the same range check as the stats
/// commands; an absent flag falls back to the configured default, which
/// `Config::validate` already keeps positive.
fn resolve_limit(flag: Option<usize>, default: usize) -> Result<usize> {
    match flag {
        Some(n) => validate_limit(n).context("limit must be in 1..=1000"),
        None => Ok(default),
    }
}

fn print_stats(report: &termbot_analytics::StatsReport) {
    println!("stats for the last {} days", report.period_days);
    println!("  events: {}", report.total_events);
    println!(
        "  unique users: {} ({} today, {} events today)",
        report.unique_users, report.unique_users_today, report.events_today
    );
    println!("  languages:");
    for (lang, count) in &report.languages {
        println!("    {lang}: {count}");
    }
    println!("  top categories:");
    for (i, (category, count)) in report.top_categories.iter().enumerate() {
        println!("    {}. {category}: {count}", i + 1);
    }
    println!("  top queries:");
    for (i, (query, count)) in report.top_queries.iter().enumerate() {
        println!("    {}. {query}: {count}", i + 1);
    }
    println!(
        "  search: {} total, {} successful, {} failed ({:.1}% success)",
        report.search.total, report.search.successful, report.search.failed,
        report.search.success_rate
    );
}

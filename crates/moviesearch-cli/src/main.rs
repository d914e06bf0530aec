//! moviesearch - terminal movie search over the TMDB catalog.

/// Application configuration (TOML).
mod config;
/// Search state machine and its effects.
mod search;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path, resolve_log_dir};
use crate::search::MAX_PAGE;
use crate::tui::SearchDefaults;
use moviesearch_api::tmdb::{MovieSearchApi, SearchMovieParams, TmdbClient};

/// Environment variable holding the TMDB bearer token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Log file written while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "moviesearch.log";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/log directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run (default: browse).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse search results in the interactive TUI.
    Browse(BrowseArgs),
    /// Run one search and print the results.
    Search(SearchArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args, Default)]
struct BrowseArgs {
    /// Query submitted on startup.
    #[arg(long)]
    query: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(long)]
    query: String,

    /// Result page (1-500).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    page: u32,

    /// Response language (default: `tmdb.language` from config).
    #[arg(long)]
    language: Option<String>,
}

/// Where log output goes.
enum LogTarget {
    /// Standard output (one-shot commands).
    Stdout,
    /// `moviesearch.log` in the given directory (TUI).
    File(PathBuf),
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log directory or log file cannot be created.
fn init_tracing(target: &LogTarget) -> Result<()> {
    let (writer, ansi) = match target {
        LogTarget::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE_NAME)
                .build(dir)
                .with_context(|| format!("failed to open log file in {}", dir.display()))?;
            (BoxMakeWriter::new(appender), false)
        }
    };

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Builds a TMDB client from config and `TMDB_API_TOKEN`.
///
/// A missing token is not an error here; every search then fails with a
/// configuration error.
///
/// # Errors
///
/// Returns an error if `tmdb.base_url` is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_token = std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty());
    if api_token.is_none() {
        tracing::warn!("{TOKEN_ENV} is not set; searches will fail");
    }

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = &config.base_url {
        let url: Url = base_url
            .parse()
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the client fails to build, or the
/// API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("--query must not be blank");
    }
    let client = build_tmdb_client(&config.tmdb)?;

    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);
    let params = SearchMovieParams::new(query)
        .page(args.page)
        .language(language)
        .include_adult(config.tmdb.include_adult);

    let response = client
        .search_movie(&params)
        .await
        .context("TMDB search/movie request failed")?;

    if response.is_empty() {
        tracing::info!("No movies found for your request.");
        return Ok(());
    }

    tracing::info!(
        "Page {} of {} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in &response.results {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}",
            movie.id,
            movie.release_year().unwrap_or("-"),
            movie.vote_average,
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = Arc::new(build_tmdb_client(&config.tmdb)?);
    let defaults = SearchDefaults {
        language: config.tmdb.language.clone(),
        include_adult: config.tmdb.include_adult,
    };

    tui::run_browser(client, defaults, config.ui.toast_duration(), args.query).await
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Browse(BrowseArgs::default()));
    let dir = cli.dir.as_deref();

    let log_target = match command {
        Commands::Search(_) => LogTarget::Stdout,
        Commands::Browse(_) => LogTarget::File(resolve_log_dir(dir)?),
    };
    init_tracing(&log_target)?;

    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    match command {
        Commands::Browse(args) => run_browse(args, &config).await,
        Commands::Search(args) => run_search(&args, &config).await,
    }
}

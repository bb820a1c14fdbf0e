use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use services::{AppServices, Clock};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use web::AppContext;

const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Parser)]
#[command(name = "feedback", version, about = "Anonymous course feedback form")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DbArgs {
    /// SQLite file path or connection URL
    #[arg(long = "db", env = "FEEDBACK_DB_URL", default_value = "feedback.sqlite3")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the feedback form over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "FEEDBACK_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "FEEDBACK_PORT", default_value_t = 5000)]
        port: u16,

        /// Log at debug level (the default)
        #[arg(long, overrides_with = "no_debug")]
        debug: bool,

        /// Log at info level
        #[arg(long, overrides_with = "debug")]
        no_debug: bool,

        #[command(flatten)]
        db: DbArgs,
    },

    /// Create the schema and seed categories and lessons if the store is empty
    Seed {
        #[command(flatten)]
        db: DbArgs,
    },

    /// Write the anonymized results as CSV to stdout
    Export {
        #[command(flatten)]
        db: DbArgs,
    },
}

impl Commands {
    /// `serve` logs at debug level unless `--no-debug` is the last word.
    fn debug(&self) -> bool {
        match self {
            Commands::Serve {
                debug, no_debug, ..
            } => *debug || !*no_debug,
            Commands::Seed { .. } | Commands::Export { .. } => false,
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn")));
    // stdout is reserved for command output such as the CSV export
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_memory_url(url: &str) -> bool {
    url == MEMORY_URL || url.contains("mode=memory")
}

/// Turn a bare path or relative `sqlite:` URL into an absolute `sqlite://` URL.
fn normalize_sqlite_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("invalid --db value: {raw:?}");
    }
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_owned());
    }

    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// Make sure the database file and its parent directories exist.
fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if !path.exists() {
        info!(path = %path.display(), "creating database file");
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }

    Ok(())
}

/// Open the store and run catalog bootstrap.
async fn open_services(db: &DbArgs) -> anyhow::Result<AppServices> {
    let db_url = normalize_sqlite_url(&db.db)?;
    prepare_sqlite_file(&db_url)?;

    let services = AppServices::new_sqlite(&db_url, Clock::default_clock())
        .await
        .with_context(|| format!("failed to open store at {db_url}"))?;
    info!(db = %db_url, seeded = services.seeded(), "store ready");
    Ok(services)
}

async fn serve(host: &str, port: u16, db: &DbArgs) -> anyhow::Result<()> {
    let services = open_services(db).await?;
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    web::serve(listener, AppContext::new(&services)).await?;
    Ok(())
}

async fn seed(db: &DbArgs) -> anyhow::Result<()> {
    let services = open_services(db).await?;
    if services.seeded() {
        println!("catalog seeded");
    } else {
        println!("catalog already initialized");
    }
    Ok(())
}

async fn export(db: &DbArgs) -> anyhow::Result<()> {
    let services = open_services(db).await?;
    let csv = services.export().csv().await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&csv)?;
    stdout.flush()?;
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port, db, .. } => serve(&host, port, &db).await,
        Commands::Seed { db } => seed(&db).await,
        Commands::Export { db } => export(&db).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.debug());

    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(normalize_sqlite_url(MEMORY_URL).unwrap(), MEMORY_URL);
        let shared = "sqlite:file:x?mode=memory&cache=shared";
        assert_eq!(normalize_sqlite_url(shared).unwrap(), shared);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("data/feedback.sqlite3").unwrap();
        let path = url.strip_prefix("sqlite://").unwrap();
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("data/feedback.sqlite3"));

        let prefixed = normalize_sqlite_url("sqlite:data/feedback.sqlite3").unwrap();
        assert_eq!(prefixed, url);
    }

    #[test]
    fn blank_db_is_rejected() {
        assert!(normalize_sqlite_url("  ").is_err());
    }

    #[test]
    fn prepare_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/feedback.sqlite3");
        let url = format!("sqlite://{}", path.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(path.exists());
        prepare_sqlite_file(&url).unwrap();
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("feedback").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_parses_serve_flags() {
        let cli = parse(&["serve", "--port", "8080"]);
        let Commands::Serve { port, .. } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(port, 8080);
    }

    #[test]
    fn serve_debug_defaults_on() {
        assert!(parse(&["serve"]).command.debug());
        assert!(parse(&["serve", "--debug"]).command.debug());
        assert!(!parse(&["serve", "--no-debug"]).command.debug());
    }

    #[test]
    fn last_debug_flag_wins() {
        assert!(parse(&["serve", "--no-debug", "--debug"]).command.debug());
        assert!(!parse(&["serve", "--debug", "--no-debug"]).command.debug());
    }

    #[test]
    fn batch_commands_log_at_info() {
        assert!(!parse(&["seed"]).command.debug());
        assert!(!parse(&["export"]).command.debug());
    }
}

//! becas server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and serves the upload and list pages over HTTP. The other
//! subcommands run the same operations from the command line.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use becas_api::{ApiState, UploadConfig};
use becas_core::{
  Recipient, Worker, YearlyRecord,
  store::{RecordStore as _, RosterStore as _},
};
use becas_ingest::IngestOptions;
use becas_server::ServerConfig;
use becas_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Scholarship registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the web pages and JSON endpoints (the default).
  Serve,
  /// Create the database schema and report table sizes.
  Init,
  /// Ingest a workbook into the store.
  Ingest {
    file:  PathBuf,
    /// Sheet to read; defaults to `default_sheet` from the config.
    #[arg(long)]
    sheet: Option<String>,
  },
  /// Summarise a sheet without writing to the store.
  Dump {
    file:  PathBuf,
    #[arg(long)]
    sheet: Option<String>,
  },
  /// Print a roster as JSON rows.
  List {
    #[arg(value_enum)]
    roster: Roster,
  },
  /// Look up workers by full name, ignoring case and surrounding spaces.
  Find { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Roster {
  Workers,
  Recipients,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;

  // Dumping never needs the database.
  if let Some(Command::Dump { file, sheet }) = &cli.command {
    let sheet = sheet.clone().unwrap_or_else(|| cfg.default_sheet.clone());
    let summary = becas_ingest::spreadsheet::dump_sheet(file, &sheet)
      .with_context(|| format!("failed to read {}", file.display()))?;
    return print_json(&summary);
  }

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, cfg).await,
    Command::Init => {
      store.create_schema().await?;
      tracing::info!(
        workers = store.count::<Worker>().await?,
        recipients = store.count::<Recipient>().await?,
        yearly_records = store.count::<YearlyRecord>().await?,
        "schema ready at {}",
        store_path.display()
      );
      Ok(())
    }
    Command::Ingest { file, sheet } => {
      let options = IngestOptions::current(sheet.unwrap_or(cfg.default_sheet));
      let report = becas_ingest::ingest(&store, &file, &options)
        .await
        .with_context(|| format!("failed to ingest {}", file.display()))?;
      print_json(&report)
    }
    Command::List { roster: Roster::Workers } => {
      let rows: Vec<_> = store
        .list_workers()
        .await?
        .into_iter()
        .map(|w| w.into_row())
        .collect();
      print_json(&rows)
    }
    Command::List { roster: Roster::Recipients } => {
      let rows: Vec<_> = store
        .list_recipients()
        .await?
        .into_iter()
        .map(|r| r.into_row())
        .collect();
      print_json(&rows)
    }
    Command::Find { name } => print_json(&store.find_workers_by_name(name).await?),
    Command::Dump { .. } => Ok(()),
  }
}

async fn serve(store: SqliteStore, cfg: ServerConfig) -> anyhow::Result<()> {
  let upload_dir = expand_tilde(&cfg.upload_dir);
  tokio::fs::create_dir_all(&upload_dir)
    .await
    .with_context(|| format!("failed to create upload directory {upload_dir:?}"))?;

  let state = ApiState {
    store:   Arc::new(store),
    uploads: Arc::new(UploadConfig {
      dir:   upload_dir,
      sheet: cfg.default_sheet.clone(),
    }),
  };

  let app = becas_server::router(state, cfg.max_upload_bytes);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

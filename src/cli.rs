use crate::error::Operation;
use crate::lifecycle::AppState;
use crate::logging::{self, LogTarget};
use crate::model::{Movie, ResponseShape, StoreConfig};
use crate::store::StoreClient;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// One chunk of headless output and the stream it belongs on.
enum Printed {
    Out(String),
    Err(String),
}

/// Headless output sink. Writes happen on a blocking thread; dropping the
/// sender and awaiting the handle flushes everything that was queued.
fn spawn_printer() -> (mpsc::UnboundedSender<Printed>, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Printed>();
    let handle = tokio::task::spawn_blocking(move || {
        let mut out = std::io::LineWriter::new(std::io::stdout().lock());
        let mut err = std::io::LineWriter::new(std::io::stderr().lock());
        while let Some(chunk) = rx.blocking_recv() {
            // A closed pipe (e.g. `| head`) just ends the output.
            let written = match chunk {
                Printed::Out(s) => writeln!(out, "{s}"),
                Printed::Err(s) => writeln!(err, "{s}"),
            };
            if written.is_err() {
                break;
            }
        }
        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

/// Fetch once for a headless mode. On failure the friendly message is queued
/// for stderr and the detailed error is returned.
async fn fetch_headless(
    client: &StoreClient,
    printer: &mpsc::UnboundedSender<Printed>,
) -> Result<Vec<Movie>> {
    client.fetch_movies().await.map_err(|e| {
        let _ = printer.send(Printed::Err(e.user_message(Operation::Fetch)));
        anyhow::Error::new(e).context(format!("fetching {} failed", client.url()))
    })
}

pub const DEFAULT_BASE_URL: &str =
    "https://react-http-28b62-default-rtdb.asia-southeast1.firebasedatabase.app";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "movies-tui",
    version,
    about = "Browse and add movies in a hosted JSON store"
)]
pub struct Cli {
    /// Base URL of the remote JSON store (`/movies.json` is appended)
    #[arg(long, env = "MOVIES_STORE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Response shape the store returns for the movie list
    #[arg(long, value_enum, env = "MOVIES_RESPONSE_SHAPE", default_value_t = ResponseShape::Keyed)]
    pub shape: ResponseShape,

    /// Per-request timeout (e.g. 10s). Unset means wait indefinitely
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Print the movie list as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print the movie list as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Use --fetch-on-launch true or --fetch-on-launch false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub fetch_on_launch: bool,

    /// Log file for interactive mode (defaults to the user cache directory)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!(
            "--json and --text are mutually exclusive. Pick one output mode."
        ));
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            let log_path = args
                .log_file
                .clone()
                .unwrap_or_else(logging::default_log_path);
            logging::init(LogTarget::File(&log_path))?;
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            logging::init(LogTarget::Stderr)?;
            return run_text(args).await;
        }
    }

    logging::init(LogTarget::Stderr)?;
    if args.json {
        return run_json(args).await;
    }
    run_text(args).await
}

/// Build a `StoreConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> StoreConfig {
    StoreConfig {
        base_url: args.base_url.clone(),
        shape: args.shape,
        user_agent: format!("movies-tui/{}", env!("CARGO_PKG_VERSION")),
        timeout: args.timeout.map(Duration::from),
    }
}

async fn run_json(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = StoreClient::new(&cfg).context("failed to build HTTP client")?;
    let (printer, handle) = spawn_printer();

    let res = fetch_headless(&client, &printer).await.and_then(|movies| {
        let out = serde_json::to_string_pretty(&movies).context("encode movie list")?;
        let _ = printer.send(Printed::Out(out));
        Ok(())
    });
    drop(printer);
    let _ = handle.await;
    res
}

async fn run_text(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = StoreClient::new(&cfg).context("failed to build HTTP client")?;
    let (printer, handle) = spawn_printer();

    let res = fetch_headless(&client, &printer).await.map(|movies| {
        let state = AppState::default().loading_started().loading_succeeded(movies);
        for line in crate::text_view::build_text_view(state.view()).lines {
            let _ = printer.send(Printed::Out(line));
        }
    });
    drop(printer);
    let _ = handle.await;
    res
}

//! CLI binary for draw2glb-client.
//!
//! A thin shim over the library crate that maps subcommands to client
//! operations and prints results. The `diag` subcommand replays the full
//! manual check an operator runs against a fresh deployment.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use draw2glb_client::{
    run_ingest_parse, run_warmup, ClientConfig, Draw2GlbClient, StatusSink,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Status sink backed by an indicatif spinner ───────────────────────────────

/// Shows the driver's current status line on a terminal spinner.
///
/// Multi-line statuses (the pretty-printed parse result) are printed above
/// the spinner so they survive the next update.
struct SpinnerSink {
    bar: ProgressBar,
}

impl SpinnerSink {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl StatusSink for SpinnerSink {
    fn status(&self, line: &str) {
        match line.split_once('\n') {
            Some((head, rest)) => {
                self.bar.println(head.to_string());
                self.bar.println(rest.to_string());
                self.bar.set_message(String::new());
            }
            None => self.bar.set_message(line.to_string()),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Wake the backend and check it answers
  draw2glb warmup

  # Upload a drawing (PDF, PNG, or JPG)
  draw2glb ingest bracket.pdf

  # Extract dimensions from an uploaded drawing
  draw2glb parse 3f2a9c…d1.pdf

  # Build a GLB from a model spec
  draw2glb build spec.json -o bracket.glb

  # Full manual check: warmup, then ingest + parse
  draw2glb diag bracket.pdf

ENVIRONMENT VARIABLES:
  DRAW2GLB_API_BASE_URL   Backend base URL (required)
  DRAW2GLB_API_KEY        Optional bearer credential
  DRAW2GLB_TIMEOUT        Per-request timeout in seconds (ingest/parse/build)

SETUP:
  1. Point at a backend:  export DRAW2GLB_API_BASE_URL=https://api.example.com
  2. Check it is alive:   draw2glb warmup
"#;

/// Exercise the draw2glb backend: warm-up, ingest, parse, build.
#[derive(Parser, Debug)]
#[command(
    name = "draw2glb",
    version,
    about = "Exercise the draw2glb backend: warm-up, ingest, parse, build",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL.
    #[arg(long, env = "DRAW2GLB_API_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Bearer credential sent with every request.
    #[arg(long, env = "DRAW2GLB_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds for ingest/parse/build.
    #[arg(long, env = "DRAW2GLB_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DRAW2GLB_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "DRAW2GLB_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wake the backend (POST /warmup, falling back to GET /health).
    Warmup,

    /// Upload a drawing and print its file_id.
    Ingest {
        /// Path to a PDF/PNG/JPG drawing.
        file: PathBuf,
    },

    /// Extract dimensions/features from an uploaded drawing.
    Parse {
        /// Identifier returned by `ingest`.
        file_id: String,
    },

    /// Build a GLB artifact from a model specification.
    Build {
        /// Path to a JSON model spec.
        spec: PathBuf,

        /// Where to write the artifact.
        #[arg(short, long, default_value = "model.glb")]
        output: PathBuf,
    },

    /// Run the full manual check: warm-up, then ingest + parse.
    Diag {
        /// Path to a PDF/PNG/JPG drawing.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config & client ────────────────────────────────────────────
    // Read once here; the config is immutable for the rest of the run.
    let mut builder = ClientConfig::builder()
        .base_url(cli.base_url.clone().unwrap_or_default())
        .maybe_api_key(cli.api_key.clone());
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    let config = builder
        .build()
        .context("No backend configured — set DRAW2GLB_API_BASE_URL or pass --base-url")?;
    let client = Draw2GlbClient::new(config)?;

    match cli.command {
        Command::Warmup => cmd_warmup(&client, cli.quiet).await,
        Command::Ingest { file } => cmd_ingest(&client, &file, cli.quiet).await,
        Command::Parse { file_id } => cmd_parse(&client, &file_id).await,
        Command::Build { spec, output } => cmd_build(&client, &spec, &output, cli.quiet).await,
        Command::Diag { file } => cmd_diag(&client, &file).await,
    }
}

async fn cmd_warmup(client: &Draw2GlbClient, quiet: bool) -> Result<()> {
    let spinner = spinner_unless(quiet, "Warming up…");
    let result = client.warmup().await;
    if let Some(s) = &spinner {
        s.finish();
    }

    result.context("Warmup failed")?;
    eprintln!("{} backend ready at {}", green("✔"), bold(&client.config().base_url));
    Ok(())
}

async fn cmd_ingest(client: &Draw2GlbClient, file: &Path, quiet: bool) -> Result<()> {
    let (name, bytes) = read_drawing(file).await?;

    let spinner = spinner_unless(quiet, "Uploading…");
    let result = client.ingest(&name, bytes).await;
    if let Some(s) = &spinner {
        s.finish();
    }

    let file_id = result.context("Ingest failed")?;
    eprintln!("{} ingested {}", green("✔"), dim(&name));
    println!("{file_id}");
    Ok(())
}

async fn cmd_parse(client: &Draw2GlbClient, file_id: &str) -> Result<()> {
    let parsed = client.parse(file_id).await.context("Parse failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&parsed).context("Failed to render parse result")?
    );
    Ok(())
}

async fn cmd_build(
    client: &Draw2GlbClient,
    spec_path: &Path,
    output: &Path,
    quiet: bool,
) -> Result<()> {
    let spec_text = tokio::fs::read_to_string(spec_path)
        .await
        .with_context(|| format!("Failed to read spec from {}", spec_path.display()))?;
    let spec: serde_json::Value = serde_json::from_str(&spec_text)
        .with_context(|| format!("{} is not valid JSON", spec_path.display()))?;

    let spinner = spinner_unless(quiet, "Building…");
    let result = client.build(&spec).await;
    if let Some(s) = &spinner {
        s.finish();
    }

    let glb = result.context("Build failed")?;
    tokio::fs::write(output, &glb)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!(
        "{} {} bytes  →  {}",
        green("✔"),
        glb.len(),
        bold(&output.display().to_string())
    );
    Ok(())
}

async fn cmd_diag(client: &Draw2GlbClient, file: &Path) -> Result<()> {
    let (name, bytes) = read_drawing(file).await?;

    eprintln!("API base: {}", bold(&client.config().base_url));

    let sink = SpinnerSink::new();
    let warmed = run_warmup(client, &sink).await;
    sink.finish();
    if let Err(e) = warmed {
        eprintln!("{} Warmup ERROR: {e}", red("✗"));
        anyhow::bail!("diagnostic aborted at warmup");
    }
    eprintln!("{} Warmup OK", green("✔"));

    let sink = SpinnerSink::new();
    let result = run_ingest_parse(client, &name, bytes, &sink).await;
    sink.finish();
    match result {
        Ok((file_id, parsed)) => {
            eprintln!("{} Ingest + Parse OK  {}", green("✔"), dim(&format!("file_id={file_id}")));
            let mut stdout = io::stdout().lock();
            let rendered = serde_json::to_string_pretty(&parsed)
                .context("Failed to render parse result")?;
            stdout.write_all(rendered.as_bytes()).ok();
            stdout.write_all(b"\n").ok();
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Ingest/Parse ERROR: {e}", red("✗"));
            anyhow::bail!("diagnostic aborted")
        }
    }
}

/// Read a drawing from disk, keeping its filename for the multipart part.
async fn read_drawing(file: &Path) -> Result<(String, Vec<u8>)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "drawing.pdf".to_string());
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok((name, bytes))
}

/// A ticking spinner with the given message, unless quiet mode is on.
fn spinner_unless(quiet: bool, msg: &str) -> Option<SpinnerSink> {
    if quiet {
        return None;
    }
    let sink = SpinnerSink::new();
    sink.status(msg);
    Some(sink)
}

//! CLI binary for pdf-embed-lab.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ViewerConfig` and either serves the comparison page or writes it out.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf_embed_lab::config::{DEFAULT_GOOGLE_VIEWER_URL, DEFAULT_PDFJS_VIEWER_URL};
use pdf_embed_lab::server::{self, AppState, ServerConfig};
use pdf_embed_lab::{render_input, render_page, RenderStatus, ViewOutcome, ViewerConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve the upload page on http://127.0.0.1:8501
  pdf-embed-lab serve

  # Serve on all interfaces with a custom sample
  pdf-embed-lab serve --host 0.0.0.0 --port 8080 --sample ./demo.pdf

  # Write a static comparison page for a local file
  pdf-embed-lab render report.pdf -o compare.html

  # Render a public URL (method 4 can then actually load it)
  pdf-embed-lab render https://arxiv.org/pdf/1706.03762 -o attention.html

  # Only the six fragments, as JSON with render status
  pdf-embed-lab render report.pdf --json

METHODS:
  1  <embed> with base64 data URI
  2  <object> with <embed> fallback
  3  <iframe> with base64 data URI
  4  Google Docs viewer (needs a public URL)
  5  PDF.js hosted viewer
  6  Download link

ENVIRONMENT VARIABLES:
  PDF_EMBED_LAB_SAMPLE         Sample PDF shown when nothing is uploaded
  PDF_EMBED_LAB_TRANSIENT_DIR  Directory for per-request upload copies
  PDF_EMBED_LAB_GOOGLE_VIEWER_URL / _PDFJS_VIEWER_URL
                               Hosted viewers for methods 4 and 5
  PDF_EMBED_LAB_HOST / _PORT   Listen address for `serve`
  RUST_LOG                     Overrides --verbose / --quiet log filtering
"#;

/// Compare browser PDF embedding techniques side by side.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-embed-lab",
    version,
    about = "Compare browser PDF embedding techniques side by side",
    long_about = "Renders one PDF with six HTML embedding techniques (embed, object, iframe, \
Google Docs viewer, PDF.js viewer, download link) so you can see which ones each browser \
actually displays.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF_EMBED_LAB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF_EMBED_LAB_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the upload page over HTTP.
    Serve {
        /// Interface to listen on.
        #[arg(long, env = "PDF_EMBED_LAB_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, env = "PDF_EMBED_LAB_PORT", default_value_t = 8501)]
        port: u16,

        /// Largest accepted upload in MiB.
        #[arg(long, env = "PDF_EMBED_LAB_MAX_UPLOAD_MB", default_value_t = 50,
              value_parser = clap::value_parser!(u64).range(1..=1024))]
        max_upload_mb: u64,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Render a PDF file or URL (or the sample) to a static HTML page.
    Render {
        /// Local PDF path or HTTP/HTTPS URL. Defaults to the sample.
        input: Option<String>,

        /// Write HTML to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the fragment column only, without the surrounding page.
        #[arg(long)]
        fragments_only: bool,

        /// Output structured JSON (render status and markup) instead of HTML.
        #[arg(long, conflicts_with = "fragments_only")]
        json: bool,

        /// HTTP download timeout in seconds.
        #[arg(long, env = "PDF_EMBED_LAB_DOWNLOAD_TIMEOUT", default_value_t = 120)]
        download_timeout: u64,

        #[command(flatten)]
        viewer: ViewerArgs,
    },
}

/// Flags shared by both subcommands.
#[derive(Args, Debug)]
struct ViewerArgs {
    /// Sample PDF shown when nothing is uploaded [default: sample.pdf next to the binary].
    #[arg(long, env = "PDF_EMBED_LAB_SAMPLE")]
    sample: Option<PathBuf>,

    /// Directory for transient upload copies [default: OS temp dir].
    #[arg(long, env = "PDF_EMBED_LAB_TRANSIENT_DIR")]
    transient_dir: Option<PathBuf>,

    /// CSS height of every embedded frame.
    #[arg(long, env = "PDF_EMBED_LAB_FRAME_HEIGHT", default_value = "400px")]
    frame_height: String,

    /// File name offered by the download link.
    #[arg(long, env = "PDF_EMBED_LAB_DOWNLOAD_NAME", default_value = "document.pdf")]
    download_name: String,

    /// Page title.
    #[arg(long, env = "PDF_EMBED_LAB_TITLE", default_value = "PDF Viewer Test")]
    title: String,

    /// Hosted viewer used by method 4 (receives the document location as `?url=`).
    #[arg(long, env = "PDF_EMBED_LAB_GOOGLE_VIEWER_URL", default_value = DEFAULT_GOOGLE_VIEWER_URL)]
    google_viewer_url: String,

    /// Hosted viewer used by method 5 (receives the data URI as `?file=`).
    #[arg(long, env = "PDF_EMBED_LAB_PDFJS_VIEWER_URL", default_value = DEFAULT_PDFJS_VIEWER_URL)]
    pdfjs_viewer_url: String,
}

impl ViewerArgs {
    fn builder(&self) -> pdf_embed_lab::ViewerConfigBuilder {
        let mut builder = ViewerConfig::builder()
            .frame_height(&self.frame_height)
            .download_name(&self.download_name)
            .page_title(&self.title)
            .google_viewer_url(&self.google_viewer_url)
            .pdfjs_viewer_url(&self.pdfjs_viewer_url);
        if let Some(ref sample) = self.sample {
            builder = builder.sample_path(sample);
        }
        if let Some(ref dir) = self.transient_dir {
            builder = builder.transient_dir(dir);
        }
        builder
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve {
            host,
            port,
            max_upload_mb,
            viewer,
        } => {
            let config = viewer
                .builder()
                .max_upload_bytes((max_upload_mb * 1024 * 1024) as usize)
                .build()
                .context("Invalid configuration")?;

            if !cli.quiet {
                eprintln!(
                    "{} {}",
                    green("◆"),
                    bold(&format!("PDF viewer test page on http://{host}:{port}"))
                );
            }

            server::run(AppState::new(config), ServerConfig { host, port })
                .await
                .context("Server failed")?;
        }
        Command::Render {
            input,
            output,
            fragments_only,
            json,
            download_timeout,
            viewer,
        } => {
            let config = viewer
                .builder()
                .download_timeout_secs(download_timeout)
                .build()
                .context("Invalid configuration")?;

            let outcome = render_input(input.as_deref(), &config)
                .await
                .context("Render failed")?;

            let text = if json {
                serde_json::to_string_pretty(&outcome).context("Failed to serialise output")?
            } else if fragments_only {
                outcome.view().map(|v| v.html.clone()).unwrap_or_default()
            } else {
                render_page(&outcome, &config, false).context("Failed to render page")?
            };

            if let Some(ref path) = output {
                pdf_embed_lab::view::write_page(path, &text)
                    .await
                    .context("Failed to write output")?;
            } else {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(text.as_bytes())
                    .context("Failed to write to stdout")?;
                if !text.ends_with('\n') {
                    handle.write_all(b"\n").ok();
                }
            }

            if !cli.quiet {
                print_summary(&outcome, output.as_ref());
            }
        }
    }

    Ok(())
}

/// One-line status on stderr after `render`.
fn print_summary(outcome: &ViewOutcome, output: Option<&PathBuf>) {
    let target = output
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();
    match outcome {
        ViewOutcome::NoSource => eprintln!(
            "{} Please upload a PDF file to test the viewer (no input and no sample found).",
            yellow("⚠")
        ),
        ViewOutcome::Rendered(view) => match &view.status {
            RenderStatus::Complete { fragments } => eprintln!(
                "{} {} fragments  {} bytes base64  {}ms{}",
                green("✔"),
                fragments,
                view.payload_bytes,
                view.duration_ms,
                target
            ),
            RenderStatus::NotFound => eprintln!(
                "{} PDF file not found: {}{}",
                red("✘"),
                view.location,
                target
            ),
            RenderStatus::Failed { message } => {
                eprintln!("{} {}{}", red("✘"), message, target)
            }
        },
    }
}

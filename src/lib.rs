//! # pdf-embed-lab
//!
//! Render one PDF six different ways on a single page so you can compare,
//! browser by browser, which embedding technique actually displays it.
//!
//! ## Methods
//!
//! | # | Technique | Needs network at view time |
//! |---|-----------|----------------------------|
//! | 1 | `<embed>` with a base64 data URI | no |
//! | 2 | `<object>` with `<embed>` fallback | no |
//! | 3 | `<iframe>` with a base64 data URI | no |
//! | 4 | Google Docs hosted viewer (`?url=`) | yes; only works for public URLs |
//! | 5 | Mozilla PDF.js hosted viewer (`?file=`) | yes |
//! | 6 | Download link (`<a download>`) | no |
//!
//! Nothing here parses or validates PDF content: the bytes are read,
//! base64-encoded and handed to the browser.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload / sample / path / URL
//!  │
//!  ├─ 1. Input     stage upload in a unique transient file, or fall back to the sample
//!  ├─ 2. Encode    bytes → base64 → data:application/pdf URI
//!  ├─ 3. Assemble  six independent HTML fragments (askama templates)
//!  └─ 4. Display   page with upload form; transient file dropped on every path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_embed_lab::{display, render_page, ViewerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::builder().sample_path("sample.pdf").build()?;
//!     let bytes = std::fs::read("document.pdf")?;
//!     let outcome = display(Some(bytes.as_slice()), &config)?;
//!     std::fs::write("compare.html", render_page(&outcome, &config, false)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-embed-lab` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod server;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ViewerConfig, ViewerConfigBuilder};
pub use error::{AssemblyError, ViewerError};
pub use output::{RenderStatus, RenderedView, ViewOutcome};
pub use page::render_page;
pub use pipeline::assemble::{embed_pdf_html, FragmentSet, RenderFragment, RenderMethod};
pub use pipeline::encode::EncodedPayload;
pub use pipeline::input::{PdfSource, SourceKind};
pub use server::{router, AppState, ServerConfig};
pub use view::{display, render_input, render_source, render_to_file};

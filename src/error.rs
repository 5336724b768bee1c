//! Error types for the pdf-embed-lab library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ViewerError`] — **Fatal for the current operation**: the request
//!   cannot produce a page at all (transient file could not be written,
//!   download failed, server could not bind). Returned as `Err(ViewerError)`.
//!
//! * [`AssemblyError`] — **Non-fatal**: reading or templating one PDF
//!   failed. It never escapes the assembly stage; instead it is rendered as
//!   an inline error fragment so the page still displays.
//!
//! Neither type is ever fatal to the process: the worst case is a degraded
//! or missing display for one request.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-embed-lab library.
#[derive(Debug, Error)]
pub enum ViewerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// Could not write the per-request transient copy of the PDF.
    #[error("Failed to stage transient PDF: {source}")]
    TransientWrite {
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The page template failed to render.
    #[error("Failed to render page template: {0}")]
    Template(String),

    // ── Server errors ─────────────────────────────────────────────────────
    /// Host/port pair is not a socket address.
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    /// The listener could not be bound.
    #[error("Failed to bind {addr}: {source}\nIs another process already using the port? Try --port.")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure while turning one PDF file into fragments.
///
/// Converted into an inline `<p>Error loading PDF: …</p>` fragment by
/// [`crate::pipeline::assemble::embed_pdf_html`].
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Nothing exists at the path.
    #[error("PDF file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but the process may not read it.
    #[error("Permission denied reading '{path}': {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while reading the bytes.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fragment template failed to render.
    #[error("Template error: {0}")]
    Template(String),
}

impl AssemblyError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => AssemblyError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => {
                AssemblyError::PermissionDenied { path, source: err }
            }
            _ => AssemblyError::Read { path, source: err },
        }
    }

    /// True when the failure means "nothing to show" rather than "broken".
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssemblyError::NotFound { .. })
    }
}

impl From<askama::Error> for AssemblyError {
    fn from(e: askama::Error) -> Self {
        AssemblyError::Template(e.to_string())
    }
}

impl From<askama::Error> for ViewerError {
    fn from(e: askama::Error) -> Self {
        ViewerError::Template(e.to_string())
    }
}

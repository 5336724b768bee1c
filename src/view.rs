//! Display orchestration: pick a source, assemble it, release it.
//!
//! Every entry point is a single linear pass. The [`PdfSource`] owning a
//! transient file lives only inside these functions, so the file is gone by
//! the time they return, whichever way they return.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::output::{RenderStatus, RenderedView, ViewOutcome};
use crate::page::render_page;
use crate::pipeline::assemble::{assemble, failure_html};
use crate::pipeline::input::{self, PdfSource};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Assemble one source into a [`RenderedView`]. Never fails: assembly
/// errors become the inline not-found or error paragraph.
pub fn render_source(source: &PdfSource, config: &ViewerConfig) -> RenderedView {
    let start = Instant::now();
    let location = source.viewer_location();

    let result = assemble(source.path(), &location, config)
        .and_then(|set| set.to_html().map(|html| (html, set)));

    let (html, status, payload_bytes) = match result {
        Ok((html, set)) => (
            html,
            RenderStatus::Complete {
                fragments: set.fragments.len(),
            },
            set.payload_len,
        ),
        Err(e) => {
            warn!("Could not assemble {}: {}", source.path().display(), e);
            let status = if e.is_not_found() {
                RenderStatus::NotFound
            } else {
                RenderStatus::Failed {
                    message: e.to_string(),
                }
            };
            (failure_html(&e), status, 0)
        }
    };

    let view = RenderedView {
        html,
        source: source.kind(),
        location,
        status,
        payload_bytes,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Rendered {:?} source in {}ms ({} bytes base64)",
        view.source, view.duration_ms, view.payload_bytes
    );
    view
}

/// Handle one display request.
///
/// An upload (even an empty one) takes priority over the sample. With neither
/// available this logs a warning and returns [`ViewOutcome::NoSource`]
/// without producing markup.
pub fn display(upload: Option<&[u8]>, config: &ViewerConfig) -> Result<ViewOutcome, ViewerError> {
    let Some(source) = input::select_source(upload, config)? else {
        warn!("No upload and no sample PDF available");
        return Ok(ViewOutcome::NoSource);
    };
    let view = render_source(&source, config);
    // Dropping the source deletes any transient upload.
    drop(source);
    Ok(ViewOutcome::Rendered(view))
}

/// Render a CLI input: a local path, an HTTP(S) URL, or (if `None`) the sample.
///
/// Reading and encoding run on the blocking pool; only the download awaits
/// on the runtime.
pub async fn render_input(
    input: Option<&str>,
    config: &ViewerConfig,
) -> Result<ViewOutcome, ViewerError> {
    let source = match input {
        Some(input) => Some(input::resolve_input(input, config).await?),
        None => None,
    };
    let config = config.clone();

    tokio::task::spawn_blocking(move || match source {
        Some(source) => Ok(ViewOutcome::Rendered(render_source(&source, &config))),
        None => display(None, &config),
    })
    .await
    .map_err(|e| ViewerError::Internal(format!("render task failed: {e}")))?
}

/// Render a CLI input as a standalone page and write it to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn render_to_file(
    input: Option<&str>,
    output_path: impl AsRef<Path>,
    config: &ViewerConfig,
) -> Result<ViewOutcome, ViewerError> {
    let outcome = render_input(input, config).await?;
    let page = render_page(&outcome, config, false)?;
    write_page(output_path.as_ref(), &page).await?;
    Ok(outcome)
}

/// Atomically write `html` to `path`.
pub async fn write_page(path: &Path, html: &str) -> Result<(), ViewerError> {
    let write_err = |source| ViewerError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, html).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

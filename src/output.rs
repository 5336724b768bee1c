//! Result types describing one render pass.

use crate::pipeline::input::SourceKind;
use serde::{Deserialize, Serialize};

/// How assembly ended for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderStatus {
    /// All fragments were produced.
    Complete { fragments: usize },
    /// The file vanished or never existed; the not-found paragraph is shown.
    NotFound,
    /// Reading or templating failed; the error paragraph is shown.
    Failed { message: String },
}

/// Markup and bookkeeping for one rendered PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedView {
    /// Fragment column, or the not-found / error paragraph.
    pub html: String,
    pub source: SourceKind,
    /// Path or URL the PDF was read from.
    pub location: String,
    pub status: RenderStatus,
    /// Length of the base64 payload (0 unless complete).
    pub payload_bytes: usize,
    pub duration_ms: u64,
}

impl RenderedView {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, RenderStatus::Complete { .. })
    }

    /// Short human description used above the fragments.
    pub fn source_label(&self) -> String {
        match self.source {
            SourceKind::Upload => "uploaded file".to_string(),
            SourceKind::Sample => format!("sample PDF ({})", self.location),
            SourceKind::Local => format!("local file {}", self.location),
            SourceKind::Remote => format!("downloaded {}", self.location),
        }
    }
}

/// Outcome of one display request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "view", rename_all = "snake_case")]
pub enum ViewOutcome {
    Rendered(RenderedView),
    /// Neither an upload nor the sample was available.
    NoSource,
}

impl ViewOutcome {
    pub fn view(&self) -> Option<&RenderedView> {
        match self {
            ViewOutcome::Rendered(v) => Some(v),
            ViewOutcome::NoSource => None,
        }
    }
}

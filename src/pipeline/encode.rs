//! Payload encoding: PDF bytes → base64 text → `data:` URI.
//!
//! Browsers accept a whole document inlined as a data URI, which is what
//! methods 1, 2, 3, 5 and 6 rely on. The payload is regenerated on every
//! render and never cached.

use crate::error::AssemblyError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// MIME type declared in every data URI.
pub const PDF_MIME: &str = "application/pdf";

/// Base64 text of one PDF, standard alphabet with padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `data:application/pdf;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{PDF_MIME};base64,{}", self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encode raw PDF bytes.
pub fn encode_pdf(bytes: &[u8]) -> EncodedPayload {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    EncodedPayload(b64)
}

/// Read a whole file and encode it.
pub fn read_payload(path: &Path) -> Result<(EncodedPayload, usize), AssemblyError> {
    let bytes = std::fs::read(path).map_err(|e| AssemblyError::from_io(path, e))?;
    Ok((encode_pdf(&bytes), bytes.len()))
}

//! Input acquisition: turn an upload, the sample, a path or a URL into a
//! readable local file.
//!
//! ## Why a `NamedTempFile` per request?
//!
//! Uploaded and downloaded bytes are written to a freshly named transient
//! file. Two overlapping requests therefore never share a path, and the file
//! is removed when the owning [`PdfSource`] is dropped, on the success path,
//! on an early `?` return, and during unwinding alike.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Where the PDF being rendered came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Upload,
    Sample,
    Local,
    Remote,
}

/// A PDF ready to be read from local storage.
///
/// Transient variants own their file; dropping the source deletes it.
#[derive(Debug)]
pub enum PdfSource {
    /// Bytes uploaded through the UI, staged in a unique transient file.
    Upload(NamedTempFile),
    /// The bundled sample next to the executable.
    Sample(PathBuf),
    /// A path given on the command line. Not checked for existence.
    Local(PathBuf),
    /// A URL downloaded into a transient file.
    Remote { url: String, file: NamedTempFile },
}

impl PdfSource {
    /// Path of the file holding the PDF bytes.
    pub fn path(&self) -> &Path {
        match self {
            PdfSource::Upload(file) => file.path(),
            PdfSource::Sample(p) | PdfSource::Local(p) => p,
            PdfSource::Remote { file, .. } => file.path(),
        }
    }

    /// Location handed to the hosted viewer of method 4.
    ///
    /// Only a remote source yields something that viewer can actually fetch;
    /// for every other source this is a local path and method 4 shows the
    /// viewer's own error page.
    pub fn viewer_location(&self) -> String {
        match self {
            PdfSource::Remote { url, .. } => url.clone(),
            other => other.path().display().to_string(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            PdfSource::Upload(_) => SourceKind::Upload,
            PdfSource::Sample(_) => SourceKind::Sample,
            PdfSource::Local(_) => SourceKind::Local,
            PdfSource::Remote { .. } => SourceKind::Remote,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Create an empty transient file with a unique `.pdf` name.
fn transient_file(dir: Option<&Path>) -> Result<NamedTempFile, ViewerError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("pdf-embed-lab-").suffix(".pdf");
    let file = match dir {
        Some(d) => builder.tempfile_in(d),
        None => builder.tempfile(),
    };
    file.map_err(|source| ViewerError::TransientWrite { source })
}

/// Write uploaded bytes to a uniquely named transient file.
pub fn stage_upload(bytes: &[u8], dir: Option<&Path>) -> Result<PdfSource, ViewerError> {
    let mut file = transient_file(dir)?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|source| ViewerError::TransientWrite { source })?;
    debug!(
        "Staged {} uploaded bytes at {}",
        bytes.len(),
        file.path().display()
    );
    Ok(PdfSource::Upload(file))
}

/// The configured sample, if it exists on disk.
pub fn sample_source(config: &ViewerConfig) -> Option<PdfSource> {
    let path = config.sample_path.as_ref()?;
    if path.is_file() {
        Some(PdfSource::Sample(path.clone()))
    } else {
        debug!("No sample PDF at {}", path.display());
        None
    }
}

/// Pick the source for one render: an upload, even a zero-byte one, wins
/// over the sample.
///
/// Returns `Ok(None)` when neither is available. Deciding whether a form part
/// counts as an upload at all is the caller's job.
pub fn select_source(
    upload: Option<&[u8]>,
    config: &ViewerConfig,
) -> Result<Option<PdfSource>, ViewerError> {
    match upload {
        Some(bytes) => stage_upload(bytes, config.transient_dir.as_deref()).map(Some),
        None => Ok(sample_source(config)),
    }
}

/// Resolve a CLI input string to a local PDF.
///
/// URLs are downloaded into a transient file; anything else is taken as a
/// local path and left for the assembly stage to report if missing.
pub async fn resolve_input(input: &str, config: &ViewerConfig) -> Result<PdfSource, ViewerError> {
    if is_url(input) {
        download_url(input, config).await
    } else if input.trim().is_empty() {
        Err(ViewerError::InvalidInput {
            input: input.to_string(),
        })
    } else {
        debug!("Resolved local PDF: {}", input);
        Ok(PdfSource::Local(PathBuf::from(input)))
    }
}

/// Download a URL into a transient file.
async fn download_url(url: &str, config: &ViewerConfig) -> Result<PdfSource, ViewerError> {
    info!("Downloading PDF from: {}", url);
    let timeout_secs = config.download_timeout_secs;

    let parsed = reqwest::Url::parse(url).map_err(|_| ViewerError::InvalidInput {
        input: url.to_string(),
    })?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ViewerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(parsed).send().await.map_err(|e| {
        if e.is_timeout() {
            ViewerError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ViewerError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ViewerError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ViewerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let mut file = transient_file(config.transient_dir.as_deref())?;
    file.write_all(&bytes)
        .map_err(|source| ViewerError::TransientWrite { source })?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file.path().display());

    Ok(PdfSource::Remote {
        url: url.to_string(),
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> ViewerConfig {
        ViewerConfig::builder()
            .sample_path(dir.join("sample.pdf"))
            .transient_dir(dir.join("transient"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn staged_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let source = stage_upload(b"%PDF-1.4", Some(dir.path())).unwrap();
        let path = source.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(source.kind(), SourceKind::Upload);
        drop(source);
        assert!(!path.exists());
    }

    #[test]
    fn staged_uploads_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = stage_upload(b"a", Some(dir.path())).unwrap();
        let b = stage_upload(b"b", Some(dir.path())).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().extension().is_some_and(|e| e == "pdf"));
    }

    #[test]
    fn staging_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage_upload(b"x", Some(&dir.path().join("missing"))).unwrap_err();
        assert!(matches!(err, ViewerError::TransientWrite { .. }));
    }

    #[test]
    fn upload_takes_priority_over_sample() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("transient")).unwrap();
        std::fs::write(dir.path().join("sample.pdf"), b"%PDF sample").unwrap();
        let config = config_in(dir.path());

        let source = select_source(Some(b"%PDF upload"), &config).unwrap().unwrap();
        assert_eq!(source.kind(), SourceKind::Upload);
    }

    #[test]
    fn zero_byte_upload_still_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("transient")).unwrap();
        std::fs::write(dir.path().join("sample.pdf"), b"%PDF sample").unwrap();
        let config = config_in(dir.path());

        let source = select_source(Some(b""), &config).unwrap().unwrap();
        assert_eq!(source.kind(), SourceKind::Upload);
        assert_eq!(std::fs::read(source.path()).unwrap(), b"");
    }

    #[test]
    fn no_upload_falls_back_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample.pdf"), b"%PDF sample").unwrap();
        let config = config_in(dir.path());

        let source = select_source(None, &config).unwrap().unwrap();
        assert_eq!(source.kind(), SourceKind::Sample);
        assert_eq!(source.path(), dir.path().join("sample.pdf"));
    }

    #[test]
    fn nothing_available_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(select_source(None, &config).unwrap().is_none());
    }

    #[test]
    fn sample_directory_is_not_a_sample() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sample.pdf")).unwrap();
        assert!(sample_source(&config_in(dir.path())).is_none());
    }

    #[test]
    fn viewer_location_is_path_for_local() {
        let source = PdfSource::Local(PathBuf::from("docs/a.pdf"));
        assert_eq!(source.viewer_location(), "docs/a.pdf");
        assert_eq!(source.kind(), SourceKind::Local);
    }

    #[tokio::test]
    async fn resolve_local_path_without_checking() {
        let config = ViewerConfig::default();
        let source = resolve_input("missing.pdf", &config).await.unwrap();
        assert_eq!(source.path(), Path::new("missing.pdf"));
    }

    #[tokio::test]
    async fn resolve_blank_input_is_invalid() {
        let config = ViewerConfig::default();
        let err = resolve_input("   ", &config).await.unwrap_err();
        assert!(matches!(err, ViewerError::InvalidInput { .. }));
    }
}

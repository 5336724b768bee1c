//! Configuration types for rendering PDFs into comparison pages.
//!
//! All rendering behaviour is controlled through [`ViewerConfig`], built via
//! its [`ViewerConfigBuilder`]. One immutable struct is shared (behind an
//! `Arc`) by every request the server handles, so requests never observe
//! each other's settings.

use crate::error::ViewerError;
use std::path::PathBuf;

/// File name of the bundled sample, looked up next to the executable.
pub const SAMPLE_FILE_NAME: &str = "sample.pdf";

/// Default hosted viewer for method 4 (takes a public URL).
pub const DEFAULT_GOOGLE_VIEWER_URL: &str = "https://docs.google.com/viewer";

/// Default hosted viewer for method 5 (takes a `file=` parameter).
pub const DEFAULT_PDFJS_VIEWER_URL: &str = "https://mozilla.github.io/pdf.js/web/viewer.html";

/// Configuration for rendering PDFs.
///
/// Built via [`ViewerConfig::builder()`] or using [`ViewerConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_embed_lab::ViewerConfig;
///
/// let config = ViewerConfig::builder()
///     .frame_height("600px")
///     .download_name("report.pdf")
///     .build()
///     .unwrap();
/// assert_eq!(config.download_name, "report.pdf");
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Sample PDF shown when nothing is uploaded.
    /// Default: `sample.pdf` in the directory of the running executable.
    pub sample_path: Option<PathBuf>,

    /// Directory for per-request transient copies of uploads and downloads.
    /// If None, the OS temp directory is used.
    pub transient_dir: Option<PathBuf>,

    /// CSS height of every embedded frame. Default: `400px`.
    pub frame_height: String,

    /// Base URL of the Google Docs style viewer (method 4).
    pub google_viewer_url: String,

    /// Base URL of the PDF.js viewer (method 5).
    pub pdfjs_viewer_url: String,

    /// File name offered by the download link (method 6). Default: `document.pdf`.
    pub download_name: String,

    /// Title shown in the page heading and `<title>`. Default: `PDF Viewer Test`.
    pub page_title: String,

    /// Largest accepted upload in bytes. Default: 50 MiB.
    ///
    /// Every byte is inlined into the page six times over (as base64), so
    /// very large documents make the browser tab sluggish long before the
    /// server notices.
    pub max_upload_bytes: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sample_path: default_sample_path(),
            transient_dir: None,
            frame_height: "400px".to_string(),
            google_viewer_url: DEFAULT_GOOGLE_VIEWER_URL.to_string(),
            pdfjs_viewer_url: DEFAULT_PDFJS_VIEWER_URL.to_string(),
            download_name: "document.pdf".to_string(),
            page_title: "PDF Viewer Test".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            download_timeout_secs: 120,
        }
    }
}

impl ViewerConfig {
    /// Create a new builder for `ViewerConfig`.
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// `sample.pdf` beside the current executable, if the executable path is known.
pub fn default_sample_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SAMPLE_FILE_NAME)))
}

/// Builder for [`ViewerConfig`].
#[derive(Debug)]
pub struct ViewerConfigBuilder {
    config: ViewerConfig,
}

impl ViewerConfigBuilder {
    pub fn sample_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sample_path = Some(path.into());
        self
    }

    /// Disable the sample fallback entirely.
    pub fn no_sample(mut self) -> Self {
        self.config.sample_path = None;
        self
    }

    pub fn transient_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.transient_dir = Some(dir.into());
        self
    }

    pub fn frame_height(mut self, height: impl Into<String>) -> Self {
        self.config.frame_height = height.into();
        self
    }

    pub fn google_viewer_url(mut self, url: impl Into<String>) -> Self {
        self.config.google_viewer_url = url.into();
        self
    }

    pub fn pdfjs_viewer_url(mut self, url: impl Into<String>) -> Self {
        self.config.pdfjs_viewer_url = url.into();
        self
    }

    pub fn download_name(mut self, name: impl Into<String>) -> Self {
        self.config.download_name = name.into();
        self
    }

    pub fn page_title(mut self, title: impl Into<String>) -> Self {
        self.config.page_title = title.into();
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ViewerConfig, ViewerError> {
        let c = &self.config;
        validate_viewer_url("google_viewer_url", &c.google_viewer_url)?;
        validate_viewer_url("pdfjs_viewer_url", &c.pdfjs_viewer_url)?;

        if c.frame_height.trim().is_empty() || c.frame_height.contains(['"', '\'']) {
            return Err(ViewerError::InvalidConfig(format!(
                "frame height must be a non-empty CSS length, got {:?}",
                c.frame_height
            )));
        }
        if c.download_name.trim().is_empty() {
            return Err(ViewerError::InvalidConfig(
                "download name must not be empty".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(ViewerError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Viewer base URLs are emitted into `src` attributes without escaping, so
/// they must be plain http(s) URLs with no attribute-breaking characters.
fn validate_viewer_url(field: &str, url: &str) -> Result<(), ViewerError> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ViewerError::InvalidConfig(format!(
            "{field} must be an http(s) URL, got {url:?}"
        )));
    }
    if url
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '?' | '#'))
    {
        return Err(ViewerError::InvalidConfig(format!(
            "{field} must not contain quotes, angle brackets, whitespace, a query or a fragment: {url:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_page() {
        let c = ViewerConfig::default();
        assert_eq!(c.frame_height, "400px");
        assert_eq!(c.download_name, "document.pdf");
        assert_eq!(c.page_title, "PDF Viewer Test");
        assert_eq!(c.google_viewer_url, DEFAULT_GOOGLE_VIEWER_URL);
        assert_eq!(c.pdfjs_viewer_url, DEFAULT_PDFJS_VIEWER_URL);
        assert!(c
            .sample_path
            .as_deref()
            .is_some_and(|p| p.ends_with(SAMPLE_FILE_NAME)));
    }

    #[test]
    fn builder_overrides_fields() {
        let c = ViewerConfig::builder()
            .sample_path("/srv/demo.pdf")
            .transient_dir("/tmp/uploads")
            .frame_height("80vh")
            .max_upload_bytes(1024)
            .build()
            .unwrap();
        assert_eq!(c.sample_path.unwrap(), PathBuf::from("/srv/demo.pdf"));
        assert_eq!(c.transient_dir.unwrap(), PathBuf::from("/tmp/uploads"));
        assert_eq!(c.frame_height, "80vh");
        assert_eq!(c.max_upload_bytes, 1024);
    }

    #[test]
    fn no_sample_clears_path() {
        let c = ViewerConfig::builder().no_sample().build().unwrap();
        assert!(c.sample_path.is_none());
    }

    #[test]
    fn rejects_non_http_viewer() {
        let err = ViewerConfig::builder()
            .pdfjs_viewer_url("javascript:alert(1)")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("pdfjs_viewer_url"), "got: {err}");
    }

    #[test]
    fn rejects_viewer_with_quote() {
        assert!(ViewerConfig::builder()
            .google_viewer_url("https://example.com/\"onload=x")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_empty_download_name_and_zero_limit() {
        assert!(ViewerConfig::builder().download_name("  ").build().is_err());
        assert!(ViewerConfig::builder().max_upload_bytes(0).build().is_err());
        assert!(ViewerConfig::builder().frame_height("").build().is_err());
    }
}

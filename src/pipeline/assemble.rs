//! Fragment assembly: one encoded payload → six independent HTML boxes.
//!
//! Each [`RenderMethod`] is a different way of asking the browser to show
//! the same bytes. Fragments never depend on one another, so any subset can
//! be rendered or dropped without touching the rest.
//!
//! ## Trust boundary
//!
//! Only values this crate computes itself are written unescaped: the base64
//! data URI and the percent-encoded hosted-viewer URLs. File paths, error
//! messages and configured labels go through askama's HTML escaping.

use crate::config::ViewerConfig;
use crate::error::AssemblyError;
use crate::pipeline::encode::{read_payload, EncodedPayload};
use askama::Template;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Characters left as-is inside a query parameter value (RFC 3986 unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Fixed markup returned when the PDF path does not exist.
pub const NOT_FOUND_HTML: &str = "<p>PDF file not found</p>";

/// The six embedding techniques, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMethod {
    /// `<embed>` with a base64 data URI.
    DirectEmbed,
    /// `<object>` with a nested `<embed>` for browsers without `<object>` support.
    ObjectFallback,
    /// `<iframe>` with a base64 data URI.
    IFrame,
    /// Google Docs hosted viewer, given the source location.
    /// Only works when that location is a publicly reachable URL.
    GoogleViewer,
    /// Mozilla's hosted PDF.js viewer, given the whole data URI.
    PdfJsViewer,
    /// Anchor offering the data URI as a download.
    DownloadLink,
}

impl RenderMethod {
    pub const ALL: [RenderMethod; 6] = [
        RenderMethod::DirectEmbed,
        RenderMethod::ObjectFallback,
        RenderMethod::IFrame,
        RenderMethod::GoogleViewer,
        RenderMethod::PdfJsViewer,
        RenderMethod::DownloadLink,
    ];

    /// 1-based position on the page.
    pub fn number(self) -> u8 {
        match self {
            RenderMethod::DirectEmbed => 1,
            RenderMethod::ObjectFallback => 2,
            RenderMethod::IFrame => 3,
            RenderMethod::GoogleViewer => 4,
            RenderMethod::PdfJsViewer => 5,
            RenderMethod::DownloadLink => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RenderMethod::DirectEmbed => "Direct Base64 Embed",
            RenderMethod::ObjectFallback => "Object Tag with Embed Fallback",
            RenderMethod::IFrame => "IFrame",
            RenderMethod::GoogleViewer => "Google Docs Viewer",
            RenderMethod::PdfJsViewer => "PDF.js Viewer",
            RenderMethod::DownloadLink => "Download Link",
        }
    }

    /// Whether the viewing browser must reach a third-party host.
    pub fn needs_network(self) -> bool {
        matches!(self, RenderMethod::GoogleViewer | RenderMethod::PdfJsViewer)
    }
}

/// One labelled box of markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFragment {
    pub method: RenderMethod,
    pub html: String,
}

/// All six fragments for one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentSet {
    pub fragments: Vec<RenderFragment>,
    /// Length of the base64 payload shared by the fragments.
    pub payload_len: usize,
}

impl FragmentSet {
    /// Join the fragments into the vertical column shown on the page.
    pub fn to_html(&self) -> Result<String, AssemblyError> {
        Ok(FragmentColumnTemplate {
            fragments: &self.fragments,
        }
        .render()?)
    }

    pub fn get(&self, method: RenderMethod) -> Option<&RenderFragment> {
        self.fragments.iter().find(|f| f.method == method)
    }
}

#[derive(Template)]
#[template(path = "fragment.html")]
struct FragmentTemplate<'a> {
    method: RenderMethod,
    data_uri: &'a str,
    google_src: &'a str,
    pdfjs_src: &'a str,
    height: &'a str,
    download_name: &'a str,
}

#[derive(Template)]
#[template(path = "fragments.html")]
struct FragmentColumnTemplate<'a> {
    fragments: &'a [RenderFragment],
}

#[derive(Template)]
#[template(path = "message.html")]
struct MessageTemplate<'a> {
    prefix: &'a str,
    message: &'a str,
}

/// `{base}?url={location}&embedded=true`
pub fn google_viewer_src(base: &str, location: &str) -> String {
    format!(
        "{base}?url={}&embedded=true",
        utf8_percent_encode(location, QUERY_VALUE)
    )
}

/// `{base}?file={data_uri}`
pub fn pdfjs_viewer_src(base: &str, data_uri: &str) -> String {
    format!("{base}?file={}", utf8_percent_encode(data_uri, QUERY_VALUE))
}

/// Build the six fragments around an already encoded payload.
pub fn build_fragments(
    payload: &EncodedPayload,
    viewer_location: &str,
    config: &ViewerConfig,
) -> Result<FragmentSet, AssemblyError> {
    let data_uri = payload.data_uri();
    let google_src = google_viewer_src(&config.google_viewer_url, viewer_location);
    let pdfjs_src = pdfjs_viewer_src(&config.pdfjs_viewer_url, &data_uri);

    let fragments = RenderMethod::ALL
        .iter()
        .map(|&method| {
            let html = FragmentTemplate {
                method,
                data_uri: &data_uri,
                google_src: &google_src,
                pdfjs_src: &pdfjs_src,
                height: &config.frame_height,
                download_name: &config.download_name,
            }
            .render()?;
            Ok(RenderFragment { method, html })
        })
        .collect::<Result<Vec<_>, AssemblyError>>()?;

    Ok(FragmentSet {
        fragments,
        payload_len: payload.len(),
    })
}

/// Read `path`, encode it and build all six fragments.
///
/// `viewer_location` is what method 4 passes to the hosted viewer; for
/// local files it is just the path.
pub fn assemble(
    path: &Path,
    viewer_location: &str,
    config: &ViewerConfig,
) -> Result<FragmentSet, AssemblyError> {
    let (payload, byte_len) = read_payload(path)?;
    debug!("Assembling fragments for {} ({} bytes)", path.display(), byte_len);
    build_fragments(&payload, viewer_location, config)
}

/// Markup shown in place of the fragments when assembly fails.
pub fn failure_html(err: &AssemblyError) -> String {
    if err.is_not_found() {
        return NOT_FOUND_HTML.to_string();
    }
    let message = err.to_string();
    MessageTemplate {
        prefix: "Error loading PDF: ",
        message: &message,
    }
    .render()
    .map(|html| html.trim_end().to_string())
    .unwrap_or_else(|_| "<p>Error loading PDF</p>".to_string())
}

/// Infallible wrapper: fragments on success, otherwise the not-found or
/// error paragraph. No error propagates past this function.
pub fn embed_pdf_html(path: &Path, viewer_location: &str, config: &ViewerConfig) -> String {
    match assemble(path, viewer_location, config).and_then(|set| set.to_html()) {
        Ok(html) => html,
        Err(e) => {
            warn!("Could not assemble {}: {}", path.display(), e);
            failure_html(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PDFJS_VIEWER_URL;
    use crate::pipeline::encode::encode_pdf;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use percent_encoding::percent_decode_str;

    const SAMPLE: &[u8] = b"%PDF-1.4 test";
    const SAMPLE_B64: &str = "JVBERi0xLjQgdGVzdA==";

    fn fragments_for(bytes: &[u8]) -> FragmentSet {
        build_fragments(&encode_pdf(bytes), "upload.pdf", &ViewerConfig::default()).unwrap()
    }

    /// Text between `marker` and the next `"`.
    fn attr_after<'a>(html: &'a str, marker: &str) -> &'a str {
        let start = html.find(marker).expect("marker present") + marker.len();
        let end = html[start..].find('"').expect("closing quote");
        &html[start..start + end]
    }

    #[test]
    fn six_fragments_in_order() {
        let set = fragments_for(SAMPLE);
        let numbers: Vec<u8> = set.fragments.iter().map(|f| f.method.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        for f in &set.fragments {
            assert!(
                f.html.contains(&format!("Method {}: ", f.method.number())),
                "{:?} missing heading",
                f.method
            );
        }
    }

    #[test]
    fn known_payload_appears_verbatim() {
        let set = fragments_for(SAMPLE);
        let uri = format!("data:application/pdf;base64,{SAMPLE_B64}");

        let embed = &set.get(RenderMethod::DirectEmbed).unwrap().html;
        assert_eq!(attr_after(embed, "<embed src=\""), uri);

        let iframe = &set.get(RenderMethod::IFrame).unwrap().html;
        assert_eq!(attr_after(iframe, "<iframe src=\""), uri);

        let link = &set.get(RenderMethod::DownloadLink).unwrap().html;
        assert_eq!(attr_after(link, "<a href=\""), uri);
        assert!(link.contains("download=\"document.pdf\""));
    }

    #[test]
    fn payload_round_trips_through_each_data_fragment() {
        let bytes: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        let set = fragments_for(&bytes);
        let prefix = "data:application/pdf;base64,";

        let extracted = [
            attr_after(&set.get(RenderMethod::DirectEmbed).unwrap().html, "<embed src=\"").to_string(),
            attr_after(&set.get(RenderMethod::ObjectFallback).unwrap().html, "<object data=\"").to_string(),
            attr_after(&set.get(RenderMethod::IFrame).unwrap().html, "<iframe src=\"").to_string(),
            percent_decode_str(attr_after(
                &set.get(RenderMethod::PdfJsViewer).unwrap().html,
                "?file=",
            ))
            .decode_utf8()
            .unwrap()
            .into_owned(),
            attr_after(&set.get(RenderMethod::DownloadLink).unwrap().html, "<a href=\"").to_string(),
        ];

        for uri in extracted {
            let b64 = uri.strip_prefix(prefix).expect("data URI prefix");
            assert_eq!(STANDARD.decode(b64).unwrap(), bytes);
        }
    }

    #[test]
    fn object_fragment_nests_embed_fallback() {
        let set = fragments_for(SAMPLE);
        let html = &set.get(RenderMethod::ObjectFallback).unwrap().html;
        let object_at = html.find("<object").unwrap();
        let embed_at = html.find("<embed").unwrap();
        let close_at = html.find("</object>").unwrap();
        assert!(object_at < embed_at && embed_at < close_at);
        assert_eq!(html.matches(SAMPLE_B64).count(), 2);
    }

    #[test]
    fn google_viewer_gets_location_not_payload() {
        let set = build_fragments(
            &encode_pdf(SAMPLE),
            "https://example.com/a b.pdf",
            &ViewerConfig::default(),
        )
        .unwrap();
        let html = &set.get(RenderMethod::GoogleViewer).unwrap().html;
        assert!(html.contains(
            "https://docs.google.com/viewer?url=https%3A%2F%2Fexample.com%2Fa%20b.pdf&embedded=true"
        ));
        assert!(!html.contains(SAMPLE_B64));
    }

    #[test]
    fn pdfjs_parameter_is_percent_encoded() {
        let src = pdfjs_viewer_src(DEFAULT_PDFJS_VIEWER_URL, "data:application/pdf;base64,a+b/c=");
        assert_eq!(
            src,
            "https://mozilla.github.io/pdf.js/web/viewer.html?file=data%3Aapplication%2Fpdf%3Bbase64%2Ca%2Bb%2Fc%3D"
        );
    }

    #[test]
    fn config_controls_height_and_download_name() {
        let config = ViewerConfig::builder()
            .frame_height("75vh")
            .download_name("x.pdf")
            .build()
            .unwrap();
        let set = build_fragments(&encode_pdf(SAMPLE), "p", &config).unwrap();
        assert!(set.fragments[..5]
            .iter()
            .all(|f| f.html.contains("height=\"75vh\"")));
        assert!(set.fragments[5].html.contains("download=\"x.pdf\""));
    }

    #[test]
    fn missing_path_gives_fixed_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let html = embed_pdf_html(&dir.path().join("gone.pdf"), "gone.pdf", &ViewerConfig::default());
        assert_eq!(html, NOT_FOUND_HTML);
        assert!(!html.contains("base64"));
    }

    #[test]
    fn read_failure_gives_error_paragraph() {
        // Reading a directory fails with an error other than NotFound.
        let dir = tempfile::tempdir().unwrap();
        let io_text = std::fs::read(dir.path()).unwrap_err().to_string();
        let html = embed_pdf_html(dir.path(), "dir", &ViewerConfig::default());
        assert!(html.starts_with("<p>Error loading PDF: "), "got: {html}");
        assert!(html.contains(&io_text), "missing {io_text:?} in {html}");
        assert!(html.ends_with("</p>"));
        assert!(!html.contains("base64"));
    }

    #[test]
    fn permission_denied_keeps_os_error_text() {
        let io = std::io::Error::from_raw_os_error(13);
        let io_text = io.to_string();
        let html = failure_html(&AssemblyError::from_io("/srv/locked.pdf", io));
        assert!(html.starts_with("<p>Error loading PDF: Permission denied reading "));
        assert!(html.contains(&io_text), "missing {io_text:?} in {html}");
    }

    #[test]
    fn error_message_is_escaped() {
        let err = AssemblyError::Template("<script>alert(1)</script>".into());
        let html = failure_html(&err);
        assert!(!html.contains("<script>"), "got: {html}");
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn column_wraps_all_fragments() {
        let set = fragments_for(SAMPLE);
        let html = set.to_html().unwrap();
        assert!(html.starts_with("<div style=\"display:flex; flex-direction:column; gap:20px;\">"));
        assert_eq!(html.matches("<h5>Method ").count(), 6);
    }

    #[test]
    fn only_hosted_viewers_need_network() {
        let networked: Vec<_> = RenderMethod::ALL
            .into_iter()
            .filter(|m| m.needs_network())
            .collect();
        assert_eq!(networked, vec![RenderMethod::GoogleViewer, RenderMethod::PdfJsViewer]);
    }

    #[test]
    fn hosted_viewer_headings_carry_network_note() {
        let set = fragments_for(SAMPLE);
        for fragment in &set.fragments {
            let noted = fragment.html.contains("(loads from a third-party host)");
            assert_eq!(
                noted,
                fragment.method.needs_network(),
                "method {} heading",
                fragment.method.number()
            );
        }
        let pdfjs = set.get(RenderMethod::PdfJsViewer).unwrap();
        assert!(pdfjs.html.contains(
            "<h5>Method 5: PDF.js Viewer <small>(loads from a third-party host)</small></h5>"
        ));
    }
}

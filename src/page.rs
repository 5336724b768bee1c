//! The full HTML document around the fragment column.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::output::{RenderedView, ViewOutcome};
use askama::Template;

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    interactive: bool,
    content: Option<&'a RenderedView>,
}

/// Render a complete page for `outcome`.
///
/// `interactive` adds the upload form; the CLI writes static pages without it.
/// When there is nothing to show the page carries the upload prompt instead
/// of fragments.
pub fn render_page(
    outcome: &ViewOutcome,
    config: &ViewerConfig,
    interactive: bool,
) -> Result<String, ViewerError> {
    Ok(PageTemplate {
        title: &config.page_title,
        interactive,
        content: outcome.view(),
    }
    .render()?)
}

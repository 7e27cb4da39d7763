//! Curated list document and link extraction.
//!
//! The Markdown list is rendered to HTML and the first anchor of every list
//! item is taken as that entry's link, in document order.

use std::path::Path;
use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use scraper::{Html, Selector};

use crate::error::AuditError;

static ENTRY_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body li > a:first-child")
        .expect("entry link selector is valid")
});

/// A parsed curated list.
pub struct Document {
    html: Html,
}

impl Document {
    /// Reads a Markdown file and parses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, AuditError> {
        let markdown = std::fs::read_to_string(path).map_err(|source| AuditError::ReadDocument {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_markdown(&markdown))
    }

    /// Renders Markdown to HTML and parses the result.
    #[must_use]
    pub fn from_markdown(markdown: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut rendered, Parser::new_ext(markdown, options));
        Self::from_html(&rendered)
    }

    /// Parses an already rendered HTML document.
    #[must_use]
    pub fn from_html(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Yields the `href` of the leading anchor of each list item.
    ///
    /// Anchors without an `href` are skipped with a warning. Calling this
    /// again starts over from the top of the document.
    pub fn links(&self) -> impl Iterator<Item = String> + '_ {
        self.html.select(&ENTRY_LINK).filter_map(|anchor| {
            let href = anchor.value().attr("href");
            if href.is_none() {
                let text = anchor.text().collect::<String>();
                tracing::warn!(text = %text.trim(), "list entry anchor has no href");
            }
            href.map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "\
# Awesome

- [Contents](#contents)

## Tools

- [alpha](https://github.com/acme/alpha) - Does alpha things.
- [beta](https://github.com/acme/beta) - Beta, see [docs](https://beta.dev).
- Plain entry without a link.
  - [nested](https://github.com/acme/nested) - Nested entry.
";

    #[test]
    fn extracts_leading_links_in_order() {
        let doc = Document::from_markdown(LIST);
        let links: Vec<String> = doc.links().collect();
        assert_eq!(
            links,
            vec![
                "#contents",
                "https://github.com/acme/alpha",
                "https://github.com/acme/beta",
                "https://github.com/acme/nested",
            ]
        );
    }

    #[test]
    fn links_restart_from_the_top() {
        let doc = Document::from_markdown(LIST);
        assert_eq!(doc.links().next(), doc.links().next());
        assert_eq!(doc.links().count(), 4);
    }

    #[test]
    fn anchors_without_href_are_skipped() {
        let html = "<ul><li><a name=\"x\">x</a></li>\
                    <li><a href=\"https://github.com/a/b\">b</a></li></ul>";
        let doc = Document::from_html(html);
        let links: Vec<String> = doc.links().collect();
        assert_eq!(links, vec!["https://github.com/a/b"]);
    }

    #[test]
    fn anchor_after_text_is_not_a_leading_link() {
        let html = r#"<ul><li><b>x</b><a href="https://github.com/a/b">b</a></li></ul>"#;
        let doc = Document::from_html(html);
        assert_eq!(doc.links().count(), 0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = Document::load(Path::new("/nonexistent/stale-audit/README.md"));
        assert!(matches!(result, Err(AuditError::ReadDocument { .. })));
    }
}

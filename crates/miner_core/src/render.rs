use crate::filename::{slugify, story_filename};
use crate::html::escape_html;
use crate::{Document, StoryRecord};

/// Index page every story links back to.
pub const INDEX_FILENAME: &str = "index.html";
/// Abstracts longer than this many characters are cut and marked.
pub const SUMMARY_MAX_CHARS: usize = 500;

const HEADLINE_PREFIX: &str = "Federal Register: ";
const TRUNCATION_MARKER: &str = "...";
const FALLBACK_AGENCY: &str = "Federal Government";

/// Renderer output: the index record plus the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStory {
    pub record: StoryRecord,
    pub html: String,
}

/// Turns a document into a publishable page. Implementations must be pure:
/// the same document and number always produce the same output.
pub trait StoryRenderer: Send + Sync {
    fn render(&self, document: &Document, number: u64) -> RenderedStory;
}

/// Self-contained static HTML page per story.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlStoryRenderer;

impl StoryRenderer for HtmlStoryRenderer {
    fn render(&self, document: &Document, number: u64) -> RenderedStory {
        let headline = headline(document);
        let filename = story_filename(number, &slugify(&document.title));
        let html = build_page(document, &headline);
        RenderedStory {
            record: StoryRecord {
                number,
                filename,
                headline,
            },
            html,
        }
    }
}

pub fn headline(document: &Document) -> String {
    format!("{HEADLINE_PREFIX}{}", document.title)
}

/// The abstract, cut to [`SUMMARY_MAX_CHARS`], or a generated sentence naming
/// the document type and agencies when there is no abstract.
pub fn summary(document: &Document) -> String {
    match document.abstract_text.as_deref() {
        Some(text) if text.chars().count() > SUMMARY_MAX_CHARS => {
            let cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
            format!("{cut}{TRUNCATION_MARKER}")
        }
        Some(text) => text.to_string(),
        None => format!(
            "The Federal Register has published a new {} from {}.",
            document.doc_type,
            agency_line(document)
        ),
    }
}

fn agency_line(document: &Document) -> String {
    if document.agencies.is_empty() {
        FALLBACK_AGENCY.to_string()
    } else {
        document.agencies.join(", ")
    }
}

fn build_page(document: &Document, headline: &str) -> String {
    let headline = escape_html(headline);
    let summary = escape_html(&summary(document));
    let doc_type = escape_html(&document.doc_type);
    let agencies = escape_html(&agency_line(document));
    let number = escape_html(&document.document_number);
    let date = escape_html(&document.publication_date);
    let url = escape_html(&document.canonical_url);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>BREAKING: {headline}</title>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Georgia, serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
        h1 {{ border-bottom: 2px solid #333; }}
        .breaking {{ background: #fff3cd; border-left: 4px solid #dc3545; padding: 15px; }}
        .source {{ background: #f8f9fa; padding: 10px; margin-top: 20px; font-size: 0.9em; }}
        .timestamp {{ color: #666; }}
    </style>
</head>
<body>
    <h1>BREAKING: {headline}</h1>
    <p class="timestamp">Published: {date} | Source: Federal Register</p>
    <div class="breaking">
        <p><strong>{summary}</strong></p>
    </div>
    <h2>Document Details</h2>
    <p><strong>Document Type:</strong> {doc_type}</p>
    <p><strong>Agency:</strong> {agencies}</p>
    <p><strong>Document Number:</strong> {number}</p>
    <p><strong>Publication Date:</strong> {date}</p>
    <h2>Official Source</h2>
    <p>Read the full document at: <a href="{url}">{url}</a></p>
    <div class="source"><strong>Source:</strong> Federal Register - {number}</div>
    <p><a href="{INDEX_FILENAME}">&larr; Back to Breaking News Wire</a></p>
</body>
</html>
"#
    )
}

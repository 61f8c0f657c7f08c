use crate::html::escape_html;
use crate::StoryRecord;

/// New entries are inserted directly after this marker.
pub const STORIES_ANCHOR: &str = r#"<ul id="stories">"#;

/// Skeleton used when no index exists yet.
pub const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Breaking News Wire</title>
    <meta charset="UTF-8">
    <style>
        body { font-family: Georgia, serif; max-width: 900px; margin: 0 auto; padding: 20px; }
        h1 { border-bottom: 3px solid #dc3545; }
        ul { list-style-type: none; padding: 0; }
        li { padding: 10px; border-bottom: 1px solid #eee; }
        a { color: #333; text-decoration: none; }
        a:hover { color: #dc3545; }
    </style>
</head>
<body>
    <h1>Breaking News Wire</h1>
    <ul id="stories">
    </ul>
</body>
</html>
"#;

const BODY_CLOSE: &str = "</body>";

/// One `<li>` line for the index, including its leading newline and indent.
pub fn index_entry(record: &StoryRecord) -> String {
    format!(
        "\n        <li><a href=\"{}\">{}</a></li>",
        escape_html(&record.filename),
        escape_html(&record.headline)
    )
}

/// Inserts `entries`, in order, right after [`STORIES_ANCHOR`].
///
/// Everything before and after the anchor is kept verbatim. An index without
/// the anchor gets a fresh anchored list before `</body>` (or at the end), so
/// entries are never silently dropped.
pub fn append_entries(existing: Option<&str>, entries: &[StoryRecord]) -> String {
    let mut content = existing.unwrap_or(DEFAULT_INDEX).to_string();
    if entries.is_empty() {
        return content;
    }

    let links: String = entries.iter().map(index_entry).collect();

    match content.find(STORIES_ANCHOR) {
        Some(pos) => {
            content.insert_str(pos + STORIES_ANCHOR.len(), &links);
        }
        None => {
            let block = format!("    {STORIES_ANCHOR}{links}\n    </ul>\n");
            match content.rfind(BODY_CLOSE) {
                Some(pos) => content.insert_str(pos, &block),
                None => {
                    if !content.is_empty() && !content.ends_with('\n') {
                        content.push('\n');
                    }
                    content.push_str(&block);
                }
            }
        }
    }
    content
}

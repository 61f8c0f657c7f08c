use thiserror::Error;

/// Maximum slug length in characters.
pub const SLUG_MAX_LEN: usize = 50;

const STORY_PREFIX: &str = "story-";
const STORY_SOURCE_TAG: &str = "fr";
const STORY_EXTENSION: &str = ".html";
const EMPTY_SLUG: &str = "untitled";

/// No sequence number is left above `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("story sequence exhausted: nothing follows {last}")]
pub struct SequenceExhausted {
    pub last: u64,
}

/// URL-safe slug: `[a-z0-9]` runs joined by single hyphens, at most
/// [`SLUG_MAX_LEN`] characters.
///
/// Characters outside `a-z`, `0-9`, whitespace and `-` are removed without
/// acting as separators, so `"don't"` becomes `"dont"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    // Only ASCII survives the filter, so byte truncation is char-safe.
    slug.truncate(SLUG_MAX_LEN);
    let trimmed_len = slug.trim_end_matches('-').len();
    slug.truncate(trimmed_len);

    if slug.is_empty() {
        slug.push_str(EMPTY_SLUG);
    }
    slug
}

/// Deterministic artifact name: `story-{number:03}-fr-{slug}.html`.
pub fn story_filename(number: u64, slug: &str) -> String {
    format!("{STORY_PREFIX}{number:03}-{STORY_SOURCE_TAG}-{slug}{STORY_EXTENSION}")
}

/// Extracts the sequence number embedded in a story artifact name.
///
/// Any `story-<digits>...html` file counts, not only ones produced by this
/// miner, so hand-written stories still reserve their numbers. A digit run too
/// long for `u64` reads as `u64::MAX`, which leaves no number to allocate.
pub fn parse_story_number(filename: &str) -> Option<u64> {
    if !filename.ends_with(STORY_EXTENSION) {
        return None;
    }
    let rest = filename.strip_prefix(STORY_PREFIX)?;
    let digits_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_len == 0 {
        return None;
    }
    // Only overflow can fail on an all-digit run.
    Some(rest[..digits_len].parse().unwrap_or(u64::MAX))
}

/// Next free sequence number given the names present in the output directory:
/// one past the highest embedded number, or 1 when there are none.
pub fn next_sequence_number<I, S>(names: I) -> Result<u64, SequenceExhausted>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match names
        .into_iter()
        .filter_map(|name| parse_story_number(name.as_ref()))
        .max()
    {
        Some(last) => last.checked_add(1).ok_or(SequenceExhausted { last }),
        None => Ok(1),
    }
}

//! Miner core: document model, publication ledger and pure rendering helpers.
mod document;
mod filename;
mod html;
mod index;
mod render;
mod state;

pub use document::{Document, DocumentPage};
pub use filename::{
    next_sequence_number, parse_story_number, slugify, story_filename, SequenceExhausted,
    SLUG_MAX_LEN,
};
pub use index::{append_entries, index_entry, DEFAULT_INDEX, STORIES_ANCHOR};
pub use render::{
    headline, summary, HtmlStoryRenderer, RenderedStory, StoryRenderer, INDEX_FILENAME,
    SUMMARY_MAX_CHARS,
};
pub use state::{
    reconcile_sequence, Ledger, PublicationState, StoryRecord, DEFAULT_FIRST_STORY_NUM,
};

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use miner_core::{Document, DocumentPage};
use miner_engine::{
    DocumentSource, FailureKind, FetchError, MinerSettings, PageQuery, PublishError, Publisher,
};

pub fn init_logging() {
    miner_logging::initialize_for_tests();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn doc(number: &str) -> Document {
    Document {
        document_number: number.to_string(),
        title: format!("Notice of Meeting {number}"),
        doc_type: "Notice".to_string(),
        abstract_text: None,
        publication_date: "2024-03-15".to_string(),
        canonical_url: format!("https://www.federalregister.gov/d/{number}"),
        agencies: vec!["Department of Energy".to_string()],
    }
}

pub fn docs(prefix: &str, count: usize) -> Vec<Document> {
    (0..count).map(|i| doc(&format!("{prefix}-{i:04}"))).collect()
}

pub fn settings(dir: &Path, per_page: u32) -> MinerSettings {
    MinerSettings {
        per_page,
        page_delay: Duration::ZERO,
        ..MinerSettings::default_with_output(dir.to_path_buf())
    }
}

/// In-memory upstream keyed by (date, page). Unknown keys return an empty page.
#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<(Option<NaiveDate>, u32), Result<DocumentPage, FetchError>>,
    calls: Mutex<Vec<PageQuery>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `documents` into pages of `per_page`, all reporting the same
    /// `total_pages`.
    pub fn with_date(mut self, date: NaiveDate, documents: Vec<Document>, per_page: usize) -> Self {
        let chunks: Vec<Vec<Document>> = documents.chunks(per_page).map(<[_]>::to_vec).collect();
        let total_pages = chunks.len().max(1) as u32;
        for (i, chunk) in chunks.into_iter().enumerate() {
            self.pages.insert(
                (Some(date), i as u32 + 1),
                Ok(DocumentPage {
                    results: chunk,
                    total_pages,
                }),
            );
        }
        self
    }

    pub fn with_page(mut self, date: NaiveDate, page: u32, result: DocumentPage) -> Self {
        self.pages.insert((Some(date), page), Ok(result));
        self
    }

    pub fn failing_at(mut self, date: NaiveDate, page: u32) -> Self {
        self.pages.insert(
            (Some(date), page),
            Err(FetchError::new(FailureKind::HttpStatus(503), "503 Service Unavailable")),
        );
        self
    }

    pub fn calls(&self) -> Vec<PageQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DocumentSource for ScriptedSource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<DocumentPage, FetchError> {
        self.calls.lock().unwrap().push(*query);
        self.pages
            .get(&(query.date, query.page))
            .cloned()
            .unwrap_or(Ok(DocumentPage {
                results: Vec::new(),
                total_pages: 1,
            }))
    }
}

/// Records publish messages; optionally fails every call.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, message: &str) -> Result<(), PublishError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(PublishError::Failed {
                step: "git push".to_string(),
                code: Some(1),
                stderr: "remote rejected".to_string(),
            });
        }
        Ok(())
    }
}

pub fn story_files(dir: &Path) -> Vec<String> {
    miner_engine::list_file_names(dir)
        .unwrap()
        .into_iter()
        .filter(|name| name.starts_with("story-"))
        .collect()
}

use serde::Deserialize;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_TYPE: &str = "Document";

/// One upstream document record, normalised from the API's loosely typed JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    /// Stable upstream identifier; the ledger key.
    pub document_number: String,
    pub title: String,
    pub doc_type: String,
    pub abstract_text: Option<String>,
    pub publication_date: String,
    pub canonical_url: String,
    pub agencies: Vec<String>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPage")]
pub struct DocumentPage {
    pub results: Vec<Document>,
    pub total_pages: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    document_number: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    doc_type: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    publication_date: Option<String>,
    html_url: Option<String>,
    agencies: Option<Vec<RawAgency>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAgency {
    name: Option<String>,
    raw_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPage {
    results: Option<Vec<Document>>,
    total_pages: Option<u32>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let agencies = raw
            .agencies
            .unwrap_or_default()
            .into_iter()
            .filter_map(|agency| {
                agency
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .or(agency.raw_name)
                    .filter(|name| !name.trim().is_empty())
            })
            .collect();

        Self {
            document_number: raw.document_number.unwrap_or_default(),
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            doc_type: raw.doc_type.unwrap_or_else(|| DEFAULT_TYPE.to_string()),
            abstract_text: raw.abstract_text.filter(|text| !text.is_empty()),
            publication_date: raw.publication_date.unwrap_or_default(),
            canonical_url: raw.html_url.unwrap_or_default(),
            agencies,
        }
    }
}

impl From<RawPage> for DocumentPage {
    fn from(raw: RawPage) -> Self {
        Self {
            results: raw.results.unwrap_or_default(),
            total_pages: raw.total_pages.unwrap_or(1),
        }
    }
}

use std::time::Duration;

use chrono::NaiveDate;
use futures_util::StreamExt;
use miner_core::DocumentPage;
use miner_logging::miner_debug;
use reqwest::Url;

use crate::{FailureKind, FetchError};

/// Federal Register document search endpoint.
pub const DEFAULT_API_BASE: &str = "https://www.federalregister.gov/api/v1/documents.json";

const DATE_FILTER_PARAM: &str = "conditions[publication_date][is]";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

/// One page request: newest-first ordering is fixed, the date filter is
/// optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub date: Option<NaiveDate>,
    pub page: u32,
    pub per_page: u32,
}

/// Paginated upstream document listing.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<DocumentPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FederalRegisterFetcher {
    client: reqwest::Client,
    base_url: Url,
    max_bytes: u64,
}

impl FederalRegisterFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.api_base)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(concat!("miner_engine/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn page_url(&self, query: &PageQuery) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("per_page", &query.per_page.to_string())
                .append_pair("page", &query.page.to_string())
                .append_pair("order", "newest");
            if let Some(date) = query.date {
                pairs.append_pair(DATE_FILTER_PARAM, &date.format("%Y-%m-%d").to_string());
            }
        }
        url
    }

    async fn read_capped_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(too_large(self.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(too_large(self.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl DocumentSource for FederalRegisterFetcher {
    async fn fetch_page(&self, query: &PageQuery) -> Result<DocumentPage, FetchError> {
        let url = self.page_url(query);
        miner_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_capped_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedPayload, err.to_string()))
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

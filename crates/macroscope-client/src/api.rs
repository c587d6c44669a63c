use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::schema::{search_results, BondPoint, SearchBatch, SearchResult, SearchStarted};
use crate::search::SearchBackend;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, trace};
use url::Url;

/// Parameterless endpoints that each return a whole dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    Overview,
    Dashboard,
    Sentiment,
    Breadth,
    All,
}

/// Typed access to the dashboard backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::ClientBuilder::new().timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let http = builder.build().map_err(|source| ClientError::Network {
            endpoint: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` + path segments + query, with every piece percent-encoded.
    pub fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("bad base url {:?}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("base url {:?} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        let endpoint = url.path().to_string();
        trace!("{method} {url}");

        let response = self
            .http
            .request(method, url.clone())
            .send()
            .await
            .map_err(|source| {
                error!("{endpoint} request failed: {source}\nURL: {url}");
                ClientError::Network {
                    endpoint: endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("{endpoint} answered {status}\nURL: {url}");
            return Err(ClientError::Status { endpoint, status });
        }

        let body = response.bytes().await.map_err(|source| {
            error!("{endpoint} body read failed: {source}");
            ClientError::Network {
                endpoint: endpoint.clone(),
                source,
            }
        })?;

        serde_json::from_slice::<T>(&body).map_err(|e| {
            error!("{endpoint} deserialization error: {e}\nURL: {url}");
            ClientError::MalformedData {
                endpoint,
                reason: e.to_string(),
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(segments, query)?;
        self.request(Method::GET, url).await
    }

    //////////////////////////////////////////////////////////////////////////////////////
    // market & macro

    /// `category` may list several groups, e.g. `"commodities,crypto"`.
    pub async fn market(&self, category: Option<&str>, dashboard: bool) -> Result<Value> {
        let query = filter_query("category", category, dashboard);
        self.get(&["market"], &query).await
    }

    pub async fn macro_data(&self, country: Option<&str>, dashboard: bool) -> Result<Value> {
        let query = filter_query("country", country, dashboard);
        self.get(&["macro"], &query).await
    }

    pub async fn sentiment(&self) -> Result<Value> {
        self.get(&["sentiment"], &[]).await
    }

    pub async fn breadth(&self) -> Result<Value> {
        self.get(&["breadth"], &[]).await
    }

    pub async fn overview(&self) -> Result<Value> {
        self.get(&["overview"], &[]).await
    }

    pub async fn dashboard(&self) -> Result<Value> {
        self.get(&["dashboard"], &[]).await
    }

    pub async fn all(&self) -> Result<Value> {
        self.get(&["all"], &[]).await
    }

    pub async fn summary(&self, which: Summary) -> Result<Value> {
        match which {
            Summary::Overview => self.overview().await,
            Summary::Dashboard => self.dashboard().await,
            Summary::Sentiment => self.sentiment().await,
            Summary::Breadth => self.breadth().await,
            Summary::All => self.all().await,
        }
    }

    //////////////////////////////////////////////////////////////////////////////////////
    // stocks

    pub async fn stocks(&self, symbols: &[&str]) -> Result<Value> {
        let joined = symbols.join(",");
        if joined.is_empty() {
            self.get(&["stocks"], &[]).await
        } else {
            self.get(&["stocks"], &[("symbols", joined.as_str())]).await
        }
    }

    pub async fn ticker(&self, symbol: &str) -> Result<Value> {
        self.get(&["ticker", symbol], &[]).await
    }

    /// One-shot, non-polling search.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let limit = limit.to_string();
        let payload: Value = self
            .get(&["search"], &[("query", query), ("limit", limit.as_str())])
            .await?;
        Ok(search_results(payload))
    }

    pub async fn bond_history(&self, symbol: &str) -> Result<Vec<BondPoint>> {
        self.get(&["bond_history", symbol], &[]).await
    }

    //////////////////////////////////////////////////////////////////////////////////////
    // housekeeping

    /// Ask the backend to refresh all of its data files.
    pub async fn update(&self) -> Result<Value> {
        let url = self.url(&["update"], &[])?;
        self.request(Method::POST, url).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get(&["health"], &[]).await
    }
}

fn filter_query<'a>(key: &'a str, value: Option<&'a str>, dashboard: bool) -> Vec<(&'a str, &'a str)> {
    let mut query = Vec::new();
    if let Some(value) = value {
        query.push((key, value));
    }
    if dashboard {
        query.push(("dashboard", "true"));
    }
    query
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn start_search(&self, query: &str, limit: usize) -> Result<String> {
        let limit = limit.to_string();
        let started: SearchStarted = self
            .get(&["search", "start"], &[("query", query), ("limit", limit.as_str())])
            .await?;
        Ok(started.search_id)
    }

    async fn poll_once(&self, search_id: &str) -> Result<SearchBatch> {
        self.get(&["search", "results"], &[("search_id", search_id)])
            .await
    }
}

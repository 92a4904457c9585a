//! Caching document loader for linked-data pages.
//!
//! Fetches JSON-LD documents over HTTP, optionally keeping the raw bodies in
//! an in-memory cache. Counters for downloads, cache hits and time spent
//! downloading are kept for diagnostics only.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use super::error::LoaderError;

/// Configuration for the document loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Sent as the `User-Agent` header
    pub user_agent: String,
    /// Sent as the `Accept` header
    pub accept: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether fetched bodies are cached
    pub caching: bool,
    /// TTL for cached bodies
    pub cache_ttl: Duration,
    /// Maximum number of cached bodies
    pub cache_capacity: u64,
}

impl LoaderConfig {
    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the accept header.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Turn the body cache on or off.
    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Set the cache TTL and capacity.
    pub fn with_cache(mut self, ttl: Duration, capacity: u64) -> Self {
        self.cache_ttl = ttl;
        self.cache_capacity = capacity;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            accept: "application/ld+json".to_string(),
            timeout_secs: 30,
            caching: true,
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
        }
    }
}

/// Snapshot of the loader's diagnostic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoaderStats {
    /// Documents fetched over the network
    pub downloads: u64,
    /// Documents served from the cache
    pub cache_hits: u64,
    /// Cumulative time spent downloading
    pub time_downloading: Duration,
}

enum Source {
    Http(reqwest::Client),
    Fixed(Arc<str>),
}

/// Fetches linked-data documents by URI.
///
/// Safe to share between concurrent scans; the counters are atomic.
pub struct DocumentLoader {
    source: Source,
    cache: Option<MokaCache<String, Arc<str>>>,
    downloads: AtomicU64,
    cache_hits: AtomicU64,
    downloading_micros: AtomicU64,
}

impl DocumentLoader {
    /// Create a loader with the given configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let mut headers = HeaderMap::new();
        if let Ok(agent) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }
        if let Ok(accept) = HeaderValue::from_str(&config.accept) {
            headers.insert(ACCEPT, accept);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let cache = config.caching.then(|| {
            MokaCache::builder()
                .time_to_live(config.cache_ttl)
                .max_capacity(config.cache_capacity)
                .build()
        });

        Ok(Self::with_source(Source::Http(http), cache))
    }

    /// A loader that yields `payload` for every URI, without network access.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_scan::linked::DocumentLoader;
    ///
    /// # futures::executor::block_on(async {
    /// let loader = DocumentLoader::always_returning(r#"{"@graph": []}"#);
    /// let doc = loader.load_document("https://example.org/anything").await.unwrap();
    /// assert!(doc["@graph"].is_array());
    /// assert_eq!(loader.stats().downloads, 0);
    /// # });
    /// ```
    pub fn always_returning(payload: impl Into<Arc<str>>) -> Self {
        Self::with_source(Source::Fixed(payload.into()), None)
    }

    fn with_source(source: Source, cache: Option<MokaCache<String, Arc<str>>>) -> Self {
        Self {
            source,
            cache,
            downloads: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            downloading_micros: AtomicU64::new(0),
        }
    }

    /// Fetch and parse the JSON document at `uri`.
    pub async fn load_document(&self, uri: &str) -> Result<serde_json::Value, LoaderError> {
        let body = self.download_raw(uri).await?;
        serde_json::from_str(&body).map_err(|e| LoaderError::Json {
            uri: uri.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch the body at `uri`, ignoring any fragment.
    pub async fn download_raw(&self, uri: &str) -> Result<Arc<str>, LoaderError> {
        let http = match &self.source {
            Source::Fixed(payload) => return Ok(Arc::clone(payload)),
            Source::Http(http) => http,
        };

        let uri = strip_fragment(uri);

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(uri).await {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                debug!(uri, "document cache hit");
                return Ok(body);
            }
        }

        info!(uri, "downloading");
        self.downloads.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let fetched = fetch_body(http, uri).await;
        let elapsed = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.downloading_micros.fetch_add(elapsed, Ordering::Relaxed);
        let body = fetched?;

        if let Some(cache) = &self.cache {
            cache.insert(uri.to_string(), Arc::clone(&body)).await;
        }
        Ok(body)
    }

    /// Current counter values.
    pub fn stats(&self) -> LoaderStats {
        LoaderStats {
            downloads: self.downloads.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            time_downloading: Duration::from_micros(self.downloading_micros.load(Ordering::Relaxed)),
        }
    }

    /// Reset all counters to zero.
    pub fn reset_counters(&self) {
        self.downloads.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.downloading_micros.store(0, Ordering::Relaxed);
    }

    /// Drop every cached body.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

async fn fetch_body(http: &reqwest::Client, uri: &str) -> Result<Arc<str>, LoaderError> {
    let response = http.get(uri).send().await?;
    if !response.status().is_success() {
        debug!(uri, status = %response.status(), "document not available");
        return Err(LoaderError::NotFound {
            uri: uri.to_string(),
        });
    }
    Ok(response.text().await?.into())
}

fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(base, _)| base)
}

use crate::error::ClientError;
use oxiri::Iri;
use oxrdf::NamedNodeRef;
use std::time::Duration;
use url::form_urlencoded::byte_serialize;

/// Location and transport settings of a Fuseki-style triple store.
///
/// ```
/// use sparclient::TriplestoreConfig;
/// use std::time::Duration;
///
/// let config = TriplestoreConfig::new("http://localhost:3030/")
///     .with_dataset("people")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.query_endpoint(), "http://localhost:3030/people/query");
/// assert_eq!(config.ping_endpoint(), "http://localhost:3030/$/ping");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplestoreConfig {
    base_url: String,
    dataset: String,
    timeout: Option<Duration>,
    redirection_limit: usize,
}

impl TriplestoreConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3030";
    pub const DEFAULT_DATASET: &'static str = "persons";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Builds a configuration for the server at `base_url` with the default dataset.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            dataset: Self::DEFAULT_DATASET.into(),
            timeout: Some(Self::DEFAULT_TIMEOUT),
            redirection_limit: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into().trim_matches('/').to_owned();
        self
    }

    /// Sets a global timeout on every request.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[inline]
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Sets how many HTTP redirections are followed (none by default).
    #[inline]
    #[must_use]
    pub fn with_redirection_limit(mut self, redirection_limit: usize) -> Self {
        self.redirection_limit = redirection_limit;
        self
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[inline]
    pub fn redirection_limit(&self) -> usize {
        self.redirection_limit
    }

    /// The SPARQL 1.1 Protocol query endpoint.
    pub fn query_endpoint(&self) -> String {
        format!("{}/{}/query", self.base_url, self.dataset)
    }

    /// The SPARQL 1.1 Protocol update endpoint.
    pub fn update_endpoint(&self) -> String {
        format!("{}/{}/update", self.base_url, self.dataset)
    }

    /// The Graph Store HTTP Protocol endpoint for the given graph, or the default graph if `None`.
    pub fn data_endpoint(&self, graph: Option<NamedNodeRef<'_>>) -> String {
        if let Some(graph) = graph {
            let encoded: String = byte_serialize(graph.as_str().as_bytes()).collect();
            format!("{}/{}/data?graph={encoded}", self.base_url, self.dataset)
        } else {
            format!("{}/{}/data?default", self.base_url, self.dataset)
        }
    }

    /// The server liveness endpoint.
    pub fn ping_endpoint(&self) -> String {
        format!("{}/$/ping", self.base_url)
    }

    /// Checks that the endpoints built from this configuration are valid IRIs.
    pub fn validate(&self) -> Result<(), ClientError> {
        for iri in [self.base_url.clone(), self.query_endpoint()] {
            if let Err(source) = Iri::parse(iri.as_str()) {
                return Err(ClientError::InvalidEndpoint { iri, source });
            }
        }
        Ok(())
    }
}

impl Default for TriplestoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

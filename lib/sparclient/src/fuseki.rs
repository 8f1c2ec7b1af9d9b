use crate::client::TriplestoreClient;
use crate::config::TriplestoreConfig;
use crate::error::ClientError;
use crate::format::GraphFormat;
use crate::http::Client;
use oxrdf::NamedNodeRef;
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use std::io::{ErrorKind, Read};
use tracing::{debug, warn};

const RESULTS_ACCEPT: &str = "application/sparql-results+json, application/sparql-results+xml;q=0.9";

/// A [`TriplestoreClient`] speaking the [SPARQL 1.1 Protocol](https://www.w3.org/TR/sparql11-protocol/)
/// and the [Graph Store HTTP Protocol](https://www.w3.org/TR/sparql11-http-rdf-update/)
/// to an Apache Jena Fuseki style server.
///
/// Requests are blocking and never retried.
///
/// ```no_run
/// use sparclient::{HttpTriplestore, TriplestoreClient, TriplestoreConfig};
///
/// let store = HttpTriplestore::new(TriplestoreConfig::default())?;
/// if store.ping()? {
///     for solution in store.query("SELECT ?s WHERE { ?s ?p ?o } LIMIT 10")? {
///         println!("{:?}", solution.get("s"));
///     }
/// }
/// # Result::<_, sparclient::ClientError>::Ok(())
/// ```
#[derive(Clone)]
pub struct HttpTriplestore {
    config: TriplestoreConfig,
    client: Client,
}

impl HttpTriplestore {
    /// Builds a client after checking the configured endpoints.
    pub fn new(config: TriplestoreConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = Client::new(config.timeout(), config.redirection_limit())?;
        Ok(Self { config, client })
    }

    #[inline]
    pub fn config(&self) -> &TriplestoreConfig {
        &self.config
    }

    fn evaluate(&self, query: &str) -> Result<SparqlResults, ClientError> {
        let url = self.config.query_endpoint();
        debug!(%url, "SPARQL query");
        let (content_type, body) = self.client.post(
            &url,
            query.as_bytes().to_vec(),
            "application/sparql-query",
            RESULTS_ACCEPT,
        )?;
        let Some(format) = content_type
            .as_deref()
            .and_then(QueryResultsFormat::from_media_type)
        else {
            return Err(ClientError::unsupported_content_type(url, content_type));
        };
        Ok(
            match QueryResultsParser::from_format(format).for_reader(body)? {
                ReaderQueryResultsParserOutput::Boolean(value) => SparqlResults::Boolean(value),
                ReaderQueryResultsParserOutput::Solutions(solutions) => SparqlResults::Solutions(
                    solutions.collect::<Result<Vec<_>, _>>()?,
                ),
            },
        )
    }
}

enum SparqlResults {
    Boolean(bool),
    Solutions(Vec<QuerySolution>),
}

impl SparqlResults {
    fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "a boolean",
            Self::Solutions(_) => "solutions",
        }
    }
}

impl TriplestoreClient for HttpTriplestore {
    type Error = ClientError;

    fn query(&self, query: &str) -> Result<Vec<QuerySolution>, ClientError> {
        match self.evaluate(query)? {
            SparqlResults::Solutions(solutions) => {
                debug!(count = solutions.len(), "SPARQL solutions received");
                Ok(solutions)
            }
            other => Err(ClientError::UnexpectedResults {
                url: self.config.query_endpoint(),
                expected: "solutions",
                actual: other.kind(),
            }),
        }
    }

    fn construct(&self, query: &str, format: GraphFormat) -> Result<String, ClientError> {
        let url = self.config.query_endpoint();
        debug!(%url, %format, "SPARQL graph query");
        let (_, mut body) = self.client.post(
            &url,
            query.as_bytes().to_vec(),
            "application/sparql-query",
            format.media_type(),
        )?;
        let mut graph = String::new();
        body.read_to_string(&mut graph)?;
        Ok(graph)
    }

    fn ask(&self, query: &str) -> Result<bool, ClientError> {
        match self.evaluate(query)? {
            SparqlResults::Boolean(value) => Ok(value),
            other => Err(ClientError::UnexpectedResults {
                url: self.config.query_endpoint(),
                expected: "a boolean",
                actual: other.kind(),
            }),
        }
    }

    fn update(&self, update: &str) -> Result<(), ClientError> {
        let url = self.config.update_endpoint();
        debug!(%url, "SPARQL update");
        let (_, mut body) = self.client.post(
            &url,
            update.as_bytes().to_vec(),
            "application/sparql-update",
            "*/*",
        )?;
        std::io::copy(&mut body, &mut std::io::sink())?;
        Ok(())
    }

    fn insert(
        &self,
        data: &str,
        format: GraphFormat,
        graph: Option<NamedNodeRef<'_>>,
    ) -> Result<(), ClientError> {
        let url = self.config.data_endpoint(graph);
        debug!(%url, %format, size = data.len(), "Graph Store upload");
        let (_, mut body) =
            self.client
                .post(&url, data.as_bytes().to_vec(), format.media_type(), "*/*")?;
        std::io::copy(&mut body, &mut std::io::sink())?;
        Ok(())
    }

    fn retrieve(
        &self,
        graph: Option<NamedNodeRef<'_>>,
        format: GraphFormat,
    ) -> Result<String, ClientError> {
        let url = self.config.data_endpoint(graph);
        debug!(%url, %format, "Graph Store download");
        let (_, mut body) = self.client.get(&url, format.media_type())?;
        let mut graph = String::new();
        body.read_to_string(&mut graph)?;
        Ok(graph)
    }

    fn clear(&self, graph: Option<NamedNodeRef<'_>>) -> Result<(), ClientError> {
        let update = if let Some(graph) = graph {
            format!("CLEAR SILENT GRAPH {graph}")
        } else {
            "CLEAR DEFAULT".to_owned()
        };
        self.update(&update)
    }

    fn ping(&self) -> Result<bool, ClientError> {
        let url = self.config.ping_endpoint();
        match self.client.get(&url, "text/plain") {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::Unsupported => Err(e.into()),
            Err(e) => {
                warn!(%url, error = %e, "Triple store is not reachable");
                Ok(false)
            }
        }
    }
}

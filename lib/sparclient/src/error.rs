use oxiri::IriParseError;
use sparesults::QueryResultsParseError;
use std::io;

/// An error raised while talking to a triple store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The transport failed or the server answered with an error status.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The configured endpoint is not a valid IRI.
    #[error("Invalid triple store endpoint <{iri}>: {source}")]
    InvalidEndpoint {
        iri: String,
        #[source]
        source: IriParseError,
    },
    /// The server answered with a media type that can't be read.
    #[error("Unsupported Content-Type returned by {url}: {content_type}")]
    UnsupportedContentType { url: String, content_type: String },
    /// The SPARQL results returned by the server are malformed.
    #[error(transparent)]
    Results(#[from] QueryResultsParseError),
    /// The server returned a results kind different from the one the query asks for.
    #[error("Expected {expected} from {url} but got {actual}")]
    UnexpectedResults {
        url: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl ClientError {
    pub(crate) fn unsupported_content_type(
        url: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        Self::UnsupportedContentType {
            url: url.into(),
            content_type: content_type.unwrap_or_else(|| "none".into()),
        }
    }
}

use crate::format::GraphFormat;
use oxrdf::NamedNodeRef;
use sparesults::QuerySolution;
use std::error::Error;

/// A remote RDF triple store reachable with SPARQL queries, updates and graph uploads.
///
/// [`HttpTriplestore`](crate::HttpTriplestore) implements it on top of HTTP.
/// Other implementations (in-memory doubles in tests for example) only need to
/// honor the same contract.
///
/// ```
/// use oxrdf::NamedNodeRef;
/// use sparclient::{GraphFormat, QuerySolution, TriplestoreClient};
/// use std::cell::RefCell;
/// use std::convert::Infallible;
///
/// #[derive(Default)]
/// struct Recorder {
///     inserted: RefCell<Vec<String>>,
/// }
///
/// impl TriplestoreClient for Recorder {
///     type Error = Infallible;
///
///     fn query(&self, _: &str) -> Result<Vec<QuerySolution>, Infallible> {
///         Ok(Vec::new())
///     }
///
///     fn construct(&self, _: &str, _: GraphFormat) -> Result<String, Infallible> {
///         Ok(String::new())
///     }
///
///     fn ask(&self, _: &str) -> Result<bool, Infallible> {
///         Ok(!self.inserted.borrow().is_empty())
///     }
///
///     fn update(&self, _: &str) -> Result<(), Infallible> {
///         Ok(())
///     }
///
///     fn insert(
///         &self,
///         data: &str,
///         _: GraphFormat,
///         _: Option<NamedNodeRef<'_>>,
///     ) -> Result<(), Infallible> {
///         self.inserted.borrow_mut().push(data.into());
///         Ok(())
///     }
///
///     fn retrieve(&self, _: Option<NamedNodeRef<'_>>, _: GraphFormat) -> Result<String, Infallible> {
///         Ok(self.inserted.borrow().join("\n"))
///     }
///
///     fn clear(&self, _: Option<NamedNodeRef<'_>>) -> Result<(), Infallible> {
///         self.inserted.borrow_mut().clear();
///         Ok(())
///     }
///
///     fn ping(&self) -> Result<bool, Infallible> {
///         Ok(true)
///     }
/// }
///
/// let store = Recorder::default();
/// store.insert("<http://example.com/s> <http://example.com/p> \"o\" .", GraphFormat::NTriples, None)?;
/// assert!(store.ask("ASK { ?s ?p ?o }")?);
/// # Result::<_, Infallible>::Ok(())
/// ```
pub trait TriplestoreClient {
    /// The error raised by the store.
    type Error: Error + Send + Sync + 'static;

    /// Evaluates a SPARQL `SELECT` query and returns its solutions.
    fn query(&self, query: &str) -> Result<Vec<QuerySolution>, Self::Error>;

    /// Evaluates a SPARQL `CONSTRUCT` or `DESCRIBE` query and returns the serialized graph.
    fn construct(&self, query: &str, format: GraphFormat) -> Result<String, Self::Error>;

    /// Evaluates a SPARQL `ASK` query.
    fn ask(&self, query: &str) -> Result<bool, Self::Error>;

    /// Executes a SPARQL update.
    fn update(&self, update: &str) -> Result<(), Self::Error>;

    /// Adds serialized RDF data to the given graph, or to the default graph if `None`.
    fn insert(
        &self,
        data: &str,
        format: GraphFormat,
        graph: Option<NamedNodeRef<'_>>,
    ) -> Result<(), Self::Error>;

    /// Returns the content of the given graph, or of the default graph if `None`.
    fn retrieve(
        &self,
        graph: Option<NamedNodeRef<'_>>,
        format: GraphFormat,
    ) -> Result<String, Self::Error>;

    /// Removes all triples of the given graph, or of the default graph if `None`.
    fn clear(&self, graph: Option<NamedNodeRef<'_>>) -> Result<(), Self::Error>;

    /// Returns `true` if the store answers.
    ///
    /// An unreachable store is `Ok(false)`, not an error.
    fn ping(&self) -> Result<bool, Self::Error>;
}

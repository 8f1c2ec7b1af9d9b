//! SHACL-style validation reports.
//!
//! The records are checked by hand-written rules mirroring a SHACL shape. The
//! outcome is described with the SHACL report vocabulary so that it can be
//! exported as RDF with [`ValidationReport::to_graph`].

use crate::vocab::sh;
use oxrdf::vocab::rdf;
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Triple};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// The SHACL constraint component a failed check corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConstraintComponent {
    /// A required value is missing or empty.
    MinCount,
    /// A string is too short.
    MinLength,
    /// A string does not match the expected pattern.
    Pattern,
    /// A value can't be read as the expected datatype.
    Datatype,
    /// A number is below its lower bound.
    MinInclusive,
    /// A number is above its upper bound.
    MaxInclusive,
    /// Two values that must be equal are not.
    Equals,
    /// A value is after a bound it must not exceed (birth date after the current instant).
    LessThanOrEquals,
}

impl ConstraintComponent {
    /// Returns the IRI of the matching SHACL constraint component.
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::MinCount => sh::MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::MinLength => sh::MIN_LENGTH_CONSTRAINT_COMPONENT,
            Self::Pattern => sh::PATTERN_CONSTRAINT_COMPONENT,
            Self::Datatype => sh::DATATYPE_CONSTRAINT_COMPONENT,
            Self::MinInclusive => sh::MIN_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxInclusive => sh::MAX_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::Equals => sh::EQUALS_CONSTRAINT_COMPONENT,
            Self::LessThanOrEquals => sh::LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT,
        }
    }
}

impl fmt::Display for ConstraintComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MinCount => "minCount",
            Self::MinLength => "minLength",
            Self::Pattern => "pattern",
            Self::Datatype => "datatype",
            Self::MinInclusive => "minInclusive",
            Self::MaxInclusive => "maxInclusive",
            Self::Equals => "equals",
            Self::LessThanOrEquals => "lessThanOrEquals",
        })
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// The record that was validated.
    pub focus_node: Term,
    /// The property the check is about, if any.
    pub path: Option<NamedNode>,
    /// The violated constraint.
    pub constraint: ConstraintComponent,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationResult {
    pub fn new(
        focus_node: impl Into<Term>,
        constraint: ConstraintComponent,
        message: impl Into<String>,
    ) -> Self {
        Self {
            focus_node: focus_node.into(),
            path: None,
            constraint,
            message: message.into(),
        }
    }

    /// Sets the result path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<NamedNode>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The outcome of the validation of one or more records.
///
/// It serializes to JSON as `{"valid": bool, "errors": [message, ...]}`.
///
/// ```
/// use oxperson::{ConstraintComponent, ValidationReport, ValidationResult};
/// use oxrdf::NamedNode;
///
/// let mut report = ValidationReport::new();
/// assert!(report.is_valid());
/// report.add_result(ValidationResult::new(
///     NamedNode::new("http://example.com/ex#JaneDoe")?,
///     ConstraintComponent::MinCount,
///     "First name is required",
/// ));
/// assert!(!report.is_valid());
/// assert_eq!(
///     serde_json::to_string(&report)?,
///     r#"{"valid":false,"errors":["First name is required"]}"#
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Creates an empty, conforming report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no check failed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.results.is_empty()
    }

    #[inline]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// The messages of the failed checks, in the order the checks were run.
    pub fn errors(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.message.as_str()).collect()
    }

    /// Returns the number of failed checks.
    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn add_result(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    /// Appends the results of another report.
    pub fn merge(&mut self, other: Self) {
        self.results.extend(other.results);
    }

    /// Converts the report to an RDF graph using the SHACL report vocabulary.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report_node = BlankNode::default();
        graph.insert(&Triple::new(
            report_node.clone(),
            rdf::TYPE,
            sh::VALIDATION_REPORT,
        ));
        graph.insert(&Triple::new(
            report_node.clone(),
            sh::CONFORMS,
            Literal::from(self.is_valid()),
        ));
        for result in &self.results {
            let result_node = BlankNode::default();
            graph.insert(&Triple::new(
                report_node.clone(),
                sh::RESULT,
                result_node.clone(),
            ));
            graph.insert(&Triple::new(
                result_node.clone(),
                rdf::TYPE,
                sh::VALIDATION_RESULT,
            ));
            graph.insert(&Triple::new(
                result_node.clone(),
                sh::FOCUS_NODE,
                result.focus_node.clone(),
            ));
            if let Some(path) = &result.path {
                graph.insert(&Triple::new(
                    result_node.clone(),
                    sh::RESULT_PATH,
                    path.clone(),
                ));
            }
            graph.insert(&Triple::new(
                result_node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                result.constraint.iri(),
            ));
            graph.insert(&Triple::new(
                result_node.clone(),
                sh::RESULT_MESSAGE,
                Literal::new_simple_literal(&result.message),
            ));
            graph.insert(&Triple::new(
                result_node,
                sh::RESULT_SEVERITY,
                sh::VIOLATION,
            ));
        }
        graph
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors())?;
        state.end()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        write!(f, "{} error(s)", self.results.len())?;
        for result in &self.results {
            write!(f, "\n- {result}")?;
        }
        Ok(())
    }
}

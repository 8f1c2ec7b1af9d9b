use oxrdf::IriParseError;
use oxsdatatypes::Date;
use std::error::Error;

/// A record field is missing, malformed or inconsistent.
///
/// Raised by record construction and setters. [`validate`](crate::Person::validate)
/// methods never raise it, they return a [`ValidationReport`](crate::ValidationReport).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },
    #[error("Birth date {birth_date} is in the future")]
    FutureBirthDate { birth_date: Date },
    #[error("Age {age} must be between 0 and 150")]
    AgeOutOfRange { age: i64 },
    #[error("Full name '{full_name}' must be '{expected}'")]
    FullNameMismatch { full_name: String, expected: String },
    #[error("Invalid IRI <{iri}>: {source}")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
    #[error("Expected a {expected} instance")]
    UnexpectedEntity { expected: &'static str },
}

impl ValidationError {
    pub(crate) fn invalid_date(value: impl Into<String>, error: impl ToString) -> Self {
        Self::InvalidDate {
            value: value.into(),
            message: error.to_string(),
        }
    }
}

/// A serialized record can't be read back.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The fixed-pattern Turtle reader did not find one of the statements it requires.
    #[error("The Turtle document has no {pattern}")]
    MissingPattern { pattern: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON-LD document: {0}")]
    InvalidJsonLd(String),
    /// The extracted values do not make a valid record.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A registry operation referenced a class that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LookupError {
    #[error("The class {name} is not registered")]
    UnknownClass { name: String },
    #[error("No transformer is registered for the class {target}")]
    NoTransformer { target: String },
}

/// The registry configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("The class {name} is already registered")]
    DuplicateClass { name: String },
}

/// An error raised by a [`Registry`](crate::Registry) operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An error raised while saving records to or loading them from a triple store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Triple store request failed: {0}")]
    Client(#[source] Box<dyn Error + Send + Sync + 'static>),
    #[error("The solution has no binding for ?{variable}")]
    MissingBinding { variable: &'static str },
    #[error("The binding of ?{variable} is not {expected}")]
    UnexpectedTerm {
        variable: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn client(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Client(Box::new(error))
    }
}

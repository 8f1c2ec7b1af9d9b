//! Fixed-shape JSON-LD helpers.
//!
//! Documents are read with the prefixes of [`crate::vocab`] whatever their `@context` says.

use crate::error::{ParseError, ValidationError};
use crate::vocab::{class, ex, person};
use oxrdf::NamedNodeRef;
use oxrdf::vocab::xsd;
use serde_json::{Map, Value, json};

const PREFIXES: [(&str, &str); 4] = [
    (ex::PREFIX, ex::NAMESPACE),
    (person::PREFIX, person::NAMESPACE),
    (class::PREFIX, class::NAMESPACE),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Builds a `@context` declaring the given prefixes.
pub(crate) fn context(prefixes: &[&str]) -> Value {
    let mut context = Map::new();
    for prefix in prefixes {
        if let Some((_, namespace)) = PREFIXES.iter().find(|(p, _)| p == prefix) {
            context.insert((*prefix).to_owned(), Value::String((*namespace).to_owned()));
        }
    }
    Value::Object(context)
}

/// Compacts an IRI with the known prefixes.
pub(crate) fn compact(iri: NamedNodeRef<'_>) -> String {
    for (prefix, namespace) in PREFIXES {
        if let Some(local) = iri.as_str().strip_prefix(namespace) {
            return format!("{prefix}:{local}");
        }
    }
    iri.as_str().to_owned()
}

/// Expands a compact IRI with the known prefixes.
pub(crate) fn expand(value: &str) -> String {
    if let Some((prefix, local)) = value.split_once(':') {
        if let Some((_, namespace)) = PREFIXES.iter().find(|(p, _)| *p == prefix) {
            return format!("{namespace}{local}");
        }
    }
    value.to_owned()
}

pub(crate) fn typed_literal(value: impl Into<Value>, datatype: NamedNodeRef<'_>) -> Value {
    json!({"@value": value.into(), "@type": compact(datatype)})
}

pub(crate) fn date_literal(value: String) -> Value {
    typed_literal(value, xsd::DATE)
}

/// Returns the node object if it is typed with `class`.
pub(crate) fn node<'a>(
    document: &'a Value,
    class: NamedNodeRef<'_>,
) -> Result<&'a Map<String, Value>, ParseError> {
    let node = document
        .as_object()
        .ok_or_else(|| ParseError::InvalidJsonLd("the document must be a JSON object".into()))?;
    let is_typed = match node.get("@type") {
        Some(Value::String(t)) => expand(t) == class.as_str(),
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str().is_some_and(|t| expand(t) == class.as_str())),
        _ => false,
    };
    if !is_typed {
        return Err(ParseError::InvalidJsonLd(format!(
            "the node must have the type {}",
            compact(class)
        )));
    }
    Ok(node)
}

/// The `@id` of the node, expanded.
pub(crate) fn id(node: &Map<String, Value>) -> Result<Option<String>, ParseError> {
    match node.get("@id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(expand(id))),
        Some(_) => Err(ParseError::InvalidJsonLd("@id must be a string".into())),
    }
}

/// The value of `property`, looked up by its compact form and then by its full IRI.
///
/// Only the first value of an array is read. Value objects are unwrapped to their `@value`.
pub(crate) fn property<'a>(
    node: &'a Map<String, Value>,
    property: NamedNodeRef<'_>,
) -> Option<&'a Value> {
    let mut value = node
        .get(&compact(property))
        .or_else(|| node.get(property.as_str()))?;
    if let Value::Array(values) = value {
        value = values.first()?;
    }
    match value {
        Value::Object(object) => object.get("@value"),
        value => Some(value),
    }
}

pub(crate) fn string_property(
    node: &Map<String, Value>,
    property: NamedNodeRef<'_>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match self::property(node, property) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

use crate::error::ValidationError;
use oxrdf::NamedNode;
use oxsdatatypes::{Date, DateTime, TimezoneOffset};
use serde_json::{Map, Value};
use std::str::FromStr;

pub(crate) const FIRST_NAME: &str = "firstName";
pub(crate) const LAST_NAME: &str = "lastName";
pub(crate) const FULL_NAME: &str = "fullName";
pub(crate) const BIRTH_DATE: &str = "birthDate";
pub(crate) const AGE: &str = "age";
pub(crate) const URI: &str = "uri";

pub(crate) const MAX_AGE: i64 = 150;

pub(crate) fn as_object<'a>(
    value: &'a Value,
    what: &'static str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::WrongFieldType {
        field: what,
        expected: "a JSON object",
    })
}

/// Reads an optional string field, `null` counting as absent.
pub(crate) fn optional_string(
    object: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

/// Trims a required name field.
pub(crate) fn required_name(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField { field })?.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value.to_owned())
}

/// Parses an `xsd:date` as the instant it starts at or an `xsd:dateTime` as is.
pub(crate) fn parse_date_time(value: &str) -> Result<DateTime, ValidationError> {
    let value = value.trim();
    match Date::from_str(value) {
        Ok(date) => start_of(date),
        Err(date_error) => {
            DateTime::from_str(value).map_err(|_| ValidationError::invalid_date(value, date_error))
        }
    }
}

/// Parses an `xsd:date` or an `xsd:dateTime` truncated to its date.
pub(crate) fn parse_date(value: &str) -> Result<Date, ValidationError> {
    date_of(parse_date_time(value)?)
}

/// Midnight at the start of `date`, in the timezone of `date`.
pub(crate) fn start_of(date: Date) -> Result<DateTime, ValidationError> {
    DateTime::try_from(date).map_err(|e| ValidationError::invalid_date(date.to_string(), e))
}

pub(crate) fn date_of(moment: DateTime) -> Result<Date, ValidationError> {
    Date::try_from(moment).map_err(|e| ValidationError::invalid_date(moment.to_string(), e))
}

/// Returns `true` if `moment` is strictly after the current instant.
///
/// A moment without timezone is read as UTC.
pub(crate) fn is_after_now(moment: DateTime) -> bool {
    let moment = if moment.timezone_offset().is_some() {
        Some(moment)
    } else {
        moment.adjust(Some(TimezoneOffset::UTC))
    };
    moment.is_some_and(|moment| moment > DateTime::now())
}

/// The full years elapsed between `birth` and `reference`.
pub(crate) fn years_between(birth: Date, reference: Date) -> i64 {
    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Builds `namespace` + first and last names with all whitespace removed.
pub(crate) fn generated_iri(namespace: &str, first_name: &str, last_name: &str) -> String {
    let mut iri = String::with_capacity(namespace.len() + first_name.len() + last_name.len());
    iri.push_str(namespace);
    iri.extend(first_name.chars().filter(|c| !c.is_whitespace()));
    iri.extend(last_name.chars().filter(|c| !c.is_whitespace()));
    iri
}

pub(crate) fn named_node(iri: String) -> Result<NamedNode, ValidationError> {
    NamedNode::new(iri.as_str()).map_err(|source| ValidationError::InvalidIri { iri, source })
}

/// The part of the IRI after its last `#` or `/`.
pub(crate) fn local_name(iri: &str) -> &str {
    iri.rfind(['#', '/']).map_or(iri, |i| &iri[i + 1..])
}

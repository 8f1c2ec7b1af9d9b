use crate::error::{ParseError, ValidationError};
use crate::fields::{self, BIRTH_DATE, FIRST_NAME, LAST_NAME, URI};
use crate::jsonld;
use crate::report::{ConstraintComponent, ValidationReport, ValidationResult};
use crate::turtle::{self, ToTurtle};
use crate::vocab::ex;
use oxrdf::{NamedNode, NamedNodeRef};
use oxsdatatypes::{Date, DateTime};
use regex::Regex;
use serde_json::{Value, json};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| turtle::typed_subject(ex::PREFIX, "ex:Person"));
static FIRST_NAME_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| turtle::string_object("ex:firstName"));
static LAST_NAME_OBJECT: LazyLock<Regex> = LazyLock::new(|| turtle::string_object("ex:lastName"));
static BIRTH_DATE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| turtle::string_object("ex:birthDate"));

/// The untyped fields a [`Person`] is built from.
///
/// `birth_date` is an ISO 8601 date (`1990-05-15`) or date-time (`1990-05-15T08:00:00Z`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    pub iri: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
}

impl PersonFields {
    /// Reads the `uri`, `firstName`, `lastName` and `birthDate` keys of a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = fields::as_object(value, "person")?;
        Ok(Self {
            iri: fields::optional_string(object, URI, "uri")?,
            first_name: fields::optional_string(object, FIRST_NAME, "firstName")?,
            last_name: fields::optional_string(object, LAST_NAME, "lastName")?,
            birth_date: fields::optional_string(object, BIRTH_DATE, "birthDate")?,
        })
    }
}

/// A person in the source vocabulary (`ex:Person`).
///
/// Names are never empty and the birth instant is never after the current instant.
/// Every constructor and setter enforces it.
/// A birth date given without time of day starts at midnight in its own timezone, or UTC if it has none.
/// Only the date is serialized and compared.
///
/// ```
/// use oxperson::Person;
///
/// let person = Person::new(" Jane ", "Doe", "1990-05-15".parse()?)?;
/// assert_eq!(person.iri().as_str(), "http://example.com/ex#JaneDoe");
/// assert_eq!(person.full_name(), "Jane Doe");
/// assert_eq!(person.age_at("2026-01-10".parse()?), 35);
/// assert!(Person::new("Jane", "Doe", "2999-01-01".parse()?).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct Person {
    iri: NamedNode,
    first_name: String,
    last_name: String,
    birth_date: Date,
    born_at: DateTime,
}

impl Person {
    /// Builds a person whose IRI is generated from the names.
    pub fn new(first_name: &str, last_name: &str, birth_date: Date) -> Result<Self, ValidationError> {
        Self::build(
            None,
            Some(first_name),
            Some(last_name),
            birth_date,
            fields::start_of(birth_date)?,
        )
    }

    pub fn with_iri(
        iri: &str,
        first_name: &str,
        last_name: &str,
        birth_date: Date,
    ) -> Result<Self, ValidationError> {
        Self::build(
            Some(iri),
            Some(first_name),
            Some(last_name),
            birth_date,
            fields::start_of(birth_date)?,
        )
    }

    pub fn from_fields(fields: &PersonFields) -> Result<Self, ValidationError> {
        let first_name = fields::required_name(fields.first_name.as_deref(), "First name")?;
        let last_name = fields::required_name(fields.last_name.as_deref(), "Last name")?;
        let born_at = fields::parse_date_time(
            fields
                .birth_date
                .as_deref()
                .ok_or(ValidationError::MissingField {
                    field: "Birth date",
                })?,
        )?;
        Self::build(
            fields.iri.as_deref(),
            Some(&first_name),
            Some(&last_name),
            fields::date_of(born_at)?,
            born_at,
        )
    }

    fn build(
        iri: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        birth_date: Date,
        born_at: DateTime,
    ) -> Result<Self, ValidationError> {
        let first_name = fields::required_name(first_name, "First name")?;
        let last_name = fields::required_name(last_name, "Last name")?;
        check_birth_date(birth_date, born_at)?;
        let iri = match iri.map(str::trim).filter(|iri| !iri.is_empty()) {
            Some(iri) => iri.to_owned(),
            None => fields::generated_iri(ex::NAMESPACE, &first_name, &last_name),
        };
        Ok(Self {
            iri: fields::named_node(iri)?,
            first_name,
            last_name,
            birth_date,
            born_at,
        })
    }

    #[inline]
    pub fn iri(&self) -> NamedNodeRef<'_> {
        self.iri.as_ref()
    }

    /// The part of the IRI after its last `#` or `/`.
    #[inline]
    pub fn local_name(&self) -> &str {
        fields::local_name(self.iri.as_str())
    }

    #[inline]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[inline]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[inline]
    pub fn birth_date(&self) -> Date {
        self.birth_date
    }

    /// The first and last names joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The age in full years at `reference`.
    ///
    /// A year is counted once the birthday (month and day) is reached.
    /// It is negative if `reference` is before the birth date.
    pub fn age_at(&self, reference: Date) -> i64 {
        fields::years_between(self.birth_date, reference)
    }

    /// The age in full years today (UTC).
    pub fn age(&self) -> i64 {
        self.age_at(Date::now())
    }

    pub fn set_first_name(&mut self, first_name: &str) -> Result<(), ValidationError> {
        self.first_name = fields::required_name(Some(first_name), "First name")?;
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> Result<(), ValidationError> {
        self.last_name = fields::required_name(Some(last_name), "Last name")?;
        Ok(())
    }

    pub fn set_birth_date(&mut self, birth_date: Date) -> Result<(), ValidationError> {
        let born_at = fields::start_of(birth_date)?;
        check_birth_date(birth_date, born_at)?;
        self.birth_date = birth_date;
        self.born_at = born_at;
        Ok(())
    }

    /// Checks every constraint of the `ex:Person` shape and reports all violations.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.first_name.trim().is_empty() {
            report.add_result(
                ValidationResult::new(
                    self.iri.clone(),
                    ConstraintComponent::MinCount,
                    "First name is required",
                )
                .with_path(ex::FIRST_NAME),
            );
        }
        if self.last_name.trim().is_empty() {
            report.add_result(
                ValidationResult::new(
                    self.iri.clone(),
                    ConstraintComponent::MinCount,
                    "Last name is required",
                )
                .with_path(ex::LAST_NAME),
            );
        }
        if fields::is_after_now(self.born_at) {
            report.add_result(
                ValidationResult::new(
                    self.iri.clone(),
                    ConstraintComponent::LessThanOrEquals,
                    "Birth date cannot be in the future",
                )
                .with_path(ex::BIRTH_DATE),
            );
        }
        report
    }

    /// The JSON-LD node of this person.
    pub fn to_json_ld(&self) -> Value {
        json!({
            "@context": jsonld::context(&[ex::PREFIX, "xsd"]),
            "@id": jsonld::compact(self.iri()),
            "@type": jsonld::compact(ex::PERSON),
            (jsonld::compact(ex::FIRST_NAME)): self.first_name,
            (jsonld::compact(ex::LAST_NAME)): self.last_name,
            (jsonld::compact(ex::BIRTH_DATE)): jsonld::date_literal(self.birth_date.to_string()),
        })
    }

    /// A flat JSON object with the stored fields, the full name and the current age.
    pub fn to_plain_record(&self) -> Value {
        json!({
            "uri": self.iri.as_str(),
            "localName": self.local_name(),
            "firstName": self.first_name,
            "lastName": self.last_name,
            "birthDate": self.birth_date.to_string(),
            "fullName": self.full_name(),
            "age": self.age(),
        })
    }

    /// Builds a person from the object written by [`to_plain_record`](Self::to_plain_record).
    ///
    /// The derived `fullName` and `age` keys are ignored.
    pub fn from_plain_record(record: &Value) -> Result<Self, ValidationError> {
        Self::from_fields(&PersonFields::from_json(record)?)
    }

    /// Builds a person from the node written by [`to_json_ld`](Self::to_json_ld).
    pub fn from_json_ld(document: &Value) -> Result<Self, ParseError> {
        let node = jsonld::node(document, ex::PERSON)?;
        Ok(Self::from_fields(&PersonFields {
            iri: jsonld::id(node)?,
            first_name: jsonld::string_property(node, ex::FIRST_NAME, "firstName")?,
            last_name: jsonld::string_property(node, ex::LAST_NAME, "lastName")?,
            birth_date: jsonld::string_property(node, ex::BIRTH_DATE, "birthDate")?,
        })?)
    }

    /// Reads the single-subject shape written by [`to_turtle`](ToTurtle::to_turtle).
    ///
    /// This is a fixed-pattern reader, not a Turtle parser.
    /// [`ParseError::MissingPattern`] is returned if any of the type, first name,
    /// last name or birth date statements can't be found.
    pub fn from_turtle(document: &str) -> Result<Self, ParseError> {
        let subject = turtle::find(&SUBJECT, document, "ex:Person subject")?;
        let first_name = turtle::find(&FIRST_NAME_OBJECT, document, "ex:firstName statement")?;
        let last_name = turtle::find(&LAST_NAME_OBJECT, document, "ex:lastName statement")?;
        let birth_date = turtle::find(&BIRTH_DATE_OBJECT, document, "ex:birthDate statement")?;
        Ok(Self::from_fields(&PersonFields {
            iri: Some(turtle::subject_capture(&subject, ex::NAMESPACE)),
            first_name: Some(turtle::string_capture(&first_name)),
            last_name: Some(turtle::string_capture(&last_name)),
            birth_date: Some(turtle::string_capture(&birth_date)),
        })?)
    }
}

fn check_birth_date(birth_date: Date, born_at: DateTime) -> Result<(), ValidationError> {
    if fields::is_after_now(born_at) {
        return Err(ValidationError::FutureBirthDate { birth_date });
    }
    Ok(())
}

impl ToTurtle for Person {
    fn to_turtle(&self) -> String {
        let mut turtle = String::new();
        turtle.push_str("@prefix ex: <http://example.com/ex#> .\n");
        turtle.push_str("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\n");
        turtle::write_iri(&mut turtle, self.iri.as_str(), ex::PREFIX, ex::NAMESPACE);
        turtle.push_str(" a ex:Person ;\n    ex:firstName ");
        turtle::write_string(&mut turtle, &self.first_name);
        turtle.push_str(" ;\n    ex:lastName ");
        turtle::write_string(&mut turtle, &self.last_name);
        turtle.push_str(" ;\n    ex:birthDate \"");
        turtle.push_str(&self.birth_date.to_string());
        turtle.push_str("\"^^xsd:date .\n");
        turtle
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri
            && self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.birth_date == other.birth_date
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.iri.hash(state);
        self.first_name.hash(state);
        self.last_name.hash(state);
        self.birth_date.hash(state);
    }
}

impl FromStr for Person {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        Self::from_turtle(s)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.birth_date)
    }
}

use crate::error::{ParseError, ValidationError};
use crate::fields::{self, AGE, FIRST_NAME, FULL_NAME, LAST_NAME, MAX_AGE, URI};
use crate::jsonld;
use crate::person::Person;
use crate::report::{ConstraintComponent, ValidationReport, ValidationResult};
use crate::turtle::{self, ToTurtle};
use crate::vocab::{class, ex, person};
use oxrdf::vocab::xsd;
use oxrdf::{NamedNode, NamedNodeRef};
use oxsdatatypes::Date;
use regex::Regex;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

static FULL_NAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| turtle::pattern("^[A-Za-z]+ [A-Za-z]+$"));
static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| turtle::typed_subject(person::PREFIX, "Class:Person"));
static FIRST_NAME_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| turtle::string_object("ex:firstName"));
static LAST_NAME_OBJECT: LazyLock<Regex> = LazyLock::new(|| turtle::string_object("ex:lastName"));
static FULL_NAME_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| turtle::string_object("Person:fullName"));
static AGE_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    turtle::pattern(r#"Person:age\s+"?([+-]?[0-9]+)"?(?:\^\^xsd:integer)?"#)
});

const MIN_FULL_NAME_LENGTH: usize = 3;

/// The untyped fields a [`TransformedPerson`] is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedPersonFields {
    pub iri: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<i64>,
}

impl TransformedPersonFields {
    /// Reads the `uri`, `firstName`, `lastName`, `fullName` and `age` keys of a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let object = fields::as_object(value, "transformed person")?;
        Ok(Self {
            iri: fields::optional_string(object, URI, "uri")?,
            first_name: fields::optional_string(object, FIRST_NAME, "firstName")?,
            last_name: fields::optional_string(object, LAST_NAME, "lastName")?,
            full_name: fields::optional_string(object, FULL_NAME, "fullName")?,
            age: optional_integer(object.get(AGE))?,
        })
    }
}

fn optional_integer(value: Option<&Value>) -> Result<Option<i64>, ValidationError> {
    let wrong_type = || ValidationError::WrongFieldType {
        field: "age",
        expected: "an integer",
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_i64().map(Some).ok_or_else(wrong_type),
        Some(Value::String(number)) => number.trim().parse().map(Some).map_err(|_| wrong_type()),
        Some(_) => Err(wrong_type()),
    }
}

/// A person in the target vocabulary (`Class:Person`) with a denormalized full name and an age.
///
/// The full name is always the first and last names joined by a single space,
/// and the age is always between 0 and 150.
/// Construction only checks these invariants; the stricter shape of the full name
/// (two tokens of ASCII letters) is only checked by [`validate`](Self::validate).
///
/// ```
/// use oxperson::{Person, TransformedPerson};
///
/// let person = Person::new("Jane", "Doe", "1990-05-15".parse()?)?;
/// let mut transformed = TransformedPerson::derive_from(&person, "2026-01-10".parse()?)?;
/// assert_eq!(transformed.iri().as_str(), "http://example.com/ns/Person#JaneDoe");
/// assert_eq!(transformed.age(), 35);
///
/// transformed.set_first_name("Janet")?;
/// assert_eq!(transformed.full_name(), "Janet Doe");
/// assert!(transformed.set_full_name("John Smith").is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformedPerson {
    iri: NamedNode,
    first_name: String,
    last_name: String,
    full_name: String,
    age: u8,
}

impl TransformedPerson {
    /// Builds a record whose IRI is generated from the names.
    pub fn new(
        first_name: &str,
        last_name: &str,
        full_name: &str,
        age: i64,
    ) -> Result<Self, ValidationError> {
        Self::build(
            None,
            Some(first_name),
            Some(last_name),
            Some(full_name),
            Some(age),
        )
    }

    pub fn with_iri(
        iri: &str,
        first_name: &str,
        last_name: &str,
        full_name: &str,
        age: i64,
    ) -> Result<Self, ValidationError> {
        Self::build(
            Some(iri),
            Some(first_name),
            Some(last_name),
            Some(full_name),
            Some(age),
        )
    }

    pub fn from_fields(fields: &TransformedPersonFields) -> Result<Self, ValidationError> {
        Self::build(
            fields.iri.as_deref(),
            fields.first_name.as_deref(),
            fields.last_name.as_deref(),
            fields.full_name.as_deref(),
            fields.age,
        )
    }

    fn build(
        iri: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        full_name: Option<&str>,
        age: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let first_name = fields::required_name(first_name, "First name")?;
        let last_name = fields::required_name(last_name, "Last name")?;
        let full_name = fields::required_name(full_name, "Full name")?;
        let age = check_age(age.ok_or(ValidationError::MissingField { field: "Age" })?)?;
        let expected = format!("{first_name} {last_name}");
        if full_name != expected {
            return Err(ValidationError::FullNameMismatch {
                full_name,
                expected,
            });
        }
        let iri = match iri.map(str::trim).filter(|iri| !iri.is_empty()) {
            Some(iri) => iri.to_owned(),
            None => fields::generated_iri(person::NAMESPACE, &first_name, &last_name),
        };
        Ok(Self {
            iri: fields::named_node(iri)?,
            first_name,
            last_name,
            full_name,
            age,
        })
    }

    /// Derives the record of `source` at the `reference` date.
    ///
    /// The `ex:` namespace of the source IRI is replaced by the `Person:` namespace.
    /// An IRI outside of the `ex:` namespace is kept unchanged and a warning is logged.
    /// The age is the age of `source` at `reference` and must be in range.
    pub fn derive_from(source: &Person, reference: Date) -> Result<Self, ValidationError> {
        let source_iri = source.iri().as_str();
        let iri = if let Some(local) = source_iri.strip_prefix(ex::NAMESPACE) {
            format!("{}{local}", person::NAMESPACE)
        } else {
            warn!(
                iri = source_iri,
                "The source IRI is not in the {} namespace, it is kept unchanged",
                ex::NAMESPACE
            );
            source_iri.to_owned()
        };
        Self::build(
            Some(&iri),
            Some(source.first_name()),
            Some(source.last_name()),
            Some(&source.full_name()),
            Some(source.age_at(reference)),
        )
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
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[inline]
    pub fn age(&self) -> u8 {
        self.age
    }

    /// Sets the first name and recomputes the full name.
    pub fn set_first_name(&mut self, first_name: &str) -> Result<(), ValidationError> {
        self.first_name = fields::required_name(Some(first_name), "First name")?;
        self.full_name = format!("{} {}", self.first_name, self.last_name);
        Ok(())
    }

    /// Sets the last name and recomputes the full name.
    pub fn set_last_name(&mut self, last_name: &str) -> Result<(), ValidationError> {
        self.last_name = fields::required_name(Some(last_name), "Last name")?;
        self.full_name = format!("{} {}", self.first_name, self.last_name);
        Ok(())
    }

    /// Only accepts the value the full name already has (modulo surrounding whitespace).
    pub fn set_full_name(&mut self, full_name: &str) -> Result<(), ValidationError> {
        let full_name = fields::required_name(Some(full_name), "Full name")?;
        let expected = format!("{} {}", self.first_name, self.last_name);
        if full_name != expected {
            return Err(ValidationError::FullNameMismatch {
                full_name,
                expected,
            });
        }
        self.full_name = full_name;
        Ok(())
    }

    pub fn set_age(&mut self, age: i64) -> Result<(), ValidationError> {
        self.age = check_age(age)?;
        Ok(())
    }

    /// Checks every constraint of the `Class:Person` shape and reports all violations.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut fail = |constraint, path: NamedNodeRef<'_>, message: String| {
            report.add_result(
                ValidationResult::new(self.iri.clone(), constraint, message).with_path(path),
            );
        };
        if self.first_name.trim().is_empty() {
            fail(
                ConstraintComponent::MinCount,
                ex::FIRST_NAME,
                "First name is required".into(),
            );
        }
        if self.last_name.trim().is_empty() {
            fail(
                ConstraintComponent::MinCount,
                ex::LAST_NAME,
                "Last name is required".into(),
            );
        }
        if self.full_name.chars().count() < MIN_FULL_NAME_LENGTH {
            fail(
                ConstraintComponent::MinLength,
                person::FULL_NAME,
                format!("Full name must be at least {MIN_FULL_NAME_LENGTH} characters long"),
            );
        }
        if !FULL_NAME_SHAPE.is_match(&self.full_name) {
            fail(
                ConstraintComponent::Pattern,
                person::FULL_NAME,
                format!(
                    "Full name '{}' must be two words made of letters separated by a space",
                    self.full_name
                ),
            );
        }
        let expected = format!("{} {}", self.first_name, self.last_name);
        if self.full_name != expected {
            fail(
                ConstraintComponent::Equals,
                person::FULL_NAME,
                format!("Full name '{}' must be '{expected}'", self.full_name),
            );
        }
        if i64::from(self.age) > MAX_AGE {
            fail(
                ConstraintComponent::MaxInclusive,
                person::AGE,
                format!("Age must be between 0 and {MAX_AGE}"),
            );
        }
        report
    }

    /// The JSON-LD node of this record.
    pub fn to_json_ld(&self) -> Value {
        json!({
            "@context": jsonld::context(&[person::PREFIX, class::PREFIX, ex::PREFIX, "xsd"]),
            "@id": jsonld::compact(self.iri()),
            "@type": jsonld::compact(class::PERSON),
            (jsonld::compact(ex::FIRST_NAME)): self.first_name,
            (jsonld::compact(ex::LAST_NAME)): self.last_name,
            (jsonld::compact(person::FULL_NAME)): self.full_name,
            (jsonld::compact(person::AGE)): jsonld::typed_literal(self.age, xsd::INTEGER),
        })
    }

    /// A flat JSON object with the stored fields.
    pub fn to_plain_record(&self) -> Value {
        json!({
            "uri": self.iri.as_str(),
            "localName": self.local_name(),
            "firstName": self.first_name,
            "lastName": self.last_name,
            "fullName": self.full_name,
            "age": self.age,
        })
    }

    /// Builds a record from the object written by [`to_plain_record`](Self::to_plain_record).
    pub fn from_plain_record(record: &Value) -> Result<Self, ValidationError> {
        Self::from_fields(&TransformedPersonFields::from_json(record)?)
    }

    /// Builds a record from the node written by [`to_json_ld`](Self::to_json_ld).
    pub fn from_json_ld(document: &Value) -> Result<Self, ParseError> {
        let node = jsonld::node(document, class::PERSON)?;
        Ok(Self::from_fields(&TransformedPersonFields {
            iri: jsonld::id(node)?,
            first_name: jsonld::string_property(node, ex::FIRST_NAME, "firstName")?,
            last_name: jsonld::string_property(node, ex::LAST_NAME, "lastName")?,
            full_name: jsonld::string_property(node, person::FULL_NAME, "fullName")?,
            age: optional_integer(jsonld::property(node, person::AGE))?,
        })?)
    }

    /// Reads the single-subject shape written by [`to_turtle`](ToTurtle::to_turtle).
    ///
    /// This is a fixed-pattern reader, not a Turtle parser.
    /// [`ParseError::MissingPattern`] is returned if any of the type, first name,
    /// last name, full name or age statements can't be found.
    pub fn from_turtle(document: &str) -> Result<Self, ParseError> {
        let subject = turtle::find(&SUBJECT, document, "Class:Person subject")?;
        let first_name = turtle::find(&FIRST_NAME_OBJECT, document, "ex:firstName statement")?;
        let last_name = turtle::find(&LAST_NAME_OBJECT, document, "ex:lastName statement")?;
        let full_name = turtle::find(&FULL_NAME_OBJECT, document, "Person:fullName statement")?;
        let age = turtle::find(&AGE_OBJECT, document, "Person:age statement")?;
        let age = optional_integer(age.get(1).map(|m| Value::String(m.as_str().into())).as_ref())?;
        Ok(Self::from_fields(&TransformedPersonFields {
            iri: Some(turtle::subject_capture(&subject, person::NAMESPACE)),
            first_name: Some(turtle::string_capture(&first_name)),
            last_name: Some(turtle::string_capture(&last_name)),
            full_name: Some(turtle::string_capture(&full_name)),
            age,
        })?)
    }
}

fn check_age(age: i64) -> Result<u8, ValidationError> {
    if !(0..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange { age });
    }
    u8::try_from(age).map_err(|_| ValidationError::AgeOutOfRange { age })
}

impl ToTurtle for TransformedPerson {
    fn to_turtle(&self) -> String {
        let mut turtle = String::new();
        turtle.push_str("@prefix Person: <http://example.com/ns/Person#> .\n");
        turtle.push_str("@prefix Class: <http://example.com/ns/Class#> .\n");
        turtle.push_str("@prefix ex: <http://example.com/ex#> .\n");
        turtle.push_str("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\n");
        turtle::write_iri(
            &mut turtle,
            self.iri.as_str(),
            person::PREFIX,
            person::NAMESPACE,
        );
        turtle.push_str(" a Class:Person ;\n    ex:firstName ");
        turtle::write_string(&mut turtle, &self.first_name);
        turtle.push_str(" ;\n    ex:lastName ");
        turtle::write_string(&mut turtle, &self.last_name);
        turtle.push_str(" ;\n    Person:fullName ");
        turtle::write_string(&mut turtle, &self.full_name);
        turtle.push_str(" ;\n    Person:age ");
        turtle.push_str(&self.age.to_string());
        turtle.push_str(" .\n");
        turtle
    }
}

impl FromStr for TransformedPerson {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        Self::from_turtle(s)
    }
}

impl fmt::Display for TransformedPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> Date {
        value.parse().unwrap()
    }

    fn jane() -> TransformedPerson {
        TransformedPerson::new("Jane", "Doe", "Jane Doe", 35).unwrap()
    }

    #[test]
    fn test_construction() {
        let record = TransformedPerson::new(" Jane", "Doe ", " Jane Doe ", 35).unwrap();
        assert_eq!(record.iri().as_str(), "http://example.com/ns/Person#JaneDoe");
        assert_eq!(record.full_name(), "Jane Doe");
        assert_eq!(record.age(), 35);
        TransformedPerson::new("Old", "Timer", "Old Timer", 150).unwrap();
        TransformedPerson::new("New", "Born", "New Born", 0).unwrap();
    }

    #[test]
    fn test_full_name_mismatch() {
        assert!(matches!(
            TransformedPerson::new("Jane", "Doe", "John Smith", 35),
            Err(ValidationError::FullNameMismatch { .. })
        ));
        assert!(matches!(
            TransformedPerson::new("Jane", "Doe", "", 35),
            Err(ValidationError::EmptyField { field: "Full name" })
        ));
    }

    #[test]
    fn test_age_out_of_range() {
        for age in [-5, -1, 151, 200] {
            assert!(matches!(
                TransformedPerson::new("Jane", "Doe", "Jane Doe", age),
                Err(ValidationError::AgeOutOfRange { .. })
            ));
        }
        assert!(matches!(
            TransformedPerson::from_fields(&TransformedPersonFields {
                first_name: Some("Jane".into()),
                last_name: Some("Doe".into()),
                full_name: Some("Jane Doe".into()),
                ..TransformedPersonFields::default()
            }),
            Err(ValidationError::MissingField { field: "Age" })
        ));
        assert!(matches!(
            TransformedPersonFields::from_json(&json!({"age": "thirty"})),
            Err(ValidationError::WrongFieldType { field: "age", .. })
        ));
        assert!(matches!(
            TransformedPersonFields::from_json(&json!({"age": 35.5})),
            Err(ValidationError::WrongFieldType { field: "age", .. })
        ));
    }

    #[test]
    fn test_setters() {
        let mut record = jane();
        record.set_first_name("Janet").unwrap();
        assert_eq!(record.full_name(), "Janet Doe");
        record.set_last_name(" Dane ").unwrap();
        assert_eq!(record.full_name(), "Janet Dane");
        record.set_full_name(" Janet Dane ").unwrap();
        assert!(matches!(
            record.set_full_name("Jane Doe"),
            Err(ValidationError::FullNameMismatch { .. })
        ));
        assert!(record.set_first_name("").is_err());
        assert_eq!(record.full_name(), "Janet Dane");
        assert!(record.set_age(151).is_err());
        assert_eq!(record.age(), 35);
        record.set_age(36).unwrap();
        assert_eq!(record.age(), 36);
    }

    #[test]
    fn test_derive_from() {
        let source = Person::new("Jane", "Doe", date("1990-05-15")).unwrap();
        let derived = TransformedPerson::derive_from(&source, date("2026-01-10")).unwrap();
        assert_eq!(derived.iri().as_str(), "http://example.com/ns/Person#JaneDoe");
        assert_eq!(derived.first_name(), source.first_name());
        assert_eq!(derived.last_name(), source.last_name());
        assert_eq!(derived.full_name(), source.full_name());
        assert_eq!(i64::from(derived.age()), source.age_at(date("2026-01-10")));
    }

    #[test]
    fn test_derive_from_keeps_foreign_iri() {
        let source = Person::with_iri(
            "http://example.org/people/1",
            "Jane",
            "Doe",
            date("1990-05-15"),
        )
        .unwrap();
        let derived = TransformedPerson::derive_from(&source, date("2026-01-10")).unwrap();
        assert_eq!(derived.iri().as_str(), "http://example.org/people/1");
    }

    #[test]
    fn test_derive_from_rejects_out_of_range_age() {
        let source = Person::new("Ann", "Cient", date("1800-01-01")).unwrap();
        assert!(matches!(
            TransformedPerson::derive_from(&source, date("2026-01-10")),
            Err(ValidationError::AgeOutOfRange { age: 226 })
        ));
        assert!(matches!(
            TransformedPerson::derive_from(&source, date("1799-01-01")),
            Err(ValidationError::AgeOutOfRange { age: -1 })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(jane().validate().is_valid());

        let record = TransformedPerson::new("Mary Ann", "Smith", "Mary Ann Smith", 40).unwrap();
        let report = record.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].constraint, ConstraintComponent::Pattern);

        let record = TransformedPerson::new("A", "B", "A B", 40).unwrap();
        assert!(record.validate().is_valid());

        let record = TransformedPerson::new("Zoë", "D", "Zoë D", 40).unwrap();
        let report = record.validate();
        assert_eq!(report.len(), 1);
        assert!(report.errors()[0].contains("two words"));
    }

    #[test]
    fn test_to_turtle() {
        assert_eq!(
            jane().to_turtle(),
            "@prefix Person: <http://example.com/ns/Person#> .\n@prefix Class: <http://example.com/ns/Class#> .\n@prefix ex: <http://example.com/ex#> .\n@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\nPerson:JaneDoe a Class:Person ;\n    ex:firstName \"Jane\" ;\n    ex:lastName \"Doe\" ;\n    Person:fullName \"Jane Doe\" ;\n    Person:age 35 .\n"
        );
        assert_eq!(jane().to_turtle().parse::<TransformedPerson>().unwrap(), jane());
    }

    #[test]
    fn test_from_turtle_errors() {
        let turtle = jane().to_turtle().replace("    Person:age 35 .\n", "");
        assert!(matches!(
            TransformedPerson::from_turtle(&turtle),
            Err(ParseError::MissingPattern {
                pattern: "Person:age statement"
            })
        ));
        let turtle = jane().to_turtle().replace("\"Jane Doe\"", "\"John Doe\"");
        assert!(matches!(
            TransformedPerson::from_turtle(&turtle),
            Err(ParseError::Invalid(ValidationError::FullNameMismatch { .. }))
        ));
        let turtle = jane().to_turtle().replace("Person:age 35", "Person:age \"200\"^^xsd:integer");
        assert!(matches!(
            TransformedPerson::from_turtle(&turtle),
            Err(ParseError::Invalid(ValidationError::AgeOutOfRange { age: 200 }))
        ));
    }

    #[test]
    fn test_json_ld() {
        let document = jane().to_json_ld();
        assert_eq!(document["@id"], "Person:JaneDoe");
        assert_eq!(document["@type"], "Class:Person");
        assert_eq!(
            document["Person:age"],
            json!({"@value": 35, "@type": "xsd:integer"})
        );
        assert_eq!(
            document["@context"]["Class"],
            "http://example.com/ns/Class#"
        );
        assert_eq!(TransformedPerson::from_json_ld(&document).unwrap(), jane());
    }

    #[test]
    fn test_plain_record_round_trip() {
        let record = jane().to_plain_record();
        assert_eq!(
            record,
            json!({
                "uri": "http://example.com/ns/Person#JaneDoe",
                "localName": "JaneDoe",
                "firstName": "Jane",
                "lastName": "Doe",
                "fullName": "Jane Doe",
                "age": 35
            })
        );
        assert_eq!(TransformedPerson::from_plain_record(&record).unwrap(), jane());
    }
}

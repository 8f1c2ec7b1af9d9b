#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxperson::vocab::{ex, sh};
use oxperson::{
    ParseError, Person, PersonFields, ToTurtle, TransformedPerson, ValidationError, split_blocks,
    transform,
};
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNodeRef, Term, TermRef};
use oxsdatatypes::Date;
use serde_json::{Value, json};
use std::error::Error;

const PERSONS_JSON: &str = include_str!("data/persons.json");
const PERSONS_TTL: &str = include_str!("data/persons.ttl");
const EXPECTED_AGES: [u8; 5] = [35, 40, 33, 47, 26];

fn reference() -> Date {
    "2026-01-10".parse().unwrap()
}

fn persons_from_json() -> Result<Vec<Person>, Box<dyn Error>> {
    let records: Value = serde_json::from_str(PERSONS_JSON)?;
    Ok(records
        .as_array()
        .ok_or("not an array")?
        .iter()
        .map(|record| Person::from_fields(&PersonFields::from_json(record)?))
        .collect::<Result<_, _>>()?)
}

#[test]
fn test_json_and_turtle_samples_agree() -> Result<(), Box<dyn Error>> {
    let from_json = persons_from_json()?;
    let from_turtle = split_blocks(PERSONS_TTL)
        .iter()
        .map(|block| block.parse::<Person>())
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(from_json, from_turtle);
    Ok(())
}

#[test]
fn test_transform_samples() -> Result<(), Box<dyn Error>> {
    for (person, age) in persons_from_json()?.iter().zip(EXPECTED_AGES) {
        let transformed = transform(person, reference())?;
        assert_eq!(transformed.age(), age);
        assert_eq!(transformed.first_name(), person.first_name());
        assert_eq!(transformed.last_name(), person.last_name());
        assert_eq!(transformed.full_name(), person.full_name());
        assert_eq!(
            transformed.iri().as_str().strip_prefix("http://example.com/ns/Person#"),
            person.iri().as_str().strip_prefix("http://example.com/ex#")
        );
        assert!(transformed.validate().is_valid());
    }
    Ok(())
}

#[test]
fn test_turtle_read_back() -> Result<(), Box<dyn Error>> {
    for person in persons_from_json()? {
        assert_eq!(Person::from_turtle(&person.to_turtle())?, person);
        let transformed = transform(&person, reference())?;
        assert_eq!(
            TransformedPerson::from_turtle(&transformed.to_turtle())?,
            transformed
        );
    }
    Ok(())
}

#[test]
fn test_turtle_shapes() -> Result<(), Box<dyn Error>> {
    let person = Person::new("Jane", "Doe", "1990-05-15".parse()?)?;
    assert_eq!(
        person.to_turtle(),
        "@prefix ex: <http://example.com/ex#> .\n\
         @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
         \n\
         ex:JaneDoe a ex:Person ;\n    \
         ex:firstName \"Jane\" ;\n    \
         ex:lastName \"Doe\" ;\n    \
         ex:birthDate \"1990-05-15\"^^xsd:date .\n"
    );
    let transformed = transform(&person, reference())?;
    assert!(transformed.to_turtle().ends_with(
        "Person:JaneDoe a Class:Person ;\n    \
         ex:firstName \"Jane\" ;\n    \
         ex:lastName \"Doe\" ;\n    \
         Person:fullName \"Jane Doe\" ;\n    \
         Person:age 35 .\n"
    ));
    Ok(())
}

#[test]
fn test_turtle_missing_statements() {
    let document = "@prefix ex: <http://example.com/ex#> .\n\nex:JaneDoe a ex:Person ;\n    ex:firstName \"Jane\" ;\n    ex:birthDate \"1990-05-15\"^^xsd:date .\n";
    assert!(matches!(
        Person::from_turtle(document),
        Err(ParseError::MissingPattern {
            pattern: "ex:lastName statement"
        })
    ));
    assert!(matches!(
        TransformedPerson::from_turtle(document),
        Err(ParseError::MissingPattern { .. })
    ));
    assert!(matches!(
        Person::from_turtle("ex:JaneDoe a ex:Person ;\n    ex:firstName \"Jane\" ;\n    ex:lastName \"Doe\" ;\n    ex:birthDate \"2999-01-01\"^^xsd:date ."),
        Err(ParseError::Invalid(ValidationError::FutureBirthDate { .. }))
    ));
}

#[test]
fn test_json_ld_read_back() -> Result<(), Box<dyn Error>> {
    let person = Person::new("Jane", "Doe", "1990-05-15".parse()?)?;
    let document = person.to_json_ld();
    assert_eq!(document["@id"], "ex:JaneDoe");
    assert_eq!(document["@type"], "ex:Person");
    assert_eq!(
        document["ex:birthDate"],
        json!({"@value": "1990-05-15", "@type": "xsd:date"})
    );
    assert_eq!(Person::from_json_ld(&document)?, person);

    let transformed = transform(&person, reference())?;
    let document = transformed.to_json_ld();
    assert_eq!(document["@type"], "Class:Person");
    assert_eq!(
        document["Person:age"],
        json!({"@value": 35, "@type": "xsd:integer"})
    );
    assert_eq!(TransformedPerson::from_json_ld(&document)?, transformed);

    assert!(matches!(
        Person::from_json_ld(&transformed.to_json_ld()),
        Err(ParseError::InvalidJsonLd(_))
    ));
    Ok(())
}

#[test]
fn test_expanded_json_ld() -> Result<(), Box<dyn Error>> {
    let document = json!({
        "@id": "http://example.com/ex#JaneDoe",
        "@type": ["http://example.com/ex#Person"],
        "http://example.com/ex#firstName": [{"@value": "Jane"}],
        "http://example.com/ex#lastName": "Doe",
        "http://example.com/ex#birthDate": {"@value": "1990-05-15T10:00:00Z"}
    });
    let person = Person::from_json_ld(&document)?;
    assert_eq!(person.first_name(), "Jane");
    assert_eq!(person.birth_date().day(), 15);
    Ok(())
}

#[test]
fn test_validation_report_graph() -> Result<(), Box<dyn Error>> {
    let record = TransformedPerson::new("Mary Ann", "Smith", "Mary Ann Smith", 40)?;
    let report = record.validate();
    assert!(!report.is_valid());
    assert_eq!(serde_json::to_value(&report)?["valid"], false);

    let graph = report.to_graph();
    let report_node = graph
        .subjects_for_predicate_object(rdf::TYPE, sh::VALIDATION_REPORT)
        .next()
        .ok_or("no report node")?;
    assert_eq!(
        graph
            .object_for_subject_predicate(report_node, sh::CONFORMS)
            .map(TermRef::into_owned),
        Some(Term::from(Literal::from(false)))
    );
    let result_node = graph
        .subjects_for_predicate_object(rdf::TYPE, sh::VALIDATION_RESULT)
        .next()
        .ok_or("no result node")?;
    assert_eq!(
        graph.object_for_subject_predicate(result_node, sh::FOCUS_NODE),
        Some(TermRef::NamedNode(record.iri()))
    );
    assert_eq!(
        graph.object_for_subject_predicate(result_node, sh::SOURCE_CONSTRAINT_COMPONENT),
        Some(TermRef::NamedNode(NamedNodeRef::new(
            "http://www.w3.org/ns/shacl#PatternConstraintComponent"
        )?))
    );

    let person = Person::new("Jane", "Doe", "1990-05-15".parse()?)?;
    let graph = person.validate().to_graph();
    assert_eq!(graph.len(), 2);
    assert!(graph.iter().all(|t| t.predicate != ex::FIRST_NAME));
    Ok(())
}

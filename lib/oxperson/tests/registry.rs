#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxperson::vocab::ex;
use oxperson::{
    ClassDefinition, ConfigError, ConstraintComponent, Entity, LookupError, Person, Registry,
    RegistryError, TransformOptions, TransformedPerson, ValidationError, ValidationReport,
    ValidationResult,
};
use oxrdf::NamedNode;
use serde_json::{Value, json};
use std::error::Error;
use std::sync::Arc;

const SAMPLES: [(&str, &str, &str, u8); 5] = [
    ("Jane", "Doe", "1990-05-15", 35),
    ("John", "Smith", "1985-03-22", 40),
    ("Alice", "Johnson", "1992-08-10", 33),
    ("Bob", "Williams", "1978-11-30", 47),
    ("Carol", "Brown", "2000-01-01", 26),
];

fn options() -> TransformOptions {
    TransformOptions::default().with_reference_date("2026-01-10".parse().unwrap())
}

fn record(first: &str, last: &str, birth: &str) -> Value {
    json!({"firstName": first, "lastName": last, "birthDate": birth})
}

#[test]
fn test_default_classes() {
    let registry = Registry::default();
    assert_eq!(registry.class_names(), ["Person", "TransformedPerson"]);
    assert!(registry.is_registered("Person"));
    assert!(!registry.is_registered("Employee"));
    let info = registry.class_info("TransformedPerson").unwrap();
    assert_eq!(info.rdf_type, "http://example.com/ns/Class#Person");
    assert!(info.has_transformer);
    assert!(!info.has_validator);
    assert!(!registry.class_info("Person").unwrap().has_transformer);
    assert!(Registry::new().class_names().is_empty());
}

#[test]
fn test_create_transform_validate_samples() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    for (first, last, birth, age) in SAMPLES {
        let person = registry.create("Person", &record(first, last, birth))?;
        let transformed = registry.transform(person.as_ref(), "TransformedPerson", &options())?;
        let report = registry.validate_instance("TransformedPerson", transformed.as_ref());
        assert_eq!(
            serde_json::to_value(&report)?,
            json!({"valid": true, "errors": []})
        );
        let transformed = transformed
            .downcast_ref::<TransformedPerson>()
            .ok_or("not a transformed person")?;
        assert_eq!(transformed.full_name(), format!("{first} {last}"));
        assert_eq!(transformed.age(), age);
    }
    let statistics = registry.statistics();
    assert_eq!(statistics.total_classes, 2);
    assert_eq!(statistics.total_instances, 10);
    assert_eq!(statistics.instances["Person"], 5);
    assert_eq!(
        serde_json::to_value(&statistics)?,
        json!({
            "totalClasses": 2,
            "totalInstances": 10,
            "instances": {"Person": 5, "TransformedPerson": 5}
        })
    );
    assert!(registry.validate_all().iter().all(|r| r.report.is_valid()));
    Ok(())
}

#[test]
fn test_create_errors() {
    let mut registry = Registry::default();
    assert!(matches!(
        registry.create("Employee", &record("Jane", "Doe", "1990-05-15")),
        Err(RegistryError::Lookup(LookupError::UnknownClass { name })) if name == "Employee"
    ));
    assert!(matches!(
        registry.create("Person", &json!({"firstName": "Jane", "birthDate": "1990-05-15"})),
        Err(RegistryError::Validation(ValidationError::MissingField {
            field: "Last name"
        }))
    ));
    assert!(matches!(
        registry.create("Person", &record("Jane", "Doe", "2999-01-01")),
        Err(RegistryError::Validation(ValidationError::FutureBirthDate { .. }))
    ));
    assert_eq!(registry.statistics().total_instances, 0);
}

#[test]
fn test_transform_errors() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    let person = registry.create("Person", &record("Jane", "Doe", "1990-05-15"))?;
    assert!(matches!(
        registry.transform(person.as_ref(), "Person", &options()),
        Err(RegistryError::Lookup(LookupError::NoTransformer { target })) if target == "Person"
    ));
    assert!(matches!(
        registry.transform(person.as_ref(), "Employee", &options()),
        Err(RegistryError::Lookup(LookupError::NoTransformer { .. }))
    ));
    let transformed = TransformedPerson::new("Jane", "Doe", "Jane Doe", 35)?;
    assert!(matches!(
        registry.transform(&transformed, "TransformedPerson", &options()),
        Err(RegistryError::Validation(ValidationError::UnexpectedEntity {
            expected: "Person"
        }))
    ));
    Ok(())
}

#[test]
fn test_duplicate_registration() {
    let mut registry = Registry::default();
    let definition = ClassDefinition::new(ex::PERSON, ex::NAMESPACE, |fields| {
        Ok(Box::new(Person::from_plain_record(fields)?))
    });
    assert_eq!(
        registry.register_class("Person", definition),
        Err(ConfigError::DuplicateClass {
            name: "Person".into()
        })
    );
}

#[test]
fn test_custom_class_with_validator() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    registry.register_class(
        "Adult",
        ClassDefinition::new(ex::PERSON, ex::NAMESPACE, |fields| {
            Ok(Box::new(Person::from_plain_record(fields)?))
        })
        .with_validator(|entity| {
            let mut report = ValidationReport::new();
            if let Some(person) = entity.downcast_ref::<Person>() {
                if person.age_at("2026-01-10".parse().unwrap()) < 18 {
                    report.add_result(
                        ValidationResult::new(
                            person.iri().into_owned(),
                            ConstraintComponent::MinInclusive,
                            "An adult must be at least 18",
                        )
                        .with_path(ex::BIRTH_DATE),
                    );
                }
            }
            report
        }),
    )?;
    let child = registry.create("Adult", &record("Tim", "Doe", "2015-06-01"))?;
    let adult = registry.create("Adult", &record("Jane", "Doe", "1990-05-15"))?;
    let report = registry.validate_instance("Adult", child.as_ref());
    assert_eq!(report.errors(), ["An adult must be at least 18"]);
    assert!(registry.validate_instance("Adult", adult.as_ref()).is_valid());
    // The built-in validation still applies to the same record under its own class.
    assert!(registry.validate_instance("Person", child.as_ref()).is_valid());
    assert!(registry.class_info("Adult")?.has_validator);
    assert_eq!(
        registry
            .validate_all()
            .iter()
            .filter(|r| !r.report.is_valid())
            .count(),
        1
    );
    Ok(())
}

#[test]
fn test_permissive_validation_fallback() -> Result<(), Box<dyn Error>> {
    #[derive(Debug)]
    struct Note(NamedNode);

    impl oxperson::ToTurtle for Note {
        fn to_turtle(&self) -> String {
            format!("{} a <http://example.com/Note> .\n", self.0)
        }
    }

    impl Entity for Note {
        fn iri(&self) -> oxrdf::NamedNodeRef<'_> {
            self.0.as_ref()
        }

        fn to_plain_record(&self) -> Value {
            json!({"uri": self.0.as_str()})
        }

        fn to_json_ld(&self) -> Value {
            json!({"@id": self.0.as_str()})
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let mut registry = Registry::default();
    registry.register_class(
        "Note",
        ClassDefinition::new(
            NamedNode::new("http://example.com/Note")?,
            "http://example.com/notes/",
            |fields| {
                let uri = fields["uri"].as_str().unwrap_or_default();
                Ok(Box::new(Note(NamedNode::new(uri).map_err(|source| {
                    ValidationError::InvalidIri {
                        iri: uri.into(),
                        source,
                    }
                })?)))
            },
        ),
    )?;
    let note = registry.create("Note", &json!({"uri": "http://example.com/notes/1"}))?;
    assert!(registry.validate_instance("Note", note.as_ref()).is_valid());
    assert!(registry.validate_instance("Unknown", note.as_ref()).is_valid());
    assert!(registry.export_class_to_turtle("Note")?.contains("<http://example.com/Note>"));
    Ok(())
}

#[test]
fn test_lookups_and_removal() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    for (first, last, birth, _) in SAMPLES {
        registry.create("Person", &record(first, last, birth))?;
    }
    let born_in_the_nineties = registry.find("Person", |entity| {
        entity
            .downcast_ref::<Person>()
            .is_some_and(|p| (1990..2000).contains(&p.birth_date().year()))
    })?;
    assert_eq!(born_in_the_nineties.len(), 2);
    let bob = registry
        .find_one("Person", |entity| {
            entity
                .downcast_ref::<Person>()
                .is_some_and(|p| p.first_name() == "Bob")
        })?
        .ok_or("Bob is missing")?;
    assert_eq!(bob.iri().as_str(), "http://example.com/ex#BobWilliams");
    let jane = NamedNode::new("http://example.com/ex#JaneDoe")?;
    assert!(registry.find_by_iri(jane.as_ref()).is_some());
    assert_eq!(registry.remove_instance("Person", jane.as_ref())?, 1);
    assert!(registry.find_by_iri(jane.as_ref()).is_none());
    assert_eq!(registry.remove_instance("Person", jane.as_ref())?, 0);
    assert_eq!(registry.instances("Person")?.len(), 4);

    registry.add_instance("TransformedPerson", Arc::new(TransformedPerson::new("Jane", "Doe", "Jane Doe", 35)?))?;
    registry.clear_instances("Person")?;
    assert!(registry.instances("Person")?.is_empty());
    assert_eq!(registry.instances("TransformedPerson")?.len(), 1);
    registry.clear_all();
    assert_eq!(registry.statistics().total_instances, 0);
    assert_eq!(registry.class_names().len(), 2);
    assert!(matches!(
        registry.instances("Employee"),
        Err(LookupError::UnknownClass { .. })
    ));
    Ok(())
}

#[test]
fn test_export_and_import_json() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    for (first, last, birth, _) in SAMPLES {
        let person = registry.create("Person", &record(first, last, birth))?;
        registry.transform(person.as_ref(), "TransformedPerson", &options())?;
    }
    let export = registry.export_to_json();
    assert_eq!(export["Person"].as_array().map(Vec::len), Some(5));
    assert_eq!(export["TransformedPerson"][0]["fullName"], "Jane Doe");
    assert_eq!(export["TransformedPerson"][0]["age"], 35);
    assert_eq!(registry.export_class_to_json("Person")?, export["Person"]);

    let mut copy = Registry::default();
    assert_eq!(copy.import_from_json(&export)?, 10);
    assert_eq!(copy.export_to_json(), export);
    assert_eq!(copy.statistics(), registry.statistics());

    registry.clear_instances("Person")?;
    registry.clear_instances("TransformedPerson")?;
    assert_eq!(registry.import_from_json(&export)?, 10);
    assert_eq!(registry.export_to_json(), export);

    assert!(matches!(
        copy.import_from_json(&json!({"Employee": [{}]})),
        Err(RegistryError::Lookup(LookupError::UnknownClass { .. }))
    ));
    assert!(matches!(
        copy.import_from_json(&json!([1, 2])),
        Err(RegistryError::Validation(ValidationError::WrongFieldType { .. }))
    ));
    Ok(())
}

#[test]
fn test_import_json_keeps_registry_on_error() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    let rejected = json!({
        "Person": [record("Jane", "Doe", "1990-05-15"), record("John", "Smith", "1985-03-22")],
        "TransformedPerson": [{"firstName": "Jane", "lastName": "Doe", "fullName": "John Doe", "age": 35}],
    });
    assert!(matches!(
        registry.import_from_json(&rejected),
        Err(RegistryError::Validation(ValidationError::FullNameMismatch { .. }))
    ));
    let unknown = json!({
        "Person": [record("Jane", "Doe", "1990-05-15")],
        "Unknown": [],
    });
    assert!(matches!(
        registry.import_from_json(&unknown),
        Err(RegistryError::Lookup(LookupError::UnknownClass { .. }))
    ));
    assert_eq!(registry.statistics().total_instances, 0);
    assert!(registry.instances("Person")?.is_empty());

    assert_eq!(
        registry.import_from_json(&json!({"Person": [record("Jane", "Doe", "1990-05-15")]}))?,
        1
    );
    assert_eq!(registry.instances("Person")?.len(), 1);
    Ok(())
}

#[test]
fn test_export_turtle() -> Result<(), Box<dyn Error>> {
    let mut registry = Registry::default();
    for (first, last, birth, _) in SAMPLES {
        let person = registry.create("Person", &record(first, last, birth))?;
        registry.transform(person.as_ref(), "TransformedPerson", &options())?;
    }
    let turtle = registry.export_class_to_turtle("Person")?;
    let persons = oxperson::split_blocks(&turtle)
        .iter()
        .map(|block| Person::from_turtle(block))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(persons.len(), 5);
    assert_eq!(persons[4].full_name(), "Carol Brown");

    let all = registry.export_to_turtle();
    assert_eq!(all.matches(" a ex:Person ;").count(), 5);
    assert_eq!(all.matches(" a Class:Person ;").count(), 5);
    Ok(())
}

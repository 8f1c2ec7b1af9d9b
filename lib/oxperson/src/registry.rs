//! An in-memory catalog of record classes and of their live instances.

use crate::entity::Entity;
use crate::error::{ConfigError, LookupError, RegistryError, ValidationError};
use crate::person::Person;
use crate::report::ValidationReport;
use crate::transform::TransformOptions;
use crate::transformed::TransformedPerson;
use crate::vocab::{class, ex};
use oxrdf::{NamedNode, NamedNodeRef};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds a record from a plain JSON object.
pub type Constructor =
    Box<dyn Fn(&Value) -> Result<Box<dyn Entity>, ValidationError> + Send + Sync>;
/// Builds a record of a class from a record of another class.
pub type Transformer = Box<
    dyn Fn(&dyn Entity, &TransformOptions) -> Result<Box<dyn Entity>, ValidationError>
        + Send
        + Sync,
>;
/// Validates a record.
pub type Validator = Box<dyn Fn(&dyn Entity) -> ValidationReport + Send + Sync>;

/// The capabilities and metadata of a registered class.
pub struct ClassDefinition {
    rdf_type: NamedNode,
    namespace: String,
    constructor: Constructor,
    transformer: Option<Transformer>,
    validator: Option<Validator>,
}

impl ClassDefinition {
    pub fn new(
        rdf_type: impl Into<NamedNode>,
        namespace: impl Into<String>,
        constructor: impl Fn(&Value) -> Result<Box<dyn Entity>, ValidationError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            rdf_type: rdf_type.into(),
            namespace: namespace.into(),
            constructor: Box::new(constructor),
            transformer: None,
            validator: None,
        }
    }

    /// Sets how records of this class are derived from records of other classes.
    #[must_use]
    pub fn with_transformer(
        mut self,
        transformer: impl Fn(&dyn Entity, &TransformOptions) -> Result<Box<dyn Entity>, ValidationError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.transformer = Some(Box::new(transformer));
        self
    }

    /// Sets a validator used instead of [`Entity::validate`].
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl Fn(&dyn Entity) -> ValidationReport + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("rdf_type", &self.rdf_type)
            .field("namespace", &self.namespace)
            .field("has_transformer", &self.transformer.is_some())
            .field("has_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ClassEntry {
    name: String,
    definition: ClassDefinition,
    instances: Vec<Arc<dyn Entity>>,
}

/// Metadata of a registered class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    pub rdf_type: String,
    pub namespace: String,
    pub has_transformer: bool,
    pub has_validator: bool,
    pub instance_count: usize,
}

/// Instance counts of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_classes: usize,
    pub total_instances: usize,
    pub instances: BTreeMap<String, usize>,
}

/// The validation report of a registered instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceReport {
    pub class: String,
    pub uri: String,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// A catalog mapping class names to their capabilities and live instances.
///
/// [`Registry::default`] registers the `Person` and `TransformedPerson` classes.
/// Instances are kept in insertion order and only handed out as shared immutable references.
/// All operations are in-memory and mutation requires exclusive access:
/// wrap the registry in a [`Mutex`](std::sync::Mutex) to share it between threads.
///
/// ```
/// use oxperson::{Person, Registry, TransformOptions};
/// use serde_json::json;
///
/// let mut registry = Registry::default();
/// let person = registry.create(
///     "Person",
///     &json!({"firstName": "Jane", "lastName": "Doe", "birthDate": "1990-05-15"}),
/// )?;
/// let transformed = registry.transform(
///     person.as_ref(),
///     "TransformedPerson",
///     &TransformOptions::default().with_reference_date("2026-01-10".parse()?),
/// )?;
/// assert!(registry.validate_instance("TransformedPerson", transformed.as_ref()).is_valid());
/// assert_eq!(registry.statistics().total_instances, 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct Registry {
    classes: Vec<ClassEntry>,
}

impl Registry {
    pub const PERSON: &'static str = "Person";
    pub const TRANSFORMED_PERSON: &'static str = "TransformedPerson";

    /// Creates a registry without any class.
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Registers a class. Fails if the name is already taken.
    pub fn register_class(
        &mut self,
        name: impl Into<String>,
        definition: ClassDefinition,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.entry(&name).is_some() {
            return Err(ConfigError::DuplicateClass { name });
        }
        debug!(class = name, rdf_type = %definition.rdf_type, "Class registered");
        self.classes.push(ClassEntry {
            name,
            definition,
            instances: Vec::new(),
        });
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// The registered class names, in registration order.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn class_info(&self, name: &str) -> Result<ClassInfo, LookupError> {
        let entry = self.entry_or_err(name)?;
        Ok(ClassInfo {
            name: entry.name.clone(),
            rdf_type: entry.definition.rdf_type.as_str().to_owned(),
            namespace: entry.definition.namespace.clone(),
            has_transformer: entry.definition.transformer.is_some(),
            has_validator: entry.definition.validator.is_some(),
            instance_count: entry.instances.len(),
        })
    }

    /// Builds a record with the class constructor and tracks it.
    ///
    /// Constructor errors are returned unchanged as [`RegistryError::Validation`].
    pub fn create(&mut self, name: &str, fields: &Value) -> Result<Arc<dyn Entity>, RegistryError> {
        let entry = self.entry_mut_or_err(name)?;
        let instance: Arc<dyn Entity> = Arc::from((entry.definition.constructor)(fields)?);
        debug!(class = name, iri = %instance.iri(), "Instance created");
        entry.instances.push(Arc::clone(&instance));
        Ok(instance)
    }

    /// Tracks an already built record.
    pub fn add_instance(
        &mut self,
        name: &str,
        instance: Arc<dyn Entity>,
    ) -> Result<(), LookupError> {
        self.entry_mut_or_err(name)?.instances.push(instance);
        Ok(())
    }

    /// Derives a record of the `target` class from `instance` and tracks it.
    pub fn transform(
        &mut self,
        instance: &dyn Entity,
        target: &str,
        options: &TransformOptions,
    ) -> Result<Arc<dyn Entity>, RegistryError> {
        let no_transformer = || LookupError::NoTransformer {
            target: target.into(),
        };
        let entry = self.entry_mut(target).ok_or_else(no_transformer)?;
        let transformer = entry
            .definition
            .transformer
            .as_ref()
            .ok_or_else(no_transformer)?;
        let result: Arc<dyn Entity> = Arc::from(transformer(instance, options)?);
        debug!(
            source = %instance.iri(),
            target = target,
            iri = %result.iri(),
            "Instance transformed"
        );
        entry.instances.push(Arc::clone(&result));
        Ok(result)
    }

    /// Validates `instance` with the validator of the class `name`.
    ///
    /// If the class has no validator (or is not registered), [`Entity::validate`] is used.
    /// Its default implementation accepts every record.
    pub fn validate_instance(&self, name: &str, instance: &dyn Entity) -> ValidationReport {
        match self
            .entry(name)
            .and_then(|entry| entry.definition.validator.as_ref())
        {
            Some(validator) => validator(instance),
            None => instance.validate(),
        }
    }

    /// Validates every tracked instance.
    pub fn validate_all(&self) -> Vec<InstanceReport> {
        self.classes
            .iter()
            .flat_map(|entry| {
                entry.instances.iter().map(|instance| InstanceReport {
                    class: entry.name.clone(),
                    uri: instance.iri().as_str().to_owned(),
                    report: self.validate_instance(&entry.name, instance.as_ref()),
                })
            })
            .collect()
    }

    /// The tracked instances of a class, in insertion order.
    pub fn instances(&self, name: &str) -> Result<Vec<Arc<dyn Entity>>, LookupError> {
        Ok(self.entry_or_err(name)?.instances.clone())
    }

    /// The tracked instances of a class matching `predicate`.
    pub fn find(
        &self,
        name: &str,
        predicate: impl Fn(&dyn Entity) -> bool,
    ) -> Result<Vec<Arc<dyn Entity>>, LookupError> {
        Ok(self
            .entry_or_err(name)?
            .instances
            .iter()
            .filter(|instance| predicate(instance.as_ref()))
            .cloned()
            .collect())
    }

    /// The first tracked instance of a class matching `predicate`.
    pub fn find_one(
        &self,
        name: &str,
        predicate: impl Fn(&dyn Entity) -> bool,
    ) -> Result<Option<Arc<dyn Entity>>, LookupError> {
        Ok(self
            .entry_or_err(name)?
            .instances
            .iter()
            .find(|instance| predicate(instance.as_ref()))
            .cloned())
    }

    /// The first tracked instance with the given IRI, whatever its class.
    pub fn find_by_iri(&self, iri: NamedNodeRef<'_>) -> Option<Arc<dyn Entity>> {
        self.classes
            .iter()
            .flat_map(|entry| &entry.instances)
            .find(|instance| instance.iri() == iri)
            .cloned()
    }

    /// Stops tracking the instances of a class with the given IRI. Returns how many were removed.
    pub fn remove_instance(
        &mut self,
        name: &str,
        iri: NamedNodeRef<'_>,
    ) -> Result<usize, LookupError> {
        let entry = self.entry_mut_or_err(name)?;
        let before = entry.instances.len();
        entry.instances.retain(|instance| instance.iri() != iri);
        Ok(before - entry.instances.len())
    }

    pub fn clear_instances(&mut self, name: &str) -> Result<(), LookupError> {
        self.entry_mut_or_err(name)?.instances.clear();
        debug!(class = name, "Instances cleared");
        Ok(())
    }

    /// Stops tracking every instance. Classes stay registered.
    pub fn clear_all(&mut self) {
        for entry in &mut self.classes {
            entry.instances.clear();
        }
        debug!("All instances cleared");
    }

    pub fn statistics(&self) -> Statistics {
        let instances: BTreeMap<_, _> = self
            .classes
            .iter()
            .map(|entry| (entry.name.clone(), entry.instances.len()))
            .collect();
        Statistics {
            total_classes: self.classes.len(),
            total_instances: instances.values().sum(),
            instances,
        }
    }

    /// The plain records of the instances of a class, as a JSON array.
    pub fn export_class_to_json(&self, name: &str) -> Result<Value, LookupError> {
        Ok(Value::Array(
            self.entry_or_err(name)?
                .instances
                .iter()
                .map(|instance| instance.to_plain_record())
                .collect(),
        ))
    }

    /// The plain records of all instances, as a JSON object keyed by class name.
    pub fn export_to_json(&self) -> Value {
        Value::Object(
            self.classes
                .iter()
                .map(|entry| {
                    (
                        entry.name.clone(),
                        Value::Array(
                            entry
                                .instances
                                .iter()
                                .map(|instance| instance.to_plain_record())
                                .collect(),
                        ),
                    )
                })
                .collect::<Map<_, _>>(),
        )
    }

    /// The Turtle documents of the instances of a class, separated by blank lines.
    pub fn export_class_to_turtle(&self, name: &str) -> Result<String, LookupError> {
        Ok(self
            .entry_or_err(name)?
            .instances
            .iter()
            .map(|instance| instance.to_turtle())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// The Turtle documents of all instances, separated by blank lines.
    pub fn export_to_turtle(&self) -> String {
        self.classes
            .iter()
            .flat_map(|entry| &entry.instances)
            .map(|instance| instance.to_turtle())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Rebuilds instances from an object written by [`export_to_json`](Self::export_to_json).
    ///
    /// Every record goes through the class constructor. Returns the number of created instances.
    /// Nothing is added if any class is unknown or any record is rejected.
    pub fn import_from_json(&mut self, data: &Value) -> Result<usize, RegistryError> {
        let classes = data.as_object().ok_or(ValidationError::WrongFieldType {
            field: "import",
            expected: "a JSON object keyed by class name",
        })?;
        let mut imported = Vec::new();
        for (name, records) in classes {
            let records = records.as_array().ok_or(ValidationError::WrongFieldType {
                field: "import",
                expected: "an array of records per class",
            })?;
            let position = self
                .classes
                .iter()
                .position(|entry| entry.name == *name)
                .ok_or_else(|| LookupError::UnknownClass { name: name.clone() })?;
            let constructor = &self.classes[position].definition.constructor;
            for record in records {
                let instance: Arc<dyn Entity> = Arc::from(constructor(record)?);
                imported.push((position, instance));
            }
        }
        let count = imported.len();
        for (position, instance) in imported {
            self.classes[position].instances.push(instance);
        }
        debug!(count, "Instances imported");
        Ok(count)
    }

    fn entry(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|entry| entry.name == name)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut ClassEntry> {
        self.classes.iter_mut().find(|entry| entry.name == name)
    }

    fn entry_or_err(&self, name: &str) -> Result<&ClassEntry, LookupError> {
        self.entry(name).ok_or_else(|| LookupError::UnknownClass { name: name.into() })
    }

    fn entry_mut_or_err(&mut self, name: &str) -> Result<&mut ClassEntry, LookupError> {
        self.entry_mut(name)
            .ok_or_else(|| LookupError::UnknownClass { name: name.into() })
    }
}

impl Default for Registry {
    /// Creates a registry with the `Person` and `TransformedPerson` classes.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.classes.push(ClassEntry {
            name: Self::PERSON.into(),
            definition: person_class(),
            instances: Vec::new(),
        });
        registry.classes.push(ClassEntry {
            name: Self::TRANSFORMED_PERSON.into(),
            definition: transformed_person_class(),
            instances: Vec::new(),
        });
        registry
    }
}

fn person_class() -> ClassDefinition {
    ClassDefinition::new(ex::PERSON, ex::NAMESPACE, |fields| {
        Ok(Box::new(Person::from_plain_record(fields)?))
    })
}

fn transformed_person_class() -> ClassDefinition {
    ClassDefinition::new(class::PERSON, crate::vocab::person::NAMESPACE, |fields| {
        Ok(Box::new(TransformedPerson::from_plain_record(fields)?))
    })
    .with_transformer(|source, options| {
        let source = source
            .downcast_ref::<Person>()
            .ok_or(ValidationError::UnexpectedEntity {
                expected: Registry::PERSON,
            })?;
        Ok(Box::new(TransformedPerson::derive_from(
            source,
            options.reference_date(),
        )?))
    })
}

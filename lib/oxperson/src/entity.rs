use crate::person::Person;
use crate::report::ValidationReport;
use crate::transformed::TransformedPerson;
use crate::turtle::ToTurtle;
use oxrdf::NamedNodeRef;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;

/// A record that can be held by a [`Registry`](crate::Registry).
pub trait Entity: ToTurtle + Debug + Send + Sync + Any {
    fn iri(&self) -> NamedNodeRef<'_>;

    /// A flat JSON object the class constructor can rebuild the record from.
    fn to_plain_record(&self) -> Value;

    fn to_json_ld(&self) -> Value;

    fn as_any(&self) -> &dyn Any;

    /// Checks the record constraints.
    ///
    /// Records without constraints keep this default, which always reports a valid record.
    fn validate(&self) -> ValidationReport {
        ValidationReport::new()
    }
}

impl dyn Entity + '_ {
    /// Returns `true` if the record is a `T`.
    pub fn is<T: Entity>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns the record as a `T` if it is one.
    ///
    /// ```
    /// use oxperson::{Entity, Person, TransformedPerson};
    ///
    /// let person: Box<dyn Entity> = Box::new(Person::new("Jane", "Doe", "1990-05-15".parse()?)?);
    /// assert_eq!(person.downcast_ref::<Person>().map(Person::last_name), Some("Doe"));
    /// assert!(person.downcast_ref::<TransformedPerson>().is_none());
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

impl Entity for Person {
    fn iri(&self) -> NamedNodeRef<'_> {
        Self::iri(self)
    }

    fn to_plain_record(&self) -> Value {
        Self::to_plain_record(self)
    }

    fn to_json_ld(&self) -> Value {
        Self::to_json_ld(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn validate(&self) -> ValidationReport {
        Self::validate(self)
    }
}

impl Entity for TransformedPerson {
    fn iri(&self) -> NamedNodeRef<'_> {
        Self::iri(self)
    }

    fn to_plain_record(&self) -> Value {
        Self::to_plain_record(self)
    }

    fn to_json_ld(&self) -> Value {
        Self::to_json_ld(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn validate(&self) -> ValidationReport {
        Self::validate(self)
    }
}

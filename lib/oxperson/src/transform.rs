use crate::error::ValidationError;
use crate::person::Person;
use crate::transformed::TransformedPerson;
use oxsdatatypes::Date;

/// Maps a [`Person`] to its [`TransformedPerson`] at the `reference` date.
///
/// Same as [`TransformedPerson::derive_from`].
///
/// ```
/// use oxperson::{Person, transform};
///
/// let person = Person::new("Carol", "Brown", "2000-01-01".parse()?)?;
/// assert_eq!(transform(&person, "2026-01-10".parse()?)?.age(), 26);
/// assert_eq!(transform(&person, "2025-12-31".parse()?)?.age(), 25);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn transform(source: &Person, reference: Date) -> Result<TransformedPerson, ValidationError> {
    TransformedPerson::derive_from(source, reference)
}

/// Options of a [`Registry::transform`](crate::Registry::transform) call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    reference_date: Option<Date>,
}

impl TransformOptions {
    /// Sets the date ages are computed at. Today (UTC) is used by default.
    #[inline]
    #[must_use]
    pub fn with_reference_date(mut self, reference_date: Date) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    /// The configured reference date, or today if none is set.
    pub fn reference_date(&self) -> Date {
        self.reference_date.unwrap_or_else(Date::now)
    }
}

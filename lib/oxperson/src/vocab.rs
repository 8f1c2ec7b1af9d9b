//! Provides ready to use [`NamedNodeRef`]s for the vocabularies of the person records.

pub mod ex {
    //! Source vocabulary of [`Person`](crate::Person) records.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://example.com/ex#";
    pub const PREFIX: &str = "ex";

    /// The class of source person records.
    pub const PERSON: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/ex#Person");
    pub const FIRST_NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ex#firstName");
    pub const LAST_NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ex#lastName");
    pub const BIRTH_DATE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ex#birthDate");
}

pub mod person {
    //! Properties of [`TransformedPerson`](crate::TransformedPerson) records.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://example.com/ns/Person#";
    pub const PREFIX: &str = "Person";

    /// The first and last names joined by a single space.
    pub const FULL_NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ns/Person#fullName");
    /// The age in years at the reference date of the transformation.
    pub const AGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ns/Person#age");
}

pub mod class {
    //! Classes of the target vocabulary.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://example.com/ns/Class#";
    pub const PREFIX: &str = "Class";

    /// The class of transformed person records.
    pub const PERSON: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://example.com/ns/Class#Person");
}

pub mod sh {
    //! The subset of the [SHACL](https://www.w3.org/TR/shacl/) vocabulary used by validation reports.
    use oxrdf::NamedNodeRef;

    pub const VALIDATION_REPORT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#ValidationReport");
    pub const VALIDATION_RESULT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#ValidationResult");
    pub const CONFORMS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#conforms");
    pub const RESULT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#result");
    pub const FOCUS_NODE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#focusNode");
    pub const RESULT_PATH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#resultPath");
    pub const RESULT_MESSAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#resultMessage");
    pub const RESULT_SEVERITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#resultSeverity");
    pub const SOURCE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#sourceConstraintComponent");
    pub const VIOLATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#Violation");

    pub const DATATYPE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#DatatypeConstraintComponent");
    pub const EQUALS_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#EqualsConstraintComponent");
    pub const LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked(
            "http://www.w3.org/ns/shacl#LessThanOrEqualsConstraintComponent",
        );
    pub const MAX_INCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#MaxInclusiveConstraintComponent");
    pub const MIN_COUNT_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#MinCountConstraintComponent");
    pub const MIN_INCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent");
    pub const MIN_LENGTH_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#MinLengthConstraintComponent");
    pub const PATTERN_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#PatternConstraintComponent");
}

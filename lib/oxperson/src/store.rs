//! Saves records to and loads them from a [`TriplestoreClient`].
//!
//! ```
//! # use oxperson::store;
//! # use sparclient::TriplestoreClient;
//! # fn example(client: &impl TriplestoreClient) -> Result<(), oxperson::StoreError> {
//! let person = oxperson::Person::new("Jane", "Doe", "1990-05-15".parse().unwrap())?;
//! store::save(client, &person, None)?;
//! for person in store::load_persons(client, None)? {
//!     println!("{person}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::StoreError;
use crate::fields;
use crate::person::Person;
use crate::transformed::TransformedPerson;
use crate::turtle::ToTurtle;
use crate::vocab::{class, ex, person};
use oxrdf::{NamedNodeRef, Term};
use sparclient::{GraphFormat, QuerySolution, TriplestoreClient};
use tracing::debug;

/// Inserts the Turtle serialization of `item` into `graph` (the default graph if `None`).
pub fn save<C: TriplestoreClient>(
    client: &C,
    item: &(impl ToTurtle + ?Sized),
    graph: Option<NamedNodeRef<'_>>,
) -> Result<(), StoreError> {
    client
        .insert(&item.to_turtle(), GraphFormat::Turtle, graph)
        .map_err(StoreError::client)
}

/// Inserts every item and returns how many were saved.
///
/// Stops at the first failure.
pub fn save_all<'a, C: TriplestoreClient, T: ToTurtle + ?Sized + 'a>(
    client: &C,
    items: impl IntoIterator<Item = &'a T>,
    graph: Option<NamedNodeRef<'_>>,
) -> Result<usize, StoreError> {
    let mut count = 0;
    for item in items {
        save(client, item, graph)?;
        count += 1;
    }
    debug!(count, "Records saved");
    Ok(count)
}

/// Loads every `ex:Person` of `graph` (the default graph if `None`), ordered by IRI.
pub fn load_persons<C: TriplestoreClient>(
    client: &C,
    graph: Option<NamedNodeRef<'_>>,
) -> Result<Vec<Person>, StoreError> {
    let query = select(
        "?s ?firstName ?lastName ?birthDate",
        &format!(
            "?s a <{}> ; <{}> ?firstName ; <{}> ?lastName ; <{}> ?birthDate .",
            ex::PERSON.as_str(),
            ex::FIRST_NAME.as_str(),
            ex::LAST_NAME.as_str(),
            ex::BIRTH_DATE.as_str()
        ),
        graph,
    );
    let solutions = client.query(&query).map_err(StoreError::client)?;
    debug!(count = solutions.len(), "Persons loaded");
    solutions
        .iter()
        .map(|solution| -> Result<_, StoreError> {
            Ok(Person::with_iri(
                iri(solution, "s")?.as_str(),
                literal(solution, "firstName")?,
                literal(solution, "lastName")?,
                fields::parse_date(literal(solution, "birthDate")?)?,
            )?)
        })
        .collect()
}

/// Loads every `Class:Person` of `graph` (the default graph if `None`), ordered by IRI.
pub fn load_transformed_persons<C: TriplestoreClient>(
    client: &C,
    graph: Option<NamedNodeRef<'_>>,
) -> Result<Vec<TransformedPerson>, StoreError> {
    let query = select(
        "?s ?firstName ?lastName ?fullName ?age",
        &format!(
            "?s a <{}> ; <{}> ?firstName ; <{}> ?lastName ; <{}> ?fullName ; <{}> ?age .",
            class::PERSON.as_str(),
            ex::FIRST_NAME.as_str(),
            ex::LAST_NAME.as_str(),
            person::FULL_NAME.as_str(),
            person::AGE.as_str()
        ),
        graph,
    );
    let solutions = client.query(&query).map_err(StoreError::client)?;
    debug!(count = solutions.len(), "Transformed persons loaded");
    solutions
        .iter()
        .map(|solution| -> Result<_, StoreError> {
            let age = literal(solution, "age")?
                .trim()
                .parse::<i64>()
                .map_err(|_| StoreError::UnexpectedTerm {
                    variable: "age",
                    expected: "an integer literal",
                })?;
            Ok(TransformedPerson::with_iri(
                iri(solution, "s")?.as_str(),
                literal(solution, "firstName")?,
                literal(solution, "lastName")?,
                literal(solution, "fullName")?,
                age,
            )?)
        })
        .collect()
}

/// Removes every triple whose subject is `iri`.
pub fn delete_resource<C: TriplestoreClient>(
    client: &C,
    iri: NamedNodeRef<'_>,
    graph: Option<NamedNodeRef<'_>>,
) -> Result<(), StoreError> {
    let pattern = in_graph(&format!("{iri} ?p ?o ."), graph);
    debug!(iri = %iri, "Deleting resource");
    client
        .update(&format!("DELETE WHERE {{ {pattern} }}"))
        .map_err(StoreError::client)
}

fn select(variables: &str, pattern: &str, graph: Option<NamedNodeRef<'_>>) -> String {
    format!(
        "SELECT {variables} WHERE {{ {} }} ORDER BY ?s",
        in_graph(pattern, graph)
    )
}

fn in_graph(pattern: &str, graph: Option<NamedNodeRef<'_>>) -> String {
    match graph {
        Some(graph) => format!("GRAPH {graph} {{ {pattern} }}"),
        None => pattern.to_owned(),
    }
}

fn binding<'a>(solution: &'a QuerySolution, variable: &'static str) -> Result<&'a Term, StoreError> {
    solution
        .get(variable)
        .ok_or(StoreError::MissingBinding { variable })
}

fn iri<'a>(
    solution: &'a QuerySolution,
    variable: &'static str,
) -> Result<NamedNodeRef<'a>, StoreError> {
    match binding(solution, variable)? {
        Term::NamedNode(node) => Ok(node.as_ref()),
        _ => Err(StoreError::UnexpectedTerm {
            variable,
            expected: "an IRI",
        }),
    }
}

fn literal<'a>(solution: &'a QuerySolution, variable: &'static str) -> Result<&'a str, StoreError> {
    match binding(solution, variable)? {
        Term::Literal(literal) => Ok(literal.value()),
        _ => Err(StoreError::UnexpectedTerm {
            variable,
            expected: "a literal",
        }),
    }
}

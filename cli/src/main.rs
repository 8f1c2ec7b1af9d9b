#![allow(clippy::print_stderr, clippy::print_stdout)]
use crate::cli::{Args, Command, Input, InputFormat, LogFormat, OutputFormat};
use anyhow::{Context, bail};
use clap::Parser;
use oxperson::{
    Entity, ParseError, Person, Registry, TransformOptions, TransformedPerson, split_blocks,
    store,
};
use oxrdf::{NamedNode, Term};
use oxsdatatypes::Date;
use serde_json::{Value, json};
use sparclient::{HttpTriplestore, TriplestoreClient, TriplestoreConfig};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write, stdin, stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);
    match args.command {
        Command::Transform {
            input,
            reference_date,
            output_format,
            output,
        } => {
            let options = transform_options(reference_date.as_deref())?;
            let mut registry = Registry::default();
            for person in read_persons(&input)? {
                let person: Arc<dyn Entity> = Arc::new(person);
                registry.add_instance(Registry::PERSON, Arc::clone(&person))?;
                registry.transform(person.as_ref(), Registry::TRANSFORMED_PERSON, &options)?;
            }
            let transformed = registry.instances(Registry::TRANSFORMED_PERSON)?;
            info!(count = transformed.len(), "Records transformed");
            write_output(output.output.as_deref(), |w| {
                write_entities(w, &transformed, output_format)
            })
        }
        Command::Validate {
            input,
            transformed,
            output,
        } => {
            let class = if transformed {
                Registry::TRANSFORMED_PERSON
            } else {
                Registry::PERSON
            };
            let registry = Registry::default();
            let reports = read_records(&input)?
                .iter()
                .map(|record| validate_record(&registry, class, record))
                .collect::<Vec<_>>();
            let invalid = reports
                .iter()
                .filter(|report| report["valid"] != Value::Bool(true))
                .count();
            write_output(output.output.as_deref(), |w| {
                serde_json::to_writer_pretty(&mut *w, &reports)?;
                writeln!(w)?;
                Ok(())
            })?;
            if invalid > 0 {
                bail!("{invalid} of {} records are invalid", reports.len());
            }
            Ok(())
        }
        Command::Convert { input, to, output } => {
            let persons = shared(read_persons(&input)?);
            write_output(output.output.as_deref(), |w| {
                write_entities(w, &persons, to)
            })
        }
        Command::Load {
            input,
            transform,
            reference_date,
            graph,
        } => {
            let client = client(&args.endpoint, &args.dataset, args.timeout)?;
            let graph = graph.map(parse_graph).transpose()?;
            let persons = read_persons(&input)?;
            let mut count = store::save_all(&client, &persons, graph.as_ref().map(NamedNode::as_ref))
                .context("Not able to save the person records")?;
            if transform {
                let options = transform_options(reference_date.as_deref())?;
                let transformed = persons
                    .iter()
                    .map(|person| oxperson::transform(person, options.reference_date()))
                    .collect::<Result<Vec<_>, _>>()?;
                count += store::save_all(
                    &client,
                    &transformed,
                    graph.as_ref().map(NamedNode::as_ref),
                )
                .context("Not able to save the transformed person records")?;
            }
            eprintln!("{count} records saved");
            Ok(())
        }
        Command::Query { query, query_file } => {
            let query = if let Some(query) = query {
                query
            } else if let Some(query_file) = query_file {
                fs::read_to_string(&query_file).with_context(|| {
                    format!("Not able to read query file {}", query_file.display())
                })?
            } else {
                io::read_to_string(stdin().lock())?
            };
            let client = client(&args.endpoint, &args.dataset, args.timeout)?;
            let result = if is_ask_query(&query) {
                Value::Bool(client.ask(&query)?)
            } else {
                let solutions = client.query(&query)?;
                Value::Array(
                    solutions
                        .iter()
                        .map(|solution| {
                            Value::Object(
                                solution
                                    .iter()
                                    .map(|(variable, term)| {
                                        (variable.as_str().to_owned(), term_to_json(term))
                                    })
                                    .collect(),
                            )
                        })
                        .collect(),
                )
            };
            let mut stdout = stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &result)?;
            writeln!(stdout)?;
            Ok(())
        }
        Command::Fetch {
            transformed,
            graph,
            output_format,
            output,
        } => {
            let client = client(&args.endpoint, &args.dataset, args.timeout)?;
            let graph = graph.map(parse_graph).transpose()?;
            let graph = graph.as_ref().map(NamedNode::as_ref);
            let records = if transformed {
                shared(store::load_transformed_persons(&client, graph)?)
            } else {
                shared(store::load_persons(&client, graph)?)
            };
            write_output(output.output.as_deref(), |w| {
                write_entities(w, &records, output_format)
            })
        }
        Command::Clear { graph } => {
            let client = client(&args.endpoint, &args.dataset, args.timeout)?;
            let graph = graph.map(parse_graph).transpose()?;
            client.clear(graph.as_ref().map(NamedNode::as_ref))?;
            Ok(())
        }
        Command::Ping => {
            let client = client(&args.endpoint, &args.dataset, args.timeout)?;
            if !client.ping()? {
                bail!(
                    "The triple store at {} is not reachable",
                    client.config().base_url()
                );
            }
            println!("The triple store at {} is reachable", client.config().base_url());
            Ok(())
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn client(endpoint: &str, dataset: &str, timeout: u64) -> anyhow::Result<HttpTriplestore> {
    let config = TriplestoreConfig::new(endpoint).with_dataset(dataset);
    let config = if timeout == 0 {
        config.without_timeout()
    } else {
        config.with_timeout(Duration::from_secs(timeout))
    };
    HttpTriplestore::new(config)
        .with_context(|| format!("Invalid triple store endpoint {endpoint}"))
}

fn parse_graph(graph: String) -> anyhow::Result<NamedNode> {
    NamedNode::new(&graph).with_context(|| format!("Invalid graph name {graph}"))
}

fn transform_options(reference_date: Option<&str>) -> anyhow::Result<TransformOptions> {
    let mut options = TransformOptions::default();
    if let Some(reference_date) = reference_date {
        let date: Date = reference_date
            .parse()
            .with_context(|| format!("Invalid reference date {reference_date}"))?;
        options = options.with_reference_date(date);
    }
    Ok(options)
}

/// A record as found in an input file, not yet interpreted.
enum Record {
    Json(Value),
    Turtle(String),
}

impl Record {
    fn to_person(&self) -> Result<Person, ParseError> {
        match self {
            Self::Json(value) if is_json_ld(value) => Person::from_json_ld(value),
            Self::Json(value) => Ok(Person::from_plain_record(value)?),
            Self::Turtle(document) => Person::from_turtle(document),
        }
    }

    fn to_transformed_person(&self) -> Result<TransformedPerson, ParseError> {
        match self {
            Self::Json(value) if is_json_ld(value) => TransformedPerson::from_json_ld(value),
            Self::Json(value) => Ok(TransformedPerson::from_plain_record(value)?),
            Self::Turtle(document) => TransformedPerson::from_turtle(document),
        }
    }

    fn uri(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value
                .get("uri")
                .or_else(|| value.get("@id"))
                .and_then(Value::as_str),
            Self::Turtle(_) => None,
        }
    }
}

fn is_json_ld(value: &Value) -> bool {
    value.get("@type").is_some()
}

fn read_records(input: &Input) -> anyhow::Result<Vec<Record>> {
    let format = if let Some(format) = input.format {
        format
    } else if let Some(path) = &input.input {
        input_format_from_path(path)?
    } else {
        bail!("The --format option must be set when reading from stdin")
    };
    let content = if let Some(path) = &input.input {
        fs::read_to_string(path)
            .with_context(|| format!("Not able to read input file {}", path.display()))?
    } else {
        io::read_to_string(stdin().lock())?
    };
    let records = match format {
        InputFormat::Ttl => split_blocks(&content)
            .into_iter()
            .map(Record::Turtle)
            .collect(),
        InputFormat::Json => {
            let value: Value =
                serde_json::from_str(&content).context("The input is not valid JSON")?;
            json_records(value)
        }
    };
    debug!(count = records.len(), "Input records read");
    Ok(records)
}

/// Accepts an array of records, a registry export or a single record.
fn json_records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(records) => records.into_iter().map(Record::Json).collect(),
        Value::Object(mut object) if !object.contains_key("@type") => {
            if let Some(Value::Array(records)) = object.remove(Registry::PERSON) {
                records.into_iter().map(Record::Json).collect()
            } else if let Some(Value::Array(records)) = object.remove(Registry::TRANSFORMED_PERSON)
            {
                records.into_iter().map(Record::Json).collect()
            } else {
                vec![Record::Json(Value::Object(object))]
            }
        }
        value => vec![Record::Json(value)],
    }
}

fn read_persons(input: &Input) -> anyhow::Result<Vec<Person>> {
    read_records(input)?
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .to_person()
                .with_context(|| format!("Invalid person record #{}", i + 1))
        })
        .collect()
}

fn validate_record(registry: &Registry, class: &str, record: &Record) -> Value {
    let entity = if class == Registry::TRANSFORMED_PERSON {
        record
            .to_transformed_person()
            .map(|p| -> Arc<dyn Entity> { Arc::new(p) })
    } else {
        record.to_person().map(|p| -> Arc<dyn Entity> { Arc::new(p) })
    };
    match entity {
        Ok(entity) => {
            let report = registry.validate_instance(class, entity.as_ref());
            json!({
                "uri": entity.iri().as_str(),
                "valid": report.is_valid(),
                "errors": report.errors(),
            })
        }
        Err(error) => json!({
            "uri": record.uri(),
            "valid": false,
            "errors": [error.to_string()],
        }),
    }
}

fn shared<T: Entity>(records: Vec<T>) -> Vec<Arc<dyn Entity>> {
    records
        .into_iter()
        .map(|record| -> Arc<dyn Entity> { Arc::new(record) })
        .collect()
}

fn write_entities(
    write: &mut dyn Write,
    entities: &[Arc<dyn Entity>],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Ttl => {
            for (i, entity) in entities.iter().enumerate() {
                if i > 0 {
                    writeln!(write)?;
                }
                write.write_all(entity.to_turtle().as_bytes())?;
            }
        }
        OutputFormat::Jsonld => {
            let documents = entities.iter().map(|e| e.to_json_ld()).collect::<Vec<_>>();
            serde_json::to_writer_pretty(&mut *write, &documents)?;
            writeln!(write)?;
        }
        OutputFormat::Json => {
            let records = entities
                .iter()
                .map(|e| e.to_plain_record())
                .collect::<Vec<_>>();
            serde_json::to_writer_pretty(&mut *write, &records)?;
            writeln!(write)?;
        }
    }
    Ok(())
}

fn write_output(
    path: Option<&Path>,
    write: impl FnOnce(&mut dyn Write) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    if let Some(path) = path {
        let mut file = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Not able to create output file {}", path.display()))?,
        );
        write(&mut file)?;
        close_file_writer(file)?;
    } else {
        let mut stdout = stdout().lock();
        write(&mut stdout)?;
        stdout.flush()?;
    }
    Ok(())
}

fn input_format_from_path(path: &Path) -> anyhow::Result<InputFormat> {
    match path.extension().and_then(OsStr::to_str) {
        Some("json" | "jsonld") => Ok(InputFormat::Json),
        Some("ttl") => Ok(InputFormat::Ttl),
        Some(ext) => bail!(
            "Not able to guess the input format from file name extension '{ext}', use --format"
        ),
        None => bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        ),
    }
}

/// Returns `true` if the first keyword after the prologue is `ASK`.
fn is_ask_query(query: &str) -> bool {
    let mut tokens = query
        .lines()
        .map(strip_comment)
        .flat_map(str::split_whitespace);
    while let Some(token) = tokens.next() {
        let keyword = token.to_ascii_uppercase();
        if keyword.starts_with("PREFIX") || keyword.starts_with("BASE") {
            // a declaration ends with its IRI, possibly glued to the keyword or the prefix name
            if !token.contains('>') {
                tokens.find(|token| token.contains('>'));
            }
            continue;
        }
        return keyword.starts_with("ASK");
    }
    false
}

/// The part of `line` before a `#` comment. A `#` inside an IRI does not start a comment.
fn strip_comment(line: &str) -> &str {
    let mut in_iri = false;
    for (i, c) in line.char_indices() {
        match c {
            '<' => in_iri = true,
            '>' => in_iri = false,
            '#' if !in_iri => return &line[..i],
            _ => (),
        }
    }
    line
}

fn term_to_json(term: &Term) -> Value {
    match term {
        Term::NamedNode(node) => Value::String(node.as_str().to_owned()),
        Term::Literal(literal) => Value::String(literal.value().to_owned()),
        term => Value::String(term.to_string()),
    }
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_is_ask_query() {
        assert!(is_ask_query("ASK { ?s ?p ?o }"));
        assert!(is_ask_query(
            "# comment\nPREFIX ex: <http://example.com/ex#>\nask{ ?s a ex:Person }"
        ));
        assert!(!is_ask_query(
            "PREFIX ex: <http://example.com/ex#> SELECT * WHERE { ?s ?p ?o }"
        ));
        assert!(is_ask_query("PREFIX ex:<http://example.com/ex#> ASK { ?s a ex:Person }"));
        assert!(is_ask_query(
            "BASE <http://example.com/>\nPREFIX ex:\n  <http://example.com/ex#>\nASK {}"
        ));
        assert!(is_ask_query("BASE<http://example.com/> PREFIX :<x#> ASK {}"));
        assert!(!is_ask_query(
            "PREFIX ex:<http://example.com/ex#> # ASK\nSELECT * WHERE { ?s ?p ?o }"
        ));
        assert!(!is_ask_query(""));
    }

    #[test]
    fn test_json_records() {
        assert_eq!(json_records(json!([{}, {}])).len(), 2);
        assert_eq!(
            json_records(json!({"Person": [{}, {}, {}], "TransformedPerson": []})).len(),
            3
        );
        assert_eq!(json_records(json!({"firstName": "Jane"})).len(), 1);
        assert_eq!(json_records(json!({"@type": "ex:Person"})).len(), 1);
    }
}

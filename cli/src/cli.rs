use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxperson")]
/// Person records transformation, validation and triple store loading
pub struct Args {
    /// Base URL of the Fuseki server
    #[arg(long, global = true, default_value = "http://localhost:3030", value_hint = ValueHint::Url)]
    pub endpoint: String,
    /// Name of the Fuseki dataset
    #[arg(long, global = true, default_value = "persons")]
    pub dataset: String,
    /// Timeout of the triple store requests in seconds
    ///
    /// 0 disables the timeout.
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout: u64,
    /// Format of the log messages written to stderr
    ///
    /// The log level is read from the RUST_LOG environment variable.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transform person records into transformed person records
    Transform {
        #[command(flatten)]
        input: Input,
        /// Date at which the ages are computed
        ///
        /// By default, the current day is used.
        #[arg(long)]
        reference_date: Option<String>,
        /// Format of the written records
        #[arg(long, value_enum, default_value_t = OutputFormat::Ttl)]
        output_format: OutputFormat,
        #[command(flatten)]
        output: Output,
    },
    /// Validate records and write a JSON report per record
    ///
    /// The command fails if at least one record is invalid.
    Validate {
        #[command(flatten)]
        input: Input,
        /// Validate transformed person records instead of person records
        #[arg(long)]
        transformed: bool,
        #[command(flatten)]
        output: Output,
    },
    /// Convert person records between Turtle, JSON-LD and plain JSON
    Convert {
        #[command(flatten)]
        input: Input,
        /// Format of the written records
        #[arg(long, value_enum)]
        to: OutputFormat,
        #[command(flatten)]
        output: Output,
    },
    /// Save person records into the triple store
    Load {
        #[command(flatten)]
        input: Input,
        /// Also save the transformed person records
        #[arg(long)]
        transform: bool,
        /// Date at which the ages of the transformed records are computed
        #[arg(long, requires = "transform")]
        reference_date: Option<String>,
        /// Name of the graph to load the records to
        ///
        /// By default, the default graph is used.
        #[arg(long, value_hint = ValueHint::Url)]
        graph: Option<String>,
    },
    /// Evaluate a SPARQL SELECT or ASK query against the triple store
    ///
    /// SELECT solutions are written as a JSON array and ASK results as a JSON boolean.
    Query {
        /// The SPARQL query
        #[arg(short, long, conflicts_with = "query_file")]
        query: Option<String>,
        /// File containing the SPARQL query
        ///
        /// If neither --query nor --query-file is set, the query is read from stdin.
        #[arg(long, value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
    },
    /// Read the person records stored in the triple store
    Fetch {
        /// Read transformed person records instead of person records
        #[arg(long)]
        transformed: bool,
        /// Name of the graph to read from
        #[arg(long, value_hint = ValueHint::Url)]
        graph: Option<String>,
        /// Format of the written records
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output_format: OutputFormat,
        #[command(flatten)]
        output: Output,
    },
    /// Remove all triples of a graph of the triple store
    Clear {
        /// Name of the graph to clear
        ///
        /// By default, the default graph is cleared.
        #[arg(long, value_hint = ValueHint::Url)]
        graph: Option<String>,
    },
    /// Check that the triple store is reachable
    Ping,
}

#[derive(ClapArgs)]
pub struct Input {
    /// File to read the records from
    ///
    /// If no file is given, stdin is read.
    /// In this case, the input format must be specified using the --format option.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,
    /// Format of the input
    ///
    /// By default, the format is guessed from the input file extension.
    #[arg(long, value_enum, required_unless_present = "input")]
    pub format: Option<InputFormat>,
}

#[derive(ClapArgs)]
pub struct Output {
    /// File to write the result to
    ///
    /// If no file is given, stdout is used.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON array of records, single record or registry export (plain or JSON-LD records)
    Json,
    /// Turtle blocks in the fixed shape written by this tool
    Ttl,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Ttl,
    Jsonld,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

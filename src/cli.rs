use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "docrank",
    about = "BM25 document retrieval with IR evaluation metrics"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rebuild the index from the documents directory
    Index(IndexArgs),
    /// Run a single query and print the ranked documents
    Query(QueryArgs),
    /// Read queries interactively until QUIT
    Interactive(InteractiveArgs),
    /// Evaluate every query against the relevance judgments
    Evaluate(EvaluateArgs),
    /// Show index statistics
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

/// Locations of the collection inputs, defaulting to the data directory.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CollectionArgs {
    /// Directory with one plain-text file per document
    #[arg(long)]
    pub documents: Option<PathBuf>,

    /// Whitespace-separated stopword list
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Persisted index file
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Disable stemming (terms are only lowercased)
    #[arg(long)]
    pub no_stem: bool,
}

// -- Index --

#[derive(Debug, Parser)]
pub struct IndexArgs {
    #[command(flatten)]
    pub collection: CollectionArgs,
}

// -- Query --

#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// The query text
    pub query: String,

    /// Number of results to print
    #[arg(short = 'n', long, default_value = "15")]
    pub count: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub collection: CollectionArgs,
}

// -- Interactive --

#[derive(Debug, Parser)]
pub struct InteractiveArgs {
    /// Number of results to print per query
    #[arg(short = 'n', long, default_value = "15")]
    pub count: usize,

    #[command(flatten)]
    pub collection: CollectionArgs,
}

// -- Evaluate --

#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Query list (`<id> <text>` per line)
    #[arg(long)]
    pub queries: Option<PathBuf>,

    /// Relevance judgments (`<qid> <ignored> <docid> <grade>` per line)
    #[arg(long)]
    pub qrels: Option<PathBuf>,

    /// TREC run file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run tag written in the last column of the run file
    #[arg(long, default_value = "docrank")]
    pub run_tag: String,

    /// Print the summary (and per-query metrics) as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub collection: CollectionArgs,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Persisted index file
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docrank",
            &mut std::io::stdout(),
        );
    }
}

use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::Parser;
use docrank::{
    Analyzer,
    Bm25Params,
    DataDir,
    IdentityStemmer,
    IndexStore,
    PorterStemmer,
    QueryEngine,
    Stopwords,
    WeightIndex,
    error::{self, Error},
    evaluation,
    ingestion,
    topics,
};
use rustyline::{DefaultEditor, error::ReadlineError};
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, CollectionArgs, Command};

/// Sentinel that ends an interactive session.
const QUIT: &str = "QUIT";

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCRANK_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    init_tracing(cli.verbose, cli.quiet);
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Index(args) => cmd_index(&data_dir, &args.collection)?,
        Command::Query(args) => {
            let mut engine = open_engine(&data_dir, &args.collection)?;
            let results = engine.search(&args.query, Some(args.count));
            if args.json {
                let out = json!({ "query": args.query, "results": results });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_results(&results);
            }
        }
        Command::Interactive(args) => {
            let mut engine = open_engine(&data_dir, &args.collection)?;
            cmd_interactive(&mut engine, args.count)?;
        }
        Command::Evaluate(args) => cmd_evaluate(&data_dir, &args)?,
        Command::Status(args) => cmd_status(&data_dir, &args)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

/// Resolved locations of the collection inputs.
struct CollectionPaths {
    documents: PathBuf,
    stopwords: PathBuf,
    index: PathBuf,
}

impl CollectionPaths {
    fn resolve(data_dir: &DataDir, args: &CollectionArgs) -> Self {
        Self {
            documents: args
                .documents
                .clone()
                .unwrap_or_else(|| data_dir.documents_dir()),
            stopwords: args
                .stopwords
                .clone()
                .unwrap_or_else(|| data_dir.stopwords()),
            index: args.index.clone().unwrap_or_else(|| data_dir.index_file()),
        }
    }
}

fn build_analyzer(
    paths: &CollectionPaths,
    args: &CollectionArgs,
) -> error::Result<Analyzer> {
    let stopwords = Stopwords::load(&paths.stopwords)?;
    Ok(if args.no_stem {
        Analyzer::new(stopwords, IdentityStemmer)
    } else {
        Analyzer::new(stopwords, PorterStemmer::new())
    })
}

fn open_engine(
    data_dir: &DataDir,
    args: &CollectionArgs,
) -> error::Result<QueryEngine> {
    let paths = CollectionPaths::resolve(data_dir, args);
    let analyzer = build_analyzer(&paths, args)?;
    let store = IndexStore::new(&paths.index);

    let index = ingestion::load_or_index(
        &store,
        &paths.documents,
        &analyzer,
        &Bm25Params::default(),
    )?;
    Ok(QueryEngine::new(index, analyzer))
}

fn cmd_index(data_dir: &DataDir, args: &CollectionArgs) -> error::Result<()> {
    let paths = CollectionPaths::resolve(data_dir, args);
    let analyzer = build_analyzer(&paths, args)?;
    let store = IndexStore::new(&paths.index);

    let index = ingestion::reindex(
        &store,
        &paths.documents,
        &analyzer,
        &Bm25Params::default(),
    )?;

    println!(
        "Indexed {} documents ({} terms) into {}",
        index.doc_count(),
        index.vocabulary().len(),
        store.path().display()
    );
    Ok(())
}

fn print_results(results: &[docrank::RankedDocument]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }
    for r in results {
        println!("{} {} {}", r.rank, r.doc_id, r.score);
    }
}

fn cmd_interactive(
    engine: &mut QueryEngine,
    count: usize,
) -> error::Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Type a query, or {QUIT} to exit.");

    loop {
        match rl.readline("Enter query: ") {
            Ok(line) => {
                let text = line.trim();
                if text == QUIT {
                    println!("Goodbye!");
                    break;
                }
                if text.is_empty() {
                    continue;
                }
                if let Err(err) = rl.add_history_entry(text) {
                    tracing::debug!(%err, "could not record history entry");
                }

                let results = engine.search(text, Some(count));
                println!("Results for query [{text}]");
                print_results(&results);
                println!();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn cmd_evaluate(
    data_dir: &DataDir,
    args: &cli::EvaluateArgs,
) -> error::Result<()> {
    let mut engine = open_engine(data_dir, &args.collection)?;

    let queries_path =
        args.queries.clone().unwrap_or_else(|| data_dir.queries());
    let qrels_path = args.qrels.clone().unwrap_or_else(|| data_dir.qrels());
    let output_path =
        args.output.clone().unwrap_or_else(|| data_dir.run_output());

    let queries = topics::load_queries(&queries_path)?;
    let qrels = topics::load_qrels(&qrels_path)?;

    let file = File::create(&output_path).map_err(|e| Error::Write {
        path: output_path.clone(),
        source: e,
    })?;
    let mut run = BufWriter::new(file);
    let report = evaluation::evaluate(
        &mut engine,
        &queries,
        &qrels,
        &mut run,
        &args.run_tag,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.summary);
        eprintln!("Run written to {}", output_path.display());
    }
    Ok(())
}

fn cmd_status(
    data_dir: &DataDir,
    args: &cli::StatusArgs,
) -> error::Result<()> {
    let store = IndexStore::new(
        args.index.clone().unwrap_or_else(|| data_dir.index_file()),
    );
    if !store.exists() {
        return Err(Error::NotFound {
            kind: "index",
            name: store.path().display().to_string(),
        });
    }
    let index: WeightIndex = store.load()?;

    if args.json {
        let out = json!({
            "data_dir": data_dir.root().display().to_string(),
            "index": store.path().display().to_string(),
            "documents": index.doc_count(),
            "terms": index.vocabulary().len(),
            "entries": index.entry_count(),
        });
        println!("{out}");
    } else {
        println!("Data directory: {}", data_dir.root().display());
        println!("Index: {}", store.path().display());
        println!("Documents: {}", index.doc_count());
        println!("Terms: {}", index.vocabulary().len());
        println!("Entries: {}", index.entry_count());
    }
    Ok(())
}

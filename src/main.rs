use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use srcidx::index::load_corpus;
use srcidx::{output, parse_query, IndexConfig, SearchIndex};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "srcidx")]
#[command(about = "Multi-field source index with dependency cycle detection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus of parsed documents (JSON array or JSON Lines)
    #[arg(short, long, global = true, default_value = "corpus.json")]
    corpus: PathBuf,

    /// Index configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search document content
    Search {
        /// Query, e.g. `Logger pkg:com.x -pkg:com.y word:yes top:10`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,

        /// Print only the number of matching documents
        #[arg(long)]
        count: bool,
    },
    /// Find documents declaring a type
    Type { name: String },
    /// Find documents in a package
    Package { name: String },
    /// Find documents declaring a method
    Method { name: String },
    /// Find documents with an import containing a pattern
    Import { pattern: String },
    /// Show index statistics
    Stats,
    /// List documents affected by changing a type
    Impact {
        /// Simple or package-qualified type name
        type_name: String,
    },
    /// Suggest import clean-ups for one document
    Imports { path: String },
    /// Report import cycles between documents
    Cycles {
        /// Exit with status 1 when a cycle is found
        #[arg(long)]
        fail_on_cycle: bool,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("srcidx: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => IndexConfig::from_file(path)?,
        None => IndexConfig::default(),
    };
    let documents = load_corpus(&cli.corpus)?;
    let color = !cli.no_color;

    let index = SearchIndex::with_config(config);
    index.rebuild(documents);

    let docs = match cli.command {
        Commands::Search { query, count } => {
            let query = parse_query(&query.join(" "));
            let docs = match index.search(&query) {
                Ok(docs) => docs,
                Err(err) => {
                    eprintln!("srcidx: {}", err);
                    return Ok(ExitCode::from(2));
                }
            };
            if count {
                output::print_count(docs.len())?;
                return Ok(ExitCode::SUCCESS);
            }
            docs
        }
        Commands::Type { name } => index.search_by_type(&name),
        Commands::Package { name } => index.search_by_package(&name),
        Commands::Method { name } => index.search_by_method(&name),
        Commands::Import { pattern } => index.search_by_import(&pattern),
        Commands::Stats => {
            output::print_statistics(&index.statistics())?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Impact { type_name } => {
            output::print_impact(&index.analyze_type_change_impact(&type_name), color)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Imports { path } => {
            let Some(result) = index.optimize_imports(&path) else {
                anyhow::bail!("Document not found: {}", path);
            };
            output::print_import_optimization(&result)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Cycles {
            fail_on_cycle,
            json,
        } => {
            let result = index.analyze_dependencies();
            if json {
                let text =
                    serde_json::to_string_pretty(&result).context("Failed to encode analysis")?;
                println!("{}", text);
            } else {
                output::print_cycles(&result, color)?;
            }
            return Ok(if fail_on_cycle && result.has_cycles() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    output::print_documents(&docs, color)?;
    Ok(ExitCode::SUCCESS)
}

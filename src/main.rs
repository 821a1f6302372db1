use clap::{Parser as ClapParser, Subcommand};
use dataql::cli::{self, CheckOptions, CheckResult, CliError, LogLevel, RunOptions, Settings};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "dataql")]
#[command(about = "dataql - request exactly the shape of data you need, within an allow-list")]
#[command(version)]
struct Cli {
    /// Log level: trace, debug, info, warn or error (overrides DATAQL_LOG_LEVEL)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query without running it
    Check {
        /// The query to validate
        query: String,

        /// Print the canonical form of the query
        #[arg(long)]
        canonical: bool,
    },

    /// Run a query against a JSON data document
    Run {
        /// The query to execute
        query: String,

        /// Registry declaration file (JSON)
        #[arg(short, long)]
        registry: PathBuf,

        /// Data document (reads from stdin if not provided)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'dataql docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = settings(cli.log_level).and_then(|settings| {
        cli::init_logging(&settings);
        dispatch(cli.command)
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn settings(flag: Option<LogLevel>) -> Result<Settings, CliError> {
    let settings = Settings::from_env()?;
    Ok(match flag {
        Some(level) => settings.with_log_level(level),
        None => settings,
    })
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Check { query, canonical } => {
            match cli::execute_check(&CheckOptions { query, canonical })? {
                CheckResult::SyntaxValid => println!("Syntax is valid"),
                CheckResult::Canonical(text) => println!("{}", text),
            }
            Ok(())
        }
        Commands::Run {
            query,
            registry,
            data,
            pretty,
        } => run(query, registry, data, pretty),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            print!("{}", cli::get_doc_category(&category)?);
            Ok(())
        }
    }
}

fn run(
    query: String,
    registry: PathBuf,
    data: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    let registry = fs::read_to_string(registry)?;

    let data = match data {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions {
        query,
        registry,
        data,
        pretty,
    };

    println!("{}", cli::execute_run(&options)?);
    Ok(())
}

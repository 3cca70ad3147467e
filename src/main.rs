use clap::{Parser as ClapParser, Subcommand};
use recsel::cli::{self, CheckOptions, CheckResult, CliError};
use std::{
    io::{self, Read},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "recsel")]
#[command(about = "recsel - Type-check record selection queries against a field schema")]
#[command(version)]
struct Cli {
    /// Log analysis details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query against a field schema
    Check {
        /// The query to check (reads from stdin if not provided)
        query: Option<String>,

        /// JSON file mapping field names to types, e.g. {"author": "string"}
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Field declaration as name:type (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Print the processed expression
        #[arg(short, long)]
        print: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            schema,
            fields,
            print,
        } => run_check(query, schema, fields, print),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    query: Option<String>,
    schema_path: Option<PathBuf>,
    fields: Vec<String>,
    print: bool,
) -> Result<(), CliError> {
    let query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoQuery),
    };

    let options = CheckOptions {
        query,
        schema_path,
        fields,
    };

    match cli::execute_check(&options)? {
        CheckResult::Valid(expr) => {
            println!("Query is valid");
            if print {
                println!("{}", expr);
            }
        }
    }
    Ok(())
}

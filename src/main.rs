use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, Subcommand};
use issue_query::cli::{self, CliError, Config, FilterOptions, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "issueq")]
#[command(about = "issueq - filter and sort issue records with a small query language")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/issueq/config.toml)
    #[arg(long, global = true, env = "ISSUEQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter issues read from a file or stdin
    Filter {
        /// The query, e.g. 'status:open priority:0..1 sort by: updated desc'
        query: String,

        /// JSON array or JSON Lines file (reads from stdin if not provided)
        #[arg(short, long, env = "ISSUEQ_INPUT")]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Evaluate relative dates against this RFC 3339 timestamp
        #[arg(long)]
        now: Option<String>,
    },

    /// Parse a query and print its canonical form
    Check {
        query: String,
    },

    /// Print the tokens of a query
    Tokens {
        query: String,
    },

    /// List queryable fields and their aliases
    Fields,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Commands::Filter {
            query,
            input,
            format,
            pretty,
            now,
        } => run_filter(&config, query, input, format, pretty, now),
        Commands::Check { query } => cli::execute_check(&query).map(|out| println!("{}", out)),
        Commands::Tokens { query } => cli::execute_tokens(&query).map(|out| print!("{}", out)),
        Commands::Fields => {
            print!("{}", cli::fields_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_filter(
    config: &Config,
    query: String,
    input: Option<PathBuf>,
    format: Option<OutputFormat>,
    pretty: bool,
    now: Option<String>,
) -> Result<(), CliError> {
    let input = match input {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = FilterOptions {
        query,
        input,
        format: format.unwrap_or(config.format),
        pretty: pretty || config.pretty,
        now,
        default_sort: config.default_sort.clone(),
    };

    let out = cli::execute_filter(&options)?;
    if out.ends_with('\n') {
        print!("{}", out);
    } else {
        println!("{}", out);
    }
    Ok(())
}

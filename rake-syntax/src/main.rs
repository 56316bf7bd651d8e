use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rake_syntax::parser::Lexer;
use rake_syntax::{ErrorMode, ParseOptions};

#[derive(Parser)]
#[command(name = "rake-syntax")]
#[command(about = "Lexer and parser front-end for the Rake vector language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// Source file
        input: String,
    },

    /// Parse a source file and print its AST
    Parse {
        /// Source file
        input: String,

        /// Stop at the first error instead of collecting all of them
        #[arg(long)]
        fail_fast: bool,

        /// Only report errors, do not print the AST
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tokens { input } => {
            let source = fs::read_to_string(&input)?;
            let mut failed = false;
            for item in Lexer::new(&source) {
                match item {
                    Ok(token) => println!(
                        "{:>4}:{:<3} {:<12} {:?}",
                        token.span.line,
                        token.span.column,
                        format!("{:?}", token.kind),
                        token.lexeme
                    ),
                    Err(e) => {
                        failed = true;
                        eprintln!("{}: {}", input, e);
                    }
                }
            }
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Commands::Parse { input, fail_fast, quiet } => {
            let options = ParseOptions {
                mode: if fail_fast {
                    ErrorMode::FailFast
                } else {
                    ErrorMode::CollectAll
                },
            };
            let parsed = rake_syntax::parse_file(&input, &options)?;

            if !quiet {
                println!("{:#?}", parsed.file);
            }
            if parsed.is_ok() {
                return Ok(ExitCode::SUCCESS);
            }
            eprintln!("{}", parsed.diagnostics);
            if parsed.diagnostics.has_internal_errors() {
                eprintln!(
                    "note: internal parser errors indicate a bug in rake-syntax, not in the input"
                );
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

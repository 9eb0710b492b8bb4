//! semindex CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use semindex::cli::Cli;
use semindex::error::Error;
use semindex::index;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());
    let quiet = cli.quiet;

    // Run the command and handle errors
    match run(cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli, json: bool) -> Result<(), Error> {
    let quiet = cli.quiet;
    let config = cli.into_config()?;
    let outcome = index::run(&config)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "namespace": config.namespace,
                "artifacts_dir": outcome.artifacts_dir,
                "stats": outcome.stats,
                "manifest": outcome.manifest,
                "columnar": outcome.columnar,
                "report": outcome.report,
            })
        );
    } else if !quiet {
        println!(
            "{} embeddings updated under {}",
            "✓".green(),
            outcome.artifacts_dir.display()
        );
    }

    Ok(())
}

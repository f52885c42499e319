use clap::Parser as _;
use retrace::{
    analyzer::PartialParse, grammar::GrammarKind, parser::alternatives, run_with, Error,
    ParseOptions, RetraceResult,
};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grammar applied to every input line
    #[arg(short, long, value_enum)]
    grammar: GrammarKind,

    /// Input file, stdin when absent
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to a JSON file with parse options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Accept a parse that leaves input unconsumed
    #[arg(short, long)]
    partial: bool,

    /// Print every alternative of the first line instead
    #[arg(short, long)]
    all: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

/// Returns whether every line parsed.
fn run(cli: &Cli) -> RetraceResult<bool> {
    let mut options = match &cli.config {
        Some(path) => ParseOptions::from_file(path)?,
        None => ParseOptions::default(),
    };
    if cli.partial {
        options.require_complete = false;
    }
    debug!("options: {:?}", options);

    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let parser = cli.grammar.parser();
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    if cli.all {
        let Some((number, line)) = lines.next() else {
            return Err(Error::internal("no input line to enumerate"));
        };
        for PartialParse { value, rest } in alternatives(&parser, line) {
            println!("{}", json!({ "line": number, "value": value, "rest": rest }));
        }
        return Ok(true);
    }

    let mut ok = true;
    for (number, line) in lines {
        match run_with(&parser, line, &options) {
            Ok(value) => println!("{}", json!({ "line": number, "value": value })),
            Err(error) => {
                ok = false;
                println!("{}", json!({ "line": number, "error": error.to_string() }));
            }
        }
    }
    info!(grammar = ?cli.grammar, ok, "input processed");
    Ok(ok)
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

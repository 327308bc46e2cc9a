mod debug_report;

use clap::Parser;
use short_order::world::{State, demo};
use short_order::{Options, interpret_verbose_with};
use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interpret food and drink orders against the built-in demo menu.
///
/// Each utterance is applied in turn to the same cart, so later ones can
/// refer to items added earlier ("a latte", "make it large").
#[derive(Parser)]
#[command(name = "short-order", version, about, long_about = None)]
struct Cli {
    /// Utterances to interpret. Reads one per stdin line when omitted.
    utterances: Vec<String>,

    /// Drop lattice edges scoring below this.
    #[arg(long, default_value_t = Options::default().score_threshold)]
    threshold: f64,

    /// Show every candidate tokenization and timings.
    #[arg(long, short)]
    verbose: bool,

    /// Force ANSI color output.
    #[arg(long)]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let color = if cli.no_color { false } else { cli.color || io::stdout().is_terminal() };

    let (world, lexer) = match demo::coffee_shop() {
        Ok(menu) => menu,
        Err(err) => {
            eprintln!("error: demo menu: {err}");
            return ExitCode::FAILURE;
        }
    };

    let utterances = if cli.utterances.is_empty() {
        match read_stdin_lines() {
            Ok(lines) => lines,
            Err(err) => {
                eprintln!("error: failed to read stdin: {err}");
                return ExitCode::from(2);
            }
        }
    } else {
        cli.utterances
    };
    if utterances.is_empty() {
        eprintln!("error: no input provided");
        return ExitCode::from(2);
    }

    let options = Options { score_threshold: cli.threshold };
    let mut state = State::new();
    for utterance in &utterances {
        let run = interpret_verbose_with(&world, &lexer, utterance, &state, &options);
        debug_report::print_run(&world, &run, cli.verbose, color);
        state = run.result.state;
    }
    ExitCode::SUCCESS
}

fn read_stdin_lines() -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

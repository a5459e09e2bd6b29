use bitinc::{parse_input, MachineEngine, MAX_EXECUTION_STEPS};
use clap::Parser;
use std::error::Error;
use std::io::{self, BufRead, Write};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The number to increment, a binary digit followed by '!'.
    /// If not provided, it is read from stdin.
    #[clap(short, long)]
    input: Option<String>,

    /// Print the run report as JSON
    #[clap(long)]
    json: bool,

    /// Maximum number of transitions before the run is aborted
    #[clap(long, default_value_t = MAX_EXECUTION_STEPS)]
    step_limit: usize,

    /// Log filter, e.g. "info" or "bitinc=debug"
    #[clap(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let line = match cli.input {
        Some(input) => input,
        None => read_line()?,
    };

    let tape = match parse_input(&line) {
        Ok(tape) => tape,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Make sure you enter a one-digit binary number followed by '!', e.g. 0!");
            std::process::exit(1);
        }
    };

    let mut machine = MachineEngine::new().with_step_limit(cli.step_limit);
    machine.load(&tape)?;
    machine.run()?;

    let report = machine
        .report()
        .ok_or("machine did not produce a report")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for record in &report.trace {
            println!("{}", record);
        }
        println!("{}", report);
    }

    Ok(())
}

/// Reads one line from stdin, prompting first when a user is at the terminal.
fn read_line() -> io::Result<String> {
    if atty::is(atty::Stream::Stdin) {
        println!("Enter a one-digit binary number followed by '!':");
        io::stdout().flush()?;
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use weather_events::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Cancel the running command on CTRL+C; it flushes what it has written and stops
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                    signal_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C signal handler: {}", e),
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(_report) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Weather Events - Station Temperature Extremes");
    println!("=============================================");
    println!();
    println!("Track the highest and lowest temperature per station over a stream of");
    println!("newline-delimited JSON events, emitting snapshot and reset records on demand.");
    println!();
    println!("USAGE:");
    println!("    weather-events <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process an event stream and write output records");
    println!("    validate    Check an event stream without writing output records");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process events from stdin, records to stdout:");
    println!("    cat events.ndjson | weather-events process");
    println!();
    println!("    # Process a file, writing records to another file:");
    println!("    weather-events process -i events.ndjson -o records.ndjson");
    println!();
    println!("    # Check a file and print a JSON report:");
    println!("    weather-events validate -i events.ndjson --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    weather-events <COMMAND> --help");
}

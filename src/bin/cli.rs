//! goallog CLI Client
//!
//! Command-line interface for interacting with a goallog server.

use clap::{Args as ClapArgs, Parser, Subcommand};
use goallog::client::Client;
use goallog::protocol::Response;
use goallog::Log;

/// goallog CLI
#[derive(Parser, Debug)]
#[command(name = "goallog-cli")]
#[command(about = "CLI for the goallog service")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all logs
    List,

    /// Get a log by id
    Get {
        /// The id to fetch
        id: String,
    },

    /// Create a log
    Create(LogArgs),

    /// Replace a log by id
    Update {
        /// The id to replace
        id: String,

        #[command(flatten)]
        log: LogArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct LogArgs {
    /// Date as YYYY-MM-DD
    #[arg(short, long)]
    date: String,

    /// Free-text notes
    #[arg(short, long, default_value = "")]
    notes: String,

    /// The goal for the day
    #[arg(short, long, default_value = "")]
    goal: String,

    /// Mark the goal as accomplished
    #[arg(short, long)]
    accomplished: bool,
}

impl From<LogArgs> for Log {
    fn from(args: LogArgs) -> Self {
        Log::new(args.date, args.notes, args.goal, args.accomplished)
    }
}

fn main() {
    let args = Args::parse();
    let client = match Client::new(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::List => client.list(),
        Commands::Get { id } => client.get(&id),
        Commands::Create(log) => client.create(&log.into()),
        Commands::Update { id, log } => client.update(&id, &log.into()),
    };

    match result {
        Ok(response) => print_response(&response),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_response(response: &Response) {
    println!("{} {}", response.status.as_u16(), response.status.canonical_reason().unwrap_or(""));
    if !response.body.is_empty() {
        println!("{}", response.text());
    }
    if response.status.as_u16() >= 400 {
        std::process::exit(2);
    }
}

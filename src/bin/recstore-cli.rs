//! RECSTORE CLI
//!
//! Interactive command-line shell over an in-memory record store.

use clap::Parser;
use recstore::{Shell, ShellConfig};
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// RECSTORE CLI - Interactive Record Store Shell
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Prompt shown before each command
    #[arg(long, default_value = "recstore> ")]
    prompt: String,

    /// Sweep expired records after every N commands (0 = only on SWEEP)
    #[arg(long, default_value_t = 0)]
    sweep_interval: u64,

    /// Run these commands and exit instead of reading stdin
    #[arg(short, long = "command")]
    commands: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("recstore=info".parse()?))
        .init();

    let args = Args::parse();

    let config = ShellConfig::default()
        .with_prompt(args.prompt)
        .with_sweep_interval(args.sweep_interval);
    let mut shell = Shell::new(config);

    if !args.commands.is_empty() {
        for line in &args.commands {
            println!("{}", shell.handle_line(line));
        }
        return Ok(());
    }

    info!(sweep_interval = args.sweep_interval, "Starting shell");
    println!("Type 'help' for available commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        print!("{}", shell.config().prompt);
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if line.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        println!("{}", shell.handle_line(line));
    }

    info!("{}", shell.metrics().summary());
    Ok(())
}

fn print_help() {
    println!(
        r#"
Available commands:

  SET <id> <field> <value>  - Set a field on a record
  GET <id> <field>          - Get a field value
  DELF <id> <field>         - Delete a field (record goes with its last field)
  DEL <id>                  - Delete a record
  FIELDS <id>               - List field names of a record
  EXISTS <id>               - Check if a record exists
  KEYS                      - List all record ids
  FIND <field> <value>      - Ids of records where field equals value
  EXPIRE <id> <seconds>     - Set a record's TTL
  TTL <id>                  - Seconds left before a record expires
  SWEEP                     - Remove all expired records
  BACKUP                    - Save a snapshot for this session
  RESTORE                   - Replace the store with the saved snapshot
  DUMP                      - Print every record
  COUNT                     - Number of records
  STATS                     - Command metrics

  help                      - Show this help
  quit / exit               - Exit the shell

Arguments containing spaces may be double-quoted:
  SET user_001 name "Alice Johnson"
  EXPIRE session_001 30
  FIND department Engineering
"#
    );
}

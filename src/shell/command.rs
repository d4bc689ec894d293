//! Shell Command Parsing
//!
//! Parses one input line into a store operation.

use thiserror::Error;

/// Errors produced while parsing an input line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}. Type 'help' for available commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not an integer: {0}")]
    InvalidInteger(String),

    #[error("Unterminated quoted argument")]
    UnterminatedQuote,
}

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set a field on a record
    Set {
        id: String,
        field: String,
        value: String,
    },

    /// Read one field
    Get { id: String, field: String },

    /// Delete one field
    DeleteField { id: String, field: String },

    /// Delete a whole record
    DeleteRecord { id: String },

    /// List field names of a record
    Fields { id: String },

    /// Check if a record exists
    Exists { id: String },

    /// List all record ids
    Keys,

    /// Ids of records where field == value
    Find { field: String, value: String },

    /// Set a TTL in seconds
    Expire { id: String, secs: i64 },

    /// Remaining TTL of a record
    Ttl { id: String },

    /// Remove every expired record
    Sweep,

    /// Save a snapshot into the session slot
    Backup,

    /// Replace the store with the session snapshot
    Restore,

    /// Print every live record
    Dump,

    /// Number of live records
    Count,

    /// Session metrics
    Stats,
}

impl Command {
    /// Parse a command line
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let parts = split_args(input)?;
        let Some((verb, args)) = parts.split_first() else {
            return Err(CommandError::Empty);
        };

        let verb = verb.to_uppercase();
        let cmd = match verb.as_str() {
            "SET" => {
                let [id, field, value] = take::<3>(args, "SET <id> <field> <value>")?;
                Command::Set { id, field, value }
            }
            "GET" => {
                let [id, field] = take::<2>(args, "GET <id> <field>")?;
                Command::Get { id, field }
            }
            "DELF" => {
                let [id, field] = take::<2>(args, "DELF <id> <field>")?;
                Command::DeleteField { id, field }
            }
            "DEL" => {
                let [id] = take::<1>(args, "DEL <id>")?;
                Command::DeleteRecord { id }
            }
            "FIELDS" => {
                let [id] = take::<1>(args, "FIELDS <id>")?;
                Command::Fields { id }
            }
            "EXISTS" => {
                let [id] = take::<1>(args, "EXISTS <id>")?;
                Command::Exists { id }
            }
            "KEYS" => {
                take::<0>(args, "KEYS")?;
                Command::Keys
            }
            "FIND" => {
                let [field, value] = take::<2>(args, "FIND <field> <value>")?;
                Command::Find { field, value }
            }
            "EXPIRE" => {
                let [id, secs] = take::<2>(args, "EXPIRE <id> <seconds>")?;
                let secs = secs
                    .parse::<i64>()
                    .map_err(|_| CommandError::InvalidInteger(secs))?;
                Command::Expire { id, secs }
            }
            "TTL" => {
                let [id] = take::<1>(args, "TTL <id>")?;
                Command::Ttl { id }
            }
            "SWEEP" => {
                take::<0>(args, "SWEEP")?;
                Command::Sweep
            }
            "BACKUP" => {
                take::<0>(args, "BACKUP")?;
                Command::Backup
            }
            "RESTORE" => {
                take::<0>(args, "RESTORE")?;
                Command::Restore
            }
            "DUMP" => {
                take::<0>(args, "DUMP")?;
                Command::Dump
            }
            "COUNT" => {
                take::<0>(args, "COUNT")?;
                Command::Count
            }
            "STATS" => {
                take::<0>(args, "STATS")?;
                Command::Stats
            }
            _ => return Err(CommandError::Unknown(verb)),
        };

        Ok(cmd)
    }

    /// Verb name, used as the metrics key
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::DeleteField { .. } => "DELF",
            Command::DeleteRecord { .. } => "DEL",
            Command::Fields { .. } => "FIELDS",
            Command::Exists { .. } => "EXISTS",
            Command::Keys => "KEYS",
            Command::Find { .. } => "FIND",
            Command::Expire { .. } => "EXPIRE",
            Command::Ttl { .. } => "TTL",
            Command::Sweep => "SWEEP",
            Command::Backup => "BACKUP",
            Command::Restore => "RESTORE",
            Command::Dump => "DUMP",
            Command::Count => "COUNT",
            Command::Stats => "STATS",
        }
    }
}

fn take<const N: usize>(args: &[String], usage: &'static str) -> Result<[String; N], CommandError> {
    <[String; N]>::try_from(args.to_vec()).map_err(|_| CommandError::Usage(usage))
}

/// Split a line on whitespace, honouring double-quoted arguments.
///
/// Inside quotes `\"`, `\\` and `\n` are recognised.
fn split_args(input: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut arg = String::new();
        if first == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => arg.push('\n'),
                        Some(c) => arg.push(c),
                        None => return Err(CommandError::UnterminatedQuote),
                    },
                    Some(c) => arg.push(c),
                    None => return Err(CommandError::UnterminatedQuote),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                arg.push(c);
            }
        }
        args.push(arg);
    }

    Ok(args)
}

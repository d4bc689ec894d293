//! Shell Replies
//!
//! Result shapes of executed commands and how they print.

use std::fmt;

/// Reply to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Simple OK reply
    Ok,

    /// Absent value
    Nil,

    /// Field value
    Value(String),

    /// Success flag of a delete or existence check
    Bool(bool),

    /// Count
    Integer(i64),

    /// List of ids or field names
    Array(Vec<String>),

    /// Free-form text (dumps, stats)
    Text(String),

    /// Error reply
    Error(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Value(value) => write!(f, "{:?}", value),
            Reply::Bool(flag) => write!(f, "({})", flag),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {:?}", i + 1, item)?;
                }
                Ok(())
            }
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Error(msg) => write!(f, "(error) {}", msg),
        }
    }
}

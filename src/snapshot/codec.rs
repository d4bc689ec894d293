//! Snapshot Codec
//!
//! Line-oriented text encoding of a store's live contents.
//!
//! Layout (one item per line, counts and TTLs in decimal):
//!
//! ```text
//! <record count>
//!   <record id>
//!   <field count>
//!     <field name>
//!     <field value>
//! <ttl count>
//!   <record id>
//!   <remaining seconds>
//! ```
//!
//! Text lines escape `\` as `\\`, LF as `\n` and CR as `\r`, so ids and
//! values may hold any character. Text without those characters is written
//! verbatim.

use hashbrown::HashSet;
use std::borrow::Cow;
use std::time::Duration;

use super::SnapshotError;

/// One record as carried by a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub id: String,
    pub fields: Vec<(String, String)>,
}

/// Decoded snapshot contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotData {
    pub records: Vec<SnapshotRecord>,
    /// Remaining seconds per record id, relative to the encoding instant
    pub ttls: Vec<(String, i64)>,
}

/// Whole seconds left, rounded up so a live record never encodes as zero
pub fn remaining_secs(left: Duration) -> i64 {
    let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Encode snapshot contents to text
pub fn encode(data: &SnapshotData) -> String {
    let mut out = String::new();

    push_line(&mut out, &data.records.len().to_string());
    for record in &data.records {
        push_line(&mut out, &escape(&record.id));
        push_line(&mut out, &record.fields.len().to_string());
        for (field, value) in &record.fields {
            push_line(&mut out, &escape(field));
            push_line(&mut out, &escape(value));
        }
    }

    push_line(&mut out, &data.ttls.len().to_string());
    for (id, secs) in &data.ttls {
        push_line(&mut out, &escape(id));
        push_line(&mut out, &secs.to_string());
    }

    out
}

/// Decode snapshot text, validating its structure
pub fn decode(text: &str) -> Result<SnapshotData, SnapshotError> {
    let mut reader = LineReader::new(text);

    let record_count = reader.count("record count")?;
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    for _ in 0..record_count {
        let id = reader.text("record id")?;
        if !seen_ids.insert(id.clone()) {
            return Err(SnapshotError::DuplicateRecord { id });
        }

        let field_count = reader.count("field count")?;
        if field_count == 0 {
            return Err(SnapshotError::EmptyRecord { id });
        }

        let mut fields = Vec::new();
        let mut seen_fields = HashSet::new();
        for _ in 0..field_count {
            let field = reader.text("field name")?;
            let value = reader.text("field value")?;
            if !seen_fields.insert(field.clone()) {
                return Err(SnapshotError::DuplicateField { id, field });
            }
            fields.push((field, value));
        }

        records.push(SnapshotRecord { id, fields });
    }

    let ttl_count = reader.count("ttl count")?;
    let mut ttls = Vec::new();
    let mut seen_ttls = HashSet::new();

    for _ in 0..ttl_count {
        let id = reader.text("ttl record id")?;
        let secs = reader.ttl()?;
        if !seen_ids.contains(&id) {
            return Err(SnapshotError::UnknownTtlRecord { id });
        }
        if !seen_ttls.insert(id.clone()) {
            return Err(SnapshotError::DuplicateTtl { id });
        }
        ttls.push((id, secs));
    }

    reader.finish()?;

    Ok(SnapshotData { records, ttls })
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '\n', '\r']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn unescape(line: &str, line_no: usize) -> Result<String, SnapshotError> {
    if !line.contains('\\') {
        return Ok(line.to_string());
    }

    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            _ => return Err(SnapshotError::InvalidEscape { line: line_no }),
        }
    }
    Ok(out)
}

/// `line` if it is a non-empty run of ASCII digits (no sign, no spaces)
fn digits(line: &str) -> Option<&str> {
    (!line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())).then_some(line)
}

/// Cursor over snapshot lines with position tracking
struct LineReader<'a> {
    lines: std::str::Split<'a, char>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        // Every line, including the last, is newline-terminated
        let body = text.strip_suffix('\n').unwrap_or(text);
        Self {
            lines: body.split('\n'),
            line_no: 0,
        }
    }

    fn next_line(&mut self, expected: &'static str) -> Result<&'a str, SnapshotError> {
        let line = self
            .lines
            .next()
            .ok_or(SnapshotError::Truncated { expected })?;
        self.line_no += 1;
        Ok(line)
    }

    fn text(&mut self, expected: &'static str) -> Result<String, SnapshotError> {
        let line = self.next_line(expected)?;
        unescape(line, self.line_no)
    }

    fn count(&mut self, expected: &'static str) -> Result<usize, SnapshotError> {
        let line = self.next_line(expected)?;
        digits(line)
            .and_then(|d| d.parse().ok())
            .ok_or_else(|| SnapshotError::InvalidCount {
                line: self.line_no,
                found: line.to_string(),
            })
    }

    /// Remaining seconds; always a strictly positive plain decimal
    fn ttl(&mut self) -> Result<i64, SnapshotError> {
        let line = self.next_line("ttl seconds")?;
        digits(line)
            .and_then(|d| d.parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .ok_or_else(|| SnapshotError::InvalidTtl {
                line: self.line_no,
                found: line.to_string(),
            })
    }

    fn finish(mut self) -> Result<(), SnapshotError> {
        match self.lines.next() {
            Some(_) => Err(SnapshotError::TrailingData {
                line: self.line_no + 1,
            }),
            None => Ok(()),
        }
    }
}

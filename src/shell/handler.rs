//! Shell Handler
//!
//! Executes parsed commands against a record store.

use std::time::Instant;
use tracing::debug;

use super::{Command, Reply, ShellConfig};
use crate::metrics::Metrics;
use crate::snapshot::codec;
use crate::storage::RecordStore;

/// Interactive session over one store
pub struct Shell {
    store: RecordStore,
    config: ShellConfig,
    metrics: Metrics,
    /// Snapshot taken by the last BACKUP
    saved: Option<String>,
    commands_since_sweep: u64,
}

impl Shell {
    /// Create a shell over a new empty store
    pub fn new(config: ShellConfig) -> Self {
        Self::with_store(RecordStore::new(), config)
    }

    /// Create a shell over an existing store
    pub fn with_store(store: RecordStore, config: ShellConfig) -> Self {
        Self {
            store,
            config,
            metrics: Metrics::new(),
            saved: None,
            commands_since_sweep: 0,
        }
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(cmd) => self.run(cmd),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    /// Execute a command, recording metrics and driving the periodic sweep
    pub fn run(&mut self, cmd: Command) -> Reply {
        let start = Instant::now();
        let name = cmd.name();

        let reply = self.execute(cmd);

        let elapsed = start.elapsed();
        self.metrics.record_operation(name, elapsed);
        debug!(cmd = name, latency = ?elapsed, "Command executed");

        self.tick_sweep();
        reply
    }

    fn tick_sweep(&mut self) {
        if self.config.sweep_interval == 0 {
            return;
        }
        self.commands_since_sweep += 1;
        if self.commands_since_sweep >= self.config.sweep_interval {
            self.commands_since_sweep = 0;
            let removed = self.store.expire_records();
            if removed > 0 {
                debug!(removed, "Periodic sweep");
            }
        }
    }

    /// Execute a command and return its reply
    fn execute(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Set { id, field, value } => {
                self.store.set(&id, &field, &value);
                Reply::Ok
            }

            Command::Get { id, field } => match self.store.get(&id, &field) {
                Some(value) => Reply::Value(value),
                None => Reply::Nil,
            },

            Command::DeleteField { id, field } => Reply::Bool(self.store.delete_field(&id, &field)),

            Command::DeleteRecord { id } => Reply::Bool(self.store.delete_record(&id)),

            Command::Fields { id } => Reply::Array(self.store.fields(&id)),

            Command::Exists { id } => Reply::Bool(self.store.has_record(&id)),

            Command::Keys => Reply::Array(self.store.record_ids()),

            Command::Find { field, value } => {
                Reply::Array(self.store.records_by_field_value(&field, &value))
            }

            Command::Expire { id, secs } => {
                self.store.set_ttl(&id, secs);
                Reply::Ok
            }

            Command::Ttl { id } => match self.store.ttl(&id) {
                Some(left) => Reply::Integer(codec::remaining_secs(left)),
                None => Reply::Nil,
            },

            Command::Sweep => Reply::Integer(count(self.store.expire_records())),

            Command::Backup => {
                let snapshot = self.store.backup();
                let size = snapshot.len();
                self.saved = Some(snapshot);
                Reply::Text(format!("Backup saved ({} bytes)", size))
            }

            Command::Restore => match &self.saved {
                Some(snapshot) => Reply::Bool(self.store.restore(snapshot)),
                None => Reply::Error("No backup in this session".to_string()),
            },

            Command::Dump => Reply::Text(self.store.dump()),

            Command::Count => Reply::Integer(count(self.store.len())),

            Command::Stats => {
                let mut text = self.metrics.summary();
                for (name, ops) in self.metrics.ops_by_command() {
                    text.push_str(&format!("\n  {:<8} {}", name, ops));
                }
                Reply::Text(text)
            }
        }
    }

    /// Get a reference to the store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        Shell::new(ShellConfig::default())
    }

    #[test]
    fn test_field_commands() {
        let mut sh = shell();

        assert_eq!(sh.handle_line("SET u1 name Alice"), Reply::Ok);
        assert_eq!(sh.handle_line("SET u1 age 25"), Reply::Ok);
        assert_eq!(sh.handle_line("GET u1 name"), Reply::Value("Alice".into()));
        assert_eq!(sh.handle_line("GET u1 email"), Reply::Nil);
        assert_eq!(
            sh.handle_line("FIELDS u1"),
            Reply::Array(vec!["age".into(), "name".into()])
        );
        assert_eq!(sh.handle_line("DELF u1 age"), Reply::Bool(true));
        assert_eq!(sh.handle_line("DELF u1 age"), Reply::Bool(false));
        assert_eq!(sh.handle_line("EXISTS u1"), Reply::Bool(true));
        assert_eq!(sh.handle_line("DEL u1"), Reply::Bool(true));
        assert_eq!(sh.handle_line("EXISTS u1"), Reply::Bool(false));
    }

    #[test]
    fn test_find_and_keys() {
        let mut sh = shell();
        sh.handle_line("SET a k v");
        sh.handle_line("SET b k v");
        sh.handle_line("SET c k w");

        assert_eq!(
            sh.handle_line("FIND k v"),
            Reply::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            sh.handle_line("KEYS"),
            Reply::Array(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(sh.handle_line("COUNT"), Reply::Integer(3));
    }

    #[test]
    fn test_ttl_commands() {
        let mut sh = shell();
        sh.handle_line("SET s status active");

        assert_eq!(sh.handle_line("TTL s"), Reply::Nil);
        assert_eq!(sh.handle_line("EXPIRE s 60"), Reply::Ok);
        assert_eq!(sh.handle_line("TTL s"), Reply::Integer(60));

        sh.handle_line("EXPIRE s 0");
        assert_eq!(sh.handle_line("EXISTS s"), Reply::Bool(false));
        assert_eq!(sh.handle_line("SWEEP"), Reply::Integer(1));
        assert_eq!(sh.handle_line("SWEEP"), Reply::Integer(0));
    }

    #[test]
    fn test_backup_and_restore() {
        let mut sh = shell();

        assert!(matches!(sh.handle_line("RESTORE"), Reply::Error(_)));

        sh.handle_line("SET u1 name Alice");
        assert!(matches!(sh.handle_line("BACKUP"), Reply::Text(_)));
        sh.handle_line("DEL u1");
        sh.handle_line("SET tmp f v");

        assert_eq!(sh.handle_line("RESTORE"), Reply::Bool(true));
        assert_eq!(sh.handle_line("KEYS"), Reply::Array(vec!["u1".into()]));
    }

    #[test]
    fn test_periodic_sweep() {
        let mut sh = Shell::new(ShellConfig::default().with_sweep_interval(2));

        sh.handle_line("SET a f v");
        sh.handle_line("EXPIRE a 0");
        // Two commands ran, so the sweep already purged `a`
        assert_eq!(sh.handle_line("SWEEP"), Reply::Integer(0));

        let mut manual = shell();
        manual.handle_line("SET a f v");
        manual.handle_line("EXPIRE a 0");
        assert_eq!(manual.handle_line("SWEEP"), Reply::Integer(1));
    }

    #[test]
    fn test_errors_and_metrics() {
        let mut sh = shell();

        assert!(matches!(sh.handle_line("GET onlyone"), Reply::Error(_)));
        assert!(matches!(sh.handle_line("NOPE"), Reply::Error(_)));

        sh.handle_line("SET a f v");
        sh.handle_line("GET a f");
        sh.handle_line("GET a g");

        assert_eq!(sh.metrics().total_ops(), 3);
        assert_eq!(sh.metrics().ops_by_command(), vec![("GET", 2), ("SET", 1)]);
        match sh.handle_line("STATS") {
            Reply::Text(text) => assert!(text.contains("GET")),
            other => panic!("Expected text reply, got {:?}", other),
        }
    }
}

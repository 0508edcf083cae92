//! Append-only audit trail of rejected records.
//!
//! Every row the store rejects for uniqueness is appended here as one line:
//!
//! ```text
//! [INFO][<RFC3339 UTC timestamp>] - <comma-joined field values>
//! ```
//!
//! The file is opened once in append mode and held for the whole run. The
//! ledger is write-only from the pipeline's point of view; an append failure
//! is a misconfiguration of the run and propagates instead of being retried.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};

/// A record that can render itself into ledger field values.
pub trait AuditFields {
    /// Field values in insert-parameter order; absent values render empty.
    fn audit_fields(&self) -> Vec<String>;
}

/// Durably-opened append target for rejected records.
pub struct LoadLedger {
    out: File,
}

impl LoadLedger {
    /// Open the ledger file in append mode, creating it if needed.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open load ledger {}", path.display()))?;
        Ok(Self { out })
    }

    /// Append one rejected record, flushed immediately.
    pub fn append(&mut self, record: &dyn AuditFields) -> anyhow::Result<()> {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        writeln!(
            self.out,
            "[INFO][{stamp}] - {}",
            record.audit_fields().join(",")
        )
        .context("append to load ledger")?;
        self.out.flush().context("flush load ledger")?;
        Ok(())
    }
}

pub(crate) fn opt_str(v: Option<&str>) -> String {
    v.unwrap_or_default().to_string()
}

pub(crate) fn opt_display<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Row;

    impl AuditFields for Row {
        fn audit_fields(&self) -> Vec<String> {
            vec!["A1".into(), String::new(), "1.5".into()]
        }
    }

    #[test]
    fn lines_are_stamped_and_comma_joined() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.log");
        let mut ledger = LoadLedger::open(&path).unwrap();
        ledger.append(&Row).unwrap();
        ledger.append(&Row).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let stamp = line
                .strip_prefix("[INFO][")
                .expect("prefix")
                .split_once(']')
                .expect("stamp close")
                .0;
            chrono::DateTime::parse_from_rfc3339(stamp).expect("rfc3339 stamp");
            let fields = line.split_once("] - ").expect("separator").1;
            assert_eq!(fields, "A1,,1.5");
        }
    }

    #[test]
    fn reopening_appends_rather_than_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.log");
        LoadLedger::open(&path).unwrap().append(&Row).unwrap();
        LoadLedger::open(&path).unwrap().append(&Row).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn optional_renderers_leave_absent_values_empty() {
        assert_eq!(opt_str(None), "");
        assert_eq!(opt_str(Some("x")), "x");
        assert_eq!(opt_display(None::<i64>), "");
        assert_eq!(opt_display(Some(180.5)), "180.5");
    }
}

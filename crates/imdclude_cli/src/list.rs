//! `imdclude --list`: shows every backup in the store.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use imdclude_backup::BackupRecord;
use serde::Serialize;

use crate::settings::Settings;
use crate::ReportFormat;

/// One listed backup in `--format json` output.
#[derive(Debug, Serialize)]
pub struct BackupSummary {
    /// Backup ID, as accepted by `--restore`.
    pub id: String,
    /// Creation time in unix seconds.
    pub timestamp: u32,
    /// Creation time as RFC 3339 (UTC).
    pub created_at: String,
    /// Path the backup restores to.
    pub original_path: String,
    /// Base name of the original document.
    pub name: String,
    /// Content size in bytes.
    pub size_bytes: usize,
    /// xxh3 fingerprint of the content.
    pub content_hash: String,
    /// Location of the backup file.
    pub file: String,
}

impl From<&BackupRecord> for BackupSummary {
    fn from(record: &BackupRecord) -> Self {
        Self {
            id: record.id.clone(),
            timestamp: record.timestamp,
            created_at: utc_time(record.timestamp)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            original_path: record.original_path.display().to_string(),
            name: record.name(),
            size_bytes: record.size_bytes(),
            content_hash: record.content_hash().to_string(),
            file: record.file.display().to_string(),
        }
    }
}

/// Runs the listing and writes it to `out`.
///
/// With `only`, just the backups taken from that document are listed.
pub fn run(
    settings: &Settings,
    format: ReportFormat,
    only: Option<&Path>,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut records = settings.store.list()?;
    if let Some(path) = only {
        records.retain(|r| r.is_of(path));
    }
    tracing::debug!(
        "found {} backup(s) in {}",
        records.len(),
        settings.store.dir().display()
    );

    match format {
        ReportFormat::Text => {
            if records.is_empty() {
                writeln!(out, "listing backups: none found...")?;
            } else {
                writeln!(out, "listing backups:")?;
                for record in &records {
                    writeln!(out, "{}", text_line(record))?;
                }
            }
        }
        ReportFormat::Json => {
            let summaries: Vec<BackupSummary> = records.iter().map(BackupSummary::from).collect();
            serde_json::to_writer_pretty(&mut *out, &summaries)?;
            writeln!(out)?;
        }
    }
    Ok(0)
}

/// `<id> [<local time>] <path> <N>kb <hash>`
fn text_line(record: &BackupRecord) -> String {
    let when = utc_time(record.timestamp)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %z")
                .to_string()
        })
        .unwrap_or_else(|| record.timestamp.to_string());
    format!(
        "{} [{}] {} {}kb {}",
        record.id,
        when,
        record.original_path.display(),
        record.size_bytes() / 1000,
        record.content_hash().short()
    )
}

fn utc_time(timestamp: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(timestamp), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imdclude_backup::BackupStore;
    use imdclude_source::ReaderOptions;
    use std::path::PathBuf;

    fn settings(store_dir: &Path) -> Settings {
        Settings {
            lookup_dir: PathBuf::from("."),
            store: BackupStore::new(store_dir),
            reader: ReaderOptions::default(),
        }
    }

    #[test]
    fn empty_store_says_none_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let code = run(&settings(dir.path()), ReportFormat::Text, None, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "listing backups: none found...\n");
    }

    #[test]
    fn missing_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let result = run(
            &settings(&dir.path().join("absent")),
            ReportFormat::Text,
            None,
            &mut out,
        );
        assert!(result.is_err());
    }

    #[test]
    fn text_lists_each_backup() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let receipt = settings
            .store
            .backup("notes.md", Path::new("/docs/notes.md"), &["hello", "world"])
            .unwrap();

        let mut out = Vec::new();
        run(&settings, ReportFormat::Text, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("listing backups:"));
        let entry = lines.next().unwrap();
        assert!(entry.starts_with(&format!("{} [", receipt.id)));
        assert!(entry.contains("] /docs/notes.md 0kb "));
        assert!(lines.next().is_none());
    }

    #[test]
    fn json_carries_hash_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let receipt = settings
            .store
            .backup("a.md", Path::new("/docs/a.md"), &["abc"])
            .unwrap();

        let mut out = Vec::new();
        run(&settings, ReportFormat::Json, None, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], receipt.id.as_str());
        assert_eq!(entries[0]["name"], "a.md");
        assert_eq!(entries[0]["size_bytes"], 3);
        assert_eq!(entries[0]["content_hash"].as_str().unwrap().len(), 32);
    }

    #[test]
    fn filter_keeps_backups_of_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let kept = settings
            .store
            .backup("a.md", Path::new("/docs/a.md"), &["a"])
            .unwrap();
        settings
            .store
            .backup("b.md", Path::new("/docs/b.md"), &["b"])
            .unwrap();

        let mut out = Vec::new();
        run(
            &settings,
            ReportFormat::Text,
            Some(Path::new("/docs/a.md")),
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let entries: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with(&kept.id));
    }

    #[test]
    fn filter_without_matches_says_none_found() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        settings
            .store
            .backup("b.md", Path::new("/docs/b.md"), &["b"])
            .unwrap();

        let mut out = Vec::new();
        run(
            &settings,
            ReportFormat::Text,
            Some(Path::new("/docs/a.md")),
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "listing backups: none found...\n");
    }

    #[test]
    fn utc_time_of_epoch() {
        let t = utc_time(0).unwrap();
        assert_eq!(t.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }
}

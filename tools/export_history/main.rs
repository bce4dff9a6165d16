//! Export saved keyboard history to JSON, CSV or plain text
//!
//! Usage:
//!   cargo run -p export_history -- --db ~/.arabic-keyboard/history.redb --format json
//!   cargo run -p export_history -- --db history.redb --format csv --output history.csv

use chrono::{TimeZone, Utc};
use clap::Parser;
use libarabic_core::{HistoryEntry, HistoryStore, RedbStore};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "export_history")]
#[command(about = "Export saved keyboard history to JSON, CSV or text")]
struct Args {
    /// Path to the history database
    #[arg(short, long)]
    db: PathBuf,

    /// Output format: json, csv or txt
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Oldest entries first
    #[arg(long)]
    oldest_first: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let history = open_history(&args.db)?;

    let mut entries = history.list();
    if args.oldest_first {
        entries.reverse();
    }

    let output = match args.format.as_str() {
        "json" => export_json(&entries)?,
        "csv" => export_csv(&entries),
        "txt" => export_txt(&entries),
        _ => anyhow::bail!("Unsupported format: {}. Use 'json', 'csv' or 'txt'", args.format),
    };

    if let Some(path) = args.output {
        std::fs::write(path, output)?;
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Open an existing history database. Opening a missing path would create
/// an empty database and export nothing.
fn open_history(path: &Path) -> anyhow::Result<HistoryStore<RedbStore>> {
    if !path.exists() {
        anyhow::bail!("History database not found: {}", path.display());
    }
    let store = RedbStore::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open history db: {}", e))?;
    Ok(HistoryStore::new(store))
}

fn export_json(entries: &[HistoryEntry]) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(entries)?;
    Ok(json)
}

fn saved_at(entry: &HistoryEntry) -> String {
    match Utc.timestamp_millis_opt(entry.timestamp).single() {
        Some(at) => at.to_rfc3339(),
        None => entry.timestamp.to_string(),
    }
}

fn export_csv(entries: &[HistoryEntry]) -> String {
    let mut output = String::from("id,saved_at,text\n");
    for entry in entries {
        let escaped = entry.text.replace('"', "\"\"");
        output.push_str(&format!("{},{},\"{}\"\n", entry.id, saved_at(entry), escaped));
    }
    output
}

fn export_txt(entries: &[HistoryEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!("--- {} ---\n{}\n\n", saved_at(entry), entry.text));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("histroy.redb");
        let err = match open_history(&path) {
            Ok(_) => panic!("expected a missing database to be rejected"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("not found"));
        assert!(!path.exists());
    }

    #[test]
    fn existing_database_is_exported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.redb");
        {
            let history = HistoryStore::new(RedbStore::open(&path).unwrap());
            assert!(history.save("نص \"مقتبس\"").is_saved());
        }

        let entries = match open_history(&path) {
            Ok(history) => history.list(),
            Err(e) => panic!("failed to open existing database: {e}"),
        };
        assert_eq!(entries.len(), 1);
        let csv = export_csv(&entries);
        assert!(csv.starts_with("id,saved_at,text\n"));
        assert!(csv.contains("\"نص \"\"مقتبس\"\"\""));
    }
}

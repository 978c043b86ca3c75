//! Keys command - show the cache key and path of every artifact

use crate::cache::CacheArtifact;
use crate::cli::args::{KeysArgs, OutputFormat};
use crate::cli::commands::coordinator;
use crate::config::Config;
use crate::error::CacheResult;
use crate::store::{EntryMetadata, LocalStore};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

/// Key, path and stored entry for one artifact
#[derive(Debug, Serialize)]
struct KeyRow {
    artifact: &'static str,
    key: String,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored: Option<EntryMetadata>,
}

/// Execute the keys command
pub async fn execute(args: KeysArgs, config: &Config) -> CacheResult<()> {
    let coordinator = coordinator(config)?;
    let store = LocalStore::new(config.store.resolved_dir());

    let version = match args.minikube_version {
        Some(version) => version,
        None => coordinator.version().await?,
    };

    let mut rows = Vec::with_capacity(CacheArtifact::ALL.len());
    for artifact in CacheArtifact::ALL {
        let key = coordinator.cache_key(artifact, &version);
        let stored = store.metadata(&key).await?;
        rows.push(KeyRow {
            artifact: artifact.name(),
            key,
            path: coordinator.layout().path(artifact),
            stored,
        });
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}", row.key);
            }
        }
    }
    Ok(())
}

fn print_table(rows: &[KeyRow]) {
    println!("{:<18} {:<60} {:<10}", "ARTIFACT", "KEY", "STORED");
    println!("{}", "-".repeat(90));

    for row in rows {
        let stored = match &row.stored {
            Some(entry) => style(format_bytes(entry.size_bytes)).green().to_string(),
            None => style("-").dim().to_string(),
        };
        println!("{:<18} {:<60} {:<10}", row.artifact, row.key, stored);
    }
}

/// Format bytes as human-readable size (e.g., "1.5 GB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

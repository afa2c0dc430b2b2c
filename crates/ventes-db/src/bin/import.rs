//! # Export Importer
//!
//! Loads a JSON export of the hosted collection into the local database.
//!
//! ## Usage
//! ```bash
//! cargo run -p ventes-db --bin ventes-import -- --file export.json
//!
//! # Specify database path and collection
//! cargo run -p ventes-db --bin ventes-import -- \
//!     --file export.json --db ./ventes.db --collection ventes/
//! ```
//!
//! ## Input Format
//! One object keyed by date, values stored verbatim:
//! ```json
//! {
//!   "2025-01-05": { "amount": 50, "netAmount": 40, "honoraireAmount": 10 },
//!   "2025-01-10": { "amount": 100, "netAmount": 90 }
//! }
//! ```
//! Legacy values are not rewritten. `null` values mark deleted keys and are
//! skipped. Entries that cannot be normalized are imported anyway and
//! reported as quarantined.

use std::env;

use serde_json::Value;
use tracing_subscriber::EnvFilter;
use ventes_core::{RawSaleRecord, SalesSnapshot, DEFAULT_COLLECTION};
use ventes_db::{import_entries, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut db_path = String::from("./ventes_dev.db");
    let mut collection = String::from(DEFAULT_COLLECTION);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--collection" | "-c" => {
                if i + 1 < args.len() {
                    collection = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let Some(file) = file else {
        print_help();
        return Err("missing --file".into());
    };

    println!("Ventes Export Importer");
    println!("======================");
    println!("Export:     {}", file);
    println!("Database:   {}", db_path);
    println!("Collection: {}", collection);
    println!();

    let text = std::fs::read_to_string(&file)?;
    let export: Value = serde_json::from_str(&text)?;
    let Value::Object(entries) = export else {
        return Err("export must be a JSON object keyed by date".into());
    };

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let repo = db.records();
    let existing = repo.count(&collection).await?;
    if existing > 0 {
        println!("⚠ Collection already has {} records; matching dates are replaced", existing);
    }

    let start = std::time::Instant::now();
    let summary = import_entries(&repo, &collection, &entries).await;
    println!("✓ Imported {} records in {:?}", summary.imported, start.elapsed());
    if !summary.skipped.is_empty() {
        println!("  Skipped {} deleted entries (null values)", summary.skipped.len());
    }
    for (key, error) in &summary.failed {
        eprintln!("Failed to import {}: {}", key, error);
    }

    let snapshot = SalesSnapshot::from_entries(
        entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.as_str(), RawSaleRecord::from_json(value))),
    );
    if !snapshot.quarantined.is_empty() {
        println!();
        println!("⚠ {} entries will be quarantined:", snapshot.quarantined.len());
        for malformed in &snapshot.quarantined {
            println!("  {}", malformed);
        }
    }

    db.close().await;
    println!();
    println!("✓ Import complete!");

    Ok(())
}

fn print_help() {
    println!("Ventes Export Importer");
    println!();
    println!("Usage: ventes-import --file <PATH> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>        JSON export to import (required)");
    println!("  -d, --db <PATH>          Database file path (default: ./ventes_dev.db)");
    println!("  -c, --collection <NAME>  Target collection (default: ventes/)");
    println!("  -h, --help               Show this help message");
}

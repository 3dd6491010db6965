//! # Seed Tool
//!
//! Creates (or opens) a database file and writes the canonical seed set if
//! it holds no products yet.
//!
//! ## Usage
//! ```bash
//! # Seed ./comptoir_dev.db (default)
//! cargo run -p comptoir-db --bin seed
//!
//! # Specify database path
//! cargo run -p comptoir-db --bin seed -- --db ./data/comptoir.db
//! ```

use chrono::Utc;
use comptoir_core::seed::canonical_seed;
use comptoir_core::Collection;
use comptoir_db::{Database, DbConfig, SeedOutcome};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./comptoir_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Comptoir Seed Tool");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./comptoir_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Comptoir Seed Tool");
    println!("=====================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = std::time::Instant::now();
    match db.seeder().seed_if_empty(&canonical_seed(Utc::now())).await? {
        SeedOutcome::Seeded { records } => {
            println!("✓ Wrote {} records in {:?}", records, start.elapsed());
        }
        SeedOutcome::AlreadySeeded { products } => {
            println!("⚠ Database already has {} products", products);
            println!("  Nothing written. Delete the database file to reseed.");
        }
    }

    println!();
    for collection in Collection::ENTITIES {
        println!("  {:<18} {}", collection.name(), db.count(collection).await?);
    }

    db.close().await;

    println!();
    println!("✓ Done");

    Ok(())
}

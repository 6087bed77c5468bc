//! # Seed Data Generator
//!
//! Populates the database with categories, sellers and listings for local
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p market-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p market-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p market-db --bin seed -- --db ./data/market.db
//! ```
//!
//! ## Generated Data
//! - One category per entry in `CATALOG`
//! - `SELLERS` users, `seller{N}@example.com`
//! - Items cycling through the catalog with deterministic prices and stock
//!   (some items start sold out so the out-of-stock path is visible)

use anyhow::Context;
use std::env;

use market_core::{NewItem, NewUser};
use market_db::{Database, DbConfig};

/// Category name and the listing titles generated under it.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Furniture",
        &[
            "Oak Desk",
            "Office Chair",
            "Bookshelf",
            "Coffee Table",
            "Bar Stool",
            "Nightstand",
        ],
    ),
    (
        "Lamps & Lighting",
        &["Desk Lamp", "Floor Lamp", "LED Bulb Pack", "String Lights", "Reading Light"],
    ),
    (
        "Electronics",
        &[
            "Wireless Mouse",
            "Mechanical Keyboard",
            "USB-C Hub",
            "Bluetooth Speaker",
            "Monitor Stand",
            "Webcam",
        ],
    ),
    (
        "Books",
        &["Cookbook", "Travel Guide", "Graphic Novel", "Poetry Collection", "Field Guide"],
    ),
    (
        "Clothing",
        &["Denim Jacket", "Wool Scarf", "Rain Boots", "Canvas Tote", "Knit Beanie"],
    ),
];

/// Condition variants appended to titles.
const CONDITIONS: &[&str] = &["New", "Like New", "Used", "Refurbished"];

const SELLERS: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./market_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Marketplace Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./market_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Marketplace Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Categories (reuse any that already exist)
    let mut category_ids = Vec::with_capacity(CATALOG.len());
    for (name, _) in CATALOG {
        let category = match db.categories().get_by_name(name).await? {
            Some(existing) => existing,
            None => db.categories().create(name).await?,
        };
        category_ids.push(category.category_id);
    }
    println!("✓ {} categories", category_ids.len());

    // Sellers
    let mut seller_ids = Vec::with_capacity(SELLERS);
    for n in 1..=SELLERS {
        let email = format!("seller{n}@example.com");
        let seller = match db.users().get_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                db.users()
                    .create(&NewUser {
                        name: format!("Seller {n}"),
                        email,
                        phone_number: Some(format!("555-01{n:02}")),
                    })
                    .await?
            }
        };
        seller_ids.push(seller.id);
    }
    println!("✓ {} sellers", seller_ids.len());

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for round in 0.. {
        for (category_idx, (_, titles)) in CATALOG.iter().enumerate() {
            for (title_idx, title) in titles.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = round * 100 + category_idx * 10 + title_idx;
                let item = generate_item(
                    title,
                    seed,
                    seller_ids[seed % seller_ids.len()],
                    category_ids[category_idx],
                );

                db.items()
                    .create(&item)
                    .await
                    .with_context(|| format!("inserting {}", item.title))?;

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} items...", generated);
                }
            }
        }
    }

    // Every seventh item starts sold out
    sqlx::query("UPDATE items SET quantity = 0 WHERE id % 7 = 0")
        .execute(db.pool())
        .await?;

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);

    println!();
    println!("Verifying search...");
    let results = db.items().search("lamp", None).await?;
    println!("  Search 'lamp': {} results", results.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a listing with deterministic price and stock from `seed`.
fn generate_item(title: &str, seed: usize, seller_id: i64, category_id: i64) -> NewItem {
    let condition = CONDITIONS[seed % CONDITIONS.len()];

    // $4.99 - $249.99
    let price_cents = 499 + ((seed * 37) % 24_500) as i64;

    // 1 - 12 units
    let quantity = 1 + (seed % 12) as i64;

    NewItem {
        title: format!("{title} ({condition})"),
        description: Some(format!("{condition} {}, listed by seller #{seller_id}", title.to_lowercase())),
        price_cents,
        quantity,
        seller_id,
        category_id: Some(category_id),
    }
}

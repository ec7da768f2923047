use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pennywise::initialize_db;

/// A utility for creating a demo database for the pennywise server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (days before today, amount, description, type, category)
const TRANSACTIONS: [(i64, f64, &str, &str, &str); 12] = [
    (0, 42.75, "Groceries", "expense", "Food & Dining"),
    (1, 3.80, "Coffee", "expense", "Food & Dining"),
    (2, 55.00, "Fuel", "expense", "Transportation"),
    (4, 15.99, "Streaming subscription", "expense", "Entertainment"),
    (6, 120.00, "Electricity bill", "expense", "Utilities"),
    (9, 1800.00, "Rent", "expense", "Housing"),
    (12, 3200.00, "Monthly salary", "income", "Salary"),
    (15, 450.00, "Website project", "income", "Freelance"),
    (20, 89.50, "New shoes", "expense", "Shopping"),
    (34, 1800.00, "Rent", "expense", "Housing"),
    (40, 3200.00, "Monthly salary", "income", "Salary"),
    (45, 64.20, "Doctor visit", "expense", "Healthcare"),
];

/// (category, amount)
const BUDGETS: [(&str, f64); 5] = [
    ("Food & Dining", 400.0),
    ("Transportation", 150.0),
    ("Entertainment", 50.0),
    ("Utilities", 100.0),
    ("Housing", 1800.0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let now = OffsetDateTime::now_utc();
    let today = now.date();

    println!("Creating demo transactions...");
    for (days_ago, amount, description, kind, category) in TRANSACTIONS {
        conn.execute(
            "INSERT INTO \"transaction\" (amount, description, date, type, category, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            (
                amount,
                description,
                today - Duration::days(days_ago),
                kind,
                category,
                now,
            ),
        )?;
    }

    println!("Creating demo budgets...");
    let month = format!("{:04}-{:02}", today.year(), u8::from(today.month()));
    for (category, amount) in BUDGETS {
        conn.execute(
            "INSERT INTO budget (category, amount, month, year, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            (category, amount, &month, today.year(), now),
        )?;
    }

    println!("Success!");

    Ok(())
}

//! Pool construction and idempotent schema setup.

use crate::errors::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

const SCHEMA: &[&str] = &[
  "CREATE TABLE IF NOT EXISTS sellerdetails (
     id INTEGER PRIMARY KEY AUTOINCREMENT,
     seller_id TEXT NOT NULL UNIQUE,
     name TEXT NOT NULL,
     email TEXT NOT NULL UNIQUE,
     smartcard_id TEXT NOT NULL,
     hostel TEXT NOT NULL,
     hashed_password TEXT NOT NULL
   )",
  "CREATE TABLE IF NOT EXISTS buyerdetails (
     id INTEGER PRIMARY KEY AUTOINCREMENT,
     buyer_id TEXT NOT NULL UNIQUE,
     name TEXT NOT NULL,
     email TEXT NOT NULL UNIQUE,
     smartcard_id TEXT NOT NULL,
     hostel TEXT NOT NULL,
     hashed_password TEXT NOT NULL
   )",
  "CREATE TABLE IF NOT EXISTS admindetails (
     id INTEGER PRIMARY KEY AUTOINCREMENT,
     admin_id TEXT NOT NULL UNIQUE,
     name TEXT NOT NULL,
     email TEXT NOT NULL UNIQUE,
     hashed_password TEXT NOT NULL
   )",
  "CREATE TABLE IF NOT EXISTS product (
     product_id INTEGER PRIMARY KEY AUTOINCREMENT,
     product_name TEXT NOT NULL,
     price REAL NOT NULL,
     quantity INTEGER NOT NULL,
     description TEXT,
     image TEXT NOT NULL
   )",
  // Per-role counters backing the human-readable ids. Bumped in the same
  // transaction as the account insert.
  "CREATE TABLE IF NOT EXISTS role_sequences (
     role TEXT PRIMARY KEY,
     last_value INTEGER NOT NULL
   )",
  // Server-side session records; expiry is unix seconds.
  "CREATE TABLE IF NOT EXISTS sessions (
     id TEXT PRIMARY KEY,
     data TEXT NOT NULL,
     expires_at INTEGER NOT NULL
   )",
];

pub async fn connect(database_url: &str) -> Result<SqlitePool> {
  let pool = SqlitePoolOptions::new().max_connections(5).connect(database_url).await?;
  Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
  for stmt in SCHEMA {
    sqlx::query(stmt).execute(pool).await?;
  }
  Ok(())
}

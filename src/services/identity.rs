//! Sequential human-readable id allocation for the role tables.
//!
//! Ids look like `S007`: the role's prefix letter plus a zero-padded counter.
//! The counter lives in `role_sequences` and is bumped with an upsert inside
//! the same transaction as the account insert, so two concurrent
//! registrations can never observe the same value.

use crate::errors::Result;
use crate::models::account::Role;
use sqlx::{Sqlite, Transaction};

/// Formats a role id: prefix letter plus a zero-padded 3-digit counter value.
/// Counters past 999 simply grow a digit.
pub fn format_role_id(role: Role, n: i64) -> String {
  format!("{}{:03}", role.id_prefix(), n)
}

/// Allocates the next sequential id for `role` inside the caller's
/// transaction. The first allocation for a role yields `<prefix>001`.
/// Storage errors propagate; there is no retry.
pub async fn next_role_id(tx: &mut Transaction<'_, Sqlite>, role: Role) -> Result<String> {
  let (value,): (i64,) = sqlx::query_as(
    "INSERT INTO role_sequences (role, last_value) VALUES (?, 1)
     ON CONFLICT(role) DO UPDATE SET last_value = last_value + 1
     RETURNING last_value",
  )
  .bind(role.as_str())
  .fetch_one(&mut **tx)
  .await?;

  Ok(format_role_id(role, value))
}

#[cfg(test)]
mod tests {
  use super::*;
  use sqlx::sqlite::SqlitePoolOptions;

  #[test]
  fn formats_with_three_digit_padding() {
    assert_eq!(format_role_id(Role::Seller, 1), "S001");
    assert_eq!(format_role_id(Role::Buyer, 42), "B042");
    assert_eq!(format_role_id(Role::Admin, 999), "A999");
    assert_eq!(format_role_id(Role::Seller, 1000), "S1000");
  }

  #[tokio::test]
  async fn allocations_are_sequential_per_role() {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .unwrap();
    crate::db::init_schema(&pool).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert_eq!(next_role_id(&mut tx, Role::Seller).await.unwrap(), "S001");
    assert_eq!(next_role_id(&mut tx, Role::Seller).await.unwrap(), "S002");
    // Counters are independent per role.
    assert_eq!(next_role_id(&mut tx, Role::Buyer).await.unwrap(), "B001");
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert_eq!(next_role_id(&mut tx, Role::Seller).await.unwrap(), "S003");
    tx.commit().await.unwrap();
  }

  #[tokio::test]
  async fn rolled_back_allocation_is_not_consumed() {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .unwrap();
    crate::db::init_schema(&pool).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert_eq!(next_role_id(&mut tx, Role::Admin).await.unwrap(), "A001");
    tx.rollback().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert_eq!(next_role_id(&mut tx, Role::Admin).await.unwrap(), "A001");
    tx.commit().await.unwrap();
  }
}

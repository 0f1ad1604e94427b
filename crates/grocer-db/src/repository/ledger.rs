//! # Ledger Repository
//!
//! Append-only record of sold lines. Rows are written only by the checkout
//! engine, inside its transaction; this repository reads them back.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;

use crate::error::{DbError, DbResult};
use grocer_core::{Money, TransactionLine};

const LEDGER_COLUMNS: &str = "id, barcode, name, quantity, total, reference, timestamp";

/// Hard cap on how many rows one history query returns.
pub const MAX_HISTORY_LIMIT: i64 = 1000;

#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: i64,
    barcode: String,
    name: String,
    quantity: i64,
    total: String,
    reference: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for TransactionLine {
    type Error = DbError;

    fn try_from(row: LedgerRow) -> DbResult<Self> {
        let total = Money::from_str(&row.total).map_err(|_| {
            DbError::InvalidData(format!(
                "transactions.total = '{}' for id {}",
                row.total, row.id
            ))
        })?;

        Ok(TransactionLine {
            id: row.id,
            barcode: row.barcode,
            name: row.name,
            quantity: row.quantity,
            total,
            reference: row.reference,
            timestamp: row.timestamp,
        })
    }
}

/// A ledger row about to be written.
pub(crate) struct LedgerEntry<'a> {
    pub barcode: &'a str,
    pub name: &'a str,
    pub quantity: i64,
    pub total: Money,
    pub reference: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Appends one row on the caller's connection (normally an open transaction).
pub(crate) async fn append(conn: &mut SqliteConnection, entry: &LedgerEntry<'_>) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO transactions (barcode, name, quantity, total, reference, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(entry.barcode)
    .bind(entry.name)
    .bind(entry.quantity)
    .bind(entry.total.to_storage_string())
    .bind(entry.reference)
    .bind(entry.timestamp)
    .execute(conn)
    .await?;

    Ok(())
}

/// Read access to the ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Most recent lines first. `limit` is clamped to `1..=MAX_HISTORY_LIMIT`.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<TransactionLine>> {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        let sql = format!("SELECT {LEDGER_COLUMNS} FROM transactions ORDER BY id DESC LIMIT ?1");

        let rows = sqlx::query_as::<_, LedgerRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TransactionLine::try_from).collect()
    }

    /// All lines of one checkout, in the order they were sold.
    pub async fn by_reference(&self, reference: &str) -> DbResult<Vec<TransactionLine>> {
        let sql = format!("SELECT {LEDGER_COLUMNS} FROM transactions WHERE reference = ?1 ORDER BY id");

        let rows = sqlx::query_as::<_, LedgerRow>(&sql)
            .bind(reference)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TransactionLine::try_from).collect()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn seed_rows(db: &Database) {
        let mut conn = db.pool().acquire().await.unwrap();
        for (i, reference) in ["ref-a", "ref-a", "ref-b"].into_iter().enumerate() {
            let entry = LedgerEntry {
                barcode: "5012345678900",
                name: "Oat Milk",
                quantity: i as i64 + 1,
                total: Money::from_cents(900 * (i as i64 + 1)),
                reference,
                timestamp: Utc::now(),
            };
            append(&mut conn, &entry).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_rows(&db).await;

        let recent = db.ledger().recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].reference, "ref-b");
        assert_eq!(recent[0].total, Money::from_cents(2700));
        assert_eq!(recent[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_by_reference_groups_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_rows(&db).await;

        let lines = db.ledger().by_reference("ref-a").await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].id < lines[1].id);
        assert_eq!(db.ledger().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_recent_clamps_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_rows(&db).await;

        assert_eq!(db.ledger().recent(0).await.unwrap().len(), 1);
        assert_eq!(db.ledger().recent(-5).await.unwrap().len(), 1);
    }
}

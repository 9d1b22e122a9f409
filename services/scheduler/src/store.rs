//! SQLite-based round state store.
//!
//! Durable storage for the last nominated era and the per-group
//! active-target bookkeeping. The eligibility check depends on the
//! last nominated era being persisted before the next invocation
//! reads it; a lost write here would double-fire a round.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use stakeround_chain::{EraIndex, Target};
use thiserror::Error;
use tracing::debug;

/// Errors from round state store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// SQLite round state store.
///
/// The connection is wrapped in a mutex so the store can be shared
/// across tasks; the scheduler never issues concurrent writes within
/// one invocation.
pub struct RoundStateStore {
    conn: Mutex<Connection>,
}

impl RoundStateStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS round_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_nominated_era INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL DEFAULT 0
            );

            INSERT OR IGNORE INTO round_state (id) VALUES (1);

            CREATE TABLE IF NOT EXISTS current_targets (
                bonded_address TEXT NOT NULL,
                target_address TEXT NOT NULL,
                target_name TEXT,
                PRIMARY KEY (bonded_address, target_address)
            );
            "#,
        )?;

        debug!("Round state store schema initialized");
        Ok(())
    }

    /// Era index at which the most recent round was submitted.
    pub fn get_last_nominated_era_index(&self) -> Result<EraIndex, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let era: i64 = conn.query_row(
            "SELECT last_nominated_era FROM round_state WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(era as EraIndex)
    }

    /// Record the era a round was submitted at.
    ///
    /// Monotonic: a value below the stored one is a silent no-op, so
    /// the last nominated era can never regress.
    pub fn set_last_nominated_era_index(&self, era: EraIndex) -> Result<(), StoreError> {
        let now = chrono::Utc::now().timestamp();
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "UPDATE round_state SET last_nominated_era = ?1, updated_at = ?2
             WHERE id = 1 AND last_nominated_era < ?1",
            params![era as i64, now],
        )?;
        Ok(())
    }

    /// Active targets recorded for a bonded address.
    pub fn current_targets(&self, bonded_address: &str) -> Result<Vec<Target>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT target_address, target_name FROM current_targets
             WHERE bonded_address = ?1 ORDER BY target_address",
        )?;

        let targets = stmt
            .query_map(params![bonded_address], |row| {
                Ok(Target {
                    address: row.get(0)?,
                    name: row.get(1)?,
                    identity: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(targets)
    }

    /// Replace the recorded targets for a bonded address.
    pub fn replace_current_targets(
        &self,
        bonded_address: &str,
        targets: &[Target],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM current_targets WHERE bonded_address = ?1",
            params![bonded_address],
        )?;
        for target in targets {
            tx.execute(
                "INSERT INTO current_targets (bonded_address, target_address, target_name)
                 VALUES (?1, ?2, ?3)",
                params![bonded_address, target.address, target.name],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Clear the recorded targets for a bonded address.
    pub fn clear_current_targets(&self, bonded_address: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "DELETE FROM current_targets WHERE bonded_address = ?1",
            params![bonded_address],
        )?;
        Ok(())
    }
}

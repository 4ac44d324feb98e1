//! Schema migrations for the blob store.
//!
//! Versions are tracked in SQLite's `user_version` pragma: migration `n`
//! (1-based) has run once `user_version >= n`.

use super::Error;
use tokio_rusqlite::Connection;

/// SQL batches in application order.
const MIGRATIONS: &[&str] = &[include_str!("../../migrations/001_blobs.sql")];

/// Apply every migration newer than the database's recorded version.
///
/// Each batch and its version bump commit in one transaction.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let current: usize = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if current > MIGRATIONS.len() {
            return Err(Error::MigrationFailed(format!(
                "database is at version {current}, newer than the {} known migrations",
                MIGRATIONS.len()
            )));
        }

        for (index, sql) in MIGRATIONS.iter().enumerate().skip(current) {
            let version = index + 1;
            let tx = conn.transaction()?;
            tx.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("migration {version}: {e}")))?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
            tracing::debug!(version, "applied store migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

//! Versioned schema migrations, mirrored to `PRAGMA user_version`

use litdaily_utils::StoreError;
use rusqlite::Connection;
use tracing::info;

use super::db_err;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version this binary knows how to produce
#[must_use]
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Apply every pending migration in one transaction.
pub(crate) fn apply_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction().map_err(db_err)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql).map_err(db_err)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            .map_err(db_err)?;
    }
    tx.commit().map_err(db_err)?;

    info!(from = current, to = latest, "Applied store migrations");
    Ok(())
}

pub(crate) fn current_user_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(db_err)
}

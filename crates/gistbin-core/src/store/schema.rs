//! SQLite schema for the gist store.

use rusqlite::{Connection, Result};

/// Current schema version. Increment when making breaking changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Creates all tables if they don't exist. A database written by a newer
/// schema is opened as-is with a warning.
pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        tracing::warn!(
            found = current_version,
            supported = SCHEMA_VERSION,
            "gist database has a newer schema version"
        );
    }

    Ok(())
}

/// Get the current schema version (0 if not initialized).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per gist; directory '' is the default namespace
        CREATE TABLE IF NOT EXISTS gists (
            directory TEXT NOT NULL DEFAULT '',
            code TEXT NOT NULL,
            content TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (directory, code)
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn creates_gists_table() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO gists (directory, code, content, name, created_at) VALUES ('', 'abcde', 'x', 'abcde', 0)",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO gists (directory, code, content, name, created_at) VALUES ('', 'abcde', 'y', 'abcde', 0)",
            [],
        );
        assert!(dup.is_err());
    }
}

//! Embedded schema migrations.

use anyhow::anyhow;
use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Embedded diesel migrations bundled with this crate.
///
/// Applied by [`run_sqlite`] to bring the database schema up to date.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run pending migrations on the SQLite database at the given URL.
pub fn run_sqlite(url: &str) -> anyhow::Result<()> {
    let mut conn = SqliteConnection::establish(url)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn migrations_apply_on_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        run_sqlite(&path).expect("migration run");

        let mut conn = SqliteConnection::establish(&path).unwrap();

        conn.batch_execute("INSERT INTO actor (id, first_name) VALUES ('U1', 'F')")
            .unwrap();
    }
}

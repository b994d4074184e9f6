use rusqlite::{Connection, Params};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Connection wrapper owning the on-disk schema.
///
/// The schema is the on-disk contract: other tools may query these tables
/// directly, so table/column names and key structure stay stable.
/// Referential constraints are enforced by SQLite (`foreign_keys=ON`), but
/// callers still check existence explicitly where a friendlier error is
/// wanted than a constraint violation.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self::with_conn(Connection::open(path)?)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_conn(Connection::open_in_memory()?)
    }

    fn with_conn(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        db.define_tables()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create every table if it does not already exist. Idempotent, so a
    /// database handed in by another tool is left untouched.
    pub fn define_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                usr         INT,
                pwd         TEXT,
                name        TEXT,
                email       TEXT,
                city        TEXT,
                timezone    FLOAT,
                PRIMARY KEY (usr)
            );
            CREATE TABLE IF NOT EXISTS follows (
                flwer       INT,
                flwee       INT,
                start_date  DATE,
                PRIMARY KEY (flwer, flwee),
                FOREIGN KEY (flwer) REFERENCES users,
                FOREIGN KEY (flwee) REFERENCES users
            );
            CREATE TABLE IF NOT EXISTS tweets (
                tid         INT,
                writer      INT,
                tdate       DATE,
                text        TEXT,
                replyto     INT,
                PRIMARY KEY (tid),
                FOREIGN KEY (writer) REFERENCES users,
                FOREIGN KEY (replyto) REFERENCES tweets
            );
            CREATE TABLE IF NOT EXISTS hashtags (
                term        TEXT,
                PRIMARY KEY (term)
            );
            CREATE TABLE IF NOT EXISTS mentions (
                tid         INT,
                term        TEXT,
                PRIMARY KEY (tid, term),
                FOREIGN KEY (tid) REFERENCES tweets,
                FOREIGN KEY (term) REFERENCES hashtags
            );
            CREATE TABLE IF NOT EXISTS retweets (
                usr         INT,
                tid         INT,
                rdate       DATE,
                PRIMARY KEY (usr, tid),
                FOREIGN KEY (usr) REFERENCES users,
                FOREIGN KEY (tid) REFERENCES tweets
            );
            CREATE TABLE IF NOT EXISTS lists (
                lname       TEXT,
                owner       INT,
                PRIMARY KEY (lname),
                FOREIGN KEY (owner) REFERENCES users
            );
            CREATE TABLE IF NOT EXISTS includes (
                lname       TEXT,
                member      INT,
                PRIMARY KEY (lname, member),
                FOREIGN KEY (lname) REFERENCES lists,
                FOREIGN KEY (member) REFERENCES users
            );
            "#,
        )?;
        Ok(())
    }

    /// Drop every table. Children first so foreign keys never dangle.
    pub fn drop_tables(&self) -> Result<()> {
        debug!("dropping all tables");
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS includes;
            DROP TABLE IF EXISTS lists;
            DROP TABLE IF EXISTS retweets;
            DROP TABLE IF EXISTS mentions;
            DROP TABLE IF EXISTS hashtags;
            DROP TABLE IF EXISTS tweets;
            DROP TABLE IF EXISTS follows;
            DROP TABLE IF EXISTS users;
            "#,
        )?;
        Ok(())
    }

    /// Whether `sql` returns at least one row for `params`.
    pub(crate) fn contains<P: Params>(&self, sql: &str, params: P) -> Result<bool> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        Ok(rows.next()?.is_some())
    }

    /// Highest value of an integer key column, 0 when the table is empty.
    ///
    /// The `max(id)+1` allocation built on this is non-atomic; it is safe
    /// only under the single-session model. A multi-writer deployment
    /// needs a real sequence owned by the store.
    pub(crate) fn max_id(&self, sql: &str) -> Result<i64> {
        let max: Option<i64> = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(max.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_schema() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("chirp.db")).unwrap();

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chirp.db");
        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO users (usr, pwd, name, email, city, timezone)
                     VALUES (1, 'pw', 'Ada', 'ada@example.com', 'London', 0.0)",
                    [],
                )
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "reopening must not clobber existing rows");
    }

    #[test]
    fn test_drop_and_redefine() {
        let db = Database::open_in_memory().unwrap();
        db.drop_tables().unwrap();
        db.define_tables().unwrap();
        assert!(!db
            .contains("SELECT usr FROM users", [])
            .unwrap());
    }

    #[test]
    fn test_max_id_empty_and_populated() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.max_id("SELECT MAX(tid) FROM tweets").unwrap(), 0);

        db.conn()
            .execute(
                "INSERT INTO users (usr, pwd, name, email, city, timezone)
                 VALUES (1, 'pw', 'Ada', 'ada@example.com', 'London', 0.0)",
                [],
            )
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO tweets (tid, writer, tdate, text, replyto)
                 VALUES (7, 1, '2023-01-01', 'hi', NULL)",
                [],
            )
            .unwrap();
        assert_eq!(db.max_id("SELECT MAX(tid) FROM tweets").unwrap(), 7);
    }
}

//! Follow edges and derived counts.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Database;

/// Record `follower` following `followee`. An existing edge reports
/// `AlreadyFollowing` and changes nothing. Self-follow is not rejected;
/// the behavior is unspecified and preserved as-is.
pub fn follow(db: &Database, follower: i64, followee: i64, date: NaiveDate) -> Result<()> {
    if db.contains(
        "SELECT flwer FROM follows WHERE flwer = ?1 AND flwee = ?2",
        params![follower, followee],
    )? {
        return Err(Error::AlreadyFollowing);
    }
    db.conn().execute(
        "INSERT INTO follows (flwer, flwee, start_date) VALUES (?1, ?2, ?3)",
        params![follower, followee, date.to_string()],
    )?;
    debug!(follower, followee, "follow edge stored");
    Ok(())
}

pub fn follower_count(db: &Database, usr: i64) -> Result<i64> {
    count(db, "SELECT COUNT(*) FROM follows WHERE flwee = ?1", usr)
}

pub fn following_count(db: &Database, usr: i64) -> Result<i64> {
    count(db, "SELECT COUNT(*) FROM follows WHERE flwer = ?1", usr)
}

pub fn tweet_count(db: &Database, usr: i64) -> Result<i64> {
    count(db, "SELECT COUNT(*) FROM tweets WHERE writer = ?1", usr)
}

/// Display name of a user, or `NoSuchUser`.
pub fn user_name(db: &Database, usr: i64) -> Result<String> {
    db.conn()
        .query_row(
            "SELECT name FROM users WHERE usr = ?1",
            params![usr],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Error::NoSuchUser(usr))
}

fn count(db: &Database, sql: &str, usr: i64) -> Result<i64> {
    Ok(db.conn().query_row(sql, params![usr], |row| row.get(0))?)
}

//! Feed, search, and follower queries over the store.
//!
//! Every tweet-shaped query produces the same displayable row: author
//! name, tweet id/author/date/text/parent, and the retweeter id when the
//! row was surfaced by a retweet.

mod predicate;

pub use predicate::{parse_filters, TweetFilter};

use rusqlite::{params, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{FeedItem, QuotedTweet, UserSummary};
use crate::store::Database;

fn item_from_row(row: &Row) -> rusqlite::Result<FeedItem> {
    Ok(FeedItem {
        display_name: row.get(0)?,
        tweet_id: row.get(1)?,
        author_id: row.get(2)?,
        date: row.get(3)?,
        text: row.get(4)?,
        reply_to: row.get(5)?,
        retweeter_id: row.get(6)?,
    })
}

fn user_from_row(row: &Row) -> rusqlite::Result<UserSummary> {
    Ok(UserSummary {
        usr: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
    })
}

/// Chronologically merged tweets and retweets of everyone `usr` follows,
/// newest first. A retweet row carries the retweet's date, not the
/// original tweet's, so it surfaces at the time it was retweeted. The
/// order of rows with equal dates is unspecified.
pub fn feed(db: &Database, usr: i64) -> Result<Vec<FeedItem>> {
    let mut stmt = db.conn().prepare(
        "SELECT u.name, t.tid, t.writer, t.tdate AS date, t.text, t.replyto, NULL AS retweeter
         FROM users u, tweets t, follows f
         WHERE u.usr = t.writer
           AND t.writer = f.flwee
           AND f.flwer = ?1
         UNION
         SELECT u.name, t.tid, t.writer, rt.rdate AS date, t.text, t.replyto, rt.usr AS retweeter
         FROM users u, retweets rt, tweets t, follows f
         WHERE u.usr = t.writer
           AND t.tid = rt.tid
           AND rt.usr = f.flwee
           AND f.flwer = ?1
         ORDER BY date DESC",
    )?;
    let rows = stmt.query_map(params![usr], item_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Tweets matching any of `filters`, newest first, deduplicated.
/// An empty filter list matches nothing.
pub fn search_tweets(db: &Database, filters: &[TweetFilter]) -> Result<Vec<FeedItem>> {
    if filters.is_empty() {
        return Ok(Vec::new());
    }
    let (where_sql, filter_params) = predicate::where_clause(filters);
    let sql = format!(
        "SELECT DISTINCT u.name, t.tid, t.writer, t.tdate, t.text, t.replyto, NULL AS retweeter
         FROM tweets t
         JOIN users u ON u.usr = t.writer
         WHERE {where_sql}
         ORDER BY t.tdate DESC"
    );
    let mut stmt = db.conn().prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(filter_params.iter()), item_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// All tweets written by one user, newest first. Backs the tweet session
/// opened by `select` in a user browser.
pub fn user_tweets(db: &Database, usr: i64) -> Result<Vec<FeedItem>> {
    let mut stmt = db.conn().prepare(
        "SELECT u.name, t.tid, t.writer, t.tdate, t.text, t.replyto, NULL AS retweeter
         FROM tweets t
         JOIN users u ON u.usr = t.writer
         WHERE t.writer = ?1
         ORDER BY t.tdate DESC",
    )?;
    let rows = stmt.query_map(params![usr], item_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Users whose name or city contains `keyword` (case-insensitive).
///
/// Two-tier relevance rank: name matches come first, ordered by ascending
/// name length; city-only matches follow, ordered by ascending city
/// length. A shorter matching field is treated as the more precise match.
pub fn search_users(db: &Database, keyword: &str) -> Result<Vec<UserSummary>> {
    let mut stmt = db.conn().prepare(
        "SELECT DISTINCT usr, name, city
         FROM users
         WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%'
            OR LOWER(city) LIKE '%' || LOWER(?1) || '%'
         ORDER BY
             (CASE
                 WHEN LOWER(name) LIKE '%' || LOWER(?1) || '%' THEN 1
                 ELSE 2
             END),
             (CASE
                 WHEN LOWER(name) LIKE '%' || LOWER(?1) || '%' THEN LENGTH(name)
                 ELSE LENGTH(city)
             END)",
    )?;
    let rows = stmt.query_map(params![keyword], user_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Everyone following `usr`, most recent edge first.
pub fn followers(db: &Database, usr: i64) -> Result<Vec<UserSummary>> {
    let mut stmt = db.conn().prepare(
        "SELECT DISTINCT usr, name, city
         FROM follows, users
         WHERE flwee = ?1 AND flwer = usr
         ORDER BY start_date DESC",
    )?;
    let rows = stmt.query_map(params![usr], user_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Author and text of tweet `tid`, for quoting the parent of a reply.
pub fn quoted_parent(db: &Database, tid: i64) -> Result<Option<QuotedTweet>> {
    let quoted = db
        .conn()
        .query_row(
            "SELECT u.name, t.writer, t.text
             FROM users u, tweets t
             WHERE u.usr = t.writer AND t.tid = ?1",
            params![tid],
            |row| {
                Ok(QuotedTweet {
                    name: row.get(0)?,
                    writer: row.get(1)?,
                    text: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(quoted)
}

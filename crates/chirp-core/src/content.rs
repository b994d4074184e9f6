//! Tweet/reply/retweet creation and hashtag indexing.

use chrono::NaiveDate;
use rusqlite::params;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Tweet;
use crate::store::Database;

/// Characters that end a hashtag term. Alphanumerics and `_` are part of
/// a term; any other ASCII punctuation terminates it.
fn ends_term(c: char) -> bool {
    c.is_ascii_punctuation() && c != '_'
}

/// Extract the distinct hashtag terms of a tweet text.
///
/// The text is split on whitespace; each token starting with `#` is
/// scanned from the character after the `#` and truncated at the first
/// terminator, then lowercased. Empty remainders (a bare `#`, or `#`
/// followed immediately by punctuation) yield no term.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for word in text.split_whitespace() {
        let Some(rest) = word.strip_prefix('#') else {
            continue;
        };
        let term: String = rest.chars().take_while(|c| !ends_term(*c)).collect();
        let term = term.to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Create a tweet, or a reply when `reply_to` is given.
///
/// Allocates the next tweet id (`max(tid)+1`, 1 when the table is empty),
/// persists the row, and indexes its hashtags. The parent of a reply must
/// exist; the foreign key would also catch this, but the explicit check is
/// the chosen error-reporting path.
pub fn compose_tweet(
    db: &Database,
    author: i64,
    text: &str,
    reply_to: Option<i64>,
    date: NaiveDate,
) -> Result<Tweet> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyText);
    }
    if let Some(parent) = reply_to {
        if !db.contains("SELECT tid FROM tweets WHERE tid = ?1", params![parent])? {
            return Err(Error::NoSuchParent(parent));
        }
    }

    let tid = db.max_id("SELECT MAX(tid) FROM tweets")? + 1;
    db.conn().execute(
        "INSERT INTO tweets (tid, writer, tdate, text, replyto) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![tid, author, date.to_string(), text, reply_to],
    )?;
    debug!(tid, author, reply = ?reply_to, "tweet stored");

    index_hashtags(db, tid, text)?;

    Ok(Tweet {
        tid,
        writer: author,
        tdate: date,
        text: text.to_string(),
        replyto: reply_to,
    })
}

/// Record the distinct hashtags of tweet `tid`. Both the hashtag
/// dictionary and the tweet↔term association are insert-if-absent, so
/// re-indexing the same text is a no-op.
fn index_hashtags(db: &Database, tid: i64, text: &str) -> Result<()> {
    for term in extract_hashtags(text) {
        if !db.contains("SELECT term FROM hashtags WHERE term = ?1", params![&term])? {
            db.conn()
                .execute("INSERT INTO hashtags (term) VALUES (?1)", params![&term])?;
        }
        if !db.contains(
            "SELECT tid FROM mentions WHERE tid = ?1 AND term = ?2",
            params![tid, &term],
        )? {
            db.conn().execute(
                "INSERT INTO mentions (tid, term) VALUES (?1, ?2)",
                params![tid, &term],
            )?;
        }
    }
    Ok(())
}

/// Retweet `tid` as `user`. At most one retweet of a given tweet per
/// user: a second attempt reports `AlreadyRetweeted` and changes nothing.
pub fn retweet(db: &Database, user: i64, tid: i64, date: NaiveDate) -> Result<()> {
    if !db.contains("SELECT tid FROM tweets WHERE tid = ?1", params![tid])? {
        return Err(Error::NoSuchTweet(tid));
    }
    if db.contains(
        "SELECT tid FROM retweets WHERE tid = ?1 AND usr = ?2",
        params![tid, user],
    )? {
        return Err(Error::AlreadyRetweeted);
    }
    db.conn().execute(
        "INSERT INTO retweets (usr, tid, rdate) VALUES (?1, ?2, ?3)",
        params![user, tid, date.to_string()],
    )?;
    debug!(user, tid, "retweet stored");
    Ok(())
}

//! Aggregate counts for profiles and tweets.

use rusqlite::params;

use crate::error::Result;
use crate::graph;
use crate::models::{ProfileStats, TweetStats};
use crate::store::Database;

/// Counts shown when a user profile is selected in a browser.
pub fn profile_stats(db: &Database, usr: i64) -> Result<ProfileStats> {
    Ok(ProfileStats {
        tweets: graph::tweet_count(db, usr)?,
        followers: graph::follower_count(db, usr)?,
        following: graph::following_count(db, usr)?,
    })
}

/// Retweet and direct-reply counts reported by `viewinfo`.
pub fn tweet_stats(db: &Database, tid: i64) -> Result<TweetStats> {
    let retweets: i64 = db.conn().query_row(
        "SELECT COUNT(*) FROM retweets WHERE tid = ?1",
        params![tid],
        |row| row.get(0),
    )?;
    let replies: i64 = db.conn().query_row(
        "SELECT COUNT(*) FROM tweets WHERE replyto = ?1",
        params![tid],
        |row| row.get(0),
    )?;
    Ok(TweetStats { retweets, replies })
}

use chrono::NaiveDate;

/// A tweet or reply as persisted. `replyto` references the parent tweet;
/// ids only increase, so a tweet can never reply to a later one.
#[derive(Debug, Clone)]
pub struct Tweet {
    pub tid: i64,
    pub writer: i64,
    pub tdate: NaiveDate,
    pub text: String,
    pub replyto: Option<i64>,
}

/// The authenticated principal driving all write operations.
/// Passed explicitly; there is no process-global current user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
}

/// One displayable row of a feed or tweet search: the tweet content plus
/// the retweeter when the row was surfaced by a retweet. `date` is the
/// retweet date for retweet rows, the tweet date otherwise.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub display_name: String,
    pub tweet_id: i64,
    pub author_id: i64,
    pub date: String,
    pub text: String,
    pub reply_to: Option<i64>,
    pub retweeter_id: Option<i64>,
}

/// One displayable row of a user search.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub usr: i64,
    pub name: String,
    pub city: String,
}

/// Author and text of a parent tweet, for quoting replies.
#[derive(Debug, Clone)]
pub struct QuotedTweet {
    pub name: String,
    pub writer: i64,
    pub text: String,
}

/// Aggregate counts reported by `viewinfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweetStats {
    pub retweets: i64,
    pub replies: i64,
}

/// Aggregate counts shown when a user profile is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub tweets: i64,
    pub followers: i64,
    pub following: i64,
}

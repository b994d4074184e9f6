/// Error taxonomy for the core.
///
/// Validation and not-found errors abort the current operation with no
/// state change. Duplicate conditions are informational no-ops, surfaced
/// so the shell can report them without treating them as failures.
/// Storage errors wrap `rusqlite::Error` and are fatal at the shell rim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty tweet text")]
    EmptyText,

    #[error("parent tweet {0} does not exist")]
    NoSuchParent(i64),

    #[error("tweet {0} does not exist")]
    NoSuchTweet(i64),

    #[error("user {0} does not exist")]
    NoSuchUser(i64),

    #[error("already retweeted")]
    AlreadyRetweeted,

    #[error("already following")]
    AlreadyFollowing,

    #[error("email must contain '@' and '.'")]
    InvalidEmail,

    #[error("timezone must be a number")]
    InvalidTimezone,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    /// Whether this is a duplicate condition (report and carry on).
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::AlreadyRetweeted | Error::AlreadyFollowing)
    }

    /// Whether this is an unexpected storage failure with no recovery path.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Sqlite(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

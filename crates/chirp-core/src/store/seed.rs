//! Sample data for `--test-mode` and tests.
//!
//! The user set includes the short-name/city fixtures the user-search
//! ranking tests rely on ("Sam" vs "User"/"UserCity...").

use crate::error::Result;
use crate::store::Database;

pub fn insert_sample_data(db: &Database) -> Result<()> {
    db.conn().execute_batch(
        r#"
        INSERT INTO users (usr, pwd, name, email, city, timezone) VALUES
            (1,  'password1',  'User1',   'user1@example.com',  'City1',       1.0),
            (2,  'password2',  'User2',   'user2@example.com',  'City2',       2.0),
            (3,  'password3',  'User3',   'user3@example.com',  'City3',       3.0),
            (4,  'password4',  'User4',   'user4@example.com',  'City4',       4.0),
            (5,  'password5',  'User5',   'user5@example.com',  'City5',       5.0),
            (6,  'password6',  'User6000', 'user6@example.com', 'City6',       6.0),
            (7,  'password7',  'User',    'user7@example.com',  'UserCity',    7.0),
            (8,  'password8',  'Sam1',    'sam1@example.com',   'UserCity1',   8.0),
            (9,  'password9',  'Sam2',    'sam2@example.com',   'UserCity12',  9.0),
            (10, 'password10', 'User10',  'user10@example.com', 'UserCity123', 10.0),
            (11, 'password11', 'User100', 'user11@example.com', 'City',        11.0),
            (12, 'password12', 'Sam',     'user12@example.com', 'SamCity',     12.0),
            (13, 'password13', 'Bam',     'user13@example.com', 'BamCity',     13.0),
            (14, 'password14', 'Ram',     'ram@example.com',    'SamC',        13.0);

        INSERT INTO follows (flwer, flwee, start_date) VALUES
            (1, 2, '2023-01-01'),
            (2, 1, '2023-01-02'),
            (1, 3, '2023-01-03'),
            (3, 2, '2023-01-04');

        INSERT INTO tweets (tid, writer, tdate, text, replyto) VALUES
            (1, 1, '2023-01-27', 'This is a #test tweet.', NULL),
            (2, 2, '2023-02-27', 'This is #another tweet, a reply to the first', 1),
            (3, 1, '2023-03-27', 'Tweet from User1 #another', NULL),
            (4, 3, '2023-04-27', 'Tweet from User3', 1),
            (5, 1, '2023-05-27', 'plain post, no tags', NULL),
            (6, 1, '2023-06-27', 'one more #test', NULL),
            (7, 2, '2023-07-27', 'latest tweet', NULL);

        INSERT INTO hashtags (term) VALUES
            ('test'),
            ('another');

        INSERT INTO mentions (tid, term) VALUES
            (1, 'test'),
            (2, 'another'),
            (3, 'another'),
            (6, 'test');

        INSERT INTO retweets (usr, tid, rdate) VALUES
            (1, 2, '2023-03-01'),
            (2, 1, '2023-03-02'),
            (3, 1, '2023-03-03');

        INSERT INTO lists (lname, owner) VALUES
            ('List1', 1),
            ('List2', 2);

        INSERT INTO includes (lname, member) VALUES
            ('List1', 2),
            ('List2', 1);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_inserts() {
        let db = Database::open_in_memory().unwrap();
        insert_sample_data(&db).unwrap();

        let users: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(users, 14);

        let mentions: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM mentions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mentions, 4);
    }
}

//! Plain-text rendering for pages, menus, and errors.
//!
//! Rendering builds `Vec<String>` line lists so tests can assert on exact
//! output; the callers print.

use chirp_core::models::FeedItem;
use chirp_core::{graph, query, Database};

use crate::browser::{BrowseList, BrowseSession};
use crate::{RED, RESET};

const SEPARATOR_WIDTH: usize = 80;

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

pub(crate) fn error_line(msg: &str) -> String {
    format!("{RED}{msg}{RESET}")
}

/// Render the visible page of a session: separator-framed items carrying
/// their whole-list index, then the page footer.
pub(crate) fn page_lines(db: &Database, session: &BrowseSession) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    if session.is_empty() {
        lines.push("No results found!".to_string());
        lines.push(String::new());
        return Ok(lines);
    }

    lines.push(separator());
    let start = session.offset;
    let end = (start + session.page_size).min(session.len());
    match &session.list {
        BrowseList::Tweets(items) => {
            for (i, item) in items[start..end].iter().enumerate() {
                lines.push(format!("{}]", start + i + 1));
                push_tweet_lines(&mut lines, db, item)?;
                lines.push(separator());
            }
        }
        BrowseList::Users(items) => {
            for (i, user) in items[start..end].iter().enumerate() {
                lines.push(format!("{}]", start + i + 1));
                lines.push(format!("\t{} (+{})", user.name, user.usr));
                lines.push(format!("\t{}", user.city));
                lines.push(String::new());
                lines.push(separator());
            }
        }
    }

    let page = session.offset.div_ceil(session.page_size) + 1;
    let total = session.len().div_ceil(session.page_size).max(1);
    lines.push(format!("Showing page {page} of {total}"));
    lines.push(String::new());
    Ok(lines)
}

fn push_tweet_lines(lines: &mut Vec<String>, db: &Database, item: &FeedItem) -> anyhow::Result<()> {
    if let Some(parent_id) = item.reply_to {
        if let Some(parent) = query::quoted_parent(db, parent_id)? {
            lines.push(format!("\t[Replying to {} (+{})]", parent.name, parent.writer));
            lines.push(format!("\t >> {}", parent.text));
            lines.push(String::new());
        }
    }

    lines.push(format!("\t{} (+{})", item.display_name, item.author_id));
    lines.push(format!("\t{}", item.text));
    lines.push(String::new());

    match item.retweeter_id {
        Some(retweeter) => {
            let name = graph::user_name(db, retweeter)?;
            lines.push(format!(
                "\tRetweeted by {name} (+{retweeter}) on {}",
                item.date
            ));
        }
        None => lines.push(format!("\t{}", item.date)),
    }
    lines.push(String::new());
    Ok(())
}

/// The help menu: every verb capitalized, one per line, with a browsing
/// session's extra verbs slotted in before the always-available tail
/// (help/clear/exit).
pub(crate) fn menu_lines(options: &[&str], extra: &[&str]) -> Vec<String> {
    let split = options.len().saturating_sub(3);
    let mut all: Vec<&str> = Vec::new();
    all.extend(&options[..split]);
    all.extend(extra);
    all.extend(&options[split..]);

    let mut lines = vec![separator(), String::new()];
    for option in all {
        lines.push(format!("- {}", capitalize(option)));
    }
    lines.push(String::new());
    lines.push(separator());
    lines
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_core::models::UserSummary;
    use chirp_core::store::seed;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        seed::insert_sample_data(&db).unwrap();
        db
    }

    fn user(usr: i64, name: &str, city: &str) -> UserSummary {
        UserSummary {
            usr,
            name: name.to_string(),
            city: city.to_string(),
        }
    }

    #[test]
    fn test_empty_list_renders_no_results() {
        let db = seeded_db();
        let session = BrowseSession::users(vec![], 5);
        let lines = page_lines(&db, &session).unwrap();
        assert_eq!(lines[0], "No results found!");
    }

    #[test]
    fn test_footer_reflects_offset_and_total() {
        let db = seeded_db();
        let items: Vec<UserSummary> = (1..=7).map(|i| user(i, "U", "C")).collect();
        let mut session = BrowseSession::users(items, 5);

        let lines = page_lines(&db, &session).unwrap();
        assert!(lines.contains(&"Showing page 1 of 2".to_string()));

        session.scroll_down();
        let lines = page_lines(&db, &session).unwrap();
        assert!(lines.contains(&"Showing page 2 of 2".to_string()));
        // The second page indexes continue from the whole list.
        assert!(lines.contains(&"6]".to_string()));
        assert!(lines.contains(&"7]".to_string()));
        assert!(!lines.contains(&"8]".to_string()));
    }

    #[test]
    fn test_tweet_rendering_quotes_parent_and_retweeter() {
        let db = seeded_db();
        // Tweet 2 replies to tweet 1; render it as retweeted by user 1.
        let item = FeedItem {
            display_name: "User2".to_string(),
            tweet_id: 2,
            author_id: 2,
            date: "2023-03-01".to_string(),
            text: "This is #another tweet, a reply to the first".to_string(),
            reply_to: Some(1),
            retweeter_id: Some(1),
        };
        let session = BrowseSession::tweets(vec![item], 5);
        let lines = page_lines(&db, &session).unwrap();

        assert!(lines.contains(&"\t[Replying to User1 (+1)]".to_string()));
        assert!(lines.contains(&"\t >> This is a #test tweet.".to_string()));
        assert!(lines.contains(&"\tUser2 (+2)".to_string()));
        assert!(lines.contains(&"\tRetweeted by User1 (+1) on 2023-03-01".to_string()));
    }

    #[test]
    fn test_plain_tweet_renders_bare_date() {
        let db = seeded_db();
        let item = FeedItem {
            display_name: "User1".to_string(),
            tweet_id: 5,
            author_id: 1,
            date: "2023-05-27".to_string(),
            text: "plain post, no tags".to_string(),
            reply_to: None,
            retweeter_id: None,
        };
        let session = BrowseSession::tweets(vec![item], 5);
        let lines = page_lines(&db, &session).unwrap();
        assert!(lines.contains(&"\t2023-05-27".to_string()));
    }

    #[test]
    fn test_menu_slots_extra_options_before_tail() {
        let lines = menu_lines(
            &["feed", "logout", "help", "clear", "exit"],
            &["scrollup", "scrolldown"],
        );
        let entries: Vec<&str> = lines
            .iter()
            .filter(|l| l.starts_with("- "))
            .map(|l| l.as_str())
            .collect();
        assert_eq!(
            entries,
            vec![
                "- Feed",
                "- Logout",
                "- Scrollup",
                "- Scrolldown",
                "- Help",
                "- Clear",
                "- Exit",
            ]
        );
    }
}

//! Paginated result browsing.
//!
//! A browsing session is one interactive view over a fixed result list.
//! Sessions live on an explicit stack: `select` in a user list pushes a
//! tweet session for that user, and a global command unwinds the whole
//! stack back to the dispatcher. Transitions are plain methods on
//! `BrowseSession` so they can be tested without a terminal.

use std::io::BufRead;

use anyhow::Result;
use chirp_core::models::{FeedItem, UserSummary};
use chirp_core::{graph, query, stats, Database};

use crate::commands::{self, GlobalCmd};
use crate::format;
use crate::prompt::Prompter;
use crate::state::ShellState;

/// Page size for feeds and tweet searches.
pub(crate) const TWEET_PAGE: usize = 5;
/// Page size for user searches.
pub(crate) const USER_PAGE: usize = 5;
/// Page size for the tweets of a selected profile.
pub(crate) const PROFILE_TWEET_PAGE: usize = 3;

/// What a session lists, which governs the per-item verbs.
pub(crate) enum BrowseList {
    Tweets(Vec<FeedItem>),
    Users(Vec<UserSummary>),
}

/// One paginated, interactive view over a fixed result list.
pub(crate) struct BrowseSession {
    pub(crate) list: BrowseList,
    pub(crate) offset: usize,
    pub(crate) page_size: usize,
}

impl BrowseSession {
    pub(crate) fn tweets(items: Vec<FeedItem>, page_size: usize) -> Self {
        Self {
            list: BrowseList::Tweets(items),
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub(crate) fn users(items: Vec<UserSummary>, page_size: usize) -> Self {
        Self {
            list: BrowseList::Users(items),
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.list {
            BrowseList::Tweets(items) => items.len(),
            BrowseList::Users(items) => items.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance one page, but only when at least one further item exists.
    /// Returns whether the offset moved.
    pub(crate) fn scroll_down(&mut self) -> bool {
        if self.offset + self.page_size < self.len() {
            self.offset += self.page_size;
            true
        } else {
            false
        }
    }

    /// Back one page, clamped at the start. Returns whether the offset
    /// moved.
    pub(crate) fn scroll_up(&mut self) -> bool {
        let before = self.offset;
        self.offset = self.offset.saturating_sub(self.page_size);
        self.offset != before
    }

    /// Resolve a 1-based index against the whole list, not the visible
    /// page. `None` when out of [1, length].
    pub(crate) fn resolve(&self, index: usize) -> Option<usize> {
        (index >= 1 && index <= self.len()).then(|| index - 1)
    }

    /// The per-item verbs this session adds to the help menu.
    pub(crate) fn extra_options(&self) -> &'static [&'static str] {
        match self.list {
            BrowseList::Tweets(_) => &["scrollup", "scrolldown", "viewinfo", "reply", "retweet"],
            BrowseList::Users(_) => &["scrollup", "scrolldown", "select", "follow"],
        }
    }

    /// The stored id (tweet or user) behind a 1-based index argument.
    fn resolve_id(&self, arg: &str) -> Option<i64> {
        let index: usize = arg.parse().ok()?;
        let i = self.resolve(index)?;
        Some(match &self.list {
            BrowseList::Tweets(items) => items[i].tweet_id,
            BrowseList::Users(items) => items[i].usr,
        })
    }
}

/// Drive a stack of browsing sessions: render the page, read a command,
/// dispatch. Returns the global command that interrupted browsing (the
/// stack is unwound), or `None` when input ends. The page is re-rendered
/// before the first prompt and after state-changing navigation only.
pub(crate) fn run<R: BufRead>(
    root: BrowseSession,
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Option<GlobalCmd>> {
    let mut stack = vec![root];
    let mut render = true;

    loop {
        let mut push: Option<BrowseSession> = None;
        {
            let session = stack.last_mut().expect("browse stack never empties");
            if render {
                for line in format::page_lines(db, session)? {
                    println!("{line}");
                }
            }
            render = true;

            let Some(line) = input.read_line(">>> ")? else {
                return Ok(None);
            };
            let words: Vec<String> = line
                .trim()
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            let Some(verb) = words.first().map(String::as_str) else {
                println!("{}", format::error_line("INVALID COMMAND"));
                render = false;
                continue;
            };

            if let Some(global) =
                GlobalCmd::parse(verb).filter(|g| commands::available(state).contains(g))
            {
                if global == GlobalCmd::Help {
                    commands::print_menu(state, session.extra_options());
                    render = false;
                    continue;
                }
                return Ok(Some(global));
            }

            let is_users = matches!(session.list, BrowseList::Users(_));
            match (verb, words.len()) {
                ("scrolldown", 1) => render = session.scroll_down(),
                ("scrollup", 1) => render = session.scroll_up(),
                ("follow", 2) if is_users => {
                    render = false;
                    match session.resolve_id(&words[1]) {
                        Some(usr) => commands::follow_user(state, db, usr)?,
                        None => println!("{}", format::error_line("INVALID INDEX")),
                    }
                }
                ("select", 2) if is_users => match session.resolve_id(&words[1]) {
                    Some(usr) => {
                        show_profile(db, usr)?;
                        push = Some(BrowseSession::tweets(
                            query::user_tweets(db, usr)?,
                            PROFILE_TWEET_PAGE,
                        ));
                    }
                    None => {
                        render = false;
                        println!("{}", format::error_line("INVALID INDEX"));
                    }
                },
                ("reply", 2) if !is_users => {
                    render = false;
                    match session.resolve_id(&words[1]) {
                        Some(tid) => commands::compose_flow(state, db, input, Some(tid))?,
                        None => println!("{}", format::error_line("INVALID INDEX")),
                    }
                }
                ("retweet", 2) if !is_users => {
                    render = false;
                    match session.resolve_id(&words[1]) {
                        Some(tid) => commands::retweet_tweet(state, db, tid)?,
                        None => println!("{}", format::error_line("INVALID INDEX")),
                    }
                }
                ("viewinfo", 2) if !is_users => {
                    render = false;
                    match session.resolve_id(&words[1]) {
                        Some(tid) => {
                            let stats = stats::tweet_stats(db, tid)?;
                            println!(
                                "Tweet [{}] has {} retweets and {} replies",
                                words[1], stats.retweets, stats.replies
                            );
                        }
                        None => println!("{}", format::error_line("INVALID INDEX")),
                    }
                }
                _ => {
                    render = false;
                    println!("{}", format::error_line("INVALID COMMAND"));
                }
            }
        }

        if let Some(session) = push {
            stack.push(session);
        }
    }
}

fn show_profile(db: &Database, usr: i64) -> Result<()> {
    let name = graph::user_name(db, usr)?;
    let stats = stats::profile_stats(db, usr)?;
    println!();
    println!("You are looking at {name}'s profile.");
    println!(
        "Tweet Count: {}\t Followers: {} \t Following: {}",
        stats.tweets, stats.followers, stats.following
    );
    Ok(())
}

//! Top-level command dispatch and the interactive flows behind each verb.

use std::io::{BufRead, Write};

use anyhow::Result;
use chirp_core::models::Session;
use chirp_core::{content, graph, identity, query, Database, Error};
use crossterm::{cursor, execute, terminal};
use tracing::error;

use crate::browser::{self, BrowseSession};
use crate::format;
use crate::prompt::Prompter;
use crate::state::ShellState;

/// Global verbs reachable from every prompt, including inside a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalCmd {
    Login,
    Register,
    Feed,
    SearchTweets,
    Compose,
    SearchUsers,
    Followers,
    Logout,
    Help,
    Clear,
    Exit,
}

impl GlobalCmd {
    pub(crate) fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "login" => Self::Login,
            "register" => Self::Register,
            "feed" => Self::Feed,
            "searchtweets" => Self::SearchTweets,
            "compose" => Self::Compose,
            "searchusers" => Self::SearchUsers,
            "followers" => Self::Followers,
            "logout" => Self::Logout,
            "help" => Self::Help,
            "clear" => Self::Clear,
            "exit" => Self::Exit,
            _ => return None,
        })
    }

    fn word(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Feed => "feed",
            Self::SearchTweets => "searchtweets",
            Self::Compose => "compose",
            Self::SearchUsers => "searchusers",
            Self::Followers => "followers",
            Self::Logout => "logout",
            Self::Help => "help",
            Self::Clear => "clear",
            Self::Exit => "exit",
        }
    }
}

/// Verbs valid in the current login state, in help order. The last three
/// are always available.
pub(crate) fn available(state: &ShellState) -> Vec<GlobalCmd> {
    let mut options = Vec::new();
    if state.logged_in() {
        options.extend([
            GlobalCmd::Feed,
            GlobalCmd::SearchTweets,
            GlobalCmd::Compose,
            GlobalCmd::SearchUsers,
            GlobalCmd::Followers,
            GlobalCmd::Logout,
        ]);
    } else {
        options.extend([GlobalCmd::Login, GlobalCmd::Register]);
    }
    options.extend([GlobalCmd::Help, GlobalCmd::Clear, GlobalCmd::Exit]);
    options
}

pub(crate) fn print_menu(state: &ShellState, extra: &[&str]) {
    let words: Vec<&str> = available(state).iter().map(|c| c.word()).collect();
    for line in format::menu_lines(&words, extra) {
        println!("{line}");
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// Dispatch one line read at the main prompt. The whole line is the verb;
/// anything unrecognized or unavailable in the current login state is
/// reported and ignored.
pub(crate) fn dispatch<R: BufRead>(
    line: &str,
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Flow> {
    let word = line.trim().to_lowercase();
    match GlobalCmd::parse(&word).filter(|v| available(state).contains(v)) {
        Some(verb) => run_global(verb, state, db, input),
        None => {
            println!("{}", format::error_line("INVALID COMMAND"));
            Ok(Flow::Continue)
        }
    }
}

/// Execute a global verb. Browser-backed verbs can be interrupted by
/// another global verb; the loop keeps handing control over until a flow
/// finishes normally.
pub(crate) fn run_global<R: BufRead>(
    mut verb: GlobalCmd,
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Flow> {
    loop {
        let interrupt = match verb {
            GlobalCmd::Login => {
                if login_flow(state, db, input)? {
                    show_feed(state, db, input)?
                } else {
                    None
                }
            }
            GlobalCmd::Register => {
                register_flow(state, db, input)?;
                None
            }
            GlobalCmd::Feed => show_feed(state, db, input)?,
            GlobalCmd::SearchTweets => search_tweets_flow(state, db, input)?,
            GlobalCmd::Compose => {
                compose_flow(state, db, input, None)?;
                None
            }
            GlobalCmd::SearchUsers => search_users_flow(state, db, input)?,
            GlobalCmd::Followers => followers_flow(state, db, input)?,
            GlobalCmd::Logout => {
                logout(state);
                None
            }
            GlobalCmd::Help => {
                print_menu(state, &[]);
                None
            }
            GlobalCmd::Clear => {
                clear_screen();
                None
            }
            GlobalCmd::Exit => return Ok(Flow::Exit),
        };
        match interrupt {
            Some(next) => verb = next,
            None => return Ok(Flow::Continue),
        }
    }
}

pub(crate) fn clear_screen() {
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )
    .ok();
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Wrap an unexpected storage failure for propagation after logging.
fn fatal(err: Error) -> anyhow::Error {
    error!(error = %err, "storage failure");
    anyhow::Error::new(err)
}

// ─── Identity flows ─────────────────────────────────────────────────────────

/// Prompt for credentials until authentication succeeds or the user
/// cancels. Failed attempts report and retry.
fn login_flow<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<bool> {
    loop {
        let Some(user) = input.read_line("\nUser ID (or 'cancel'): ")? else {
            return Ok(false);
        };
        let user = user.trim().to_string();
        if user.eq_ignore_ascii_case("cancel") {
            println!("Login cancelled.\n");
            return Ok(false);
        }
        let Ok(uid) = user.parse::<i64>() else {
            println!("User ID must be numeric.");
            continue;
        };
        let Some(secret) = input.read_line("Password: ")? else {
            return Ok(false);
        };
        match identity::authenticate(db, uid, &secret).map_err(fatal)? {
            Some(name) => {
                println!("Welcome back, {name}.");
                println!("Here is your feed:\n");
                state.session = Some(Session { user_id: uid, name });
                return Ok(true);
            }
            None => println!("Login credentials do not match. Please try again."),
        }
    }
}

/// Prompt for profile fields, validate, confirm, insert. Validation
/// failures restart the prompts; declining the confirmation cancels.
fn register_flow<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<()> {
    println!();
    println!("Creating new account.");
    println!(
        "You will be asked for a name, email, city, timezone, and password, \
         after which you can confirm/cancel your registration."
    );
    println!();
    loop {
        let Some(name) = input.read_line("Display Name: ")? else {
            return Ok(());
        };
        let Some(email) = input.read_line("Email Address: ")? else {
            return Ok(());
        };
        let Some(city) = input.read_line("City: ")? else {
            return Ok(());
        };
        let Some(timezone) = input.read_line("Timezone (eg. -5): ")? else {
            return Ok(());
        };
        let Some(password) = input.read_line("Password: ")? else {
            return Ok(());
        };
        let Some(confirm) = input.read_line("Confirm Password: ")? else {
            return Ok(());
        };

        let form = identity::Registration {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            city: city.trim().to_string(),
            timezone: timezone.trim().to_string(),
            password,
            confirm,
        };
        match form.validate() {
            Ok(_) => {}
            Err(Error::InvalidEmail) => {
                println!("\nEmail was an invalid format. Please try again.");
                continue;
            }
            Err(Error::InvalidTimezone) => {
                println!("\nTimezone must be a number. Please try again.");
                continue;
            }
            Err(Error::PasswordMismatch) => {
                println!("\nPasswords entered do not match. Please try again.");
                continue;
            }
            Err(other) => return Err(fatal(other)),
        }

        let Some(go) = input.read_line(&format!("\nCreate new account for {}? (Y/n) ", form.name))?
        else {
            return Ok(());
        };
        if !go.trim().to_lowercase().starts_with('y') {
            println!("\nNew user registration cancelled.\n");
            return Ok(());
        }

        let usr = identity::register(db, &form).map_err(fatal)?;
        println!("\nWelcome, {}.", form.name);
        println!("Your new user ID is {usr}. You will need this ID later to log in.\n");
        state.session = Some(Session {
            user_id: usr,
            name: form.name,
        });
        return Ok(());
    }
}

fn logout(state: &mut ShellState) {
    if let Some(session) = state.session.take() {
        println!("{}, you have now logged out.\n", session.name);
    }
}

// ─── Browser-backed flows ───────────────────────────────────────────────────

fn show_feed<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Option<GlobalCmd>> {
    let Some(user) = state.user_id() else {
        return Ok(None);
    };
    let items = query::feed(db, user).map_err(fatal)?;
    browser::run(
        BrowseSession::tweets(items, browser::TWEET_PAGE),
        state,
        db,
        input,
    )
}

fn search_tweets_flow<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Option<GlobalCmd>> {
    let filters = loop {
        let Some(line) = input
            .read_line("Enter keywords to search for (separate multiple keywords with spaces): ")?
        else {
            return Ok(None);
        };
        let filters = query::parse_filters(&line);
        if filters.is_empty() {
            println!("Please enter at least one keyword.");
        } else {
            break filters;
        }
    };
    let items = query::search_tweets(db, &filters).map_err(fatal)?;
    browser::run(
        BrowseSession::tweets(items, browser::TWEET_PAGE),
        state,
        db,
        input,
    )
}

fn search_users_flow<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Option<GlobalCmd>> {
    let keyword = loop {
        let Some(line) = input.read_line("Enter a keyword to search users for: ")? else {
            return Ok(None);
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() == 1 {
            break words[0].to_string();
        }
        println!("Please enter only one (1) keyword");
    };
    let users = query::search_users(db, &keyword).map_err(fatal)?;
    browser::run(
        BrowseSession::users(users, browser::USER_PAGE),
        state,
        db,
        input,
    )
}

/// Followers are shown on a single page holding the whole list.
fn followers_flow<R: BufRead>(
    state: &mut ShellState,
    db: &Database,
    input: &mut Prompter<R>,
) -> Result<Option<GlobalCmd>> {
    let Some(user) = state.user_id() else {
        return Ok(None);
    };
    let users = query::followers(db, user).map_err(fatal)?;
    let page = users.len();
    browser::run(BrowseSession::users(users, page), state, db, input)
}

// ─── Content flows ──────────────────────────────────────────────────────────

/// Prompt for tweet text and compose, as a fresh tweet or as a reply to
/// `reply_to`.
pub(crate) fn compose_flow<R: BufRead>(
    state: &ShellState,
    db: &Database,
    input: &mut Prompter<R>,
    reply_to: Option<i64>,
) -> Result<()> {
    let Some(session) = state.session.as_ref() else {
        return Ok(());
    };
    let prompt = if reply_to.is_some() {
        "Enter reply: "
    } else {
        "Enter tweet message: "
    };
    let Some(text) = input.read_line(prompt)? else {
        return Ok(());
    };

    match content::compose_tweet(db, session.user_id, &text, reply_to, today()) {
        Ok(tweet) => {
            if tweet.replyto.is_some() {
                println!("Your reply has successfully been posted!");
            } else {
                println!("Your tweet has successfully been posted!");
            }
        }
        Err(Error::EmptyText) => println!("Empty tweet text. Cancelling compose.\n"),
        Err(Error::NoSuchParent(_)) => println!("Parent tweet does not exist.\n"),
        Err(other) => return Err(fatal(other)),
    }
    Ok(())
}

pub(crate) fn retweet_tweet(state: &ShellState, db: &Database, tid: i64) -> Result<()> {
    let Some(session) = state.session.as_ref() else {
        return Ok(());
    };
    match content::retweet(db, session.user_id, tid, today()) {
        Ok(()) => println!("Your retweet has successfully been posted!"),
        Err(Error::AlreadyRetweeted) => println!("You have already retweeted this tweet."),
        Err(Error::NoSuchTweet(_)) => println!("{}", format::error_line("INVALID INDEX")),
        Err(other) => return Err(fatal(other)),
    }
    Ok(())
}

pub(crate) fn follow_user(state: &ShellState, db: &Database, usr: i64) -> Result<()> {
    let Some(session) = state.session.as_ref() else {
        return Ok(());
    };
    let name = match graph::user_name(db, usr) {
        Ok(name) => name,
        Err(Error::NoSuchUser(_)) => {
            println!("{}", format::error_line("INVALID INDEX"));
            return Ok(());
        }
        Err(other) => return Err(fatal(other)),
    };
    match graph::follow(db, session.user_id, usr, today()) {
        Ok(()) => println!("You started following {name}"),
        Err(Error::AlreadyFollowing) => println!("You already follow {name}"),
        Err(other) => return Err(fatal(other)),
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_core::store::seed;
    use std::io::Cursor;

    fn seeded() -> (ShellState, Database) {
        let db = Database::open_in_memory().unwrap();
        seed::insert_sample_data(&db).unwrap();
        (ShellState::new(), db)
    }

    fn logged_in(usr: i64, name: &str) -> ShellState {
        let mut state = ShellState::new();
        state.session = Some(Session {
            user_id: usr,
            name: name.to_string(),
        });
        state
    }

    #[test]
    fn test_parse_round_trips_every_verb() {
        for verb in [
            GlobalCmd::Login,
            GlobalCmd::Register,
            GlobalCmd::Feed,
            GlobalCmd::SearchTweets,
            GlobalCmd::Compose,
            GlobalCmd::SearchUsers,
            GlobalCmd::Followers,
            GlobalCmd::Logout,
            GlobalCmd::Help,
            GlobalCmd::Clear,
            GlobalCmd::Exit,
        ] {
            assert_eq!(GlobalCmd::parse(verb.word()), Some(verb));
        }
        assert_eq!(GlobalCmd::parse("tweet"), None);
    }

    #[test]
    fn test_available_depends_on_login_state() {
        let (state, _db) = seeded();
        let logged_out = available(&state);
        assert!(logged_out.contains(&GlobalCmd::Login));
        assert!(!logged_out.contains(&GlobalCmd::Feed));

        let state = logged_in(1, "User1");
        let opts = available(&state);
        assert!(opts.contains(&GlobalCmd::Feed));
        assert!(!opts.contains(&GlobalCmd::Login));
        assert_eq!(
            &opts[opts.len() - 3..],
            &[GlobalCmd::Help, GlobalCmd::Clear, GlobalCmd::Exit]
        );
    }

    #[test]
    fn test_dispatch_rejects_unavailable_verbs() {
        let (mut state, db) = seeded();
        let mut input = Prompter::new(Cursor::new(""));
        // "feed" while logged out must not open a browser (which would
        // try to read input and end the flow on EOF anyway).
        let flow = dispatch("feed", &mut state, &db, &mut input).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(!state.logged_in());
    }

    #[test]
    fn test_login_flow_retries_then_succeeds() {
        let (mut state, db) = seeded();
        // Wrong password once, then the right one; the feed browser is
        // then interrupted by exit.
        let script = "12\nwrong\n12\npassword12\nexit\n";
        let mut input = Prompter::new(Cursor::new(script));
        let flow = run_global(GlobalCmd::Login, &mut state, &db, &mut input).unwrap();
        assert_eq!(flow, Flow::Exit);
        assert_eq!(state.user_id(), Some(12));
    }

    #[test]
    fn test_login_cancel() {
        let (mut state, db) = seeded();
        let mut input = Prompter::new(Cursor::new("cancel\n"));
        let flow = run_global(GlobalCmd::Login, &mut state, &db, &mut input).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(!state.logged_in());
    }

    #[test]
    fn test_register_flow_revalidates_then_creates() {
        let (mut state, db) = seeded();
        // First round: bad email. Second round: valid, confirmed.
        let script = "Grace\nbad-email\nYork\n-5\npw\npw\n\
                      Grace\ngrace@example.com\nYork\n-5\npw\npw\ny\n";
        let mut input = Prompter::new(Cursor::new(script));
        let flow = run_global(GlobalCmd::Register, &mut state, &db, &mut input).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(state.user_id(), Some(15));
        assert_eq!(
            identity::authenticate(&db, 15, "pw").unwrap(),
            Some("Grace".to_string())
        );
    }

    #[test]
    fn test_register_flow_declined_confirmation() {
        let (mut state, db) = seeded();
        let script = "Grace\ngrace@example.com\nYork\n-5\npw\npw\nn\n";
        let mut input = Prompter::new(Cursor::new(script));
        run_global(GlobalCmd::Register, &mut state, &db, &mut input).unwrap();
        assert!(!state.logged_in());
        assert_eq!(identity::authenticate(&db, 15, "pw").unwrap(), None);
    }

    #[test]
    fn test_compose_flow_posts_for_session_user() {
        let (_, db) = seeded();
        let state = logged_in(1, "User1");
        let mut input = Prompter::new(Cursor::new("a brand new #post\n"));
        compose_flow(&state, &db, &mut input, None).unwrap();

        let items = query::search_tweets(&db, &query::parse_filters("#post")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].author_id, 1);
        assert_eq!(items[0].tweet_id, 8, "next id after the seeded 7");
    }

    #[test]
    fn test_browser_interrupt_chains_into_next_flow() {
        let (_, db) = seeded();
        let mut state = logged_in(1, "User1");
        // Open the feed, interrupt it with searchusers, search, then exit
        // out of the user browser.
        let script = "searchusers\nSam\nfollow 1\nexit\n";
        let mut input = Prompter::new(Cursor::new(script));
        let flow = run_global(GlobalCmd::Feed, &mut state, &db, &mut input).unwrap();
        assert_eq!(flow, Flow::Exit);

        // "Sam" ranks user 12 first; the follow must have landed.
        assert_eq!(chirp_core::graph::follower_count(&db, 12).unwrap(), 1);
    }

    #[test]
    fn test_logout_clears_session() {
        let mut state = logged_in(1, "User1");
        logout(&mut state);
        assert!(!state.logged_in());
    }
}

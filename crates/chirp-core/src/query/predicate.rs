//! Typed filter clauses for tweet search.
//!
//! Free text is tokenized into filters which compile to parameterized SQL
//! predicates; assembling queries from typed clauses instead of string
//! concatenation keeps the search injection-safe and testable.

/// One filter clause of a tweet search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetFilter {
    /// `#term` — tweets holding a mention row for exactly this term.
    Hashtag(String),
    /// Bare token — case-insensitive substring of the tweet text.
    Keyword(String),
}

/// Tokenize free text on whitespace, lowercased. A `#` prefix selects the
/// exact-hashtag filter; everything else is a substring keyword.
pub fn parse_filters(input: &str) -> Vec<TweetFilter> {
    input
        .split_whitespace()
        .map(|token| {
            let token = token.to_lowercase();
            match token.strip_prefix('#') {
                Some(term) => TweetFilter::Hashtag(term.to_string()),
                None => TweetFilter::Keyword(token),
            }
        })
        .collect()
}

impl TweetFilter {
    /// SQL predicate over the tweet alias `t`, plus its parameter.
    fn to_sql(&self) -> (&'static str, String) {
        match self {
            TweetFilter::Hashtag(term) => (
                "EXISTS (SELECT 1 FROM mentions m WHERE m.tid = t.tid AND LOWER(m.term) = ?)",
                term.clone(),
            ),
            TweetFilter::Keyword(word) => ("LOWER(t.text) LIKE ?", format!("%{word}%")),
        }
    }
}

/// OR-combine filters into a WHERE fragment and its parameters. The
/// search is deliberately inclusive: a tweet matching any one filter
/// qualifies.
pub(crate) fn where_clause(filters: &[TweetFilter]) -> (String, Vec<String>) {
    let mut clauses = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());
    for filter in filters {
        let (sql, param) = filter.to_sql();
        clauses.push(sql);
        params.push(param);
    }
    (clauses.join(" OR "), params)
}

//! Comment content heuristic
//!
//! A match marks a comment as suspect. Suspect comments are still stored,
//! just held for review instead of being published.

use lazy_static::lazy_static;
use regex::Regex;

/// Terms that flag a comment regardless of blog settings
const BUILTIN_DENYLIST: &[&str] = &[
    "casino",
    "viagra",
    "cialis",
    "payday loan",
    "crypto giveaway",
    "free money",
    "replica watches",
    "porn",
    "xxx",
    "bitcoin doubler",
];

lazy_static! {
    static ref LINK_REGEX: Regex = Regex::new(r"(?i)(https?://|www\.)").unwrap();
    static ref DIGIT_RUN_REGEX: Regex = Regex::new(r"\d{12,}").unwrap();
}

/// Links allowed before a comment counts as link spam
const MAX_LINKS: usize = 2;
/// Same character this many times in a row is flagged
const REPEATED_CHAR_RUN: usize = 10;

/// Why a comment was flagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpamReason {
    DeniedTerm(String),
    TooManyLinks(usize),
    RepeatedCharacters,
    DigitRun,
}

#[derive(Debug, Clone, Default)]
pub struct SpamFilter {
    denylist: Vec<String>,
}

impl SpamFilter {
    /// Built-in terms plus operator supplied ones
    pub fn new(extra: &[String]) -> Self {
        let mut denylist: Vec<String> = BUILTIN_DENYLIST.iter().map(|s| s.to_string()).collect();
        for term in extra {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !denylist.contains(&term) {
                denylist.push(term);
            }
        }
        Self { denylist }
    }

    /// First rule the content trips, if any. `blocklist` holds the blog's
    /// own lowercase terms.
    pub fn check(&self, content: &str, blocklist: &[String]) -> Option<SpamReason> {
        let lowered = content.to_lowercase();

        if let Some(term) = self
            .denylist
            .iter()
            .chain(blocklist.iter())
            .find(|term| !term.is_empty() && lowered.contains(term.as_str()))
        {
            return Some(SpamReason::DeniedTerm(term.clone()));
        }

        let links = LINK_REGEX.find_iter(content).count();
        if links > MAX_LINKS {
            return Some(SpamReason::TooManyLinks(links));
        }

        if has_char_run(content, REPEATED_CHAR_RUN) {
            return Some(SpamReason::RepeatedCharacters);
        }

        if DIGIT_RUN_REGEX.is_match(content) {
            return Some(SpamReason::DigitRun);
        }

        None
    }
}

// The regex crate has no backreferences, so runs are counted by hand.
fn has_char_run(content: &str, len: usize) -> bool {
    let mut prev = None;
    let mut run = 0;
    for c in content.chars() {
        if c.is_whitespace() {
            prev = None;
            run = 0;
            continue;
        }
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= len {
            return true;
        }
    }
    false
}

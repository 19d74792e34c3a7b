//! `sNNeMM` / `sNNsMM` episode codes.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::episodes::CODE_WIDTH;
use crate::models::episode::EpisodeRecord;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid episode code: {0}")]
pub struct ParseEpisodeCodeError(String);

/// Presentation and sort key for an episode. Never persisted.
///
/// Ordering is season first, then regular episodes before specials, then
/// number.
///
/// ```rust
/// use lundflix::domain::EpisodeCode;
///
/// assert_eq!(EpisodeCode::new(1, 2, false).to_string(), "s01e02");
/// assert_eq!(EpisodeCode::new(3, 1, true).to_string(), "s03s01");
/// assert_eq!("S10E105".parse::<EpisodeCode>().unwrap(), EpisodeCode::new(10, 105, false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeCode {
    season: u32,
    special: bool,
    number: u32,
}

impl EpisodeCode {
    #[must_use]
    pub const fn new(season: u32, number: u32, special: bool) -> Self {
        Self {
            season,
            special,
            number,
        }
    }

    /// Code for a stored record; `None` while the record has no number.
    #[must_use]
    pub fn for_record(record: &EpisodeRecord) -> Option<Self> {
        record
            .number
            .map(|number| Self::new(record.season, number, record.episode_type.is_special()))
    }

    #[must_use]
    pub const fn season(&self) -> u32 {
        self.season
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.special
    }

    const fn separator(&self) -> char {
        if self.special { 's' } else { 'e' }
    }

    /// True when `next` directly follows `self` in the same season and kind.
    fn continues_into(&self, next: &Self) -> bool {
        self.season == next.season
            && self.special == next.special
            && self.number.checked_add(1).is_some_and(|n| n == next.number)
    }
}

impl fmt::Display for EpisodeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s{:0w$}{}{:0w$}",
            self.season,
            self.separator(),
            self.number,
            w = CODE_WIDTH
        )
    }
}

impl FromStr for EpisodeCode {
    type Err = ParseEpisodeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = get_regex(&RE, r"(?i)^s([0-9]+)([es])([0-9]+)$");

        let err = || ParseEpisodeCodeError(s.to_string());
        let caps = re.captures(s.trim()).ok_or_else(err)?;

        Ok(Self::new(
            caps[1].parse().map_err(|_| err())?,
            caps[3].parse().map_err(|_| err())?,
            caps[2].eq_ignore_ascii_case("s"),
        ))
    }
}

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Compact label for a set of codes, collapsing consecutive runs within the
/// same season and kind: `s01e01-e03, s01s01`.
#[must_use]
pub fn summarize_codes(codes: &[EpisodeCode]) -> String {
    let mut sorted = codes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut iter = sorted.into_iter().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(next) = iter.next_if(|next| end.continues_into(next)) {
            end = next;
        }

        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!(
                "{start}-{}{:0w$}",
                end.separator(),
                end.number,
                w = CODE_WIDTH
            ));
        }
    }

    parts.join(", ")
}

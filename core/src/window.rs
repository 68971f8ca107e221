use std::str::FromStr;

use thiserror::Error;
use time::{
    Duration,
    OffsetDateTime,
};


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFilter {
    #[error("time filter `{0}` is too short, expected <amount><unit> such as 12h")]
    TooShort(String),
    #[error("time filter `{0}` is missing an amount")]
    MissingAmount(String),
    #[error("time filter amount `{0}` must be a positive integer")]
    Amount(String),
    #[error("unknown time filter unit `{0}`, expected one of m, h, d, y")]
    Unit(char),
    #[error("time filter `{0}` reaches too far back")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Minutes,
    Hours,
    Days,
    Years,
}

impl Unit {
    pub const fn seconds(self) -> i64 {
        match self {
            Unit::Minutes => 60,
            Unit::Hours => 60 * 60,
            Unit::Days => 24 * 60 * 60,
            Unit::Years => 365 * 24 * 60 * 60,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'm' => Some(Unit::Minutes),
            'h' => Some(Unit::Hours),
            'd' => Some(Unit::Days),
            'y' => Some(Unit::Years),
            _ => None,
        }
    }
}

/// How far back in time listens are considered
///
/// Parsed from `<amount><unit>`, e.g. `90m`, `12h`, `7d` or `1y`. An empty string means no limit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    #[default]
    All,
    Last {
        amount: i64,
        unit: Unit,
    },
}

impl Window {
    /// Length of the window, `None` when unbounded
    pub fn duration(&self) -> Option<Duration> {
        match *self {
            Window::All => None,
            Window::Last { amount, unit } => Some(Duration::seconds(amount.saturating_mul(unit.seconds()))),
        }
    }

    /// The oldest time still inside the window when looking back from `now`
    pub fn cutoff(&self, now: OffsetDateTime) -> Result<Option<OffsetDateTime>, InvalidFilter> {
        match self.duration() {
            None => Ok(None),
            Some(d) => now.checked_sub(d).map(Some).ok_or_else(|| InvalidFilter::OutOfRange(self.to_string())),
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Window::All => Ok(()),
            Window::Last { amount, unit } => {
                let u = match unit {
                    Unit::Minutes => 'm',
                    Unit::Hours => 'h',
                    Unit::Days => 'd',
                    Unit::Years => 'y',
                };
                write!(f, "{amount}{u}")
            },
        }
    }
}

impl FromStr for Window {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Window::All);
        }

        let mut chars = s.chars();
        let u = chars.next_back().ok_or_else(|| InvalidFilter::TooShort(s.to_owned()))?;
        let amount = chars.as_str();
        if amount.is_empty() {
            return Err(InvalidFilter::TooShort(s.to_owned()));
        }

        let unit = Unit::from_char(u).ok_or(InvalidFilter::Unit(u))?;
        let amount = match amount.parse::<i64>() {
            Ok(n) if n > 0 => n,
            _ if amount.chars().all(|c| c == '+' || c == '-') => return Err(InvalidFilter::MissingAmount(s.to_owned())),
            _ => return Err(InvalidFilter::Amount(amount.to_owned())),
        };
        amount.checked_mul(unit.seconds()).ok_or_else(|| InvalidFilter::OutOfRange(s.to_owned()))?;

        Ok(Window::Last { amount, unit })
    }
}

/// Parses a `<amount><unit>` time filter into the absolute cutoff time relative to `now`
///
/// # Errors
///
/// Returns [`InvalidFilter`] if `filter` is not empty and not a valid window,
/// or the window reaches back further than can be represented.
pub fn parse_cutoff(filter: &str, now: OffsetDateTime) -> Result<Option<OffsetDateTime>, InvalidFilter> {
    filter.parse::<Window>()?.cutoff(now)
}

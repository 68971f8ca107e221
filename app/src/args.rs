use anyhow::{
    anyhow,
    Context,
    Result,
};
use clap::{
    error::ErrorKind,
    CommandFactory,
    Parser,
};
use lb_cleaner_services::{
    paginate::Limits,
    service::MAX_PAGE_SIZE,
    Window,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::matcher::Matcher;


/// Search the listen history of a `ListenBrainz` user, printing and optionally deleting matches
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// ListenBrainz API token
    #[arg(short, long, env = "LISTENBRAINZ_TOKEN", hide_env_values = true)]
    pub token: Option<Uuid>,

    /// The user name or login ID
    #[arg(short, long)]
    pub user: String,

    /// Case-insensitive regex matched against `[<time>] <artist> - "<track>"`
    #[arg(short, long, default_value = ".*")]
    pub search: String,

    /// Only search the N most recent listens
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Only search listens within this long ago
    ///
    /// Format is <amount><unit> where unit is one of m(inutes), h(ours), d(ays) or y(ears), e.g. 12h
    #[arg(short, long)]
    pub within: Option<Window>,

    /// Delete matched listens
    #[arg(short, long)]
    pub delete: bool,

    /// Url of the listenbrainz compatible API to search
    #[arg(long)]
    pub url: Option<String>,

    /// How many listens to request per page
    #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = clap::value_parser!(u16).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: u16,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Debug/verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything a single run needs, resolved from [`Args`] before any request is made
#[derive(Debug)]
pub(crate) struct Config {
    pub user: String,
    pub matcher: Matcher,
    pub limits: Limits,
    pub delete: bool,
}

impl Args {
    pub fn token(&self) -> Result<String> {
        self.token
            .map(|t| t.as_hyphenated().to_string())
            .ok_or_else(|| anyhow!("please define LISTENBRAINZ_TOKEN or pass --token"))
    }

    /// Resolves the run configuration, measuring the time filter back from `now`
    ///
    /// A time filter reaching back further than representable fails with a usage [`clap::Error`].
    pub fn config(&self, now: OffsetDateTime) -> Result<Config> {
        let matcher = Matcher::new(&self.search).with_context(|| format!("Invalid search pattern `{}`", self.search))?;
        let window = self.within.unwrap_or_default();
        let cutoff = window
            .cutoff(now)
            .map_err(|e| Args::command().error(ErrorKind::ValueValidation, format!("invalid value '{window}' for '--within <WITHIN>': {e}")))?;

        Ok(Config {
            user: self.user.clone(),
            matcher,
            limits: Limits {
                max_count: self.limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX)),
                cutoff: cutoff.map(OffsetDateTime::unix_timestamp),
            },
            delete: self.delete,
        })
    }
}

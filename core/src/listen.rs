use std::fmt::{
    self,
    Display,
};

use serde::Deserialize;
use time::format_description::well_known::Rfc3339;

use crate::ListenData;


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub track_name: String,
    pub artist_name: String,
}

/// A single listen of a [`Track`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Listen {
    pub recording_msid: String,
    pub track_metadata: Track,
    pub listened_at: i64,
}

impl ListenData for Listen {
    #[inline]
    fn listened_at(&self) -> i64 { self.listened_at }

    #[inline]
    fn recording_msid(&self) -> &str { self.recording_msid.as_str() }

    #[inline]
    fn track_name(&self) -> &str { self.track_metadata.track_name.as_str() }

    #[inline]
    fn artist_name(&self) -> &str { self.track_metadata.artist_name.as_str() }
}

impl Display for Listen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Rendered(self).fmt(f) }
}


/// Renders any [`ListenData`] as `[<rfc3339 time>] <artist> - "<track>"`
///
/// Timestamps that can't be represented as a date are written as the raw unix timestamp.
pub struct Rendered<'l, L: ?Sized>(pub &'l L);

impl<L: ListenData + ?Sized> Display for Rendered<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listen = self.0;
        match listen.listened_time().and_then(|t| t.format(&Rfc3339).ok()) {
            Some(ts) => write!(f, "[{ts}]")?,
            None => write!(f, "[{}]", listen.listened_at())?,
        }
        write!(f, " {} - \"{}\"", listen.artist_name(), listen.track_name())
    }
}


/// One page of a user's listens, newest first
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub latest_listen_ts: i64,
    pub listens: Vec<Listen>,
}

impl Page {
    #[inline]
    pub fn is_empty(&self) -> bool { self.listens.is_empty() }

    /// Timestamp of the last, and therefore oldest, listen in the page
    #[inline]
    pub fn oldest(&self) -> Option<i64> { self.listens.last().map(|l| l.listened_at) }
}

/// Response body of the user listens endpoint
#[derive(Debug, Deserialize)]
pub struct UserListens {
    pub payload: Page,
}

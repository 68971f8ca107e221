use time::OffsetDateTime;

mod listen;
mod window;

pub use listen::*;
pub use window::*;


/// Read access to a single listen as reported by a listenbrainz compatible service
pub trait ListenData {
    fn listened_at(&self) -> i64;

    fn recording_msid(&self) -> &str;

    fn track_name(&self) -> &str;
    fn artist_name(&self) -> &str;

    /// UTC time of the listen, or `None` if the timestamp is out of range
    fn listened_time(&self) -> Option<OffsetDateTime> { OffsetDateTime::from_unix_timestamp(self.listened_at()).ok() }
}

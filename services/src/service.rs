use lb_cleaner_core::{
    ListenData,
    Page,
};

use crate::{
    DeleteFailure,
    Result,
};

mod listenbrainz;
pub use listenbrainz::*;


/// A paginated history of listens, walked backwards in time
pub trait ListenSource {
    /// Fetch the newest page of listens strictly older than `cursor`, or the most recent page if `None`
    fn fetch(&self, cursor: Option<i64>) -> Result<Page>;
}

pub trait ListenRemover {
    fn delete<L: ListenData + ?Sized>(&self, listen: &L) -> Result<(), DeleteFailure>;
}

//! Walks a [`ListenSource`] backwards in time, one page at a time.
//!
//! The only way to page through the listens endpoint is "the newest N listens older than T", so each
//! request uses the timestamp of the oldest listen already seen as an exclusive upper bound.

use std::vec;

use lb_cleaner_core::Listen;
use log::{
    debug,
    warn,
};

use crate::{
    service::ListenSource,
    Result,
};


/// When to stop collecting listens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Stop once this many listens are collected
    pub max_count: usize,
    /// Stop at the first listen older than this unix timestamp
    pub cutoff: Option<i64>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_count: usize::MAX,
            cutoff: None,
        }
    }
}

impl Limits {
    #[inline]
    fn admits(&self, listen: &Listen) -> bool { self.cutoff.map_or(true, |ts| listen.listened_at >= ts) }
}


/// Lazily yields every listen of a source, newest first
///
/// A page is only requested once every listen of the previous one has been consumed. Iteration ends
/// at the first empty page or after yielding an error.
pub struct Paginator<'s, S: ?Sized> {
    source: &'s S,
    page: vec::IntoIter<Listen>,
    oldest: Option<i64>,
    pages: usize,
    done: bool,
}

impl<'s, S: ListenSource + ?Sized> Paginator<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            page: Vec::new().into_iter(),
            oldest: None,
            pages: 0,
            done: false,
        }
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> usize { self.pages }

    /// Loads the next page, returning `false` when there is nothing left to read
    fn next_page(&mut self) -> Result<bool> {
        let cursor = self.oldest;
        let page = self.source.fetch(cursor)?;
        self.pages += 1;

        let Some(oldest) = page.oldest() else {
            debug!("Empty page after {} requests, history exhausted", self.pages);
            return Ok(false);
        };
        if cursor.is_some_and(|max_ts| oldest >= max_ts) {
            warn!("Page {} did not move past timestamp {oldest}, stopping", self.pages);
            return Ok(false);
        }

        self.page = page.listens.into_iter();
        Ok(true)
    }
}

impl<S: ListenSource + ?Sized> Iterator for Paginator<'_, S> {
    type Item = Result<Listen>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(listen) = self.page.next() {
                self.oldest = Some(listen.listened_at);
                return Some(Ok(listen));
            }
            if self.done {
                return None;
            }
            match self.next_page() {
                Ok(true) => continue,
                Ok(false) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                },
            }
        }
    }
}


/// Collects listens from `source`, newest first, until it runs dry or a [`Limits`] boundary is hit
///
/// Limits are checked per listen, so a boundary in the middle of a page never requests another one.
///
/// # Errors
///
/// The first failed page request aborts collection; listens gathered up to that point are dropped.
pub fn fetch_listens<S: ListenSource + ?Sized>(source: &S, limits: Limits) -> Result<Vec<Listen>> {
    let mut pages = Paginator::new(source);
    let listens = pages
        .by_ref()
        .take_while(|res| res.as_ref().map_or(true, |l| limits.admits(l)))
        .take(limits.max_count)
        .collect::<Result<Vec<_>>>()?;

    debug!("Collected {} listens from {} pages", listens.len(), pages.pages_fetched());
    Ok(listens)
}

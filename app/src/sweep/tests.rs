use std::cell::{
    Cell,
    RefCell,
};

use lb_cleaner_services::{
    paginate::Limits,
    DeleteFailure,
    Error,
    Listen,
    ListenData,
    Page,
    StatusCode,
    Track,
};

use super::*;
use crate::matcher::Matcher;

/// One page of canned listens, then an empty page
struct History {
    listens: Vec<Listen>,
    fail: bool,
    fetches: Cell<usize>,
}

impl History {
    fn new(listens: Vec<Listen>) -> Self {
        Self {
            listens,
            fail: false,
            fetches: Cell::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

impl ListenSource for History {
    fn fetch(&self, cursor: Option<i64>) -> lb_cleaner_services::Result<Page> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail {
            return Err(Error::Status(StatusCode::BAD_GATEWAY));
        }
        Ok(Page {
            listens: if cursor.is_none() { self.listens.clone() } else { Vec::new() },
            ..Page::default()
        })
    }
}

/// Records delete requests, rejecting listens whose msid is in `missing`
#[derive(Default)]
struct Remover {
    missing: Vec<&'static str>,
    deleted: RefCell<Vec<String>>,
}

impl ListenRemover for Remover {
    fn delete<L: ListenData + ?Sized>(&self, listen: &L) -> Result<(), DeleteFailure> {
        self.deleted.borrow_mut().push(listen.recording_msid().to_owned());
        if self.missing.iter().any(|m| *m == listen.recording_msid()) {
            Err(DeleteFailure::Status(StatusCode::NOT_FOUND))
        } else {
            Ok(())
        }
    }
}

fn listen(msid: &str, ts: i64, artist: &str, track: &str) -> Listen {
    Listen {
        recording_msid: msid.to_owned(),
        track_metadata: Track {
            track_name: track.to_owned(),
            artist_name: artist.to_owned(),
        },
        listened_at: ts,
    }
}

fn history() -> Vec<Listen> {
    vec![
        listen("msid-3", 1_669_318_360, "Pink Floyd", "Time"),
        listen("msid-2", 1_669_318_000, "The Cab", "Angel With A Shotgun"),
        listen("msid-1", 1_669_317_000, "Pink Floyd", "Money"),
    ]
}

fn config(pattern: &str, delete: bool) -> Config {
    Config {
        user: "someone".to_owned(),
        matcher: Matcher::new(pattern).expect("Failed to compile pattern"),
        limits: Limits::default(),
        delete,
    }
}

fn lines(out: Vec<u8>) -> Vec<String> { String::from_utf8(out).expect("Output is not utf8").lines().map(str::to_owned).collect() }


#[test]
fn test_list_only() {
    let source = History::new(history());
    let remover = Remover::default();
    let mut out = Vec::new();

    let summary = sweep(&config("floyd", false), &source, &remover, &mut out).expect("Sweep failed");
    assert_eq!(summary, Summary {
        scanned: 3,
        matched: 2,
        deleted: 0,
        failed: 0,
    });
    assert_eq!(lines(out), [
        r#"[2022-11-24T19:32:40Z] Pink Floyd - "Time""#,
        r#"[2022-11-24T19:10:00Z] Pink Floyd - "Money""#,
    ]);
    assert!(remover.deleted.borrow().is_empty());
    assert_eq!(source.fetches.get(), 2);
}

#[test]
fn test_delete_matches() {
    let source = History::new(history());
    let remover = Remover::default();
    let mut out = Vec::new();

    let summary = sweep(&config("floyd", true), &source, &remover, &mut out).expect("Sweep failed");
    assert_eq!(summary.deleted, 2);
    assert_eq!(*remover.deleted.borrow(), ["msid-3", "msid-1"]);
}

#[test]
fn test_delete_failure_continues() {
    let source = History::new(history());
    let remover = Remover {
        missing: vec!["msid-2"],
        ..Remover::default()
    };
    let mut out = Vec::new();

    let summary = sweep(&config(".+", true), &source, &remover, &mut out).expect("Delete failure should not be fatal");
    assert_eq!(summary, Summary {
        scanned: 3,
        matched: 3,
        deleted: 2,
        failed: 1,
    });
    assert_eq!(lines(out).len(), 3);
    assert_eq!(*remover.deleted.borrow(), ["msid-3", "msid-2", "msid-1"]);
}

#[test]
fn test_limits_applied_before_matching() {
    let source = History::new(history());
    let remover = Remover::default();
    let mut out = Vec::new();
    let config = Config {
        limits: Limits {
            max_count: 2,
            cutoff: None,
        },
        ..config("floyd", true)
    };

    let summary = sweep(&config, &source, &remover, &mut out).expect("Sweep failed");
    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.matched, 1);
    assert_eq!(*remover.deleted.borrow(), ["msid-3"]);
    assert_eq!(source.fetches.get(), 1);
}

#[test]
fn test_cutoff() {
    let source = History::new(history());
    let remover = Remover::default();
    let mut out = Vec::new();
    let config = Config {
        limits: Limits {
            cutoff: Some(1_669_318_000),
            ..Limits::default()
        },
        ..config(".*", false)
    };

    let summary = sweep(&config, &source, &remover, &mut out).expect("Sweep failed");
    assert_eq!(summary.scanned, 2);
    assert_eq!(lines(out).len(), 2);
    assert_eq!(source.fetches.get(), 1);
}

#[test]
fn test_fetch_failure_is_fatal() {
    let source = History::failing();
    let remover = Remover::default();
    let mut out = Vec::new();

    let err = sweep(&config(".*", true), &source, &remover, &mut out).unwrap_err();
    assert!(err.to_string().contains("someone"), "{err:#}");
    assert!(out.is_empty());
    assert!(remover.deleted.borrow().is_empty());
}

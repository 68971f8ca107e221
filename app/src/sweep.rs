use std::io::Write;

use anyhow::{
    Context,
    Result,
};
use lb_cleaner_services::{
    paginate::fetch_listens,
    service::{
        ListenRemover,
        ListenSource,
    },
};
use log::{
    info,
    warn,
};

use crate::args::Config;


#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub scanned: usize,
    pub matched: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Fetches the configured listens, writes each match to `out` and deletes it if requested
///
/// Failing to delete a single listen is only a warning; fetching, matching and writing output are fatal.
pub(crate) fn sweep<S, R, W>(config: &Config, source: &S, remover: &R, out: &mut W) -> Result<Summary>
where
    S: ListenSource + ?Sized,
    R: ListenRemover,
    W: Write + ?Sized,
{
    let listens = fetch_listens(source, config.limits).with_context(|| format!("Failed fetching listens of {}", config.user))?;
    info!("Searching {} listens of {}", listens.len(), config.user);

    let mut summary = Summary {
        scanned: listens.len(),
        ..Summary::default()
    };
    for listen in listens.iter().filter(|l| config.matcher.is_match(*l)) {
        summary.matched += 1;
        writeln!(out, "{listen}")?;

        if !config.delete {
            continue;
        }
        match remover.delete(listen) {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                summary.failed += 1;
                warn!("Failed deleting listen {listen}: {:#}", anyhow::Error::from(e));
            },
        }
    }

    Ok(summary)
}


#[cfg(test)]
mod tests;

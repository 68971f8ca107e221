use std::{
    io::{
        self,
        Write,
    },
    time::Duration,
};

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use lb_cleaner_services::service::Client;
use log::{
    info,
    warn,
};
use time::OffsetDateTime;

mod args;
mod matcher;
mod sweep;

use args::Args;
use sweep::{
    sweep,
    Summary,
};


fn init_logger(verbose: bool) {
    let filter = if verbose {
        "warn,lb_listen_cleaner=debug,lb_cleaner_services=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

/// Resolves the token and configuration, then searches the user's listens, writing matches to `out`
///
/// Nothing is sent over the network until the token and configuration are known to be usable.
fn run<W: Write + ?Sized>(args: &Args, out: &mut W) -> Result<Summary> {
    let token = args.token()?;
    let config = args.config(OffsetDateTime::now_utc())?;

    let timeout = Duration::from_secs(args.timeout);
    let client = args
        .url
        .as_deref()
        .map(|url| Client::new_with_url(url, timeout))
        .unwrap_or_else(|| Client::new(timeout))?;

    if config.delete {
        let status = client.validate_token(&token).context("Failed validating token")?;
        if let Some(owner) = status.user_name.filter(|name| !name.eq_ignore_ascii_case(&config.user)) {
            warn!("Token belongs to {owner}, deleting listens of {} will likely fail", config.user);
        }
    }

    let source = client.user_listens(&config.user, args.page_size);
    let remover = client.remover(&token);
    sweep(&config, &source, &remover, out)
}

fn main() -> Result<()> {
    let args = Args::parse_from(wild::args_os());
    init_logger(args.verbose);

    let summary = match run(&args, &mut io::stdout().lock()) {
        Ok(summary) => summary,
        Err(e) => match e.downcast::<clap::Error>() {
            Ok(usage) => usage.exit(),
            Err(e) => return Err(e),
        },
    };

    info!(
        "Searched {} listens | {} matched | {} deleted | {} failed",
        summary.scanned, summary.matched, summary.deleted, summary.failed
    );

    anyhow::Ok(())
}

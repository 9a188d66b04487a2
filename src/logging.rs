//! Tracing setup
//!
//! The terminal belongs to the game, so events go to a file or nowhere.

use anyhow::{Context, Result};
use std::fs::File;
use std::panic::PanicHookInfo;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a subscriber writing to `log_file`
///
/// `RUST_LOG` selects the filter (default `info`); `LOG_FORMAT=json` switches
/// to JSON lines. Without a log file nothing is installed.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let writer = Mutex::new(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .compact()
            .init();
    }

    chain_panic_hook(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    });

    Ok(())
}

/// Run `before` on panic, then whatever hook was installed until now
pub fn chain_panic_hook<F>(before: F)
where
    F: Fn(&PanicHookInfo<'_>) + Send + Sync + 'static,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        before(info);
        previous(info);
    }));
}

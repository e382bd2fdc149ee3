//! Stuff every bot in this workspace needs, because the boilerplate
//! gets old fast.

use std::future::Future;

pub mod useful_methods;

/// Initialize logging and run `closure` to completion in a multi-threaded
/// tokio runtime.
///
/// The log filter comes from the environment variable `RUST_LOG` if it is set,
/// otherwise `default_filter` is used. This uses the crate
/// [pretty_env_logger][] internally, see its documentation for the filter syntax.
///
/// Timestamps are left out when running as a systemd service,
/// because the journal adds its own.
///
/// # Panics
///
/// Panics if the tokio runtime can't be built.
///
/// [pretty_env_logger]: https://docs.rs/pretty_env_logger
pub fn start_everything(default_filter: &str, closure: impl Future<Output = ()>) {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    let running_as_systemd_service = std::env::var_os("JOURNAL_STREAM").is_some();

    let mut builder = match running_as_systemd_service {
        true => pretty_env_logger::formatted_builder(),
        false => pretty_env_logger::formatted_timed_builder(),
    };

    builder.parse_filters(&log_filter);

    if builder.try_init().is_err() {
        log::error!("Tried to init logger twice!");
    }

    log::info!("Logging with filter \"{log_filter}\"");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build the tokio runtime!")
        .block_on(closure);
}

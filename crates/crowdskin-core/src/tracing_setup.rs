use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// Console output is filtered by `CROWDSKIN_LOG` (default `info`). When
/// `CROWDSKIN_LOG_FILE` is set, a debug-level log is appended to that file as
/// well. Calling this twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CROWDSKIN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false).with_filter(filter);

    let file_layer = std::env::var("CROWDSKIN_LOG_FILE").ok().and_then(|log_path| {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
            ),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", log_path, e);
                None
            }
        }
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();
}

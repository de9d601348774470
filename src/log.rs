// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, time::uptime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::consts::{LOG_FILE, STORE_DIR};

/// Console filter for a given `-v` count. `RUST_LOG` wins when set.
pub fn console_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,fic_scrape=info",
        1 => "info,fic_scrape=debug",
        _ => "debug,fic_scrape=trace",
    }
}

/// Install the global subscriber: stderr for humans, `.store/debug.log` for later.
/// The file layer is skipped (not fatal) if the store dir can't be created.
pub fn init(verbosity: u8) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directive(verbosity)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(uptime())
        .with_filter(console_filter);

    let file = open_log_file().map(|f| {
        fmt::layer()
            .with_writer(Mutex::new(f))
            .with_ansi(false)
            .with_timer(uptime())
            .with_filter(EnvFilter::new("fic_scrape=debug"))
    });

    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}

fn open_log_file() -> Option<fs::File> {
    fs::create_dir_all(STORE_DIR).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(STORE_DIR).join(LOG_FILE))
        .ok()
}

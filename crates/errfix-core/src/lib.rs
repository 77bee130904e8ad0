//! errfix core
//!
//! Lossless Python syntax trees plus the plumbing around a rewrite: source
//! discovery, configuration, review diffs and atomic persistence.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diff;
pub mod discovery;
pub mod error;
pub mod persist;
pub mod result;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigOverrides, ErrfixConfig, SeriesScope};
pub use diff::review_diff;
pub use discovery::{SourceFile, discover_sources};
pub use error::{ErrfixError, ErrorKind};
pub use persist::{OutputOptions, backup, backup_path, output_target, suffixed_path, write_atomic};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
///
/// `default_filter` applies when `RUST_LOG` is unset. Output goes to stderr so
/// it never mixes with diffs printed on stdout.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

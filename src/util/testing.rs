//! Tracing setup shared by unit and integration tests.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Installs a global tracing subscriber once per test binary.
///
/// `RUST_LOG` defaults to `trace`, scoped to this crate so the tokenizer and
/// config crates stay quiet. Output is captured by the test harness unless
/// `--nocapture` is given.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let directive = env::var("RUST_LOG").unwrap_or_else(|_| "xmldom=trace".to_string());
        let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("debug"));

        let layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter);

        if tracing::dispatcher::has_been_set() {
            debug!("Tracing subscriber already set");
        } else if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
        info!(filter = %directive, "Test setup complete");
    });
}

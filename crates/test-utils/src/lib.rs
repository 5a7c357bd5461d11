//! Shared helpers for dagrun's integration tests: task-set and config
//! builders, a recording fake task body, tracing and timeout helpers.

pub mod builders;
pub mod fake_body;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use dagrun::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a single scheduler run in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Initialise tracing once per test binary.
///
/// The filter comes from `DAGRUN_LOG` (same directives as the binary), then
/// `RUST_LOG`, then `warn` so passing runs stay quiet. Output goes through the
/// test writer and only shows for failing tests unless `--nocapture` is given.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = std::env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|raw| EnvFilter::try_new(raw).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn"));

        // Another harness may have installed a subscriber already.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it outlives [`TEST_TIMEOUT`].
///
/// A scheduler that deadlocks on a layer barrier shows up here as a panic
/// rather than a hung test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout_of(TEST_TIMEOUT, f).await
}

/// [`with_timeout`] with an explicit bound, for tests that sleep on purpose.
pub async fn with_timeout_of<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(value) => value,
        Err(_) => panic!("scheduler run did not finish within {limit:?}"),
    }
}

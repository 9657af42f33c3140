#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Shared setup for the unravel test suites.
//!
//! Use `#[unravel_testhelpers::test]` in place of `#[test]` to get a tracing
//! subscriber installed before the test body runs. The log filter is read from
//! `UNRAVEL_LOG` (e.g. `UNRAVEL_LOG=unravel=debug`) and defaults to `trace`.

pub use unravel_testhelpers_macros::test;

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter, in `Targets` syntax.
pub const LOG_ENV: &str = "UNRAVEL_LOG";

static STARTED: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Prints seconds since the subscriber was installed instead of wall time.
struct SinceStart;

impl FormatTime for SinceStart {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let since = STARTED.elapsed();
        write!(w, "{:4}.{:03}s", since.as_secs(), since.subsec_millis())
    }
}

fn log_filter() -> Targets {
    match std::env::var(LOG_ENV).map(|filter| filter.parse::<Targets>()) {
        Ok(Ok(filter)) => filter,
        _ => Targets::new().with_default(tracing::Level::TRACE),
    }
}

static SUBSCRIBER: LazyLock<()> = LazyLock::new(|| {
    LazyLock::force(&STARTED);
    let filter = log_filter();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(SinceStart)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Installs the tracing subscriber for the current test process.
///
/// Every test calls this through `#[unravel_testhelpers::test]`; only the
/// first call does any work.
pub fn setup() {
    LazyLock::force(&SUBSCRIBER);
}

/// Return type for tests that use `?`.
///
/// Converting any error into it fails the test on the spot, reporting the
/// error and the line of the `?` that produced it.
#[derive(Debug)]
pub struct IPanic;

impl<E> From<E> for IPanic
where
    E: core::error::Error + Send + Sync,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let at = core::panic::Location::caller();
        panic!("test failed at {at}: {error}")
    }
}

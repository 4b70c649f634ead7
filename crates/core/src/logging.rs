//! Logging and observability
//!
//! Structured logging via tracing-subscriber, in either human-readable text
//! or JSON. Format and filter are chosen at runtime from CLI flags and
//! environment variables.
//!
//! All logging output goes to stderr so stdout stays reserved for command
//! output.

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "FEATGATE_LOG_FORMAT";
/// Environment variable holding the log filter directive
pub const LOG_FILTER_ENV: &str = "FEATGATE_LOG";
/// Environment variable overriding span lifecycle events
pub const LOG_SPAN_EVENTS_ENV: &str = "FEATGATE_LOG_SPAN_EVENTS";

/// Initialize the logging system with an optional format
///
/// Safe to call more than once; only the first call installs a subscriber.
///
/// ## Arguments
///
/// * `format` - `None` or `"text"` for human-readable output, `"json"` for
///   structured JSON. Unrecognized values fall back to text.
///
/// ## Environment Variables
///
/// * `FEATGATE_LOG_FORMAT` - format used when `format` is `None`
/// * `FEATGATE_LOG` - filter directive (e.g. `featgate_core=debug`)
/// * `RUST_LOG` - fallback filter directive
/// * `FEATGATE_LOG_SPAN_EVENTS` - comma separated span events
///   (`new`, `close`, `enter`, `exit`, `active`, `full`, `none`)
///
/// ## Example
///
/// ```rust
/// use featgate_core::logging;
///
/// logging::init(None).expect("Failed to initialize logging");
/// ```
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var(LOG_FORMAT_ENV).ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        let span_events = span_events_for_format(effective_format);

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_span_events(span_events)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_span_events(span_events)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter from `FEATGATE_LOG`, then `RUST_LOG`, then `info`
fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var(LOG_FILTER_ENV) {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid {} specification '{}', using default 'info'",
                LOG_FILTER_ENV,
                spec
            );
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Span lifecycle events: env override first, then a per-format default
fn span_events_for_format(format: &str) -> fmt::format::FmtSpan {
    use fmt::format::FmtSpan;

    if let Ok(raw) = std::env::var(LOG_SPAN_EVENTS_ENV) {
        return parse_span_events(&raw);
    }

    match format {
        "json" => FmtSpan::NEW | FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    }
}

fn parse_span_events(raw: &str) -> fmt::format::FmtSpan {
    use fmt::format::FmtSpan;

    let mut acc = FmtSpan::NONE;
    for token in raw.split(&[',', '|'][..]).map(|t| t.trim().to_lowercase()) {
        acc |= match token.as_str() {
            "new" => FmtSpan::NEW,
            "close" => FmtSpan::CLOSE,
            "enter" => FmtSpan::ENTER,
            "exit" => FmtSpan::EXIT,
            "active" => FmtSpan::ACTIVE,
            "full" => FmtSpan::FULL,
            _ => FmtSpan::NONE,
        };
    }
    acc
}

/// Check if logging has been initialized
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

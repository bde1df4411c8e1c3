//! Tracing subscriber bootstrap.

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `telemetry.filter`, which wins over the built-in
/// default. Returns `false` when a subscriber was already installed.
pub fn init(settings: &TelemetrySettings) -> bool {
    let (filter, rejected) = build_filter(settings);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    }
    .is_ok();

    if let Some(directive) = rejected {
        tracing::warn!(
            target: "bookshelf-telemetry",
            %directive,
            "ignoring invalid telemetry.filter, using default"
        );
    }

    if installed {
        tracing::info!(
            target: "bookshelf-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    installed
}

fn build_filter(settings: &TelemetrySettings) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, None);
    }

    match settings.filter.as_deref() {
        Some(directive) => match EnvFilter::try_new(directive) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new(DEFAULT_FILTER), Some(directive.to_string())),
        },
        None => (EnvFilter::new(DEFAULT_FILTER), None),
    }
}

//! Subscriber setup.

use super::exporter;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every exported span.
pub const SERVICE_NAME: &str = "rosterview";

static WORKER_TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global subscriber for the plugin instance.
///
/// `config.trace_level` is an `EnvFilter` directive such as `"info"` or
/// `"rosterview=debug"`; an invalid directive falls back to `info`.
/// Observability is optional: if the data directory is unavailable or a
/// subscriber is already installed this silently does nothing.
pub fn init_tracing(config: &Config) {
    install(&config.trace_level, "plugin");
}

/// Installs the global subscriber for the worker instance, once.
///
/// The worker receives no configuration, so it always traces at `info`.
pub fn init_worker_tracing() {
    if WORKER_TRACING_INITIALIZED.swap(true, Ordering::Relaxed) {
        return;
    }
    install("info", "worker");
}

fn install(level: &str, role: &'static str) {
    let data_dir = paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("rosterview.role", role),
    ]);

    let provider = exporter::create_tracer_provider(paths::trace_file(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();

    if result.is_ok() {
        tracing::debug!(level, role, "tracing initialized");
    }
}

//! Tracing subscriber setup.

use super::exporter;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "jobseek";

/// Installs the global tracing subscriber.
///
/// - Filter: `RUST_LOG` if set, else `config.trace_level`, else `info`.
/// - Human-readable events on stderr.
/// - Span export to a JSON Lines file when `config.trace_file` or `config.trace_level`
///   is set; the file defaults to `<data dir>/jobseek-otlp.jsonl`.
///
/// Only the first call in a process takes effect. Failing to prepare the trace file
/// disables span export but never fails initialization.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let trace_file = trace_file_path(config).filter(|path| {
        path.parent()
            .map_or(true, |dir| std::fs::create_dir_all(dir).is_ok())
    });

    let otel_layer = trace_file.as_ref().map(|path| {
        let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
        let provider = exporter::create_tracer_provider(path.clone(), resource);
        tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
    });

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(level = %level, trace_file = ?trace_file, "tracing initialized");
    }
}

/// Where spans are exported, if anywhere.
fn trace_file_path(config: &Config) -> Option<PathBuf> {
    if let Some(file) = &config.trace_file {
        return Some(paths::expand_tilde(file));
    }
    config
        .trace_level
        .as_ref()
        .map(|_| paths::get_data_dir().join("jobseek-otlp.jsonl"))
}

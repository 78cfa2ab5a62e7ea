//! Tracing subscriber and OpenTelemetry pipeline for JointView.
//!
//! Call [`init_tracing`] once at process startup and keep the returned guard
//! alive until exit.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP collector base URL (e.g. `http://localhost:4318`). When set, spans are exported over OTLP/HTTP. |
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `JOINTVIEW_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! let _guard = jointview_runtime::telemetry::init_tracing("jointview");
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const TRACER_NAME: &str = "jointview";

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Parse a `JOINTVIEW_LOG_FORMAT` value.  Anything but `json` is compact.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }

    fn from_env() -> Self {
        Self::parse(std::env::var("JOINTVIEW_LOG_FORMAT").ok().as_deref())
    }
}

/// Install the global `tracing` subscriber.
///
/// The registry always carries an [`EnvFilter`] and a console formatter
/// (compact or JSON).  When `OTEL_EXPORTER_OTLP_ENDPOINT` is set an
/// OpenTelemetry layer is added so that every span is exported as well.
///
/// Installing twice is harmless: the second call keeps the first
/// subscriber.
pub fn init_tracing(service_name: &str) -> TracerProviderGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_env();
    let provider = build_provider(service_name);

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(TRACER_NAME)));
    let (json_layer, compact_layer) = match format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Compact => (None, Some(fmt::layer().compact())),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(json_layer)
        .with(compact_layer)
        .try_init();
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }

    TracerProviderGuard(provider)
}

/// Shuts the OTel [`SdkTracerProvider`] down on drop, flushing pending
/// spans.  Hold it in `main` for the whole program lifetime.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl TracerProviderGuard {
    /// `true` when spans are exported over OTLP.
    pub fn is_exporting(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            // The subscriber may already be gone at this point.
            eprintln!("[jointview] OpenTelemetry provider shutdown error: {e}");
        }
    }
}

/// Build an [`SdkTracerProvider`] when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// Runs before any subscriber exists, so exporter failures go to stderr and
/// the caller continues with console logging only.
fn build_provider(service_name: &str) -> Option<SdkTracerProvider> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| eprintln!("[jointview] OTLP exporter init failed: {e}"))
        .ok()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            // The tokio runtime does not exist yet when this runs.
            .with_simple_exporter(exporter)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_defaults_to_compact() {
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
    }

    #[test]
    fn build_provider_returns_none_without_endpoint() {
        // SAFETY: no other test in this crate reads this variable.
        unsafe { std::env::remove_var("OTEL_EXPORTER_OTLP_ENDPOINT") };
        assert!(build_provider("test-service").is_none());
    }

    #[test]
    fn empty_guard_drops_cleanly() {
        let guard = TracerProviderGuard(None);
        assert!(!guard.is_exporting());
        drop(guard);
    }
}

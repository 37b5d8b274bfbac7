//! Tracing and OpenTelemetry setup for the blogctl CLI
//!
//! Usage:
//!   blogctl --debug ...              # Debug logging to console
//!   blogctl --otel ...               # Export traces to OTLP endpoint
//!   RUST_LOG=blogctl_db=debug blogctl
//!
//! Environment variables:
//!   RUST_LOG                         # Log filter (default: info)
//!   OTEL_EXPORTER_OTLP_ENDPOINT      # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                # Service name (default: blogctl)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
}

impl TracingConfig {
    /// Directive used when RUST_LOG is unset or invalid.
    fn fallback_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.fallback_directive()))
    }
}

/// Where spans are exported and under which service name
#[cfg(any(feature = "telemetry", test))]
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtelSettings {
    endpoint: String,
    service_name: String,
}

#[cfg(any(feature = "telemetry", test))]
impl OtelSettings {
    const DEFAULT_ENDPOINT: &'static str = "http://localhost:4317";
    const DEFAULT_SERVICE_NAME: &'static str = "blogctl";

    #[cfg(feature = "telemetry")]
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            endpoint: read("OTEL_EXPORTER_OTLP_ENDPOINT", Self::DEFAULT_ENDPOINT),
            service_name: read("OTEL_SERVICE_NAME", Self::DEFAULT_SERVICE_NAME),
        }
    }
}

/// Initialize tracing with console output only (no OTEL)
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(feature = "telemetry")]
fn otel_provider(settings: &OtelSettings) -> Result<opentelemetry_sdk::trace::TracerProvider> {
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter for {}: {}", settings.endpoint, e))?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            settings.service_name.clone(),
        )]))
        .build())
}

/// Console logging plus span export to an OTLP collector
#[cfg(feature = "telemetry")]
pub fn init_tracing_with_otel(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let settings = OtelSettings::from_env();
    let provider = otel_provider(&settings)?;
    let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer("blogctl"));

    // The global slot keeps the provider alive until shutdown_otel
    let _ = opentelemetry::global::set_tracer_provider(provider);

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(config.debug)
                .compact(),
        )
        .with(otel_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(
        endpoint = %settings.endpoint,
        service = %settings.service_name,
        "exporting spans over OTLP"
    );

    Ok(())
}

/// Shutdown OpenTelemetry (flush pending spans)
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Initialize tracing based on configuration
///
/// Without the `telemetry` feature `--otel` only logs a warning.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_tracing_with_otel(config);
    }

    init_tracing(config)?;

    #[cfg(not(feature = "telemetry"))]
    if config.otel {
        tracing::warn!("--otel ignored: blogctl was built without the telemetry feature");
    }

    Ok(())
}

//! OpenTelemetry wiring, compiled in behind the `telemetry` feature.
//!
//! Activation is driven entirely by the standard OTEL environment
//! variables: if `OTEL_EXPORTER_OTLP_ENDPOINT` is unset the daemon runs
//! without an exporter.

use anyhow::Result;

/// Initialize the OTLP trace exporter when one is configured.
///
/// Reads `OTEL_EXPORTER_OTLP_ENDPOINT` (e.g. `http://localhost:4317`) and
/// `OTEL_SERVICE_NAME`. Never fails the daemon startup for a missing
/// endpoint; it only reports configuration mismatches.
pub fn init_telemetry() -> Result<()> {
    let endpoint = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(e) => e,
        Err(_) => {
            tracing::debug!("No OTLP endpoint configured; telemetry disabled");
            return Ok(());
        }
    };

    install_exporter(&endpoint)
}

#[cfg(feature = "telemetry")]
fn install_exporter(endpoint: &str) -> Result<()> {
    use opentelemetry::trace::TracerProvider;
    use opentelemetry_otlp::WithExportConfig;
    use tracing_subscriber::layer::SubscriberExt;

    const DEFAULT_SERVICE_NAME: &str = "waitline-engine";

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    tracing::info!(service_name = %service_name, endpoint = %endpoint, "Enabling OTLP export");

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)?
        .tracer(service_name);

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(tracer)),
    )?;

    Ok(())
}

#[cfg(not(feature = "telemetry"))]
fn install_exporter(_endpoint: &str) -> Result<()> {
    tracing::warn!(
        "OTLP endpoint set but this build lacks the 'telemetry' feature; \
         rebuild with --features telemetry"
    );
    Ok(())
}

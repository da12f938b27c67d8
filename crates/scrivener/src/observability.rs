//! Logging and optional OpenTelemetry export for the binary.

use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: pipeline crates at info, dependencies at warn.
const DEFAULT_FILTER: &str = "warn,scrivener=info,scrivener_pipeline=info,scrivener_agents=info,\
scrivener_models=info,scrivener_retrieval=info,scrivener_storage=info";

/// Pipeline crates at debug, for `--verbose`.
const VERBOSE_FILTER: &str = "info,scrivener=debug,scrivener_pipeline=debug,\
scrivener_agents=debug,scrivener_models=debug,scrivener_retrieval=debug,scrivener_storage=debug";

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging and telemetry settings for one process.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to exported spans and metrics
    pub service_name: String,
    /// `EnvFilter` directive
    pub filter: String,
    /// Line format
    pub format: LogFormat,
}

impl ObservabilityConfig {
    /// Settings for `service_name`. `RUST_LOG` wins over the built-in filter.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            format: LogFormat::Text,
        }
    }

    /// Settings matching the CLI's global flags.
    ///
    /// `verbose` replaces the filter, even one taken from `RUST_LOG`.
    pub fn for_cli(verbose: bool, json_logs: bool) -> Self {
        let mut config = Self::new(env!("CARGO_PKG_NAME"));
        if verbose {
            config.filter = VERBOSE_FILTER.to_string();
        }
        if json_logs {
            config.format = LogFormat::Json;
        }
        config
    }

    /// Replace the filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Flushes exporters when dropped. Hold it for the life of the process.
#[must_use = "dropping the guard shuts telemetry down"]
pub struct ObservabilityGuard {
    #[cfg(feature = "observability")]
    tracer_provider: opentelemetry_sdk::trace::SdkTracerProvider,
    #[cfg(feature = "observability")]
    meter_provider: opentelemetry_sdk::metrics::SdkMeterProvider,
}

impl std::fmt::Debug for ObservabilityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservabilityGuard")
            .field("otel", &cfg!(feature = "observability"))
            .finish()
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        #[cfg(feature = "observability")]
        {
            if let Err(e) = self.meter_provider.shutdown() {
                eprintln!("Failed to flush metrics: {}", e);
            }
            if let Err(e) = self.tracer_provider.shutdown() {
                eprintln!("Failed to flush spans: {}", e);
            }
        }
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr so command output on stdout stays machine-readable. With
/// the `observability` feature, spans and pipeline metrics are also exported
/// to stdout through OpenTelemetry.
///
/// # Errors
///
/// Fails on an invalid filter directive or when a subscriber is already set.
pub fn init_observability(
    config: ObservabilityConfig,
) -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(&config.filter)?;

    let fmt_layer = if config.format == LogFormat::Json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    #[cfg(feature = "observability")]
    let (otel_layer, guard) = {
        use opentelemetry::{KeyValue, global, trace::TracerProvider};
        use opentelemetry_sdk::{
            Resource, metrics::SdkMeterProvider, trace::SdkTracerProvider,
        };

        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                env!("CARGO_PKG_VERSION"),
            )])
            .build();

        let tracer_provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .with_resource(resource.clone())
            .build();
        global::set_tracer_provider(tracer_provider.clone());

        let meter_provider = SdkMeterProvider::builder()
            .with_periodic_exporter(opentelemetry_stdout::MetricExporter::default())
            .with_resource(resource)
            .build();
        global::set_meter_provider(meter_provider.clone());

        let tracer = tracer_provider.tracer(config.service_name.clone());
        let layer = tracing_opentelemetry::layer().with_tracer(tracer);
        (
            Some(layer),
            ObservabilityGuard {
                tracer_provider,
                meter_provider,
            },
        )
    };

    #[cfg(not(feature = "observability"))]
    let (otel_layer, guard) = (
        None::<tracing_subscriber::layer::Identity>,
        ObservabilityGuard {},
    );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(guard)
}

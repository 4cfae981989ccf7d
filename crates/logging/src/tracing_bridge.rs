//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the debug flag system.
//!
//! [`HopLayer`] maps events emitted under the `socks4a::*` targets onto
//! [`DebugFlag`]s and records the ones the thread's [`VerbosityConfig`]
//! admits. Events from other targets pass through untouched so the layer can
//! share a registry with ordinary formatting layers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! logging::trace_proto!("sent CONNECT");
//! ```

use super::config::VerbosityConfig;
use super::levels::DebugFlag;
use super::thread_local::{debug_gte, emit_debug};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that bridges tracing events to the debug flag system.
pub struct HopLayer {
    config: VerbosityConfig,
}

impl HopLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the layer was installed with.
    #[must_use]
    pub const fn config(&self) -> &VerbosityConfig {
        &self.config
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        let suffix = target.strip_prefix("socks4a::")?;
        match suffix {
            "connect" => Some(DebugFlag::Connect),
            "proto" | "protocol" => Some(DebugFlag::Proto),
            "handoff" => Some(DebugFlag::Handoff),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }
}

impl<S> Layer<S> for HopLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(flag) = Self::target_to_debug_flag(metadata.target()) else {
            return;
        };
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if debug_gte(flag, verbosity_level) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            if let Some(message) = visitor.message {
                emit_debug(flag, verbosity_level, message);
            }
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// Installs a global registry carrying a [`HopLayer`] and a formatting layer
/// writing to stderr. The thread-local configuration of the calling thread is
/// updated as well.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    tracing_subscriber::registry()
        .with(HopLayer::new(config))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize tracing with a custom filter in addition to the verbosity flags.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing_with_filter};
/// use tracing_subscriber::EnvFilter;
///
/// init_tracing_with_filter(
///     VerbosityConfig::from_verbose_level(1),
///     EnvFilter::from_default_env(),
/// );
/// ```
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(HopLayer::new(config))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

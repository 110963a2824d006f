/// Server configuration loading.
pub mod config;
/// Owned process-wide relay state, lifecycle = start to shutdown.
pub mod context;
/// Common error types: broker, configuration, IO.
pub mod error;
/// Flexible logging (console and file sinks).
pub mod logging;
/// HTTP surface: SSE subscription endpoint and diagnostic page.
pub mod network;
/// Relay core: messages, subscriber registry, dispatcher, delay scheduler.
pub mod relay;
/// Upstream broker subscription loop.
pub mod upstream;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use config::Settings;
/// Process-wide relay context.
pub use context::RelayContext;
/// Operation errors and result types.
pub use error::{RelayError, RelayResult};
/// Logging initialization and lifecycle handle.
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
/// Relay API: message codec, fan-out, delay policy.
pub use relay::{
    DelayScheduler, Dispatcher, Message, QueueEvent, SubscriberHandle, SubscriberRegistry,
};

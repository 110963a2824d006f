pub mod config;

pub use config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{RelayError, RelayResult};

/// Handle для управления lifecycle логирования.
///
/// Держит guard неблокирующего файлового писателя: пока handle жив,
/// фоновый поток дописывает буферизованные записи.
pub struct LoggingHandle {
    _file_guard: Option<WorkerGuard>,
}

/// Инициализация логирования с конфигурацией.
///
/// `RUST_LOG` имеет приоритет над уровнем из конфигурации.
pub fn init_logging(config: LoggingConfig) -> RelayResult<LoggingHandle> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| RelayError::Logging(e.to_string()))?;

    // Console layer
    let console_layer = config.console_enabled.then(fmt::layer);

    // File layer
    let (file_layer, file_guard) = if config.file_enabled {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, &config.filename);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Initialize subscriber
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        console_enabled = config.console_enabled,
        file_enabled = config.file_enabled,
        "Logging system initialized"
    );

    Ok(LoggingHandle {
        _file_guard: file_guard,
    })
}

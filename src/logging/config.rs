use std::path::PathBuf;

use crate::config::Settings;

/// Конфигурация логирования.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Уровень по умолчанию; переопределяется переменной RUST_LOG
    pub level: String,
    /// Вывод в консоль
    pub console_enabled: bool,
    /// Вывод в файл (daily rotation)
    pub file_enabled: bool,
    /// Каталог для файловых логов
    pub log_dir: PathBuf,
    /// Базовое имя файла лога
    pub filename: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            console_enabled: true,
            file_enabled: false,
            log_dir: PathBuf::from("logs"),
            filename: "strela.log".into(),
        }
    }
}

impl LoggingConfig {
    /// Debug-режим реле делает видимым лог каждой диспетчеризации.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            level: if settings.debug { "debug" } else { "info" }.into(),
            ..Self::default()
        }
    }
}

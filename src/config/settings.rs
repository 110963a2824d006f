use std::{collections::HashMap, time::Duration};

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Адрес HTTP-сервера подписок
    pub listen_addr: String,
    /// URL брокера сообщений
    pub broker_url: String,
    /// Имя канала брокера, единственный вход реле
    pub broker_channel: String,
    /// Debug-режим: подробный лог каждой диспетчеризации,
    /// тестовая страница читается с диска
    pub debug: bool,
    /// Тип сообщения -> задержка доставки в секундах
    pub message_delays: HashMap<String, u64>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Adding default values
            .set_default("listen_addr", "0.0.0.0:8001")?
            .set_default("broker_url", "redis://redis")?
            .set_default("broker_channel", "sse::messages")?
            .set_default("debug", false)?
            .set_default("message_delays.metadata", 5)?
            // Add enviroment variables with the STRELA_ prefix,
            // nested keys separated by "__"
            .add_source(Environment::with_prefix("STRELA").separator("__"))
            .build()?;

        cfg.try_deserialize()
    }

    /// Таблица задержек для планировщика.
    pub fn delay_table(&self) -> HashMap<String, Duration> {
        self.message_delays
            .iter()
            .map(|(kind, secs)| (kind.clone(), Duration::from_secs(*secs)))
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8001".into(),
            broker_url: "redis://redis".into(),
            broker_channel: "sse::messages".into(),
            debug: false,
            message_delays: HashMap::from([("metadata".to_string(), 5)]),
        }
    }
}

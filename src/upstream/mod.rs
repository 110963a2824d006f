//! Подписка на upstream-брокер.
//!
//! Реле — чистый потребитель: один канал, одно соединение, никаких
//! публикаций обратно. Формат нагрузки и её дальнейший путь описаны
//! в модуле `relay`.

pub mod subscriber;

pub use subscriber::run_subscriber;

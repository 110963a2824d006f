//! Сетевой модуль strela.
//!
//! HTTP-поверхность реле и обслуживание подписчиков.
//!
//! ## Подмодули
//!
//! - `server`: маршрутизатор, SSE-endpoint подписки, диагностическая
//!   страница и оркестрация graceful shutdown.
//! - `stream`: поток событий одного подписчика (replay, затем живой
//!   трафик, завершение по сентинелу).

pub mod server;
pub mod stream;

pub use stream::SubscriberStream;

//! Ядро реле: трансляция сообщений подписчикам.
//!
//! Этот модуль реализует цепочку доставки от upstream-канала до очередей
//! живых подписчиков:
//!
//! - `message`: модель сообщения и проводной кодек `kind:body`.
//! - `registry`: реестр очередей подписчиков со «слабым» членством и
//!   RAII-дерегистрацией.
//! - `dispatcher`: таблица последних значений и рассылка во все очереди.
//! - `scheduler`: отложенная диспетчеризация для настроенных типов.
//!
//! Публичный API переэкспортирует:
//! - `dispatcher::*`
//! - `message::*`
//! - `registry::*`
//! - `scheduler::*`

pub mod dispatcher;
pub mod message;
pub mod registry;
pub mod scheduler;

pub use dispatcher::*;
pub use message::*;
pub use registry::*;
pub use scheduler::*;

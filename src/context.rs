use std::sync::Arc;

use tokio::sync::Notify;

use crate::{
    config::Settings,
    relay::{DelayScheduler, Dispatcher, SubscriberRegistry},
};

/// Контекст процесса реле.
///
/// Единственный владелец общего изменяемого состояния (реестр подписчиков
/// и таблица последних значений живут внутри диспетчера). Создаётся на
/// старте, передаётся компонентам как `Arc`, живёт до shutdown.
pub struct RelayContext {
    pub settings: Settings,
    pub registry: SubscriberRegistry,
    pub dispatcher: Arc<Dispatcher>,
    pub scheduler: Arc<DelayScheduler>,
    /// Сигнал отмены для upstream-подписчика
    pub shutdown: Notify,
}

impl RelayContext {
    pub fn new(settings: Settings) -> Self {
        let registry = SubscriberRegistry::new();
        let dispatcher = Arc::new(Dispatcher::new(registry.clone()));
        let scheduler = Arc::new(DelayScheduler::new(
            dispatcher.clone(),
            settings.delay_table(),
        ));

        Self {
            settings,
            registry,
            dispatcher,
            scheduler,
            shutdown: Notify::new(),
        }
    }

    /// Инициирует graceful shutdown: отменяет upstream-подписчика.
    ///
    /// `notify_one` сохраняет разрешение, если подписчик ещё не дошёл до
    /// точки ожидания, так что сигнал не теряется.
    pub fn begin_shutdown(&self) {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Тест проверяет, что контекст связывает планировщик с таблицей
    /// задержек из настроек.
    #[test]
    fn test_context_wires_delay_table() {
        let ctx = RelayContext::new(Settings::default());

        assert_eq!(
            ctx.scheduler.delay_for("metadata"),
            Some(Duration::from_secs(5))
        );
        assert_eq!(ctx.scheduler.delay_for("listeners"), None);
    }

    /// Тест проверяет, что begin_shutdown будит ожидающего, даже если
    /// сигнал послан до начала ожидания.
    #[tokio::test]
    async fn test_begin_shutdown_signal_is_not_lost() {
        let ctx = RelayContext::new(Settings::default());

        ctx.begin_shutdown();
        ctx.shutdown.notified().await;
    }
}

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::debug;

use super::{Dispatcher, Message};

/// Планировщик задержек доставки.
///
/// Для типов из статической таблицы задержек диспетчеризация откладывается
/// на настроенный интервал; все остальные типы уходят в диспетчер сразу.
/// Задержка сглаживает всплески часто меняющихся значений одного типа.
pub struct DelayScheduler {
    dispatcher: Arc<Dispatcher>,
    /// Тип сообщения -> фиксированная задержка доставки
    delays: HashMap<String, Duration>,
}

impl DelayScheduler {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        delays: HashMap<String, Duration>,
    ) -> Self {
        Self { dispatcher, delays }
    }

    /// Принимает сообщение от upstream-подписчика.
    ///
    /// Отложенный экземпляр диспетчеризуется по срабатыванию таймера сразу,
    /// второй раз он не задерживается. Ранее запущенный таймер того же типа
    /// НЕ отменяется: перекрывающиеся отложенные сообщения срабатывают
    /// независимо и могут завершиться не в хронологическом порядке.
    pub fn process(
        self: &Arc<Self>,
        msg: Message,
    ) {
        match self.delays.get(&msg.kind).copied() {
            Some(delay) => {
                debug!(kind = %msg.kind, delay = ?delay, "Delaying message dispatch");
                let scheduler = Arc::clone(self);
                tokio::spawn(async move {
                    sleep(delay).await;
                    scheduler.dispatcher.dispatch(msg);
                });
            }
            None => {
                self.dispatcher.dispatch(msg);
            }
        }
    }

    /// Возвращает задержку, настроенную для типа `kind`.
    pub fn delay_for(
        &self,
        kind: &str,
    ) -> Option<Duration> {
        self.delays.get(kind).copied()
    }
}

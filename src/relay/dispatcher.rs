use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::{Message, SubscriberHandle, SubscriberRegistry};

/// Диспетчер сообщений и таблица последних значений.
///
/// Поддерживает:
/// - Запись «последнего сообщения» по каждому типу (живёт до конца процесса)
/// - Рассылку сообщения во все зарегистрированные очереди подписчиков
/// - Атомарную пару «регистрация + снимок таблицы» для replay при подключении
/// - Счётчики диспетчеризаций и доставок
pub struct Dispatcher {
    registry: SubscriberRegistry,
    /// Тип сообщения -> тело последнего ДИСПЕТЧЕРИЗОВАННОГО сообщения
    last_messages: DashMap<String, String>,
    /// Сериализует dispatch и connect: сообщение, рассылаемое параллельно
    /// с подключением, не должно попасть и в replay, и в очередь.
    /// Держится только поверх коротких синхронных секций, никогда поверх
    /// await.
    connect_lock: Mutex<()>,
    /// Общее количество вызовов `dispatch`
    pub dispatch_count: AtomicUsize,
    /// Общее количество записей в очереди подписчиков
    pub delivery_count: AtomicUsize,
}

impl Dispatcher {
    pub fn new(registry: SubscriberRegistry) -> Self {
        Self {
            registry,
            last_messages: DashMap::new(),
            connect_lock: Mutex::new(()),
            dispatch_count: AtomicUsize::new(0),
            delivery_count: AtomicUsize::new(0),
        }
    }

    /// Диспетчеризует финализированное сообщение.
    ///
    /// Сначала обновляет таблицу последних значений, затем кладёт
    /// закодированное сообщение в каждую очередь реестра. Между двумя
    /// шагами нет точек приостановки.
    ///
    /// # Возвращает
    /// - Количество очередей, в которые сообщение записано.
    pub fn dispatch(
        &self,
        msg: Message,
    ) -> usize {
        let _guard = self.connect_lock.lock();

        self.last_messages.insert(msg.kind.clone(), msg.body.clone());
        let written = self.registry.broadcast(&msg.encode());

        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
        self.delivery_count.fetch_add(written, Ordering::Relaxed);

        debug!(
            kind = %msg.kind,
            body = %msg.body,
            subscribers = written,
            "Dispatched message"
        );
        written
    }

    /// Подключает нового подписчика: регистрирует очередь и снимает
    /// снимок таблицы последних значений для replay.
    ///
    /// Обе операции выполняются под одним замком с `dispatch`, поэтому
    /// каждое сообщение попадает новому подписчику ровно одним путём:
    /// либо в снимок, либо в очередь.
    pub fn connect(&self) -> (SubscriberHandle, Vec<Message>) {
        let _guard = self.connect_lock.lock();

        let handle = self.registry.register();
        let replay = self
            .last_messages
            .iter()
            .map(|entry| Message::new(entry.key().clone(), entry.value().clone()))
            .collect();

        (handle, replay)
    }

    /// Возвращает тело последнего диспетчеризованного сообщения типа `kind`.
    pub fn last_message(
        &self,
        kind: &str,
    ) -> Option<String> {
        self.last_messages.get(kind).map(|entry| entry.value().clone())
    }

    /// Реестр подписчиков, обслуживаемый этим диспетчером.
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::QueueEvent;

    fn setup() -> (SubscriberRegistry, Dispatcher) {
        let registry = SubscriberRegistry::new();
        let dispatcher = Dispatcher::new(registry.clone());
        (registry, dispatcher)
    }

    /// Тест проверяет, что dispatch обновляет таблицу последних значений
    /// и доставляет закодированное сообщение подписчику.
    #[tokio::test]
    async fn test_dispatch_updates_table_and_delivers() {
        let (registry, dispatcher) = setup();
        let mut handle = registry.register();

        let written = dispatcher.dispatch(Message::new("metadata", "NowPlaying=X"));

        assert_eq!(written, 1);
        assert_eq!(
            dispatcher.last_message("metadata"),
            Some("NowPlaying=X".into())
        );
        assert_eq!(
            handle.recv().await,
            Some(QueueEvent::Payload("metadata:NowPlaying=X".into()))
        );
        assert_eq!(dispatcher.dispatch_count.load(Ordering::Relaxed), 1);
        assert_eq!(dispatcher.delivery_count.load(Ordering::Relaxed), 1);
    }

    /// Тест проверяет, что повторный dispatch того же типа перезаписывает
    /// запись таблицы, а не добавляет новую.
    #[test]
    fn test_dispatch_overwrites_last_message() {
        let (_registry, dispatcher) = setup();

        dispatcher.dispatch(Message::new("metadata", "old"));
        dispatcher.dispatch(Message::new("metadata", "new"));

        assert_eq!(dispatcher.last_message("metadata"), Some("new".into()));
        let (_handle, replay) = dispatcher.connect();
        assert_eq!(replay.len(), 1);
    }

    /// Тест проверяет, что connect после диспетчеризаций возвращает по
    /// одному replay-сообщению на каждый известный тип.
    #[test]
    fn test_connect_returns_replay_snapshot() {
        let (_registry, dispatcher) = setup();
        dispatcher.dispatch(Message::new("metadata", "NowPlaying=X"));
        dispatcher.dispatch(Message::new("listeners", "42"));

        let (_handle, mut replay) = dispatcher.connect();
        replay.sort_by(|a, b| a.kind.cmp(&b.kind));

        assert_eq!(
            replay,
            vec![
                Message::new("listeners", "42"),
                Message::new("metadata", "NowPlaying=X"),
            ]
        );
    }

    /// Тест проверяет, что подписчику, подключившемуся до первой
    /// диспетчеризации, replay не положен вовсе.
    #[test]
    fn test_connect_before_any_dispatch_has_empty_replay() {
        let (_registry, dispatcher) = setup();
        let (_handle, replay) = dispatcher.connect();
        assert!(replay.is_empty());
    }

    /// Тест проверяет, что сообщения одного типа приходят подписчику
    /// в порядке диспетчеризации.
    #[tokio::test]
    async fn test_dispatch_order_preserved() {
        let (registry, dispatcher) = setup();
        let mut handle = registry.register();

        dispatcher.dispatch(Message::new("m", "1"));
        dispatcher.dispatch(Message::new("m", "2"));
        dispatcher.dispatch(Message::new("m", "3"));

        for expected in ["m:1", "m:2", "m:3"] {
            assert_eq!(
                handle.recv().await,
                Some(QueueEvent::Payload(expected.into()))
            );
        }
    }
}

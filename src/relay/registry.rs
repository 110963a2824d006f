use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
};

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Элемент очереди подписчика.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// Закодированное сообщение `kind:body`, готовое к отправке клиенту.
    Payload(String),
    /// Сентинел: соединение закрывается, стриминг должен завершиться.
    Disconnect,
}

type QueueMap = Arc<RwLock<HashMap<u64, UnboundedSender<QueueEvent>>>>;

/// Реестр очередей активных подписчиков.
///
/// Хранит producer-концы неограниченных очередей всех живых соединений.
/// Членство «слабое»: очередь удаляется автоматически при Drop её
/// [`SubscriberHandle`], явной отписки нет. Запись в очередь, чьё
/// соединение уже завершилось, безвредна — она просто не будет прочитана.
#[derive(Debug, Clone, Default)]
pub struct SubscriberRegistry {
    /// Хранилище очередей: subscriber_id -> Sender
    queues: QueueMap,
    /// Счётчик для генерации уникальных ID
    id_counter: Arc<AtomicU64>,
}

/// Consumer-конец очереди одного подписчика.
///
/// Владеет приёмником и гарантирует дерегистрацию из реестра при Drop —
/// это и есть привязка членства к времени жизни соединения.
#[derive(Debug)]
pub struct SubscriberHandle {
    id: u64,
    receiver: UnboundedReceiver<QueueEvent>,
    queues: QueueMap,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создаёт новую очередь, регистрирует её и возвращает handle подписчика.
    pub fn register(&self) -> SubscriberHandle {
        let id = self.id_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = mpsc::unbounded_channel();

        self.queues.write().insert(id, tx);

        SubscriberHandle {
            id,
            receiver: rx,
            queues: self.queues.clone(),
        }
    }

    /// Кладёт закодированное сообщение в каждую зарегистрированную очередь.
    ///
    /// Перечисление и запись выполняются синхронно, без точек приостановки:
    /// подписчик, зарегистрированный до начала обхода, не увидит пропуска.
    /// Отправка неблокирующая — медленный клиент растит свою очередь, но
    /// не задерживает остальных.
    ///
    /// # Возвращает
    /// - Количество очередей, в которые сообщение записано.
    pub fn broadcast(&self, wire: &str) -> usize {
        let mut written = 0;
        for tx in self.queues.read().values() {
            // Ошибка send означает, что приёмник уже уничтожен —
            // гонка при teardown соединения, не ошибка.
            if tx.send(QueueEvent::Payload(wire.to_owned())).is_ok() {
                written += 1;
            }
        }
        written
    }

    /// Кладёт сентинел в каждую зарегистрированную очередь, чтобы все
    /// заблокированные стриминговые циклы проснулись и завершились.
    ///
    /// # Возвращает
    /// - Количество разбуженных очередей.
    pub fn disconnect_all(&self) -> usize {
        let mut woken = 0;
        for tx in self.queues.read().values() {
            if tx.send(QueueEvent::Disconnect).is_ok() {
                woken += 1;
            }
        }
        woken
    }

    /// Возвращает количество активных подписчиков.
    pub fn active_count(&self) -> usize {
        self.queues.read().len()
    }
}

impl SubscriberHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Асинхронно ожидает следующий элемент очереди.
    ///
    /// # Возвращает
    /// - `Some(QueueEvent)` при получении элемента
    /// - `None`, если producer-конец уничтожен
    pub async fn recv(&mut self) -> Option<QueueEvent> {
        self.receiver.recv().await
    }

    /// Неблокирующий poll очереди для ручных реализаций `Stream`.
    pub fn poll_recv(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<QueueEvent>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.queues.write().remove(&self.id);
    }
}

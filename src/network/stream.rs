use std::{
    collections::VecDeque,
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};

use axum::response::sse::Event;
use futures::Stream;

use crate::relay::{Message, QueueEvent, SubscriberHandle};

/// Поток событий одного подписчика.
///
/// Жизненный цикл соединения: сперва отдаётся replay — по одному событию
/// на каждый тип из снимка таблицы последних значений, затем живой трафик
/// из очереди. Поток завершается, когда из очереди извлечён сентинел.
///
/// Drop потока (клиент отключился, сервер останавливается) уничтожает
/// handle подписчика и тем самым дерегистрирует очередь из реестра.
pub struct SubscriberStream {
    /// Снимок таблицы последних значений, отдаваемый до живого трафика
    replay: VecDeque<Message>,
    handle: SubscriberHandle,
    closed: bool,
}

impl SubscriberStream {
    pub fn new(
        replay: Vec<Message>,
        handle: SubscriberHandle,
    ) -> Self {
        Self {
            replay: replay.into(),
            handle,
            closed: false,
        }
    }

    /// Следующая проводная строка `kind:body`, либо `None` по завершении.
    fn poll_wire(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Option<String>> {
        if self.closed {
            return Poll::Ready(None);
        }

        if let Some(msg) = self.replay.pop_front() {
            return Poll::Ready(Some(msg.encode()));
        }

        match self.handle.poll_recv(cx) {
            Poll::Ready(Some(QueueEvent::Payload(wire))) => Poll::Ready(Some(wire)),
            // Сентинел или уничтоженный producer: соединение закрывается.
            Poll::Ready(Some(QueueEvent::Disconnect)) | Poll::Ready(None) => {
                self.closed = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Stream for SubscriberStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.get_mut()
            .poll_wire(cx)
            .map(|wire| wire.map(|wire| Ok(Event::default().data(wire))))
    }
}

use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use redis::aio::PubSub;
use tokio::time::sleep;
use tracing::{info, trace, warn};

use crate::{context::RelayContext, relay::Message, RelayResult};

/// Стартовая пауза перед повторным подключением к брокеру.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Потолок экспоненциального backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Цикл подписки на канал брокера.
///
/// Держит подписку на единственный настроенный канал, декодирует каждую
/// нагрузку как `kind:body` и передаёт её планировщику задержек. Нагрузки
/// без разделителя молча отбрасываются. При обрыве соединения или конце
/// потока переподключается с экспоненциальным backoff.
///
/// Завершается только по сигналу shutdown из контекста; отмена — штатный
/// исход, не ошибка.
pub async fn run_subscriber(ctx: Arc<RelayContext>) -> RelayResult<()> {
    let shutdown = ctx.shutdown.notified();
    tokio::pin!(shutdown);

    let mut backoff = INITIAL_BACKOFF;

    loop {
        let mut pubsub = tokio::select! {
            _ = &mut shutdown => {
                info!("Upstream subscriber cancelled");
                return Ok(());
            }
            connected = connect(&ctx) => match connected {
                Ok(pubsub) => {
                    backoff = INITIAL_BACKOFF;
                    pubsub
                }
                Err(err) => {
                    warn!(error = %err, retry_in = ?backoff, "Broker connection failed");
                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("Upstream subscriber cancelled");
                            return Ok(());
                        }
                        _ = sleep(backoff) => {}
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            },
        };

        info!(channel = %ctx.settings.broker_channel, "Subscribed to broker channel");

        let mut messages = pubsub.on_message();
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Upstream subscriber cancelled");
                    return Ok(());
                }
                msg = messages.next() => match msg {
                    Some(msg) => handle_payload(&ctx, &msg),
                    None => {
                        warn!("Broker pubsub stream ended, reconnecting");
                        break;
                    }
                },
            }
        }
    }
}

async fn connect(ctx: &RelayContext) -> RelayResult<PubSub> {
    let client = redis::Client::open(ctx.settings.broker_url.as_str())?;
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(&ctx.settings.broker_channel).await?;
    Ok(pubsub)
}

fn handle_payload(
    ctx: &Arc<RelayContext>,
    msg: &redis::Msg,
) {
    match msg.get_payload::<String>() {
        Ok(payload) => match Message::decode(&payload) {
            Some(message) => ctx.scheduler.process(message),
            // Нет разделителя — нагрузка некорректна, отбрасываем молча.
            None => trace!(payload = %payload, "Dropping malformed payload"),
        },
        Err(err) => warn!(error = %err, "Undecodable payload from broker"),
    }
}

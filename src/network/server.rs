use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    response::{
        sse::{KeepAlive, KeepAliveStream, Sse},
        Html,
    },
    routing::get,
    Router,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

use crate::{context::RelayContext, network::stream::SubscriberStream, RelayResult};

/// Тестовая страница, встроенная в бинарь на этапе сборки.
const TEST_PAGE: &str = include_str!("../../static/test.html");
/// Откуда читать страницу в debug-режиме (правки видны без пересборки).
const TEST_PAGE_PATH: &str = "static/test.html";

/// Собирает маршрутизатор реле.
///
/// Два маршрута: `GET /` — подписка на поток событий, `GET /test` —
/// диагностическая страница. Аутентификации нет: авторизацию выполняет
/// reverse-proxy перед реле.
pub fn build_router(ctx: Arc<RelayContext>) -> Router {
    // Ответ должен допускать cross-origin доступ.
    let cors = CorsLayer::new().allow_origin(Any);

    Router::new()
        .route("/", get(subscribe))
        .route("/test", get(test_page))
        .layer(cors)
        .with_state(ctx)
}

/// Запускает HTTP-сервер и оркестрирует shutdown всего процесса.
///
/// По сигналу остановки: отменить upstream-подписчика и дождаться его,
/// затем разбудить сентинелом каждый стриминговый цикл. Открытые
/// SSE-соединения завершаются сами, после чего сервер возвращается.
pub async fn run(
    ctx: Arc<RelayContext>,
    subscriber: JoinHandle<RelayResult<()>>,
) -> Result<()> {
    let listener = TcpListener::bind(&ctx.settings.listen_addr).await?;
    info!(addr = %ctx.settings.listen_addr, "Relay listening");

    let shutdown_ctx = ctx.clone();
    let router = build_router(ctx);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;

            shutdown_ctx.begin_shutdown();
            match subscriber.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(error = %err, "Upstream subscriber failed"),
                Err(err) => error!(error = %err, "Upstream subscriber panicked"),
            }

            let woken = shutdown_ctx.registry.disconnect_all();
            info!(subscribers = woken, "Disconnect sentinel delivered");
        })
        .await?;

    info!("Relay stopped");
    Ok(())
}

async fn wait_for_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

/// `GET /` — подписка на поток событий.
///
/// Регистрирует очередь и снимает снимок таблицы последних значений одной
/// атомарной операцией, затем отдаёт SSE-поток: replay, после него живой
/// трафик до отключения клиента или сентинела.
async fn subscribe(State(ctx): State<Arc<RelayContext>>) -> Sse<KeepAliveStream<SubscriberStream>> {
    let (handle, replay) = ctx.dispatcher.connect();

    debug!(
        subscriber = handle.id(),
        replayed = replay.len(),
        active = ctx.registry.active_count(),
        "Subscriber connected"
    );

    Sse::new(SubscriberStream::new(replay, handle)).keep_alive(KeepAlive::default())
}

/// `GET /test` — диагностическая страница.
async fn test_page(State(ctx): State<Arc<RelayContext>>) -> Html<String> {
    if ctx.settings.debug {
        match tokio::fs::read_to_string(TEST_PAGE_PATH).await {
            Ok(body) => return Html(body),
            Err(err) => {
                warn!(error = %err, path = TEST_PAGE_PATH, "Falling back to embedded test page")
            }
        }
    }
    Html(TEST_PAGE.to_owned())
}

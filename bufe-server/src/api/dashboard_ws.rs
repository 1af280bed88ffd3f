//! Admin dashboard WebSocket
//!
//! GET /ws/bufe/orders
//! Auth: session cookie (or Bearer), buffet admin only. The gate runs in
//! the extractor, before the upgrade, so a refused client never joins the
//! `bufe_orders` group.
//!
//! Protocol:
//! - Server → Dashboard: DashboardMessage (order_update, product_update, pong,
//!   add_product_response, error, resync)
//! - Dashboard → Server: DashboardCommand (ping, add_product)

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::dashboard::{DashboardCommand, DashboardMessage};
use shared::error::AppError;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::AdminUser;
use crate::live::ORDERS_GROUP;
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /ws/bufe/orders
pub async fn handle_dashboard_ws(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| dashboard_session(socket, state, admin.id))
}

async fn dashboard_session(socket: WebSocket, state: AppState, admin_id: i64) {
    let (mut sink, mut stream) = socket.split();

    let mut hub_rx = state.hub.subscribe(ORDERS_GROUP);
    tracing::info!(
        admin_id,
        subscribers = state.hub.subscriber_count(ORDERS_GROUP),
        "Dashboard WS connected"
    );

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_message(&mut sink, &DashboardMessage::from(event)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(admin_id, lagged = n, "Dashboard subscriber lagged, requesting resync");
                        // fresh receiver starts at the current position
                        hub_rx = state.hub.subscribe(ORDERS_GROUP);
                        if send_message(&mut sink, &DashboardMessage::Resync).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_command(&state, admin_id, text.as_str()).await;
                        if send_message(&mut sink, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!(admin_id, "Dashboard WS disconnected");
}

/// Reply to one client frame
async fn handle_command(state: &AppState, admin_id: i64, text: &str) -> DashboardMessage {
    let cmd = match serde_json::from_str::<DashboardCommand>(text) {
        Ok(cmd) => cmd,
        Err(e) => {
            tracing::debug!(admin_id, error = %e, "Malformed dashboard message");
            return DashboardMessage::Error {
                message: format!("Érvénytelen üzenet: {e}"),
            };
        }
    };

    match cmd {
        DashboardCommand::Ping => DashboardMessage::Pong,
        DashboardCommand::AddProduct(input) => match state.catalog.create_product(&input).await {
            Ok(product) => {
                tracing::info!(admin_id, product_id = product.id, "Product added from dashboard");
                DashboardMessage::AddProductResponse {
                    success: true,
                    product: Some(product),
                    error: None,
                }
            }
            Err(e) => DashboardMessage::AddProductResponse {
                success: false,
                product: None,
                error: Some(AppError::from(e).message),
            },
        },
    }
}

async fn send_message<S>(sink: &mut S, msg: &DashboardMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use std::sync::Arc;

    fn state() -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), AppState::for_tests(store))
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let (_, state) = state();
        assert_eq!(
            handle_command(&state, 1, r#"{"type":"ping"}"#).await,
            DashboardMessage::Pong
        );
    }

    #[tokio::test]
    async fn malformed_message_gets_error() {
        let (_, state) = state();
        for text in ["not json", r#"{"type":"dance"}"#, r#"{"type":"add_product"}"#] {
            assert!(matches!(
                handle_command(&state, 1, text).await,
                DashboardMessage::Error { .. }
            ));
        }
    }

    #[tokio::test]
    async fn add_product_replies_and_broadcasts() {
        let (store, state) = state();
        let category = store.seed_category("Üdítő");
        let mut rx = state.hub.subscribe(ORDERS_GROUP);

        let text = format!(
            r#"{{"type":"add_product","nev":"Narancslé","kategoria_id":{},"ar":400,"max_rendelesenkent":2,"hutve":true,"elerheto":true,"kisult":false}}"#,
            category.id
        );
        let product = match handle_command(&state, 1, &text).await {
            DashboardMessage::AddProductResponse {
                success: true,
                product: Some(product),
                error: None,
            } => product,
            other => panic!("unexpected reply: {other:?}"),
        };
        assert_eq!(product.nev, "Narancslé");
        assert_eq!(product.kategoria_nev, "Üdítő");

        let pushed = DashboardMessage::from(rx.recv().await.unwrap());
        let json = serde_json::to_value(&pushed).unwrap();
        assert_eq!(json["type"], "product_update");
        assert_eq!(json["action"], "new");
        assert_eq!(json["product"]["nev"], "Narancslé");
    }

    #[tokio::test]
    async fn add_product_failure_is_reported() {
        let (_, state) = state();
        let text = r#"{"type":"add_product","nev":"Narancslé","kategoria_id":999,"ar":400}"#;
        match handle_command(&state, 1, text).await {
            DashboardMessage::AddProductResponse {
                success: false,
                error: Some(message),
                ..
            } => assert!(!message.is_empty()),
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(state.hub.subscriber_count(ORDERS_GROUP), 0);
    }
}

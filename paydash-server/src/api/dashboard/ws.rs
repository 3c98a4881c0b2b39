use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use paydash_sdk::objects::WsServerMessage;
use std::pin::pin;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use crate::state::AppState;

/// `GET /ws` — dashboard WebSocket stream.
///
/// Upgrades the HTTP connection and pushes [`WsServerMessage`] JSON frames:
/// the current snapshot first, then a snapshot per state change and every
/// bus event as it is published.
pub(super) async fn dashboard_ws(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_dashboard_ws(socket, state))
}

/// Drives a single WebSocket connection until the client leaves or the
/// dashboard shuts down.
async fn handle_dashboard_ws(mut socket: WebSocket, state: AppState) {
    // Subscribe to both sources before reading the first snapshot so that
    // nothing published in between is missed.
    let events = BroadcastStream::new(state.dashboard.bus().subscribe()).filter_map(|event| {
        match event {
            Ok(event) => Some(WsServerMessage::Event { event }),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "WS: event stream lagged");
                None
            }
        }
    });
    let view_rx = state.dashboard.state().subscribe();

    let first = WsServerMessage::Snapshot {
        dashboard: view_rx.borrow().snapshot(),
    };
    if send_json(&mut socket, &first).await.is_err() {
        return;
    }

    let snapshots = WatchStream::from_changes(view_rx).map(|view| WsServerMessage::Snapshot {
        dashboard: view.snapshot(),
    });
    let mut frames = pin!(snapshots.merge(events));

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(frame) => {
                    if send_json(&mut socket, &frame).await.is_err() {
                        return;
                    }
                }
                None => break,
            },

            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => {}
            },
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

//! WebSocket feed of scripts for the web view to execute

use crate::sink::BroadcastSink;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

pub async fn events_handler(ws: WebSocketUpgrade, State(sink): State<BroadcastSink>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, sink))
}

async fn handle_socket(socket: WebSocket, sink: BroadcastSink) {
    let (mut sender, mut receiver) = socket.split();
    let mut scripts = sink.subscribe();
    info!(subscribers = sink.subscribers(), "web view connected to event feed");

    let mut forward_task = tokio::spawn(async move {
        loop {
            match scripts.recv().await {
                Ok(script) => {
                    if sender.send(Message::Text(script.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "web view fell behind; scripts dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                other => debug!(?other, "ignoring inbound event-feed message"),
            }
        }
    });

    tokio::select! {
        _ = &mut forward_task => recv_task.abort(),
        _ = &mut recv_task => forward_task.abort(),
    }

    info!("web view disconnected from event feed");
}

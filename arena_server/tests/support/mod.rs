// Shared helpers for driving a live arena server over WebSockets.
#![allow(dead_code)]

use arena_server::ServerSettings;
use arena_server::domain::{ArenaMap, Obstacle};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const RESPAWN_DELAY: Duration = Duration::from_millis(200);
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// Open 800x600 field with a single block in the top-left corner.
pub fn test_settings() -> ServerSettings {
    let mut settings = ServerSettings {
        map: ArenaMap {
            width: 800.0,
            height: 600.0,
            obstacles: vec![Obstacle::new(0.0, 0.0, 100.0, 100.0, "home")],
        },
        ..ServerSettings::default()
    };
    settings.player.respawn_delay = RESPAWN_DELAY;
    settings
}

// Start a dedicated server for one test and return its WebSocket URL.
pub async fn start_server() -> String {
    // Bind before spawning so the port accepts connections as soon as we return.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        arena_server::run_with_settings(listener, test_settings())
            .await
            .expect("server failed");
    });
    format!("ws://{addr}/ws")
}

pub async fn connect(url: &str) -> Client {
    let (client, _response) = connect_async(url).await.expect("websocket handshake");
    client
}

pub async fn send_json(client: &mut Client, value: Value) {
    send_text(client, &value.to_string()).await;
}

pub async fn send_text(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_owned().into()))
        .await
        .expect("send to server");
}

// Next JSON text frame, skipping control frames.
pub async fn recv_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("server message before timeout")
            .expect("socket still open")
            .expect("valid frame");
        match frame {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("server sends JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

// Next message, asserting its `type` tag.
pub async fn expect_type(client: &mut Client, kind: &str) -> Value {
    let msg = recv_json(client).await;
    assert_eq!(msg["type"], kind, "unexpected message {msg}");
    msg
}

/// Connects and consumes the join handshake. Returns the client and its player id.
pub async fn join(url: &str) -> (Client, String) {
    let mut client = connect(url).await;
    let identity = expect_type(&mut client, "Identity").await;
    let id = identity["data"]["player_id"]
        .as_str()
        .expect("player id is a string")
        .to_owned();
    expect_type(&mut client, "MapData").await;
    expect_type(&mut client, "CurrentPlayers").await;
    (client, id)
}

pub async fn move_to(client: &mut Client, x: f64, y: f64) {
    send_json(
        client,
        serde_json::json!({"type": "PlayerMovement", "data": {"x": x, "y": y}}),
    )
    .await;
}

pub async fn shoot(client: &mut Client, x: f64, y: f64) {
    send_json(
        client,
        serde_json::json!({
            "type": "Shoot",
            "data": {"x": x, "y": y, "direction": {"x": 1.0, "y": 0.0}}
        }),
    )
    .await;
}

pub async fn report_hit(client: &mut Client, bullet_id: u64, target_id: &str) {
    send_json(
        client,
        serde_json::json!({
            "type": "BulletHit",
            "data": {"bullet_id": bullet_id, "target_id": target_id}
        }),
    )
    .await;
}

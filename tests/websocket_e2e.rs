//! End-to-end WebSocket tests against a server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};

use sketchroom::adapters::{build_router, WebSocketState};
use sketchroom::application::RoomManager;
use sketchroom::config::ServerConfig;
use sketchroom::domain::foundation::RoomId;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let manager = Arc::new(RoomManager::default());
    let state = WebSocketState::new(manager, RoomId::new("main").unwrap());
    let app = build_router(state, &ServerConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}{}", addr, path)).await.unwrap();
    ws
}

async fn send(ws: &mut Client, value: Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Receive until a message of the given type arrives.
async fn recv_type(ws: &mut Client, ty: &str) -> Value {
    loop {
        let msg = recv(ws).await;
        if msg["type"] == ty {
            return msg;
        }
    }
}

#[tokio::test]
async fn two_clients_share_strokes_and_history() {
    let addr = spawn_server().await;

    let mut alice = connect(addr, "/api/rooms/e2e/live").await;
    let joined = recv(&mut alice).await;
    assert_eq!(joined["type"], "room:joined");
    assert_eq!(joined["roomId"], "e2e");
    assert_eq!(joined["strokes"], json!([]));
    assert_eq!(joined["historyPointer"], 0);
    let alice_id = joined["userId"].clone();

    let mut bob = connect(addr, "/api/rooms/e2e/live").await;
    let bob_joined = recv(&mut bob).await;
    assert_eq!(bob_joined["type"], "room:joined");
    let bob_id = bob_joined["userId"].clone();
    let notice = recv(&mut alice).await;
    assert_eq!(notice, json!({"type": "user:join", "userId": bob_id}));

    send(&mut alice, json!({"type": "stroke:start", "strokeId": "s1", "color": "#000", "width": 2})).await;
    send(&mut alice, json!({"type": "stroke:chunk", "strokeId": "s1", "points": [{"x": 0, "y": 0}, {"x": 5, "y": 5}]})).await;
    send(&mut alice, json!({"type": "stroke:end", "strokeId": "s1"})).await;

    let started = recv(&mut bob).await;
    assert_eq!(started["type"], "stroke:start");
    assert_eq!(started["userId"], alice_id);
    assert_eq!(started["color"], "#000");

    let chunk = recv(&mut bob).await;
    assert_eq!(chunk["type"], "stroke:chunk");
    assert_eq!(chunk["points"].as_array().unwrap().len(), 2);

    let applied = recv(&mut bob).await;
    assert_eq!(applied["type"], "apply_op");
    assert_eq!(applied["historyPointer"], 1);
    assert_eq!(applied["op"]["type"], "add");
    assert_eq!(applied["op"]["stroke"]["id"], "s1");
    assert_eq!(applied["op"]["stroke"]["userId"], alice_id);

    let ended = recv(&mut bob).await;
    assert_eq!(ended["type"], "stroke:end");

    let own = recv(&mut alice).await;
    assert_eq!(own["type"], "apply_op");
    assert_eq!(own["historyPointer"], 1);

    send(&mut bob, json!({"type": "undo"})).await;
    for ws in [&mut alice, &mut bob] {
        let undone = recv(ws).await;
        assert_eq!(undone["type"], "apply_op");
        assert_eq!(undone["op"]["type"], "remove");
        assert_eq!(undone["op"]["strokeId"], "s1");
        assert_eq!(undone["historyPointer"], 0);
    }

    send(&mut bob, json!({"type": "undo"})).await;
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "no-op", "reason": "nothing-to-undo"})
    );

    alice.close(None).await.unwrap();
    let left = recv_type(&mut bob, "user:left").await;
    assert_eq!(left["userId"], alice_id);
}

#[tokio::test]
async fn bad_frames_are_ignored() {
    let addr = spawn_server().await;
    let mut ws = connect(addr, "/api/rooms/noise/live").await;
    recv_type(&mut ws, "room:joined").await;

    ws.send(Message::text("not json")).await.unwrap();
    send(&mut ws, json!({"type": "teleport"})).await;
    send(&mut ws, json!({"type": "stroke:start", "strokeId": "s1", "color": "red", "width": -1})).await;
    ws.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();
    send(&mut ws, json!({"type": "ping"})).await;

    let pong = recv(&mut ws).await;
    assert_eq!(pong["type"], "pong");

    send(&mut ws, json!({"type": "request:state"})).await;
    let state = recv(&mut ws).await;
    assert_eq!(state["type"], "room:state");
    assert_eq!(state["strokes"], json!([]));
}

#[tokio::test]
async fn default_route_joins_main_room() {
    let addr = spawn_server().await;
    let mut ws = connect(addr, "/ws").await;
    let joined = recv(&mut ws).await;
    assert_eq!(joined["type"], "room:joined");
    assert_eq!(joined["roomId"], "main");
}

#[tokio::test]
async fn invalid_room_id_is_rejected() {
    let addr = spawn_server().await;
    let err = connect_async(format!("ws://{}/api/rooms/bad!room/live", addr))
        .await
        .unwrap_err();
    match err {
        WsError::Http(response) => assert_eq!(response.status(), 400),
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn rooms_endpoint_reports_live_rooms() {
    let addr = spawn_server().await;
    let mut ws = connect(addr, "/api/rooms/gallery/live").await;
    recv_type(&mut ws, "room:joined").await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /api/rooms HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        addr
    );
    tokio::io::AsyncWriteExt::write_all(&mut stream, request.as_bytes())
        .await
        .unwrap();
    let mut response = String::new();
    tokio::io::AsyncReadExt::read_to_string(&mut stream, &mut response)
        .await
        .unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"roomId\":\"gallery\""));
    assert!(response.contains("\"members\":1"));
}

//! End-to-end tests: a real server on a random port, driven by
//! WebSocket clients speaking the JSON event protocol.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use show::prelude::*;
use show_session::SessionRouter;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<TcpStream>,
>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn seeded_builder() -> ShowServerBuilder {
    ShowServerBuilder::new()
        .bind("127.0.0.1:0")
        .room_config(RoomConfig {
            seed: Some(2024),
            ..RoomConfig::default()
        })
}

/// Starts a seeded server on a random port. Returns its address and a
/// handle on its router for inspecting the registry.
async fn start_server() -> (String, SessionRouter) {
    start_server_with(seeded_builder()).await
}

async fn start_server_with(builder: ShowServerBuilder) -> (String, SessionRouter) {
    let server = builder.build().await.expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let router = server.router().clone();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, router)
}

/// Connects and consumes the `connected` greeting.
async fn connect(addr: &str) -> (ClientWs, PlayerId) {
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    match recv(&mut ws).await {
        ServerEvent::Connected(player_id) => (ws, player_id),
        other => panic!("expected Connected, got {other:?}"),
    }
}

async fn send(ws: &mut ClientWs, event: &ClientEvent) {
    let text = serde_json::to_string(event).expect("encode");
    ws.send(Message::text(text)).await.expect("send");
}

async fn recv(ws: &mut ClientWs) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .expect("recv");
        if msg.is_text() || msg.is_binary() {
            return serde_json::from_slice(&msg.into_data()).expect("decode");
        }
    }
}

/// Receives snapshots until one satisfies `pred`.
async fn recv_state_where(ws: &mut ClientWs, pred: impl Fn(&GameState) -> bool) -> GameState {
    loop {
        if let ServerEvent::GameState(state) = recv(ws).await {
            if pred(&state) {
                return state;
            }
        }
    }
}

async fn create_room(ws: &mut ClientWs) -> RoomId {
    send(ws, &ClientEvent::CreateRoom).await;
    match recv(ws).await {
        ServerEvent::RoomCreated(room_id) => room_id,
        other => panic!("expected RoomCreated, got {other:?}"),
    }
}

/// Four connected players seated in one room, creator first.
async fn full_table(addr: &str) -> (RoomId, Vec<(ClientWs, PlayerId)>) {
    let (mut host, host_id) = connect(addr).await;
    let room_id = create_room(&mut host).await;
    let mut players = vec![(host, host_id)];
    for _ in 1..4 {
        let (mut ws, player_id) = connect(addr).await;
        send(&mut ws, &ClientEvent::JoinRoom(room_id.clone())).await;
        assert_eq!(recv(&mut ws).await, ServerEvent::JoinedRoom(room_id.clone()));
        players.push((ws, player_id));
    }
    for (ws, _) in &mut players {
        recv_state_where(ws, |s| s.scores.len() == 4).await;
    }
    (room_id, players)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_receives_player_id() {
    let (addr, _router) = start_server().await;
    let (_ws_a, a) = connect(&addr).await;
    let (_ws_b, b) = connect(&addr).await;
    assert_eq!(a.as_str().len(), 32);
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_create_room_then_snapshot() {
    let (addr, router) = start_server().await;
    let (mut ws, player_id) = connect(&addr).await;

    let room_id = create_room(&mut ws).await;

    let state = recv_state_where(&mut ws, |_| true).await;
    assert!(!state.started);
    assert_eq!(state.scores.len(), 1);
    assert_eq!(state.scores[0].player_id, player_id);
    assert_eq!(router.registry().lock().await.room_ids(), vec![room_id]);
}

#[tokio::test]
async fn test_join_room_wire_format() {
    let (addr, _router) = start_server().await;
    let (mut host, _) = connect(&addr).await;
    let room_id = create_room(&mut host).await;
    let (mut guest, _) = connect(&addr).await;

    let raw = format!(r#"{{"event":"joinRoom","data":"{room_id}"}}"#);
    guest.send(Message::text(raw)).await.unwrap();

    let msg = tokio::time::timeout(RECV_TIMEOUT, guest.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(msg.is_text());
    let json: serde_json::Value = serde_json::from_slice(&msg.into_data()).unwrap();
    assert_eq!(json, serde_json::json!({"event": "joinedRoom", "data": room_id.as_str()}));
}

#[tokio::test]
async fn test_fifth_player_gets_join_error() {
    let (addr, router) = start_server().await;
    let (room_id, _players) = full_table(&addr).await;
    let (mut fifth, _) = connect(&addr).await;

    send(&mut fifth, &ClientEvent::JoinRoom(room_id.clone())).await;

    assert_eq!(
        recv(&mut fifth).await,
        ServerEvent::JoinError(format!("room {room_id} is full"))
    );
    let handle = router.registry().lock().await.get(&room_id).unwrap();
    assert_eq!(handle.info().await.unwrap().player_count, 4);
}

#[tokio::test]
async fn test_join_random_with_no_rooms() {
    let (addr, _router) = start_server().await;
    let (mut ws, _) = connect(&addr).await;

    send(&mut ws, &ClientEvent::JoinRandom).await;

    assert_eq!(
        recv(&mut ws).await,
        ServerEvent::JoinError("no available rooms".into())
    );
}

#[tokio::test]
async fn test_game_flow_hides_other_players_fruit() {
    let (addr, _router) = start_server().await;
    let (_room_id, mut players) = full_table(&addr).await;

    send(&mut players[0].0, &ClientEvent::StartGame).await;
    let mut started = Vec::new();
    for (ws, _) in &mut players {
        started.push(recv_state_where(ws, |s| s.started).await);
    }
    let current = started[0].current_player.clone().unwrap();
    assert!(started.iter().all(|s| s.current_player.as_ref() == Some(&current)));
    assert!(started.iter().all(|s| s.cards.len() == 16 && s.cards.iter().all(|c| c.fruit.is_none())));

    let mover = players.iter().position(|(_, id)| *id == current).unwrap();
    let idle = (mover + 1) % 4;
    let card_id = started[0].cards[0].id.clone();
    // Seat order is join order, so the turn moves on to the idle player.
    let next_turn = players[idle].1.clone();

    // Out of turn first: must be ignored.
    send(&mut players[idle].0, &ClientEvent::SelectCard(card_id.clone())).await;
    send(&mut players[mover].0, &ClientEvent::SelectCard(card_id.clone())).await;

    for (i, (ws, _)) in players.iter_mut().enumerate() {
        let state = recv_state_where(ws, |s| s.cards.iter().any(|c| c.is_selected)).await;
        assert_eq!(state.cards.iter().filter(|c| c.is_selected).count(), 1);
        let card = state.cards.iter().find(|c| c.id == card_id).unwrap();
        assert!(card.is_selected);
        if i == mover {
            assert!(card.fruit.is_some());
            assert_eq!(state.player_cards.len(), 1);
        } else {
            assert!(card.fruit.is_none());
            assert!(state.player_cards.is_empty());
        }
        assert_eq!(state.current_player.as_ref(), Some(&next_turn));
    }
}

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    let (addr, _router) = start_server().await;
    let (mut ws, _) = connect(&addr).await;

    ws.send(Message::text("not json".to_owned())).await.unwrap();
    ws.send(Message::text(r#"{"event":"dealMeAces"}"#.to_owned())).await.unwrap();
    ws.send(Message::binary(br#"{"event":"joinRandom"}"#.to_vec()))
        .await
        .unwrap();

    // The connection survives and the binary frame is still understood.
    assert_eq!(
        recv(&mut ws).await,
        ServerEvent::JoinError("no available rooms".into())
    );
}

#[tokio::test]
async fn test_last_disconnect_removes_room() {
    let (addr, router) = start_server().await;
    let (mut host, _) = connect(&addr).await;
    let room_id = create_room(&mut host).await;

    host.close(None).await.unwrap();
    drop(host);

    // The disconnect runs in a spawned task; poll until it lands.
    let mut removed = false;
    for _ in 0..100 {
        if router.registry().lock().await.is_empty() {
            removed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(removed, "room should be deleted after its last player leaves");

    let (mut late, _) = connect(&addr).await;
    send(&mut late, &ClientEvent::JoinRoom(room_id.clone())).await;
    assert_eq!(
        recv(&mut late).await,
        ServerEvent::JoinError(format!("room {room_id} not found"))
    );
}

#[tokio::test]
async fn test_disconnect_mid_round_resets_table_for_others() {
    let (addr, _router) = start_server().await;
    let (_room_id, mut players) = full_table(&addr).await;
    send(&mut players[0].0, &ClientEvent::StartGame).await;
    for (ws, _) in &mut players {
        recv_state_where(ws, |s| s.started).await;
    }

    let (mut leaver, _) = players.remove(3);
    leaver.close(None).await.unwrap();

    for (ws, _) in &mut players {
        let state = recv_state_where(ws, |s| s.scores.len() == 3).await;
        assert!(!state.started);
        assert!(state.cards.is_empty());
        assert_eq!(state.current_player, None);
    }
}

#[tokio::test]
async fn test_silent_socket_does_not_block_other_clients() {
    let (addr, _router) = start_server().await;

    // Opens TCP but never starts the WebSocket handshake.
    let _silent = TcpStream::connect(&addr).await.unwrap();

    let next = tokio::time::timeout(Duration::from_secs(3), connect(&addr)).await;
    assert!(next.is_ok(), "second client should connect past a silent socket");
}

#[tokio::test]
async fn test_handshake_timeout_drops_silent_socket() {
    let (addr, _router) =
        start_server_with(seeded_builder().handshake_timeout(Duration::from_millis(100))).await;
    let mut silent = TcpStream::connect(&addr).await.unwrap();

    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(RECV_TIMEOUT, silent.read(&mut buf))
        .await
        .expect("server should drop the socket after the handshake timeout");

    // EOF or reset: either way nothing was ever sent back.
    assert!(!matches!(read, Ok(n) if n > 0));
}

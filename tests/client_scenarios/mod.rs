use tick_tcp::ClientEvent;
use tick_tcp::ConnectionState;
use tick_tcp::TcpClient;
use tokio::io::AsyncWriteExt;

use crate::common::*;
use crate::enable_logger;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_hello_is_delivered_on_next_tick() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let mut client = TcpClient::new().unwrap();
    let recorder = Recorder::attach(&mut client);

    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;
    server.write_all(b"hello").await.unwrap();

    assert!(wait_until(|| client.latest_payload().as_deref() == Some("hello")).await);
    assert_eq!(
        client.tick(),
        vec![ClientEvent::MessageReceived("hello".to_string())]
    );
    assert_eq!(recorder.messages(), vec!["hello"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sends_queued_before_connect_arrive_in_order() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let client = TcpClient::new().unwrap();

    client.send("a");
    client.send("b");
    assert_eq!(client.pending_len(), 2);

    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;

    // "a" strictly before "b", each exactly once
    assert_eq!(read_text(&mut server, 2).await, "ab");
    assert!(wait_until(|| client.state() == ConnectionState::Connected).await);
    assert_eq!(client.pending_len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sends_after_connect_are_written_immediately() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let client = TcpClient::new().unwrap();
    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;
    assert!(wait_until(|| client.state() == ConnectionState::Connected).await);

    client.send("live");

    assert_eq!(client.pending_len(), 0);
    assert_eq!(read_text(&mut server, 4).await, "live");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn only_latest_payload_between_ticks_is_observed() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let mut client = TcpClient::new().unwrap();
    let recorder = Recorder::attach(&mut client);
    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;

    // Wait for each payload to land separately so the two writes cannot be
    // coalesced into one read
    server.write_all(b"x").await.unwrap();
    assert!(wait_until(|| client.latest_payload().as_deref() == Some("x")).await);
    server.write_all(b"y").await.unwrap();
    assert!(wait_until(|| client.latest_payload().as_deref() == Some("y")).await);

    client.tick();
    client.tick();

    assert_eq!(recorder.messages(), vec!["y"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unchanged_payload_fires_once_across_ticks() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let mut client = TcpClient::new().unwrap();
    let recorder = Recorder::attach(&mut client);
    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;

    server.write_all(b"state-1").await.unwrap();
    tick_until(&mut client, |_, events| !events.is_empty()).await;
    for _ in 0..5 {
        assert!(client.tick().is_empty());
        tokio::time::sleep(FRAME).await;
    }

    server.write_all(b"state-2").await.unwrap();
    tick_until(&mut client, |_, events| !events.is_empty()).await;

    assert_eq!(recorder.messages(), vec!["state-1", "state-2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn socket_error_fires_connection_failed_once_then_sends_queue() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let mut client = TcpClient::new().unwrap();
    let recorder = Recorder::attach(&mut client);
    client.connect("127.0.0.1", port);
    let server = accept(&listener).await;
    assert!(wait_until(|| client.state() == ConnectionState::Connected).await);

    reset_on_drop(&server);
    drop(server);

    tick_until(&mut client, |_, events| {
        events
            .iter()
            .any(|e| matches!(e, ClientEvent::ConnectionFailed(_)))
    })
    .await;
    for _ in 0..5 {
        client.tick();
        tokio::time::sleep(FRAME).await;
    }

    let failures = recorder.failures();
    assert_eq!(failures.len(), 1);
    assert!(!failures[0].is_empty());
    assert_eq!(client.state(), ConnectionState::Failed);

    client.send("after-failure");
    assert_eq!(client.pending_len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_connection_stays_failed_until_fresh_connect() {
    enable_logger();
    let (listener, port) = bind_loopback().await;
    let client = TcpClient::new().unwrap();
    client.connect("127.0.0.1", port);
    let server = accept(&listener).await;
    assert!(wait_until(|| client.state() == ConnectionState::Connected).await);

    drop(server);
    assert!(wait_until(|| client.state() == ConnectionState::Failed).await);
    client.send("retry-me");

    // No automatic reconnection
    tokio::time::sleep(FRAME * 5).await;
    assert_eq!(client.state(), ConnectionState::Failed);

    client.connect("127.0.0.1", port);
    let mut server = accept(&listener).await;
    assert_eq!(read_text(&mut server, 8).await, "retry-me");
}

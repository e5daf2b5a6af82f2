//! Gateway Integration Tests
//!
//! Each test starts its own gateway on an ephemeral port and talks to it
//! over real WebSocket connections.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::TestGateway;
use reqwest::StatusCode;
use sockmux_core::protocol::encode_message;
use sockmux_core::Frame;
use sockmux_gateway::channels::{BYE, CHAT_CHANNEL, ECHO_CHANNEL, WELCOME};

/// How long to wait before deciding nothing else is coming
const QUIET_PERIOD: Duration = Duration::from_millis(200);

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");

    let response = gateway.get("/health").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

// ============================================================================
// Echo Channel Tests
// ============================================================================

#[tokio::test]
async fn test_echo_message() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.expect("Failed to connect");

    client.send("msg,echo,hello").await.unwrap();

    let reply = client.recv().await.unwrap();
    assert_eq!(reply, encode_message(ECHO_CHANNEL, "hello"));
    assert_eq!(reply, "\"msg,echo,hello\"");
}

#[tokio::test]
async fn test_echo_quoted_frame_keeps_commas() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.expect("Failed to connect");

    let frame = Frame::message(ECHO_CHANNEL, "a,b");
    client.send(&frame.to_wire()).await.unwrap();

    let reply = client.recv().await.unwrap();
    assert_eq!(reply, encode_message(ECHO_CHANNEL, "a,b"));
}

#[tokio::test]
async fn test_echo_without_subscription() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.expect("Failed to connect");

    client.send("msg,echo,x").await.unwrap();
    client.recv().await.unwrap();

    let echo = gateway.channel(ECHO_CHANNEL).unwrap();
    assert_eq!(echo.subscriber_count(), 0);
}

// ============================================================================
// Chat Channel Tests
// ============================================================================

#[tokio::test]
async fn test_chat_welcome_and_broadcast() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut alice = gateway.connect().await.expect("Failed to connect");
    let mut bob = gateway.connect().await.expect("Failed to connect");

    alice.send("sub,chat").await.unwrap();
    assert_eq!(alice.recv().await.unwrap(), encode_message(CHAT_CHANNEL, WELCOME));

    bob.send("sub,chat").await.unwrap();
    assert_eq!(bob.recv().await.unwrap(), encode_message(CHAT_CHANNEL, WELCOME));

    alice.send("msg,chat,hi all").await.unwrap();

    let expected = encode_message(CHAT_CHANNEL, "hi all");
    assert_eq!(alice.recv().await.unwrap(), expected);
    assert_eq!(bob.recv().await.unwrap(), expected);
}

#[tokio::test]
async fn test_chat_unsubscribe_says_bye() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut alice = gateway.connect().await.expect("Failed to connect");
    let mut bob = gateway.connect().await.expect("Failed to connect");

    alice.send("sub,chat").await.unwrap();
    alice.recv().await.unwrap();
    bob.send("sub,chat").await.unwrap();
    bob.recv().await.unwrap();

    alice.send("uns,chat").await.unwrap();
    assert_eq!(alice.recv().await.unwrap(), encode_message(CHAT_CHANNEL, BYE));

    bob.send("msg,chat,still here").await.unwrap();
    assert_eq!(
        bob.recv().await.unwrap(),
        encode_message(CHAT_CHANNEL, "still here")
    );

    let stray = alice.recv_timeout(QUIET_PERIOD).await.unwrap();
    assert!(stray.is_none(), "unexpected message after unsubscribe: {stray:?}");
}

#[tokio::test]
async fn test_chat_channels_are_independent() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut alice = gateway.connect().await.expect("Failed to connect");
    let mut bob = gateway.connect().await.expect("Failed to connect");

    alice.send("sub,chat").await.unwrap();
    alice.recv().await.unwrap();

    bob.send("msg,echo,only me").await.unwrap();
    assert_eq!(
        bob.recv().await.unwrap(),
        encode_message(ECHO_CHANNEL, "only me")
    );

    let stray = alice.recv_timeout(QUIET_PERIOD).await.unwrap();
    assert!(stray.is_none());
}

#[tokio::test]
async fn test_disconnected_subscriber_is_pruned() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let chat = gateway.channel(CHAT_CHANNEL).unwrap();

    let mut alice = gateway.connect().await.expect("Failed to connect");
    alice.send("sub,chat").await.unwrap();
    alice.recv().await.unwrap();

    let mut bob = gateway.connect().await.expect("Failed to connect");
    bob.send("sub,chat").await.unwrap();
    bob.recv().await.unwrap();

    assert_eq!(chat.subscriber_count(), 2);

    alice.close().await.unwrap();

    // Closing does not unsubscribe; the first broadcast that fails to reach
    // the closed connection drops it from the set.
    let mut pruned = false;
    for _ in 0..50 {
        bob.send("msg,chat,ping").await.unwrap();
        bob.recv().await.unwrap();

        if chat.subscriber_count() == 1 {
            pruned = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(pruned, "closed subscriber was never pruned");
}

// ============================================================================
// Protocol Edge Cases
// ============================================================================

#[tokio::test]
async fn test_unframed_text_keeps_connection_open() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.expect("Failed to connect");

    client.send("ping").await.unwrap();
    client.send("msg,echo,after").await.unwrap();

    assert_eq!(
        client.recv().await.unwrap(),
        encode_message(ECHO_CHANNEL, "after")
    );
}

#[tokio::test]
async fn test_unknown_channel_and_type_are_ignored() {
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.expect("Failed to connect");

    client.send("msg,nope,x").await.unwrap();
    client.send("sub,nope").await.unwrap();
    client.send("xyz,echo,x").await.unwrap();
    client.send("msg,echo,ok").await.unwrap();

    assert_eq!(
        client.recv().await.unwrap(),
        encode_message(ECHO_CHANNEL, "ok")
    );

    let stray = client.recv_timeout(QUIET_PERIOD).await.unwrap();
    assert!(stray.is_none());
}

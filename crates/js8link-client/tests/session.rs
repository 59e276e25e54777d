//! Session-level tests driving the typed command facade against the
//! scripted mock server from `js8link-test-harness`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use js8link_client::{Js8CallBuilder, Js8CallClient};
use js8link_core::{Error, FixQuality, NotificationKind, Position, PositionSource, Result, Speed};
use js8link_test_harness::{Expect, MockJs8Server};
use js8link_transport::TcpTransport;

/// Connect a client to an already-started mock server.
async fn client_for(addr: &str) -> Js8CallClient {
    let transport = TcpTransport::connect(addr).await.unwrap();
    Js8CallBuilder::new()
        .request_timeout(Duration::from_secs(2))
        .build_with_transport(Box::new(transport))
}

#[tokio::test]
async fn station_identity_round_trip() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(Expect::reply("STATION.GET_CALLSIGN").value("W1AW"));
    server.expect(Expect::reply("STATION.GET_GRID").value("FN31pr"));
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    assert_eq!(client.callsign().await.unwrap(), "W1AW");
    assert_eq!(client.grid().await.unwrap(), "FN31pr");

    server.wait().await.unwrap();
}

#[tokio::test]
async fn frequency_query_applies_defaults() {
    let mut server = MockJs8Server::bind().await.unwrap();
    // OFFSET is deliberately absent; it must decode as 0, not error.
    server.expect(
        Expect::reply("RIG.GET_FREQ")
            .param("FREQ", 7_079_000_u64)
            .param("DIAL", 7_078_000_u64),
    );
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    let info = client.frequency().await.unwrap();
    assert_eq!(info.freq, 7_079_000);
    assert_eq!(info.dial, 7_078_000);
    assert_eq!(info.offset, 0);

    server.wait().await.unwrap();
}

#[tokio::test]
async fn confirmed_setters_report_echo_equality() {
    let mut server = MockJs8Server::bind().await.unwrap();
    // Grid set: echoed back (uppercased on the way out).
    server.expect(Expect::reply("STATION.SET_GRID").value("FN31"));
    // Speed set: echoed code.
    server.expect(Expect::reply("MODE.SET_SPEED").param("SPEED", 2));
    // Info set: server echoes something else -> failure.
    server.expect(Expect::reply("STATION.SET_INFO").value("OTHER TEXT"));
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    assert!(client.set_grid("fn31").await.unwrap());
    assert!(client.set_speed(Speed::Turbo).await.unwrap());
    assert!(!client.set_station_info("MY SHACK").await.unwrap());

    server.wait().await.unwrap();
}

#[tokio::test]
async fn fire_and_forget_then_query_on_same_stream() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(Expect::silent("RIG.SET_FREQ"));
    server.expect(
        Expect::reply("RIG.GET_FREQ")
            .param("FREQ", 14_079_000_u64)
            .param("DIAL", 14_078_000_u64)
            .param("OFFSET", 1000),
    );
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    client
        .set_frequency(Some(14_078_000), Some(1000))
        .await
        .unwrap();
    let info = client.frequency().await.unwrap();
    assert_eq!(info.dial, 14_078_000);
    assert_eq!(info.offset, 1000);

    server.wait().await.unwrap();
}

#[tokio::test]
async fn notification_interleaved_with_reply_observed_once() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(
        Expect::reply("STATION.GET_STATUS")
            .value("IDLE")
            .notify_first(json!({
                "type": "RX.DIRECTED",
                "value": "KN4CRD: W1AW HELLO",
                "params": {"FROM": "KN4CRD", "TO": "W1AW", "TEXT": "HELLO"},
            })),
    );
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;

    let observed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&observed);
    client.on_notification(NotificationKind::Directed, move |envelope| {
        assert_eq!(envelope.param_str("FROM"), "KN4CRD");
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(client.station_status().await.unwrap(), "IDLE");
    assert_eq!(observed.load(Ordering::SeqCst), 1);

    server.wait().await.unwrap();
}

#[tokio::test]
async fn last_spot_absent_then_present() {
    let mut server = MockJs8Server::bind().await.unwrap();
    // First reply carries nothing but the echoed _ID: decodes to None.
    server.expect(Expect::reply("RX.GET_SPOT"));
    server.expect(
        Expect::reply("RX.GET_SPOT")
            .param("CALL", "K7ABC")
            .param("FREQ", 7_079_000_u64)
            .param("SNR", -15)
            .param("UTC", 1_700_000_000_000_i64),
    );
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    assert_eq!(client.last_spot().await.unwrap(), None);

    let spot = client.last_spot().await.unwrap().unwrap();
    assert_eq!(spot.call, "K7ABC");
    assert_eq!(spot.freq, 7_079_000);
    assert_eq!(spot.snr, -15);

    server.wait().await.unwrap();
}

#[tokio::test]
async fn inbox_store_and_fetch() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(Expect::reply("INBOX.STORE_MESSAGE").reply_type("INBOX.MESSAGE").param("ID", 42));
    server.expect(Expect::reply("INBOX.GET_MESSAGES").param(
        "MESSAGES",
        json!([
            {
                "type": "STORE",
                "value": "",
                "params": {
                    "FROM": "W1AW",
                    "TO": "KN4CRD",
                    "TEXT": "MSG HELLO",
                    "UTC": 1_700_000_000_000_i64,
                },
            },
        ]),
    ));
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    let id = client.store_message("KN4CRD", "MSG HELLO").await.unwrap();
    assert_eq!(id, 42);

    let messages = client.inbox_messages(Some("KN4CRD")).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "KN4CRD");
    assert_eq!(messages[0].text, "MSG HELLO");

    server.wait().await.unwrap();
}

#[tokio::test]
async fn ping_succeeds_on_pure_transmission() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(Expect::silent("PING"));
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    client.ping().await.unwrap();

    server.wait().await.unwrap();
}

#[tokio::test]
async fn ptt_query_decodes_bool() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(Expect::reply("RIG.GET_PTT").param("PTT", true));
    server.expect(Expect::reply("RIG.GET_PTT"));
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    assert!(client.ptt().await.unwrap());
    // Missing PTT field defaults to false.
    assert!(!client.ptt().await.unwrap());

    server.wait().await.unwrap();
}

#[tokio::test]
async fn call_activity_via_facade() {
    let mut server = MockJs8Server::bind().await.unwrap();
    server.expect(
        Expect::reply("RX.GET_CALL_ACTIVITY").param(
            "KN4CRD",
            json!({"SNR": -12, "GRID": "EM73", "UTC": 1_700_000_000_000_i64}),
        ),
    );
    let addr = server.addr().to_string();
    server.start();

    let mut client = client_for(&addr).await;
    let activity = client.call_activity().await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity["KN4CRD"].snr, -12);
    assert_eq!(activity["KN4CRD"].grid, "EM73");

    server.wait().await.unwrap();
}

// ---------------------------------------------------------------------------
// Geolocation assist
// ---------------------------------------------------------------------------

struct FixedPosition(Position);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&mut self) -> Result<Position> {
        Ok(self.0)
    }
}

#[tokio::test]
async fn position_grid_requires_a_fix() {
    let server = MockJs8Server::bind().await.unwrap();
    let addr = server.addr().to_string();
    // No script: the grid assist never touches the protocol.

    let mut client = client_for(&addr).await;

    let mut no_fix = FixedPosition(Position {
        latitude: 0.0,
        longitude: 0.0,
        fix: FixQuality::NoFix,
    });
    let result = client.position_grid(&mut no_fix).await;
    assert!(matches!(result, Err(Error::NoFix)));

    let mut w1aw = FixedPosition(Position {
        latitude: 41.714775,
        longitude: -72.727260,
        fix: FixQuality::TwoD,
    });
    assert_eq!(client.position_grid(&mut w1aw).await.unwrap(), "FN31pr");
}

//! The JS8Call session client and its correlation engine.
//!
//! [`Js8CallClient`] owns the single stream connection to JS8Call and
//! multiplexes the three kinds of traffic that share it:
//!
//! - **requests** it sends, stamped with a fresh `_ID`;
//! - **replies**, matched back to their request by `_ID`;
//! - **unsolicited notifications** (spots, directed messages, transmit
//!   frames, shutdown), which can arrive at any point in the stream --
//!   including between a request and its reply.
//!
//! Reading happens inline: `call()` blocks its caller (not the runtime)
//! reading the stream until the correlated reply arrives, the per-request
//! timeout expires, or the connection is lost. Every envelope decoded
//! while waiting is offered to the notification dispatcher *before* the
//! correlation check, so a notification sharing a read buffer with the
//! awaited reply is still observed exactly once. No background tasks are
//! spawned anywhere; consequently notifications are only observed while
//! some call is in flight.
//!
//! Request IDs are a per-session monotonic counter. One in-flight request
//! at a time is the intended usage (the client requires `&mut self`), but
//! stray replies carrying unknown IDs are tolerated and dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use js8link_core::envelope::Envelope;
use js8link_core::error::{Error, Result};
use js8link_core::events::NotificationKind;
use js8link_core::transport::Transport;

use crate::codec::{self, FrameBuffer, RequestType};

/// Default JS8Call host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default JS8Call TCP API port.
pub const DEFAULT_PORT: u16 = 2442;

/// Default per-request reply timeout (5 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Read chunk size for the inline receive loop.
const READ_CHUNK: usize = 4096;

/// A registered notification callback.
///
/// Invoked synchronously, inline with whichever `call()` is currently
/// reading the stream, and handed the full envelope.
pub type NotificationHandler = Box<dyn FnMut(&Envelope) + Send>;

/// A connected JS8Call API session.
///
/// Construct via [`Js8CallBuilder`](crate::Js8CallBuilder) or
/// [`connect`](Js8CallClient::connect). All typed API operations live in
/// the command facade (`commands` module) as inherent methods; the
/// underlying [`call`](Js8CallClient::call) is public for operations the
/// facade does not cover.
pub struct Js8CallClient {
    /// The stream connection. Exclusively owned; `&mut self` on every
    /// operation serializes all use of it.
    transport: Box<dyn Transport>,

    /// Wall-clock budget for one correlated reply.
    request_timeout: Duration,

    /// Reassembly buffer for partial reads.
    rx: FrameBuffer,

    /// Next request ID. Monotonic per session, starting at 1.
    next_id: i64,

    /// Consumer-registered notification handlers, one per kind.
    handlers: HashMap<NotificationKind, NotificationHandler>,

    /// Set when a `CLOSE` notification is observed.
    closed: bool,
}

impl Js8CallClient {
    /// Connect to JS8Call at the given host and port with the default
    /// request timeout.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        crate::Js8CallBuilder::new().host(host).port(port).connect().await
    }

    /// Assemble a client over an already-established transport.
    pub(crate) fn from_transport(transport: Box<dyn Transport>, request_timeout: Duration) -> Self {
        Js8CallClient {
            transport,
            request_timeout,
            rx: FrameBuffer::new(),
            next_id: 1,
            handlers: HashMap::new(),
            closed: false,
        }
    }

    /// Register a handler for one notification kind, replacing any
    /// previous handler for that kind.
    ///
    /// The handler runs after the built-in processing (e.g. the `CLOSE`
    /// flag update) and is only invoked while a `call()` is reading the
    /// stream -- there is no background reader.
    pub fn on_notification(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&Envelope) + Send + 'static,
    ) {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Send one request and, if the request type expects one, wait for
    /// the correlated reply.
    ///
    /// Fire-and-forget types ([`RequestType::awaits_reply`] is false)
    /// return the transmitted envelope immediately; success is
    /// transmission. All other types block reading the stream until a
    /// reply with the matching `_ID` arrives, the request timeout
    /// expires ([`Error::Timeout`] carrying the request type), or the
    /// stream ends ([`Error::ConnectionLost`]).
    pub async fn call(
        &mut self,
        request: RequestType,
        value: &str,
        params: Map<String, Value>,
    ) -> Result<Envelope> {
        let mut envelope = Envelope::new(request.as_str())
            .with_value(value)
            .with_params(params);

        let id = if request.carries_id() {
            let id = self.next_id;
            self.next_id += 1;
            envelope.set_id(id);
            Some(id)
        } else {
            None
        };

        let frame = codec::encode(&envelope)?;
        tracing::debug!(request = %request, id = ?id, "Sending request");
        self.transport.send(&frame).await?;

        if !request.awaits_reply() {
            // Success is transmission; the request envelope stands in as
            // the synthetic result.
            return Ok(envelope);
        }

        // Every reply-bearing type carries an ID (PING, the one exempt
        // type, never waits); this is belt-and-braces for the invariant.
        let id = id.ok_or_else(|| {
            Error::Protocol(format!("{request} awaits a reply but carries no _ID"))
        })?;

        self.await_reply(request, id).await
    }

    /// Read the stream until the reply with `id` arrives or the timeout
    /// budget is spent, dispatching notifications along the way.
    async fn await_reply(&mut self, request: RequestType, id: i64) -> Result<Envelope> {
        let deadline = Instant::now() + self.request_timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::debug!(request = %request, id, "Request timed out");
                return Err(Error::Timeout(request.as_str().into()));
            }

            let n = match self.transport.receive(&mut chunk, remaining).await {
                Ok(n) => n,
                Err(Error::Timeout(_)) => {
                    tracing::debug!(request = %request, id, "Request timed out");
                    return Err(Error::Timeout(request.as_str().into()));
                }
                Err(e @ (Error::NotConnected | Error::ConnectionLost)) => return Err(e),
                Err(e) => {
                    // Any other mid-wait stream error is fatal to the session.
                    tracing::debug!(error = %e, "Stream error while awaiting reply");
                    return Err(Error::ConnectionLost);
                }
            };

            let mut matched = None;
            for envelope in self.rx.feed(&chunk[..n]) {
                // Notifications are dispatched before the correlation
                // check: one sharing a read with the awaited reply must
                // still be observed exactly once.
                self.dispatch(&envelope);

                match envelope.id() {
                    Some(reply_id) if reply_id == id => {
                        if matched.is_none() {
                            matched = Some(envelope);
                        }
                    }
                    Some(other) if NotificationKind::from_type(&envelope.kind).is_none() => {
                        tracing::trace!(
                            id = other,
                            kind = %envelope.kind,
                            "Reply for unknown or expired request ID"
                        );
                    }
                    _ => {}
                }
            }

            if let Some(reply) = matched {
                tracing::debug!(request = %request, id, "Reply received");
                return Ok(reply);
            }
        }
    }

    /// Classify and dispatch one inbound envelope.
    ///
    /// Built-in processing first (session state, diagnostics), then the
    /// consumer's handler for that kind, if registered. Unknown types are
    /// ignored -- the notification set is closed by the upstream API.
    fn dispatch(&mut self, envelope: &Envelope) {
        let Some(kind) = NotificationKind::from_type(&envelope.kind) else {
            return;
        };

        match kind {
            NotificationKind::Close => {
                self.closed = true;
                tracing::info!("JS8Call reported it is closing");
            }
            NotificationKind::Directed => {
                tracing::debug!(
                    from = envelope.param_str("FROM"),
                    text = envelope.param_str("TEXT"),
                    "Directed message received"
                );
            }
            NotificationKind::Spot => {
                tracing::debug!(
                    call = envelope.param_str("CALL"),
                    freq = envelope.param_u64("FREQ"),
                    "Spot received"
                );
            }
            NotificationKind::TxFrame => {
                tracing::debug!(text = envelope.param_str("TEXT"), "Frame transmitted");
            }
        }

        if let Some(handler) = self.handlers.get_mut(&kind) {
            handler(envelope);
        }
    }

    /// The per-request reply timeout this session was built with.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether a `CLOSE` notification has been observed this session.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the transport is still connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the connection.
    ///
    /// Any subsequent operation fails with
    /// [`Error::NotConnected`](js8link_core::Error::NotConnected).
    pub async fn close(&mut self) -> Result<()> {
        tracing::debug!("Closing JS8Call session");
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    use js8link_transport::TcpTransport;

    /// Helper: bind a listener, connect a client to it, and return both
    /// ends. The client uses a short timeout so failure paths are fast.
    async fn connected_pair(timeout: Duration) -> (TcpListener, Js8CallClient) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stream = TcpStream::connect(addr).await.unwrap();
        let transport = TcpTransport::from_stream(stream, addr.to_string());
        let client = Js8CallClient::from_transport(Box::new(transport), timeout);
        (listener, client)
    }

    /// Helper: read one JSON line from the server side and return the
    /// parsed envelope.
    async fn read_request(reader: &mut BufReader<TcpStream>) -> Envelope {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(line.trim()).unwrap()
    }

    #[tokio::test]
    async fn end_to_end_callsign_query() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader).await;
            assert_eq!(request.kind, "STATION.GET_CALLSIGN");
            let id = request.id().expect("request must carry _ID");

            let reply = format!(
                "{{\"type\":\"STATION.GET_CALLSIGN\",\"value\":\"W1AW\",\"params\":{{\"_ID\":{id}}}}}\n"
            );
            reader.get_mut().write_all(reply.as_bytes()).await.unwrap();
        });

        let reply = client
            .call(RequestType::GetCallsign, "", Map::new())
            .await
            .unwrap();
        assert_eq!(reply.value, "W1AW");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn notification_and_reply_each_observed_once() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let spots: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&spots);
        client.on_notification(NotificationKind::Spot, move |envelope| {
            seen.lock().unwrap().push(envelope.param_str("CALL").to_string());
        });

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader).await;
            let id = request.id().unwrap();

            // An unrelated notification arrives first, then the reply --
            // deliberately written in one burst so they share a read.
            let burst = format!(
                "{{\"type\":\"RX.SPOT\",\"value\":\"\",\"params\":{{\"CALL\":\"K7ABC\",\"FREQ\":7078000,\"SNR\":-12}}}}\n\
                 {{\"type\":\"STATION.GET_GRID\",\"value\":\"FN31\",\"params\":{{\"_ID\":{id}}}}}\n"
            );
            reader.get_mut().write_all(burst.as_bytes()).await.unwrap();
        });

        let reply = client
            .call(RequestType::GetGrid, "", Map::new())
            .await
            .unwrap();
        assert_eq!(reply.value, "FN31");

        let spots = spots.lock().unwrap();
        assert_eq!(&*spots, &["K7ABC".to_string()]);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn timeout_identifies_the_request_type() {
        let (listener, mut client) = connected_pair(Duration::from_millis(100)).await;

        // Server accepts, reads, and never replies.
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let _request = read_request(&mut reader).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let result = client.call(RequestType::GetFrequency, "", Map::new()).await;
        match result {
            Err(Error::Timeout(what)) => assert_eq!(what, "RIG.GET_FREQ"),
            other => panic!("expected Timeout, got: {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn fire_and_forget_returns_without_reading() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        // The server never writes anything at all.
        let server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut params = Map::new();
        params.insert("DIAL".into(), Value::from(7_078_000));

        let started = Instant::now();
        let envelope = client
            .call(RequestType::SetFrequency, "", params)
            .await
            .unwrap();

        // Success purely on transmission, well inside the reply timeout.
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(envelope.kind, "RIG.SET_FREQ");
        assert!(envelope.id().is_some(), "fire-and-forget still carries _ID");

        server.abort();
    }

    #[tokio::test]
    async fn reply_with_unknown_id_is_dropped() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader).await;
            let id = request.id().unwrap();

            // A stale reply with a different ID precedes the real one.
            let burst = format!(
                "{{\"type\":\"STATION.GET_CALLSIGN\",\"value\":\"NOCALL\",\"params\":{{\"_ID\":999999}}}}\n\
                 {{\"type\":\"STATION.GET_CALLSIGN\",\"value\":\"W1AW\",\"params\":{{\"_ID\":{id}}}}}\n"
            );
            reader.get_mut().write_all(burst.as_bytes()).await.unwrap();
        });

        let reply = client
            .call(RequestType::GetCallsign, "", Map::new())
            .await
            .unwrap();
        assert_eq!(reply.value, "W1AW");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn close_notification_sets_the_closed_flag() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;
        assert!(!client.is_closed());

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader).await;
            let id = request.id().unwrap();

            let burst = format!(
                "{{\"type\":\"CLOSE\",\"value\":\"\",\"params\":{{}}}}\n\
                 {{\"type\":\"STATION.GET_STATUS\",\"value\":\"IDLE\",\"params\":{{\"_ID\":{id}}}}}\n"
            );
            reader.get_mut().write_all(burst.as_bytes()).await.unwrap();
        });

        let reply = client
            .call(RequestType::GetStationStatus, "", Map::new())
            .await
            .unwrap();
        assert_eq!(reply.value, "IDLE");
        assert!(client.is_closed());

        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_lost_mid_wait() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let _request = read_request(&mut reader).await;
            // Close the connection instead of replying.
            drop(reader);
        });

        let result = client.call(RequestType::GetCallsign, "", Map::new()).await;
        assert!(
            matches!(result, Err(Error::ConnectionLost)),
            "expected ConnectionLost, got: {:?}",
            result
        );

        server.await.unwrap();
    }

    #[tokio::test]
    async fn notifications_require_an_in_flight_call() {
        // Documented limitation of the inline dispatch model: with no
        // background reader, a notification pushed while the client is
        // idle sits in the socket until the next call reads the stream.
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let observed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&observed);
        client.on_notification(NotificationKind::Directed, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Push a notification while the client is idle.
            stream
                .write_all(
                    b"{\"type\":\"RX.DIRECTED\",\"value\":\"\",\"params\":{\"FROM\":\"KN4CRD\",\"TEXT\":\"HELLO\"}}\n",
                )
                .await
                .unwrap();

            // Then answer the eventual request.
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader).await;
            let id = request.id().unwrap();
            let reply = format!(
                "{{\"type\":\"STATION.GET_CALLSIGN\",\"value\":\"W1AW\",\"params\":{{\"_ID\":{id}}}}}\n"
            );
            reader.get_mut().write_all(reply.as_bytes()).await.unwrap();
        });

        // Give the notification time to land in the socket buffer; the
        // idle client must not observe it.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(observed.load(Ordering::SeqCst), 0);

        // The next call reads the stream and surfaces it.
        let reply = client
            .call(RequestType::GetCallsign, "", Map::new())
            .await
            .unwrap();
        assert_eq!(reply.value, "W1AW");
        assert_eq!(observed.load(Ordering::SeqCst), 1);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn request_ids_are_monotonic() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let mut ids = Vec::new();
            for _ in 0..3 {
                let request = read_request(&mut reader).await;
                let id = request.id().unwrap();
                ids.push(id);
                let reply = format!(
                    "{{\"type\":\"{}\",\"value\":\"\",\"params\":{{\"_ID\":{id}}}}}\n",
                    request.kind
                );
                reader.get_mut().write_all(reply.as_bytes()).await.unwrap();
            }
            ids
        });

        for _ in 0..3 {
            client
                .call(RequestType::GetRxText, "", Map::new())
                .await
                .unwrap();
        }

        let ids = server.await.unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn call_after_close_fails_not_connected() {
        let (listener, mut client) = connected_pair(Duration::from_secs(2)).await;

        let server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        client.close().await.unwrap();
        assert!(!client.is_connected());

        let result = client.call(RequestType::GetCallsign, "", Map::new()).await;
        assert!(matches!(result, Err(Error::NotConnected)));

        server.abort();
    }
}

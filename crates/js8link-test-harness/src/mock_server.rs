//! Scripted mock JS8Call server for protocol-level testing.
//!
//! [`MockJs8Server`] listens on a random localhost port, accepts a single
//! connection, and works through a script of [`Expect`] steps: for each
//! step it reads one JSON request line, checks the request `type`, and
//! answers with any queued notifications followed by the scripted reply.
//!
//! Matching happens at the JSON level rather than on raw bytes because
//! the client stamps each request with a `_ID` the script cannot know in
//! advance; replies echo whatever `_ID` the request carried, which is
//! exactly what the real JS8Call does.
//!
//! # Example
//!
//! ```no_run
//! use js8link_test_harness::{Expect, MockJs8Server};
//!
//! # async fn example() -> js8link_core::Result<()> {
//! let mut server = MockJs8Server::bind().await?;
//! server.expect(Expect::reply("STATION.GET_CALLSIGN").value("W1AW"));
//! server.expect(Expect::silent("RIG.SET_FREQ"));
//! let addr = server.addr().to_string();
//! server.start();
//! // ... connect a client to `addr` and drive it ...
//! // server.wait().await.unwrap();
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use js8link_core::error::{Error, Result};

/// One scripted exchange: an expected request and what to send back.
#[derive(Debug, Clone)]
pub struct Expect {
    /// The request `type` the client is expected to send.
    request_type: String,
    /// Raw JSON lines pushed before the reply (unsolicited notifications).
    notifications: Vec<Value>,
    /// The reply, if any. `None` models fire-and-forget requests.
    reply: Option<Reply>,
}

#[derive(Debug, Clone)]
struct Reply {
    /// Reply `type`; defaults to the request type.
    kind: String,
    value: String,
    params: Map<String, Value>,
}

impl Expect {
    /// Expect `request_type` and answer with a reply of the same type.
    pub fn reply(request_type: &str) -> Self {
        Expect {
            request_type: request_type.to_string(),
            notifications: Vec::new(),
            reply: Some(Reply {
                kind: request_type.to_string(),
                value: String::new(),
                params: Map::new(),
            }),
        }
    }

    /// Expect `request_type` and send nothing back (fire-and-forget, or
    /// timeout scenarios).
    pub fn silent(request_type: &str) -> Self {
        Expect {
            request_type: request_type.to_string(),
            notifications: Vec::new(),
            reply: None,
        }
    }

    /// Set the reply's `value` field.
    pub fn value(mut self, value: &str) -> Self {
        if let Some(reply) = &mut self.reply {
            reply.value = value.to_string();
        }
        self
    }

    /// Override the reply's `type` (defaults to the request type).
    pub fn reply_type(mut self, kind: &str) -> Self {
        if let Some(reply) = &mut self.reply {
            reply.kind = kind.to_string();
        }
        self
    }

    /// Add one parameter to the reply's `params`.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Some(reply) = &mut self.reply {
            reply.params.insert(key.to_string(), value.into());
        }
        self
    }

    /// Queue a notification (a full envelope as JSON) to be written
    /// before the reply, so it shares the stream with it.
    pub fn notify_first(mut self, envelope: Value) -> Self {
        self.notifications.push(envelope);
        self
    }
}

/// A scripted mock JS8Call server.
///
/// The listener is bound at construction so the address is known before
/// the script runs; [`start`](MockJs8Server::start) moves it into a
/// background task that accepts one connection and processes the script
/// in order. [`wait`](MockJs8Server::wait) surfaces any script violation
/// (wrong request type, early disconnect) as an error string.
pub struct MockJs8Server {
    listener: Option<TcpListener>,
    addr: String,
    script: VecDeque<Expect>,
    handle: Option<JoinHandle<std::result::Result<(), String>>>,
}

impl MockJs8Server {
    /// Bind the server on a random localhost port.
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| Error::Transport(format!("failed to bind mock JS8Call server: {}", e)))?;
        let addr = listener.local_addr().map_err(Error::Io)?.to_string();
        Ok(MockJs8Server {
            listener: Some(listener),
            addr,
            script: VecDeque::new(),
            handle: None,
        })
    }

    /// Append one scripted exchange.
    pub fn expect(&mut self, expect: Expect) {
        self.script.push_back(expect);
    }

    /// The address the server is listening on, e.g. `"127.0.0.1:54321"`.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Start the server task: accept one connection and run the script.
    pub fn start(&mut self) {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return, // already started
        };
        let script: Vec<Expect> = self.script.drain(..).collect();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener
                .accept()
                .await
                .map_err(|e| format!("failed to accept connection: {}", e))?;
            let mut reader = BufReader::new(stream);

            for (i, step) in script.iter().enumerate() {
                let mut line = String::new();
                let n = reader
                    .read_line(&mut line)
                    .await
                    .map_err(|e| format!("step {}: read error: {}", i, e))?;
                if n == 0 {
                    return Err(format!(
                        "step {}: client disconnected before sending {}",
                        i, step.request_type
                    ));
                }

                let request: Value = serde_json::from_str(line.trim())
                    .map_err(|e| format!("step {}: unparseable request {:?}: {}", i, line, e))?;
                let request_type = request
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if request_type != step.request_type {
                    return Err(format!(
                        "step {}: expected request {}, got {}",
                        i, step.request_type, request_type
                    ));
                }

                for notification in &step.notifications {
                    let frame = format!("{}\n", notification);
                    reader
                        .get_mut()
                        .write_all(frame.as_bytes())
                        .await
                        .map_err(|e| format!("step {}: notification write error: {}", i, e))?;
                }

                if let Some(reply) = &step.reply {
                    let mut params = reply.params.clone();
                    // Echo the request's correlation ID, as JS8Call does.
                    if let Some(id) = request.get("params").and_then(|p| p.get("_ID")) {
                        params.insert("_ID".to_string(), id.clone());
                    }
                    let envelope = serde_json::json!({
                        "type": reply.kind,
                        "value": reply.value,
                        "params": params,
                    });
                    let frame = format!("{}\n", envelope);
                    reader
                        .get_mut()
                        .write_all(frame.as_bytes())
                        .await
                        .map_err(|e| format!("step {}: reply write error: {}", i, e))?;
                    reader
                        .get_mut()
                        .flush()
                        .await
                        .map_err(|e| format!("step {}: flush error: {}", i, e))?;
                }
            }

            // Hold the connection briefly so the client is not racing a
            // FIN while it finishes reading the last reply.
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(())
        });

        self.handle = Some(handle);
    }

    /// Wait for the server task to finish and report script violations.
    pub async fn wait(self) -> std::result::Result<(), String> {
        if let Some(handle) = self.handle {
            handle
                .await
                .map_err(|e| format!("server task panicked: {}", e))?
        } else {
            Ok(())
        }
    }
}

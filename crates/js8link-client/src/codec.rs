//! JS8Call wire codec: newline-delimited JSON framing.
//!
//! Each message on the wire is one UTF-8 JSON object followed by exactly
//! one `\n`. There is no other framing -- no length prefixes, no
//! compression. Encoding is [`encode`]; decoding goes through
//! [`FrameBuffer`], which accumulates partial TCP reads until complete
//! lines are available.
//!
//! ```text
//! {"type":"RIG.GET_FREQ","value":"","params":{"_ID":1}}\n
//! {"type":"RX.SPOT","value":"","params":{"CALL":"K7ABC","SNR":-12}}\n
//! ```
//!
//! A fragment that fails to parse is dropped silently (trace-logged
//! only). That tolerance is deliberate: a prefix of a still-incoming
//! message, or a line JS8Call truncated on shutdown, must never abort
//! the session.
//!
//! All encoding/decoding in this module is pure -- no I/O is performed.

use bytes::BytesMut;
use js8link_core::envelope::Envelope;
use js8link_core::error::{Error, Result};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Every request type the JS8Call TCP API accepts, as a closed set.
///
/// Two per-operation attributes drive the correlation engine:
///
/// - [`awaits_reply`](RequestType::awaits_reply): whether JS8Call sends a
///   correlated reply. The upstream API documents `RIG.SET_FREQ`,
///   `TX.SEND_MESSAGE`, `WINDOW.RAISE`, and `PING` as having none; those
///   requests succeed on transmission.
/// - [`carries_id`](RequestType::carries_id): whether the request is
///   stamped with a `_ID` correlation parameter. Only `PING` goes out
///   without one.
///
/// Modeling these as static attributes on a closed enum (rather than a
/// runtime string lookup) keeps the sets exhaustively testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// `RIG.GET_FREQ` -- read dial frequency, offset, and RF frequency.
    GetFrequency,
    /// `RIG.SET_FREQ` -- tune the rig. No reply.
    SetFrequency,
    /// `RIG.GET_PTT` -- read push-to-talk state.
    GetPtt,
    /// `STATION.GET_CALLSIGN` -- read the configured callsign.
    GetCallsign,
    /// `STATION.GET_GRID` -- read the configured grid square.
    GetGrid,
    /// `STATION.SET_GRID` -- set the grid square (echoed back).
    SetGrid,
    /// `STATION.GET_INFO` -- read the station info text.
    GetStationInfo,
    /// `STATION.SET_INFO` -- set the station info text (echoed back).
    SetStationInfo,
    /// `STATION.GET_STATUS` -- read the station status text.
    GetStationStatus,
    /// `STATION.SET_STATUS` -- set the station status text (echoed back).
    SetStationStatus,
    /// `RX.GET_CALL_ACTIVITY` -- recently heard stations.
    GetCallActivity,
    /// `RX.GET_CALL_SELECTED` -- the callsign selected in the UI.
    GetCallSelected,
    /// `RX.GET_BAND_ACTIVITY` -- activity per audio offset.
    GetBandActivity,
    /// `RX.GET_TEXT` -- contents of the receive window.
    GetRxText,
    /// `TX.GET_TEXT` -- contents of the transmit buffer.
    GetTxText,
    /// `TX.SET_TEXT` -- set the transmit buffer (echoed back).
    SetTxText,
    /// `TX.SEND_MESSAGE` -- transmit a message now. No reply.
    SendMessage,
    /// `MODE.GET_SPEED` -- read the JS8 speed setting.
    GetSpeed,
    /// `MODE.SET_SPEED` -- set the JS8 speed (echoed back).
    SetSpeed,
    /// `INBOX.GET_MESSAGES` -- stored inbox messages.
    GetInboxMessages,
    /// `INBOX.STORE_MESSAGE` -- store a message for later delivery.
    StoreMessage,
    /// `WINDOW.RAISE` -- raise the JS8Call window. No reply.
    RaiseWindow,
    /// `PING` -- liveness probe. No reply, no `_ID`.
    Ping,
    /// `RX.GET_DIRECTED` -- the last directed message received.
    GetDirected,
    /// `RX.GET_SPOT` -- the last spot received.
    GetSpot,
    /// `TX.GET_FRAME` -- the last frame transmitted.
    GetTxFrame,
}

impl RequestType {
    /// Every request type, for exhaustive attribute tests.
    pub const ALL: [RequestType; 26] = [
        RequestType::GetFrequency,
        RequestType::SetFrequency,
        RequestType::GetPtt,
        RequestType::GetCallsign,
        RequestType::GetGrid,
        RequestType::SetGrid,
        RequestType::GetStationInfo,
        RequestType::SetStationInfo,
        RequestType::GetStationStatus,
        RequestType::SetStationStatus,
        RequestType::GetCallActivity,
        RequestType::GetCallSelected,
        RequestType::GetBandActivity,
        RequestType::GetRxText,
        RequestType::GetTxText,
        RequestType::SetTxText,
        RequestType::SendMessage,
        RequestType::GetSpeed,
        RequestType::SetSpeed,
        RequestType::GetInboxMessages,
        RequestType::StoreMessage,
        RequestType::RaiseWindow,
        RequestType::Ping,
        RequestType::GetDirected,
        RequestType::GetSpot,
        RequestType::GetTxFrame,
    ];

    /// The wire `type` string for this request.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::GetFrequency => "RIG.GET_FREQ",
            RequestType::SetFrequency => "RIG.SET_FREQ",
            RequestType::GetPtt => "RIG.GET_PTT",
            RequestType::GetCallsign => "STATION.GET_CALLSIGN",
            RequestType::GetGrid => "STATION.GET_GRID",
            RequestType::SetGrid => "STATION.SET_GRID",
            RequestType::GetStationInfo => "STATION.GET_INFO",
            RequestType::SetStationInfo => "STATION.SET_INFO",
            RequestType::GetStationStatus => "STATION.GET_STATUS",
            RequestType::SetStationStatus => "STATION.SET_STATUS",
            RequestType::GetCallActivity => "RX.GET_CALL_ACTIVITY",
            RequestType::GetCallSelected => "RX.GET_CALL_SELECTED",
            RequestType::GetBandActivity => "RX.GET_BAND_ACTIVITY",
            RequestType::GetRxText => "RX.GET_TEXT",
            RequestType::GetTxText => "TX.GET_TEXT",
            RequestType::SetTxText => "TX.SET_TEXT",
            RequestType::SendMessage => "TX.SEND_MESSAGE",
            RequestType::GetSpeed => "MODE.GET_SPEED",
            RequestType::SetSpeed => "MODE.SET_SPEED",
            RequestType::GetInboxMessages => "INBOX.GET_MESSAGES",
            RequestType::StoreMessage => "INBOX.STORE_MESSAGE",
            RequestType::RaiseWindow => "WINDOW.RAISE",
            RequestType::Ping => "PING",
            RequestType::GetDirected => "RX.GET_DIRECTED",
            RequestType::GetSpot => "RX.GET_SPOT",
            RequestType::GetTxFrame => "TX.GET_FRAME",
        }
    }

    /// Whether JS8Call sends a correlated reply to this request.
    ///
    /// The four fire-and-forget types return immediately after
    /// transmission; waiting on them would always time out.
    pub fn awaits_reply(&self) -> bool {
        !matches!(
            self,
            RequestType::SetFrequency
                | RequestType::SendMessage
                | RequestType::RaiseWindow
                | RequestType::Ping
        )
    }

    /// Whether the request is stamped with a `_ID` correlation parameter
    /// before transmission. `PING` is the one exempt type.
    pub fn carries_id(&self) -> bool {
        !matches!(self, RequestType::Ping)
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode an envelope as one wire frame: compact JSON plus a trailing `\n`.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    let mut frame = serde_json::to_vec(envelope)
        .map_err(|e| Error::Protocol(format!("failed to encode {}: {}", envelope.kind, e)))?;
    frame.push(b'\n');
    Ok(frame)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Incremental decoder for the inbound byte stream.
///
/// TCP reads arrive in arbitrary chunks; `FrameBuffer` accumulates them
/// and yields an [`Envelope`] for every complete, parseable line. Bytes
/// after the last newline stay buffered for the next
/// [`feed`](FrameBuffer::feed).
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    pub fn new() -> Self {
        FrameBuffer {
            buf: BytesMut::new(),
        }
    }

    /// Append newly-read bytes and decode every complete line.
    ///
    /// Malformed and empty lines are dropped silently; a trailing `\r`
    /// before the newline is tolerated.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Envelope> {
        self.buf.extend_from_slice(bytes);

        let mut envelopes = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let chunk = self.buf.split_to(pos + 1);
            let mut line = &chunk[..pos];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            if line.is_empty() {
                continue;
            }

            match serde_json::from_slice::<Envelope>(line) {
                Ok(envelope) => {
                    tracing::trace!(kind = %envelope.kind, "Decoded envelope");
                    envelopes.push(envelope);
                }
                Err(e) => {
                    // Deliberate tolerance: malformed fragments are absorbed,
                    // never surfaced.
                    tracing::trace!(error = %e, "Dropping malformed line");
                }
            }
        }
        envelopes
    }

    /// Number of buffered bytes awaiting their newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

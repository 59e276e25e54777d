//! Typed command facade over the correlation engine.
//!
//! One inherent method per JS8Call API operation, each a thin mapping
//! from typed arguments onto [`Js8CallClient::call`] plus a typed decode
//! of the reply. Decoding follows the protocol's absence-means-empty
//! convention throughout: a missing expected field yields the documented
//! default (0, empty string, `false`), never an error. Connection loss
//! and timeouts propagate unchanged.
//!
//! Set-style operations come in two kinds, mirroring the upstream API:
//! reply-confirmed setters report success as value equality with the
//! server's echo, while the fire-and-forget setters (frequency, immediate
//! transmit, window raise) report success purely on transmission.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use js8link_core::envelope::{Envelope, ID_PARAM};
use js8link_core::error::{Error, Result};
use js8link_core::locator;
use js8link_core::position::PositionSource;
use js8link_core::types::{
    BandActivity, CallActivity, DirectedMessage, FrequencyInfo, InboxMessage, Speed, Spot, TxFrame,
};

use crate::client::Js8CallClient;
use crate::codec::RequestType;

/// Client name reported in `PING` probes.
const CLIENT_NAME: &str = "js8link";

impl Js8CallClient {
    // -------------------------------------------------------------------
    // Rig
    // -------------------------------------------------------------------

    /// Read the current frequency information (`RIG.GET_FREQ`).
    ///
    /// Missing fields decode as 0.
    pub async fn frequency(&mut self) -> Result<FrequencyInfo> {
        let reply = self.call(RequestType::GetFrequency, "", Map::new()).await?;
        Ok(FrequencyInfo {
            freq: reply.param_u64("FREQ"),
            dial: reply.param_u64("DIAL"),
            offset: reply.param_i64("OFFSET"),
        })
    }

    /// Tune the rig (`RIG.SET_FREQ`). Fire-and-forget: JS8Call sends no
    /// confirmation, so success means the command was transmitted.
    ///
    /// Either the dial frequency, the audio offset, or both may be given;
    /// an omitted field leaves the current value untouched.
    pub async fn set_frequency(&mut self, dial: Option<u64>, offset: Option<i64>) -> Result<()> {
        let mut params = Map::new();
        if let Some(dial) = dial {
            params.insert("DIAL".into(), Value::from(dial));
        }
        if let Some(offset) = offset {
            params.insert("OFFSET".into(), Value::from(offset));
        }
        self.call(RequestType::SetFrequency, "", params).await?;
        Ok(())
    }

    /// Read the push-to-talk state (`RIG.GET_PTT`). Missing decodes as
    /// `false`.
    pub async fn ptt(&mut self) -> Result<bool> {
        let reply = self.call(RequestType::GetPtt, "", Map::new()).await?;
        Ok(reply.param_bool("PTT"))
    }

    // -------------------------------------------------------------------
    // Station identity
    // -------------------------------------------------------------------

    /// Read the configured callsign (`STATION.GET_CALLSIGN`).
    pub async fn callsign(&mut self) -> Result<String> {
        let reply = self.call(RequestType::GetCallsign, "", Map::new()).await?;
        Ok(reply.value)
    }

    /// Read the configured grid square (`STATION.GET_GRID`).
    pub async fn grid(&mut self) -> Result<String> {
        let reply = self.call(RequestType::GetGrid, "", Map::new()).await?;
        Ok(reply.value)
    }

    /// Set the grid square (`STATION.SET_GRID`).
    ///
    /// The grid is uppercased before transmission; success is the server
    /// echoing the same grid back (compared case-insensitively).
    pub async fn set_grid(&mut self, grid: &str) -> Result<bool> {
        let want = grid.to_uppercase();
        let reply = self.call(RequestType::SetGrid, &want, Map::new()).await?;
        Ok(reply.value.to_uppercase() == want)
    }

    /// Read the station info text (`STATION.GET_INFO`).
    pub async fn station_info(&mut self) -> Result<String> {
        let reply = self
            .call(RequestType::GetStationInfo, "", Map::new())
            .await?;
        Ok(reply.value)
    }

    /// Set the station info text (`STATION.SET_INFO`); success is the
    /// server echoing the same text back.
    pub async fn set_station_info(&mut self, info: &str) -> Result<bool> {
        let reply = self
            .call(RequestType::SetStationInfo, info, Map::new())
            .await?;
        Ok(reply.value == info)
    }

    /// Read the station status text (`STATION.GET_STATUS`).
    pub async fn station_status(&mut self) -> Result<String> {
        let reply = self
            .call(RequestType::GetStationStatus, "", Map::new())
            .await?;
        Ok(reply.value)
    }

    /// Set the station status text (`STATION.SET_STATUS`); success is the
    /// server echoing the same text back.
    pub async fn set_station_status(&mut self, status: &str) -> Result<bool> {
        let reply = self
            .call(RequestType::SetStationStatus, status, Map::new())
            .await?;
        Ok(reply.value == status)
    }

    // -------------------------------------------------------------------
    // Activity
    // -------------------------------------------------------------------

    /// Recently heard stations keyed by callsign
    /// (`RX.GET_CALL_ACTIVITY`).
    pub async fn call_activity(&mut self) -> Result<HashMap<String, CallActivity>> {
        let reply = self
            .call(RequestType::GetCallActivity, "", Map::new())
            .await?;
        Ok(decode_call_activity(&reply))
    }

    /// The callsign currently selected in the JS8Call UI
    /// (`RX.GET_CALL_SELECTED`). Empty when nothing is selected.
    pub async fn selected_call(&mut self) -> Result<String> {
        let reply = self
            .call(RequestType::GetCallSelected, "", Map::new())
            .await?;
        Ok(reply.value)
    }

    /// Band activity keyed by audio offset (`RX.GET_BAND_ACTIVITY`).
    pub async fn band_activity(&mut self) -> Result<HashMap<String, BandActivity>> {
        let reply = self
            .call(RequestType::GetBandActivity, "", Map::new())
            .await?;
        Ok(decode_band_activity(&reply))
    }

    // -------------------------------------------------------------------
    // Text windows
    // -------------------------------------------------------------------

    /// Contents of the receive window (`RX.GET_TEXT`).
    pub async fn rx_text(&mut self) -> Result<String> {
        let reply = self.call(RequestType::GetRxText, "", Map::new()).await?;
        Ok(reply.value)
    }

    /// Contents of the transmit buffer (`TX.GET_TEXT`).
    pub async fn tx_text(&mut self) -> Result<String> {
        let reply = self.call(RequestType::GetTxText, "", Map::new()).await?;
        Ok(reply.value)
    }

    /// Set the transmit buffer (`TX.SET_TEXT`); success is the server
    /// echoing the same text back.
    pub async fn set_tx_text(&mut self, text: &str) -> Result<bool> {
        let reply = self.call(RequestType::SetTxText, text, Map::new()).await?;
        Ok(reply.value == text)
    }

    /// Transmit a message immediately (`TX.SEND_MESSAGE`).
    /// Fire-and-forget: success means the command was transmitted.
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.call(RequestType::SendMessage, text, Map::new()).await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Mode
    // -------------------------------------------------------------------

    /// Read the JS8 speed setting (`MODE.GET_SPEED`). A missing or
    /// unknown code decodes as [`Speed::Normal`].
    pub async fn speed(&mut self) -> Result<Speed> {
        let reply = self.call(RequestType::GetSpeed, "", Map::new()).await?;
        Ok(Speed::from_code(reply.param_i64("SPEED")).unwrap_or_default())
    }

    /// Set the JS8 speed (`MODE.SET_SPEED`); success is the server
    /// echoing the same speed code back. A reply without a `SPEED` field
    /// reports failure.
    pub async fn set_speed(&mut self, speed: Speed) -> Result<bool> {
        let mut params = Map::new();
        params.insert("SPEED".into(), Value::from(speed.code()));
        let reply = self.call(RequestType::SetSpeed, "", params).await?;
        Ok(reply.params.get("SPEED").and_then(Value::as_i64) == Some(speed.code()))
    }

    // -------------------------------------------------------------------
    // Inbox
    // -------------------------------------------------------------------

    /// Stored inbox messages (`INBOX.GET_MESSAGES`), optionally filtered
    /// by callsign.
    pub async fn inbox_messages(&mut self, callsign: Option<&str>) -> Result<Vec<InboxMessage>> {
        let mut params = Map::new();
        if let Some(callsign) = callsign {
            params.insert("CALLSIGN".into(), Value::from(callsign));
        }
        let reply = self
            .call(RequestType::GetInboxMessages, "", params)
            .await?;
        Ok(decode_inbox_messages(&reply))
    }

    /// Store a message for later delivery (`INBOX.STORE_MESSAGE`).
    ///
    /// Returns the stored message's ID (`params.ID`, default 0).
    pub async fn store_message(&mut self, callsign: &str, text: &str) -> Result<i64> {
        let mut params = Map::new();
        params.insert("CALLSIGN".into(), Value::from(callsign));
        params.insert("TEXT".into(), Value::from(text));
        let reply = self.call(RequestType::StoreMessage, "", params).await?;
        Ok(reply.param_i64("ID"))
    }

    // -------------------------------------------------------------------
    // Application
    // -------------------------------------------------------------------

    /// Raise the JS8Call window (`WINDOW.RAISE`). Fire-and-forget.
    pub async fn raise_window(&mut self) -> Result<()> {
        self.call(RequestType::RaiseWindow, "", Map::new()).await?;
        Ok(())
    }

    /// Liveness probe (`PING`).
    ///
    /// Sends a heartbeat carrying this client's name, version, and the
    /// current UTC time in milliseconds, and succeeds purely on
    /// transmission -- JS8Call is not guaranteed to answer pings, so no
    /// reply is awaited or validated.
    pub async fn ping(&mut self) -> Result<()> {
        let mut params = Map::new();
        params.insert("NAME".into(), Value::from(CLIENT_NAME));
        params.insert("VERSION".into(), Value::from(env!("CARGO_PKG_VERSION")));
        params.insert("UTC".into(), Value::from(unix_millis()));
        self.call(RequestType::Ping, "", params).await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Last-received queries
    // -------------------------------------------------------------------

    /// The last directed message received (`RX.GET_DIRECTED`), or `None`
    /// when the reply carries no message fields -- the upstream
    /// convention for "nothing received yet".
    pub async fn last_directed(&mut self) -> Result<Option<DirectedMessage>> {
        let reply = self.call(RequestType::GetDirected, "", Map::new()).await?;
        Ok(decode_directed(&reply))
    }

    /// The last spot received (`RX.GET_SPOT`), or `None` when the reply
    /// carries no spot fields.
    pub async fn last_spot(&mut self) -> Result<Option<Spot>> {
        let reply = self.call(RequestType::GetSpot, "", Map::new()).await?;
        Ok(decode_spot(&reply))
    }

    /// The last transmitted frame (`TX.GET_FRAME`), or `None` when the
    /// reply carries no frame fields.
    pub async fn last_tx_frame(&mut self) -> Result<Option<TxFrame>> {
        let reply = self.call(RequestType::GetTxFrame, "", Map::new()).await?;
        Ok(decode_tx_frame(&reply))
    }

    // -------------------------------------------------------------------
    // Geolocation assist
    // -------------------------------------------------------------------

    /// Derive the station's Maidenhead grid square from an external
    /// position source.
    ///
    /// The one facade operation that does not touch the protocol: it
    /// composes the given [`PositionSource`] with the grid encoder. A
    /// position without a fix fails with
    /// [`Error::NoFix`](js8link_core::Error::NoFix), distinct from a
    /// stale-but-present fix, which succeeds.
    pub async fn position_grid(&mut self, source: &mut dyn PositionSource) -> Result<String> {
        let position = source.current_position().await?;
        if !position.fix.has_fix() {
            return Err(Error::NoFix);
        }
        Ok(locator::grid_square(position.latitude, position.longitude))
    }
}

// ---------------------------------------------------------------------------
// Reply decoding
// ---------------------------------------------------------------------------

/// Whether a reply carries any payload parameters beyond the echoed
/// correlation ID.
fn has_payload(reply: &Envelope) -> bool {
    reply.params.keys().any(|key| key != ID_PARAM)
}

/// Decode a `RX.GET_CALL_ACTIVITY` reply: every object-valued parameter
/// (other than `_ID`) is one heard station keyed by callsign.
fn decode_call_activity(reply: &Envelope) -> HashMap<String, CallActivity> {
    reply
        .params
        .iter()
        .filter(|(key, _)| key.as_str() != ID_PARAM)
        .filter_map(|(callsign, value)| {
            let entry = value.as_object()?;
            Some((
                callsign.clone(),
                CallActivity {
                    snr: entry.get("SNR").and_then(Value::as_i64).unwrap_or(0),
                    grid: entry
                        .get("GRID")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .trim()
                        .to_string(),
                    utc: entry.get("UTC").and_then(Value::as_i64).unwrap_or(0),
                },
            ))
        })
        .collect()
}

/// Decode a `RX.GET_BAND_ACTIVITY` reply: every object-valued parameter
/// (other than `_ID`) is activity keyed by audio offset.
fn decode_band_activity(reply: &Envelope) -> HashMap<String, BandActivity> {
    reply
        .params
        .iter()
        .filter(|(key, _)| key.as_str() != ID_PARAM)
        .filter_map(|(offset, value)| {
            let entry = value.as_object()?;
            Some((
                offset.clone(),
                BandActivity {
                    freq: entry.get("FREQ").and_then(Value::as_u64).unwrap_or(0),
                    dial: entry.get("DIAL").and_then(Value::as_u64).unwrap_or(0),
                    offset: entry.get("OFFSET").and_then(Value::as_i64).unwrap_or(0),
                    text: entry
                        .get("TEXT")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    snr: entry.get("SNR").and_then(Value::as_i64).unwrap_or(0),
                    utc: entry.get("UTC").and_then(Value::as_i64).unwrap_or(0),
                },
            ))
        })
        .collect()
}

/// Decode an `INBOX.GET_MESSAGES` reply: `params.MESSAGES` is an array of
/// message objects whose own `params` carry the fields.
fn decode_inbox_messages(reply: &Envelope) -> Vec<InboxMessage> {
    reply
        .params
        .get("MESSAGES")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(Value::as_object)
                .map(|message| {
                    let params = message
                        .get("params")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default();
                    InboxMessage {
                        from: params
                            .get("FROM")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        to: params
                            .get("TO")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        text: params
                            .get("TEXT")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        utc: params.get("UTC").and_then(Value::as_i64).unwrap_or(0),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a `RX.GET_DIRECTED` reply. A reply without message fields maps
/// to `None`.
fn decode_directed(reply: &Envelope) -> Option<DirectedMessage> {
    if !has_payload(reply) {
        return None;
    }
    Some(DirectedMessage {
        from: reply.param_str("FROM").to_string(),
        to: reply.param_str("TO").to_string(),
        text: reply.param_str("TEXT").to_string(),
        utc: reply.param_i64("UTC"),
    })
}

/// Decode a `RX.GET_SPOT` reply. A reply without spot fields maps to
/// `None`.
fn decode_spot(reply: &Envelope) -> Option<Spot> {
    if !has_payload(reply) {
        return None;
    }
    Some(Spot {
        call: reply.param_str("CALL").to_string(),
        freq: reply.param_u64("FREQ"),
        snr: reply.param_i64("SNR"),
        utc: reply.param_i64("UTC"),
    })
}

/// Decode a `TX.GET_FRAME` reply. A reply without frame fields maps to
/// `None`.
fn decode_tx_frame(reply: &Envelope) -> Option<TxFrame> {
    if !has_payload(reply) {
        return None;
    }
    Some(TxFrame {
        text: reply.param_str("TEXT").to_string(),
        utc: reply.param_i64("UTC"),
    })
}

/// Current UTC time in milliseconds since the Unix epoch.
fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

//! Core types used throughout js8link.
//!
//! These are the typed shapes of the values JS8Call's API returns. The
//! wire protocol carries everything as loose JSON parameters; the command
//! facade in `js8link-client` decodes them into these structs with the
//! protocol's absence-means-empty defaulting.

use std::fmt;
use std::str::FromStr;

/// JS8 modulation speed.
///
/// The numeric codes are the values the `MODE.GET_SPEED` / `MODE.SET_SPEED`
/// API operations exchange. Slower speeds trade throughput for decode
/// sensitivity: Slow is roughly -28 dB SNR at 30 s/frame, Turbo is
/// -18 dB at 6 s/frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Speed {
    /// Normal: 15 s frames, ~-24 dB decode floor.
    #[default]
    Normal,
    /// Fast: 10 s frames.
    Fast,
    /// Turbo: 6 s frames.
    Turbo,
    /// Slow: 30 s frames, deepest decode floor.
    Slow,
    /// Ultra: experimental sub-6 s frames.
    Ultra,
}

impl Speed {
    /// The numeric code used on the wire (`params.SPEED`).
    pub fn code(&self) -> i64 {
        match self {
            Speed::Normal => 0,
            Speed::Fast => 1,
            Speed::Turbo => 2,
            Speed::Slow => 3,
            Speed::Ultra => 4,
        }
    }

    /// Decode a wire code. Returns `None` for codes outside the known set.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Speed::Normal),
            1 => Some(Speed::Fast),
            2 => Some(Speed::Turbo),
            3 => Some(Speed::Slow),
            4 => Some(Speed::Ultra),
            _ => None,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Speed::Normal => "NORMAL",
            Speed::Fast => "FAST",
            Speed::Turbo => "TURBO",
            Speed::Slow => "SLOW",
            Speed::Ultra => "ULTRA",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`Speed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpeedError(String);

impl fmt::Display for ParseSpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown speed: {}", self.0)
    }
}

impl std::error::Error for ParseSpeedError {}

impl FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NORMAL" => Ok(Speed::Normal),
            "FAST" => Ok(Speed::Fast),
            "TURBO" => Ok(Speed::Turbo),
            "SLOW" => Ok(Speed::Slow),
            "ULTRA" => Ok(Speed::Ultra),
            _ => Err(ParseSpeedError(s.to_string())),
        }
    }
}

/// Frequency information from `RIG.GET_FREQ`.
///
/// JS8Call reports three related values: the rig's dial frequency, the
/// audio offset within the passband, and their sum -- the actual RF
/// frequency of the transmitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrequencyInfo {
    /// Actual operating frequency in hertz (`dial + offset`).
    pub freq: u64,
    /// Rig dial frequency in hertz.
    pub dial: u64,
    /// Audio offset within the passband, in hertz.
    pub offset: i64,
}

impl fmt::Display for FrequencyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz (dial {} Hz + {} Hz)",
            self.freq, self.dial, self.offset
        )
    }
}

/// One recently-heard station, from `RX.GET_CALL_ACTIVITY`.
///
/// Keyed by callsign in the returned map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallActivity {
    /// Signal-to-noise ratio of the last decode, in dB.
    pub snr: i64,
    /// Reported Maidenhead grid square (may be empty).
    pub grid: String,
    /// UTC timestamp of the last decode, in milliseconds.
    pub utc: i64,
}

/// Activity on one audio offset, from `RX.GET_BAND_ACTIVITY`.
///
/// Keyed by offset in the returned map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BandActivity {
    /// Actual RF frequency in hertz.
    pub freq: u64,
    /// Rig dial frequency in hertz.
    pub dial: u64,
    /// Audio offset in hertz.
    pub offset: i64,
    /// Last decoded text at this offset.
    pub text: String,
    /// Signal-to-noise ratio in dB.
    pub snr: i64,
    /// UTC timestamp in milliseconds.
    pub utc: i64,
}

/// A directed message, from `RX.GET_DIRECTED` or an `RX.DIRECTED`
/// notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectedMessage {
    /// Sender callsign.
    pub from: String,
    /// Recipient callsign or group.
    pub to: String,
    /// Message text.
    pub text: String,
    /// UTC timestamp in milliseconds.
    pub utc: i64,
}

/// A band spot, from `RX.GET_SPOT` or an `RX.SPOT` notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spot {
    /// Spotted station callsign.
    pub call: String,
    /// Frequency in hertz.
    pub freq: u64,
    /// Signal-to-noise ratio in dB.
    pub snr: i64,
    /// UTC timestamp in milliseconds.
    pub utc: i64,
}

/// One transmitted frame, from `TX.GET_FRAME` or a `TX.FRAME` notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxFrame {
    /// Text carried by the frame.
    pub text: String,
    /// UTC timestamp in milliseconds.
    pub utc: i64,
}

/// A stored inbox message, from `INBOX.GET_MESSAGES`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboxMessage {
    /// Sender callsign.
    pub from: String,
    /// Recipient callsign.
    pub to: String,
    /// Message text.
    pub text: String,
    /// UTC timestamp in milliseconds.
    pub utc: i64,
}

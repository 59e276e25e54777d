//! Unsolicited notification types.
//!
//! JS8Call pushes notifications on the same TCP stream as command replies,
//! without any request having asked for them. The set of notification
//! types is fixed by the upstream API; anything outside this set is
//! ignored rather than treated as an error, so new upstream additions
//! degrade gracefully.
//!
//! Notifications are dispatched synchronously by the client while it reads
//! the stream -- see `js8link-client` for the dispatch rules.

use std::fmt;

/// The closed set of unsolicited message types JS8Call pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// `CLOSE` -- the JS8Call application is shutting down.
    Close,
    /// `RX.DIRECTED` -- a directed message addressed to this station
    /// (or a group it belongs to) was received.
    Directed,
    /// `RX.SPOT` -- a station was decoded and spotted on the band.
    Spot,
    /// `TX.FRAME` -- JS8Call transmitted one frame of an outgoing message.
    TxFrame,
}

impl NotificationKind {
    /// Every notification kind, in wire-documentation order.
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Close,
        NotificationKind::Directed,
        NotificationKind::Spot,
        NotificationKind::TxFrame,
    ];

    /// Classify an envelope `type` string. Returns `None` for anything
    /// that is not a known notification (including all reply types).
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "CLOSE" => Some(NotificationKind::Close),
            "RX.DIRECTED" => Some(NotificationKind::Directed),
            "RX.SPOT" => Some(NotificationKind::Spot),
            "TX.FRAME" => Some(NotificationKind::TxFrame),
            _ => None,
        }
    }

    /// The wire `type` string for this notification kind.
    pub fn as_type(&self) -> &'static str {
        match self {
            NotificationKind::Close => "CLOSE",
            NotificationKind::Directed => "RX.DIRECTED",
            NotificationKind::Spot => "RX.SPOT",
            NotificationKind::TxFrame => "TX.FRAME",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_type())
    }
}

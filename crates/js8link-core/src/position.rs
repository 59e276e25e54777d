//! Position source trait for the grid-square assist.
//!
//! The client can derive a Maidenhead locator from the station's current
//! position (typically a GPS daemon). The position provider is an external
//! collaborator, abstracted behind [`PositionSource`] so tests and
//! non-GPS deployments can supply fixed or scripted positions.

use async_trait::async_trait;

use crate::error::Result;

/// Quality of a position fix, following the gpsd mode numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixQuality {
    /// No fix available. Positions with this quality must not be used.
    NoFix,
    /// Two-dimensional fix (no altitude). Usable for grid derivation.
    TwoD,
    /// Full three-dimensional fix.
    ThreeD,
}

impl FixQuality {
    /// Classify a gpsd `mode` value (0/1 = no fix, 2 = 2D, 3+ = 3D).
    pub fn from_mode(mode: u8) -> Self {
        match mode {
            0 | 1 => FixQuality::NoFix,
            2 => FixQuality::TwoD,
            _ => FixQuality::ThreeD,
        }
    }

    /// Whether the fix carries usable coordinates.
    pub fn has_fix(&self) -> bool {
        !matches!(self, FixQuality::NoFix)
    }
}

/// A geographic position with its fix quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees, north positive.
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive.
    pub longitude: f64,
    /// Quality of the fix these coordinates came from.
    pub fix: FixQuality,
}

/// Asynchronous source of the station's current position.
///
/// Implementations wrap whatever provides coordinates on the station --
/// a gpsd client, a fixed configured location, or a test stub. Returning
/// a [`Position`] whose quality is [`FixQuality::NoFix`] is valid; the
/// grid-square assist surfaces it as [`Error::NoFix`](crate::Error::NoFix).
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Obtain the current position.
    ///
    /// Errors should be reserved for failures to reach the provider at
    /// all (daemon not running, link down); an unavailable fix is
    /// expressed through [`FixQuality::NoFix`] instead.
    async fn current_position(&mut self) -> Result<Position>;
}

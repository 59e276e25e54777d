//! Maidenhead grid-square encoding.
//!
//! A Maidenhead locator encodes a longitude/latitude pair at three levels
//! of precision:
//!
//! ```text
//! field      two letters 'A'..'R'   (20 deg lon x 10 deg lat each)
//! square     two digits  '0'..'9'   ( 2 deg lon x  1 deg lat each)
//! subsquare  two letters 'a'..'x'   ( 5 min lon x 2.5 min lat each)
//! ```
//!
//! giving the familiar six-character locators exchanged on the air
//! (`FN31pr`, `JN58td`). Longitude characters come first at every level.

/// Encode a latitude/longitude pair as a six-character Maidenhead locator.
///
/// Pure and total: latitude is clamped to [-90, 90] and longitude to
/// [-180, 180] before encoding, and every alphabet index is clamped to its
/// range, so boundary inputs (the north pole, the antimeridian) encode to
/// the last cell (`...R`/`9`/`x`) instead of indexing past the alphabet.
///
/// # Example
///
/// ```
/// use js8link_core::grid_square;
///
/// assert_eq!(grid_square(0.0, 0.0), "JJ00aa");
/// assert_eq!(grid_square(48.14666, 11.60833), "JN58td");
/// ```
pub fn grid_square(lat: f64, lon: f64) -> String {
    // Shift to non-negative ranges: lon in [0, 360), lat in [0, 180).
    // The top edge is pulled just inside the range so every level of the
    // encoding sees the same cell at the boundary.
    let lon = (lon.clamp(-180.0, 180.0) + 180.0).min(360.0 - 1e-9);
    let lat = (lat.clamp(-90.0, 90.0) + 90.0).min(180.0 - 1e-9);

    let field_lon = ((lon / 20.0) as usize).min(17);
    let field_lat = ((lat / 10.0) as usize).min(17);

    let square_lon = (((lon % 20.0) / 2.0) as usize).min(9);
    let square_lat = ((lat % 10.0) as usize).min(9);

    let subsquare_lon = (((lon % 2.0) * 12.0) as usize).min(23);
    let subsquare_lat = (((lat % 1.0) * 24.0) as usize).min(23);

    let mut grid = String::with_capacity(6);
    grid.push((b'A' + field_lon as u8) as char);
    grid.push((b'A' + field_lat as u8) as char);
    grid.push((b'0' + square_lon as u8) as char);
    grid.push((b'0' + square_lat as u8) as char);
    grid.push((b'a' + subsquare_lon as u8) as char);
    grid.push((b'a' + subsquare_lat as u8) as char);
    grid
}

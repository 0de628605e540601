//! Coordinate value types
//!
//! Plain value types with no identity beyond their fields. RA is always
//! hours, Dec/Az/Alt always degrees; azimuth is north-based.

use serde::{Deserialize, Serialize};

/// Equatorial coordinate in the current epoch (JNow)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    /// Right ascension in hours, [0, 24)
    pub ra_hours: f64,
    /// Declination in degrees, [-90, 90]
    pub dec_degrees: f64,
}

impl EquatorialCoordinate {
    pub fn new(ra_hours: f64, dec_degrees: f64) -> Self {
        Self {
            ra_hours,
            dec_degrees,
        }
    }
}

impl std::fmt::Display for EquatorialCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RA {:.4}h Dec {:.4}\u{00b0}",
            self.ra_hours, self.dec_degrees
        )
    }
}

/// Horizontal coordinate relative to the local horizon
///
/// Always derived from an equatorial coordinate plus site and time;
/// never a source of truth on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    /// Azimuth in degrees, [0, 360), measured from north through east
    pub az_degrees: f64,
    /// Altitude in degrees, [-90, 90]
    pub alt_degrees: f64,
}

impl HorizontalCoordinate {
    pub fn new(az_degrees: f64, alt_degrees: f64) -> Self {
        Self {
            az_degrees,
            alt_degrees,
        }
    }
}

/// Observing site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    /// Geographic latitude in degrees, north positive
    pub latitude: f64,
    /// Geographic longitude in degrees, east positive
    pub longitude: f64,
    /// Elevation above sea level in meters
    pub elevation: f64,
}

/// Slew completion tolerances, both in arcminutes
///
/// The RA tolerance is arcminutes of time, the Dec tolerance arcminutes
/// of angle; they go through different unit conversions in
/// [`within_tolerance`](crate::within_tolerance) and are not
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlewAccuracy {
    pub ra_arcmin: f64,
    pub dec_arcmin: f64,
}

impl Default for SlewAccuracy {
    fn default() -> Self {
        Self {
            ra_arcmin: 3.0,
            dec_arcmin: 3.0,
        }
    }
}

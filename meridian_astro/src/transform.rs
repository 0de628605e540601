//! Equatorial / horizontal transforms and the slew completion predicate

use chrono::{DateTime, Utc};

use crate::coords::{EquatorialCoordinate, HorizontalCoordinate, SiteLocation, SlewAccuracy};
use crate::time::local_sidereal_time;

/// Wrap a value in hours into [0, 24)
pub fn range24(r: f64) -> f64 {
    let mut res = r;
    while res < 0.0 {
        res += 24.0;
    }
    while res >= 24.0 {
        res -= 24.0;
    }
    res
}

/// Wrap a value in degrees into [0, 360)
pub fn range360(r: f64) -> f64 {
    let mut res = r;
    while res < 0.0 {
        res += 360.0;
    }
    while res >= 360.0 {
        res -= 360.0;
    }
    res
}

/// Wrap an hour angle into [-12, 12)
pub fn range_ha(r: f64) -> f64 {
    let mut res = r;
    while res < -12.0 {
        res += 24.0;
    }
    while res >= 12.0 {
        res -= 24.0;
    }
    res
}

/// Hour angle of a right ascension in hours, wrapped into [0, 24)
pub fn hour_angle(ra_hours: f64, longitude: f64, time: DateTime<Utc>) -> f64 {
    range24(local_sidereal_time(longitude, time) - ra_hours)
}

/// Hour angle wrapped into [-12, 12); negative means east of the meridian
///
/// The meridian-side safety guards need the signed form, the published
/// hour angle uses [`hour_angle`].
pub fn signed_hour_angle(ra_hours: f64, longitude: f64, time: DateTime<Utc>) -> f64 {
    range_ha(local_sidereal_time(longitude, time) - ra_hours)
}

/// Convert an equatorial coordinate to the local horizontal frame
///
/// Azimuth comes out north-based in [0, 360); the underlying spherical
/// formula is south-based, shifted by 180 degrees on the way out.
pub fn equatorial_to_horizontal(
    eq: EquatorialCoordinate,
    site: SiteLocation,
    time: DateTime<Utc>,
) -> HorizontalCoordinate {
    let ha = hour_angle(eq.ra_hours, site.longitude, time) * 15.0;
    let (sin_ha, cos_ha) = ha.to_radians().sin_cos();
    let (sin_dec, cos_dec) = eq.dec_degrees.to_radians().sin_cos();
    let (sin_lat, cos_lat) = site.latitude.to_radians().sin_cos();

    let alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_ha).asin();
    let az_south = sin_ha.atan2(cos_ha * sin_lat - (sin_dec / cos_dec) * cos_lat);

    HorizontalCoordinate {
        az_degrees: range360(az_south.to_degrees() + 180.0),
        alt_degrees: alt.to_degrees(),
    }
}

/// Convert a horizontal coordinate back to the equatorial frame
///
/// Exact inverse of [`equatorial_to_horizontal`] for the same site and
/// time (away from the poles). Used when the park position is configured
/// in Az/Alt and a goto target has to be derived from it.
pub fn horizontal_to_equatorial(
    hz: HorizontalCoordinate,
    site: SiteLocation,
    time: DateTime<Utc>,
) -> EquatorialCoordinate {
    let az_south = (hz.az_degrees - 180.0).to_radians();
    let (sin_az, cos_az) = az_south.sin_cos();
    let (sin_alt, cos_alt) = hz.alt_degrees.to_radians().sin_cos();
    let (sin_lat, cos_lat) = site.latitude.to_radians().sin_cos();

    let ha = sin_az.atan2(cos_az * sin_lat + (sin_alt / cos_alt) * cos_lat);
    let dec = (sin_lat * sin_alt - cos_lat * cos_alt * cos_az).asin();

    let lst = local_sidereal_time(site.longitude, time);
    EquatorialCoordinate {
        ra_hours: range24(lst - ha.to_degrees() / 15.0),
        dec_degrees: dec.to_degrees(),
    }
}

/// Slew completion predicate
///
/// The RA tolerance is arcminutes of time divided by 900 (arcmin -> hours
/// via /60, then /15), the Dec tolerance arcminutes of angle divided
/// by 60. The two divisors are independent constants; collapsing them
/// into one formula changes when a slew reports complete.
pub fn within_tolerance(
    current: EquatorialCoordinate,
    target: EquatorialCoordinate,
    accuracy: SlewAccuracy,
) -> bool {
    let dx = target.ra_hours - current.ra_hours;
    let dy = target.dec_degrees - current.dec_degrees;
    dx.abs() <= accuracy.ra_arcmin / 900.0 && dy.abs() <= accuracy.dec_arcmin / 60.0
}

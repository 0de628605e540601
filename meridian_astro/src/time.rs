//! Julian date and sidereal time

use chrono::{DateTime, Utc};

/// Seconds in a day
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of the J2000.0 epoch (2000-01-01T12:00:00 TT, close enough in UT here)
const JD_J2000: f64 = 2_451_545.0;

/// Julian date for a UTC instant
pub fn julian_date(time: DateTime<Utc>) -> f64 {
    let unix_secs = time.timestamp() as f64 + f64::from(time.timestamp_subsec_micros()) / 1e6;
    JD_UNIX_EPOCH + unix_secs / SECONDS_PER_DAY
}

/// Greenwich mean sidereal time in hours, [0, 24)
pub fn greenwich_sidereal_time(time: DateTime<Utc>) -> f64 {
    let d = julian_date(time) - JD_J2000;
    crate::range24(18.697_374_558 + 24.065_709_824_419_08 * d)
}

/// Local mean sidereal time in hours, [0, 24)
///
/// Longitude is east-positive; 15 degrees of longitude is one hour of
/// sidereal time.
pub fn local_sidereal_time(longitude: f64, time: DateTime<Utc>) -> f64 {
    crate::range24(greenwich_sidereal_time(time) + longitude / 15.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn j2000() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_julian_date_j2000() {
        assert!((julian_date(j2000()) - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn test_julian_date_unix_epoch() {
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!((julian_date(t) - 2_440_587.5).abs() < 1e-9);
    }

    #[test]
    fn test_gst_at_j2000() {
        // At the J2000.0 epoch the series reduces to its constant term.
        assert!((greenwich_sidereal_time(j2000()) - 18.697_374_558).abs() < 1e-9);
    }

    #[test]
    fn test_lst_longitude_offset() {
        // 15 degrees east is exactly one sidereal hour ahead of Greenwich.
        let t = j2000();
        let gst = greenwich_sidereal_time(t);
        let lst = local_sidereal_time(15.0, t);
        assert!((lst - crate::range24(gst + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_lst_wraps_into_range() {
        let t = j2000();
        let lst = local_sidereal_time(170.0, t);
        assert!((0.0..24.0).contains(&lst));
    }

    #[test]
    fn test_sidereal_day_advance() {
        // One solar day later, sidereal time has gained roughly 3m56s.
        let t0 = j2000();
        let t1 = Utc.with_ymd_and_hms(2000, 1, 2, 12, 0, 0).unwrap();
        let gain = crate::range24(greenwich_sidereal_time(t1) - greenwich_sidereal_time(t0));
        assert!((gain - 0.065_709_8).abs() < 1e-4);
    }
}

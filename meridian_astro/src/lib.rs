//! Spherical astronomy primitives for mount control
//!
//! Pure functions only: coordinate value types, Julian date / sidereal
//! time, and the equatorial <-> horizontal transforms the motion state
//! machine builds on. Nothing in this crate holds mutable state or talks
//! to a device.

mod coords;
mod time;
mod transform;

pub use coords::{EquatorialCoordinate, HorizontalCoordinate, SiteLocation, SlewAccuracy};
pub use time::{greenwich_sidereal_time, julian_date, local_sidereal_time};
pub use transform::{
    equatorial_to_horizontal, horizontal_to_equatorial, hour_angle, range24, range360, range_ha,
    signed_hour_angle, within_tolerance,
};

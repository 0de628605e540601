//! Kinematic mount simulation
//!
//! Stands in for the protocol gateway when no hardware is attached. The
//! slewing step reproduces the classic LX200 simulation: the per-tick
//! step is `slew_rate * dt` degrees, RA advances by `step / 15` hours,
//! and an axis locks onto the target once its residual is within one
//! step. The RA residual is measured in hours against the step in
//! degrees; that asymmetry is long-standing observed behavior and is
//! kept as is.

use meridian_astro::{range24, EquatorialCoordinate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sidereal tracking rate in degrees per second
pub const SIDEREAL_RATE_DEG_PER_SEC: f64 = 0.004178;

/// Lunar tracking rate in degrees per second (14.511415 arcsec/s)
pub const LUNAR_RATE_DEG_PER_SEC: f64 = 14.511415 / 3600.0;

/// Solar tracking rate in degrees per second (15 arcsec/s)
pub const SOLAR_RATE_DEG_PER_SEC: f64 = 15.0 / 3600.0;

/// Default simulated slew rate in degrees per second
pub const DEFAULT_SLEW_RATE_DEG_PER_SEC: f64 = 1.0;

/// Tracking rate applied to the RA axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackingRate {
    Sidereal,
    Lunar,
    Solar,
    /// Tracking stopped
    Zero,
    /// Custom rate in degrees per second
    Custom(f64),
}

impl TrackingRate {
    pub fn degrees_per_second(self) -> f64 {
        match self {
            TrackingRate::Sidereal => SIDEREAL_RATE_DEG_PER_SEC,
            TrackingRate::Lunar => LUNAR_RATE_DEG_PER_SEC,
            TrackingRate::Solar => SOLAR_RATE_DEG_PER_SEC,
            TrackingRate::Zero => 0.0,
            TrackingRate::Custom(rate) => rate,
        }
    }
}

impl std::fmt::Display for TrackingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingRate::Sidereal => write!(f, "Sidereal"),
            TrackingRate::Lunar => write!(f, "Lunar"),
            TrackingRate::Solar => write!(f, "Solar"),
            TrackingRate::Zero => write!(f, "Stopped"),
            TrackingRate::Custom(rate) => write!(f, "Custom ({} deg/s)", rate),
        }
    }
}

/// Simulated mount kinematics
#[derive(Debug, Clone, Copy)]
pub struct MountSimulator {
    /// Slew rate in degrees per second, applied per axis
    pub slew_rate_deg_per_sec: f64,
}

impl Default for MountSimulator {
    fn default() -> Self {
        Self {
            slew_rate_deg_per_sec: DEFAULT_SLEW_RATE_DEG_PER_SEC,
        }
    }
}

impl MountSimulator {
    /// Advance a tracking mount by one tick
    ///
    /// RA follows the tracking rate, Dec stands still.
    pub fn tick_tracking(
        &self,
        current: &mut EquatorialCoordinate,
        rate: TrackingRate,
        dt: Duration,
    ) {
        let deg = rate.degrees_per_second() * dt.as_secs_f64();
        current.ra_hours = range24(current.ra_hours + deg / 15.0);
    }

    /// Advance a slewing mount one tick toward `target`
    ///
    /// Each axis moves by at most one step and snaps exactly onto the
    /// target once within one step; returns true when both axes have
    /// locked.
    pub fn tick_slewing(
        &self,
        current: &mut EquatorialCoordinate,
        target: EquatorialCoordinate,
        dt: Duration,
    ) -> bool {
        let step = self.slew_rate_deg_per_sec * dt.as_secs_f64();
        let mut locked = 0;

        let dx = target.ra_hours - current.ra_hours;
        if dx.abs() <= step {
            current.ra_hours = target.ra_hours;
            locked += 1;
        } else if dx > 0.0 {
            current.ra_hours += step / 15.0;
        } else {
            current.ra_hours -= step / 15.0;
        }

        let dy = target.dec_degrees - current.dec_degrees;
        if dy.abs() <= step {
            current.dec_degrees = target.dec_degrees;
            locked += 1;
        } else if dy > 0.0 {
            current.dec_degrees += step;
        } else {
            current.dec_degrees -= step;
        }

        locked == 2
    }
}

//! Telescope mount motion core
//!
//! The motion state machine, kinematic simulator and guide pulse
//! scheduler behind an LX200-family mount driver. The surrounding
//! property/presentation framework and the raw serial transport are not
//! here; the driver talks to the mount through the [`MountGateway`]
//! trait and exposes its state through [`MountController`].
//!
//! ## Features
//!
//! - Idle / Slewing / Tracking / Parking / Parked state machine driven
//!   by a periodic poll tick
//! - Kinematic simulation when no gateway is attached
//! - Timed, cancellable guide pulses with N/S and E/W exclusion groups
//! - Policy guards: horizon limit, guide/manual-motion exclusion, and
//!   the Astro-Physics meridian-side sync check

mod controller;
mod error;
mod gateway;
mod guide;
mod simulator;
mod variant;

pub use controller::{CommandOutcome, MountController, MountState};
pub use error::{GatewayError, GatewayResult};
pub use gateway::MountGateway;
pub use guide::{Axis, AxisPair, GuidePulse, GuidePulseScheduler};
pub use simulator::{
    MountSimulator, TrackingRate, DEFAULT_SLEW_RATE_DEG_PER_SEC, LUNAR_RATE_DEG_PER_SEC,
    SIDEREAL_RATE_DEG_PER_SEC, SOLAR_RATE_DEG_PER_SEC,
};
pub use variant::{sync_allowed, MountVariant, PierSide};

use meridian_astro::{HorizontalCoordinate, SiteLocation, SlewAccuracy};
use serde::{Deserialize, Serialize};

/// Static mount configuration
///
/// Owned by the surrounding configuration layer and handed to the
/// controller at construction; the site is immutable for the duration of
/// a session once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Observing site; horizontal coordinates are unavailable until set
    pub site: Option<SiteLocation>,
    /// Slew completion tolerances
    pub accuracy: SlewAccuracy,
    /// Goto targets below this altitude are rejected (degrees)
    pub horizon_limit_degrees: f64,
    /// Tracking rate applied after a completed slew
    pub tracking_rate: TrackingRate,
    /// Park position in the horizontal frame, converted to equatorial
    /// at park time
    pub park_position: HorizontalCoordinate,
    /// Protocol variant, fixed at connect time
    pub variant: MountVariant,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            site: None,
            accuracy: SlewAccuracy::default(),
            horizon_limit_degrees: 0.0,
            tracking_rate: TrackingRate::Sidereal,
            park_position: HorizontalCoordinate::new(0.0, 0.0),
            variant: MountVariant::Generic,
        }
    }
}

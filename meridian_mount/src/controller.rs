//! Mount motion state machine
//!
//! [`MountController`] owns the mount state, the current/target
//! coordinate pair and the guide scheduler. A periodic poll tick drives
//! it forward; explicit commands apply fully (or are fully rejected)
//! between ticks, so a tick never observes a half-applied command.
//! Without a gateway the controller runs against the kinematic
//! simulator.
//!
//! Gateway failures never escape: every command folds them into a
//! rejected outcome and the mount stays in its last known good state.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use meridian_astro::{
    equatorial_to_horizontal, greenwich_sidereal_time, horizontal_to_equatorial, hour_angle,
    range24, signed_hour_angle, within_tolerance, EquatorialCoordinate, HorizontalCoordinate,
};
use serde::{Deserialize, Serialize};

use crate::gateway::MountGateway;
use crate::guide::{Axis, AxisPair, GuidePulseScheduler};
use crate::simulator::MountSimulator;
use crate::variant::{sync_allowed, PierSide};
use crate::{MountConfig, TrackingRate};

/// Motion state of the mount; exactly one value at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountState {
    Idle,
    Slewing,
    Tracking,
    Parking,
    Parked,
}

impl std::fmt::Display for MountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MountState::Idle => write!(f, "Idle"),
            MountState::Slewing => write!(f, "Slewing"),
            MountState::Tracking => write!(f, "Tracking"),
            MountState::Parking => write!(f, "Parking"),
            MountState::Parked => write!(f, "Parked"),
        }
    }
}

/// Outcome of a mount command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Accepted,
    Rejected(String),
    /// Another motion command is still in progress
    Busy,
}

impl CommandOutcome {
    fn rejected(reason: impl Into<String>) -> Self {
        CommandOutcome::Rejected(reason.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }
}

/// The mount motion controller
///
/// One instance per mount, owned by the process entry point and handed
/// by reference to every command handler. All mutation goes through its
/// methods; the coordinate engine and simulator only compute into
/// values the controller applies explicitly.
pub struct MountController {
    gateway: Option<Arc<dyn MountGateway>>,
    config: MountConfig,
    state: MountState,
    current: EquatorialCoordinate,
    target: Option<EquatorialCoordinate>,
    tracking_rate: TrackingRate,
    pier_side: PierSide,
    guide: GuidePulseScheduler,
    manual_ns: bool,
    manual_we: bool,
    simulator: MountSimulator,
    /// Monotonic timeline accumulated from poll ticks; guide pulse
    /// deadlines live on it
    elapsed: Duration,
    /// Client-supplied UTC, as sent by the presentation layer's time
    /// update; system clock when absent
    time_override: Option<DateTime<Utc>>,
}

impl MountController {
    /// Create a controller running against the kinematic simulator
    pub fn new(config: MountConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a controller driving a real mount through `gateway`
    pub fn with_gateway(config: MountConfig, gateway: Arc<dyn MountGateway>) -> Self {
        Self::build(config, Some(gateway))
    }

    fn build(config: MountConfig, gateway: Option<Arc<dyn MountGateway>>) -> Self {
        // Until the first position read, assume the mount points at the
        // pole with the meridian RA.
        let current = EquatorialCoordinate::new(greenwich_sidereal_time(Utc::now()), 90.0);
        let tracking_rate = config.tracking_rate;
        Self {
            gateway,
            config,
            state: MountState::Idle,
            current,
            target: None,
            tracking_rate,
            pier_side: PierSide::Unknown,
            guide: GuidePulseScheduler::new(),
            manual_ns: false,
            manual_we: false,
            simulator: MountSimulator::default(),
            elapsed: Duration::ZERO,
            time_override: None,
        }
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn position(&self) -> EquatorialCoordinate {
        self.current
    }

    pub fn target(&self) -> Option<EquatorialCoordinate> {
        self.target
    }

    pub fn tracking_rate(&self) -> TrackingRate {
        self.tracking_rate
    }

    pub fn pier_side(&self) -> PierSide {
        self.pier_side
    }

    /// Use a client-supplied UTC instant for all sidereal computations
    pub fn update_time(&mut self, utc: DateTime<Utc>) {
        debug!("Time updated to {}", utc);
        self.time_override = Some(utc);
    }

    /// Record which side of the pier the declination axis sits on
    pub fn set_pier_side(&mut self, side: PierSide) {
        debug!("Pier side is {}", side);
        self.pier_side = side;
    }

    /// Change the tracking rate; only ever done by explicit command
    pub fn set_tracking_rate(&mut self, rate: TrackingRate) {
        info!("Tracking rate set to {}", rate);
        self.tracking_rate = rate;
    }

    fn now(&self) -> DateTime<Utc> {
        self.time_override.unwrap_or_else(Utc::now)
    }

    fn manual_engaged(&self, pair: AxisPair) -> bool {
        match pair {
            AxisPair::NorthSouth => self.manual_ns,
            AxisPair::EastWest => self.manual_we,
        }
    }

    /// Published state: motion state, current equatorial position and,
    /// when a site is configured, the derived horizontal position
    pub fn current_state(
        &self,
    ) -> (
        MountState,
        EquatorialCoordinate,
        Option<HorizontalCoordinate>,
    ) {
        let hz = self
            .config
            .site
            .map(|site| equatorial_to_horizontal(self.current, site, self.now()));
        (self.state, self.current, hz)
    }

    /// Hour angle of the current position in [0, 24), if a site is set
    pub fn current_hour_angle(&self) -> Option<f64> {
        self.config
            .site
            .map(|site| hour_angle(self.current.ra_hours, site.longitude, self.now()))
    }

    /// Advance the state machine by one poll tick of length `dt`
    ///
    /// Guide pulse expiry is handled first and runs to completion, so
    /// the rest of the tick never sees a stale axis rate.
    pub async fn on_poll_tick(&mut self, dt: Duration) {
        self.elapsed += dt;

        for pulse in self.guide.take_due(self.elapsed) {
            if let Err(e) = self.drop_guide_rate(pulse.axis).await {
                warn!("Failed to stop {} guide motion: {}", pulse.axis, e);
            }
            debug!(
                "Guide pulse {} ({:?}) elapsed",
                pulse.axis, pulse.duration
            );
        }

        match self.state {
            MountState::Slewing => {
                self.advance_position(dt).await;
                if let Some(target) = self.target {
                    if within_tolerance(self.current, target, self.config.accuracy) {
                        self.target = None;
                        self.state = MountState::Tracking;
                        info!("Slew complete. Tracking...");
                    }
                }
            }
            MountState::Parking => match &self.gateway {
                Some(gateway) => {
                    if let Ok(pos) = gateway.read_position().await {
                        self.current = pos;
                    }
                    match gateway.is_slew_complete().await {
                        Ok(true) => self.finish_park(),
                        Ok(false) => {}
                        Err(e) => warn!("Park status read failed: {}", e),
                    }
                }
                None => {
                    if let Some(target) = self.target {
                        if self.simulator.tick_slewing(&mut self.current, target, dt) {
                            self.finish_park();
                        }
                    }
                }
            },
            MountState::Tracking => match &self.gateway {
                Some(gateway) => match gateway.read_position().await {
                    Ok(pos) => self.current = pos,
                    Err(e) => warn!("Position read failed: {}", e),
                },
                None => {
                    self.simulator
                        .tick_tracking(&mut self.current, self.tracking_rate, dt)
                }
            },
            MountState::Idle => {
                if let Some(gateway) = &self.gateway {
                    match gateway.read_position().await {
                        Ok(pos) => self.current = pos,
                        Err(e) => warn!("Position read failed: {}", e),
                    }
                }
            }
            MountState::Parked => {}
        }
    }

    async fn advance_position(&mut self, dt: Duration) {
        match &self.gateway {
            Some(gateway) => match gateway.read_position().await {
                Ok(pos) => self.current = pos,
                Err(e) => warn!("Position read failed: {}", e),
            },
            None => {
                if let Some(target) = self.target {
                    self.simulator.tick_slewing(&mut self.current, target, dt);
                }
            }
        }
    }

    fn finish_park(&mut self) {
        self.target = None;
        self.state = MountState::Parked;
        info!("Mount parked");
    }

    /// Command a slew to the given JNow coordinate
    ///
    /// Policy rejections (horizon limit, guide pulse in progress) happen
    /// before any gateway traffic. A goto issued while already slewing
    /// aborts the in-flight slew first.
    pub async fn request_goto(&mut self, ra_hours: f64, dec_degrees: f64) -> CommandOutcome {
        if self.state == MountState::Parked {
            return CommandOutcome::rejected("mount is parked");
        }
        if self.state == MountState::Parking {
            return CommandOutcome::Busy;
        }

        let target = EquatorialCoordinate::new(range24(ra_hours), dec_degrees);

        if let Some(site) = self.config.site {
            let hz = equatorial_to_horizontal(target, site, self.now());
            if hz.alt_degrees < self.config.horizon_limit_degrees {
                info!(
                    "Goto {} rejected: altitude {:.2} below horizon limit {:.2}",
                    target, hz.alt_degrees, self.config.horizon_limit_degrees
                );
                return CommandOutcome::rejected(format!(
                    "target altitude {:.2} is below the horizon limit {:.2}",
                    hz.alt_degrees, self.config.horizon_limit_degrees
                ));
            }
        }

        // A guide pulse holds the motion switch the slew needs.
        if self.guide.any_active() {
            return CommandOutcome::rejected("guide pulse in progress");
        }

        if self.state == MountState::Slewing {
            if let Some(gateway) = &self.gateway {
                if let Err(e) = gateway.send_abort().await {
                    return CommandOutcome::rejected(format!(
                        "failed to abort slew in progress: {}",
                        e
                    ));
                }
            }
            self.state = MountState::Idle;
            self.target = None;
            debug!("Slew in progress aborted before new goto");
        }

        // Manual motion is preempted by a slew.
        self.manual_ns = false;
        self.manual_we = false;

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.send_goto(target).await {
                warn!("Goto {} failed: {}", target, e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        self.target = Some(target);
        self.state = MountState::Slewing;
        info!("Slewing to {}", target);
        CommandOutcome::Accepted
    }

    /// Teach the mount its current pointing position; no motion
    pub async fn request_sync(&mut self, ra_hours: f64, dec_degrees: f64) -> CommandOutcome {
        if self.state == MountState::Parked {
            return CommandOutcome::rejected("mount is parked");
        }
        if matches!(self.state, MountState::Slewing | MountState::Parking) {
            return CommandOutcome::Busy;
        }

        let coord = EquatorialCoordinate::new(range24(ra_hours), dec_degrees);

        if let Some(site) = self.config.site {
            let ha = signed_hour_angle(coord.ra_hours, site.longitude, self.now());
            if !sync_allowed(self.config.variant, self.pier_side, ha) {
                info!(
                    "Sync to {} rejected: hour angle {:.3} on the wrong side for pier side {}",
                    coord, ha, self.pier_side
                );
                return CommandOutcome::rejected(
                    "sync target is on the wrong side of the meridian",
                );
            }
        }

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.send_sync(coord).await {
                warn!("Sync to {} failed: {}", coord, e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        self.current = coord;
        info!("Synced to {}", coord);
        CommandOutcome::Accepted
    }

    /// Move the mount to its configured park position
    pub async fn request_park(&mut self) -> CommandOutcome {
        if matches!(self.state, MountState::Parking | MountState::Parked) {
            return CommandOutcome::Busy;
        }

        // The park position is configured in Az/Alt; derive the
        // equatorial goal at park time.
        let target = match self.config.site {
            Some(site) => horizontal_to_equatorial(self.config.park_position, site, self.now()),
            None => self.current,
        };

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.send_park().await {
                warn!("Park failed: {}", e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        for pulse in self.guide.cancel_all() {
            if let Err(e) = self.drop_guide_rate(pulse.axis).await {
                warn!("Failed to stop {} guide motion: {}", pulse.axis, e);
            }
        }
        self.manual_ns = false;
        self.manual_we = false;

        self.target = Some(target);
        self.state = MountState::Parking;
        info!("Parking to {}...", target);
        CommandOutcome::Accepted
    }

    /// Release the mount from its park position
    pub async fn request_unpark(&mut self) -> CommandOutcome {
        if self.state != MountState::Parked {
            return CommandOutcome::rejected("mount is not parked");
        }

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.send_unpark().await {
                warn!("Unpark failed: {}", e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        self.state = MountState::Idle;
        info!("Mount unparked");
        CommandOutcome::Accepted
    }

    /// Cancel the in-flight slew and all guide pulses
    ///
    /// Synchronous from the caller's perspective: the state reads Idle
    /// before this returns, even if the hardware command is still
    /// draining.
    pub async fn request_abort(&mut self) -> CommandOutcome {
        if self.state == MountState::Parked {
            return CommandOutcome::rejected("mount is parked");
        }

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.send_abort().await {
                warn!("Abort failed: {}", e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        for pulse in self.guide.cancel_all() {
            if let Err(e) = self.drop_guide_rate(pulse.axis).await {
                warn!("Failed to stop {} guide motion: {}", pulse.axis, e);
            }
        }
        self.manual_ns = false;
        self.manual_we = false;

        self.target = None;
        self.state = MountState::Idle;
        info!("Motion aborted");
        CommandOutcome::Accepted
    }

    /// Issue a timed guide pulse on one axis
    ///
    /// Displaces whatever pulse is active on the axis pair; pulses never
    /// queue. Rejected while the pair's manual motion switch is engaged.
    pub async fn request_guide(&mut self, axis: Axis, duration: Duration) -> CommandOutcome {
        if self.state == MountState::Parked {
            return CommandOutcome::rejected("mount is parked");
        }

        let pair = axis.pair();
        if self.manual_engaged(pair) {
            return CommandOutcome::rejected(format!(
                "manual motion is active on the {:?} axis",
                pair
            ));
        }

        if let Some(old) = self.guide.cancel_pair(pair) {
            if let Err(e) = self.drop_guide_rate(old.axis).await {
                warn!("Failed to stop displaced {} pulse: {}", old.axis, e);
            }
            debug!("Guide pulse {} displaced by {}", old.axis, axis);
        }

        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.set_guide_rate(axis, true).await {
                warn!("Guide {} failed to start: {}", axis, e);
                return CommandOutcome::rejected(e.to_string());
            }
        }

        self.guide.schedule(axis, duration, self.elapsed);
        debug!("Guiding {} for {:?}", axis, duration);
        CommandOutcome::Accepted
    }

    /// Engage a manual motion switch
    ///
    /// Manual motion and guide pulses on the same axis pair are mutually
    /// exclusive; the vendor motion command itself is the presentation
    /// layer's business.
    pub fn start_manual_motion(&mut self, axis: Axis) -> CommandOutcome {
        if self.state == MountState::Parked {
            return CommandOutcome::rejected("mount is parked");
        }
        if self.guide.active(axis.pair()).is_some() {
            return CommandOutcome::rejected(format!(
                "guide pulse in progress on the {:?} axis",
                axis.pair()
            ));
        }
        match axis.pair() {
            AxisPair::NorthSouth => self.manual_ns = true,
            AxisPair::EastWest => self.manual_we = true,
        }
        CommandOutcome::Accepted
    }

    /// Release a manual motion switch
    pub fn stop_manual_motion(&mut self, axis: Axis) -> CommandOutcome {
        match axis.pair() {
            AxisPair::NorthSouth => self.manual_ns = false,
            AxisPair::EastWest => self.manual_we = false,
        }
        CommandOutcome::Accepted
    }

    async fn drop_guide_rate(&self, axis: Axis) -> crate::GatewayResult<()> {
        match &self.gateway {
            Some(gateway) => gateway.set_guide_rate(axis, false).await,
            None => Ok(()),
        }
    }
}

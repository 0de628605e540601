//! Mount protocol gateway trait
//!
//! The seam between the motion state machine and the vendor protocol
//! plumbing. A real implementation formats LX200-style commands over a
//! serial or TCP link; tests supply scripted doubles. Calls are expected
//! to return quickly or fail fast with a timeout, never to suspend the
//! poll loop.

use async_trait::async_trait;
use meridian_astro::EquatorialCoordinate;

use crate::error::GatewayResult;
use crate::guide::Axis;

/// Operations the state machine needs from a mount protocol handler
#[async_trait]
pub trait MountGateway: Send + Sync {
    /// Read the current pointing position from the mount
    async fn read_position(&self) -> GatewayResult<EquatorialCoordinate>;

    /// Command a slew to the given target
    async fn send_goto(&self, target: EquatorialCoordinate) -> GatewayResult<()>;

    /// Sync the mount's internal position to the given coordinate
    async fn send_sync(&self, coord: EquatorialCoordinate) -> GatewayResult<()>;

    /// Command the mount to its park position
    async fn send_park(&self) -> GatewayResult<()>;

    /// Release the mount from its park position
    async fn send_unpark(&self) -> GatewayResult<()>;

    /// Cancel any motion in progress
    async fn send_abort(&self) -> GatewayResult<()>;

    /// Start or stop guide-rate motion on one axis
    async fn set_guide_rate(&self, axis: Axis, active: bool) -> GatewayResult<()>;

    /// Whether the mount reports its last slew as finished
    async fn is_slew_complete(&self) -> GatewayResult<bool>;
}

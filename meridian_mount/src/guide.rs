//! Guide pulse scheduling
//!
//! Short, timed motion corrections on the four cardinal axes. North and
//! south share one exclusion group, east and west the other: issuing a
//! pulse on a pair displaces whatever pulse is active there, whether on
//! the same axis or the opposite one. Pulses never queue.
//!
//! Deadlines are expressed on the controller's monotonic timeline (the
//! accumulated poll time), so expiry is processed deterministically at
//! the top of each tick rather than from a detached timer callback.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A guide axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    North,
    South,
    East,
    West,
}

impl Axis {
    /// The exclusion group this axis belongs to
    pub fn pair(self) -> AxisPair {
        match self {
            Axis::North | Axis::South => AxisPair::NorthSouth,
            Axis::East | Axis::West => AxisPair::EastWest,
        }
    }

    /// The opposite member of the exclusion group
    pub fn opposite(self) -> Axis {
        match self {
            Axis::North => Axis::South,
            Axis::South => Axis::North,
            Axis::East => Axis::West,
            Axis::West => Axis::East,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::North => write!(f, "North"),
            Axis::South => write!(f, "South"),
            Axis::East => write!(f, "East"),
            Axis::West => write!(f, "West"),
        }
    }
}

/// Guide axis exclusion group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPair {
    NorthSouth,
    EastWest,
}

/// A scheduled guide pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidePulse {
    pub axis: Axis,
    pub duration: Duration,
    /// Timeline instant the pulse was issued at
    pub issued_at: Duration,
    /// Timeline instant the pulse elapses at
    pub deadline: Duration,
}

/// At most one active pulse per exclusion group
#[derive(Debug, Default)]
pub struct GuidePulseScheduler {
    ns: Option<GuidePulse>,
    we: Option<GuidePulse>,
}

impl GuidePulseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active pulse on a pair, if any
    pub fn active(&self, pair: AxisPair) -> Option<&GuidePulse> {
        match pair {
            AxisPair::NorthSouth => self.ns.as_ref(),
            AxisPair::EastWest => self.we.as_ref(),
        }
    }

    /// Whether any pulse is active on either pair
    pub fn any_active(&self) -> bool {
        self.ns.is_some() || self.we.is_some()
    }

    /// Schedule a pulse, displacing the pair's active pulse if present
    ///
    /// Returns the displaced pulse so the caller can stop its motion
    /// before starting the new one.
    pub fn schedule(&mut self, axis: Axis, duration: Duration, now: Duration) -> Option<GuidePulse> {
        let pulse = GuidePulse {
            axis,
            duration,
            issued_at: now,
            deadline: now + duration,
        };
        match axis.pair() {
            AxisPair::NorthSouth => self.ns.replace(pulse),
            AxisPair::EastWest => self.we.replace(pulse),
        }
    }

    /// Retire every pulse whose deadline has passed
    pub fn take_due(&mut self, now: Duration) -> Vec<GuidePulse> {
        let mut due = Vec::new();
        if self.ns.map_or(false, |p| p.deadline <= now) {
            due.push(self.ns.take().unwrap());
        }
        if self.we.map_or(false, |p| p.deadline <= now) {
            due.push(self.we.take().unwrap());
        }
        due
    }

    /// Cancel the active pulse on one pair, if any
    pub fn cancel_pair(&mut self, pair: AxisPair) -> Option<GuidePulse> {
        match pair {
            AxisPair::NorthSouth => self.ns.take(),
            AxisPair::EastWest => self.we.take(),
        }
    }

    /// Cancel and return every active pulse
    pub fn cancel_all(&mut self) -> Vec<GuidePulse> {
        self.ns.take().into_iter().chain(self.we.take()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_axis_pairs() {
        assert_eq!(Axis::North.pair(), AxisPair::NorthSouth);
        assert_eq!(Axis::South.pair(), AxisPair::NorthSouth);
        assert_eq!(Axis::East.pair(), AxisPair::EastWest);
        assert_eq!(Axis::West.pair(), AxisPair::EastWest);
        assert_eq!(Axis::North.opposite(), Axis::South);
        assert_eq!(Axis::West.opposite(), Axis::East);
    }

    #[test]
    fn test_opposite_pulse_is_displaced() {
        let mut sched = GuidePulseScheduler::new();
        assert!(sched.schedule(Axis::North, ms(500), ms(0)).is_none());

        let displaced = sched.schedule(Axis::South, ms(300), ms(0)).unwrap();
        assert_eq!(displaced.axis, Axis::North);

        // Only the south pulse remains; it expires at 300ms.
        assert!(sched.take_due(ms(299)).is_empty());
        let due = sched.take_due(ms(300));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].axis, Axis::South);

        // The original 500ms deadline fires nothing: the north pulse is
        // long gone.
        assert!(sched.take_due(ms(500)).is_empty());
        assert!(!sched.any_active());
    }

    #[test]
    fn test_same_axis_pulse_is_replaced_not_queued() {
        let mut sched = GuidePulseScheduler::new();
        sched.schedule(Axis::West, ms(1000), ms(0));
        let displaced = sched.schedule(Axis::West, ms(200), ms(100)).unwrap();
        assert_eq!(displaced.axis, Axis::West);
        assert_eq!(displaced.duration, ms(1000));

        let due = sched.take_due(ms(300));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].issued_at, ms(100));
        assert!(!sched.any_active());
    }

    #[test]
    fn test_pairs_are_independent() {
        let mut sched = GuidePulseScheduler::new();
        sched.schedule(Axis::North, ms(400), ms(0));
        assert!(sched.schedule(Axis::East, ms(600), ms(0)).is_none());

        let due = sched.take_due(ms(400));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].axis, Axis::North);
        assert!(sched.active(AxisPair::EastWest).is_some());
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = GuidePulseScheduler::new();
        sched.schedule(Axis::South, ms(400), ms(0));
        sched.schedule(Axis::West, ms(400), ms(0));
        let cancelled = sched.cancel_all();
        assert_eq!(cancelled.len(), 2);
        assert!(!sched.any_active());
        assert!(sched.take_due(ms(1000)).is_empty());
    }
}

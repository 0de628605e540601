//! Mount protocol variants and variant-specific guards
//!
//! The variant is selected once at connect time and stays fixed; the
//! guards here are the only places behavior forks on it.

use serde::{Deserialize, Serialize};

/// Closed set of supported protocol dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountVariant {
    /// Plain LX200-compatible mount
    Generic,
    /// Astro-Physics GTO controllers, which add meridian-side safety
    /// rules around sync
    AstroPhysics,
}

/// Which side of the pier the declination axis currently sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PierSide {
    East,
    West,
    Unknown,
}

impl std::fmt::Display for PierSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PierSide::East => write!(f, "East"),
            PierSide::West => write!(f, "West"),
            PierSide::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Meridian-side sync guard
///
/// On an Astro-Physics mount, syncing to a coordinate on the opposite
/// meridian side from the declination axis would teach the controller a
/// flipped orientation, so it is refused. With the scope on the east
/// side of the pier it points at the western sky (hour angle >= 0), and
/// vice versa. `signed_ha` is in [-12, 12); an unknown pier side or a
/// generic mount never blocks the sync.
///
/// This is a safety rule, deliberately separate from the slew tolerance
/// predicate.
pub fn sync_allowed(variant: MountVariant, pier_side: PierSide, signed_ha: f64) -> bool {
    if variant != MountVariant::AstroPhysics {
        return true;
    }
    match pier_side {
        PierSide::East => signed_ha >= 0.0,
        PierSide::West => signed_ha <= 0.0,
        PierSide::Unknown => true,
    }
}

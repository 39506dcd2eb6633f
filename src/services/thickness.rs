//! Thickness values visited by the sweep.

use crate::models::Thickness;

/// First thickness tested, in micrometers
pub const SWEEP_START_UM: u32 = 50;

/// Increment between consecutive thicknesses, in micrometers
pub const SWEEP_STEP_UM: u32 = 50;

/// Exclusive upper bound, in micrometers
pub const SWEEP_END_UM: u32 = 1050;

/// The sweep: 50, 100, ..., 1000 μm in ascending order.
pub fn thickness_sweep() -> impl Iterator<Item = Thickness> {
    (SWEEP_START_UM..SWEEP_END_UM)
        .step_by(SWEEP_STEP_UM as usize)
        .map(Thickness::from_micrometers)
}

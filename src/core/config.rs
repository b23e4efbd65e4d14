//! Configuration for sync behavior tuning
//!
//! All tunables of the engine live here so that long-lived controller state
//! is constructed from one place.

use crate::core::geo::COVERAGE_TOLERANCE_DEG;
use std::time::Duration;

/// Tunable options for the sync engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Minimum idle time after the last viewport-change event before a
    /// settle fires.
    pub quiescence_window: Duration,
    /// Maximum number of listings requested per viewport fetch.
    pub page_limit: u32,
    /// Edge tolerance in degrees for the region-coverage equivalence test.
    pub coverage_tolerance_deg: f64,
    /// Number of listings shown in the constrained card panel
    /// (lowest-priced prefix).
    pub card_panel_size: usize,
    /// When true, a settle on an uncovered, non-equivalent bounds clears the
    /// exhausted flag. When false, exhaustion is global and sticks until a
    /// full reset.
    pub reset_exhaustion_on_new_region: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            quiescence_window: Duration::from_millis(500),
            page_limit: 50,
            coverage_tolerance_deg: COVERAGE_TOLERANCE_DEG,
            card_panel_size: 4,
            reset_exhaustion_on_new_region: true,
        }
    }
}

impl SyncOptions {
    /// Options tuned for tests: no quiescence delay.
    pub fn immediate() -> Self {
        Self {
            quiescence_window: Duration::from_millis(0),
            ..Default::default()
        }
    }
}

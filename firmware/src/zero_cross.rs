use core::sync::atomic::{AtomicU32, Ordering};

use crate::constants::{ACCEPTABLE_ZC_FREQ_RANGES, MAINS_TIMEOUT_MS};

/// Converts a measured zero crossing frequency into the half-cycle period in
/// microseconds.
///
/// The measurement is snapped to the nominal frequency of the range it falls
/// in. `None` means the crossing doesn't look like mains (noise, a missed
/// edge, no measurement yet) and the half-cycle should not be fired on
pub fn half_cycle_us(zc_freq_hz: u16) -> Option<u32> {
    ACCEPTABLE_ZC_FREQ_RANGES
        .iter()
        .find(|(range, _)| range.contains(&zc_freq_hz))
        .map(|(_, nominal)| 1_000_000 / u32::from(*nominal))
}

/// Keeps track of zero crossings so the main loop can tell if mains is present.
/// Written from the zero crossing interrupt only
pub struct LineMonitor {
    last_seen_ms: AtomicU32,
    count: AtomicU32,
}

impl LineMonitor {
    /// A monitor that hasn't seen any crossings
    pub const fn new() -> Self {
        Self {
            last_seen_ms: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Records a zero crossing at `now_ms`
    pub fn record(&self, now_ms: u32) {
        self.last_seen_ms.store(now_ms, Ordering::Relaxed);
        let count = self.count.load(Ordering::Relaxed);
        self.count.store(count.wrapping_add(1), Ordering::Release);
    }

    /// Total crossings seen since boot
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// True if a crossing arrived within the last `MAINS_TIMEOUT_MS`.
    ///
    /// The interrupt can record a crossing after the caller sampled `now_ms`,
    /// so a timestamp slightly ahead of `now_ms` counts as present
    pub fn mains_present(&self, now_ms: u32) -> bool {
        if self.count() == 0 {
            return false;
        }
        let last = self.last_seen_ms.load(Ordering::Relaxed);
        (now_ms.wrapping_sub(last) as i32) < MAINS_TIMEOUT_MS as i32
    }
}

impl Default for LineMonitor {
    fn default() -> Self {
        Self::new()
    }
}

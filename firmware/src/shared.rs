//! State shared between the main loop and the zero crossing interrupt.
//!
//! The interrupt preempts the main loop at any instruction so everything here
//! is a lock free atomic. The main loop is the only writer of
//! [`SharedFiring`], the interrupt is the only writer of the clock and the
//! line monitor.
//!
//! Ordering: the delay is always stored before the armed flag and loaded
//! after it, both with release/acquire, so an interrupt that sees the flag
//! set also sees the delay that was published with it.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::firing::FiringParameters;

/// The firing delay and the weld active flag
pub struct SharedFiring {
    firing_delay_us: AtomicU32,
    active: AtomicBool,
}

impl SharedFiring {
    /// Creates a disarmed cell with the longest delay
    pub const fn new() -> Self {
        Self {
            firing_delay_us: AtomicU32::new(crate::constants::FIRING_DELAY_MAX_US),
            active: AtomicBool::new(false),
        }
    }

    /// Makes new firing parameters visible to the interrupt. They take effect
    /// from the next zero crossing
    pub fn publish(&self, params: FiringParameters) {
        self.firing_delay_us.store(params.firing_delay_us, Ordering::Release);
    }

    /// Lets the interrupt fire. Call after `publish`
    pub fn arm(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Stops the interrupt from scheduling any further firings
    pub fn disarm(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Whether the interrupt is allowed to fire
    pub fn is_armed(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Loads the firing parameters. Only meaningful after `is_armed` returned true
    pub fn firing(&self) -> FiringParameters {
        FiringParameters {
            firing_delay_us: self.firing_delay_us.load(Ordering::Acquire),
        }
    }
}

impl Default for SharedFiring {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond counter ticked from an interrupt. Wraps after ~49 days,
/// compare timestamps with `wrapping_sub`
pub struct MillisClock(AtomicU32);

impl MillisClock {
    /// A clock starting at 0
    pub const fn new() -> Self {
        MillisClock(AtomicU32::new(0))
    }

    /// Advances the clock by one millisecond
    pub fn tick(&self) {
        let now = self.0.load(Ordering::Relaxed);
        self.0.store(now.wrapping_add(1), Ordering::Relaxed);
    }

    /// Milliseconds since boot
    pub fn now(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for MillisClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disarmed() {
        let shared = SharedFiring::new();
        assert!(!shared.is_armed());
    }

    #[test]
    fn publish_then_arm() {
        let shared = SharedFiring::new();
        shared.publish(FiringParameters { firing_delay_us: 1234 });
        shared.arm();
        assert!(shared.is_armed());
        assert_eq!(shared.firing().firing_delay_us, 1234);
        shared.disarm();
        assert!(!shared.is_armed());
    }

    #[test]
    fn clock_wraps() {
        let clock = MillisClock(AtomicU32::new(u32::MAX));
        clock.tick();
        assert_eq!(clock.now(), 0);
        clock.tick();
        assert_eq!(clock.now(), 1);
    }
}

use crate::constants::*;

/// What the zero crossing interrupt needs to know to fire the triac
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiringParameters {
    /// Time from the zero crossing to the start of the trigger pulse
    pub firing_delay_us: u32,
}

impl FiringParameters {
    /// Firing parameters for the given power setting
    pub fn for_power(power_percent: u8) -> Self {
        Self {
            firing_delay_us: compute_firing(power_percent),
        }
    }
}

/// Maps the power setting onto a firing delay.
///
/// 100% fires right at the zero crossing, 10% fires `FIRING_DELAY_MAX_US` in.
/// Linear in between. Settings outside 10-100 are clamped first
pub fn compute_firing(power_percent: u8) -> u32 {
    let power = power_percent.max(POWER_PERCENT_MIN).min(POWER_PERCENT_MAX);
    let span = u32::from(POWER_PERCENT_MAX - POWER_PERCENT_MIN);
    u32::from(POWER_PERCENT_MAX - power) * FIRING_DELAY_MAX_US / span
}

/// One scheduled trigger pulse, relative to the zero crossing that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiringPulse {
    /// Time from the zero crossing until the gate is driven
    pub delay_us: u32,
    /// How long the gate is driven for
    pub width_us: u32,
}

impl FiringPulse {
    /// Builds the pulse for `delay_us`, pulling the delay in so the pulse
    /// plus `FIRING_MARGIN_US` finishes before the next zero crossing.
    /// `None` if the half-cycle is too short to fit a pulse and the margin at all
    pub fn within_half_cycle(delay_us: u32, half_cycle_us: u32) -> Option<Self> {
        let latest = half_cycle_us.checked_sub(TRIGGER_PULSE_US + FIRING_MARGIN_US)?;
        Some(Self {
            delay_us: delay_us.min(latest),
            width_us: TRIGGER_PULSE_US,
        })
    }

    /// Time from the zero crossing until the gate is released
    pub fn end_us(&self) -> u32 {
        self.delay_us + self.width_us
    }
}

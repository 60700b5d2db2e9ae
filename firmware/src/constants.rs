use core::ops::RangeInclusive;

/// Maximum value the ADC can return for a potentiometer sample
pub const ADC_RAW_MAX: u16 = 4095;

/// Smallest weld time setting
pub const TIME_LEVEL_MIN: u8 = 1;
/// Largest weld time setting
pub const TIME_LEVEL_MAX: u8 = 50;

/// Smallest weld power setting in percent
pub const POWER_PERCENT_MIN: u8 = 10;
/// Largest weld power setting in percent
pub const POWER_PERCENT_MAX: u8 = 100;

/// Weld duration for each step of the time setting.
/// One full cycle at 50Hz mains
pub const MS_PER_TIME_LEVEL: u32 = 20;

/// Firing delay at minimum power
pub const FIRING_DELAY_MAX_US: u32 = 8_500;

/// How long the triac gate is driven for on each firing. Long enough to latch
/// the triac, short enough to not waste gate current
pub const TRIGGER_PULSE_US: u32 = 20;

/// Space left between the end of the trigger pulse and the next zero crossing
pub const FIRING_MARGIN_US: u32 = 250;

/// Minimum time between the end of a weld and the start of the next one
pub const DEBOUNCE_MS: u32 = 500;

/// If no zero crossing has been seen for this long mains is considered absent
pub const MAINS_TIMEOUT_MS: u32 = 50;

/// These ranges specify the min, max and actual zero crossing frequencies
/// (twice the mains frequency).
///
/// Mains frequency is generally very stable in most countries
/// so if we're reading outside these values there is likely something
/// wrong with our hardware or the crossing was noise. A crossing
/// measured outside of all of these ranges is not fired on.
/// The actual frequency is provided so the half-cycle period is exact.
pub const ACCEPTABLE_ZC_FREQ_RANGES: [(RangeInclusive<u16>, u16); 2] = [
    (98..=102, 100),
    (118..=122, 120),
];

//! Property tests for the settings and firing arithmetic.
//!
//! Host only, the firmware target has no proptest.

use proptest::prelude::*;
use spot_welder::{
    constants::*,
    firing::{compute_firing, FiringPulse},
    settings::{scale_raw, WeldSettings},
    shared::MillisClock,
    ui::{digits, presenter::display_value},
    zero_cross::half_cycle_us,
};

// ── Settings ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn raw_samples_always_land_in_range(time_raw in any::<u16>(), power_raw in any::<u16>()) {
        let s = WeldSettings::from_raw(time_raw, power_raw);
        prop_assert!((TIME_LEVEL_MIN..=TIME_LEVEL_MAX).contains(&s.time_level));
        prop_assert!((POWER_PERCENT_MIN..=POWER_PERCENT_MAX).contains(&s.power_percent));
    }

    #[test]
    fn scaling_never_decreases(a in 0u16..=ADC_RAW_MAX, b in 0u16..=ADC_RAW_MAX) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scale_raw(lo, 10, 100) <= scale_raw(hi, 10, 100));
    }

    #[test]
    fn duration_within_bounds(level in any::<u8>()) {
        let ms = WeldSettings { time_level: level, power_percent: 50 }.duration_ms();
        prop_assert!((20..=1000).contains(&ms));
        prop_assert_eq!(ms % MS_PER_TIME_LEVEL, 0);
    }
}

// ── Firing ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn delay_bounded_and_monotonic(p in any::<u8>(), q in any::<u8>()) {
        prop_assert!(compute_firing(p) <= FIRING_DELAY_MAX_US);
        if p <= q {
            prop_assert!(compute_firing(p) >= compute_firing(q));
        }
    }

    #[test]
    fn pulse_always_ends_before_next_crossing(
        delay in 0u32..=20_000,
        freq in prop_oneof![98u16..=102, 118u16..=122],
    ) {
        let half_cycle = half_cycle_us(freq).unwrap();
        let pulse = FiringPulse::within_half_cycle(delay, half_cycle).unwrap();
        prop_assert!(pulse.delay_us <= delay);
        prop_assert!(pulse.end_us() + FIRING_MARGIN_US <= half_cycle);
        prop_assert_eq!(pulse.width_us, TRIGGER_PULSE_US);
    }

    #[test]
    fn out_of_range_frequencies_are_rejected(freq in any::<u16>()) {
        let accepted = ACCEPTABLE_ZC_FREQ_RANGES.iter().any(|(r, _)| r.contains(&freq));
        prop_assert_eq!(half_cycle_us(freq).is_some(), accepted);
    }
}

// ── Display and clock ────────────────────────────────────────

proptest! {
    #[test]
    fn settings_always_fit_the_display(level in 1u8..=50, power in 10u8..=100) {
        let value = display_value(&WeldSettings { time_level: level, power_percent: power });
        prop_assert!(digits(value).is_some());
        prop_assert_eq!(value, u32::from(level) * 100 + u32::from(power));
    }

    #[test]
    fn clock_counts_ticks(ticks in 0u32..5_000) {
        let clock = MillisClock::new();
        for _ in 0..ticks {
            clock.tick();
        }
        prop_assert_eq!(clock.now(), ticks);
    }
}

use crate::constants::*;

/// The operator's weld settings, sampled from the two potentiometers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldSettings {
    /// Weld length in 20ms steps, 1 to 50
    pub time_level: u8,
    /// Fraction of each half-cycle delivered, 10 to 100
    pub power_percent: u8,
}

impl Default for WeldSettings {
    /// The gentlest possible weld
    fn default() -> Self {
        Self {
            time_level: TIME_LEVEL_MIN,
            power_percent: POWER_PERCENT_MIN,
        }
    }
}

impl WeldSettings {
    /// Builds settings from the raw ADC samples of the time and power potentiometers
    pub fn from_raw(time_raw: u16, power_raw: u16) -> Self {
        Self {
            time_level: scale_raw(time_raw, TIME_LEVEL_MIN, TIME_LEVEL_MAX),
            power_percent: scale_raw(power_raw, POWER_PERCENT_MIN, POWER_PERCENT_MAX),
        }
    }

    /// How long a session with these settings stays armed
    pub fn duration_ms(&self) -> u32 {
        let level = self.time_level.max(TIME_LEVEL_MIN).min(TIME_LEVEL_MAX);
        u32::from(level) * MS_PER_TIME_LEVEL
    }
}

/// Linearly maps a raw sample in `0..=ADC_RAW_MAX` onto `min..=max`.
/// Samples above `ADC_RAW_MAX` are treated as full scale
pub fn scale_raw(raw: u16, min: u8, max: u8) -> u8 {
    let raw = u32::from(raw.min(ADC_RAW_MAX));
    let span = u32::from(max - min);
    (u32::from(min) + raw * span / u32::from(ADC_RAW_MAX)) as u8
}

/// Source of the two potentiometer samples. Implemented by the board's ADC
/// and by test fixtures
pub trait SettingsInput {
    /// Reads the time and power potentiometers, in that order
    fn read_raw(&mut self) -> (u16, u16);
}

impl<I: SettingsInput + ?Sized> SettingsInput for &mut I {
    fn read_raw(&mut self) -> (u16, u16) {
        (**self).read_raw()
    }
}

/// Samples the operator controls once per main loop iteration.
/// Holds no state between scans
pub struct InputScanner<I> {
    input: I,
}

impl<I: SettingsInput> InputScanner<I> {
    /// Wraps an input source
    pub fn new(input: I) -> Self {
        Self { input }
    }

    /// Takes a fresh sample of both potentiometers
    pub fn scan(&mut self) -> WeldSettings {
        let (time_raw, power_raw) = self.input.read_raw();
        WeldSettings::from_raw(time_raw, power_raw)
    }

    /// Gives the input source back
    pub fn free(self) -> I {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16, u16);

    impl SettingsInput for Fixed {
        fn read_raw(&mut self) -> (u16, u16) {
            (self.0, self.1)
        }
    }

    #[test]
    fn raw_endpoints_map_to_range_endpoints() {
        assert_eq!(WeldSettings::from_raw(0, 0), WeldSettings { time_level: 1, power_percent: 10 });
        assert_eq!(
            WeldSettings::from_raw(ADC_RAW_MAX, ADC_RAW_MAX),
            WeldSettings { time_level: 50, power_percent: 100 },
        );
    }

    #[test]
    fn over_range_samples_are_clamped() {
        let s = WeldSettings::from_raw(u16::MAX, 9000);
        assert_eq!(s.time_level, TIME_LEVEL_MAX);
        assert_eq!(s.power_percent, POWER_PERCENT_MAX);
    }

    #[test]
    fn mid_scale() {
        // 2048 * 90 / 4095 = 45
        assert_eq!(scale_raw(2048, 10, 100), 55);
        assert_eq!(scale_raw(2048, 1, 50), 25);
    }

    #[test]
    fn duration_is_twenty_ms_per_level() {
        for level in TIME_LEVEL_MIN..=TIME_LEVEL_MAX {
            let s = WeldSettings { time_level: level, power_percent: 50 };
            assert_eq!(s.duration_ms(), u32::from(level) * 20);
        }
        assert_eq!(WeldSettings { time_level: 1, power_percent: 10 }.duration_ms(), 20);
        assert_eq!(WeldSettings { time_level: 50, power_percent: 10 }.duration_ms(), 1000);
    }

    #[test]
    fn scanner_samples_every_call() {
        let mut scanner = InputScanner::new(Fixed(0, ADC_RAW_MAX));
        assert_eq!(scanner.scan(), WeldSettings { time_level: 1, power_percent: 100 });
        let mut input = scanner.free();
        input.0 = ADC_RAW_MAX;
        let mut scanner = InputScanner::new(input);
        assert_eq!(scanner.scan().time_level, 50);
    }
}

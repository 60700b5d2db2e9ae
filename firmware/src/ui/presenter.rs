use ascii::AsciiChar;
use adafruit_alphanum4::{
    AlphaNum4,
    Error as AlphaNumError,
};

use crate::{
    settings::WeldSettings,
    ui::{
        Displayable,
        Message,
        Number,
    },
};

/// Shown instead of the settings while no zero crossings are arriving
pub const MESSAGE_NO_MAINS: Message = [
    AsciiChar::new('N'),
    AsciiChar::new('O'),
    AsciiChar::new('A'),
    AsciiChar::new('C'),
];

/// The point between the time and power digits, standing in for a colon
const SEPARATOR_INDEX: u8 = 1;

/// Combines both settings into one number, time in the hundreds
pub fn display_value(settings: &WeldSettings) -> u32 {
    u32::from(settings.time_level) * 100 + u32::from(settings.power_percent)
}

/// Everything the display can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readout {
    /// The current weld settings
    Settings(Number),
    /// A status message
    Message(Message),
}

impl Readout {
    /// Picks the readout for the current settings and mains state
    pub fn for_settings(settings: &WeldSettings, mains_present: bool) -> Self {
        if mains_present {
            Readout::Settings(Number {
                value: display_value(settings),
                dot: Some(SEPARATOR_INDEX),
            })
        } else {
            Readout::Message(MESSAGE_NO_MAINS)
        }
    }
}

/// Keeps the display in sync with the settings without rewriting it every loop
pub struct DisplayPresenter {
    shown: Option<Readout>,
}

impl DisplayPresenter {
    /// A presenter that hasn't drawn anything yet
    pub const fn new() -> Self {
        Self { shown: None }
    }

    /// Whether `readout` differs from what is in the display buffer
    pub fn needs_update(&self, readout: &Readout) -> bool {
        self.shown.as_ref() != Some(readout)
    }

    /// Records `readout` as the one on the display. Returns false if it
    /// already was. Whether or not the draw that follows succeeds, the same
    /// readout isn't drawn again until it changes
    pub fn claim(&mut self, readout: Readout) -> bool {
        if !self.needs_update(&readout) {
            return false;
        }
        self.shown = Some(readout);
        true
    }

    /// Updates the display buffer if `readout` changed. Returns true if the
    /// buffer was changed and needs writing out to the display
    pub fn show<D, T>(&mut self, display: &mut D, readout: Readout) -> Result<bool, AlphaNumError>
    where
        D: AlphaNum4<T>,
    {
        if !self.claim(readout) {
            return Ok(false);
        }

        match &readout {
            Readout::Settings(n) => n.display(display)?,
            Readout::Message(m) => m.display(display)?,
        }

        Ok(true)
    }
}

impl Default for DisplayPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_in_hundreds_power_in_units() {
        assert_eq!(display_value(&WeldSettings { time_level: 5, power_percent: 80 }), 580);
        assert_eq!(display_value(&WeldSettings { time_level: 50, power_percent: 10 }), 5010);
        assert_eq!(display_value(&WeldSettings { time_level: 1, power_percent: 10 }), 110);
    }

    #[test]
    fn largest_value_fits_four_digits() {
        let max = WeldSettings { time_level: 50, power_percent: 100 };
        assert_eq!(display_value(&max), 5100);
        assert!(crate::ui::digits(display_value(&max)).is_some());
    }

    #[test]
    fn settings_readout_has_separator() {
        let s = WeldSettings { time_level: 12, power_percent: 34 };
        assert_eq!(
            Readout::for_settings(&s, true),
            Readout::Settings(Number { value: 1234, dot: Some(1) }),
        );
    }

    #[test]
    fn no_mains_message() {
        let s = WeldSettings::default();
        assert_eq!(Readout::for_settings(&s, false), Readout::Message(MESSAGE_NO_MAINS));
    }

    #[test]
    fn unchanged_readout_is_not_redrawn() {
        let mut p = DisplayPresenter::new();
        let r = Readout::for_settings(&WeldSettings::default(), true);
        assert!(p.needs_update(&r));
        assert!(p.claim(r));
        assert!(!p.needs_update(&r));
        assert!(p.needs_update(&Readout::Message(MESSAGE_NO_MAINS)));
    }

    #[test]
    fn same_readout_is_attempted_once_until_it_changes() {
        let mut p = DisplayPresenter::new();
        let r = Readout::for_settings(&WeldSettings::default(), true);
        // Every loop pass asks again, as it would with the display unplugged
        let attempts = (0..5).filter(|_| p.claim(r)).count();
        assert_eq!(attempts, 1);

        let other = Readout::for_settings(&WeldSettings { time_level: 2, power_percent: 10 }, true);
        assert!(p.claim(other));
        assert!(p.claim(r));
    }
}

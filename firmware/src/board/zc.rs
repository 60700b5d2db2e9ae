use stm32f1xx_hal::rcc::Clocks;
use super::aliases::{Zc, ZcTim};

#[cfg(feature = "dummy_zc")]
use {
    stm32f1xx_hal::timer::Event,
    super::constants::DUMMY_FREQ,
};
#[cfg(not(feature = "dummy_zc"))]
use stm32f1xx_hal::pwm_input::ReadMode;

/// The zero crossing input as used by the interrupt handler
pub trait ZeroCrossInput {
    /// Enable the interrupt that fires on every rising zero crossing edge
    fn listen(&mut self);
    /// Clear the interrupt associated with `Self`
    fn clear_interrupt(&mut self);
    /// The zero crossing frequency measured over the last period, 0 if there
    /// is no valid measurement
    fn frequency(&self, clocks: &Clocks) -> u16;
}

impl ZeroCrossInput for Zc {
    fn listen(&mut self) {
        #[cfg(feature = "dummy_zc")]
        {
            Zc::listen(self, Event::Update);
        }
        #[cfg(not(feature = "dummy_zc"))]
        unsafe {
            // Capture 1 is the rising edge, capture 2 (falling) isn't needed
            (*ZcTim::ptr()).dier.modify(|_, w| w
                .cc1ie().set_bit()
            );
        }
    }

    fn clear_interrupt(&mut self) {
        #[cfg(feature = "dummy_zc")]
        unsafe {
            (*ZcTim::ptr()).sr.modify(|_, w| w
                .uif().clear_bit()
            );
        }
        #[cfg(not(feature = "dummy_zc"))]
        unsafe {
            (*ZcTim::ptr()).sr.modify(|_, w| w
                .cc1if().clear_bit()
                .cc2if().clear_bit()
            );
        }
    }

    #[cfg_attr(feature = "dummy_zc", allow(unused_variables))]
    fn frequency(&self, clocks: &Clocks) -> u16 {
        #[cfg(feature = "dummy_zc")]
        {
            DUMMY_FREQ.0 as u16
        }
        #[cfg(not(feature = "dummy_zc"))]
        {
            self.read_frequency(ReadMode::Instant, clocks)
                .map(|f| f.0.min(u32::from(u16::MAX)) as u16)
                .unwrap_or(0)
        }
    }
}

use embedded_hal::adc::OneShot;
use nb::block;
use stm32f1xx_hal::{
    adc::Adc,
    pac::ADC1,
};
use crate::settings::SettingsInput;
use super::aliases::{PotPower, PotTime};

/// The two weld setting potentiometers sharing ADC1
pub struct Potentiometers {
    adc: Adc<ADC1>,
    time: PotTime,
    power: PotPower,
}

impl Potentiometers {
    /// Groups the adc and both wiper pins
    pub fn new(adc: Adc<ADC1>, time: PotTime, power: PotPower) -> Self {
        Self { adc, time, power }
    }
}

/// A failed conversion reads as 0, the shortest and weakest weld
fn sample<PIN>(adc: &mut Adc<ADC1>, pin: &mut PIN) -> u16
where
    Adc<ADC1>: OneShot<ADC1, u16, PIN>,
{
    block!(adc.read(pin)).unwrap_or(0)
}

impl SettingsInput for Potentiometers {
    fn read_raw(&mut self) -> (u16, u16) {
        let time = sample(&mut self.adc, &mut self.time);
        let power = sample(&mut self.adc, &mut self.power);
        (time, power)
    }
}

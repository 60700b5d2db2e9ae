use itm_logger::*;
use crate::{
    actuator::TriacGate,
    firing::FiringPulse,
};
use super::{
    aliases::{Triac, TriacTim},
    configure::Error,
    MultiPwm,
};

/// Compare value that the counter can never reach, keeps the output inactive
const NEVER: u16 = u16::MAX;

/// Converts a time after the zero crossing into triac timer ticks. The timer
/// runs at 1MHz so ticks and microseconds are the same thing.
///
/// Never returns 0: in pwm mode 2 a compare of 0 would leave the gate driven
/// once the one pulse has finished and the counter sits at 0
fn to_ticks(us: u32) -> u16 {
    us.max(1).min(u32::from(NEVER - 1)) as u16
}

/// The triac timer is in one pulse mode, pwm mode 2 on both channels. With
/// `CNT` reset to 0 and enabled the output is inactive until `CNT` reaches
/// the compare value then active until `ARR`, where the counter stops and
/// drops back to 0. So compare = delay and `ARR` = delay + width gives one
/// delayed gate pulse with no cpu involvement after scheduling
impl TriacGate for Triac {
    type Error = Error;

    fn schedule(&mut self, pulse: FiringPulse) -> Result<(), Error> {
        let on = to_ticks(pulse.delay_us);
        let end = to_ticks(pulse.delay_us + pulse.width_us).max(on + 1);

        unsafe {
            let tim = &(*TriacTim::ptr());

            // The previous pulse should always have finished by the next zero crossing.
            // If it hasn't, leave it alone rather than cutting it short or stretching it
            if tim.cr1.read().cen().bit_is_set() {
                return Err(Error::TimerBusy);
            }

            self.set_duty(on);
            tim.arr.write(|w| w.arr().bits(end));

            // Push PSC, ARR and the compare values to the shadow registers, also zeroes CNT
            tim.egr.write(|w| w.ug().update());

            tim.cr1.modify(|_, w| w
                .opm().enabled()
                .cen().set_bit()
            );
        }

        trace!("Triac pulse scheduled, on: {}, end: {}", on, end);

        Ok(())
    }

    fn force_off(&mut self) {
        unsafe {
            let tim = &(*TriacTim::ptr());
            tim.cr1.modify(|_, w| w.cen().clear_bit());
        }

        self.set_duty(NEVER);

        unsafe {
            let tim = &(*TriacTim::ptr());
            tim.egr.write(|w| w.ug().update());
        }
    }
}

/// Forces the triac gate and status led low without needing the `Triac`
/// handle. For the panic handler, where the handle may be mid-use
pub fn triac_emergency_off() {
    unsafe {
        let tim = &(*TriacTim::ptr());
        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.ccmr1_output().modify(|_, w| w.oc2m().force_inactive());
        tim.ccmr2_output().modify(|_, w| w.oc3m().force_inactive());
    }
}

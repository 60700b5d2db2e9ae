use embedded_hal::PwmPin;
use super::aliases::*;

/// Convenience trait to treat multiple Pwm channels as one 
pub trait MultiPwm {
    /// Set the compare value of all channels of this group
    fn set_duty(&mut self, duty: u16);
    /// Enable all channels of this group
    fn enable(&mut self);
}

// Keeps the triac status led lit for exactly as long as the gate is driven
impl MultiPwm for Triac {    
    fn set_duty(&mut self, duty: u16) {
        self.0.set_duty(duty);
        self.1.set_duty(duty);
    }
    fn enable(&mut self) {
        self.0.enable();
        self.1.enable();
    }
}

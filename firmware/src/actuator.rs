use crate::{
    firing::FiringPulse,
    shared::SharedFiring,
};

/// The triac gate output as seen by the weld logic
pub trait TriacGate {
    /// Error returned when a pulse can't be scheduled
    type Error;

    /// Arranges for the gate to be driven for `pulse.width_us`, starting
    /// `pulse.delay_us` after now. Must return without waiting for the pulse
    fn schedule(&mut self, pulse: FiringPulse) -> Result<(), Self::Error>;

    /// Cancels anything scheduled and drives the gate low
    fn force_off(&mut self);
}

/// What happened on a zero crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing<E> {
    /// No weld in progress, nothing done
    Disarmed,
    /// Weld in progress but the crossing didn't look like mains, or left no
    /// room for a pulse
    Skipped,
    /// The gate refused the pulse
    Failed(E),
    /// Pulse scheduled
    Scheduled(FiringPulse),
}

/// Turns zero crossings into trigger pulses while a weld is armed.
/// Runs in the zero crossing interrupt
pub struct PhaseFiringActuator<'a> {
    shared: &'a SharedFiring,
}

impl<'a> PhaseFiringActuator<'a> {
    /// An actuator reading from `shared`
    pub const fn new(shared: &'a SharedFiring) -> Self {
        Self { shared }
    }

    /// Handles one zero crossing.
    ///
    /// `half_cycle` is only called once the weld is known to be armed, so the
    /// disarmed path stays a single atomic load. It returns the measured
    /// half-cycle period or `None` if the crossing is not trustworthy
    pub fn on_zero_crossing<G, F>(&self, gate: &mut G, half_cycle: F) -> Firing<G::Error>
    where
        G: TriacGate,
        F: FnOnce() -> Option<u32>,
    {
        if !self.shared.is_armed() {
            return Firing::Disarmed;
        }

        let half_cycle_us = match half_cycle() {
            Some(us) => us,
            None => return Firing::Skipped,
        };

        // Loaded after the armed flag, never cached between crossings
        let params = self.shared.firing();
        let pulse = match FiringPulse::within_half_cycle(params.firing_delay_us, half_cycle_us) {
            Some(pulse) => pulse,
            None => return Firing::Skipped,
        };

        match gate.schedule(pulse) {
            Ok(()) => Firing::Scheduled(pulse),
            Err(e) => Firing::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::*,
        firing::FiringParameters,
    };

    const NOMINAL_HALF_CYCLE_US: u32 = 10_000;

    #[derive(Default)]
    struct Gate {
        pulses: Vec<FiringPulse>,
        busy: bool,
    }

    impl TriacGate for Gate {
        type Error = ();
        fn schedule(&mut self, pulse: FiringPulse) -> Result<(), ()> {
            if self.busy {
                return Err(());
            }
            self.pulses.push(pulse);
            Ok(())
        }
        fn force_off(&mut self) {}
    }

    fn armed(delay: u32) -> SharedFiring {
        let shared = SharedFiring::new();
        shared.publish(FiringParameters { firing_delay_us: delay });
        shared.arm();
        shared
    }

    #[test]
    fn disarmed_does_nothing_and_never_measures() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let result = PhaseFiringActuator::new(&shared)
            .on_zero_crossing(&mut gate, || panic!("measured while disarmed"));
        assert_eq!(result, Firing::Disarmed);
        assert!(gate.pulses.is_empty());
    }

    #[test]
    fn armed_schedules_published_delay() {
        let shared = armed(4_250);
        let mut gate = Gate::default();
        let result = PhaseFiringActuator::new(&shared)
            .on_zero_crossing(&mut gate, || Some(NOMINAL_HALF_CYCLE_US));
        let expected = FiringPulse { delay_us: 4_250, width_us: TRIGGER_PULSE_US };
        assert_eq!(result, Firing::Scheduled(expected));
        assert_eq!(gate.pulses, vec![expected]);
    }

    #[test]
    fn delay_is_read_at_each_crossing() {
        let shared = armed(0);
        let mut gate = Gate::default();
        let actuator = PhaseFiringActuator::new(&shared);
        actuator.on_zero_crossing(&mut gate, || Some(NOMINAL_HALF_CYCLE_US));
        shared.publish(FiringParameters { firing_delay_us: 3_000 });
        actuator.on_zero_crossing(&mut gate, || Some(NOMINAL_HALF_CYCLE_US));
        assert_eq!(gate.pulses[0].delay_us, 0);
        assert_eq!(gate.pulses[1].delay_us, 3_000);
    }

    #[test]
    fn malformed_crossing_is_skipped() {
        let shared = armed(0);
        let mut gate = Gate::default();
        let result = PhaseFiringActuator::new(&shared).on_zero_crossing(&mut gate, || None);
        assert_eq!(result, Firing::Skipped);
        assert!(gate.pulses.is_empty());
    }

    #[test]
    fn half_cycle_with_no_room_is_skipped() {
        let shared = armed(0);
        let mut gate = Gate::default();
        let result = PhaseFiringActuator::new(&shared)
            .on_zero_crossing(&mut gate, || Some(TRIGGER_PULSE_US));
        assert_eq!(result, Firing::Skipped);
        assert!(gate.pulses.is_empty());
    }

    #[test]
    fn overlong_delay_is_clamped() {
        let shared = armed(FIRING_DELAY_MAX_US);
        let mut gate = Gate::default();
        PhaseFiringActuator::new(&shared).on_zero_crossing(&mut gate, || Some(8_333));
        assert!(gate.pulses[0].end_us() + FIRING_MARGIN_US <= 8_333);
    }

    #[test]
    fn busy_gate_is_reported() {
        let shared = armed(100);
        let mut gate = Gate { busy: true, ..Gate::default() };
        let result = PhaseFiringActuator::new(&shared)
            .on_zero_crossing(&mut gate, || Some(NOMINAL_HALF_CYCLE_US));
        assert_eq!(result, Firing::Failed(()));
    }
}

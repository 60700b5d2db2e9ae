//! The weld session state machine.
//!
//! Polled from the main loop with the current time and foot switch level.
//! A session arms the zero crossing actuator for a fixed duration and is
//! always finished by forcing the triac gate low.

use itm_logger::*;

use crate::{
    actuator::TriacGate,
    constants::DEBOUNCE_MS,
    firing::FiringParameters,
    settings::WeldSettings,
    shared::SharedFiring,
};

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the foot switch
    Idle,
    /// Weld in progress, the actuator fires on every zero crossing
    Armed {
        /// When the session started
        started_ms: u32,
        /// How long the session lasts
        duration_ms: u32,
    },
}

/// Reported by `poll` so the main loop can react and log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nothing is happening
    Idle,
    /// Foot switch is engaged but the previous session ended too recently
    Debouncing,
    /// A session has just been armed
    Started {
        /// How long it will last
        duration_ms: u32,
        /// The delay that was published with it
        firing: FiringParameters,
    },
    /// A session is running
    Welding,
    /// A session has just ended and the gate has been forced low
    Finished,
}

/// Owns the weld session and the foot switch debounce
pub struct WeldSessionController {
    state: SessionState,
    last_end_ms: Option<u32>,
    completed: u32,
}

impl WeldSessionController {
    /// An idle controller. The first press after boot is accepted immediately
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
            last_end_ms: None,
            completed: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while a session is in progress. Inputs must not be re-scanned
    /// or republished while this is true
    pub fn is_armed(&self) -> bool {
        matches!(self.state, SessionState::Armed { .. })
    }

    /// Number of sessions run to completion since boot
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Advances the state machine.
    ///
    /// `settings` are only looked at when a session starts. While armed the
    /// foot switch and settings are ignored until the duration has elapsed
    pub fn poll<G: TriacGate>(
        &mut self,
        now_ms: u32,
        foot_switch_engaged: bool,
        settings: &WeldSettings,
        shared: &SharedFiring,
        gate: &mut G,
    ) -> SessionEvent {
        match self.state {
            SessionState::Idle => {
                if !foot_switch_engaged {
                    return SessionEvent::Idle;
                }

                if let Some(end) = self.last_end_ms {
                    if now_ms.wrapping_sub(end) < DEBOUNCE_MS {
                        return SessionEvent::Debouncing;
                    }
                }

                let firing = FiringParameters::for_power(settings.power_percent);
                let duration_ms = settings.duration_ms();

                // Delay first, flag second
                shared.publish(firing);
                shared.arm();

                self.state = SessionState::Armed {
                    started_ms: now_ms,
                    duration_ms,
                };

                info!("Weld started");
                debug!("  time: {} => {}ms", settings.time_level, duration_ms);
                debug!("  power: {}% => {}us delay", settings.power_percent, firing.firing_delay_us);

                SessionEvent::Started { duration_ms, firing }
            }
            SessionState::Armed { started_ms, duration_ms } => {
                if now_ms.wrapping_sub(started_ms) < duration_ms {
                    return SessionEvent::Welding;
                }

                // Flag first so no further pulses get scheduled, then kill
                // whatever might already be scheduled or running
                shared.disarm();
                gate.force_off();

                self.state = SessionState::Idle;
                self.last_end_ms = Some(now_ms);
                self.completed = self.completed.wrapping_add(1);

                info!("Weld finished ({} total)", self.completed);

                SessionEvent::Finished
            }
        }
    }
}

impl Default for WeldSessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing::FiringPulse;

    #[derive(Default)]
    struct Gate {
        high: bool,
        forced_off: u32,
    }

    impl TriacGate for Gate {
        type Error = ();
        fn schedule(&mut self, _pulse: FiringPulse) -> Result<(), ()> {
            self.high = true;
            Ok(())
        }
        fn force_off(&mut self) {
            self.high = false;
            self.forced_off += 1;
        }
    }

    const SETTINGS: WeldSettings = WeldSettings { time_level: 10, power_percent: 100 };

    #[test]
    fn idle_without_foot_switch() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        assert_eq!(c.poll(0, false, &SETTINGS, &shared, &mut gate), SessionEvent::Idle);
        assert!(!shared.is_armed());
    }

    #[test]
    fn press_arms_with_published_delay() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        let settings = WeldSettings { time_level: 50, power_percent: 10 };
        let event = c.poll(5, true, &settings, &shared, &mut gate);
        assert_eq!(event, SessionEvent::Started {
            duration_ms: 1000,
            firing: FiringParameters { firing_delay_us: 8_500 },
        });
        assert!(shared.is_armed());
        assert_eq!(shared.firing().firing_delay_us, 8_500);
        assert_eq!(c.state(), SessionState::Armed { started_ms: 5, duration_ms: 1000 });
    }

    #[test]
    fn session_runs_for_its_duration_then_forces_gate_low() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        c.poll(100, true, &SETTINGS, &shared, &mut gate);
        gate.schedule(FiringPulse { delay_us: 0, width_us: 20 }).unwrap();

        assert_eq!(c.poll(299, false, &SETTINGS, &shared, &mut gate), SessionEvent::Welding);
        assert!(shared.is_armed());

        assert_eq!(c.poll(300, false, &SETTINGS, &shared, &mut gate), SessionEvent::Finished);
        assert!(!shared.is_armed());
        assert!(!gate.high);
        assert_eq!(gate.forced_off, 1);
        assert_eq!(c.completed(), 1);
    }

    #[test]
    fn settings_are_ignored_while_armed() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        c.poll(0, true, &SETTINGS, &shared, &mut gate);
        let other = WeldSettings { time_level: 1, power_percent: 10 };
        assert_eq!(c.poll(50, true, &other, &shared, &mut gate), SessionEvent::Welding);
        assert_eq!(shared.firing().firing_delay_us, 0);
        assert_eq!(c.poll(199, true, &other, &shared, &mut gate), SessionEvent::Welding);
    }

    #[test]
    fn debounce_is_measured_from_session_end() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        c.poll(0, true, &SETTINGS, &shared, &mut gate);
        assert_eq!(c.poll(200, true, &SETTINGS, &shared, &mut gate), SessionEvent::Finished);

        // 500ms after the press started but only 300ms after it ended
        assert_eq!(c.poll(500, true, &SETTINGS, &shared, &mut gate), SessionEvent::Debouncing);
        assert_eq!(c.poll(699, true, &SETTINGS, &shared, &mut gate), SessionEvent::Debouncing);
        assert!(!shared.is_armed());

        assert!(matches!(
            c.poll(700, true, &SETTINGS, &shared, &mut gate),
            SessionEvent::Started { .. }
        ));
    }

    #[test]
    fn debounce_survives_clock_wrap() {
        let shared = SharedFiring::new();
        let mut gate = Gate::default();
        let mut c = WeldSessionController::new();
        let start = u32::MAX - 100;
        c.poll(start, true, &SETTINGS, &shared, &mut gate);
        let end = start.wrapping_add(200);
        assert_eq!(c.poll(end, false, &SETTINGS, &shared, &mut gate), SessionEvent::Finished);
        assert_eq!(c.poll(end.wrapping_add(10), true, &SETTINGS, &shared, &mut gate), SessionEvent::Debouncing);
    }
}

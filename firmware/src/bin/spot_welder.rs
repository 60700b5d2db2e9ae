#![no_std]
#![no_main]

use core::{
    panic::PanicInfo,
    sync::atomic::{self, Ordering},
};
use cortex_m::{
    asm,
    interrupt,
    peripheral::{
        Peripherals as CorePeripherals,
        SYST,
    },
};
use rtfm::Mutex;

use itm_logger::*;

use spot_welder::{
    actuator::{Firing, PhaseFiringActuator, TriacGate},
    board::*,
    firing::{FiringParameters, FiringPulse},
    session::{SessionEvent, WeldSessionController},
    settings::{InputScanner, WeldSettings},
    shared::{MillisClock, SharedFiring},
    ui::presenter::{DisplayPresenter, Readout},
    zero_cross::{half_cycle_us, LineMonitor},
};

use stm32f1xx_hal::{
    prelude::*,
    rcc::Clocks,
    pac::Peripherals as DevicePeripherals,
    adc::Adc,
    delay::Delay,
};

/// Firing delay and armed flag, written by the main loop, read by the zero crossing interrupt
static FIRING: SharedFiring = SharedFiring::new();
/// Milliseconds since boot, ticked by SysTick
static CLOCK: MillisClock = MillisClock::new();
/// Zero crossing arrivals, written by the zero crossing interrupt
static LINE: LineMonitor = LineMonitor::new();

/// Lets the main loop use the triac, which it shares with the zero crossing
/// interrupt, as a `TriacGate`. Every access masks the zero crossing interrupt
struct LockedTriac<M>(M);

impl<M: Mutex<T = Triac>> TriacGate for LockedTriac<M> {
    type Error = Error;

    fn schedule(&mut self, pulse: FiringPulse) -> Result<(), Error> {
        self.0.lock(|triac| triac.schedule(pulse))
    }

    fn force_off(&mut self) {
        self.0.lock(|triac| triac.force_off())
    }
}

#[rtfm::app(device = stm32f1xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        zc_in: Zc,
        clocks: Clocks,
        triac: Triac,
        status_led: LedStatus,
        activity_led: LedUsr,
        display: Display,
        pots: Potentiometers,
        foot_switch: FootSwitch,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        configure(cx.device, cx.core)
            .unwrap_or_else(|e| panic!("Configuration failed: {:?}", e))
    }

    /// The main loop. Scans the settings, keeps the display up to date and
    /// runs the weld session controller
    #[idle(resources = [
        triac,
        activity_led,
        display,
        pots,
        foot_switch,
    ])]
    fn idle(cx: idle::Context) -> ! {
        let mut scanner = InputScanner::new(cx.resources.pots);
        let mut gate = LockedTriac(cx.resources.triac);
        let activity_led = cx.resources.activity_led;
        let display = cx.resources.display;
        let foot_switch = cx.resources.foot_switch;

        let mut controller = WeldSessionController::new();
        let mut presenter = DisplayPresenter::new();
        let mut settings = WeldSettings::default();

        info!("Ready");

        loop {
            let now = CLOCK.now();
            let mains_present = LINE.mains_present(now);

            // Settings are frozen for the length of a session
            if !controller.is_armed() {
                settings = scanner.scan();
                FIRING.publish(FiringParameters::for_power(settings.power_percent));
                update_display(&mut presenter, display, Readout::for_settings(&settings, mains_present));
            }

            match controller.poll(now, foot_switch.engaged(), &settings, &FIRING, &mut gate) {
                SessionEvent::Started { .. } => {
                    activity_led.on();
                    if !mains_present {
                        warn!("Weld started with no zero crossings, nothing will fire");
                    }
                },
                SessionEvent::Finished => {
                    activity_led.off();
                },
                SessionEvent::Idle | SessionEvent::Debouncing | SessionEvent::Welding => {},
            }
        }
    }

    /// SysTick drives the millisecond clock
    #[task(binds = SysTick, priority = 2)]
    fn systick(_cx: systick::Context) {
        CLOCK.tick();
    }

    /// TIM2 Interrupt
    /// This timer is connected to the ZC circuit (or countdown if dummy_zc feature is enabled)
    #[task(binds = TIM2, priority = 3, resources = [
        zc_in,
        clocks,
        triac,
        status_led,
    ])]
    fn tim2(cx: tim2::Context) {
        // This is purely to divide the zc rate down to a level that is visible on the status led
        static mut COUNT: u16 = 0;

        let zc_in = cx.resources.zc_in;
        let clocks: &Clocks = cx.resources.clocks;

        // Clear the interrupt
        zc_in.clear_interrupt();

        LINE.record(CLOCK.now());

        *COUNT = COUNT.wrapping_add(1);
        if *COUNT % 20 == 0 {
            cx.resources.status_led.on();
        } else {
            cx.resources.status_led.off();
        }

        let firing = PhaseFiringActuator::new(&FIRING)
            .on_zero_crossing(cx.resources.triac, || half_cycle_us(zc_in.frequency(clocks)));

        match firing {
            Firing::Disarmed | Firing::Scheduled(_) => {},
            Firing::Skipped => warn!("Zero crossing unusable, half-cycle skipped"),
            Firing::Failed(e) => warn!("Triac not fired: {:?}", e),
        }
    }
};

/// This configures all peripherals. Mainly broken out to a function to allow the use of `?`
fn configure(device: DevicePeripherals, mut core: CorePeripherals) -> Result<init::LateResources, Error> {
    let mut rcc = device.RCC.constrain();
    let mut flash = device.FLASH.constrain();
    let mut gpioa = device.GPIOA.split(&mut rcc.apb2);
    let mut afio = device.AFIO.constrain(&mut rcc.apb2);
    let mut gpiob = device.GPIOB.split(&mut rcc.apb2);
    let mut dbgmcu = device.DBGMCU;

    // PCB activity LED
    // It's configured here and set low (on) so that it's possible to tell
    // if the program has loaded without ITM for debugging
    let mut usr_led = LedUsr::configure((gpioa.pa7, &mut gpioa.crl))?;
    usr_led.on();

    itm_reset();

    // Configure the clock for full speed
    let clocks = Clocks::configure((rcc.cfgr, &mut flash.acr))?;

    itm_update_clocks(&clocks);

    info!("Configured max freq");

    // Triac as early as possible so the gate is actively held low
    let triac = Triac::configure((
        TriacEn::configure((gpioa.pa9, &mut gpioa.crh))?,
        LedSsrStatus::configure((gpioa.pa10, &mut gpioa.crh))?,
        device.TIM1,
        clocks,
        &mut rcc.apb2,
        &mut afio.mapr,
    ))?;

    let mut delay = Delay::new(core.SYST, clocks);

    let display = {
        let res = Display::configure((
            &mut core.DWT,
            gpiob.pb10, //SCL
            gpiob.pb11, //SDA
            &mut gpiob.crh,
            &mut delay,
            device.I2C2, // I2C peripheral
            clocks,
            &mut rcc.apb1,
        ));
        // This is just for extra logging to quickly flag that it's the display that's failed
        if res.is_err() {
            error!("Configuring display failed");
        }
        res?
    };

    // SysTick was only borrowed by Delay for the display bus fix, from here on it's the millisecond clock
    let _systick = SYST::configure((delay.free(), clocks))?;

    let pots = Potentiometers::new(
        Adc::adc1(device.ADC1, &mut rcc.apb2, clocks),
        PotTime::configure((gpiob.pb0, &mut gpiob.crl))?,
        PotPower::configure((gpiob.pb1, &mut gpiob.crl))?,
    );

    let foot_switch = FootSwitch::configure((gpioa.pa8, &mut gpioa.crh))?;

    let status_led = LedStatus::configure((gpioa.pa2, &mut gpioa.crl))?;

    let zc_in = Zc::configure((
        ZcRising::configure((gpioa.pa0, &mut gpioa.crl))?,
        ZcFalling::configure((gpioa.pa1, &mut gpioa.crl))?,
        device.TIM2,
        clocks,
        &mut rcc.apb1,
        &mut afio.mapr,
        &mut dbgmcu,
    ))?;

    usr_led.off();

    info!("Init done");

    Ok(init::LateResources {
        zc_in,
        clocks,
        triac,
        status_led,
        activity_led: usr_led,
        display,
        pots,
        foot_switch,
    })
}

/// Redraws the display if the readout changed. The display isn't part of the
/// weld path so failures are logged and not retried until the readout changes
fn update_display(presenter: &mut DisplayPresenter, display: &mut Display, readout: Readout) {
    match presenter.show(display, readout) {
        Ok(false) => {},
        Ok(true) => {
            if let Err(e) = display.write_display_buffer() {
                if HT16K33_MISSING_FATAL {
                    panic!("HT16K33 error: {:?}", e);
                } else {
                    error!("HT16K33 error: {:?}", e);
                }
            }
        },
        Err(e) => {
            error!("Error updating display: {:?}", e);
        },
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    interrupt::disable();

    // Whatever went wrong, the gate must not be left driven
    triac_emergency_off();

    itm_panic(info);

    loop {
        // add some side effect to prevent this from turning into a UDF instruction
        // see rust-lang/rust#28728 for details
        atomic::compiler_fence(Ordering::SeqCst);
        asm::nop();
    }
}

use cortex_m::peripheral::{
    syst::SystClkSource,
    SYST,
};
use stm32f1xx_hal::{
    rcc::{self, Clocks},
    afio,
    flash,
    gpio::{
        State,
        Input,
        Floating,
        gpioa,
        gpiob,
    },
    timer::Timer,
    i2c::{
        I2c,
        blocking_i2c,
        Error as I2cError,
    },
    pac::{
        I2C2,
        DWT,
        DBGMCU,
    },
    delay::Delay,
};
use i2c_hung_fix::{
    try_unhang_i2c,
    RECOMMENDED_MAX_CLOCK_CYCLES,
    Error as HungError,
};
use itm_logger::*;
use crate::actuator::TriacGate;
use super::{
    constants::*,
    aliases::*,
    EnableOutput,
    MultiPwm,
    ZeroCrossInput,
};

#[cfg(not(feature = "dummy_zc"))]
use stm32f1xx_hal::{
    pwm_input::{
        Configuration as PwmInputConfig,
        ReadMode,
    },
};

use ht16k33::{
    HT16K33,
    Display as HtDisplay,
};

use nb::Error as NbError;

use core::convert::Infallible;

/// Errors that can be returned by the board layer
#[derive(Debug)]
pub enum Error {
    /// A Non-Blocking I2C error
    I2cNbError(NbError<I2cError>),
    /// An I2C error
    I2cError(I2cError),
    /// The hang fix has failed and the bus appears to be hung
    I2cHung(HungError<Infallible>),
    /// A triac pulse was requested while the previous one was still running
    TimerBusy,
}

impl From<NbError<I2cError>> for Error {
    fn from(e: NbError<I2cError>) -> Self {
        Error::I2cNbError(e)
    }
}

impl From<I2cError> for Error {
    fn from(e: I2cError) -> Self {
        Error::I2cError(e)
    }
}

impl From<HungError<Infallible>> for Error {
    fn from(e: HungError<Infallible>) -> Self {
        Error::I2cHung(e)
    }
}

/// This trait allows a configure function to be implemented on the type aliases
/// from super::aliases. This provides a somewhat convenient interface to configure
/// the various board devices without the caller having to do it all manually.
pub trait Configure<'a>
where Self: Sized
{
    /// The type of the parameters that need to be provided to the configure function
    type Params;
    /// Configure the peripherals required to construct `Self`
    fn configure(_: Self::Params) -> Result<Self, Error>;
}

impl<'a> Configure<'a> for LedUsr {
    type Params = (
        gpioa::PA7<Input<Floating>>,
        &'a mut gpioa::CRL,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_push_pull_output_with_state(cr, Self::OFF_STATE))
    }
}

impl<'a> Configure<'a> for LedStatus {
    type Params = (
        gpioa::PA2<Input<Floating>>,
        &'a mut gpioa::CRL,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_push_pull_output_with_state(cr, Self::OFF_STATE))
    }
}

impl<'a> Configure<'a> for Display {
    type Params = (
        &'a mut DWT,
        gpiob::PB10<Input<Floating>>,
        gpiob::PB11<Input<Floating>>,
        &'a mut gpiob::CRH,
        &'a mut Delay,
        I2C2,
        Clocks,
        &'a mut rcc::APB1,
    );
    fn configure((dwt, scl, sda, cr, delay, i2c2, clocks, apb1): Self::Params) -> Result<Self, Error> {
        // Extra logging is because this tends to fail/hang so it's nice to see what was happening in the log
        debug!("Initializing I2C display...");

        // BlockingI2c relies upon DWT being running
        dwt.enable_cycle_counter();

        // Temporarily configure the scl as output to run the hung fix
        let mut scl = scl.into_push_pull_output_with_state(cr, State::High);

        try_unhang_i2c(
            &mut scl,
            &sda,
            delay,
            DISP_BAUDRATE.0,
            RECOMMENDED_MAX_CLOCK_CYCLES,
        )?;

        let pins = (
            scl.into_alternate_open_drain(cr),
            sda.into_alternate_open_drain(cr),
        );

        let i2c2 = blocking_i2c(
            I2c::i2c2(
                i2c2,
                pins,
                DISP_I2C_MODE,
                clocks,
                apb1,
            ),
            clocks,
            DISP_START_TIMEOUT_US,
            DISP_START_RETRIES,
            DISP_ADDR_TIMEOUT_US,
            DISP_DATA_TIMEOUT_US,
        );

        let mut ht16k33 = HT16K33::new(i2c2, DISP_I2C_ADDR);
        ht16k33.initialize()?;
        ht16k33.set_display(HtDisplay::ON)?;
        ht16k33.write_display_buffer()?;

        debug!("... i2c done");

        Ok(ht16k33)
    }
}

impl<'a> Configure<'a> for PotTime {
    type Params = (
        gpiob::PB0<Input<Floating>>,
        &'a mut gpiob::CRL,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_analog(cr))
    }
}

impl<'a> Configure<'a> for PotPower {
    type Params = (
        gpiob::PB1<Input<Floating>>,
        &'a mut gpiob::CRL,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_analog(cr))
    }
}

impl<'a> Configure<'a> for FootSwitch {
    type Params = (
        gpioa::PA8<Input<Floating>>,
        &'a mut gpioa::CRH,
    );
    // Polled from the main loop, no EXTI needed
    fn configure((pin, _cr): Self::Params) -> Result<Self, Error> {
        Ok(pin)
    }
}

impl<'a> Configure<'a> for ZcRising {
    type Params = (
        gpioa::PA0<Input<Floating>>,
        &'a mut gpioa::CRL,
    );
    fn configure((pin, _cr): Self::Params) -> Result<Self, Error> {
        Ok(pin)
    }
}

impl<'a> Configure<'a> for ZcFalling {
    type Params = (
        gpioa::PA1<Input<Floating>>,
        &'a mut gpioa::CRL,
    );
    fn configure((pin, _cr): Self::Params) -> Result<Self, Error> {
        Ok(pin)
    }
}

impl<'a> Configure<'a> for Zc {
    type Params = (
        ZcRising,
        ZcFalling,
        ZcTim,
        Clocks,
        &'a mut rcc::APB1,
        &'a mut afio::MAPR,
        &'a mut DBGMCU,
    );
    #[cfg_attr(feature = "dummy_zc", allow(unused_variables))]
    fn configure((rising, falling, tim, clocks, apb1, mapr, dbg): Self::Params) -> Result<Self, Error> {
        let mut zc_in;

        #[cfg(feature = "dummy_zc")]
        {
            // Dummy ZC is just the same timer running in count down mode
            zc_in = Timer::tim2(tim, &clocks, apb1)
                .start_count_down(DUMMY_FREQ);
        }

        #[cfg(not(feature = "dummy_zc"))]
        {
            // Real ZC uses pwm input mode
            zc_in = Timer::tim2(tim, &clocks, apb1)
                .pwm_input((rising, falling), mapr, dbg, PwmInputConfig::Frequency(ZC_INPUT_FREQ));

            if WAIT_FOR_ZC_INIT {
                info!("Waiting for ZC timer to stabilize");
                while zc_in.read_frequency(ReadMode::Instant, &clocks).is_err() {}
            }
        }

        ZeroCrossInput::listen(&mut zc_in);

        Ok(zc_in)
    }
}

impl<'a> Configure<'a> for TriacEn {
    type Params = (
        gpioa::PA9<Input<Floating>>,
        &'a mut gpioa::CRH,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_alternate_push_pull(cr))
    }
}

impl<'a> Configure<'a> for LedSsrStatus {
    type Params = (
        gpioa::PA10<Input<Floating>>,
        &'a mut gpioa::CRH,
    );
    fn configure((pin, cr): Self::Params) -> Result<Self, Error> {
        Ok(pin.into_alternate_push_pull(cr))
    }
}

impl<'a> Configure<'a> for Triac {
    type Params = (
        TriacEn,
        LedSsrStatus,
        TriacTim,
        Clocks,
        &'a mut rcc::APB2,
        &'a mut afio::MAPR,
    );
    fn configure((en, led, tim, clocks, apb2, mapr): Self::Params) -> Result<Self, Error> {
        let mut triac = Timer::tim1(tim, &clocks, apb2)
            .pwm((en, led), mapr, TRIAC_TIMER_FREQ);

        // The hal resets the peripheral and keeps the reference so the rest
        // has to go through the raw registers
        unsafe {
            let tim = &(*TriacTim::ptr());
            tim.cr1.modify(|_, w| w
                // Stopped, one pulse mode
                .cen().clear_bit()
                .opm().enabled()
            );
            // 1 tick per microsecond. Loaded by the update event in force_off
            tim.psc.write(|w| w.psc().bits(TRIAC_TIMER_PSC));
            tim.bdtr.modify(|_, w| w
                // Master output enable
                .moe().enabled()
            );
            tim.ccmr1_output().modify(|_, w| w
                // This is channel 2, the triac gate
                // Mode 2 is idle low, hal sets it to mode 1
                .oc2m().pwm_mode2()
            );
            tim.ccmr2_output().modify(|_, w| w
                // This is channel 3, the triac status LED
                .oc3m().pwm_mode2()
            );
        }

        triac.force_off();
        triac.enable();

        Ok(triac)
    }
}

impl<'a> Configure<'a> for SYST {
    type Params = (
        SYST,
        Clocks,
    );
    fn configure((mut syst, clocks): Self::Params) -> Result<Self, Error> {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(clocks.sysclk().0 / SYSTICK_FREQ.0 - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();

        Ok(syst)
    }
}

impl <'a> Configure<'a> for Clocks {
    type Params = (
        rcc::CFGR,
        &'a mut flash::ACR,
    );
    fn configure((cfgr, acr): Self::Params) -> Result<Self, Error> {
        Ok(cfgr
            .use_hse(HSE)
            .sysclk(SYSCLK_FREQ)
            .pclk1(PCLK1_FREQ)
            .pclk2(PCLK2_FREQ)
            .adcclk(ADC_FREQ)
            .freeze(acr))
    }
}

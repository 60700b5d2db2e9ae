use stm32f1xx_hal::{
    time::*,
    i2c::{
        Mode as I2cMode,
    },
};

/// If true, wait (possible forever) for first zero crossing
#[cfg(not(feature = "dummy_zc"))]
pub(crate) const WAIT_FOR_ZC_INIT: bool = false;

#[cfg(feature = "dummy_zc")]
/// The frequency to configure the dummy timer to
pub const DUMMY_FREQ: Hertz = Hertz(100);

/// High speed internal oscillator clock frequency
pub const HSI: MegaHertz = MegaHertz(8);

/// High speed external crystal oscillator frequency
pub const HSE: MegaHertz = MegaHertz(8);

/// Target systclk frequency after PLL is enabled
pub const SYSCLK_FREQ: MegaHertz = MegaHertz(72);

/// Target PCLK1 frequency 
pub const PCLK1_FREQ: MegaHertz = MegaHertz(36);
/// Target PCLK2 frequency
pub const PCLK2_FREQ: MegaHertz = MegaHertz(72);
/// Target ADC frequency
pub const ADC_FREQ: MegaHertz = MegaHertz(2);

/// Baud rate used for ITM communication
pub const ITM_BAUDRATE: MegaHertz = MegaHertz(2);

/// Rate of the SysTick interrupt that drives the millisecond clock
pub const SYSTICK_FREQ: Hertz = Hertz(1_000);

/// Baud rate for I2C display
pub const DISP_BAUDRATE: Hertz = Hertz(20_000);
/// The I2C mode for the display
pub const DISP_I2C_MODE: I2cMode = I2cMode::Standard { frequency: DISP_BAUDRATE };
/// Address for I2C display
pub const DISP_I2C_ADDR: u8 = 112;
/// Timeout for I2C start
pub const DISP_START_TIMEOUT_US: u32 = 5000;
/// How many times to retry start if it fails
pub const DISP_START_RETRIES: u8 = 50;
/// Timeout for I2C address
pub const DISP_ADDR_TIMEOUT_US: u32 = 5000;
/// Timeout for I2C data
pub const DISP_DATA_TIMEOUT_US: u32 = 10000;

/// The frequency the hal initially configures the triac timer for. Only used
/// to get the pwm channels set up, the prescaler is replaced afterwards
pub const TRIAC_TIMER_FREQ: Hertz = Hertz(50);
/// Tick rate of the triac timer. One tick per microsecond
pub const TRIAC_TICK_FREQ: MegaHertz = MegaHertz(1);
/// Prescaler giving `TRIAC_TICK_FREQ` from the TIM1 kernel clock (PCLK2, x1)
pub const TRIAC_TIMER_PSC: u16 = (PCLK2_FREQ.0 / TRIAC_TICK_FREQ.0 - 1) as u16;

/// The frequency the pwm input timer runs at to detect the zero crossings
pub const ZC_INPUT_FREQ: Hertz = Hertz(300);

/// If true, panic on display errors, else just log. 
/// This doesn't include config - if i2c or the display fail to 
/// respond during configuration at start up it will still panic
pub const HT16K33_MISSING_FATAL: bool = false;

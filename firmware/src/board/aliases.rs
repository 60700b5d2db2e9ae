use stm32f1xx_hal::{
    gpio::{
        PushPull,
        Alternate,
        Input,
        Output,
        Floating,
        OpenDrain,
        Analog,
        gpioa::*,
        gpiob::*,
    },    
    i2c::BlockingI2c,
    pac::{
        I2C2,
        TIM1,
        TIM2,
    },
    pwm::{
        Pwm,
        C2,
        C3,
    },
};

#[cfg(not(feature = "dummy_zc"))]
use stm32f1xx_hal::{ 
    pwm_input::PwmInput,
    timer::Tim2NoRemap,
};
#[cfg(feature = "dummy_zc")]
use stm32f1xx_hal::timer::CountDownTimer;
use ht16k33::HT16K33;

/// Zero crossing timer reads pwm input from the zero crossing detection circuit (or a dummy count down timer if dummy_zc feature is enabled)
pub type ZcTim = TIM2;
/// The triac timer produces the delayed gate pulse after each zero crossing. A one shot timer is used so
/// the control software crashing or stalling should never result in the gate being left driven
pub type TriacTim = TIM1;

/// Debug LED on PCB near MCU. Lit while a weld session is armed
/// TIM3_CH2
pub type LedUsr         = PA7<Output<PushPull>>;

/// Status LED, blinks as a zero crossing heartbeat
/// TIM5_CH3 (or TIM2_CH3)
pub type LedStatus      = PA2<Output<PushPull>>;

/// Status LED to indicate triac gate status. Same state as TriacEn
/// TIM1_CH3
pub type LedSsrStatus   = PA10<Alternate<PushPull>>;

/// Output that drives the triac gate. Active high
/// TIM1_CH2
pub type TriacEn        = PA9<Alternate<PushPull>>;

/// Complete handle for the triac gate output
pub type Triac          = (Pwm<TriacTim, C2>, Pwm<TriacTim, C3>);

/// Weld time potentiometer wiper
/// ADC1_CH8
pub type PotTime        = PB0<Analog>;

/// Weld power potentiometer wiper
/// ADC1_CH9
pub type PotPower       = PB1<Analog>;

/// Input from zero crossing detection circuit. Active low
/// TIM2_CH1
pub type ZcRising       = PA0<Input<Floating>>;
/// Input from zero crossing detection circuit. Active low
/// TIM2_CH2
pub type ZcFalling      = PA1<Input<Floating>>;

#[cfg(not(feature = "dummy_zc"))] 
/// Complete handle for the Zc timer
pub type Zc = PwmInput<ZcTim, Tim2NoRemap, (ZcRising, ZcFalling)>;

#[cfg(feature = "dummy_zc")] 
/// Complete handle for the Zc timer
pub type Zc = CountDownTimer<ZcTim>;

/// Foot switch. Active low
pub type FootSwitch     = PA8<Input<Floating>>;

/// I2C clock for quad 14 segment display
/// I2C2
pub type DispScl        = PB10<Alternate<OpenDrain>>;

/// I2C data for quad 14 segment display
/// I2C2
pub type DispSda        = PB11<Alternate<OpenDrain>>;

/// The complete handle for the HT16K33 Display
pub type Display        = HT16K33<BlockingI2c<I2C2, (DispScl, DispSda)>>;

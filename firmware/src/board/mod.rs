/*
    MCU is STM32F103RCTx
    256K Flash
    48K SRAM
*/

mod constants;
pub use constants::*;

mod aliases;
pub use aliases::*;

mod output;
pub use output::*;

mod multi_pwm;
pub use multi_pwm::*;

mod phase_fire;
pub use phase_fire::*;

mod zc;
pub use zc::*;

mod pots;
pub use pots::*;

mod itm;
pub use itm::*;

mod configure;
pub use configure::*;

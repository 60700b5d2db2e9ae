//! # spot_welder
//!
//! Firmware for a phase angle controlled spot welder built on the Zero
//! Crossing Solid State Relay controller board

#![cfg_attr(not(test), no_std)]

#![deny(missing_docs)]

/// Weld domain constants
pub mod constants;

/// Operator settings and the potentiometer scanner
pub mod settings;

/// Power setting to firing delay mapping
pub mod firing;

/// Atomics shared between the main loop and the interrupts
pub mod shared;

/// Zero crossing measurement and mains presence
pub mod zero_cross;

/// Fires the triac from the zero crossing interrupt
pub mod actuator;

/// Weld session state machine
pub mod session;

/// Presents the settings on the 4 digit alphanumeric display
pub mod ui;

/// Constants and utility functions related to the hardware board
#[cfg(feature = "board")]
pub mod board;

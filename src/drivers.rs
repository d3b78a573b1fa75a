//! Peripheral Drivers
//!
//! Drivers for the `Si4703` tuner, its RDS stream, the rotary encoder and
//! the OLED panel. Everything except the display is bus-generic and runs
//! on the host.

pub mod encoder;
pub mod rds;
pub mod registers;
pub mod si4703;

#[cfg(feature = "embedded")]
pub mod display;

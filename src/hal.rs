//! Hardware Abstraction Layer
//!
//! Thin wrappers over STM32G474 peripherals used by the firmware binary.

pub mod gpio;

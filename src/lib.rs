//! FM/RDS Receiver Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based FM
//! receiver built around the Silicon Labs `Si4703` tuner. A rotary encoder
//! with push button steers frequency or volume, RDS station name and radio
//! text are decoded from the chip's block registers, and a 128x64 SSD1306
//! OLED shows the result.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Radio Controller  │  Radio State  │  UI State / Scroll      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     DRIVER LAYER                             │
//! │  Si4703  │  Register Shadow  │  RDS Decoder  │  Encoder      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / BUS TRAITS                           │
//! │  embedded-hal-async I2C / SPI / Delay  │  GPIO / EXTI        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Immutable-by-default**: State transitions return new instances
//! - **Type-driven design**: `Frequency` and `Volume` can only hold in-range values
//! - **Bus-generic drivers**: the tuner runs against any async I2C bus, so
//!   the whole stack above the HAL is tested on the host
//! - **Explicit error handling**: Commands return `Result`; status polls
//!   degrade to the last known register values

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Button and encoder pin wrappers over STM32G474 GPIO/EXTI.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// `Si4703` tuner, RDS decoder, rotary encoder and OLED display.
pub mod drivers;

/// Radio Control Logic
///
/// Encoder/mode state machine and the controller that drives the tuner.
pub mod radio;

/// User Interface
///
/// Mode button, RDS caching, scroll ticker and render state.
pub mod ui;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::drivers::encoder::{Direction, RotaryEncoder};
    pub use crate::drivers::rds::{RdsDecoder, RdsUpdate};
    pub use crate::drivers::si4703::{SeekAbort, Si4703, TunerError};
    pub use crate::radio::controller::RadioController;
    pub use crate::radio::state::{apply_event, RadioEvent, RadioState, TunerCommand};
    pub use crate::types::*;
    pub use crate::ui::{RenderState, UiMode, UiState};

    // Common traits
    pub use embedded_hal_async::delay::DelayNs;
    pub use embedded_hal_async::i2c::I2c;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}

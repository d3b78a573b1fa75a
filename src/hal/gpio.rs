//! GPIO Abstractions
//!
//! Semantic wrappers for the front-panel pins.

use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;

/// Encoder push button (active low with internal pull-up)
pub struct ButtonInput<'d> {
    pin: Input<'d>,
}

impl<'d> ButtonInput<'d> {
    /// Wrap a pulled-up input
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }

    /// Check if the button is held down
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}

/// Encoder CLK/DT pair; CLK edges are interrupt driven
pub struct EncoderPins<'d> {
    clk: ExtiInput<'d>,
    dt: Input<'d>,
}

impl<'d> EncoderPins<'d> {
    /// Combine the primary (EXTI) and complementary pins
    #[must_use]
    pub fn new(clk: ExtiInput<'d>, dt: Input<'d>) -> Self {
        Self { clk, dt }
    }

    /// Wait for the next CLK falling edge and sample DT at that moment
    pub async fn next_edge(&mut self) -> bool {
        self.clk.wait_for_falling_edge().await;
        self.dt.is_high()
    }
}

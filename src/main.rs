//! FM Receiver Main Application
//!
//! Entry point for the STM32G474-based `Si4703` FM/RDS receiver.
//! Initializes hardware, spawns the encoder task and runs the UI loop.

#![no_std]
#![no_main]

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use fm_rds_radio::drivers::display::{reset_panel, Ssd1306};
use fm_rds_radio::drivers::si4703::reset_and_select_bus;
use fm_rds_radio::hal::gpio::{ButtonInput, EncoderPins};
use fm_rds_radio::prelude::*;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

/// Encoder counter shared between the edge task and the UI loop
static ENCODER: RotaryEncoder =
    RotaryEncoder::new(ENCODER_MIN, ENCODER_MAX, ENCODER_START, ENCODER_STEP);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("FM Receiver Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let mut p = embassy_stm32::init(config);

    // SDIO must be low while RST rises to select the 2-wire bus
    let mut delay = Delay;
    let mut rst = Output::new(p.PB7, Level::High, Speed::Low);
    {
        let mut sdio = Output::new(&mut p.PB9, Level::Low, Speed::Low);
        if let Err(err) = reset_and_select_bus(&mut rst, &mut sdio, &mut delay).await {
            error!("tuner reset failed: {}", err);
        }
    }

    let i2c = I2c::new(
        p.I2C1,
        p.PB8, // SCL
        p.PB9, // SDA (SDIO)
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    info!("I2C1 initialized at {} Hz", I2C_FREQUENCY_HZ);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(DISPLAY_SPI_FREQUENCY_HZ);
    let spi = Spi::new(
        p.SPI1,
        p.PA5, // SCK
        p.PA7, // MOSI
        p.PA6, // MISO
        p.DMA1_CH3,
        p.DMA1_CH4,
        spi_config,
    );
    let dc = Output::new(p.PB0, Level::Low, Speed::High);
    let cs = Output::new(p.PB1, Level::High, Speed::High);
    let mut res = Output::new(p.PB2, Level::High, Speed::Low);

    let mut display = Ssd1306::new(spi, dc, cs);
    if let Err(err) = reset_panel(&mut res, &mut delay).await {
        warn!("display reset failed: {}", err);
    }
    if let Err(err) = display.init().await {
        warn!("display init failed: {}", err);
    }

    let encoder_pins = EncoderPins::new(
        ExtiInput::new(p.PA0, p.EXTI0, Pull::Up),
        Input::new(p.PA1, Pull::Up),
    );
    let button = ButtonInput::new(Input::new(p.PA2, Pull::Up));

    spawner.spawn(encoder_task(encoder_pins)).unwrap();

    let tuner = Si4703::new(i2c, Delay);
    let mut radio = RadioController::new(tuner, ENCODER.value());
    if let Err(err) = radio.start(default_frequency(), default_volume()).await {
        error!("tuner start failed: {}", err);
    }

    info!("entering main loop");
    loop {
        let now_ms = Instant::now().as_millis() as u32;
        if let Some(frame) = radio.tick(now_ms, ENCODER.value(), button.is_pressed()).await {
            if let Err(err) = display.show(&frame).await {
                warn!("display update failed: {}", err);
            }
        }
        Timer::after(Duration::from_millis(LOOP_PERIOD_MS)).await;
    }
}

/// Encoder task - counts CLK falling edges
#[embassy_executor::task]
async fn encoder_task(mut pins: EncoderPins<'static>) {
    loop {
        let dt_high = pins.next_edge().await;
        let now_ms = Instant::now().as_millis() as u32;
        if let Some(direction) = ENCODER.on_falling_edge(now_ms, dt_high) {
            defmt::trace!("encoder {} -> {}", direction, ENCODER.value());
        }
    }
}

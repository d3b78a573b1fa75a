//! OLED Display Driver
//!
//! Frame buffer and SPI driver for the 128x64 SSD1306, plus the renderer
//! that lays out one [`RenderState`] frame.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;
use heapless::String;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::drivers::rds::SCANNING_PLACEHOLDER;
use crate::ui::{centered_x, signal_bars, volume_bar_width, RenderState, UiMode};

const BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

/// SSD1306 commands
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Display error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayError {
    /// SPI transfer failed
    Bus,
    /// DC, CS or RES pin could not be driven
    Pin,
}

impl defmt::Format for DisplayError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(f, "Bus"),
            Self::Pin => defmt::write!(f, "Pin"),
        }
    }
}

/// Display buffer (1 bit per pixel, page-major)
pub struct DisplayBuffer {
    buffer: [u8; BUFFER_LEN],
}

impl DisplayBuffer {
    /// Create a new empty display buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set a pixel
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }

        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let bit = 1 << (y % 8);

        if on {
            self.buffer[byte_idx] |= bit;
        } else {
            self.buffer[byte_idx] &= !bit;
        }
    }

    /// Get the raw buffer
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.set_pixel(coord.x as u32, coord.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// Pulse the panel reset line
pub async fn reset_panel<RES: OutputPin, D: DelayNs>(
    res: &mut RES,
    delay: &mut D,
) -> Result<(), DisplayError> {
    res.set_high().map_err(|_| DisplayError::Pin)?;
    delay.delay_ms(1).await;
    res.set_low().map_err(|_| DisplayError::Pin)?;
    delay.delay_ms(10).await;
    res.set_high().map_err(|_| DisplayError::Pin)
}

/// SSD1306 on a 4-wire SPI bus
pub struct Ssd1306<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
    buffer: DisplayBuffer,
}

impl<SPI, DC, CS> Ssd1306<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Create a new display driver
    #[must_use]
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self {
            spi,
            dc,
            cs,
            buffer: DisplayBuffer::new(),
        }
    }

    /// Initialize the display
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        // Initialization sequence for SSD1306 128x64
        let init_cmds = [
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14,
            cmd::MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];
        self.send_commands(&init_cmds).await?;

        self.buffer.clear();
        self.flush().await
    }

    async fn send_commands(&mut self, cmds: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.transfer(cmds).await
    }

    async fn transfer(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::Pin)?;
        let result = match self.spi.write(bytes).await {
            Ok(()) => self.spi.flush().await,
            Err(err) => Err(err),
        };
        self.cs.set_high().map_err(|_| DisplayError::Pin)?;
        result.map_err(|_| DisplayError::Bus)
    }

    /// Flush the buffer to the display
    pub async fn flush(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[cmd::COLUMN_ADDR, 0, 127, cmd::PAGE_ADDR, 0, 7])
            .await?;

        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.cs.set_low().map_err(|_| DisplayError::Pin)?;
        let result = match self.spi.write(self.buffer.as_bytes()).await {
            Ok(()) => self.spi.flush().await,
            Err(err) => Err(err),
        };
        self.cs.set_high().map_err(|_| DisplayError::Pin)?;
        result.map_err(|_| DisplayError::Bus)
    }

    /// Turn the panel off
    pub async fn power_off(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[cmd::DISPLAY_OFF]).await
    }

    /// Draw one frame into the buffer and push it out
    pub async fn show(&mut self, frame: &RenderState) -> Result<(), DisplayError> {
        render(&mut self.buffer, frame);
        self.flush().await
    }

    /// Get mutable access to the buffer for drawing
    pub fn buffer_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.buffer
    }
}

/// Lay out a frame: status row, frequency, station name, ticker, volume bar
pub fn render(buffer: &mut DisplayBuffer, frame: &RenderState) {
    buffer.clear();
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    render_signal(buffer, frame.rssi);

    let _ = Text::with_baseline(
        if frame.stereo { "ST" } else { "MO" },
        Point::new(75, 0),
        style,
        Baseline::Top,
    )
    .draw(buffer);

    render_mode(buffer, frame.mode);

    let mut freq: String<16> = String::new();
    core::fmt::write(&mut freq, format_args!("{}", frame.frequency)).ok();
    let _ = Text::with_baseline(&freq, Point::new(centered_x(&freq), 14), style, Baseline::Top)
        .draw(buffer);

    let name = frame.station_name.trim();
    let name = if name.is_empty() {
        SCANNING_PLACEHOLDER
    } else {
        name
    };
    let _ = Text::with_baseline(name, Point::new(centered_x(name), 28), style, Baseline::Top)
        .draw(buffer);

    let _ = Text::with_baseline(
        &frame.scroll_text,
        Point::new(frame.scroll_offset, 42),
        style,
        Baseline::Top,
    )
    .draw(buffer);

    render_volume(buffer, frame);
}

fn render_signal(buffer: &mut DisplayBuffer, rssi: u8) {
    let bars = i32::from(signal_bars(rssi));
    for i in 0..5 {
        let height = 2 + 2 * i;
        let rect = Rectangle::new(Point::new(i * 4, 10 - height), Size::new(3, height as u32));
        let style = if i < bars {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        let _ = rect.into_styled(style).draw(buffer);
    }
}

fn render_mode(buffer: &mut DisplayBuffer, mode: UiMode) {
    let letter = match mode {
        UiMode::Frequency => "F",
        UiMode::Volume => "V",
    };
    let _ = Rectangle::new(Point::new(100, 0), Size::new(10, 11))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(buffer);
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
    let _ = Text::with_baseline(letter, Point::new(102, 1), style, Baseline::Top).draw(buffer);
}

fn render_volume(buffer: &mut DisplayBuffer, frame: &RenderState) {
    let _ = Rectangle::new(Point::new(0, 58), Size::new(DISPLAY_WIDTH, 6))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(buffer);

    let width = volume_bar_width(frame.volume);
    if width > 0 {
        let _ = Rectangle::new(Point::new(2, 60), Size::new(width, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(buffer);
    }
}

//! SSD1306 OLED status screen.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style() -> embedded_graphics::mono_font::MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Render the status screen: radio state, peer state, button hint.
pub fn draw_status<I2C>(display: &mut Display<I2C>, radio_on: bool, peer_attached: bool)
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    draw_bluetooth_rune(display, Point::new(60, 2));

    let radio = if radio_on {
        "Bluetooth: ON"
    } else {
        "Bluetooth: OFF"
    };
    let _ = Text::new(radio, Point::new(0, 32), text_style()).draw(display);

    if radio_on {
        let status = if peer_attached {
            "Status: Connected"
        } else {
            "Status: Waiting"
        };
        let _ = Text::new(status, Point::new(0, 44), text_style()).draw(display);
    }

    let _ = Text::new("Press button to toggle", Point::new(0, 60), text_style()).draw(display);

    let _ = display.flush();
}

/// Draw the Bluetooth rune: a vertical stroke with two chevrons, 16 px tall.
fn draw_bluetooth_rune<I2C>(display: &mut Display<I2C>, origin: Point)
where
    I2C: embedded_hal::i2c::I2c,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let top = origin + Point::new(4, 0);
    let bottom = origin + Point::new(4, 16);

    let segments = [
        Line::new(top, bottom),
        Line::new(top, origin + Point::new(8, 4)),
        Line::new(origin + Point::new(8, 4), origin + Point::new(0, 12)),
        Line::new(bottom, origin + Point::new(8, 12)),
        Line::new(origin + Point::new(8, 12), origin + Point::new(0, 4)),
    ];
    for seg in segments {
        let _ = seg.into_styled(stroke).draw(display);
    }
}

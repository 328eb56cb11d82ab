//! GPIO button input with debouncing.
//!
//! One physical button (active-low with internal pull-up) toggles the
//! radio. The task samples the line on a short period and runs it through
//! the pure [`EdgeDetector`](crate::ui::input_logic::EdgeDetector), which
//! keeps the loop responsive instead of blocking through the debounce
//! interval.

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_POLL_MS};
use crate::ui::input_logic::EdgeDetector;
use crate::ui::ButtonEvent;
use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Timer};

/// Run the button sampling loop.
///
/// Emits one `ButtonEvent::Toggle` per debounced press. A held button
/// produces no repeats; a stuck line simply never fires again.
pub async fn button_task(
    pin: AnyPin,
    tx: &Sender<'static, CriticalSectionRawMutex, ButtonEvent, 4>,
) -> ! {
    let btn = Input::new(pin, Pull::Up);
    let mut edge = EdgeDetector::new(BUTTON_DEBOUNCE_MS);

    loop {
        Timer::after(Duration::from_millis(BUTTON_POLL_MS)).await;

        if edge.poll(btn.is_low(), Instant::now().as_millis()) {
            info!("Button: toggle");
            tx.send(ButtonEvent::Toggle).await;
        }
    }
}

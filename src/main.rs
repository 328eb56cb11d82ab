//! wio-ble-beacon - button-toggled BLE geolocation beacon.
//!
//! One press of the top button brings the radio up: the device
//! advertises as `WioTerminal` with a single location service whose
//! position characteristic any peer can read or subscribe to. The next
//! press tears the session down. The OLED shows the radio and peer
//! state; `defmt` carries a log line for every state transition.
//!
//! Task layout (all communication over static Embassy channels):
//!
//! - button sampler  → `BUTTON_EVENTS` →  control loop (below)
//! - control loop    → `RADIO_COMMANDS` → radio session task
//! - radio session   → `RADIO_EVENTS` →  control loop
//! - publishers      → `PAYLOAD_UPDATES` → radio session task

#![no_std]
#![no_main]

mod ble;
mod config;
mod error;
mod payload;
mod radio_logic;
mod ui;

use defmt_rtt as _; // global logger
use panic_probe as _;

use crate::ble::location::Server;
use crate::ble::{RadioCommand, RadioEvent};
use crate::payload::Payload;
use crate::radio_logic::{PressAction, RadioCore, RadioState};
use crate::ui::ButtonEvent;
use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::Pin;
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Debounced button presses, sampler → control loop.
static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonEvent, 4> = Channel::new();

/// Radio on/off commands, control loop → session task.
static RADIO_COMMANDS: Channel<CriticalSectionRawMutex, RadioCommand, 4> = Channel::new();

/// Link and fault events, session task → control loop.
static RADIO_EVENTS: Channel<CriticalSectionRawMutex, RadioEvent, 8> = Channel::new();

/// Payload updates carrying the exact bytes to store and notify.
static PAYLOAD_UPDATES: Channel<CriticalSectionRawMutex, Payload, 4> = Channel::new();

/// Authoritative in-memory payload; seeds the characteristic on enable.
static PAYLOAD: Mutex<CriticalSectionRawMutex, Payload> = Mutex::new(Payload::seed());

static SERVER: StaticCell<Server> = StaticCell::new();

/// Replace the position payload.
///
/// Always updates the in-memory value; the radio session additionally
/// stores it in the characteristic and notifies an attached peer. With
/// the radio off this is a plain in-memory update and still succeeds.
///
/// Only the demo publisher calls this today; a real fix source (GPS,
/// network time-of-flight) would go through the same entry point.
#[cfg_attr(not(feature = "demo-payload"), allow(dead_code))]
pub async fn set_payload(bytes: &[u8]) -> Result<(), error::Error> {
    let update = {
        let mut payload = PAYLOAD.lock().await;
        payload
            .set(bytes)
            .map_err(|e| error::Error::PayloadOversize { len: e.len })?;
        payload.clone()
    };

    // Lossy by design: when the session is backlogged the next update
    // carries the newest value anyway.
    if PAYLOAD_UPDATES.try_send(update).is_err() {
        warn!("Payload update queue full; dropped");
    }
    Ok(())
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn button_task(pin: embassy_nrf::gpio::AnyPin) -> ! {
    ui::buttons::button_task(pin, &BUTTON_EVENTS.sender()).await
}

#[embassy_executor::task]
async fn radio_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    ble::peripheral::radio_task(
        sd,
        server,
        &RADIO_COMMANDS.receiver(),
        &PAYLOAD_UPDATES.receiver(),
        &RADIO_EVENTS.sender(),
        &PAYLOAD,
    )
    .await
}

/// Stand-in for a GPS source: publish a canned fix every few seconds.
#[cfg(feature = "demo-payload")]
#[embassy_executor::task]
async fn demo_payload_task() -> ! {
    use embassy_time::{Duration, Timer};

    loop {
        Timer::after(Duration::from_secs(config::DEMO_PAYLOAD_PERIOD_SECS)).await;
        if set_payload(b"{\"lat\":1.3,\"lon\":103.8}").await.is_err() {
            error!("Demo payload rejected");
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut conf = embassy_nrf::config::Config::default();
    conf.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    conf.lfclk_source = embassy_nrf::config::LfclkSource::ExternalXtal;
    // The SoftDevice owns the highest priorities; keep ours below them.
    conf.gpiote_interrupt_priority = interrupt::Priority::P2;
    conf.time_interrupt_priority = interrupt::Priority::P2;
    let p = embassy_nrf::init(conf);

    interrupt::SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0.set_priority(interrupt::Priority::P3);
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut display = ui::display::init(i2c);

    let sd = Softdevice::enable(&ble::peripheral::softdevice_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(spawner.spawn(softdevice_task(sd)));

    unwrap!(spawner.spawn(button_task(p.P0_11.degrade())));
    unwrap!(spawner.spawn(radio_task(sd, server)));
    #[cfg(feature = "demo-payload")]
    unwrap!(spawner.spawn(demo_payload_task()));

    let mut core = RadioCore::new();
    ui::display::draw_status(&mut display, false, false);
    info!("Boot complete; Bluetooth off. Press the top button to toggle.");

    loop {
        match select(BUTTON_EVENTS.receive(), RADIO_EVENTS.receive()).await {
            Either::First(ButtonEvent::Toggle) => match core.on_press() {
                PressAction::TurnOn => RADIO_COMMANDS.send(RadioCommand::Enable).await,
                PressAction::TurnOff => RADIO_COMMANDS.send(RadioCommand::Disable).await,
            },
            Either::Second(event) => match event {
                RadioEvent::Connected => core.on_peer_connected(),
                RadioEvent::Disconnected => {
                    if core.on_peer_disconnected() {
                        info!("Waiting for a peer");
                    }
                }
                RadioEvent::EnableFailed => {
                    core.enable_failed();
                    error!("Bluetooth could not be enabled; press again to retry");
                }
                RadioEvent::Fault(e) => {
                    // Session stays up; cycling the radio recovers.
                    error!("Radio fault: {:?}", e);
                }
            },
        }

        // Every event redraws before the next one is taken.
        ui::display::draw_status(
            &mut display,
            core.state() == RadioState::On,
            core.peer_attached(),
        );
    }
}

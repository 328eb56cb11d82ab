//! Radio session task: advertising, peer links, and the notify path.
//!
//! The task idles until the main loop commands an enable. An enabled
//! session seeds the position characteristic, advertises the location
//! service under the device name, serves one peer at a time, and goes
//! back to advertising whenever the peer drops. A disable command at any
//! point terminates the link and silences the radio.
//!
//! The SoftDevice itself is enabled exactly once per boot; per-episode
//! teardown is expressed by leaving the advertising/connected loop, which
//! makes the service unreachable until the next enable reseeds it.

use crate::ble::location::Server;
use crate::ble::{RadioCommand, RadioEvent};
use crate::config::{ADV_INTERVAL, ATT_MTU, DEVICE_NAME, SERVICES_LIST};
use crate::error::BleError;
use crate::payload::Payload;
use core::mem;
use core::pin::pin;
use defmt::{error, info, warn};
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_sync::mutex::Mutex;
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::gatt_server::{self, NotifyValueError};
use nrf_softdevice::ble::{peripheral, Connection};
use nrf_softdevice::{raw, RawError, Softdevice};

type CommandRx = Receiver<'static, CriticalSectionRawMutex, RadioCommand, 4>;
type PayloadRx = Receiver<'static, CriticalSectionRawMutex, Payload, 4>;
type EventTx = Sender<'static, CriticalSectionRawMutex, RadioEvent, 8>;

/// How a connected episode ended.
enum SessionVerdict {
    /// The peer dropped; the caller restarts advertising.
    PeerLost,
    /// The user turned the radio off.
    Disabled,
}

/// SoftDevice configuration: one peripheral link, ATT MTU sized for a
/// whole payload in one notification, GAP name set to the advertised one.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: ATT_MTU as u16,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        conn_gatts: Some(raw::ble_gatts_conn_cfg_t {
            hvn_tx_queue_size: 3,
        }),
        ..Default::default()
    }
}

/// Run the radio session state machine forever.
pub async fn radio_task(
    sd: &'static Softdevice,
    server: &'static Server,
    cmd_rx: &CommandRx,
    payload_rx: &PayloadRx,
    event_tx: &EventTx,
    payload: &'static Mutex<CriticalSectionRawMutex, Payload>,
) -> ! {
    loop {
        // Radio off: wait for an enable command.
        loop {
            match cmd_rx.receive().await {
                RadioCommand::Enable => break,
                RadioCommand::Disable => {}
            }
        }

        // Updates queued while the radio was off are stale; the store
        // already holds the newest value and it is seeded below.
        while payload_rx.try_receive().is_ok() {}

        let seeded = {
            let p = payload.lock().await;
            server.location.set_position(sd, p.as_bytes()).is_ok()
        };
        if !seeded {
            error!("Seeding the position characteristic failed");
            event_tx.send(RadioEvent::EnableFailed).await;
            continue;
        }

        info!("Bluetooth ON - advertising as {}", DEVICE_NAME);
        run_session(sd, server, cmd_rx, payload_rx, event_tx).await;
        info!("Bluetooth OFF");
    }
}

/// One on-episode: advertise, serve peers, restart advertising after each
/// disconnect. Returns when the radio is disabled or a fault forces the
/// episode to end.
async fn run_session(
    sd: &'static Softdevice,
    server: &'static Server,
    cmd_rx: &CommandRx,
    payload_rx: &PayloadRx,
    event_tx: &EventTx,
) {
    static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
        .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
        .services_128(ServiceList::Complete, &SERVICES_LIST)
        .build();

    static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
        .full_name(DEVICE_NAME)
        .build();

    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &ADV_DATA,
        scan_data: &SCAN_DATA,
    };
    let config = peripheral::Config {
        interval: ADV_INTERVAL,
        ..Default::default()
    };

    let mut connected_once = false;

    loop {
        let adv_fut = peripheral::advertise_connectable(sd, adv, &config);
        let conn = match select3(cmd_rx.receive(), payload_rx.receive(), adv_fut).await {
            Either3::First(RadioCommand::Disable) => return,
            Either3::First(RadioCommand::Enable) => continue,
            Either3::Second(update) => {
                // No peer yet: keep the stored value fresh so the first
                // read after a connect returns the latest fix.
                store_position(sd, server, &update);
                continue;
            }
            Either3::Third(Ok(conn)) => conn,
            Either3::Third(Err(e)) => {
                error!("Advertising failed: {:?}", e);
                if connected_once {
                    // The episode was up once; leave the radio on but
                    // silent and let the user cycle it to recover.
                    event_tx.send(RadioEvent::Fault(BleError::AdvertiseFailed)).await;
                    silent_until_disabled(sd, server, cmd_rx, payload_rx).await;
                } else {
                    event_tx.send(RadioEvent::EnableFailed).await;
                }
                return;
            }
        };

        connected_once = true;
        info!("Device connected");
        event_tx.send(RadioEvent::Connected).await;

        match attend_peer(sd, server, &conn, cmd_rx, payload_rx).await {
            SessionVerdict::PeerLost => {
                info!("Device disconnected");
                event_tx.send(RadioEvent::Disconnected).await;
                // Looping restarts the advertiser before any further
                // peer event can be produced.
            }
            SessionVerdict::Disabled => {
                let _ = conn.disconnect();
                return;
            }
        }
    }
}

/// Serve one attached peer until it drops or the radio is disabled.
async fn attend_peer(
    sd: &'static Softdevice,
    server: &'static Server,
    conn: &Connection,
    cmd_rx: &CommandRx,
    payload_rx: &PayloadRx,
) -> SessionVerdict {
    let mut gatt = pin!(gatt_server::run(conn, server, |e| server.handle_event(e)));

    loop {
        match select3(cmd_rx.receive(), payload_rx.receive(), &mut gatt).await {
            Either3::First(RadioCommand::Disable) => return SessionVerdict::Disabled,
            Either3::First(RadioCommand::Enable) => {}
            Either3::Second(update) => {
                store_position(sd, server, &update);
                notify_position(server, conn, &update);
            }
            Either3::Third(_disconnected) => return SessionVerdict::PeerLost,
        }
    }
}

/// Advertising could not be restarted: stay reachable for commands and
/// keep the stored value current, but emit nothing over the air.
async fn silent_until_disabled(
    sd: &'static Softdevice,
    server: &'static Server,
    cmd_rx: &CommandRx,
    payload_rx: &PayloadRx,
) {
    loop {
        match select(cmd_rx.receive(), payload_rx.receive()).await {
            Either::First(RadioCommand::Disable) => return,
            Either::First(RadioCommand::Enable) => {}
            Either::Second(update) => store_position(sd, server, &update),
        }
    }
}

fn store_position(sd: &Softdevice, server: &Server, update: &Payload) {
    if server.location.set_position(sd, update.as_bytes()).is_err() {
        warn!("Storing the position value failed");
    }
}

/// Push one notification frame with the new value. Failures are logged
/// and not retried; the next update simply tries again.
fn notify_position(server: &Server, conn: &Connection, update: &Payload) {
    match gatt_server::notify_value(conn, server.location.position_handle(), update.as_bytes()) {
        Ok(()) => info!("BLE payload updated: {} bytes notified", update.len()),
        Err(NotifyValueError::Raw(RawError::BleGattsSysAttrMissing)) => {
            // Peer has not subscribed yet; the stored value is enough.
        }
        Err(e) => error!("Notify failed: {:?}", e),
    }
}

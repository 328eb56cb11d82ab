//! Location service: one characteristic carrying the latest position
//! payload, readable at any time and notified to subscribers on update.

use crate::payload::MAX_PAYLOAD_LEN;
use defmt::info;
use nrf_softdevice::ble::gatt_server::{self, SetValueError};
use nrf_softdevice::{gatt_server, gatt_service, Softdevice};

#[gatt_service(uuid = "12345678-1234-5678-1234-56789abcdef0")]
pub struct LocationService {
    #[characteristic(uuid = "abcdefab-cdef-1234-5678-1234567890ab", read, notify)]
    position: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
}

impl LocationService {
    pub(crate) fn handle(&self, event: LocationServiceEvent) {
        match event {
            LocationServiceEvent::PositionCccdWrite { notifications } => {
                info!("Position notifications: {}", notifications);
            }
        }
    }

    /// Attribute handle of the position value, for `notify_value`.
    pub(crate) fn position_handle(&self) -> u16 {
        self.position_value_handle
    }

    /// Write the characteristic's stored value so a later read returns
    /// the current payload even if no peer was attached at update time.
    pub(crate) fn set_position(&self, sd: &Softdevice, bytes: &[u8]) -> Result<(), SetValueError> {
        gatt_server::set_value(sd, self.position_value_handle, bytes)
    }
}

#[gatt_server]
pub struct Server {
    pub location: LocationService,
}

impl Server {
    pub(crate) fn handle_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::Location(e) => self.location.handle(e),
        }
    }
}

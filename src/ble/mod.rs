//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Location service** - one custom service with a read+notify
//!    position characteristic holding the latest fix.
//! 2. **Radio session task** - brings the advertiser up on command, runs
//!    the GATT server while a peer is connected, restarts advertising on
//!    disconnect, and tears everything down on the off command.
//!
//! Communication with other tasks is done via Embassy channels defined
//! in the crate root. Connect/disconnect are reported as events on a
//! single-consumer channel drained by the main loop, so no application
//! state is ever touched from the SoftDevice's callback context.

pub mod location;
pub mod peripheral;

use crate::error::BleError;
use defmt::Format;

/// Commands the main loop sends to the radio session task.
#[derive(Clone, Copy, Format)]
pub enum RadioCommand {
    /// Seed the characteristic and start advertising.
    Enable,
    /// Drop any peer link, stop advertising, go silent.
    Disable,
}

/// Events the radio session task publishes for the main loop.
#[derive(Clone, Copy, Format)]
pub enum RadioEvent {
    /// A peer established a link.
    Connected,
    /// The peer dropped; advertising has already been restarted.
    Disconnected,
    /// The off→on transition failed before any peer connected; the
    /// radio is off again.
    EnableFailed,
    /// A fault after the session was established; the radio stays on
    /// but may be silent until the next off/on cycle.
    Fault(BleError),
}

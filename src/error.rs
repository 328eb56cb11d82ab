//! Unified error type for wio-ble-beacon.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use defmt::Format;

/// Top-level error type used across the application.
#[derive(Debug, Format)]
pub enum Error {
    /// A payload update exceeded the single-notification limit and was
    /// rejected; the previous value stays in place.
    PayloadOversize { len: usize },

    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),
}

/// Subset of BLE errors we surface (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, Format)]
pub enum BleError {
    /// Advertising could not be started.
    AdvertiseFailed,
    /// Writing the characteristic's stored value failed.
    SetValueFailed,
    /// Pushing a notification to the peer failed.
    NotifyFailed,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}

//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// BLE identity

/// Device name carried in the scan response and GAP device-name attribute.
pub const DEVICE_NAME: &str = "WioTerminal";

/// 128-bit UUID of the location service.
///
/// Mirrors the string literal in the `gatt_service` attribute in
/// `ble/location.rs`; the two must stay in sync. The position
/// characteristic UUID lives only in that attribute.
pub const SERVICE_UUID: u128 = 0x12345678_1234_5678_1234_56789abcdef0;

/// Service UUIDs included in the advertising payload.
pub const SERVICES_LIST: [[u8; 16]; 1] = [SERVICE_UUID.to_le_bytes()];

/// ATT MTU configured into the SoftDevice. 247 bytes lets a full
/// 244-byte position payload travel in a single notification.
pub const ATT_MTU: usize = 247;

/// Advertising interval in 625 µs units (75 ≈ 47 ms).
pub const ADV_INTERVAL: u32 = 75;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Toggle button  → P0.11 (middle top pushbutton, active-low, pull-up)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 200;

/// Button sampling period of the input task (ms).
pub const BUTTON_POLL_MS: u64 = 10;

/// Period of the canned-fix publisher (`demo-payload` feature only).
#[cfg(feature = "demo-payload")]
pub const DEMO_PAYLOAD_PERIOD_SECS: u64 = 5;

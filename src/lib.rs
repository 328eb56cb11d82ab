//! Test-only library interface for wio-ble-beacon.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required): the radio lifecycle
//! state machine, the payload store, and the button edge detector.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

// Internal module paths for the actual implementations
#[path = "payload.rs"]
mod payload_impl;
#[path = "radio_logic.rs"]
mod radio_logic_impl;
#[path = "ui/input_logic.rs"]
mod ui_input_logic_impl;

// ═══════════════════════════════════════════════════════════════════════════
// Pure-logic Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub mod radio {
    pub use crate::radio_logic_impl::{PressAction, PublishPlan, RadioCore, RadioState};
}

pub mod payload {
    pub use crate::payload_impl::{Oversize, Payload, DEFAULT_PAYLOAD, MAX_PAYLOAD_LEN};
}

pub mod ui {
    pub mod input_logic {
        pub use crate::ui_input_logic_impl::EdgeDetector;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

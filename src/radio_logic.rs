//! Radio lifecycle and peer session state machine.
//!
//! Pure logic, owned by the main control loop and testable on the host.
//! The embedded side translates the returned decisions into SoftDevice
//! calls; this module never touches hardware.
//!
//! State diagram:
//!
//! ```text
//!           press
//!   Off ───────────▶ On (advertising, no peer)
//!    ▲                │
//!    │ press          │ peer connect
//!    │                ▼
//!    │             On (connected)
//!    │                │
//!    │ press          │ peer disconnect
//!    │                ▼
//!    └────────────── advertising resumes
//! ```

/// Whether the radio is currently enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioState {
    Off,
    On,
}

/// What a button press asks the radio session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressAction {
    /// Bring the service up and start advertising.
    TurnOn,
    /// Tear the session down; an attached peer is dropped with it.
    TurnOff,
}

/// Where a payload update must be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishPlan {
    /// Write the characteristic's stored value (radio on).
    pub store: bool,
    /// Push a notification frame (radio on and a peer attached).
    pub notify: bool,
}

/// Radio lifecycle + peer session tracker.
///
/// Invariant: `peer_attached` implies `state == On`. Every transition
/// below preserves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadioCore {
    state: RadioState,
    peer_attached: bool,
}

impl RadioCore {
    /// Boot state: radio off, no peer.
    pub const fn new() -> Self {
        Self {
            state: RadioState::Off,
            peer_attached: false,
        }
    }

    pub fn state(&self) -> RadioState {
        self.state
    }

    pub fn peer_attached(&self) -> bool {
        self.peer_attached
    }

    /// Flip the radio state on a debounced press.
    ///
    /// Turning off while a peer is connected does not wait for a graceful
    /// detach; the session teardown terminates the link, so the peer flag
    /// clears here and the eventual disconnect event is a no-op.
    pub fn on_press(&mut self) -> PressAction {
        match self.state {
            RadioState::Off => {
                self.state = RadioState::On;
                PressAction::TurnOn
            }
            RadioState::On => {
                self.state = RadioState::Off;
                self.peer_attached = false;
                PressAction::TurnOff
            }
        }
    }

    /// Revert a failed off→on transition; the next press retries.
    pub fn enable_failed(&mut self) {
        self.state = RadioState::Off;
        self.peer_attached = false;
    }

    /// A peer established a link.
    ///
    /// Ignored while off: the session is already unwinding and the link
    /// is doomed, so the invariant must not be broken for it.
    pub fn on_peer_connected(&mut self) {
        if self.state == RadioState::On {
            self.peer_attached = true;
        }
    }

    /// A peer dropped. Returns `true` when the advertiser must be
    /// restarted so the next peer can discover the device.
    pub fn on_peer_disconnected(&mut self) -> bool {
        self.peer_attached = false;
        self.state == RadioState::On
    }

    /// Gate a payload update against the current state.
    pub fn publish_plan(&self) -> PublishPlan {
        PublishPlan {
            store: self.state == RadioState::On,
            notify: self.state == RadioState::On && self.peer_attached,
        }
    }
}

impl Default for RadioCore {
    fn default() -> Self {
        Self::new()
    }
}

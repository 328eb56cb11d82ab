//! Integration tests for the wio-ble-beacon host-testable logic.
//!
//! A small simulated radio stack records advertiser starts, the
//! characteristic's stored value, and emitted notification frames, and a
//! `Beacon` harness drives it the way the firmware's session task does:
//! presses toggle the session, connect/disconnect events update the peer
//! tracker, payload updates go through the publish gating.

use wio_ble_beacon::payload::{Oversize, Payload, DEFAULT_PAYLOAD, MAX_PAYLOAD_LEN};
use wio_ble_beacon::radio::{PressAction, RadioCore, RadioState};

/// Simulated radio stack.
#[derive(Default)]
struct StackSim {
    /// Number of times the advertiser was (re)started.
    advertiser_starts: u32,
    /// Whether the advertiser is currently running.
    advertising: bool,
    /// Characteristic stored value; `None` while the service is down.
    stored: Option<Vec<u8>>,
    /// Notification frames pushed to the peer, in order.
    notifications: Vec<Vec<u8>>,
}

/// The device: state machine + payload store wired to the simulated stack.
struct Beacon {
    core: RadioCore,
    payload: Payload,
    stack: StackSim,
}

impl Beacon {
    fn boot() -> Self {
        Self {
            core: RadioCore::new(),
            payload: Payload::seed(),
            stack: StackSim::default(),
        }
    }

    fn press(&mut self) {
        match self.core.on_press() {
            PressAction::TurnOn => {
                // Seed the characteristic, then advertise.
                self.stack.stored = Some(self.payload.as_bytes().to_vec());
                self.stack.advertising = true;
                self.stack.advertiser_starts += 1;
            }
            PressAction::TurnOff => {
                // Session teardown drops the graph and the link with it.
                self.stack.stored = None;
                self.stack.advertising = false;
            }
        }
    }

    fn peer_connects(&mut self) {
        self.core.on_peer_connected();
        self.stack.advertising = false;
    }

    fn peer_drops(&mut self) {
        if self.core.on_peer_disconnected() {
            self.stack.advertising = true;
            self.stack.advertiser_starts += 1;
        }
    }

    fn set_payload(&mut self, bytes: &[u8]) -> Result<(), Oversize> {
        self.payload.set(bytes)?;
        let plan = self.core.publish_plan();
        if plan.store {
            self.stack.stored = Some(bytes.to_vec());
        }
        if plan.notify {
            self.stack.notifications.push(bytes.to_vec());
        }
        Ok(())
    }

    /// What a peer read of the characteristic returns.
    fn read_position(&self) -> Option<&[u8]> {
        self.stack.stored.as_deref()
    }
}

#[test]
fn cold_boot_is_off_and_silent() {
    let beacon = Beacon::boot();
    assert_eq!(beacon.core.state(), RadioState::Off);
    assert!(!beacon.core.peer_attached());
    assert!(!beacon.stack.advertising);
    assert!(beacon.read_position().is_none());
    assert!(beacon.stack.notifications.is_empty());
}

#[test]
fn first_press_starts_advertising_with_seeded_value() {
    let mut beacon = Beacon::boot();
    beacon.press();

    assert_eq!(beacon.core.state(), RadioState::On);
    assert!(beacon.stack.advertising);
    assert_eq!(beacon.stack.advertiser_starts, 1);
    assert_eq!(beacon.read_position(), Some(DEFAULT_PAYLOAD));
}

#[test]
fn connected_peer_reads_the_placeholder_fix() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();

    assert!(beacon.core.peer_attached());
    assert_eq!(beacon.read_position(), Some(DEFAULT_PAYLOAD));
}

#[test]
fn update_while_connected_notifies_exactly_once() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();

    let fix = b"{\"lat\":1.3,\"lon\":103.8}";
    beacon.set_payload(fix).unwrap();

    assert_eq!(beacon.stack.notifications.len(), 1);
    assert_eq!(beacon.stack.notifications[0], fix);
    assert_eq!(beacon.read_position(), Some(fix.as_slice()));
}

#[test]
fn update_while_unattached_stores_but_stays_quiet() {
    let mut beacon = Beacon::boot();
    beacon.press();

    beacon.set_payload(b"n 1.3000 e 103.8000").unwrap();
    assert!(beacon.stack.notifications.is_empty());
    assert_eq!(beacon.read_position(), Some(b"n 1.3000 e 103.8000".as_slice()));

    // A peer connecting afterwards reads the fresh value.
    beacon.peer_connects();
    assert_eq!(beacon.read_position(), Some(b"n 1.3000 e 103.8000".as_slice()));
}

#[test]
fn peer_drop_restarts_the_advertiser_exactly_once() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();
    beacon.peer_drops();

    assert!(!beacon.core.peer_attached());
    assert!(beacon.stack.advertising);
    assert_eq!(beacon.stack.advertiser_starts, 2);
}

#[test]
fn disable_while_connected_tears_everything_down() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();
    beacon.set_payload(b"{\"lat\":1.3,\"lon\":103.8}").unwrap();

    beacon.press();

    assert_eq!(beacon.core.state(), RadioState::Off);
    assert!(!beacon.core.peer_attached());
    assert!(!beacon.stack.advertising);
    assert!(beacon.read_position().is_none());

    // The straggling disconnect from the dropped link changes nothing.
    beacon.peer_drops();
    assert!(!beacon.stack.advertising);
    assert_eq!(beacon.stack.advertiser_starts, 1);
}

#[test]
fn re_enabling_reseeds_an_equivalent_service() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.set_payload(b"fix-1").unwrap();
    beacon.press(); // off; graph released

    assert!(beacon.read_position().is_none());

    beacon.press(); // on again
    assert_eq!(beacon.read_position(), Some(b"fix-1".as_slice()));
    assert!(beacon.stack.advertising);
}

#[test]
fn update_while_off_is_in_memory_only_until_next_enable() {
    let mut beacon = Beacon::boot();
    beacon.set_payload(b"early fix").unwrap();

    assert!(beacon.read_position().is_none());
    assert!(beacon.stack.notifications.is_empty());

    beacon.press();
    assert_eq!(beacon.read_position(), Some(b"early fix".as_slice()));
}

#[test]
fn oversize_update_never_corrupts_the_published_value() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();

    let too_big = vec![b'x'; MAX_PAYLOAD_LEN + 1];
    assert_eq!(
        beacon.set_payload(&too_big),
        Err(Oversize { len: MAX_PAYLOAD_LEN + 1 })
    );

    assert!(beacon.stack.notifications.is_empty());
    assert_eq!(beacon.read_position(), Some(DEFAULT_PAYLOAD));
}

#[test]
fn every_update_while_attached_yields_one_frame_in_order() {
    let mut beacon = Beacon::boot();
    beacon.press();
    beacon.peer_connects();

    for fix in [b"a".as_slice(), b"bb", b"ccc"] {
        beacon.set_payload(fix).unwrap();
    }

    assert_eq!(beacon.stack.notifications, vec![b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
}

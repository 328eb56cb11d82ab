/// Debounced press detector for a single active-low line.
///
/// Reports a press exactly once per idle→active transition, then ignores
/// the line for the debounce interval so contact bounce cannot retrigger.
/// Timestamp-based rather than delay-based, so the sampling loop stays
/// responsive. Release events are not reported.
#[derive(Clone, Debug)]
pub struct EdgeDetector {
    debounce_ms: u64,
    last_active: bool,
    hold_until_ms: u64,
}

impl EdgeDetector {
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_active: false,
            hold_until_ms: 0,
        }
    }

    /// Feed one sample. `active` is the debounced-for level (`true` =
    /// pressed), `now_ms` a monotonic timestamp. Returns `true` on a
    /// press edge.
    pub fn poll(&mut self, active: bool, now_ms: u64) -> bool {
        if now_ms < self.hold_until_ms {
            // Inside the debounce window: samples are bounce, drop them.
            return false;
        }

        let pressed = active && !self.last_active;
        self.last_active = active;
        if pressed {
            self.hold_until_ms = now_ms + self.debounce_ms;
        }
        pressed
    }
}

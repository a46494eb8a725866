//! Wall-clock bookkeeping between animation callbacks.

/// Tracks the timestamp of the previous frame in integer milliseconds.
///
/// There is no fixed timestep: the elapsed value is simply the distance
/// between consecutive display-refresh callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameClock {
    last_ms: Option<u64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.last_ms.is_some()
    }

    pub fn start(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    /// Milliseconds since the previous `start`/`tick`, then records `now_ms`.
    /// An unstarted clock, or a clock that moved backwards, reports 0.
    pub fn tick(&mut self, now_ms: u64) -> u64 {
        let elapsed = self
            .last_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_ms = Some(now_ms);
        elapsed
    }
}

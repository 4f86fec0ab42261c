//! One-shot delayed calls
//!
//! A pending call is owned by whoever scheduled it. Cancelling is dropping
//! the value (`Option::take`), so a cancelled call can never fire.

/// Fires once after `delay_ms` of simulated time
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedCall {
    delay_ms: f32,
    elapsed_ms: f32,
}

impl DelayedCall {
    pub fn new(delay_ms: f32) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms`. Returns true on the tick the delay elapses.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if self.is_done() {
            return false;
        }
        self.elapsed_ms += dt_ms;
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.delay_ms
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        (self.delay_ms - self.elapsed_ms).max(0.0)
    }
}

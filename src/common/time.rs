//! Simple time helpers for latency fields in log events.

use std::time::Instant;

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> u128 {
    start.elapsed().as_millis()
}

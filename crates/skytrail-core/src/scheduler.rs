//! The per-frame scheduling port.
//!
//! The engine never loops on its own. After each tick that leaves the flight
//! running it asks the host for one more frame; the host later hands the
//! request back to [`crate::engine::FlightEngine::on_frame`]. A request that
//! is already queued cannot be withdrawn, so the engine checks on delivery
//! whether the flight it was issued for is still live.

use std::collections::VecDeque;

/// Token for one requested frame, tied to the flight that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub flight_id: u64,
}

pub trait FrameScheduler {
    fn request_frame(&mut self, request: FrameRequest);
}

/// FIFO of pending frames. Tests and the terminal host pop from it and feed
/// the engine at whatever pace they like.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<FrameRequest>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, request: FrameRequest) {
        self.pending.push_back(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.request_frame(FrameRequest { flight_id: 1 });
        scheduler.request_frame(FrameRequest { flight_id: 2 });
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.next(), Some(FrameRequest { flight_id: 1 }));
        assert_eq!(scheduler.next(), Some(FrameRequest { flight_id: 2 }));
        assert!(scheduler.next().is_none());
    }
}

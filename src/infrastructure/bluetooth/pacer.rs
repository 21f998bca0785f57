//! Remote-Control Pacing
//!
//! Decision core for the periodic command stream. The driver loop owns the
//! actual timer and forwards ticks; this type decides which frames may go
//! out so that at most one write is ever in flight and stopping always ends
//! with a neutral frame on the wire.

use crate::domain::control::ControlVector;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Pacer {
    active: bool,
    in_flight: bool,
    /// Stop arrived while a write was in flight; the neutral frame goes out
    /// on the acknowledgment instead.
    pending_neutral: bool,
    target: ControlVector,
    skipped_ticks: u64,
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> ControlVector {
        self.target
    }

    /// Latch a new target. The frame on the wire changes at the next tick,
    /// never mid-interval.
    pub fn set_target(&mut self, target: ControlVector) {
        self.target = target;
    }

    /// Number of ticks dropped because the previous write was still pending.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    /// Start pacing. Returns whether the pacer was actually off before.
    pub fn arm(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.pending_neutral = false;
        self.skipped_ticks = 0;
        true
    }

    /// Stop pacing. Returns the neutral frame to write now, or `None` when
    /// either nothing was active or a write is still in flight, in which
    /// case the neutral frame is deferred to [`on_write_acknowledged`].
    ///
    /// [`on_write_acknowledged`]: Self::on_write_acknowledged
    pub fn disarm(&mut self) -> Option<Vec<u8>> {
        if !self.active {
            return None;
        }
        self.active = false;
        if self.in_flight {
            self.pending_neutral = true;
            return None;
        }
        self.in_flight = true;
        Some(ControlVector::neutral().encode())
    }

    /// A timer tick. Returns the frame to write, or `None` when the pacer is
    /// off (stale tick after a stop) or the previous write is unacknowledged.
    pub fn on_tick(&mut self) -> Option<Vec<u8>> {
        if !self.active {
            return None;
        }
        if self.in_flight {
            self.skipped_ticks += 1;
            debug!(
                skipped = self.skipped_ticks,
                "Control write still in flight, skipping tick"
            );
            return None;
        }
        self.in_flight = true;
        Some(self.target.encode())
    }

    /// The outstanding write finished. Returns the deferred neutral frame if
    /// a stop happened while that write was in flight.
    pub fn on_write_acknowledged(&mut self) -> Option<Vec<u8>> {
        self.in_flight = false;
        if self.pending_neutral {
            self.pending_neutral = false;
            self.in_flight = true;
            return Some(ControlVector::neutral().encode());
        }
        None
    }

    /// The frame handed out could not even be submitted, nothing is in
    /// flight after all.
    pub fn on_write_rejected(&mut self) {
        self.in_flight = false;
        self.pending_neutral = false;
    }

    /// The link is gone. Forget everything without producing frames; there
    /// is no wire to put a neutral command on.
    pub fn reset(&mut self) {
        self.active = false;
        self.in_flight = false;
        self.pending_neutral = false;
        self.target = ControlVector::neutral();
        self.skipped_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_frame() -> Vec<u8> {
        ControlVector::neutral().encode()
    }

    #[test]
    fn test_tick_sends_latched_target() {
        let mut pacer = Pacer::new();
        let target = ControlVector::new(10, -5, 0, 100);
        pacer.set_target(target);
        assert!(pacer.arm());
        assert!(!pacer.arm());

        assert_eq!(pacer.on_tick(), Some(target.encode()));

        // Unacknowledged write blocks the next tick.
        assert_eq!(pacer.on_tick(), None);
        assert_eq!(pacer.skipped_ticks(), 1);

        assert_eq!(pacer.on_write_acknowledged(), None);
        assert_eq!(pacer.on_tick(), Some(target.encode()));
    }

    #[test]
    fn test_target_set_before_arming_is_latched() {
        let mut pacer = Pacer::new();
        pacer.set_target(ControlVector::new(1, 2, 3, 4));
        pacer.arm();
        assert_eq!(pacer.on_tick(), Some(ControlVector::new(1, 2, 3, 4).encode()));
    }

    #[test]
    fn test_stop_sends_neutral_when_nothing_in_flight() {
        let mut pacer = Pacer::new();
        pacer.set_target(ControlVector::new(50, 50, 50, 50));
        pacer.arm();
        pacer.on_tick();
        pacer.on_write_acknowledged();

        assert_eq!(pacer.disarm(), Some(neutral_frame()));
        assert!(!pacer.is_active());

        // The neutral frame itself occupies the in-flight slot.
        assert_eq!(pacer.on_tick(), None);
        assert_eq!(pacer.on_write_acknowledged(), None);
    }

    #[test]
    fn test_stop_defers_neutral_while_in_flight() {
        let mut pacer = Pacer::new();
        pacer.set_target(ControlVector::new(50, 0, 50, 0));
        pacer.arm();
        assert!(pacer.on_tick().is_some());

        // Stop while the target frame is unacknowledged.
        assert_eq!(pacer.disarm(), None);
        assert!(!pacer.is_active());
        assert_eq!(pacer.on_tick(), None);

        // Acknowledgment releases exactly one neutral frame.
        assert_eq!(pacer.on_write_acknowledged(), Some(neutral_frame()));
        assert_eq!(pacer.on_write_acknowledged(), None);
    }

    #[test]
    fn test_stale_tick_after_stop_is_dropped() {
        let mut pacer = Pacer::new();
        pacer.arm();
        assert!(pacer.disarm().is_some());
        assert_eq!(pacer.on_tick(), None);
        assert_eq!(pacer.skipped_ticks(), 0);
    }

    #[test]
    fn test_disarm_when_never_armed_is_silent() {
        let mut pacer = Pacer::new();
        assert_eq!(pacer.disarm(), None);
        assert_eq!(pacer.on_tick(), None);
    }

    #[test]
    fn test_rejected_submission_frees_the_slot() {
        let mut pacer = Pacer::new();
        pacer.arm();
        assert!(pacer.on_tick().is_some());
        pacer.on_write_rejected();
        assert!(pacer.on_tick().is_some());
    }

    #[test]
    fn test_reset_produces_no_frames_and_clears_target() {
        let mut pacer = Pacer::new();
        pacer.set_target(ControlVector::new(30, 30, 30, 30));
        pacer.arm();
        pacer.on_tick();
        pacer.disarm(); // pending neutral now latched

        pacer.reset();
        assert!(!pacer.is_active());
        assert_eq!(pacer.on_write_acknowledged(), None);
        assert_eq!(pacer.target(), ControlVector::neutral());
    }
}

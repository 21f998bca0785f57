//! Trip Recording
//!
//! Ride statistics accumulated from committed speed updates while a trip is
//! active. Time is passed in by the caller so the math stays testable.

use std::time::{Duration, Instant};

/// Readable copy of the trip counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripStats {
    pub current_speed: f64,
    /// Most negative speed seen, stays 0 unless the vehicle reversed.
    pub min_speed: f64,
    pub max_speed: f64,
    pub average_speed: f64,
    /// Signed integral of speed over time, in km. Reversing subtracts.
    pub distance_km: f64,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct TripRecorder {
    recording: bool,
    started_at: Option<Instant>,
    last_sample: Option<Instant>,
    sum: f64,
    samples: u64,
    stats: TripStats,
}

impl TripRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Counters from the current trip, or from the last one once stopped.
    pub fn stats(&self) -> TripStats {
        self.stats
    }

    /// Begin a trip at `now`. Restarting discards the previous counters.
    pub fn start(&mut self, now: Instant) {
        self.recording = true;
        self.started_at = Some(now);
        self.last_sample = Some(now);
        self.sum = 0.0;
        self.samples = 0;
        self.stats = TripStats::default();
    }

    /// End the trip. Counters stay readable until the next [`start`](Self::start).
    pub fn stop(&mut self) {
        self.recording = false;
        self.started_at = None;
        self.last_sample = None;
    }

    /// Feed one speed sample in km/h. Returns whether the counters changed.
    pub fn record(&mut self, speed: f64, now: Instant) -> bool {
        if !self.recording {
            return false;
        }

        self.stats.current_speed = speed;
        self.stats.min_speed = self.stats.min_speed.min(speed);
        self.stats.max_speed = self.stats.max_speed.max(speed);

        self.sum += speed;
        self.samples += 1;
        self.stats.average_speed = self.sum / self.samples as f64;

        if let Some(last) = self.last_sample {
            let hours = now.saturating_duration_since(last).as_secs_f64() / 3600.0;
            self.stats.distance_km += speed * hours;
        }
        self.last_sample = Some(now);

        if let Some(started) = self.started_at {
            self.stats.elapsed = now.saturating_duration_since(started);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_integrates_over_time() {
        let base = Instant::now();
        let mut trip = TripRecorder::new();
        trip.start(base);

        // 36 km/h for 100 s is exactly 1 km.
        assert!(trip.record(36.0, base + Duration::from_secs(50)));
        assert!(trip.record(36.0, base + Duration::from_secs(100)));

        let stats = trip.stats();
        assert!((stats.distance_km - 1.0).abs() < 1e-9);
        assert_eq!(stats.elapsed, Duration::from_secs(100));
        assert_eq!(stats.average_speed, 36.0);
        assert_eq!(stats.max_speed, 36.0);
        assert_eq!(stats.min_speed, 0.0);
    }

    #[test]
    fn test_reverse_counts_negative() {
        let base = Instant::now();
        let mut trip = TripRecorder::new();
        trip.start(base);
        trip.record(-10.0, base + Duration::from_secs(36));

        let stats = trip.stats();
        assert_eq!(stats.min_speed, -10.0);
        assert!((stats.distance_km + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_stop_freezes_counters() {
        let base = Instant::now();
        let mut trip = TripRecorder::new();
        trip.start(base);
        trip.record(20.0, base + Duration::from_secs(10));
        trip.stop();

        let frozen = trip.stats();
        assert!(!trip.is_recording());
        assert!(!trip.record(50.0, base + Duration::from_secs(20)));
        assert_eq!(trip.stats(), frozen);

        // Restarting clears the previous trip.
        trip.start(base + Duration::from_secs(30));
        assert_eq!(trip.stats(), TripStats::default());
    }

    #[test]
    fn test_samples_before_start_are_ignored() {
        let mut trip = TripRecorder::new();
        assert!(!trip.record(12.0, Instant::now()));
        assert_eq!(trip.stats(), TripStats::default());
    }
}

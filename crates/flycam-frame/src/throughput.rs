use std::time::{Duration, Instant};

/// Wire rate over one reporting interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    pub kib_per_sec: f64,
    pub fps: f64,
    pub elapsed: Duration,
}

/// Accumulates received bytes and frames, reporting once per interval.
#[derive(Debug, Clone)]
pub struct Throughput {
    interval: Duration,
    started: Option<Instant>,
    bytes: u64,
    frames: u64,
}

impl Throughput {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started: None,
            bytes: 0,
            frames: 0,
        }
    }

    pub fn record(&mut self, bytes: usize) -> Option<ThroughputReport> {
        self.record_at(bytes, Instant::now())
    }

    /// Count one frame of `bytes` seen at `now`. Returns a report and starts a
    /// new interval once `interval` has elapsed since the first frame of the
    /// current one.
    pub fn record_at(&mut self, bytes: usize, now: Instant) -> Option<ThroughputReport> {
        let started = *self.started.get_or_insert(now);
        self.bytes += bytes as u64;
        self.frames += 1;

        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }

        let secs = elapsed.as_secs_f64();
        let report = ThroughputReport {
            kib_per_sec: self.bytes as f64 / 1024.0 / secs,
            fps: self.frames as f64 / secs,
            elapsed,
        };
        self.started = Some(now);
        self.bytes = 0;
        self.frames = 0;
        Some(report)
    }
}

impl Default for Throughput {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_after_interval() {
        let mut meter = Throughput::new(Duration::from_secs(1));
        let t0 = Instant::now();

        assert!(meter.record_at(1024, t0).is_none());
        assert!(meter.record_at(1024, t0 + Duration::from_millis(500)).is_none());
        let report = meter
            .record_at(2048, t0 + Duration::from_secs(2))
            .unwrap();

        assert_eq!(report.elapsed, Duration::from_secs(2));
        assert!((report.kib_per_sec - 2.0).abs() < 1e-9);
        assert!((report.fps - 1.5).abs() < 1e-9);
    }

    #[test]
    fn counters_reset_between_intervals() {
        let mut meter = Throughput::new(Duration::from_secs(1));
        let t0 = Instant::now();
        meter.record_at(10_240, t0);
        meter.record_at(10_240, t0 + Duration::from_secs(1)).unwrap();

        assert!(meter.record_at(1024, t0 + Duration::from_millis(1500)).is_none());
        let report = meter.record_at(1024, t0 + Duration::from_secs(2)).unwrap();
        assert!((report.kib_per_sec - 2.0).abs() < 1e-9);
        assert!((report.fps - 2.0).abs() < 1e-9);
    }
}

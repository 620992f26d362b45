use flowline_protocol::Timestamp;
use serde::{Deserialize, Serialize};

/// Linear mapping between the visible time window and horizontal pixels of
/// the timeline area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub start_ts: Timestamp,
    pub end_ts: Timestamp,
    pub px_start: f64,
    pub px_end: f64,
}

impl TimeScale {
    pub fn new(start_ts: Timestamp, end_ts: Timestamp, px_start: f64, px_end: f64) -> Self {
        Self {
            start_ts,
            end_ts,
            px_start,
            px_end,
        }
    }

    fn px_per_tick(&self) -> f64 {
        let span = (self.end_ts - self.start_ts) as f64;
        if span <= 0.0 {
            0.0
        } else {
            (self.px_end - self.px_start) / span
        }
    }

    /// Pixel position of `ts`. Times outside the window map outside
    /// `px_start..px_end`; a zero-length window maps everything to
    /// `px_start`.
    pub fn ts_to_px(&self, ts: Timestamp) -> f64 {
        self.px_start + (ts - self.start_ts) as f64 * self.px_per_tick()
    }

    /// Inverse of [`ts_to_px`](Self::ts_to_px), rounded to the nearest tick.
    pub fn px_to_ts(&self, px: f64) -> Timestamp {
        let scale = self.px_per_tick();
        if scale == 0.0 {
            return self.start_ts;
        }
        self.start_ts + ((px - self.px_start) / scale).round() as Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_window_onto_pixels() {
        let scale = TimeScale::new(1_000, 2_000, 0.0, 500.0);
        assert_eq!(scale.ts_to_px(1_000), 0.0);
        assert_eq!(scale.ts_to_px(1_500), 250.0);
        assert_eq!(scale.ts_to_px(2_000), 500.0);
        assert_eq!(scale.ts_to_px(500), -250.0);
    }

    #[test]
    fn px_to_ts_inverts() {
        let scale = TimeScale::new(0, 1_000, 100.0, 600.0);
        assert_eq!(scale.px_to_ts(100.0), 0);
        assert_eq!(scale.px_to_ts(350.0), 500);
        assert_eq!(scale.px_to_ts(scale.ts_to_px(731)), 731);
    }

    #[test]
    fn zero_length_window() {
        let scale = TimeScale::new(50, 50, 10.0, 400.0);
        assert_eq!(scale.ts_to_px(50), 10.0);
        assert_eq!(scale.ts_to_px(9_999), 10.0);
        assert_eq!(scale.px_to_ts(300.0), 50);
    }
}

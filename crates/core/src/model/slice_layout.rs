use flowline_protocol::Timestamp;
use serde::{Deserialize, Serialize};

use super::registry::{SliceGeometry, SliceRect};

/// Depth-row layout of a slice track: each nesting level gets a fixed-height
/// row below a top padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceTrackLayout {
    pub padding: f64,
    pub slice_height: f64,
    pub row_spacing: f64,
    /// Deepest depth the track draws; deeper slices have no rect.
    pub max_depth: Option<u32>,
}

impl Default for SliceTrackLayout {
    fn default() -> Self {
        Self {
            padding: 3.0,
            slice_height: 18.0,
            row_spacing: 0.0,
            max_depth: None,
        }
    }
}

impl SliceTrackLayout {
    /// Height of the panel needed to show `depth_count` rows.
    pub fn track_height(&self, depth_count: u32) -> f64 {
        let rows = f64::from(depth_count.max(1));
        self.padding * 2.0 + rows * self.slice_height + (rows - 1.0) * self.row_spacing
    }
}

impl SliceGeometry for SliceTrackLayout {
    fn slice_rect(&self, start: Timestamp, end: Timestamp, depth: u32) -> Option<SliceRect> {
        if end < start {
            return None;
        }
        if self.max_depth.is_some_and(|max| depth > max) {
            return None;
        }
        Some(SliceRect {
            top: self.padding + f64::from(depth) * (self.slice_height + self.row_spacing),
            height: self.slice_height,
        })
    }
}

use std::collections::HashMap;

use flowline_protocol::{GroupId, Timestamp, TrackId};
use serde::{Deserialize, Serialize};

/// Vertical geometry of a slice inside its track panel, relative to the
/// panel's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceRect {
    pub top: f64,
    pub height: f64,
}

/// A track panel's own answer to "where is this slice drawn?".
///
/// Returns `None` when the slice is not at a renderable position (for
/// example deeper than the track shows).
pub trait SliceGeometry {
    fn slice_rect(&self, start: Timestamp, end: Timestamp, depth: u32) -> Option<SliceRect>;
}

/// A laid-out track panel.
#[derive(Clone, Copy)]
pub struct TrackPanelInfo<'p> {
    pub panel: &'p dyn SliceGeometry,
    pub y_start: f64,
}

/// A laid-out track-group header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGroupPanelInfo {
    pub y_start: f64,
    pub height: f64,
}

/// One panel as handed over by the layout pass.
pub enum Panel<'p> {
    /// A track panel. A single panel may display several trace tracks
    /// (e.g. merged thread tracks).
    Track {
        track_ids: &'p [TrackId],
        geometry: &'p dyn SliceGeometry,
    },
    /// The header of a track group.
    TrackGroup { group_id: &'p str },
}

/// Screen positions of every panel laid out in the current render pass.
///
/// Built fresh each frame while panels are laid out top to bottom, then
/// only read by the flow resolvers.
#[derive(Default)]
pub struct PanelRegistry<'p> {
    tracks: HashMap<TrackId, TrackPanelInfo<'p>>,
    groups: HashMap<GroupId, TrackGroupPanelInfo>,
    track_groups: HashMap<TrackId, GroupId>,
}

impl<'p> PanelRegistry<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a panel's vertical placement. `height` is only kept for
    /// group panels; track geometry comes from the panel itself.
    pub fn register_panel(&mut self, panel: Panel<'p>, y_start: f64, height: f64) {
        match panel {
            Panel::Track {
                track_ids,
                geometry,
            } => {
                for &track_id in track_ids {
                    self.tracks.insert(
                        track_id,
                        TrackPanelInfo {
                            panel: geometry,
                            y_start,
                        },
                    );
                }
            }
            Panel::TrackGroup { group_id } => {
                self.groups
                    .insert(group_id.into(), TrackGroupPanelInfo { y_start, height });
            }
        }
    }

    /// Record that `track_id` belongs to a track group, whether or not the
    /// track itself is currently laid out.
    pub fn set_track_group(&mut self, track_id: TrackId, group_id: impl Into<GroupId>) {
        self.track_groups.insert(track_id, group_id.into());
    }

    pub fn track_panel(&self, track_id: TrackId) -> Option<&TrackPanelInfo<'p>> {
        self.tracks.get(&track_id)
    }

    pub fn group_panel(&self, group_id: &str) -> Option<&TrackGroupPanelInfo> {
        self.groups.get(group_id)
    }

    pub fn track_group(&self, track_id: TrackId) -> Option<&str> {
        self.track_groups.get(&track_id).map(GroupId::as_str)
    }

    /// The laid-out header of the group `track_id` belongs to.
    pub fn group_panel_for_track(&self, track_id: TrackId) -> Option<&TrackGroupPanelInfo> {
        self.track_group(track_id)
            .and_then(|group_id| self.group_panel(group_id))
    }
}

//! Serializable description of one frame: panel layout, time window,
//! selection and style. Lets hosts that cannot hand over live panel objects
//! (WASM, snapshot tests) drive a flow render pass from JSON.

use std::collections::HashSet;

use flowline_protocol::{GroupId, RenderCommand, TrackId, Viewport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FlowStyle;
use crate::model::{FlowSelection, Panel, PanelRegistry, SliceTrackLayout, TimeScale};
use crate::views::flow_events::{FlowFrame, render_flow_events};

#[derive(Debug, Error)]
pub enum FrameSpecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("track group {0:?} is declared more than once")]
    DuplicateGroup(GroupId),
}

/// A track panel: one or more trace tracks drawn with one slice layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSpec {
    pub track_ids: Vec<TrackId>,
    pub height: f64,
    #[serde(default)]
    pub layout: SliceTrackLayout,
}

/// Top-level panels in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelSpec {
    Track(TrackSpec),
    /// A group header followed, when expanded, by its member tracks.
    Group {
        id: GroupId,
        height: f64,
        #[serde(default)]
        collapsed: bool,
        #[serde(default)]
        tracks: Vec<TrackSpec>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSpec {
    pub viewport: Viewport,
    pub time_scale: TimeScale,
    /// Vertical scroll of the panel container.
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub style: FlowStyle,
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
    #[serde(default)]
    pub selection: FlowSelection,
}

impl FrameSpec {
    pub fn from_json(data: &[u8]) -> Result<Self, FrameSpecError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Lay the panels out top to bottom and register each one.
    ///
    /// Member tracks of a collapsed group are not laid out, but their group
    /// membership is still recorded so flows can anchor on the header.
    pub fn build_registry(&self) -> Result<PanelRegistry<'_>, FrameSpecError> {
        let mut registry = PanelRegistry::new();
        let mut seen_groups: HashSet<&str> = HashSet::new();
        let mut y = -self.scroll_y;

        for panel in &self.panels {
            match panel {
                PanelSpec::Track(track) => {
                    register_track(&mut registry, track, y);
                    y += track.height;
                }
                PanelSpec::Group {
                    id,
                    height,
                    collapsed,
                    tracks,
                } => {
                    if !seen_groups.insert(id.as_str()) {
                        return Err(FrameSpecError::DuplicateGroup(id.clone()));
                    }
                    registry.register_panel(Panel::TrackGroup { group_id: id }, y, *height);
                    y += height;

                    for track in tracks {
                        for &track_id in &track.track_ids {
                            registry.set_track_group(track_id, id.clone());
                        }
                        if !collapsed {
                            register_track(&mut registry, track, y);
                            y += track.height;
                        }
                    }
                }
            }
        }

        Ok(registry)
    }

    pub fn render(&self) -> Result<Vec<RenderCommand>, FrameSpecError> {
        let registry = self.build_registry()?;
        let frame = FlowFrame {
            registry: &registry,
            time_scale: self.time_scale,
            viewport: self.viewport,
            selection: &self.selection,
            style: &self.style,
        };
        Ok(render_flow_events(&frame))
    }
}

fn register_track<'p>(registry: &mut PanelRegistry<'p>, track: &'p TrackSpec, y: f64) {
    registry.register_panel(
        Panel::Track {
            track_ids: &track.track_ids,
            geometry: &track.layout,
        },
        y,
        track.height,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{
        "viewport": {"width": 1250, "height": 400},
        "time_scale": {"start_ts": 0, "end_ts": 1000, "px_start": 0, "px_end": 1000},
        "scroll_y": 10,
        "panels": [
            {"kind": "track", "track_ids": [1], "height": 40},
            {"kind": "group", "id": "renderer", "height": 30, "collapsed": true,
             "tracks": [{"track_ids": [2, 3], "height": 60}]},
            {"kind": "group", "id": "gpu", "height": 30,
             "tracks": [{"track_ids": [4], "height": 50}]}
        ]
    }"#;

    #[test]
    fn lays_out_panels_top_to_bottom() {
        let spec = FrameSpec::from_json(FRAME.as_bytes()).unwrap();
        let registry = spec.build_registry().unwrap();

        assert_eq!(registry.track_panel(1).map(|t| t.y_start), Some(-10.0));
        // Collapsed members have no panel but keep their membership.
        assert!(registry.track_panel(2).is_none());
        assert_eq!(registry.track_group(3), Some("renderer"));
        assert_eq!(
            registry.group_panel("renderer").map(|g| (g.y_start, g.height)),
            Some((30.0, 30.0))
        );
        // Expanded group: header then its track.
        assert_eq!(
            registry.group_panel("gpu").map(|g| g.y_start),
            Some(60.0)
        );
        assert_eq!(registry.track_panel(4).map(|t| t.y_start), Some(90.0));
        assert_eq!(registry.track_group(4), Some("gpu"));
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let json = r#"{
            "viewport": {"width": 100, "height": 100},
            "time_scale": {"start_ts": 0, "end_ts": 10, "px_start": 0, "px_end": 100},
            "panels": [
                {"kind": "group", "id": "g", "height": 10},
                {"kind": "group", "id": "g", "height": 10}
            ]
        }"#;
        let spec = FrameSpec::from_json(json.as_bytes()).unwrap();
        assert!(matches!(
            spec.build_registry(),
            Err(FrameSpecError::DuplicateGroup(id)) if id.as_str() == "g"
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            FrameSpec::from_json(b"{\"viewport\":"),
            Err(FrameSpecError::Json(_))
        ));
    }

    #[test]
    fn frame_without_flows_renders_nothing() {
        let spec = FrameSpec::from_json(FRAME.as_bytes()).unwrap();
        assert!(spec.render().unwrap().is_empty());
    }
}

use serde::{Deserialize, Serialize};

/// Tunable constants for flow layout and drawing, in logical pixels unless
/// noted otherwise.
///
/// Every field has a default, so a partial JSON object overrides only the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowStyle {
    /// Inset of a group anchor above the group header's bottom edge.
    pub group_connection_offset: f64,
    /// Arrowhead size; also the pull-back of a curve ending in an arrowhead.
    pub triangle_size: f64,
    /// Radius of the marker at a vertical end anchor.
    pub circle_radius: f64,
    /// Radius of the marker at a vertical begin anchor.
    pub begin_circle_radius: f64,
    /// Distance of each Bezier control point from its anchor.
    pub bezier_offset: f64,
    /// Hue (degrees) for flows connected to the current selection.
    pub connected_hue: f64,
    /// Hue (degrees) for flows inside an explicitly selected area.
    pub selected_hue: f64,
    pub default_width: f64,
    pub focused_width: f64,
    /// Lightness percentages for the three emphasis tiers.
    pub default_intensity: f64,
    pub focused_intensity: f64,
    pub highlighted_intensity: f64,
    /// Width of the track-name column left of the timeline area.
    pub track_shell_width: f64,
}

impl Default for FlowStyle {
    fn default() -> Self {
        Self {
            group_connection_offset: 5.0,
            triangle_size: 5.0,
            circle_radius: 3.0,
            begin_circle_radius: 3.0,
            bezier_offset: 30.0,
            connected_hue: 10.0,
            selected_hue: 230.0,
            default_width: 2.0,
            focused_width: 3.0,
            default_intensity: 70.0,
            focused_intensity: 40.0,
            highlighted_intensity: 50.0,
            track_shell_width: 250.0,
        }
    }
}

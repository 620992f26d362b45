use flowline_protocol::{FlowPoint, TrackId};
use serde::{Deserialize, Serialize};

use crate::model::{PanelRegistry, SliceRect};

/// What a flow endpoint is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// The slice itself is visible; the anchor sits on its vertical center.
    Track,
    /// The track is hidden inside a group; the anchor sits on the group
    /// header.
    TrackGroup,
}

/// Resolved vertical anchor of one flow endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YConnection {
    pub y: f64,
    pub connection: ConnectionKind,
}

/// The side an endpoint's curve leaves (or enters) from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDirection {
    Left,
    Right,
    Up,
    Down,
}

impl LineDirection {
    /// Offset `(dx, dy)` of length `offset` along this direction.
    pub fn delta(self, offset: f64) -> (f64, f64) {
        match self {
            Self::Left => (-offset, 0.0),
            Self::Right => (offset, 0.0),
            Self::Up => (0.0, -offset),
            Self::Down => (0.0, offset),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// Where the panel showing `point`'s track draws its slice, if the track is
/// laid out and the slice is renderable.
pub fn resolve_slice_rect(registry: &PanelRegistry<'_>, point: &FlowPoint) -> Option<SliceRect> {
    let info = registry.track_panel(point.track_id)?;
    info.panel
        .slice_rect(point.slice_start_ts, point.slice_end_ts, point.depth)
}

/// Vertical anchor for an endpoint on `track_id`.
///
/// With a slice rect the anchor is the slice's vertical center clamped to
/// `[0, y_max]`. Without one the track must belong to a laid-out group and
/// the anchor sits `group_offset` above the group header's bottom edge.
pub fn resolve_connection_y(
    registry: &PanelRegistry<'_>,
    track_id: TrackId,
    y_max: f64,
    rect: Option<SliceRect>,
    group_offset: f64,
) -> Option<YConnection> {
    let Some(rect) = rect else {
        let group = registry.group_panel_for_track(track_id)?;
        return Some(YConnection {
            y: group.y_start + group.height - group_offset,
            connection: ConnectionKind::TrackGroup,
        });
    };

    let y_start = registry
        .track_panel(track_id)
        .map_or(0.0, |info| info.y_start);
    let y = y_start + rect.top + rect.height * 0.5;
    Some(YConnection {
        y: y.max(0.0).min(y_max),
        connection: ConnectionKind::Track,
    })
}

/// Exit directions for the begin and end anchors.
///
/// Track anchors leave left-to-right. A group anchor points toward the
/// other endpoint vertically: `Down` when it lies strictly below it, `Up`
/// otherwise (including ties).
pub fn resolve_directions(
    begin: &YConnection,
    end: &YConnection,
) -> (LineDirection, LineDirection) {
    let mut begin_dir = LineDirection::Left;
    let mut end_dir = LineDirection::Right;
    if begin.connection == ConnectionKind::TrackGroup {
        begin_dir = vertical_toward(begin.y, end.y);
    }
    if end.connection == ConnectionKind::TrackGroup {
        end_dir = vertical_toward(end.y, begin.y);
    }
    (begin_dir, end_dir)
}

fn vertical_toward(own_y: f64, other_y: f64) -> LineDirection {
    if own_y > other_y {
        LineDirection::Down
    } else {
        LineDirection::Up
    }
}

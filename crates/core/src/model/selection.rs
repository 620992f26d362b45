use std::collections::HashMap;

use flowline_protocol::{Flow, FlowId, SliceId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Key in [`FlowSelection::visible_categories`] that makes every category
/// visible.
pub const ALL_CATEGORIES: &str = "__all__";

/// The flows to draw this frame and the emphasis state that colors them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSelection {
    /// Flows touching the selected slice.
    pub connected_flows: Vec<Flow>,
    /// Flows inside an explicitly selected area, filtered by category.
    pub selected_flows: Vec<Flow>,
    pub visible_categories: HashMap<SmolStr, bool>,
    pub highlighted_slice_id: Option<SliceId>,
    pub focused_flow_id_left: Option<FlowId>,
    pub focused_flow_id_right: Option<FlowId>,
}

impl FlowSelection {
    fn category_enabled(&self, category: &str) -> bool {
        self.visible_categories
            .get(category)
            .copied()
            .unwrap_or(false)
    }

    /// Whether a selected-area flow passes the category filter: any one of
    /// its categories, or the wildcard, must be enabled.
    pub fn is_category_visible(&self, flow: &Flow) -> bool {
        self.category_enabled(ALL_CATEGORIES)
            || flow
                .categories()
                .into_iter()
                .any(|cat| self.category_enabled(cat))
    }

    pub fn is_focused(&self, flow: &Flow) -> bool {
        self.focused_flow_id_left == Some(flow.id) || self.focused_flow_id_right == Some(flow.id)
    }

    pub fn is_highlighted(&self, flow: &Flow) -> bool {
        self.highlighted_slice_id
            .is_some_and(|id| flow.begin.slice_id == id || flow.end.slice_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.connected_flows.is_empty() && self.selected_flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_protocol::FlowPoint;

    fn point(slice_id: SliceId) -> FlowPoint {
        FlowPoint {
            track_id: 1,
            slice_id,
            slice_start_ts: 0,
            slice_end_ts: 1,
            depth: 0,
            thread_name: SmolStr::default(),
            process_name: SmolStr::default(),
            slice_category: SmolStr::default(),
            slice_name: SmolStr::default(),
        }
    }

    fn flow(id: FlowId, category: Option<&str>) -> Flow {
        Flow {
            id,
            begin: point(10),
            end: point(20),
            dur: 0,
            category: category.map(SmolStr::from),
            name: None,
            flow_to_descendant: false,
        }
    }

    #[test]
    fn category_filter() {
        let mut selection = FlowSelection::default();
        selection.visible_categories.insert("ipc".into(), true);
        selection.visible_categories.insert("gpu".into(), false);

        assert!(selection.is_category_visible(&flow(1, Some("ipc"))));
        assert!(selection.is_category_visible(&flow(1, Some("gpu,ipc"))));
        assert!(!selection.is_category_visible(&flow(1, Some("gpu"))));
        assert!(!selection.is_category_visible(&flow(1, None)));
    }

    #[test]
    fn wildcard_shows_everything() {
        let mut selection = FlowSelection::default();
        selection
            .visible_categories
            .insert(ALL_CATEGORIES.into(), true);
        assert!(selection.is_category_visible(&flow(1, Some("anything"))));
        assert!(selection.is_category_visible(&flow(1, None)));
    }

    #[test]
    fn focus_and_highlight() {
        let selection = FlowSelection {
            focused_flow_id_right: Some(4),
            highlighted_slice_id: Some(20),
            ..FlowSelection::default()
        };
        assert!(selection.is_focused(&flow(4, None)));
        assert!(!selection.is_focused(&flow(5, None)));
        assert!(selection.is_highlighted(&flow(5, None)));

        let nothing = FlowSelection::default();
        assert!(!nothing.is_focused(&flow(4, None)));
        assert!(!nothing.is_highlighted(&flow(4, None)));
    }
}

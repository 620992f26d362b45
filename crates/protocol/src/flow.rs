use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifier of a trace track (one lane of slices).
pub type TrackId = u64;
/// Identifier of a slice within the trace.
pub type SliceId = u64;
/// Identifier of a flow edge.
pub type FlowId = u64;
/// Identifier of a collapsible track group.
pub type GroupId = SmolStr;

/// Timestamps are integer ticks on the trace clock (nanoseconds in
/// practice).
pub type Timestamp = i64;

/// One endpoint of a flow: the slice the flow leaves from or arrives at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    pub track_id: TrackId,
    pub slice_id: SliceId,
    pub slice_start_ts: Timestamp,
    pub slice_end_ts: Timestamp,
    /// Nesting depth of the slice on its track.
    pub depth: u32,
    #[serde(default)]
    pub thread_name: SmolStr,
    #[serde(default)]
    pub process_name: SmolStr,
    #[serde(default)]
    pub slice_category: SmolStr,
    #[serde(default)]
    pub slice_name: SmolStr,
}

/// A directed link between two slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: FlowId,
    pub begin: FlowPoint,
    pub end: FlowPoint,
    /// Time between the end of the begin slice and the start of the end
    /// slice.
    pub dur: Timestamp,
    #[serde(default)]
    pub category: Option<SmolStr>,
    #[serde(default)]
    pub name: Option<SmolStr>,
    /// The end slice is nested inside the begin slice. The curve then
    /// starts at the begin slice's start so it does not point backwards
    /// in time.
    #[serde(default)]
    pub flow_to_descendant: bool,
}

impl Flow {
    /// Category used when a flow carries none.
    pub const DEFAULT_CATEGORY: &'static str = "other";

    /// The flow's categories: its comma-separated `category` split into
    /// parts, or `"other"` when absent.
    pub fn categories(&self) -> Vec<&str> {
        match self.category.as_deref() {
            Some(cat) => cat.split(',').collect(),
            None => vec![Self::DEFAULT_CATEGORY],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(track_id: TrackId, slice_id: SliceId) -> FlowPoint {
        FlowPoint {
            track_id,
            slice_id,
            slice_start_ts: 0,
            slice_end_ts: 10,
            depth: 0,
            thread_name: "main".into(),
            process_name: "browser".into(),
            slice_category: "toplevel".into(),
            slice_name: "Task".into(),
        }
    }

    fn flow(category: Option<&str>) -> Flow {
        Flow {
            id: 1,
            begin: point(1, 1),
            end: point(2, 2),
            dur: 5,
            category: category.map(SmolStr::from),
            name: None,
            flow_to_descendant: false,
        }
    }

    #[test]
    fn categories_split_on_comma() {
        assert_eq!(flow(Some("ipc,toplevel")).categories(), ["ipc", "toplevel"]);
        assert_eq!(flow(Some("mojom")).categories(), ["mojom"]);
    }

    #[test]
    fn missing_category_is_other() {
        assert_eq!(flow(None).categories(), ["other"]);
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": 7,
            "begin": {"track_id":1,"slice_id":10,"slice_start_ts":0,"slice_end_ts":5,"depth":0},
            "end": {"track_id":2,"slice_id":11,"slice_start_ts":8,"slice_end_ts":9,"depth":1},
            "dur": 3
        }"#;
        let flow: Flow = serde_json::from_str(json).unwrap();
        assert_eq!(flow.id, 7);
        assert_eq!(flow.end.depth, 1);
        assert!(flow.category.is_none());
        assert!(!flow.flow_to_descendant);
        assert!(flow.begin.thread_name.is_empty());
    }
}

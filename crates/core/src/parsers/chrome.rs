use std::collections::HashMap;

use flowline_protocol::{Flow, FlowPoint, SliceId, Timestamp, TrackId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ChromeParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing traceEvents array")]
    MissingTraceEvents,
}

/// Raw Chrome trace event as found in DevTools JSON exports.
#[derive(Debug, Clone, Deserialize)]
struct TraceEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    cat: String,
    ph: String,
    #[serde(default)]
    ts: f64,
    #[serde(default)]
    dur: Option<f64>,
    #[serde(default)]
    pid: u64,
    #[serde(default)]
    tid: u64,
    /// Flow id; numeric or string depending on the producer.
    #[serde(default)]
    id: Option<serde_json::Value>,
    /// Binding point; `"e"` binds a flow event to the enclosing slice.
    #[serde(default)]
    bp: Option<String>,
    #[serde(default)]
    args: Option<serde_json::Value>,
}

/// Top-level Chrome trace JSON, in either array or object form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceFile {
    Object {
        #[serde(rename = "traceEvents")]
        trace_events: Option<Vec<TraceEvent>>,
    },
    Array(Vec<TraceEvent>),
}

/// One thread of the trace, mapped to a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceTrack {
    pub id: TrackId,
    pub pid: u64,
    pub tid: u64,
    pub thread_name: SmolStr,
    pub process_name: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSlice {
    pub id: SliceId,
    pub track_id: TrackId,
    pub name: SmolStr,
    pub category: SmolStr,
    pub start: Timestamp,
    pub end: Timestamp,
    pub depth: u32,
    pub parent: Option<SliceId>,
}

/// Slices and the flows linking them, ready to feed a flow selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowTrace {
    pub tracks: Vec<TraceTrack>,
    pub slices: Vec<TraceSlice>,
    pub flows: Vec<Flow>,
}

impl FlowTrace {
    pub fn track(&self, id: TrackId) -> Option<&TraceTrack> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.tracks.get(idx))
            .filter(|t| t.id == id)
    }

    pub fn slice(&self, id: SliceId) -> Option<&TraceSlice> {
        usize::try_from(id).ok().and_then(|idx| self.slices.get(idx))
    }

    /// Flows starting or ending at `slice_id`, i.e. the flows connected to
    /// a selected slice.
    pub fn flows_for_slice(&self, slice_id: SliceId) -> Vec<Flow> {
        self.flows
            .iter()
            .filter(|f| f.begin.slice_id == slice_id || f.end.slice_id == slice_id)
            .cloned()
            .collect()
    }

    /// Flows whose both endpoints lie in `[start, end]` on one of `tracks`,
    /// i.e. the flows inside a selected area.
    pub fn flows_in_area(
        &self,
        tracks: &[TrackId],
        start: Timestamp,
        end: Timestamp,
    ) -> Vec<Flow> {
        let inside = |p: &FlowPoint| {
            tracks.contains(&p.track_id) && p.slice_start_ts <= end && p.slice_end_ts >= start
        };
        self.flows
            .iter()
            .filter(|f| inside(&f.begin) && inside(&f.end))
            .cloned()
            .collect()
    }

    /// Whether `slice` sits somewhere below `ancestor` in the same stack.
    fn is_descendant(&self, slice: SliceId, ancestor: SliceId) -> bool {
        let mut current = self.slice(slice).and_then(|s| s.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.slice(id).and_then(|s| s.parent);
        }
        false
    }
}

/// Chrome timestamps are floating-point microseconds; tracks use integer
/// nanoseconds.
fn to_ns(us: f64) -> Timestamp {
    (us * 1_000.0).round() as Timestamp
}

fn metadata_name(event: &TraceEvent) -> Option<&str> {
    event
        .args
        .as_ref()
        .and_then(|a| a.get("name"))
        .and_then(|n| n.as_str())
}

fn flow_key(event: &TraceEvent) -> Option<(String, String)> {
    let id = match event.id.as_ref()? {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some((event.cat.clone(), id))
}

/// Parse the slices and flow events of a Chrome trace.
///
/// Flow events (`s`, `t`, `f`) sharing a category and id form a chain; each
/// consecutive pair of bound events becomes one [`Flow`].
pub fn parse_chrome_flows(data: &[u8]) -> Result<FlowTrace, ChromeParseError> {
    let events = match serde_json::from_slice::<TraceFile>(data)? {
        TraceFile::Object { trace_events } => {
            trace_events.ok_or(ChromeParseError::MissingTraceEvents)?
        }
        TraceFile::Array(events) => events,
    };

    let mut thread_names: HashMap<(u64, u64), SmolStr> = HashMap::new();
    let mut process_names: HashMap<u64, SmolStr> = HashMap::new();
    for event in events.iter().filter(|e| e.ph == "M") {
        match (event.name.as_str(), metadata_name(event)) {
            ("thread_name", Some(name)) => {
                thread_names.insert((event.pid, event.tid), name.into());
            }
            ("process_name", Some(name)) => {
                process_names.insert(event.pid, name.into());
            }
            _ => {}
        }
    }

    let mut trace = FlowTrace::default();
    let mut track_ids: HashMap<(u64, u64), TrackId> = HashMap::new();
    let mut track_for = |trace: &mut FlowTrace, pid: u64, tid: u64| -> TrackId {
        *track_ids.entry((pid, tid)).or_insert_with(|| {
            let id = trace.tracks.len() as TrackId;
            trace.tracks.push(TraceTrack {
                id,
                pid,
                tid,
                thread_name: thread_names.get(&(pid, tid)).cloned().unwrap_or_default(),
                process_name: process_names.get(&pid).cloned().unwrap_or_default(),
            });
            id
        })
    };

    let mut slice_events: Vec<&TraceEvent> = events
        .iter()
        .filter(|e| matches!(e.ph.as_str(), "X" | "B" | "E"))
        .collect();
    slice_events.sort_by(|a, b| a.ts.total_cmp(&b.ts));

    // A begin without a matching end stays open until the trace ends.
    let trace_end = slice_events
        .iter()
        .map(|e| to_ns(e.ts + e.dur.unwrap_or(0.0)))
        .max()
        .unwrap_or(0);

    let mut spans: Vec<Span<'_>> = Vec::with_capacity(slice_events.len());
    let mut open_begins: HashMap<TrackId, Vec<usize>> = HashMap::new();

    for event in slice_events {
        let track_id = track_for(&mut trace, event.pid, event.tid);
        let start = to_ns(event.ts);
        match event.ph.as_str() {
            "X" => spans.push(Span {
                event,
                track_id,
                start,
                end: to_ns(event.ts + event.dur.unwrap_or(0.0)),
            }),
            "B" => {
                open_begins.entry(track_id).or_default().push(spans.len());
                spans.push(Span {
                    event,
                    track_id,
                    start,
                    end: trace_end,
                });
            }
            _ => match open_begins.get_mut(&track_id).and_then(Vec::pop) {
                Some(idx) => spans[idx].end = start,
                None => debug!(name = %event.name, ts = event.ts, "end without a begin"),
            },
        }
    }

    // Parents before children: at equal start the longer slice comes first.
    // Chrome writes complete events when they finish, so input order would
    // put the child first.
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    // Open slices per thread, innermost last.
    let mut stacks: HashMap<TrackId, Vec<usize>> = HashMap::new();

    for span in spans {
        let stack = stacks.entry(span.track_id).or_default();
        while let Some(&top) = stack.last() {
            if trace.slices[top].end <= span.start {
                stack.pop();
            } else {
                break;
            }
        }

        let idx = trace.slices.len();
        trace.slices.push(TraceSlice {
            id: idx as SliceId,
            track_id: span.track_id,
            name: span.event.name.as_str().into(),
            category: span.event.cat.as_str().into(),
            start: span.start,
            end: span.end,
            depth: stack.len() as u32,
            parent: stack.last().map(|&p| p as SliceId),
        });
        // Zero-length slices cannot contain anything.
        if span.end > span.start {
            stack.push(idx);
        }
    }

    link_flows(&mut trace, &events, &track_ids);
    Ok(trace)
}

/// A slice with both ends known, before nesting is computed.
struct Span<'e> {
    event: &'e TraceEvent,
    track_id: TrackId,
    start: Timestamp,
    end: Timestamp,
}

/// Slice ids of every track, ordered by `(start, depth)`.
struct SliceIndex {
    by_track: HashMap<TrackId, Vec<SliceId>>,
}

impl SliceIndex {
    fn new(trace: &FlowTrace) -> Self {
        let mut by_track: HashMap<TrackId, Vec<SliceId>> = HashMap::new();
        for slice in &trace.slices {
            by_track.entry(slice.track_id).or_default().push(slice.id);
        }
        for ids in by_track.values_mut() {
            ids.sort_by_key(|&id| trace.slice(id).map(|s| (s.start, s.depth)));
        }
        Self { by_track }
    }

    /// Innermost slice on `track_id` covering `ts`. On a boundary between
    /// two siblings the one starting at `ts` wins.
    fn enclosing(&self, trace: &FlowTrace, track_id: TrackId, ts: Timestamp) -> Option<SliceId> {
        let ids = self.by_track.get(&track_id)?;
        let started = ids.partition_point(|&id| trace.slice(id).is_some_and(|s| s.start <= ts));
        // The last slice started by `ts` is either the innermost cover or a
        // descendant of it.
        let mut current = started.checked_sub(1).and_then(|i| ids.get(i)).copied();
        while let Some(id) = current {
            let slice = trace.slice(id)?;
            if ts <= slice.end {
                return Some(id);
            }
            current = slice.parent;
        }
        None
    }

    /// Shallowest slice on `track_id` starting at or after `ts`.
    fn next_starting(
        &self,
        trace: &FlowTrace,
        track_id: TrackId,
        ts: Timestamp,
    ) -> Option<SliceId> {
        let ids = self.by_track.get(&track_id)?;
        let before = ids.partition_point(|&id| trace.slice(id).is_some_and(|s| s.start < ts));
        ids.get(before).copied()
    }
}

/// Slice a flow event attaches to: the innermost slice enclosing it, or for
/// a non-enclosing finish, the next slice starting on its thread.
fn bind_flow_event(
    trace: &FlowTrace,
    index: &SliceIndex,
    event: &TraceEvent,
    track_ids: &HashMap<(u64, u64), TrackId>,
) -> Option<SliceId> {
    let track_id = *track_ids.get(&(event.pid, event.tid))?;
    let ts = to_ns(event.ts);
    if event.ph == "f" && event.bp.as_deref() != Some("e") {
        index.next_starting(trace, track_id, ts)
    } else {
        index.enclosing(trace, track_id, ts)
    }
}

fn flow_point(trace: &FlowTrace, slice_id: SliceId) -> Option<FlowPoint> {
    let slice = trace.slice(slice_id)?;
    let track = trace.track(slice.track_id)?;
    Some(FlowPoint {
        track_id: slice.track_id,
        slice_id,
        slice_start_ts: slice.start,
        slice_end_ts: slice.end,
        depth: slice.depth,
        thread_name: track.thread_name.clone(),
        process_name: track.process_name.clone(),
        slice_category: slice.category.clone(),
        slice_name: slice.name.clone(),
    })
}

fn link_flows(
    trace: &mut FlowTrace,
    events: &[TraceEvent],
    track_ids: &HashMap<(u64, u64), TrackId>,
) {
    let mut flow_events: Vec<&TraceEvent> = events
        .iter()
        .filter(|e| matches!(e.ph.as_str(), "s" | "t" | "f"))
        .collect();
    flow_events.sort_by(|a, b| a.ts.total_cmp(&b.ts));

    let index = SliceIndex::new(trace);
    // Last bound slice of every open chain, keyed by (category, id).
    let mut open: HashMap<(String, String), (SliceId, &TraceEvent)> = HashMap::new();
    let mut flows = Vec::new();

    for event in flow_events {
        let Some(key) = flow_key(event) else {
            debug!(name = %event.name, ts = event.ts, "flow event without id");
            continue;
        };
        let Some(slice_id) = bind_flow_event(trace, &index, event, track_ids) else {
            debug!(name = %event.name, ts = event.ts, ph = %event.ph, "unbound flow event");
            open.remove(&key);
            continue;
        };

        if event.ph == "s" {
            open.insert(key, (slice_id, event));
            continue;
        }

        let Some((prev_slice, start_event)) = open.remove(&key) else {
            debug!(name = %event.name, ts = event.ts, "flow step without a start");
            continue;
        };
        let id = flows.len() as u64;
        if let Some(flow) = make_flow(trace, id, prev_slice, slice_id, start_event) {
            flows.push(flow);
        }
        if event.ph == "t" {
            open.insert(key, (slice_id, start_event));
        }
    }

    trace.flows = flows;
}

fn make_flow(
    trace: &FlowTrace,
    id: u64,
    begin_slice: SliceId,
    end_slice: SliceId,
    start_event: &TraceEvent,
) -> Option<Flow> {
    let begin = flow_point(trace, begin_slice)?;
    let end = flow_point(trace, end_slice)?;
    let flow_to_descendant =
        begin.track_id == end.track_id && trace.is_descendant(end_slice, begin_slice);
    Some(Flow {
        id,
        dur: end.slice_start_ts - begin.slice_end_ts,
        begin,
        end,
        category: (!start_event.cat.is_empty()).then(|| start_event.cat.as_str().into()),
        name: (!start_event.name.is_empty()).then(|| start_event.name.as_str().into()),
        flow_to_descendant,
    })
}

use flowline_protocol::{Flow, Hsl, Point, Rect, RenderCommand, Viewport};
use tracing::{debug, trace};

use crate::config::FlowStyle;
use crate::flow::{
    Anchor, flow_arrow, resolve_connection_y, resolve_directions, resolve_slice_rect,
};
use crate::model::{FlowSelection, PanelRegistry, TimeScale};

/// Inputs of one flow render pass.
///
/// `time_scale` maps into the timeline area, i.e. pixel 0 is the first
/// pixel right of the track shell.
pub struct FlowFrame<'a> {
    pub registry: &'a PanelRegistry<'a>,
    pub time_scale: TimeScale,
    pub viewport: Viewport,
    pub selection: &'a FlowSelection,
    pub style: &'a FlowStyle,
}

/// Render every connected flow and every category-visible selected flow as
/// curved arrows over the timeline area.
///
/// Flows whose endpoints cannot be placed this frame are skipped.
pub fn render_flow_events(frame: &FlowFrame<'_>) -> Vec<RenderCommand> {
    let selection = frame.selection;
    if selection.is_empty() {
        return Vec::new();
    }

    let style = frame.style;
    let flow_count = selection.connected_flows.len() + selection.selected_flows.len();
    let mut commands = Vec::with_capacity(flow_count * 3 + 6);

    commands.push(RenderCommand::BeginGroup {
        id: "flow-events".into(),
        label: Some("Flows".into()),
    });
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(style.track_shell_width, 0.0),
        scale: Point::new(1.0, 1.0),
    });
    commands.push(RenderCommand::SetClip {
        rect: Rect::new(
            0.0,
            0.0,
            (frame.viewport.width - style.track_shell_width).max(0.0),
            frame.viewport.height,
        ),
    });

    let mut drawn = 0usize;
    let mut filtered = 0usize;

    for flow in &selection.connected_flows {
        if draw_flow(frame, flow, style.connected_hue, &mut commands) {
            drawn += 1;
        }
    }

    for flow in &selection.selected_flows {
        if !selection.is_category_visible(flow) {
            filtered += 1;
            continue;
        }
        if draw_flow(frame, flow, style.selected_hue, &mut commands) {
            drawn += 1;
        }
    }

    debug!(
        total = flow_count,
        drawn,
        filtered,
        skipped = flow_count - drawn - filtered,
        "flow render pass"
    );

    commands.push(RenderCommand::ClearClip);
    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::EndGroup);
    commands
}

/// Emit one flow's arrow. Returns `false` when an endpoint has no anchor.
fn draw_flow(
    frame: &FlowFrame<'_>,
    flow: &Flow,
    hue: f64,
    commands: &mut Vec<RenderCommand>,
) -> bool {
    let registry = frame.registry;
    let style = frame.style;
    let y_max = frame.viewport.height;

    let begin_rect = resolve_slice_rect(registry, &flow.begin);
    let end_rect = resolve_slice_rect(registry, &flow.end);

    let Some(begin_conn) = resolve_connection_y(
        registry,
        flow.begin.track_id,
        y_max,
        begin_rect,
        style.group_connection_offset,
    ) else {
        debug!(
            flow_id = flow.id,
            track_id = flow.begin.track_id,
            "skipping flow: begin has no anchor"
        );
        return false;
    };
    let Some(end_conn) = resolve_connection_y(
        registry,
        flow.end.track_id,
        y_max,
        end_rect,
        style.group_connection_offset,
    ) else {
        debug!(
            flow_id = flow.id,
            track_id = flow.end.track_id,
            "skipping flow: end has no anchor"
        );
        return false;
    };

    let (begin_dir, end_dir) = resolve_directions(&begin_conn, &end_conn);

    // A flow into a descendant leaves from the slice start so the arrow does
    // not run backwards in time.
    let begin_ts = if flow.flow_to_descendant {
        flow.begin.slice_start_ts
    } else {
        flow.begin.slice_end_ts
    };
    let begin = Anchor::new(frame.time_scale.ts_to_px(begin_ts), begin_conn.y, begin_dir);
    let end = Anchor::new(
        frame.time_scale.ts_to_px(flow.end.slice_start_ts),
        end_conn.y,
        end_dir,
    );

    let (intensity, width) = emphasis(frame.selection, style, flow);
    trace!(flow_id = flow.id, ?begin, ?end, intensity, "drawing flow");

    flow_arrow(begin, end, Hsl::flow(hue, intensity), width, style).push_commands(commands);
    true
}

/// Lightness and line width for a flow. Highlight overrides the focused
/// lightness but keeps the focused width.
fn emphasis(selection: &FlowSelection, style: &FlowStyle, flow: &Flow) -> (f64, f64) {
    let mut intensity = style.default_intensity;
    let mut width = style.default_width;
    if selection.is_focused(flow) {
        intensity = style.focused_intensity;
        width = style.focused_width;
    }
    if selection.is_highlighted(flow) {
        intensity = style.highlighted_intensity;
    }
    (intensity, width)
}

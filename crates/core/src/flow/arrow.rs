use flowline_protocol::{Hsl, Point, RenderCommand};

use super::connection::LineDirection;
use crate::config::FlowStyle;

/// One end of a flow curve in timeline-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub dir: LineDirection,
}

impl Anchor {
    pub fn new(x: f64, y: f64, dir: LineDirection) -> Self {
        Self { x, y, dir }
    }

    /// This anchor moved back against its direction by `offset`.
    fn pulled_back(&self, offset: f64) -> Point {
        let (dx, dy) = self.dir.delta(offset);
        Point::new(self.x - dx, self.y - dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    Circle { center: Point, radius: f64 },
    /// Arrowhead; the first vertex is the tip.
    Triangle([Point; 3]),
}

/// Everything needed to draw one flow, independent of any drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowArrow {
    pub curve: CubicBezier,
    pub begin_marker: Option<Marker>,
    pub end_marker: Option<Marker>,
    pub color: Hsl,
    pub width: f64,
}

/// Short flows get no arrowhead; the head would swallow the curve.
pub fn has_arrow_head(begin_x: f64, end_x: f64, triangle_size: f64) -> bool {
    (begin_x - end_x).abs() > 3.0 * triangle_size
}

/// Compute the curve and markers for a flow from `begin` to `end`.
pub fn flow_arrow(
    begin: Anchor,
    end: Anchor,
    color: Hsl,
    width: f64,
    style: &FlowStyle,
) -> FlowArrow {
    let arrow_head = has_arrow_head(begin.x, end.x, style.triangle_size);
    let end_offset = if end.dir.is_horizontal() && arrow_head {
        style.triangle_size
    } else {
        0.0
    };

    let curve = CubicBezier {
        from: Point::new(begin.x, begin.y),
        ctrl1: begin.pulled_back(style.bezier_offset),
        ctrl2: end.pulled_back(style.bezier_offset + end_offset),
        to: end.pulled_back(end_offset),
    };

    let begin_marker = begin.dir.is_vertical().then(|| Marker::Circle {
        center: Point::new(begin.x, begin.y),
        radius: style.begin_circle_radius,
    });

    let end_marker = if end.dir.is_vertical() {
        Some(Marker::Circle {
            center: Point::new(end.x, end.y),
            radius: style.circle_radius,
        })
    } else if arrow_head {
        Some(Marker::Triangle(arrow_head_points(&end, style.triangle_size)))
    } else {
        None
    };

    FlowArrow {
        curve,
        begin_marker,
        end_marker,
        color,
        width,
    }
}

fn arrow_head_points(end: &Anchor, size: f64) -> [Point; 3] {
    let (dx, dy) = end.dir.delta(size);
    [
        Point::new(end.x, end.y),
        Point::new(end.x - dx - dy, end.y + dx - dy),
        Point::new(end.x - dx + dy, end.y - dx - dy),
    ]
}

impl Marker {
    fn to_command(self, color: Hsl) -> RenderCommand {
        match self {
            Marker::Circle { center, radius } => RenderCommand::FillCircle {
                center,
                radius,
                color,
            },
            Marker::Triangle(points) => RenderCommand::FillTriangle { points, color },
        }
    }
}

impl FlowArrow {
    /// Append the draw commands for this arrow: the curve first, then the
    /// begin and end markers.
    pub fn push_commands(&self, commands: &mut Vec<RenderCommand>) {
        commands.push(RenderCommand::DrawCubicBezier {
            from: self.curve.from,
            ctrl1: self.curve.ctrl1,
            ctrl2: self.curve.ctrl2,
            to: self.curve.to,
            color: self.color,
            width: self.width,
        });
        commands.extend(self.begin_marker.map(|m| m.to_command(self.color)));
        commands.extend(self.end_marker.map(|m| m.to_command(self.color)));
    }
}

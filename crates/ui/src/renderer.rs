use egui::epaint::{ClippedShape, CubicBezierShape};
use egui::{Color32, Pos2, Rect, Shape, Stroke};
use flowline_protocol::{Hsl, Point, RenderCommand};
use tracing::trace;

/// Transform state for PushTransform/PopTransform.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }

    fn apply(&self, p: Point, offset: Pos2) -> Pos2 {
        Pos2::new(
            (p.x * self.sx + self.tx) as f32 + offset.x,
            (p.y * self.sy + self.ty) as f32 + offset.y,
        )
    }

    fn scale_w(&self, w: f64) -> f32 {
        (w * self.sx) as f32
    }

    fn scale_h(&self, h: f64) -> f32 {
        (h * self.sy) as f32
    }
}

/// Resolve a protocol HSL color to an opaque egui color.
pub fn color32(hsl: Hsl) -> Color32 {
    let c = hsl.to_color();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(channel(c.r), channel(c.g), channel(c.b), channel(c.a))
}

/// Convert a command list into clipped egui shapes.
///
/// `offset` is the top-left pixel position of the drawing area and `clip`
/// the outermost clip rectangle; `SetClip` commands narrow it.
pub fn to_shapes(commands: &[RenderCommand], offset: Pos2, clip: Rect) -> Vec<ClippedShape> {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut clip_stack: Vec<Rect> = Vec::new();
    let mut clip_rect = clip;
    let mut shapes = Vec::new();

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        let shape = match cmd {
            RenderCommand::DrawCubicBezier {
                from,
                ctrl1,
                ctrl2,
                to,
                color,
                width,
            } => {
                let points = [
                    tf.apply(*from, offset),
                    tf.apply(*ctrl1, offset),
                    tf.apply(*ctrl2, offset),
                    tf.apply(*to, offset),
                ];
                Shape::CubicBezier(CubicBezierShape::from_points_stroke(
                    points,
                    false,
                    Color32::TRANSPARENT,
                    Stroke::new(*width as f32, color32(*color)),
                ))
            }

            RenderCommand::FillCircle {
                center,
                radius,
                color,
            } => Shape::circle_filled(
                tf.apply(*center, offset),
                tf.scale_w(*radius),
                color32(*color),
            ),

            RenderCommand::FillTriangle { points, color } => Shape::convex_polygon(
                points.iter().map(|p| tf.apply(*p, offset)).collect(),
                color32(*color),
                Stroke::NONE,
            ),

            RenderCommand::SetClip { rect } => {
                let min = tf.apply(Point::new(rect.x, rect.y), offset);
                let size = egui::vec2(tf.scale_w(rect.w), tf.scale_h(rect.h));
                clip_stack.push(clip_rect);
                clip_rect = clip_rect.intersect(Rect::from_min_size(min, size));
                continue;
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    clip_rect = prev;
                }
                continue;
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.sx,
                    ty: parent.ty + translate.y * parent.sy,
                    sx: parent.sx * scale.x,
                    sy: parent.sy * scale.y,
                });
                continue;
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
                continue;
            }

            // Groups are semantic; no visual effect in egui.
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => continue,
        };

        if clip_rect.is_positive() {
            shapes.push(ClippedShape { clip_rect, shape });
        }
    }

    trace!(commands = commands.len(), shapes = shapes.len(), "converted commands");
    shapes
}

/// Paint a command list into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area. Clips from
/// the command list are intersected with the painter's own clip.
pub fn paint_commands(painter: &egui::Painter, commands: &[RenderCommand], offset: Pos2) {
    for ClippedShape { clip_rect, shape } in to_shapes(commands, offset, painter.clip_rect()) {
        painter.with_clip_rect(clip_rect).add(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_core::FrameSpec;
    use flowline_protocol::Rect as CmdRect;

    fn everywhere() -> Rect {
        Rect::from_min_max(Pos2::new(-1e4, -1e4), Pos2::new(1e4, 1e4))
    }

    #[test]
    fn hsl_resolves_to_rgb() {
        assert_eq!(color32(Hsl::new(0.0, 100.0, 50.0)), Color32::from_rgb(255, 0, 0));
        assert_eq!(color32(Hsl::new(0.0, 0.0, 100.0)), Color32::WHITE);
    }

    #[test]
    fn transform_and_offset_apply_to_bezier() {
        let color = Hsl::flow(10.0, 70.0);
        let cmds = vec![
            RenderCommand::PushTransform {
                translate: Point::new(250.0, 0.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::DrawCubicBezier {
                from: Point::new(0.0, 10.0),
                ctrl1: Point::new(30.0, 10.0),
                ctrl2: Point::new(70.0, 20.0),
                to: Point::new(100.0, 20.0),
                color,
                width: 2.0,
            },
            RenderCommand::PopTransform,
            RenderCommand::FillCircle {
                center: Point::new(5.0, 5.0),
                radius: 3.0,
                color,
            },
        ];
        let shapes = to_shapes(&cmds, Pos2::new(10.0, 100.0), everywhere());
        assert_eq!(shapes.len(), 2);

        let Shape::CubicBezier(bezier) = &shapes[0].shape else {
            panic!("expected bezier, got {:?}", shapes[0].shape);
        };
        assert_eq!(bezier.points[0], Pos2::new(260.0, 110.0));
        assert_eq!(bezier.points[3], Pos2::new(360.0, 120.0));
        assert!(!bezier.closed);

        // Popped transform: only the offset applies.
        let Shape::Circle(circle) = &shapes[1].shape else {
            panic!("expected circle, got {:?}", shapes[1].shape);
        };
        assert_eq!(circle.center, Pos2::new(15.0, 105.0));
        assert_eq!(circle.radius, 3.0);
        assert_eq!(circle.fill, color32(color));
    }

    #[test]
    fn clips_nest_and_restore() {
        let color = Hsl::flow(230.0, 40.0);
        let triangle = RenderCommand::FillTriangle {
            points: [
                Point::new(20.0, 20.0),
                Point::new(15.0, 25.0),
                Point::new(15.0, 15.0),
            ],
            color,
        };
        let cmds = vec![
            RenderCommand::SetClip {
                rect: CmdRect::new(0.0, 0.0, 50.0, 40.0),
            },
            triangle.clone(),
            RenderCommand::ClearClip,
            triangle,
        ];
        let outer = Rect::from_min_max(Pos2::ZERO, Pos2::new(30.0, 100.0));
        let shapes = to_shapes(&cmds, Pos2::ZERO, outer);

        assert_eq!(shapes.len(), 2);
        assert_eq!(
            shapes[0].clip_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(30.0, 40.0))
        );
        assert_eq!(shapes[1].clip_rect, outer);
        assert!(matches!(&shapes[0].shape, Shape::Path(path) if path.closed && path.points.len() == 3));
    }

    #[test]
    fn empty_clip_drops_shapes() {
        let cmds = vec![
            RenderCommand::SetClip {
                rect: CmdRect::new(0.0, 0.0, 0.0, 40.0),
            },
            RenderCommand::FillCircle {
                center: Point::new(0.0, 0.0),
                radius: 3.0,
                color: Hsl::flow(10.0, 70.0),
            },
            RenderCommand::ClearClip,
        ];
        assert!(to_shapes(&cmds, Pos2::ZERO, everywhere()).is_empty());
    }

    #[test]
    fn flow_frame_becomes_shapes() {
        let json = r#"{
            "viewport": {"width": 1250, "height": 400},
            "time_scale": {"start_ts": 0, "end_ts": 1000, "px_start": 0, "px_end": 1000},
            "panels": [
                {"kind": "track", "track_ids": [1], "height": 40},
                {"kind": "track", "track_ids": [2], "height": 40}
            ],
            "selection": {
                "connected_flows": [{
                    "id": 1,
                    "begin": {"track_id": 1, "slice_id": 1, "slice_start_ts": 0,
                              "slice_end_ts": 100, "depth": 0},
                    "end": {"track_id": 2, "slice_id": 2, "slice_start_ts": 500,
                            "slice_end_ts": 600, "depth": 0},
                    "dur": 400
                }]
            }
        }"#;
        let commands = FrameSpec::from_json(json.as_bytes())
            .unwrap()
            .render()
            .unwrap();
        let shapes = to_shapes(&commands, Pos2::ZERO, everywhere());

        // Curve and end arrowhead; horizontal begins carry no circle.
        assert_eq!(shapes.len(), 2);
        assert!(matches!(&shapes[1].shape, Shape::Path(path) if path.points.len() == 3));
        let Shape::CubicBezier(bezier) = &shapes[0].shape else {
            panic!("expected bezier");
        };
        // Shifted right of the 250px track shell.
        assert_eq!(bezier.points[0], Pos2::new(350.0, 12.0));
        assert_eq!(
            shapes[0].clip_rect,
            Rect::from_min_max(Pos2::new(250.0, 0.0), Pos2::new(1250.0, 400.0))
        );
    }
}

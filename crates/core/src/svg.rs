//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use flowline_protocol::RenderCommand;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. The background is
/// left transparent so the output can be layered over a timeline snapshot.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 120 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#,
    ));

    let mut clip_count = 0usize;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawCubicBezier {
                from,
                ctrl1,
                ctrl2,
                to,
                color,
                width: line_width,
            } => {
                svg.push_str(&format!(
                    r#"<path d="M {} {} C {} {}, {} {}, {} {}" fill="none" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    ctrl1.x,
                    ctrl1.y,
                    ctrl2.x,
                    ctrl2.y,
                    to.x,
                    to.y,
                    color.to_css(),
                ));
            }
            RenderCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                    center.x,
                    center.y,
                    color.to_css(),
                ));
            }
            RenderCommand::FillTriangle { points, color } => {
                svg.push_str(&format!(
                    r#"<polygon points="{},{} {},{} {},{}" fill="{}"/>"#,
                    points[0].x,
                    points[0].y,
                    points[1].x,
                    points[1].y,
                    points[2].x,
                    points[2].y,
                    color.to_css(),
                ));
            }
            RenderCommand::SetClip { rect } => {
                clip_count += 1;
                svg.push_str(&format!(
                    r#"<clipPath id="clip-{clip_count}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip-{clip_count})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
            }
            RenderCommand::PushTransform { translate, scale } => {
                svg.push_str(&format!(
                    r#"<g transform="translate({} {}) scale({} {})">"#,
                    translate.x, translate.y, scale.x, scale.y,
                ));
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
            }
            RenderCommand::ClearClip | RenderCommand::PopTransform | RenderCommand::EndGroup => {
                svg.push_str("</g>");
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_protocol::{Hsl, Point, Rect};

    #[test]
    fn renders_flow_primitives() {
        let color = Hsl::flow(230.0, 70.0);
        let cmds = vec![
            RenderCommand::DrawCubicBezier {
                from: Point::new(0.0, 10.0),
                ctrl1: Point::new(30.0, 10.0),
                ctrl2: Point::new(65.0, 50.0),
                to: Point::new(95.0, 50.0),
                color,
                width: 2.0,
            },
            RenderCommand::FillCircle {
                center: Point::new(0.0, 10.0),
                radius: 3.0,
                color,
            },
            RenderCommand::FillTriangle {
                points: [
                    Point::new(100.0, 50.0),
                    Point::new(95.0, 55.0),
                    Point::new(95.0, 45.0),
                ],
                color,
            },
        ];
        let svg = render_svg(&cmds, 200.0, 100.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"d="M 0 10 C 30 10, 65 50, 95 50""#));
        assert!(svg.contains(r#"stroke="hsl(230, 50%, 70%)""#));
        assert!(svg.contains(r#"<circle cx="0" cy="10" r="3""#));
        assert!(svg.contains(r#"points="100,50 95,55 95,45""#));
    }

    #[test]
    fn exact_document_for_a_single_circle() {
        let cmds = vec![RenderCommand::FillCircle {
            center: Point::new(4.0, 5.5),
            radius: 3.0,
            color: Hsl::flow(10.0, 40.0),
        }];
        assert_eq!(
            render_svg(&cmds, 10.0, 20.0),
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 20" width="10" height="20">"#,
                r#"<circle cx="4" cy="5.5" r="3" fill="hsl(10, 50%, 40%)"/>"#,
                "</svg>",
            )
        );
    }

    #[test]
    fn groups_transforms_and_clips_nest() {
        let cmds = vec![
            RenderCommand::BeginGroup {
                id: "flow-events".into(),
                label: Some("<Flows>".into()),
            },
            RenderCommand::PushTransform {
                translate: Point::new(250.0, 0.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 100.0, 50.0),
            },
            RenderCommand::ClearClip,
            RenderCommand::PopTransform,
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&cmds, 350.0, 50.0);
        assert!(svg.contains(r#"<g id="flow-events"><title>&lt;Flows&gt;</title>"#));
        assert!(svg.contains(r#"transform="translate(250 0) scale(1 1)""#));
        assert!(svg.contains(r#"<g clip-path="url(#clip-1)">"#));
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    }
}

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::{Hsl, Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per render pass. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Stroke a cubic Bezier curve from `from` to `to`.
    DrawCubicBezier {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        color: Hsl,
        width: f64,
    },

    /// Fill a circle.
    FillCircle {
        center: Point,
        radius: f64,
        color: Hsl,
    },

    /// Fill a triangle. The first vertex is the tip for arrowheads.
    FillTriangle { points: [Point; 3], color: Hsl },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (e.g. the flow overlay). Renderers may use this
    /// for batching, layer separation, or accessibility.
    BeginGroup {
        id: SmolStr,
        label: Option<SmolStr>,
    },

    /// End the current group.
    EndGroup,
}

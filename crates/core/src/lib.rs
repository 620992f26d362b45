//! Flow-event layout and geometry for trace timelines.
//!
//! ```text
//!   Chrome trace ──▶ FlowTrace ──▶ FlowSelection ─┐
//!                                                 ├─▶ render_flow_events ──▶ RenderCommand[] ──▶ Renderer
//!   panel layout ──▶ PanelRegistry ───────────────┘       (this crate)        (DrawCubicBezier,    (SVG, egui)
//!                                                                              FillTriangle…)
//! ```
//!
//! Geometry is recomputed from scratch each frame; nothing here keeps state
//! between render passes.

pub mod config;
pub mod flow;
pub mod frame;
pub mod model;
pub mod parsers;
pub mod svg;
pub mod views;

pub use config::FlowStyle;
pub use frame::{FrameSpec, FrameSpecError};

pub mod commands;
pub mod flow;
pub mod types;

pub use commands::RenderCommand;
pub use flow::{Flow, FlowId, FlowPoint, GroupId, SliceId, Timestamp, TrackId};
pub use types::{Color, Hsl, Point, Rect, Viewport};

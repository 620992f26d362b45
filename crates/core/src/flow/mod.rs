//! Flow anchor resolution and arrow geometry.
//!
//! Resolution runs in three steps per flow: find each endpoint's slice rect,
//! turn it (or the enclosing group header) into a vertical anchor, then pick
//! exit directions. [`arrow::flow_arrow`] turns the two anchors into a
//! backend-independent curve plus markers.

pub mod arrow;
pub mod connection;

pub use arrow::{Anchor, CubicBezier, FlowArrow, Marker, flow_arrow, has_arrow_head};
pub use connection::{
    ConnectionKind, LineDirection, YConnection, resolve_connection_y, resolve_directions,
    resolve_slice_rect,
};

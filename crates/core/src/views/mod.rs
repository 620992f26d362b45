pub mod flow_events;

pub use flow_events::{FlowFrame, render_flow_events};

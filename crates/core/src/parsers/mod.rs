pub mod chrome;

pub use chrome::{ChromeParseError, FlowTrace, TraceSlice, TraceTrack, parse_chrome_flows};

pub mod registry;
pub mod selection;
pub mod slice_layout;
pub mod time_scale;

pub use registry::{
    Panel, PanelRegistry, SliceGeometry, SliceRect, TrackGroupPanelInfo, TrackPanelInfo,
};
pub use selection::{ALL_CATEGORIES, FlowSelection};
pub use slice_layout::SliceTrackLayout;
pub use time_scale::TimeScale;

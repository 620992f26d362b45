//! egui backend: turns flow render commands into egui shapes.
//!
//! ```ignore
//! let commands = frame_spec.render()?;
//! flowline_ui::paint_commands(ui.painter(), &commands, rect.min);
//! ```

mod renderer;

pub use renderer::{color32, paint_commands, to_shapes};

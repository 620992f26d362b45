use flowline_core::FrameSpec;
use flowline_core::svg::render_svg;
use wasm_bindgen::prelude::*;

/// Render the flows of one frame, returning render commands as JSON.
///
/// `frame_json` is a serialized `FrameSpec`: viewport, time scale, panel
/// layout and flow selection.
#[wasm_bindgen]
pub fn render_flows_json(frame_json: &str) -> Result<String, JsError> {
    let spec = FrameSpec::from_json(frame_json.as_bytes())
        .map_err(|e| JsError::new(&e.to_string()))?;
    let commands = spec.render().map_err(|e| JsError::new(&e.to_string()))?;
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Render the flows of one frame as a standalone SVG document.
#[wasm_bindgen]
pub fn render_flows_svg(frame_json: &str) -> Result<String, JsError> {
    let spec = FrameSpec::from_json(frame_json.as_bytes())
        .map_err(|e| JsError::new(&e.to_string()))?;
    let commands = spec.render().map_err(|e| JsError::new(&e.to_string()))?;
    Ok(render_svg(&commands, spec.viewport.width, spec.viewport.height))
}

/// Parse a Chrome trace (JSON bytes), returning its tracks, slices and
/// flows as JSON.
#[wasm_bindgen]
pub fn load_chrome_flows(data: &[u8]) -> Result<String, JsError> {
    let trace = flowline_core::parsers::parse_chrome_flows(data)
        .map_err(|e| JsError::new(&e.to_string()))?;
    serde_json::to_string(&trace).map_err(|e| JsError::new(&e.to_string()))
}

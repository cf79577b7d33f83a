pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod logging;
pub mod models;
pub mod validate;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use client::{HttpTransport, Transport};
pub use config::{PageConfig, PageConfigBuilder};
pub use controller::{Controller, Outcome, PreventDefault, View};
pub use errors::{Result, SketchifyError, ValidationError};
pub use logging::init_logging;
pub use models::{
    ConversionOutput, ConversionRequest, ConversionResult, ConversionType, CustomSize, FileHandle,
    FormState, Resolution, SelectedFile, UiState,
};
pub use validate::{check_selection, parse_dimension, validate_and_build};

use wasm_bindgen::prelude::*;

/// Page entry point: wires the upload form to the conversion endpoint.
///
/// `config_json` optionally overrides [`PageConfig`] fields, e.g.
/// `{"upload_path": "/api/upload"}`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    init_logging();
    let config = match config_json.as_deref() {
        Some(json) => PageConfig::from_json(json)?,
        None => PageConfig::default(),
    };
    // The controller is owned by the listeners from here on.
    dom::attach(config)?;
    Ok(())
}

/// Whether a selector value should reveal the custom width/height inputs.
/// Exposed for pages that render the selector themselves.
#[wasm_bindgen(js_name = showsCustomSizeFields)]
pub fn shows_custom_size_fields(selected_value: &str) -> bool {
    models::options::shows_custom_size_fields(selected_value)
}

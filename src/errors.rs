use thiserror::Error;

/// Reasons a selected file and form state are rejected before any request is sent.
///
/// The text shown to the user for each variant comes from
/// [`PageConfig`](crate::config::PageConfig); the `Display` output here is for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file's declared media type is not in the `image/` category.
    #[error("not an image: declared media type {media_type:?}")]
    NotAnImage { media_type: String },

    /// Custom resolution was selected but width or height is non-numeric or not positive.
    #[error("width/height must be positive numbers (got width={width:?}, height={height:?})")]
    InvalidCustomSize { width: String, height: String },
}

/// Errors raised while talking to the conversion endpoint or setting up the page.
#[derive(Error, Debug)]
pub enum SketchifyError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid JSON, or the configuration JSON was invalid.
    #[error("Failed to deserialize JSON: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// The body was JSON but matched neither the error nor the success shape.
    #[error("Malformed conversion response: {0}")]
    MalformedResponse(String),

    /// A configuration value is unusable (empty label, unparsable endpoint, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A browser API call failed. Carries the stringified JS value.
    #[error("Browser API error: {0}")]
    Js(String),
}

/// A type alias for `Result<T, SketchifyError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, SketchifyError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SketchifyError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SketchifyError::Js(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SketchifyError> for wasm_bindgen::JsValue {
    fn from(err: SketchifyError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

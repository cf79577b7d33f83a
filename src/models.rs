pub mod options;
pub mod request;
pub mod result;
pub mod state;

pub use options::{ConversionType, CustomSize, Resolution};
pub use request::{ConversionRequest, FileHandle, FormState, SelectedFile};
pub use result::{ConversionOutput, ConversionResult};
pub use state::UiState;

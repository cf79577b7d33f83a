use serde::Serialize;

/// The page's busy/idle condition around a submission.
///
/// `Idle` is initial. `Busy` lasts from submission start until the outcome is
/// rendered. `Success` and `Error` describe the last rendered outcome; the
/// upload trigger is usable again in all three non-busy states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UiState {
    #[default]
    Idle,
    Busy,
    Success,
    Error,
}

impl UiState {
    pub fn is_busy(self) -> bool {
        self == UiState::Busy
    }
}

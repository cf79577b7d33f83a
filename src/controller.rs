//! The upload page's state machine.
//!
//! Both file entry points (drag-and-drop and file-input change, the latter fed
//! by the file dialog) converge on [`Controller::process_file`]. It checks the
//! selection, flips the page to busy, reads the file and awaits the
//! [`Transport`], then renders the outcome and restores the idle trigger.
//! The controller never touches the DOM directly; everything visible goes
//! through [`View`].

use std::cell::Cell;
use std::future::Future;

use log::{debug, error, info, warn};

use crate::client::Transport;
use crate::config::PageConfig;
use crate::errors::{Result, ValidationError};
use crate::models::options::shows_custom_size_fields;
use crate::models::{
    ConversionOutput, ConversionRequest, ConversionResult, ConversionType, FileHandle, FormState,
    Resolution, UiState,
};
use crate::validate::check_selection;

/// The page elements the controller drives.
///
/// Implementations mutate their elements through `&self`; the browser build
/// wraps `web_sys` handles, tests record calls.
pub trait View {
    /// Current values of the conversion-type selector, resolution selector and size inputs.
    fn form_state(&self) -> FormState;

    fn set_custom_size_visible(&self, visible: bool);

    /// Opens the native file chooser.
    fn open_file_dialog(&self);

    /// Enables or disables the upload trigger and sets its label.
    fn set_trigger(&self, enabled: bool, label: &str);

    fn set_message(&self, text: &str);

    fn set_result_visible(&self, visible: bool);

    /// Points the two previews and the download link at a finished conversion.
    fn show_output(&self, output: &ConversionOutput);

    /// Called on every [`UiState`] transition.
    fn state_changed(&self, _state: UiState) {}
}

/// An input event whose default browser action can be suppressed.
pub trait PreventDefault {
    fn prevent_default(&self);
}

/// What a call to [`Controller::process_file`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected locally; nothing was sent.
    Rejected(ValidationError),
    /// The server converted the image.
    Converted(ConversionOutput),
    /// The server answered with an `error` field.
    ServerError(String),
    /// The exchange failed or the body was unreadable. `detail` is for logs only.
    TransportFailed { detail: String },
    /// A submission was already in flight and the busy guard is on.
    Ignored,
}

/// Mediates between input events, validation, the transport and the view.
pub struct Controller<V: View, T: Transport> {
    view: V,
    transport: T,
    config: PageConfig,
    state: Cell<UiState>,
}

impl<V: View, T: Transport> Controller<V, T> {
    pub fn new(view: V, transport: T, config: PageConfig) -> Self {
        Controller {
            view,
            transport,
            config,
            state: Cell::new(UiState::Idle),
        }
    }

    pub fn state(&self) -> UiState {
        self.state.get()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Shows the width/height inputs only while `"custom"` is selected.
    pub fn on_resolution_change(&self, selected_value: &str) {
        self.view
            .set_custom_size_visible(shows_custom_size_fields(selected_value));
    }

    pub fn on_upload_button_click(&self) {
        self.view.open_file_dialog();
    }

    /// Keeps the browser from navigating to a file dragged over the drop zone.
    pub fn on_drag_over(&self, event: &impl PreventDefault) {
        event.prevent_default();
    }

    /// Suppresses the default drop action, then processes the first dropped
    /// file. Additional files are ignored.
    ///
    /// The default action is suppressed before this returns, so the returned
    /// future can be spawned without racing the browser.
    pub fn on_drop<'a, F>(
        &'a self,
        event: &dyn PreventDefault,
        files: impl IntoIterator<Item = F>,
    ) -> impl Future<Output = Option<Outcome>> + 'a
    where
        F: FileHandle + 'a,
    {
        event.prevent_default();
        self.select(first_file(files))
    }

    /// Processes the first file the input holds, if any.
    pub fn on_file_input_change<'a, F>(
        &'a self,
        files: impl IntoIterator<Item = F>,
    ) -> impl Future<Output = Option<Outcome>> + 'a
    where
        F: FileHandle + 'a,
    {
        self.select(first_file(files))
    }

    /// An empty selection does nothing at all.
    async fn select<F: FileHandle>(&self, file: Option<F>) -> Option<Outcome> {
        let file = file?;
        let outcome = self.process_file(file).await;
        debug!("Selection finished: {:?}", outcome);
        Some(outcome)
    }

    /// Checks, submits and renders one selected file.
    ///
    /// On local rejection nothing is read or sent and the page never becomes
    /// busy. The contents are read only after the checks pass; a failed read
    /// is reported like a failed exchange. Once busy, the trigger is restored
    /// when this future completes or is dropped, whichever branch was taken.
    pub async fn process_file<F: FileHandle>(&self, file: F) -> Outcome {
        let name = file.name();
        if self.config.guard_busy && self.state.get().is_busy() {
            warn!("Ignoring '{}': a conversion is already in progress", name);
            return Outcome::Ignored;
        }

        let form = self.view.form_state();
        let (conversion_type, resolution) = match check_selection(&file.media_type(), &form) {
            Ok(checked) => checked,
            Err(err) => {
                warn!("Rejected '{}': {}", name, err);
                self.view.set_message(self.rejection_message(&err));
                self.view.set_result_visible(false);
                return Outcome::Rejected(err);
            }
        };

        let guard = BusyGuard::enter(self);

        let exchange = self.read_and_submit(file, conversion_type, resolution);
        let outcome = match exchange.await {
            Ok(ConversionResult::Converted(output)) => {
                self.view.show_output(&output);
                self.view
                    .set_message(output.message_or(&self.config.default_success_message));
                self.view.set_result_visible(true);
                info!("Converted '{}' -> {}", name, output.output_url);
                Outcome::Converted(output)
            }
            Ok(ConversionResult::Failed { error }) => {
                warn!("Server rejected '{}': {}", name, error);
                self.view.set_message(&error);
                self.view.set_result_visible(false);
                Outcome::ServerError(error)
            }
            Err(err) => {
                error!("Upload of '{}' failed: {}", name, err);
                self.view
                    .set_message(&self.config.transport_failure_message);
                self.view.set_result_visible(false);
                Outcome::TransportFailed {
                    detail: err.to_string(),
                }
            }
        };

        guard.settle(match outcome {
            Outcome::Converted(_) => UiState::Success,
            _ => UiState::Error,
        });
        outcome
    }

    async fn read_and_submit<F: FileHandle>(
        &self,
        file: F,
        conversion_type: ConversionType,
        resolution: Resolution,
    ) -> Result<ConversionResult> {
        let source = file.read().await?;
        debug!(
            "Sending '{}' ({} bytes): type={}, resolution={}",
            source.name,
            source.data.len(),
            conversion_type,
            resolution.as_form_value()
        );
        let request = ConversionRequest {
            source,
            conversion_type,
            resolution,
        };
        self.transport.submit(request).await
    }

    fn rejection_message(&self, err: &ValidationError) -> &str {
        match err {
            ValidationError::NotAnImage { .. } => &self.config.not_an_image_message,
            ValidationError::InvalidCustomSize { .. } => &self.config.invalid_size_message,
        }
    }

    fn transition(&self, state: UiState) {
        debug!("UI state {:?} -> {:?}", self.state.get(), state);
        self.state.set(state);
        self.view.state_changed(state);
    }
}

fn first_file<F>(files: impl IntoIterator<Item = F>) -> Option<F> {
    files.into_iter().next()
}

/// Holds the page in `Busy` for the lifetime of one submission.
///
/// Dropping it re-enables the trigger with its idle label and returns to
/// `Idle`, so cleanup also runs when the submission future is dropped early.
struct BusyGuard<'a, V: View, T: Transport> {
    controller: &'a Controller<V, T>,
}

impl<'a, V: View, T: Transport> BusyGuard<'a, V, T> {
    fn enter(controller: &'a Controller<V, T>) -> Self {
        let view = &controller.view;
        view.set_trigger(false, &controller.config.busy_label);
        view.set_message("");
        controller.transition(UiState::Busy);
        BusyGuard { controller }
    }

    /// Records the rendered outcome, then restores the idle trigger.
    fn settle(self, state: UiState) {
        self.controller.transition(state);
    }
}

impl<V: View, T: Transport> Drop for BusyGuard<'_, V, T> {
    fn drop(&mut self) {
        let controller = self.controller;
        controller
            .view
            .set_trigger(true, &controller.config.idle_label);
        controller.transition(UiState::Idle);
    }
}

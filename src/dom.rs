//! Browser binding: looks up the page elements, implements [`View`] over them
//! and attaches the event listeners.

use log::{debug, error};
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, File, FileList, HtmlAnchorElement,
    HtmlButtonElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
};

use crate::client::HttpTransport;
use crate::config::PageConfig;
use crate::controller::{Controller, PreventDefault, View};
use crate::errors::{Result, SketchifyError};
use crate::models::{ConversionOutput, FileHandle, FormState, SelectedFile, UiState};

/// Ids of the elements the page markup provides.
pub mod ids {
    pub const UPLOAD_AREA: &str = "upload-area";
    pub const FILE_INPUT: &str = "file-input";
    pub const UPLOAD_BUTTON: &str = "upload-button";
    pub const RESULT_AREA: &str = "result-area";
    pub const ORIGINAL_IMAGE: &str = "original-image";
    pub const RESULT_IMAGE: &str = "result-image";
    pub const DOWNLOAD_LINK: &str = "download-link";
    pub const MESSAGE_TEXT: &str = "message-text";
    pub const RESOLUTION: &str = "resolution";
    pub const CUSTOM_RES: &str = "custom-res";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const CONVERSION_TYPE: &str = "conversion-type";
}

/// CSS class that hides an element.
const HIDDEN_CLASS: &str = "hidden";

type PageController = Controller<DomView, HttpTransport>;

/// The page's elements, resolved once at start-up.
pub struct DomView {
    upload_area: Element,
    file_input: HtmlInputElement,
    upload_button: HtmlButtonElement,
    result_area: Element,
    original_image: HtmlImageElement,
    result_image: HtmlImageElement,
    download_link: HtmlAnchorElement,
    message_text: Element,
    resolution: HtmlSelectElement,
    custom_res: Element,
    width: HtmlInputElement,
    height: HtmlInputElement,
    conversion_type: HtmlSelectElement,
}

impl DomView {
    /// Resolves every element by id. Fails if one is missing or has the wrong tag.
    pub fn from_document(document: &Document) -> Result<Self> {
        Ok(DomView {
            upload_area: element(document, ids::UPLOAD_AREA)?,
            file_input: element(document, ids::FILE_INPUT)?,
            upload_button: element(document, ids::UPLOAD_BUTTON)?,
            result_area: element(document, ids::RESULT_AREA)?,
            original_image: element(document, ids::ORIGINAL_IMAGE)?,
            result_image: element(document, ids::RESULT_IMAGE)?,
            download_link: element(document, ids::DOWNLOAD_LINK)?,
            message_text: element(document, ids::MESSAGE_TEXT)?,
            resolution: element(document, ids::RESOLUTION)?,
            custom_res: element(document, ids::CUSTOM_RES)?,
            width: element(document, ids::WIDTH)?,
            height: element(document, ids::HEIGHT)?,
            conversion_type: element(document, ids::CONVERSION_TYPE)?,
        })
    }
}

fn element<E: JsCast>(document: &Document, id: &str) -> Result<E> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SketchifyError::Js(format!("Missing element #{}", id)))?
        .dyn_into::<E>()
        .map_err(|_| SketchifyError::Js(format!("Element #{} has an unexpected type", id)))
}

fn set_hidden(element: &Element, hidden: bool) {
    if let Err(e) = element
        .class_list()
        .toggle_with_force(HIDDEN_CLASS, hidden)
    {
        error!("Could not toggle '{}' on #{}: {:?}", HIDDEN_CLASS, element.id(), e);
    }
}

impl View for DomView {
    fn form_state(&self) -> FormState {
        FormState {
            conversion_type: self.conversion_type.value(),
            resolution: self.resolution.value(),
            width: self.width.value(),
            height: self.height.value(),
        }
    }

    fn set_custom_size_visible(&self, visible: bool) {
        set_hidden(&self.custom_res, !visible);
    }

    fn open_file_dialog(&self) {
        self.file_input.click();
    }

    fn set_trigger(&self, enabled: bool, label: &str) {
        self.upload_button.set_disabled(!enabled);
        self.upload_button.set_text_content(Some(label));
    }

    fn set_message(&self, text: &str) {
        self.message_text.set_text_content(Some(text));
    }

    fn set_result_visible(&self, visible: bool) {
        set_hidden(&self.result_area, !visible);
    }

    fn show_output(&self, output: &ConversionOutput) {
        self.original_image.set_src(&output.input_url);
        self.result_image.set_src(&output.output_url);
        self.download_link.set_href(&output.download_url);
    }

    fn state_changed(&self, state: UiState) {
        let busy = if state.is_busy() { "true" } else { "false" };
        if let Err(e) = self.upload_area.set_attribute("aria-busy", busy) {
            debug!("Could not set aria-busy: {:?}", e);
        }
    }
}

impl PreventDefault for Event {
    fn prevent_default(&self) {
        Event::prevent_default(self);
    }
}

impl FileHandle for File {
    fn name(&self) -> String {
        File::name(self)
    }

    fn media_type(&self) -> String {
        self.type_()
    }

    /// Copies the contents into memory.
    async fn read(self) -> Result<SelectedFile> {
        let buffer = JsFuture::from(self.array_buffer()).await?;
        let data = js_sys::Uint8Array::new(&buffer).to_vec();
        Ok(SelectedFile::new(File::name(&self), self.type_(), data))
    }
}

fn files_of(list: Option<FileList>) -> impl Iterator<Item = File> {
    let length = list.as_ref().map_or(0, FileList::length);
    (0..length).filter_map(move |i| list.as_ref().and_then(|l| l.get(i)))
}

fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static) -> Result<()>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn wire(controller: &'static PageController) -> Result<()> {
    let view = controller.view();

    listen(&view.resolution, "change", move |_: Event| {
        controller.on_resolution_change(&controller.view().resolution.value());
    })?;

    listen(&view.upload_button, "click", move |_: Event| {
        controller.on_upload_button_click();
    })?;

    listen(&view.upload_area, "dragover", move |event: Event| {
        controller.on_drag_over(&event);
    })?;

    listen(&view.upload_area, "drop", move |event: DragEvent| {
        let files = event.data_transfer().and_then(|dt| dt.files());
        let plain: &Event = event.as_ref();
        let selection = controller.on_drop(plain, files_of(files));
        spawn_local(async move {
            selection.await;
        });
    })?;

    listen(&view.file_input, "change", move |_: Event| {
        let files = controller.view().file_input.files();
        let selection = controller.on_file_input_change(files_of(files));
        spawn_local(async move {
            selection.await;
        });
    })?;

    Ok(())
}

/// Builds the controller for the current document and attaches all listeners.
///
/// The controller lives for the rest of the page, like its listeners.
pub fn attach(config: PageConfig) -> Result<&'static Controller<DomView, HttpTransport>> {
    let window = web_sys::window().ok_or_else(|| SketchifyError::Js("No window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| SketchifyError::Js("No document".to_string()))?;
    let origin = window.location().origin()?;

    let transport = HttpTransport::new(reqwest::Client::new(), &origin, &config.upload_path)?;
    debug!("Uploading to {}", transport.endpoint());

    let view = DomView::from_document(&document)?;
    let controller: &'static PageController =
        Box::leak(Box::new(Controller::new(view, transport, config)));
    wire(controller)?;

    // Match the sub-form to whatever the selector shows after a reload.
    controller.on_resolution_change(&controller.view().resolution.value());
    Ok(controller)
}

use crate::errors::Result;
use crate::models::options::{ConversionType, CustomSize, Resolution};

/// Whether a declared media type is in the `image/` category.
pub fn is_image_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// A file handed over by an entry point whose contents are read on demand.
///
/// Name and media type are available up front so a selection can be rejected
/// without copying its bytes; the browser build implements this for `web_sys::File`.
#[allow(async_fn_in_trait)]
pub trait FileHandle {
    fn name(&self) -> String;

    fn media_type(&self) -> String;

    /// Loads the contents.
    async fn read(self) -> Result<SelectedFile>;
}

/// The single file taken from the drop zone or the file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as reported by the browser; used as the multipart filename.
    pub name: String,
    /// Declared media type, e.g. "image/png". May be empty when the browser cannot tell.
    pub media_type: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        SelectedFile {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_type(&self.media_type)
    }
}

impl FileHandle for SelectedFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn media_type(&self) -> String {
        self.media_type.clone()
    }

    async fn read(self) -> Result<SelectedFile> {
        Ok(self)
    }
}

/// Raw values of the page's form controls at the moment of submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub conversion_type: String,
    pub resolution: String,
    pub width: String,
    pub height: String,
}

impl FormState {
    pub fn new(conversion_type: impl Into<String>, resolution: impl Into<String>) -> Self {
        FormState {
            conversion_type: conversion_type.into(),
            resolution: resolution.into(),
            ..Default::default()
        }
    }

    /// Sets the raw text of the custom width/height inputs.
    pub fn with_custom_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }
}

/// A validated submission, ready to be encoded as a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: SelectedFile,
    pub conversion_type: ConversionType,
    pub resolution: Resolution,
}

impl ConversionRequest {
    pub fn custom_size(&self) -> Option<CustomSize> {
        self.resolution.custom_size()
    }

    /// The text fields of the multipart body, in wire order, after the `file` part.
    ///
    /// `width` and `height` appear only for the custom resolution.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (
                "conversion_type",
                self.conversion_type.as_form_value().to_string(),
            ),
            ("resolution", self.resolution.as_form_value().to_string()),
        ];
        if let Some(size) = self.custom_size() {
            fields.push(("width", size.width.to_string()));
            fields.push(("height", size.height.to_string()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> SelectedFile {
        SelectedFile::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_image_detection_uses_media_type_prefix() {
        assert!(png().is_image());
        assert!(SelectedFile::new("x.svg", "image/svg+xml", vec![]).is_image());
        assert!(!SelectedFile::new("notes.txt", "text/plain", vec![]).is_image());
        assert!(!SelectedFile::new("photo.png", "", vec![]).is_image());
        assert!(!SelectedFile::new("a", "IMAGE/PNG", vec![]).is_image());
    }

    #[test]
    fn test_preset_request_sends_no_dimensions() {
        let request = ConversionRequest {
            source: png(),
            conversion_type: ConversionType::LineArt,
            resolution: Resolution::Preset("1920x1080".to_string()),
        };
        let fields = request.text_fields();
        assert_eq!(
            fields,
            vec![
                ("conversion_type", "line_art".to_string()),
                ("resolution", "1920x1080".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_request_sends_dimensions_last() {
        let request = ConversionRequest {
            source: png(),
            conversion_type: ConversionType::InkBlot,
            resolution: Resolution::Custom(CustomSize {
                width: 300,
                height: 200,
            }),
        };
        let names: Vec<&str> = request.text_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["conversion_type", "resolution", "width", "height"]);
        assert_eq!(request.text_fields()[2].1, "300");
        assert_eq!(request.text_fields()[3].1, "200");
    }
}

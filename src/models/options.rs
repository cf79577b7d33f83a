use serde::{Deserialize, Serialize};
use std::fmt;

/// The artistic effect the server applies to the uploaded image.
///
/// Mirrors the options of the page's conversion-type selector. Values the
/// selector may carry that are not listed here are forwarded unchanged as
/// [`ConversionType::Other`]; the server decides whether they are valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionType {
    /// Grayscale with a soft glow.
    #[default]
    MonochromeGlow,
    /// Edge-detected line drawing.
    LineArt,
    /// Flattened colors with bold outlines.
    ToonStyle,
    /// Heavy ink wash.
    InkBlot,
    /// Pencil sketch.
    ArtSketch,
    /// Sepia tone with grain and vignette.
    VintagePhoto,
    /// Any selector value not known to this client.
    #[serde(untagged)]
    Other(String),
}

impl ConversionType {
    /// The effects offered by the deployed page, in selector order.
    pub const KNOWN: [ConversionType; 6] = [
        ConversionType::MonochromeGlow,
        ConversionType::LineArt,
        ConversionType::ToonStyle,
        ConversionType::InkBlot,
        ConversionType::ArtSketch,
        ConversionType::VintagePhoto,
    ];

    /// Maps a raw selector value to a conversion type. Never fails.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "monochrome_glow" => ConversionType::MonochromeGlow,
            "line_art" => ConversionType::LineArt,
            "toon_style" => ConversionType::ToonStyle,
            "ink_blot" => ConversionType::InkBlot,
            "art_sketch" => ConversionType::ArtSketch,
            "vintage_photo" => ConversionType::VintagePhoto,
            other => ConversionType::Other(other.to_string()),
        }
    }

    /// The value sent in the `conversion_type` multipart field.
    pub fn as_form_value(&self) -> &str {
        match self {
            ConversionType::MonochromeGlow => "monochrome_glow",
            ConversionType::LineArt => "line_art",
            ConversionType::ToonStyle => "toon_style",
            ConversionType::InkBlot => "ink_blot",
            ConversionType::ArtSketch => "art_sketch",
            ConversionType::VintagePhoto => "vintage_photo",
            ConversionType::Other(value) => value,
        }
    }
}

impl fmt::Display for ConversionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_form_value())
    }
}

/// Width and height requested with the `custom` resolution. Both are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomSize {
    pub width: u64,
    pub height: u64,
}

/// Output resolution chosen in the resolution selector.
///
/// Only [`Resolution::Custom`] carries dimensions, so a request can never hold
/// width/height without `custom` or `custom` without width/height.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// Keep the source dimensions.
    #[default]
    Original,
    /// 1280x720.
    Hd720,
    /// 1920x1080.
    FullHd1080,
    /// A non-custom preset this client has no dimensions for (e.g. "1920x1080").
    Preset(String),
    /// User-specified dimensions.
    Custom(CustomSize),
}

impl Resolution {
    /// The selector value that switches the form into custom-size mode.
    pub const CUSTOM: &'static str = "custom";

    /// Maps a non-custom selector value to a preset.
    ///
    /// Returns `None` for `"custom"`, which needs validated dimensions and is
    /// built by [`validate_and_build`](crate::validate::validate_and_build).
    pub fn preset(value: &str) -> Option<Self> {
        match value {
            Self::CUSTOM => None,
            "original" => Some(Resolution::Original),
            "720p" => Some(Resolution::Hd720),
            "1080p" => Some(Resolution::FullHd1080),
            other => Some(Resolution::Preset(other.to_string())),
        }
    }

    /// The value sent in the `resolution` multipart field.
    pub fn as_form_value(&self) -> &str {
        match self {
            Resolution::Original => "original",
            Resolution::Hd720 => "720p",
            Resolution::FullHd1080 => "1080p",
            Resolution::Preset(value) => value,
            Resolution::Custom(_) => Self::CUSTOM,
        }
    }

    /// The output size the server produces, when the client knows it.
    pub fn target_size(&self) -> Option<(u64, u64)> {
        match self {
            Resolution::Hd720 => Some((1280, 720)),
            Resolution::FullHd1080 => Some((1920, 1080)),
            Resolution::Custom(size) => Some((size.width, size.height)),
            Resolution::Original | Resolution::Preset(_) => None,
        }
    }

    pub fn custom_size(&self) -> Option<CustomSize> {
        match self {
            Resolution::Custom(size) => Some(*size),
            _ => None,
        }
    }
}

/// Whether the custom width/height sub-form should be visible for a selector value.
pub fn shows_custom_size_fields(selected_value: &str) -> bool {
    selected_value == Resolution::CUSTOM
}

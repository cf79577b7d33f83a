//! Local gatekeeping between a selected file plus form state and the network call.

use log::debug;

use crate::errors::ValidationError;
use crate::models::request::is_image_type;
use crate::models::{
    ConversionRequest, ConversionType, CustomSize, FormState, Resolution, SelectedFile,
};

/// Checks the file and form values and assembles the request to send.
///
/// Rules, in order:
/// 1. the file's declared media type must start with `image/`;
/// 2. conversion type and resolution are read from `form` as-is;
/// 3. for the `custom` resolution, width and height are parsed with
///    [`parse_dimension`] and must both be positive.
///
/// Nothing is sent on rejection; the caller decides what to show.
pub fn validate_and_build(
    file: SelectedFile,
    form: &FormState,
) -> Result<ConversionRequest, ValidationError> {
    let (conversion_type, resolution) = check_selection(&file.media_type, form)?;

    debug!(
        "Built request for '{}' ({} bytes): type={}, resolution={}",
        file.name,
        file.data.len(),
        conversion_type,
        resolution.as_form_value()
    );

    Ok(ConversionRequest {
        source: file,
        conversion_type,
        resolution,
    })
}

/// The checks of [`validate_and_build`] that need only the declared media
/// type, so a file can be rejected before its contents are read.
pub fn check_selection(
    media_type: &str,
    form: &FormState,
) -> Result<(ConversionType, Resolution), ValidationError> {
    if !is_image_type(media_type) {
        return Err(ValidationError::NotAnImage {
            media_type: media_type.to_string(),
        });
    }

    let conversion_type = ConversionType::from_form_value(&form.conversion_type);
    let resolution = match Resolution::preset(&form.resolution) {
        Some(preset) => preset,
        None => Resolution::Custom(parse_custom_size(&form.width, &form.height)?),
    };
    Ok((conversion_type, resolution))
}

fn parse_custom_size(width: &str, height: &str) -> Result<CustomSize, ValidationError> {
    let positive = |raw: &str| {
        parse_dimension(raw)
            .filter(|value| *value > 0)
            .and_then(|value| u64::try_from(value).ok())
    };
    match (positive(width), positive(height)) {
        (Some(width), Some(height)) => Ok(CustomSize { width, height }),
        _ => Err(ValidationError::InvalidCustomSize {
            width: width.to_string(),
            height: height.to_string(),
        }),
    }
}

/// Parses the leading integer of a text input the way the browser's
/// `parseInt(value)` does.
///
/// Leading whitespace is skipped, one sign is allowed, a `0x`/`0X` prefix
/// switches to hexadecimal, and parsing stops at the first character that is
/// not a digit. `"5.9"` gives `5`, `"12px"` gives `12`, `"1e3"` gives `1`.
/// Returns `None` when no digit is found. Values past `i64` saturate.
pub fn parse_dimension(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start_matches(is_js_whitespace);

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        seen_digit = true;
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(digit));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// ECMAScript `WhiteSpace` and `LineTerminator` code points, the set
/// `parseInt` skips. Narrower than `char::is_whitespace` (no U+0085, U+001C..U+001F).
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

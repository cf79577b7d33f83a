use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SketchifyError};

/// URLs of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the server stored the uploaded original.
    pub input_url: String,
    /// The converted image.
    pub output_url: String,
    /// Link that serves the converted image as an attachment.
    pub download_url: String,
    /// Optional status text from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConversionOutput {
    /// The server's message, or `default` when it is absent or empty.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => default,
        }
    }
}

/// The server's answer to an upload: exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// The server reported a processing failure; the text is shown verbatim.
    Failed { error: String },
    /// The conversion succeeded.
    Converted(ConversionOutput),
}

/// The error text carried by an `error` field, if it counts as set.
///
/// Strings are used verbatim. `null`, `false`, `0` and `""` count as unset;
/// any other value is reported as its JSON text.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl ConversionResult {
    /// Decodes a response body. The HTTP status is not consulted: a set
    /// `error` field is authoritative whatever the other fields hold, anything
    /// else must carry all three URLs as strings.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        let Value::Object(mut fields) = value else {
            return Err(SketchifyError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        };

        if let Some(error) = fields.get("error").and_then(error_text) {
            return Ok(ConversionResult::Failed { error });
        }

        let mut take = |name: &str| match fields.remove(name) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        let input_url = take("input_url");
        let output_url = take("output_url");
        let download_url = take("download_url");
        let message = take("message");

        match (input_url, output_url, download_url) {
            (Some(input_url), Some(output_url), Some(download_url)) => {
                Ok(ConversionResult::Converted(ConversionOutput {
                    input_url,
                    output_url,
                    download_url,
                    message,
                }))
            }
            (input, output, download) => {
                let missing: Vec<&str> = [
                    ("input_url", input.is_none()),
                    ("output_url", output.is_none()),
                    ("download_url", download.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();
                Err(SketchifyError::MalformedResponse(format!(
                    "missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Converted(_))
    }
}

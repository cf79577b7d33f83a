use serde::Deserialize;

use crate::errors::{Result, SketchifyError};

/// Texts and endpoint used by the page controller.
///
/// Every field has a default matching the deployed page, so a JSON override
/// only needs the keys it changes. Build one with [`PageConfig::builder()`] or
/// [`PageConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Path (or absolute URL) of the upload endpoint, resolved against the page origin.
    pub upload_path: String,
    /// Label of the upload trigger while idle.
    pub idle_label: String,
    /// Label of the upload trigger while a submission is in flight.
    pub busy_label: String,
    /// Shown on success when the server sends no message.
    pub default_success_message: String,
    /// Shown when the request fails at the transport level or the body is unreadable.
    pub transport_failure_message: String,
    /// Shown when the selected file is not an image.
    pub not_an_image_message: String,
    /// Shown when custom width/height are not positive numbers.
    pub invalid_size_message: String,
    /// Ignore file selections from every entry point while a submission is in flight.
    pub guard_busy: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            upload_path: "/upload".to_string(),
            idle_label: "Pilih File".to_string(),
            busy_label: "Memproses...".to_string(),
            default_success_message: "Gambar berhasil diproses dengan Sketchify!".to_string(),
            transport_failure_message: "Terjadi kesalahan saat memproses gambar.".to_string(),
            not_an_image_message: "Harap unggah file gambar (JPEG, PNG, dll.).".to_string(),
            invalid_size_message: "Lebar dan tinggi harus angka positif.".to_string(),
            guard_busy: true,
        }
    }
}

impl PageConfig {
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::new()
    }

    /// Parses a JSON object of overrides on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        let required = [
            ("upload_path", &self.upload_path),
            ("idle_label", &self.idle_label),
            ("busy_label", &self.busy_label),
            ("transport_failure_message", &self.transport_failure_message),
            ("not_an_image_message", &self.not_an_image_message),
            ("invalid_size_message", &self.invalid_size_message),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SketchifyError::InvalidConfig(format!(
                "{} must not be empty",
                name
            )));
        }
        Ok(self)
    }
}

/// Builder for [`PageConfig`]. Unset fields keep their defaults.
#[derive(Default)]
pub struct PageConfigBuilder {
    config: PageConfig,
}

impl PageConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn upload_path(mut self, path: impl Into<String>) -> Self {
        self.config.upload_path = path.into();
        self
    }

    pub fn labels(mut self, idle: impl Into<String>, busy: impl Into<String>) -> Self {
        self.config.idle_label = idle.into();
        self.config.busy_label = busy.into();
        self
    }

    pub fn default_success_message(mut self, message: impl Into<String>) -> Self {
        self.config.default_success_message = message.into();
        self
    }

    pub fn transport_failure_message(mut self, message: impl Into<String>) -> Self {
        self.config.transport_failure_message = message.into();
        self
    }

    pub fn not_an_image_message(mut self, message: impl Into<String>) -> Self {
        self.config.not_an_image_message = message.into();
        self
    }

    pub fn invalid_size_message(mut self, message: impl Into<String>) -> Self {
        self.config.invalid_size_message = message.into();
        self
    }

    /// Sets whether selections are dropped while a conversion is in flight.
    pub fn guard_busy(mut self, guard: bool) -> Self {
        self.config.guard_busy = guard;
        self
    }

    /// Builds the config. Fails if a required text or the upload path is blank.
    pub fn build(self) -> Result<PageConfig> {
        self.config.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_texts() {
        let config = PageConfig::default();
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.idle_label, "Pilih File");
        assert_eq!(config.busy_label, "Memproses...");
        assert_eq!(
            config.not_an_image_message,
            "Harap unggah file gambar (JPEG, PNG, dll.)."
        );
        assert!(config.guard_busy);
    }

    #[test]
    fn test_json_overrides_only_given_keys() {
        let config =
            PageConfig::from_json(r#"{"idle_label":"Choose file","guard_busy":false}"#).unwrap();
        assert_eq!(config.idle_label, "Choose file");
        assert!(!config.guard_busy);
        assert_eq!(config.busy_label, PageConfig::default().busy_label);
    }

    #[test]
    fn test_blank_label_is_rejected() {
        let err = PageConfig::builder().labels("", "Busy").build().unwrap_err();
        match err {
            SketchifyError::InvalidConfig(msg) => assert_eq!(msg, "idle_label must not be empty"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            PageConfig::from_json("{not json"),
            Err(SketchifyError::JsonDeserialization(_))
        ));
    }

    #[test]
    fn test_empty_success_message_is_allowed() {
        let config = PageConfig::builder()
            .default_success_message("")
            .upload_path("/api/upload")
            .build()
            .unwrap();
        assert_eq!(config.upload_path, "/api/upload");
        assert_eq!(config.default_success_message, "");
    }
}

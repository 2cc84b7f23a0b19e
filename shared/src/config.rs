use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_ANALYZE_PATH: &str = "/analyze";
pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_UPLOAD_FIELD: &str = "image";
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Query parameters a page URL may carry. Only `timeout_ms` is honored; the
/// endpoint is fixed when the client is built.
pub const PAGE_PARAMS: [&str; 4] = ["timeout_ms", "api_base", "analyze_path", "config"];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("API base URL must start with http:// or https://, got \"{0}\"")]
    InvalidBase(String),
    #[error("Endpoint path must start with '/', got \"{0}\"")]
    InvalidPath(String),
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
    #[error("Timeout must be a whole number of milliseconds, got \"{0}\"")]
    InvalidTimeout(String),
    #[error("\"{0}\" cannot be changed from the page URL")]
    NotOverridable(String),
    #[error("Upload field name must not be empty")]
    EmptyUploadField,
    #[error("At least one image MIME type must be allowed")]
    NoAllowedTypes,
}

/// Settings for talking to the analysis service and for accepting images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub analyze_path: String,
    pub health_path: String,
    pub upload_field: String,
    pub timeout_ms: u32,
    pub max_file_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_mime_types: ["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_analyze_path(mut self, path: &str) -> Self {
        self.analyze_path = path.trim().to_string();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Applies one page URL parameter. The endpoint cannot be redirected this way.
    pub fn apply_page_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "timeout_ms" => {
                let ms = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidTimeout(value.to_string()))?;
                if ms == 0 {
                    return Err(ConfigError::ZeroTimeout);
                }
                self.timeout_ms = ms;
                Ok(())
            }
            other => Err(ConfigError::NotOverridable(other.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidBase(self.api_base.clone()));
        }
        for path in [&self.analyze_path, &self.health_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath(path.clone()));
            }
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.upload_field.trim().is_empty() {
            return Err(ConfigError::EmptyUploadField);
        }
        if self.allowed_mime_types.is_empty() {
            return Err(ConfigError::NoAllowedTypes);
        }
        Ok(())
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.api_base, self.analyze_path)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.api_base, self.health_path)
    }

    /// Human readable form of the configured size cap, e.g. "10 MB".
    pub fn max_size_label(&self) -> String {
        format_megabytes(self.max_file_bytes)
    }
}

pub(crate) fn format_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    if mb.fract() == 0.0 {
        format!("{} MB", mb as u64)
    } else {
        format!("{:.1} MB", mb)
    }
}

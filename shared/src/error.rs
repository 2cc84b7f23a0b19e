use crate::config::format_megabytes;

/// Why an offered image was not accepted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileRejection {
    #[error("Unsupported file type \"{mime_type}\". Please choose a JPEG, PNG, WEBP or GIF image.")]
    UnsupportedType { mime_type: String },
    #[error("File is too large ({}). The maximum allowed size is {}.", mb(.size), mb(.max))]
    TooLarge { size: u64, max: u64 },
}

/// Everything that can go wrong between picking an image and showing a result.
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidFile(#[from] FileRejection),
    #[error("The analysis timed out after {} seconds. Please try again.", secs(.after_ms))]
    Timeout { after_ms: u32 },
    #[error("Network error: could not reach the analysis service ({0}).")]
    Network(String),
    #[error("{}", http_message(.status, .detail))]
    Http { status: u16, detail: Option<String> },
    #[error("Invalid response from the analysis service: {0}")]
    InvalidResponse(String),
    #[error("Unexpected response format: {0}")]
    Render(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidFile(_) => "invalid_file",
            AnalysisError::Timeout { .. } => "timeout",
            AnalysisError::Network(_) => "network",
            AnalysisError::Http { .. } => "http",
            AnalysisError::InvalidResponse(_) => "invalid_response",
            AnalysisError::Render(_) => "render",
        }
    }
}

fn mb(bytes: &u64) -> String {
    format_megabytes(*bytes)
}

fn secs(ms: &u32) -> String {
    let secs = *ms as f64 / 1000.0;
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{:.1}", secs)
    }
}

fn http_message(status: &u16, detail: &Option<String>) -> String {
    let suffix = detail
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!(": {}", d.trim()))
        .unwrap_or_default();

    match *status {
        404 => "Analysis endpoint not found (404). Check the configured API address.".to_string(),
        s if s >= 500 => format!("Server error ({}) while analyzing the image{}", s, suffix),
        s => format!("Request failed with status {}{}", s, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_are_distinct() {
        let wrong_type = AnalysisError::from(FileRejection::UnsupportedType {
            mime_type: "text/plain".into(),
        });
        let too_big = AnalysisError::from(FileRejection::TooLarge {
            size: 15 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        });

        assert!(wrong_type.to_string().contains("text/plain"));
        assert_eq!(
            too_big.to_string(),
            "File is too large (15 MB). The maximum allowed size is 10 MB."
        );
        assert_ne!(wrong_type.to_string(), too_big.to_string());
    }

    #[test]
    fn http_messages_by_status() {
        let not_found = AnalysisError::Http { status: 404, detail: Some("nope".into()) };
        assert!(not_found.to_string().contains("not found"));

        let server = AnalysisError::Http { status: 503, detail: Some("model offline".into()) };
        assert_eq!(
            server.to_string(),
            "Server error (503) while analyzing the image: model offline"
        );

        let other = AnalysisError::Http { status: 413, detail: None };
        assert_eq!(other.to_string(), "Request failed with status 413");
    }

    #[test]
    fn timeout_message_in_seconds() {
        assert_eq!(
            AnalysisError::Timeout { after_ms: 30_000 }.to_string(),
            "The analysis timed out after 30 seconds. Please try again."
        );
        assert!(AnalysisError::Timeout { after_ms: 2_500 }.to_string().contains("2.5 seconds"));
    }
}

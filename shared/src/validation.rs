use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::FileRejection;

/// Identifies one offered image and the preview handle created for it.
#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u64);

/// Metadata of an image the user wants to analyze; the bytes stay with the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl ImageCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Type is checked before size, so a huge text file reports the type problem.
pub fn validate_image(candidate: &ImageCandidate, config: &ClientConfig) -> Result<(), FileRejection> {
    let mime = candidate.mime_type.trim().to_ascii_lowercase();
    if !config.allowed_mime_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(&mime)) {
        return Err(FileRejection::UnsupportedType {
            mime_type: if mime.is_empty() { "unknown".to_string() } else { mime },
        });
    }

    if candidate.size > config.max_file_bytes {
        return Err(FileRejection::TooLarge {
            size: candidate.size,
            max: config.max_file_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn accepts_supported_images_up_to_the_limit() {
        let config = ClientConfig::default();
        assert!(validate_image(&ImageCandidate::new("a.png", "image/png", 10 * MB), &config).is_ok());
        assert!(validate_image(&ImageCandidate::new("b.JPG", "IMAGE/JPEG", 1), &config).is_ok());
    }

    #[test]
    fn rejects_oversize() {
        let config = ClientConfig::default();
        let err = validate_image(&ImageCandidate::new("big.jpg", "image/jpeg", 15 * MB), &config)
            .unwrap_err();
        assert_eq!(err, FileRejection::TooLarge { size: 15 * MB, max: 10 * MB });

        let just_over = ImageCandidate::new("edge.jpg", "image/jpeg", 10 * MB + 1);
        assert!(validate_image(&just_over, &config).is_err());
    }

    #[test]
    fn rejects_non_images() {
        let config = ClientConfig::default();
        let err = validate_image(&ImageCandidate::new("notes.txt", "text/plain", 12), &config)
            .unwrap_err();
        assert_eq!(err, FileRejection::UnsupportedType { mime_type: "text/plain".into() });

        let unknown = validate_image(&ImageCandidate::new("blob", "", 12), &config).unwrap_err();
        assert_eq!(unknown, FileRejection::UnsupportedType { mime_type: "unknown".into() });
    }
}

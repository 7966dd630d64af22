use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaletteError>;

/// Everything that can go wrong between receiving image bytes and handing a
/// palette to the renderer.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("clustering failed: {0}")]
    Clustering(String),
    #[error("{0}")]
    MissingReference(String),
    #[error("every detected color was excluded")]
    EmptyPalette,
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("unable to encode chart: {0}")]
    Encode(image::ImageError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PaletteError {
    /// Text shown to the user on the entry page. `action` names the flow
    /// that failed, e.g. "Error updating exclusions".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            PaletteError::MissingReference(msg) => msg.clone(),
            PaletteError::EmptyPalette => {
                "All colors are excluded. Remove at least one number from the exclusion list.".into()
            }
            other => format!("{action}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reference_message_is_passed_through() {
        let err = PaletteError::MissingReference("Image file not found, please upload again.".into());
        assert_eq!(
            err.user_message("Error updating exclusions"),
            "Image file not found, please upload again."
        );
    }

    #[test]
    fn kinds_produce_distinct_messages() {
        let clustering = PaletteError::Clustering("no pixels".into()).user_message("Error processing image");
        let empty = PaletteError::EmptyPalette.user_message("Error processing image");
        assert_eq!(clustering, "Error processing image: clustering failed: no pixels");
        assert!(empty.contains("excluded"));
        assert_ne!(clustering, empty);
    }

    #[test]
    fn action_prefixes_the_message() {
        let err = PaletteError::Config("bad".into());
        assert!(err.user_message("Error updating exclusions").starts_with("Error updating exclusions: "));
        assert!(err.user_message("Error processing image").starts_with("Error processing image: "));
    }
}

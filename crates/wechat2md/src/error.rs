//! Error types for wechat2md.
//!
//! Only an unparseable input fails a conversion. Missing metadata, images,
//! language hints or vendor markers are ordinary states that end in defaults.

use thiserror::Error;

/// All errors returned by wechat2md.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not HTML at all.
    #[error("Failed to parse article HTML: {reason}")]
    Parse { reason: String },

    /// A configured selector is not valid CSS.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let e = ConvertError::Parse {
            reason: "input is not valid UTF-8".into(),
        };
        assert_eq!(
            e.to_string(),
            "Failed to parse article HTML: input is not valid UTF-8"
        );
    }

    #[test]
    fn test_invalid_selector_display() {
        let e = ConvertError::InvalidSelector {
            selector: "##".into(),
            reason: "unexpected token".into(),
        };
        assert!(e.to_string().contains("'##'"));
    }
}

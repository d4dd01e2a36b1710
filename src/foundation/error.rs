/// Convenience result alias used throughout the crate.
pub type CardResult<T> = Result<T, CardError>;

/// Crate-wide error type.
///
/// Font acquisition and best-fit failures never surface here; they degrade
/// internally (fallback font, minimum size). The variants below cover the
/// remaining hard failures: bad inputs, unusable font/layout state, and
/// encoding of the finished canvas.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid caller input (empty word, zero-sized canvas, bad palette).
    #[error("validation error: {0}")]
    Validation(String),

    /// Font registration or text layout failed in a non-recoverable way.
    #[error("font error: {0}")]
    Font(String),

    /// The finished canvas could not be encoded to PNG.
    #[error("encode error: {0}")]
    Encode(String),

    /// Any other underlying failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Font`] from any message.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`CardError::Encode`] from any message.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CardError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(CardError::font("x").to_string().contains("font error:"));
        assert!(CardError::encode("x").to_string().contains("encode error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CardError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}

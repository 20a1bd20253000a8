pub type GifsciiResult<T> = Result<T, GifsciiError>;

#[derive(thiserror::Error, Debug)]
pub enum GifsciiError {
    /// Required per-frame control metadata is missing or invalid. Decoding
    /// stops at the offending frame; earlier frames stay valid.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// The input could not be opened as an animated GIF at all.
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifsciiError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedStream(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedCodec(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GifsciiError::malformed("x")
                .to_string()
                .contains("malformed stream:")
        );
        assert!(
            GifsciiError::unsupported("x")
                .to_string()
                .contains("unsupported codec:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GifsciiError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}

use common::GraphicsError;

pub type VerseResult<T> = Result<T, VerseError>;

#[derive(thiserror::Error, Debug)]
pub enum VerseError {
    #[error("no verse {verse} in chapter {chapter}")]
    UnknownVerse { chapter: u32, verse: u32 },

    #[error("verse index {index} out of range (catalogue has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

impl VerseError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_verse() {
        let err = VerseError::UnknownVerse { chapter: 3, verse: 9 };
        assert_eq!(err.to_string(), "no verse 9 in chapter 3");
        assert!(VerseError::invalid_config("x")
            .to_string()
            .starts_with("invalid configuration:"));
    }

    #[test]
    fn graphics_errors_convert() {
        let err: VerseError = GraphicsError::NoAdapter.into();
        assert!(matches!(err, VerseError::Graphics(_)));
    }
}

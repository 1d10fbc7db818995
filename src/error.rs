use thiserror::Error;

/// Internal invariant violations raised while applying input to a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cursor {cursor} is past the end of the expected text (length {len})")]
    CursorOutOfRange { cursor: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("language file not found: {0}")]
    NotFound(String),

    #[error("language file {0} is not valid utf-8")]
    NotUtf8(String),

    #[error("unable to read word list {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to deserialize language json")]
    Parse(#[from] serde_json::Error),

    #[error("word list {name} needs at least two distinct words, found {distinct}")]
    TooFewWords { name: String, distinct: usize },
}

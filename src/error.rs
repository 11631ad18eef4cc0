/// Error type shared by the loaders and the controller setup.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::status::Emotion;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("question file '{}' not found", path.display())]
    DataUnavailable { path: PathBuf },

    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("question file '{}' is not UTF-8; re-save it as UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("question file has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("question file has no answer columns")]
    NoAnswerColumns,

    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("no avatar frames for level {level}, emotion {emotion:?}")]
    AssetNotFound { level: usize, emotion: Emotion },

    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

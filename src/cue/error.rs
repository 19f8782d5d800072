use crate::cd::TimecodeError;
use thiserror::Error;

/// Failure inside a single recognized directive.
#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("Missing opening quote in FILE directive")]
    MissingOpeningQuote,

    #[error("Missing closing quote in FILE directive")]
    MissingClosingQuote,

    #[error("Missing file type after quoted filename")]
    MissingFileType,

    #[error("Invalid track number: {0}")]
    InvalidTrackNumber(String),

    #[error("Missing track mode")]
    MissingTrackMode,

    #[error("Invalid index number: {0}")]
    InvalidIndexNumber(String),

    #[error("Missing argument to {0} directive")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("INDEX directive outside of any TRACK")]
    DanglingIndex,
}

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed directive on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: DirectiveError,
    },
}

pub type CueResult<T> = Result<T, CueError>;

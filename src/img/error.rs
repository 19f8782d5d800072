use crate::cue::error::CueError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cue(#[from] CueError),

    #[error("No files are referenced in the cue sheet")]
    NoFileReferenced,

    #[error("Cue sheet contains no tracks")]
    NoTracks,

    #[error("Track {track} has no index points")]
    MissingIndex { track: u8 },

    #[error(
        "Track {track} starts at frame {offset}, not after the previous track at frame {previous}"
    )]
    TrackOrdering {
        track: u8,
        offset: u32,
        previous: u32,
    },

    #[error("Data file {data} and cue file {cue} do not share a base name")]
    NameMismatch { data: PathBuf, cue: PathBuf },

    #[error("File referenced in cue sheet not found: {0}")]
    ReferencedFileNotFound(PathBuf),

    #[error("Output file already exists, use --force to overwrite: {0}")]
    OutputExists(PathBuf),

    #[error("Conversion cancelled")]
    Cancelled,
}

impl ImgError {
    /// Whether this error stems from a missing filesystem entry, as opposed
    /// to a permission or other I/O failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            Self::ReferencedFileNotFound(_) => true,
            _ => false,
        }
    }
}

pub type ImgResult<T> = Result<T, ImgError>;

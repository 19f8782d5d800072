use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

pub const FRAMES_PER_SECOND: u32 = 75;
pub const SECONDS_PER_MINUTE: u32 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("Invalid timecode format, expected MM:SS:FF: {0}")]
    InvalidFormat(String),

    #[error("Invalid {field} field in timecode: {value}")]
    InvalidField {
        field: &'static str,
        value: String,
    },

    #[error("Timecode {field} out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: u8 },
}

pub type TimecodeResult<T> = Result<T, TimecodeError>;

/// Disc position as minutes:seconds:frames, 75 frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

impl Timecode {
    pub fn new(minutes: u8, seconds: u8, frames: u8) -> TimecodeResult<Self> {
        if seconds as u32 >= SECONDS_PER_MINUTE {
            return Err(TimecodeError::FieldOutOfRange {
                field: "seconds",
                value: seconds,
            });
        }
        if frames as u32 >= FRAMES_PER_SECOND {
            return Err(TimecodeError::FieldOutOfRange {
                field: "frames",
                value: frames,
            });
        }

        Ok(Self {
            minutes,
            seconds,
            frames,
        })
    }

    pub fn parse(text: &str) -> TimecodeResult<Self> {
        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() != 3 {
            return Err(TimecodeError::InvalidFormat(text.to_string()));
        }

        let field = |name: &'static str, value: &str| {
            value
                .parse::<u8>()
                .map_err(|_| TimecodeError::InvalidField {
                    field: name,
                    value: value.to_string(),
                })
        };

        Self::new(
            field("minutes", parts[0])?,
            field("seconds", parts[1])?,
            field("frames", parts[2])?,
        )
    }

    /// Absolute frame offset from the start of the disc.
    pub fn to_frames(&self) -> u32 {
        (self.minutes as u32 * SECONDS_PER_MINUTE + self.seconds as u32) * FRAMES_PER_SECOND
            + self.frames as u32
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}

impl PartialOrd for Timecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timecode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_frames().cmp(&other.to_frames())
    }
}

use crate::cd::Timecode;
use crate::cue::error::{CueError, CueResult, DirectiveError};
use crate::cue::models::{CueSheet, FileReference, IndexPoint, Track};
use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};

pub mod error;
pub mod models;

/// One recognized cue-sheet line. Anything the parser does not understand
/// becomes `Unknown` and is skipped, which keeps vendor extensions and
/// PREGAP/POSTGAP lines from failing the sheet.
#[derive(Debug)]
enum Directive {
    File {
        name: String,
        declared_type: String,
    },
    Track {
        number: u8,
        mode: String,
    },
    Index {
        number: u8,
        timecode: Timecode,
    },
    Unknown,
}

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    pub async fn parse(&self) -> CueResult<CueSheet> {
        let data = tokio::fs::read(&self.cue_path).await?;
        let reader = Cursor::new(data);

        let mut cue_sheet = CueSheet {
            files: Vec::new(),
            tracks: Vec::new(),
        };

        let mut current_track: Option<Track> = None;

        for (line_number, line) in reader.lines().enumerate() {
            let line_number = line_number + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let directive = tokenize(line).map_err(|source| CueError::Parse {
                line: line_number,
                source,
            })?;

            match directive {
                Directive::File {
                    name,
                    declared_type,
                } => {
                    if let Some(track) = current_track.take() {
                        cue_sheet.tracks.push(track);
                    }

                    cue_sheet.files.push(FileReference {
                        name,
                        declared_type,
                    });
                }
                Directive::Track { number, mode } => {
                    if let Some(track) = current_track.take() {
                        cue_sheet.tracks.push(track);
                    }

                    current_track = Some(Track {
                        number,
                        mode,
                        indexes: Vec::new(),
                    });
                }
                Directive::Index { number, timecode } => match &mut current_track {
                    Some(track) => track.indexes.push(IndexPoint { number, timecode }),
                    None => {
                        return Err(CueError::Parse {
                            line: line_number,
                            source: DirectiveError::DanglingIndex,
                        });
                    }
                },
                Directive::Unknown => {}
            }
        }

        if let Some(track) = current_track {
            cue_sheet.tracks.push(track);
        }

        Ok(cue_sheet)
    }
}

fn tokenize(line: &str) -> Result<Directive, DirectiveError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(keyword) = parts.first() else {
        return Ok(Directive::Unknown);
    };

    match keyword.to_ascii_uppercase().as_str() {
        "FILE" => {
            let (name, rest) = extract_quoted_string(line)?;
            let declared_type = rest
                .split_whitespace()
                .next()
                .ok_or(DirectiveError::MissingFileType)?
                .to_string();

            Ok(Directive::File {
                name,
                declared_type,
            })
        }
        "TRACK" => {
            let number = parts.get(1).ok_or(DirectiveError::MissingArgument("TRACK"))?;
            let number = number
                .parse::<u8>()
                .map_err(|_| DirectiveError::InvalidTrackNumber(number.to_string()))?;

            if parts.len() < 3 {
                return Err(DirectiveError::MissingTrackMode);
            }
            let mode = parts.last().unwrap().to_string();

            Ok(Directive::Track { number, mode })
        }
        "INDEX" => {
            let number = parts.get(1).ok_or(DirectiveError::MissingArgument("INDEX"))?;
            let number = number
                .parse::<u8>()
                .map_err(|_| DirectiveError::InvalidIndexNumber(number.to_string()))?;

            let timecode = parts.get(2).ok_or(DirectiveError::MissingArgument("INDEX"))?;
            let timecode = Timecode::parse(timecode)?;

            Ok(Directive::Index { number, timecode })
        }
        _ => Ok(Directive::Unknown),
    }
}

/// Returns the quoted filename and the remainder of the line after the
/// closing quote.
fn extract_quoted_string(line: &str) -> Result<(String, &str), DirectiveError> {
    let start = line.find('"').ok_or(DirectiveError::MissingOpeningQuote)?;
    let end = line.rfind('"').ok_or(DirectiveError::MissingOpeningQuote)?;
    if start >= end {
        return Err(DirectiveError::MissingClosingQuote);
    }

    Ok((line[start + 1..end].to_string(), &line[end + 1..]))
}

use crate::cue::models::CueSheet;
use crate::img::error::{ImgError, ImgResult};
use std::path::Path;

/// The primary data file and the cue file must share a base name, which
/// guards against accidentally pairing unrelated sheets.
pub fn validate_names(data_path: &Path, cue_path: &Path) -> ImgResult<()> {
    let data_base = data_path.file_stem();
    let cue_base = cue_path.file_stem();

    if data_base.is_none() || data_base != cue_base {
        return Err(ImgError::NameMismatch {
            data: data_path.to_path_buf(),
            cue: cue_path.to_path_buf(),
        });
    }

    Ok(())
}

/// Every FILE reference must resolve to an existing file next to the cue.
pub async fn validate_references(sheet: &CueSheet, cue_dir: &Path) -> ImgResult<()> {
    for reference in &sheet.files {
        let path = cue_dir.join(&reference.name);
        match tokio::fs::metadata(&path).await {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ImgError::ReferencedFileNotFound(path));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Structural checks on the parsed sheet: non-empty, every track indexed,
/// track start offsets strictly increasing. Downstream TOC generation
/// assumes tracks are laid out in ascending time order.
pub fn validate_sheet(sheet: &CueSheet) -> ImgResult<()> {
    if sheet.files.is_empty() {
        return Err(ImgError::NoFileReferenced);
    }
    if sheet.tracks.is_empty() {
        return Err(ImgError::NoTracks);
    }

    let mut previous: Option<u32> = None;
    for track in &sheet.tracks {
        let start = track
            .start()
            .ok_or(ImgError::MissingIndex { track: track.number })?;
        let offset = start.timecode.to_frames();

        if let Some(previous) = previous {
            if offset <= previous {
                return Err(ImgError::TrackOrdering {
                    track: track.number,
                    offset,
                    previous,
                });
            }
        }
        previous = Some(offset);
    }

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::cd::Timecode;
    use crate::cue::models::{FileReference, IndexPoint, Track};

    fn track(number: u8, timecode: &str) -> Track {
        Track {
            number,
            mode: "AUDIO".to_string(),
            indexes: vec![IndexPoint {
                number: 1,
                timecode: Timecode::parse(timecode).unwrap(),
            }],
        }
    }

    fn sheet(tracks: Vec<Track>) -> CueSheet {
        CueSheet {
            files: vec![FileReference {
                name: "game.bin".to_string(),
                declared_type: "BINARY".to_string(),
            }],
            tracks,
        }
    }

    #[test]
    fn matching_base_names_pass() {
        assert!(
            validate_names(Path::new("/discs/game.bin"), Path::new("/discs/game.cue")).is_ok()
        );
    }

    #[test]
    fn differing_base_names_fail() {
        let err = validate_names(Path::new("/discs/bar.bin"), Path::new("/discs/foo.cue"))
            .unwrap_err();
        assert!(matches!(err, ImgError::NameMismatch { .. }));
    }

    #[test]
    fn increasing_track_starts_pass() {
        let sheet = sheet(vec![
            track(1, "00:00:00"),
            track(2, "00:02:00"),
            track(3, "00:04:00"),
        ]);
        assert!(validate_sheet(&sheet).is_ok());
    }

    #[test]
    fn non_monotonic_track_starts_fail() {
        let sheet = sheet(vec![
            track(1, "00:00:00"),
            track(2, "00:02:00"),
            track(3, "00:01:00"),
        ]);

        let err = validate_sheet(&sheet).unwrap_err();
        assert!(matches!(
            err,
            ImgError::TrackOrdering {
                track: 3,
                offset: 75,
                previous: 150,
            }
        ));
    }

    #[test]
    fn equal_track_starts_fail() {
        let sheet = sheet(vec![track(1, "00:02:00"), track(2, "00:02:00")]);
        assert!(matches!(
            validate_sheet(&sheet).unwrap_err(),
            ImgError::TrackOrdering { .. }
        ));
    }

    #[test]
    fn empty_sheet_fails() {
        let empty = CueSheet {
            files: Vec::new(),
            tracks: Vec::new(),
        };
        assert!(matches!(
            validate_sheet(&empty).unwrap_err(),
            ImgError::NoFileReferenced
        ));

        assert!(matches!(
            validate_sheet(&sheet(Vec::new())).unwrap_err(),
            ImgError::NoTracks
        ));
    }

    #[test]
    fn track_without_indexes_fails() {
        let mut bad = sheet(vec![track(1, "00:00:00")]);
        bad.tracks.push(Track {
            number: 2,
            mode: "AUDIO".to_string(),
            indexes: Vec::new(),
        });

        assert!(matches!(
            validate_sheet(&bad).unwrap_err(),
            ImgError::MissingIndex { track: 2 }
        ));
    }

    #[tokio::test]
    async fn missing_referenced_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = sheet(vec![track(1, "00:00:00")]);

        let err = validate_references(&sheet, dir.path()).await.unwrap_err();
        match err {
            ImgError::ReferencedFileNotFound(path) => {
                assert_eq!(path, dir.path().join("game.bin"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn existing_referenced_files_pass() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("game.bin"), b"data")
            .await
            .unwrap();

        let sheet = sheet(vec![track(1, "00:00:00")]);
        assert!(validate_references(&sheet, dir.path()).await.is_ok());
    }
}

use crate::cue::models::CueSheet;
use crate::img::error::{ImgError, ImgResult};
use std::fmt::Write;
use std::path::Path;

// Fixed control-file constants. Existing .ccd readers expect these exact
// fields and values; entry numbering is zero-based while Point carries the
// one-based track number.
const VERSION: u32 = 3;
const SESSIONS: u32 = 1;
const ADR: u32 = 1;
const CONTROL: u32 = 4;
const PREGAP_MODE: u32 = 2;

/// Writes the table-of-contents control file describing the session, track
/// and index layout of `sheet`.
pub async fn write_toc(sheet: &CueSheet, output_path: &Path) -> ImgResult<()> {
    let contents = render(sheet)?;
    tokio::fs::write(output_path, contents).await?;
    Ok(())
}

fn render(sheet: &CueSheet) -> ImgResult<String> {
    let mut out = format!(
        "[CloneCD]\n\
         Version={VERSION}\n\
         \n\
         [Disc]\n\
         TocEntries={}\n\
         Sessions={SESSIONS}\n\
         DataTracksScrambled=0\n\
         CDTextLength=0\n\
         \n\
         [Session 1]\n\
         PreGapMode={PREGAP_MODE}\n\
         PreGapSubC=0\n",
        sheet.tracks.len()
    );

    for track in &sheet.tracks {
        let start = track
            .start()
            .ok_or(ImgError::MissingIndex { track: track.number })?;
        let timecode = start.timecode;

        write!(
            out,
            "\n\
             [Entry {entry}]\n\
             Session={SESSIONS}\n\
             Point={point}\n\
             ADR={ADR}\n\
             Control={CONTROL}\n\
             TrackNo=0\n\
             AMin=0\n\
             ASec=0\n\
             AFrame=0\n\
             ALBA=0\n\
             Zero=0\n\
             PMin={}\n\
             PSec={}\n\
             PFrame={}\n\
             PLBA=0\n",
            timecode.minutes,
            timecode.seconds,
            timecode.frames,
            entry = track.number.saturating_sub(1),
            point = track.number,
        )
        .expect("writing to a string is infallible");
    }

    Ok(out)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::cd::Timecode;
    use crate::cue::models::{FileReference, IndexPoint, Track};

    fn sheet(tracks: Vec<Track>) -> CueSheet {
        CueSheet {
            files: vec![FileReference {
                name: "game.bin".to_string(),
                declared_type: "BINARY".to_string(),
            }],
            tracks,
        }
    }

    fn track(number: u8, timecode: &str) -> Track {
        Track {
            number,
            mode: "MODE1/2352".to_string(),
            indexes: vec![IndexPoint {
                number: 1,
                timecode: Timecode::parse(timecode).unwrap(),
            }],
        }
    }

    #[test]
    fn emits_one_entry_block_per_track() {
        let rendered = render(&sheet(vec![
            track(1, "00:00:00"),
            track(2, "00:05:00"),
            track(3, "12:34:56"),
        ]))
        .unwrap();

        assert!(rendered.contains("TocEntries=3"));
        assert_eq!(rendered.matches("[Entry ").count(), 3);
        for entry in ["[Entry 0]", "[Entry 1]", "[Entry 2]"] {
            assert!(rendered.contains(entry), "missing {entry}");
        }
        for point in ["Point=1", "Point=2", "Point=3"] {
            assert!(rendered.contains(point), "missing {point}");
        }
    }

    #[test]
    fn entries_carry_the_first_index_timecode() {
        let rendered = render(&sheet(vec![track(1, "00:00:00"), track(2, "00:05:00")])).unwrap();

        let second_entry = rendered.split("[Entry 1]").nth(1).unwrap();
        assert!(second_entry.contains("PMin=0\n"));
        assert!(second_entry.contains("PSec=5\n"));
        assert!(second_entry.contains("PFrame=0\n"));
        assert!(second_entry.contains("PLBA=0\n"));
    }

    #[test]
    fn header_and_fixed_fields_match_the_format() {
        let rendered = render(&sheet(vec![track(1, "00:00:00")])).unwrap();

        assert!(rendered.starts_with("[CloneCD]\nVersion=3\n"));
        assert!(rendered.contains("[Disc]\nTocEntries=1\nSessions=1\n"));
        assert!(rendered.contains("DataTracksScrambled=0"));
        assert!(rendered.contains("CDTextLength=0"));
        assert!(rendered.contains("[Session 1]\nPreGapMode=2\nPreGapSubC=0\n"));
        assert!(rendered.contains("Session=1\nPoint=1\nADR=1\nControl=4\nTrackNo=0\n"));
        assert!(rendered.contains("AMin=0\nASec=0\nAFrame=0\nALBA=0\nZero=0\n"));
    }

    #[test]
    fn index_less_track_is_an_error() {
        let mut bad = sheet(vec![track(1, "00:00:00")]);
        bad.tracks.push(Track {
            number: 2,
            mode: "AUDIO".to_string(),
            indexes: Vec::new(),
        });

        assert!(matches!(
            render(&bad).unwrap_err(),
            ImgError::MissingIndex { track: 2 }
        ));
    }

    #[tokio::test]
    async fn writes_the_rendered_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ccd");

        write_toc(&sheet(vec![track(1, "00:02:00")]), &path)
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("PSec=2"));
    }
}

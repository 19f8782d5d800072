use crate::cue::models::CueSheet;
use crate::img::error::{ImgError, ImgResult};
use crate::img::progress::{CancelFlag, EventSender, PhaseRange};
use log::debug;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

const CHUNK_SIZE: usize = 1024 * 1024;
const IO_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Streams every referenced data file, in declared order, into one
/// consolidated image at `output_path`.
///
/// The total input size is computed up front so emitted percentages are
/// exact. Progress is scaled into `range` and the end of the range is
/// emitted exactly once. On failure or cancellation the partially written
/// output is left in place; callers that need atomicity should target a
/// temporary path and rename on success.
pub async fn assemble(
    sheet: &CueSheet,
    base_dir: &Path,
    output_path: &Path,
    events: &EventSender,
    range: PhaseRange,
    cancel: &CancelFlag,
) -> ImgResult<u64> {
    let mut total_bytes: u64 = 0;
    for reference in &sheet.files {
        let metadata = tokio::fs::metadata(base_dir.join(&reference.name)).await?;
        total_bytes += metadata.len();
    }

    debug!(
        "Assembling {} file(s), {} bytes total, into {:?}",
        sheet.files.len(),
        total_bytes,
        output_path
    );

    let output = File::create(output_path).await?;
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, output);

    let mut bytes_written: u64 = 0;
    let mut end_emitted = false;
    let mut chunk = vec![0u8; CHUNK_SIZE];

    for reference in &sheet.files {
        debug!("Appending {} ({})", reference.name, reference.declared_type);
        let input = File::open(base_dir.join(&reference.name)).await?;
        let mut reader = BufReader::with_capacity(IO_BUFFER_SIZE, input);

        loop {
            let read = reader.read(&mut chunk).await?;
            if read == 0 {
                break;
            }

            writer.write_all(&chunk[..read]).await?;
            bytes_written += read as u64;

            if total_bytes > 0 {
                let percent = range.at(bytes_written as f64 / total_bytes as f64);
                if percent >= range.end {
                    if !end_emitted {
                        end_emitted = true;
                        events.progress(range.end, format!("Copying {}", reference.name));
                    }
                } else {
                    events.progress(percent, format!("Copying {}", reference.name));
                }
            }

            if cancel.is_cancelled() {
                writer.flush().await?;
                return Err(ImgError::Cancelled);
            }
        }
    }

    writer.flush().await?;

    if !end_emitted {
        events.progress(range.end, "Image assembled");
    }

    debug!("Wrote {} bytes to {:?}", bytes_written, output_path);

    Ok(bytes_written)
}

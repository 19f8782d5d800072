use crate::cue::CueParser;
use crate::img::error::{ImgError, ImgResult};
use crate::img::progress::{
    BatchResult, CancelFlag, EventSender, JobOutcome, PhaseRange, WrittenPaths,
};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod assembler;
pub mod error;
pub mod progress;
mod subchannel;
mod toc;
mod validate;

pub const IMAGE_EXTENSION: &str = "img";
pub const TOC_EXTENSION: &str = "ccd";

// Each phase owns a fixed slice of the 0-100 job range, so percentages are
// monotonically non-decreasing across the whole job.
const VALIDATE_RANGE: PhaseRange = PhaseRange {
    start: 0.0,
    end: 5.0,
};
const ASSEMBLE_RANGE: PhaseRange = PhaseRange {
    start: 5.0,
    end: 90.0,
};
const TOC_RANGE: PhaseRange = PhaseRange {
    start: 90.0,
    end: 95.0,
};
const SUBCHANNEL_RANGE: PhaseRange = PhaseRange {
    start: 95.0,
    end: 100.0,
};

/// One cue sheet with its data files, converted into one output image set.
/// Consumed once; never reused.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Resolved data file paths, in cue order. May be empty, in which case
    /// the primary data file is resolved from the sheet's first FILE
    /// reference next to the cue.
    pub data_files: Vec<PathBuf>,
    pub cue_path: PathBuf,
    pub output_dir: PathBuf,
    pub force: bool,
}

/// Runs the full pipeline for one job and emits exactly one terminal
/// `Finished` event. The returned outcome is the same value carried by that
/// event.
pub async fn convert_one(
    job: &ConversionJob,
    events: &EventSender,
    cancel: &CancelFlag,
) -> JobOutcome {
    debug!("Converting {:?}", job.cue_path);

    let outcome = match run_job(job, events, cancel).await {
        Ok(paths) => JobOutcome::Success(paths),
        Err(ImgError::Cancelled) => JobOutcome::Cancelled,
        Err(err) => JobOutcome::Failure(Arc::new(err)),
    };

    events.finished(outcome.clone());
    outcome
}

/// Runs jobs sequentially. A failure in one job never prevents the jobs
/// after it; cancellation observed at the inter-job boundary marks the
/// remaining jobs cancelled without starting them.
pub async fn convert_batch(
    jobs: &[ConversionJob],
    events: &EventSender,
    cancel: &CancelFlag,
) -> BatchResult {
    let mut outcomes = Vec::with_capacity(jobs.len());

    for (index, job) in jobs.iter().enumerate() {
        let job_events = events.for_job(index);

        let outcome = if cancel.is_cancelled() {
            let outcome = JobOutcome::Cancelled;
            job_events.finished(outcome.clone());
            outcome
        } else {
            convert_one(job, &job_events, cancel).await
        };

        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();

    BatchResult {
        succeeded,
        failed: outcomes.len() - succeeded,
        outcomes,
    }
}

/// Validating -> Assembling -> WritingToc -> CopyingSubchannel, forward
/// only. Validation failures abort before any output path is touched;
/// assembly failures may leave a partial image behind, surfaced through the
/// terminal event.
async fn run_job(
    job: &ConversionJob,
    events: &EventSender,
    cancel: &CancelFlag,
) -> ImgResult<WrittenPaths> {
    if cancel.is_cancelled() {
        return Err(ImgError::Cancelled);
    }

    events.progress(VALIDATE_RANGE.start, "Parsing cue sheet");
    let sheet = CueParser::new(&job.cue_path).parse().await?;

    let cue_dir = job.cue_path.parent().unwrap_or(Path::new("."));

    let primary = match job.data_files.first() {
        Some(path) => path.clone(),
        None => {
            let first = sheet.files.first().ok_or(ImgError::NoFileReferenced)?;
            cue_dir.join(&first.name)
        }
    };

    validate::validate_names(&primary, &job.cue_path)?;
    validate::validate_references(&sheet, cue_dir).await?;
    validate::validate_sheet(&sheet)?;

    for track in &sheet.tracks {
        for index in &track.indexes {
            debug!(
                "Track {:02} ({}) index {:02} at {}",
                track.number, track.mode, index.number, index.timecode
            );
        }
    }

    let stem = job.cue_path.file_stem().unwrap_or_default();
    let image_path = job.output_dir.join(stem).with_extension(IMAGE_EXTENSION);
    let toc_path = job.output_dir.join(stem).with_extension(TOC_EXTENSION);

    if !job.force && tokio::fs::metadata(&image_path).await.is_ok() {
        return Err(ImgError::OutputExists(image_path));
    }

    events.progress(VALIDATE_RANGE.end, "Cue sheet validated");

    assembler::assemble(
        &sheet,
        cue_dir,
        &image_path,
        events,
        ASSEMBLE_RANGE,
        cancel,
    )
    .await?;

    events.progress(TOC_RANGE.start, "Writing table of contents");
    toc::write_toc(&sheet, &toc_path).await?;
    events.progress(TOC_RANGE.end, "Table of contents written");

    let subchannel = subchannel::copy_if_present(&job.cue_path, &job.output_dir).await?;
    let message = match &subchannel {
        Some(_) => "Subchannel file copied",
        None => "No subchannel file found",
    };
    events.progress(SUBCHANNEL_RANGE.end, message);

    debug!("Conversion of {:?} complete", job.cue_path);

    Ok(WrittenPaths {
        image: image_path,
        toc: toc_path,
        subchannel,
    })
}

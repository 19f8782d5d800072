use crate::commands::{Cli, Commands};
use crate::img::ConversionJob;
use crate::img::progress::{BatchResult, CancelFlag, EventSender, JobOutcome, ProgressEvent};
use anyhow::Result;
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{error, info, warn};
use tokio::sync::mpsc;

mod cd;
mod commands;
mod cue;
mod img;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    let cli = Cli::parse();

    let jobs = match cli.command {
        Commands::Convert(cmd) => vec![ConversionJob {
            data_files: cmd.data,
            cue_path: cmd.input_cue,
            output_dir: cmd.output_dir,
            force: cmd.force,
        }],
        Commands::Batch(cmd) => cmd
            .input_cues
            .into_iter()
            .map(|cue_path| ConversionJob {
                data_files: Vec::new(),
                cue_path,
                output_dir: cmd.output_dir.clone(),
                force: cmd.force,
            })
            .collect(),
    };

    let result = run_pipeline(pb, jobs).await?;

    info!(
        "Batch finished: {} succeeded, {} failed",
        result.succeeded, result.failed
    );

    if result.failed > 0 {
        anyhow::bail!(
            "{} of {} conversions failed",
            result.failed,
            result.outcomes.len()
        );
    }

    Ok(())
}

/// Spawns the conversion pipeline on its own task and renders its event
/// stream: one bar per job plus an overall batch bar.
async fn run_pipeline(pb: MultiProgress, jobs: Vec<ConversionJob>) -> Result<BatchResult> {
    let total_jobs = jobs.len();
    let job_names: Vec<String> = jobs
        .iter()
        .map(|job| {
            job.cue_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| job.cue_path.display().to_string())
        })
        .collect();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let events = EventSender::new(tx);
    let cancel = CancelFlag::new();

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested, stopping at the next chunk boundary");
            ctrl_c_cancel.cancel();
        }
    });

    let worker =
        tokio::spawn(async move { img::convert_batch(&jobs, &events, &cancel).await });

    let job_style = ProgressStyle::with_template(
        "{prefix:.bold} [{bar:40}] {percent:>3}% {msg}",
    )?
    .progress_chars("=> ");

    let overall = if total_jobs > 1 {
        let bar = pb.add(ProgressBar::new(100));
        bar.set_style(job_style.clone());
        bar.set_prefix("overall");
        Some(bar)
    } else {
        None
    };

    let mut bars: Vec<Option<ProgressBar>> = vec![None; total_jobs];
    let mut completed_jobs = 0usize;

    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::Progress {
                job,
                percent,
                message,
            } => {
                let bar = bars[job].get_or_insert_with(|| {
                    let bar = pb.add(ProgressBar::new(100));
                    bar.set_style(job_style.clone());
                    bar.set_prefix(job_names[job].clone());
                    bar
                });
                bar.set_position(percent as u64);
                bar.set_message(message);

                if let Some(overall) = &overall {
                    let overall_percent =
                        (completed_jobs as f64 + percent / 100.0) / total_jobs as f64 * 100.0;
                    overall.set_position(overall_percent as u64);
                }
            }
            ProgressEvent::Finished { job, outcome } => {
                completed_jobs += 1;

                let bar = bars[job].take();
                match outcome {
                    JobOutcome::Success(paths) => {
                        info!("Wrote {:?} and {:?}", paths.image, paths.toc);
                        match paths.subchannel {
                            Some(subchannel) => info!("Wrote {:?}", subchannel),
                            None => info!("No subchannel file found for {}", job_names[job]),
                        }
                        if let Some(bar) = bar {
                            bar.finish_with_message("Done");
                        }
                    }
                    JobOutcome::Cancelled => {
                        warn!("{} cancelled", job_names[job]);
                        if let Some(bar) = bar {
                            bar.abandon_with_message("Cancelled");
                        }
                    }
                    JobOutcome::Failure(err) => {
                        error!("{} failed: {}", job_names[job], err);
                        if err.is_not_found() {
                            warn!(
                                "Check that the data files referenced by the cue sheet sit next to it"
                            );
                        }
                        if let Some(bar) = bar {
                            bar.abandon_with_message("Failed");
                        }
                    }
                }

                if let Some(overall) = &overall {
                    let overall_percent = completed_jobs as f64 / total_jobs as f64 * 100.0;
                    overall.set_position(overall_percent as u64);
                }
            }
        }
    }

    if let Some(overall) = &overall {
        overall.finish_and_clear();
    }

    Ok(worker.await?)
}

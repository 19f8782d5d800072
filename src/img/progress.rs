use crate::img::error::ImgError;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Event pushed by the pipeline while a batch runs. Receive order equals
/// emission order; the consumer may coalesce for display but the pipeline
/// never does.
#[derive(Debug)]
pub enum ProgressEvent {
    Progress {
        job: usize,
        percent: f64,
        message: String,
    },
    Finished {
        job: usize,
        outcome: JobOutcome,
    },
}

/// Terminal state of one job. Cloneable so the same outcome can ride the
/// event stream and the aggregate [`BatchResult`].
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Success(WrittenPaths),
    Cancelled,
    Failure(Arc<ImgError>),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct WrittenPaths {
    pub image: PathBuf,
    pub toc: PathBuf,
    pub subchannel: Option<PathBuf>,
}

#[derive(Debug)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<JobOutcome>,
}

/// Job-scoped producer half of the event channel. Sends are fire-and-forget;
/// a consumer that hung up must not fail the conversion.
#[derive(Clone)]
pub struct EventSender {
    job: usize,
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { job: 0, tx }
    }

    pub fn for_job(&self, job: usize) -> Self {
        Self {
            job,
            tx: self.tx.clone(),
        }
    }

    pub fn progress(&self, percent: f64, message: impl Into<String>) {
        let _ = self.tx.send(ProgressEvent::Progress {
            job: self.job,
            percent,
            message: message.into(),
        });
    }

    pub fn finished(&self, outcome: JobOutcome) {
        let _ = self.tx.send(ProgressEvent::Finished {
            job: self.job,
            outcome,
        });
    }
}

/// Cooperative cancellation shared between the pipeline task and its host.
/// Checked at chunk and job boundaries only.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A phase's slice of the 0-100 job progress range.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRange {
    pub start: f64,
    pub end: f64,
}

impl PhaseRange {
    pub fn at(&self, fraction: f64) -> f64 {
        self.start + (self.end - self.start) * fraction.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn phase_range_scales_and_clamps() {
        let range = PhaseRange {
            start: 5.0,
            end: 90.0,
        };
        assert_eq!(range.at(0.0), 5.0);
        assert_eq!(range.at(1.0), 90.0);
        assert_eq!(range.at(0.5), 47.5);
        assert_eq!(range.at(2.0), 90.0);
        assert_eq!(range.at(-1.0), 5.0);
    }

    #[test]
    fn sender_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = EventSender::new(tx);
        drop(rx);

        events.progress(10.0, "still running");
        events.finished(JobOutcome::Cancelled);
    }

    #[tokio::test]
    async fn events_arrive_in_emission_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = EventSender::new(tx).for_job(3);

        events.progress(1.0, "a");
        events.progress(2.0, "b");
        events.finished(JobOutcome::Cancelled);

        match rx.recv().await.unwrap() {
            ProgressEvent::Progress { job, percent, .. } => {
                assert_eq!(job, 3);
                assert_eq!(percent, 1.0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            ProgressEvent::Progress { percent, .. } => assert_eq!(percent, 2.0),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            ProgressEvent::Finished {
                job: 3,
                outcome: JobOutcome::Cancelled,
            }
        ));
    }
}

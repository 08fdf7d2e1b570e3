//! Background job queue feeding the resume pipeline.
//!
//! Enqueueing is fire-and-forget: the upload handler never consumes a result. Runs for
//! different resume ids execute in parallel across the worker pool; runs for the same id
//! are not mutually excluded.

use crate::processing::ResumePipeline;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Fire-and-forget dispatch of pipeline runs.
pub trait JobQueue: Send + Sync {
    /// Schedule a pipeline run for the given resume id.
    fn enqueue(&self, resume_id: String);
}

/// Channel-backed queue draining into a pool of tokio workers.
pub struct ResumeQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl ResumeQueue {
    /// Spawn `workers` pipeline workers and return the queue handle.
    pub fn start(pipeline: Arc<ResumePipeline>, workers: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                loop {
                    let job = rx.lock().await.recv().await;
                    let Some(resume_id) = job else {
                        tracing::debug!(worker, "Job queue closed; worker exiting");
                        break;
                    };
                    tracing::info!(worker, resume_id = %resume_id, "Worker picked up resume job");
                    if let Err(error) = pipeline.process(&resume_id).await {
                        tracing::error!(
                            worker,
                            resume_id = %resume_id,
                            error = %error,
                            "Resume processing failed"
                        );
                    }
                }
            });
        }

        Self { tx }
    }
}

impl JobQueue for ResumeQueue {
    fn enqueue(&self, resume_id: String) {
        if self.tx.send(resume_id).is_err() {
            tracing::error!("Job queue is closed; dropping resume job");
        }
    }
}

//! Polling reconciler
//!
//! Waits for submitted jobs to reach a terminal state. A single job is
//! polled on its own status URL. A batch is polled with one combined
//! request per round covering only the jobs that are still pending; the
//! server answers that request by job id, so the reconciler keeps the
//! job id -> correlation key mapping across rounds.
//!
//! Errors abort the whole wait. Nothing is retried and no partial batch
//! results are returned.

use std::collections::{BTreeMap, HashMap, HashSet};

use appchains_core::domain::job::{JobHandle, JobStatus};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::AppChainsClient;
use crate::error::{ClientError, Result};

/// Correlation state of a batch across polling rounds
///
/// Every key lives in exactly one of `outstanding` (by job id) or
/// `finished` (by key), so a key can never be reported twice or lost.
#[derive(Debug, Default)]
pub(crate) struct BatchTracker {
    outstanding: BTreeMap<JobHandle, String>,
    finished: HashMap<String, JobStatus>,
}

impl BatchTracker {
    /// Registers the submitted jobs; keys and job ids must be unique
    pub(crate) fn new(submitted: &[(String, JobStatus)]) -> Result<Self> {
        let mut tracker = Self::default();
        let mut keys = HashSet::with_capacity(submitted.len());
        for (key, status) in submitted {
            if !keys.insert(key.as_str()) {
                return Err(ClientError::protocol(format!(
                    "correlation key {} appears more than once in the batch",
                    key
                )));
            }
            if tracker
                .outstanding
                .insert(status.job_id(), key.clone())
                .is_some()
            {
                return Err(ClientError::protocol(format!(
                    "job {} was assigned to more than one batch entry",
                    status.job_id()
                )));
            }
        }
        Ok(tracker)
    }

    /// Applies one round of statuses
    ///
    /// Completed jobs move to the finished set under their submission key.
    /// Jobs missing from the round stay outstanding.
    pub(crate) fn absorb(&mut self, statuses: Vec<JobStatus>) -> Result<()> {
        for status in statuses {
            let job_id = status.job_id();
            if !self.outstanding.contains_key(&job_id) {
                return Err(ClientError::protocol(format!(
                    "batch status returned job {} which is not pending",
                    job_id
                )));
            }
            if status.is_completed() {
                if let Some(key) = self.outstanding.remove(&job_id) {
                    debug!("Job {} ({}) finished: {}", job_id, key, status.status_text());
                    self.finished.insert(key, status);
                }
            }
        }
        Ok(())
    }

    /// Job ids still waiting for a terminal status, in ascending order
    pub(crate) fn pending_ids(&self) -> Vec<JobHandle> {
        self.outstanding.keys().copied().collect()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.outstanding.len()
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub(crate) fn into_finished(self) -> HashMap<String, JobStatus> {
        self.finished
    }
}

impl AppChainsClient {
    /// Poll a job until the server reports a terminal status
    pub(crate) async fn await_completion(&self, status: JobStatus) -> Result<JobStatus> {
        let job_id = status.job_id();
        let started = Instant::now();
        let mut status = status;
        let mut round: u32 = 0;

        loop {
            if status.is_completed() {
                info!(
                    "Job {} finished with status {} after {} poll(s)",
                    job_id,
                    status.status_text(),
                    round
                );
                return Ok(status);
            }

            round += 1;
            let delay = self
                .poll_policy
                .next_delay(round, started.elapsed())
                .ok_or_else(|| {
                    ClientError::job_polling(
                        job_id,
                        ClientError::PollLimitExceeded { rounds: round - 1 },
                    )
                })?;

            debug!(
                "Job {} is {}, polling again in {:?} (round {})",
                job_id,
                status.status_text(),
                delay,
                round
            );
            tokio::time::sleep(delay).await;

            let next = self
                .fetch_job_status(job_id)
                .await
                .map_err(|e| ClientError::job_polling(job_id, e))?;

            if next.job_id() != job_id {
                return Err(ClientError::job_polling(
                    job_id,
                    ClientError::protocol(format!(
                        "status request for job {} returned job {}",
                        job_id,
                        next.job_id()
                    )),
                ));
            }
            status = next;
        }
    }

    /// Poll a batch until every job reports a terminal status
    ///
    /// # Returns
    /// The final status of every job, keyed by its correlation key
    pub(crate) async fn await_batch_completion(
        &self,
        submitted: Vec<(String, JobStatus)>,
    ) -> Result<HashMap<String, JobStatus>> {
        let mut tracker = BatchTracker::new(&submitted)?;
        let mut statuses: Vec<JobStatus> = submitted.into_iter().map(|(_, status)| status).collect();
        let started = Instant::now();
        let mut round: u32 = 0;

        loop {
            tracker
                .absorb(statuses)
                .map_err(|e| ClientError::batch_polling(tracker.pending_count(), e))?;

            if tracker.is_settled() {
                info!("Batch finished after {} combined poll(s)", round);
                return Ok(tracker.into_finished());
            }

            round += 1;
            let pending = tracker.pending_ids();
            let delay = self
                .poll_policy
                .next_delay(round, started.elapsed())
                .ok_or_else(|| {
                    ClientError::batch_polling(
                        pending.len(),
                        ClientError::PollLimitExceeded { rounds: round - 1 },
                    )
                })?;

            debug!(
                "{} job(s) pending, polling again in {:?} (round {})",
                pending.len(),
                delay,
                round
            );
            tokio::time::sleep(delay).await;

            statuses = self
                .fetch_batch_status(&pending)
                .await
                .map_err(|e| ClientError::batch_polling(pending.len(), e))?;
        }
    }
}

//! Polls a job's phase until it reaches (or passes) a target phase.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::source::JobStatusSource;
use super::wait::Wait;
use crate::error::MonitorError;
use crate::lifecycle::{JobIdentity, Phase, Snapshot, order_index};

/// Outcome of a single polling attempt.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub matched: bool,
    pub snapshot: Snapshot,
}

/// Order index of the phase in `snapshot`; a name the engine does not know
/// is a consistency error, never a reason to keep polling.
fn observed_index(snapshot: &Snapshot) -> Result<usize, MonitorError> {
    order_index(&snapshot.status).ok_or_else(|| MonitorError::UnknownPhase {
        job: snapshot.job.to_string(),
        status: snapshot.status.clone(),
    })
}

/// One attempt: fetch a phase-only snapshot and compare it with `target`.
///
/// A job already past `target` counts as a match, since phases never go back.
pub async fn check_phase(
    source: &impl JobStatusSource,
    job: &JobIdentity,
    target: Phase,
) -> Result<CheckResult, MonitorError> {
    let snapshot = source.fetch_status(job, false).await?;
    let current = observed_index(&snapshot)?;
    Ok(CheckResult {
        matched: current >= target.order_index(),
        snapshot,
    })
}

/// Polls up to `attempts` times, pausing `delay` between attempts, and returns
/// the first snapshot at or past `target`.
///
/// The returned snapshot reports the phase actually observed, which can be
/// later than `target`. With `attempts == 0` there is no bound to exhaust: the
/// job is checked once and that snapshot is returned whether it matched or not.
pub async fn poll_for_phase(
    source: &impl JobStatusSource,
    wait: &impl Wait,
    job: &JobIdentity,
    target: Phase,
    attempts: u32,
    delay: Duration,
) -> Result<Snapshot, MonitorError> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        let check = check_phase(source, job, target).await?;
        debug!(
            %job,
            attempt,
            attempts,
            status = %check.snapshot.status,
            %target,
            matched = check.matched,
            "polled job status"
        );

        if check.matched {
            info!(%job, attempt, status = %check.snapshot.status, %target, "job reached phase");
            return Ok(check.snapshot);
        }
        if attempts == 0 {
            debug!(%job, status = %check.snapshot.status, %target, "single check, not polling");
            return Ok(check.snapshot);
        }
        if attempt >= attempts {
            return Err(MonitorError::AttemptsExhausted {
                job: job.to_string(),
                target,
                attempts,
                last_status: check.snapshot.status,
            });
        }
        wait.wait(delay).await;
    }
}

/// [`poll_for_phase`], then one more fetch for step data on success.
///
/// The step-data fetch is best effort: if it fails (for instance because the
/// job was purged right after ending) the phase-only snapshot is returned.
pub async fn poll_for_phase_with_detail(
    source: &impl JobStatusSource,
    wait: &impl Wait,
    job: &JobIdentity,
    target: Phase,
    attempts: u32,
    delay: Duration,
) -> Result<Snapshot, MonitorError> {
    let reached = poll_for_phase(source, wait, job, target, attempts, delay).await?;

    match source.fetch_status(job, true).await {
        Ok(detailed) => Ok(detailed),
        Err(err) => {
            warn!(%job, error = %err, "could not fetch step data, returning status only");
            Ok(reached)
        }
    }
}

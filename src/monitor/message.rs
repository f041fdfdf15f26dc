//! Polls a job's output until a line contains a given text.

use std::time::Duration;

use tracing::{debug, info};

use super::source::{JobOutputSource, JobStatusSource};
use super::wait::Wait;
use crate::error::MonitorError;
use crate::lifecycle::{JobIdentity, Phase};

/// True while the job is past the queue and not finished yet.
///
/// Only the two boundary phases are treated as "no new output coming".
pub async fn is_running(
    source: &impl JobStatusSource,
    job: &JobIdentity,
) -> Result<bool, MonitorError> {
    let snapshot = source.fetch_status(job, false).await?;
    let phase = Phase::lookup(&snapshot.status).ok_or_else(|| MonitorError::UnknownPhase {
        job: job.to_string(),
        status: snapshot.status.clone(),
    })?;
    Ok(phase != Phase::first() && phase != Phase::last())
}

/// Searches the last `line_limit` lines of `output` for `needle`.
///
/// Lines further back are never looked at, so a message that scrolled out of
/// the window between two polls is missed.
pub fn tail_contains(output: &str, needle: &str, line_limit: usize) -> bool {
    output
        .lines()
        .rev()
        .take(line_limit)
        .any(|line| line.contains(needle))
}

/// Polls the output up to `attempts` times and reports whether `needle` showed
/// up. Gives up early once the job stops running. With `attempts == 0` the
/// output is searched once and that result is returned.
pub async fn poll_for_message<S>(
    source: &S,
    wait: &impl Wait,
    job: &JobIdentity,
    needle: &str,
    attempts: u32,
    delay: Duration,
    line_limit: usize,
) -> Result<bool, MonitorError>
where
    S: JobStatusSource + JobOutputSource,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        let output = source.fetch_output(job).await?;
        if tail_contains(&output, needle, line_limit) {
            info!(%job, attempt, needle, "message found in job output");
            return Ok(true);
        }
        debug!(%job, attempt, attempts, needle, "message not in job output yet");

        if attempts == 0 {
            debug!(%job, needle, "single search, not polling");
            return Ok(false);
        }
        if attempt >= attempts {
            info!(%job, attempts, needle, "message not found within attempt budget");
            return Ok(false);
        }
        if !is_running(source, job).await? {
            info!(%job, attempt, needle, "job is not running, message will not appear");
            return Ok(false);
        }
        wait.wait(delay).await;
    }
}

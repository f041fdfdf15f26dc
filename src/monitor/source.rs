//! Contracts for the collaborators that read job state from the service.

use crate::error::FetchError;
use crate::lifecycle::{JobIdentity, Snapshot};

/// Reads the current phase of a job.
#[allow(async_fn_in_trait)]
pub trait JobStatusSource {
    /// With `include_detail`, the snapshot also carries step data, which is
    /// more expensive for the service to produce.
    async fn fetch_status(
        &self,
        job: &JobIdentity,
        include_detail: bool,
    ) -> Result<Snapshot, FetchError>;
}

/// Reads a job's textual output, oldest line first.
#[allow(async_fn_in_trait)]
pub trait JobOutputSource {
    async fn fetch_output(&self, job: &JobIdentity) -> Result<String, FetchError>;
}

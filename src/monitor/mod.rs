//! Job monitoring engine: waits for a job to reach a phase or to print a message.
//!
//! [`JobMonitor`] is the entry point. It resolves caller options against
//! [`MonitorDefaults`] into a [`MonitorRequest`] and drives the status poller
//! or the message poller with it.

pub mod message;
mod request;
pub mod source;
pub mod status;
pub mod wait;

#[cfg(test)]
pub(crate) mod fake;

use tracing::{Instrument, Span, info_span};

pub use request::{
    DEFAULT_ATTEMPTS, DEFAULT_DELAY, DEFAULT_LINE_LIMIT, DEFAULT_PHASE, MessageTarget,
    MonitorDefaults, MonitorOptions, MonitorRequest, MonitorTarget,
};
pub use source::{JobOutputSource, JobStatusSource};
pub use wait::{TokioWait, Wait};

use crate::error::MonitorError;
use crate::lifecycle::{JobIdentity, Phase, Snapshot};

/// Result of [`JobMonitor::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    /// The job reached the target phase or a later one.
    Reached(Snapshot),
    /// Whether the message was seen in the job output.
    Message(bool),
}

fn request_span(request: &MonitorRequest) -> Span {
    info_span!("monitor", request_id = %request.id, job = %request.job)
}

/// Waits on jobs of one service.
pub struct JobMonitor<S, W = TokioWait> {
    source: S,
    wait: W,
    defaults: MonitorDefaults,
}

impl<S> JobMonitor<S, TokioWait> {
    pub fn new(source: S) -> Self {
        Self::with_wait(source, TokioWait)
    }
}

impl<S, W> JobMonitor<S, W> {
    pub fn with_wait(source: S, wait: W) -> Self {
        Self {
            source,
            wait,
            defaults: MonitorDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: MonitorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &MonitorDefaults {
        &self.defaults
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn phase_request(
        &self,
        name: &str,
        id: &str,
        options: &MonitorOptions,
    ) -> Result<MonitorRequest, MonitorError> {
        let job = JobIdentity::new(name, id)?;
        Ok(MonitorRequest::for_phase(job, options, &self.defaults))
    }

    pub fn message_request(
        &self,
        name: &str,
        id: &str,
        needle: &str,
        options: &MonitorOptions,
    ) -> Result<MonitorRequest, MonitorError> {
        let job = JobIdentity::new(name, id)?;
        MonitorRequest::for_message(job, needle, options, &self.defaults)
    }
}

impl<S, W> JobMonitor<S, W>
where
    S: JobStatusSource + JobOutputSource,
    W: Wait,
{
    /// Runs a resolved request, dispatching on its target.
    pub async fn run(&self, request: &MonitorRequest) -> Result<MonitorOutcome, MonitorError> {
        match &request.target {
            MonitorTarget::Phase(phase) => self
                .run_phase(request, *phase)
                .await
                .map(MonitorOutcome::Reached),
            MonitorTarget::Message(target) => self
                .run_message(request, target)
                .await
                .map(MonitorOutcome::Message),
        }
    }

    async fn run_phase(&self, request: &MonitorRequest, phase: Phase) -> Result<Snapshot, MonitorError> {
        status::poll_for_phase_with_detail(
            &self.source,
            &self.wait,
            &request.job,
            phase,
            request.attempts,
            request.delay,
        )
        .instrument(request_span(request))
        .await
    }

    async fn run_message(
        &self,
        request: &MonitorRequest,
        target: &MessageTarget,
    ) -> Result<bool, MonitorError> {
        message::poll_for_message(
            &self.source,
            &self.wait,
            &request.job,
            &target.needle,
            request.attempts,
            request.delay,
            target.line_limit,
        )
        .instrument(request_span(request))
        .await
    }

    /// Waits until job `name`/`id` reaches `options.phase` (default OUTPUT)
    /// or any later phase. The returned snapshot includes step data when the
    /// service could provide it.
    pub async fn wait_for_status(
        &self,
        name: &str,
        id: &str,
        options: &MonitorOptions,
    ) -> Result<Snapshot, MonitorError> {
        let job = JobIdentity::new(name, id)?;
        let phase = MonitorTarget::phase(options, &self.defaults);
        let request = MonitorRequest::new(job, MonitorTarget::Phase(phase), options, &self.defaults);
        self.run_phase(&request, phase).await
    }

    pub async fn wait_for_phase(
        &self,
        name: &str,
        id: &str,
        phase: Phase,
    ) -> Result<Snapshot, MonitorError> {
        let options = MonitorOptions {
            phase: Some(phase),
            ..Default::default()
        };
        self.wait_for_status(name, id, &options).await
    }

    pub async fn wait_for_output_status(&self, name: &str, id: &str) -> Result<Snapshot, MonitorError> {
        self.wait_for_phase(name, id, Phase::Output).await
    }

    /// Same as [`wait_for_output_status`](Self::wait_for_output_status), for a
    /// job known from an earlier snapshot (e.g. the one returned on submit).
    pub async fn wait_for_job_output_status(&self, job: &Snapshot) -> Result<Snapshot, MonitorError> {
        self.wait_for_output_status(job.job.name(), job.job.id()).await
    }

    /// Waits until a line among the last `options.line_limit` lines of the job
    /// output contains `needle`.
    pub async fn wait_for_message(
        &self,
        name: &str,
        id: &str,
        needle: &str,
        options: &MonitorOptions,
    ) -> Result<bool, MonitorError> {
        let job = JobIdentity::new(name, id)?;
        let target = MessageTarget::resolve(needle, options, &self.defaults)?;
        let request = MonitorRequest::new(
            job,
            MonitorTarget::Message(target.clone()),
            options,
            &self.defaults,
        );
        self.run_message(&request, &target).await
    }

    pub async fn is_running(&self, name: &str, id: &str) -> Result<bool, MonitorError> {
        let job = JobIdentity::new(name, id)?;
        message::is_running(&self.source, &job).await
    }
}

//! Scripted in-memory job used by the poller tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::source::{JobOutputSource, JobStatusSource};
use super::wait::Wait;
use crate::error::FetchError;
use crate::lifecycle::{JobIdentity, Snapshot, StepData};

/// Replays a fixed sequence of phases and outputs. Once a script runs out,
/// its last entry repeats.
pub(crate) struct ScriptedJob {
    statuses: Vec<&'static str>,
    outputs: Vec<String>,
    detail_fails: bool,
    next_status_error: Mutex<Option<FetchError>>,
    next_output_error: Mutex<Option<FetchError>>,
    pub status_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub output_calls: AtomicUsize,
}

impl ScriptedJob {
    pub fn new(statuses: &[&'static str]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            outputs: vec![String::new()],
            detail_fails: false,
            next_status_error: Mutex::new(None),
            next_output_error: Mutex::new(None),
            status_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            output_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = outputs.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn failing_detail(mut self) -> Self {
        self.detail_fails = true;
        self
    }

    pub fn failing_next_poll(self, err: FetchError) -> Self {
        *self.next_status_error.lock().unwrap() = Some(err);
        self
    }

    pub fn failing_next_output(self, err: FetchError) -> Self {
        *self.next_output_error.lock().unwrap() = Some(err);
        self
    }

    pub fn polls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn detail_fetches(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn output_fetches(&self) -> usize {
        self.output_calls.load(Ordering::SeqCst)
    }

    fn status_at(&self, call: usize) -> &'static str {
        self.statuses[call.min(self.statuses.len() - 1)]
    }
}

impl JobStatusSource for ScriptedJob {
    async fn fetch_status(
        &self,
        job: &JobIdentity,
        include_detail: bool,
    ) -> Result<Snapshot, FetchError> {
        if include_detail {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.detail_fails {
                return Err(FetchError::Api {
                    status: 500,
                    message: "step data unavailable".into(),
                });
            }
            let seen = self.polls().saturating_sub(1);
            let mut snap = Snapshot::new(job.clone(), self.status_at(seen));
            snap.steps = Some(vec![StepData {
                step_number: 1,
                step_name: Some("STEP1".into()),
                proc_step_name: None,
                program_name: Some("IEFBR14".into()),
                completion: Some("CC 0000".into()),
                active: false,
                smfid: Some("SYSA".into()),
            }]);
            return Ok(snap);
        }

        if let Some(err) = self.next_status_error.lock().unwrap().take() {
            return Err(err);
        }
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Snapshot::new(job.clone(), self.status_at(call)))
    }
}

impl JobOutputSource for ScriptedJob {
    async fn fetch_output(&self, _job: &JobIdentity) -> Result<String, FetchError> {
        let call = self.output_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_output_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.outputs[call.min(self.outputs.len() - 1)].clone())
    }
}

/// Records every requested pause instead of sleeping.
#[derive(Default)]
pub(crate) struct RecordingWait {
    pub delays: Mutex<Vec<Duration>>,
}

impl RecordingWait {
    pub fn count(&self) -> usize {
        self.delays.lock().unwrap().len()
    }
}

impl Wait for RecordingWait {
    async fn wait(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

pub(crate) fn job() -> JobIdentity {
    JobIdentity::new("PAYROLL", "JOB00100").unwrap()
}

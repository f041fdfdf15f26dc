use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MonitorError;
use crate::monitor::{MonitorOutcome, MonitorRequest, MonitorTarget};

/// Name and id of one job instance on the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobIdentity {
    name: String,
    id: String,
}

impl JobIdentity {
    /// Both parts must be non-empty once surrounding whitespace is removed.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Result<Self, MonitorError> {
        let name = name.into().trim().to_string();
        let id = id.into().trim().to_string();
        if name.is_empty() {
            return Err(MonitorError::InvalidJob("job name must not be empty".into()));
        }
        if id.is_empty() {
            return Err(MonitorError::InvalidJob(format!(
                "job id must not be empty (job {name})"
            )));
        }
        Ok(Self { name, id })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// Execution details of one job step, only present on detailed snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StepData {
    pub step_number: u32,
    #[serde(default)]
    pub step_name: Option<String>,
    #[serde(default)]
    pub proc_step_name: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    /// Completion text such as `CC 0000`; absent while the step runs.
    #[serde(default)]
    pub completion: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub smfid: Option<String>,
}

/// A point-in-time read of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub job: JobIdentity,
    /// Phase name exactly as the service reported it.
    pub status: String,
    pub owner: Option<String>,
    pub class: Option<String>,
    pub job_type: Option<String>,
    pub retcode: Option<String>,
    /// `None` unless the fetch asked for step data.
    pub steps: Option<Vec<StepData>>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// A bare snapshot carrying only identity and phase.
    pub fn new(job: JobIdentity, status: impl Into<String>) -> Self {
        Self {
            job,
            status: status.into(),
            owner: None,
            class: None,
            job_type: None,
            retcode: None,
            steps: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn has_detail(&self) -> bool {
        self.steps.is_some()
    }
}

/// Summary of one monitor run, printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    pub request_id: Uuid,
    pub job: JobIdentity,
    pub target: String,
    pub outcome: String,
    pub final_status: Option<String>,
    pub retcode: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl MonitorReport {
    pub fn from_outcome(
        request: &MonitorRequest,
        outcome: &MonitorOutcome,
        started_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        let target = match &request.target {
            MonitorTarget::Phase(phase) => phase.to_string(),
            MonitorTarget::Message(target) => format!("message {:?}", target.needle),
        };
        let (outcome, final_status, retcode) = match outcome {
            MonitorOutcome::Reached(snapshot) => (
                "reached".to_string(),
                Some(snapshot.status.clone()),
                snapshot.retcode.clone(),
            ),
            MonitorOutcome::Message(true) => ("found".to_string(), None, None),
            MonitorOutcome::Message(false) => ("not found".to_string(), None, None),
        };

        Self {
            request_id: request.id,
            job: request.job.clone(),
            target,
            outcome,
            final_status,
            retcode,
            started_at,
            completed_at: now,
            duration_ms: (now - started_at).num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Phase;
    use crate::monitor::{MonitorDefaults, MonitorOptions};

    #[test]
    fn identity_trims_and_validates() {
        let job = JobIdentity::new(" IEFBR14 ", "JOB00042").unwrap();
        assert_eq!(job.name(), "IEFBR14");
        assert_eq!(job.id(), "JOB00042");
        assert_eq!(job.to_string(), "IEFBR14(JOB00042)");

        assert!(matches!(
            JobIdentity::new("", "JOB1"),
            Err(MonitorError::InvalidJob(_))
        ));
        assert!(matches!(
            JobIdentity::new("NAME", "   "),
            Err(MonitorError::InvalidJob(_))
        ));
    }

    #[test]
    fn step_data_reads_service_field_names() {
        let json = r#"{
            "smfid": "SYSA",
            "completion": "CC 0000",
            "active": false,
            "step-number": 1,
            "proc-step-name": null,
            "step-name": "STEP1",
            "program-name": "IEFBR14"
        }"#;
        let step: StepData = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_number, 1);
        assert_eq!(step.step_name.as_deref(), Some("STEP1"));
        assert_eq!(step.program_name.as_deref(), Some("IEFBR14"));
        assert_eq!(step.completion.as_deref(), Some("CC 0000"));
        assert!(step.proc_step_name.is_none());
    }

    #[test]
    fn bare_snapshot_has_no_detail() {
        let snap = Snapshot::new(JobIdentity::new("A", "B").unwrap(), "ACTIVE");
        assert_eq!(snap.status, "ACTIVE");
        assert!(!snap.has_detail());
    }

    #[test]
    fn report_from_reached_outcome() {
        let request = MonitorRequest::for_phase(
            JobIdentity::new("PAYROLL", "JOB00100").unwrap(),
            &MonitorOptions {
                phase: Some(Phase::Output),
                ..Default::default()
            },
            &MonitorDefaults::default(),
        );
        let mut snap = Snapshot::new(request.job.clone(), "OUTPUT");
        snap.retcode = Some("CC 0000".into());
        let report =
            MonitorReport::from_outcome(&request, &MonitorOutcome::Reached(snap), Utc::now());

        assert_eq!(report.request_id, request.id);
        assert_eq!(report.target, "OUTPUT");
        assert_eq!(report.outcome, "reached");
        assert_eq!(report.final_status.as_deref(), Some("OUTPUT"));
        assert_eq!(report.retcode.as_deref(), Some("CC 0000"));
        assert!(report.duration_ms >= 0);
    }

    #[test]
    fn report_from_message_outcome() {
        let request = MonitorRequest::for_message(
            JobIdentity::new("PAYROLL", "JOB00100").unwrap(),
            "RC=0000",
            &MonitorOptions::default(),
            &MonitorDefaults::default(),
        )
        .unwrap();
        let report =
            MonitorReport::from_outcome(&request, &MonitorOutcome::Message(false), Utc::now());
        assert_eq!(report.target, r#"message "RC=0000""#);
        assert_eq!(report.outcome, "not found");
        assert!(report.final_status.is_none());
    }
}

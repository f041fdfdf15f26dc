use thiserror::Error;

use crate::lifecycle::Phase;

/// Errors returned by the job status and output fetchers.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service does not know the job (purged, or never existed).
    #[error("job not found: {job}")]
    NotFound { job: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("unknown phase {0:?}, expected one of INPUT, ACTIVE, OUTPUT")]
    InvalidPhase(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The service reported a phase name outside the known vocabulary.
    #[error("job {job} reported unrecognized phase {status:?}")]
    UnknownPhase { job: String, status: String },

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("fetch failed: {0}")]
    Fetch(#[source] FetchError),

    #[error("job {job} did not reach {target} within {attempts} attempts (last status {last_status})")]
    AttemptsExhausted {
        job: String,
        target: Phase,
        attempts: u32,
        last_status: String,
    },

    #[error("monitoring interrupted")]
    Interrupted,
}

impl From<FetchError> for MonitorError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { job } => MonitorError::JobNotFound(job),
            other => MonitorError::Fetch(other),
        }
    }
}

/// Broad category of a [`MonitorError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Bad input, rejected before any fetch.
    Configuration,
    /// Engine vocabulary and service vocabulary disagree.
    Consistency,
    NotFound,
    Transport,
    /// Attempt budget used up without seeing the condition.
    Timeout,
    Interrupted,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "Configuration"),
            ErrorKind::Consistency => write!(f, "Consistency"),
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl MonitorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitorError::InvalidJob(_)
            | MonitorError::InvalidPhase(_)
            | MonitorError::InvalidOption(_) => ErrorKind::Configuration,
            MonitorError::UnknownPhase { .. } => ErrorKind::Consistency,
            MonitorError::JobNotFound(_) => ErrorKind::NotFound,
            MonitorError::Fetch(_) => ErrorKind::Transport,
            MonitorError::AttemptsExhausted { .. } => ErrorKind::Timeout,
            MonitorError::Interrupted => ErrorKind::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_fetch_becomes_job_not_found() {
        let err: MonitorError = FetchError::NotFound {
            job: "A(JOB1)".into(),
        }
        .into();
        assert!(matches!(err, MonitorError::JobNotFound(ref job) if job == "A(JOB1)"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_fetch_errors_stay_transport() {
        let err: MonitorError = FetchError::Api {
            status: 503,
            message: "unavailable".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "fetch failed: API error (status 503): unavailable"
        );
    }

    #[test]
    fn attempts_exhausted_display() {
        let err = MonitorError::AttemptsExhausted {
            job: "A(JOB1)".into(),
            target: Phase::Output,
            attempts: 3,
            last_status: "ACTIVE".into(),
        };
        assert_eq!(
            err.to_string(),
            "job A(JOB1) did not reach OUTPUT within 3 attempts (last status ACTIVE)"
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn configuration_kinds() {
        assert_eq!(
            MonitorError::InvalidPhase("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            MonitorError::InvalidJob("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            MonitorError::UnknownPhase {
                job: "A(B)".into(),
                status: "HELD".into()
            }
            .kind(),
            ErrorKind::Consistency
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MonitorError>();
        assert_send_sync::<FetchError>();
    }
}

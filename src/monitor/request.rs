use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MonitorError;
use crate::lifecycle::{JobIdentity, Phase};

pub const DEFAULT_ATTEMPTS: u32 = 1000;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_LINE_LIMIT: usize = 1000;
pub const DEFAULT_PHASE: Phase = Phase::Output;

/// Values used for any option a caller leaves unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorDefaults {
    pub attempts: u32,
    pub delay: Duration,
    pub line_limit: usize,
    pub phase: Phase,
}

impl Default for MonitorDefaults {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
            line_limit: DEFAULT_LINE_LIMIT,
            phase: DEFAULT_PHASE,
        }
    }
}

/// Caller-facing knobs; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorOptions {
    pub phase: Option<Phase>,
    /// `Some(0)` counts as unset.
    pub attempts: Option<u32>,
    pub delay: Option<Duration>,
    /// Message mode only. `Some(0)` counts as unset.
    pub line_limit: Option<usize>,
}

/// What a monitor run waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorTarget {
    Phase(Phase),
    Message(MessageTarget),
}

impl MonitorTarget {
    /// `options.phase`, or the configured default phase.
    pub fn phase(options: &MonitorOptions, defaults: &MonitorDefaults) -> Phase {
        options.phase.unwrap_or(defaults.phase)
    }
}

/// Text searched for in the last `line_limit` lines of the job output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTarget {
    pub needle: String,
    /// Always at least 1.
    pub line_limit: usize,
}

impl MessageTarget {
    pub fn resolve(
        needle: impl Into<String>,
        options: &MonitorOptions,
        defaults: &MonitorDefaults,
    ) -> Result<Self, MonitorError> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(MonitorError::InvalidOption(
                "message to search for must not be empty".into(),
            ));
        }
        let line_limit = options
            .line_limit
            .filter(|&n| n > 0)
            .unwrap_or(defaults.line_limit)
            .max(1);
        Ok(Self { needle, line_limit })
    }
}

/// A fully resolved, validated monitor run. Built once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRequest {
    pub id: Uuid,
    pub job: JobIdentity,
    pub target: MonitorTarget,
    /// Always at least 1.
    pub attempts: u32,
    pub delay: Duration,
}

impl MonitorRequest {
    pub fn for_phase(job: JobIdentity, options: &MonitorOptions, defaults: &MonitorDefaults) -> Self {
        let phase = MonitorTarget::phase(options, defaults);
        Self::new(job, MonitorTarget::Phase(phase), options, defaults)
    }

    pub fn for_message(
        job: JobIdentity,
        needle: impl Into<String>,
        options: &MonitorOptions,
        defaults: &MonitorDefaults,
    ) -> Result<Self, MonitorError> {
        let target = MessageTarget::resolve(needle, options, defaults)?;
        Ok(Self::new(job, MonitorTarget::Message(target), options, defaults))
    }

    /// Request for an already resolved `target`; budget and delay come from
    /// `options`, falling back to `defaults`.
    pub fn new(
        job: JobIdentity,
        target: MonitorTarget,
        options: &MonitorOptions,
        defaults: &MonitorDefaults,
    ) -> Self {
        let attempts = options
            .attempts
            .filter(|&n| n > 0)
            .unwrap_or(defaults.attempts)
            .max(1);
        Self {
            id: Uuid::new_v4(),
            job,
            target,
            attempts,
            delay: options.delay.unwrap_or(defaults.delay),
        }
    }
}

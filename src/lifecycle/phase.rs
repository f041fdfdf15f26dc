use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// The lifecycle phases a batch job moves through on the remote service.
///
/// Each job flows through: INPUT → ACTIVE → OUTPUT. Polls may skip a phase,
/// but an observed phase never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Queued for execution, not started yet.
    Input,
    /// Executing.
    Active,
    /// Finished; output is held on the spool.
    Output,
}

impl Phase {
    /// Every phase, earliest first. The position in this table is the order index.
    pub const ORDER: [Phase; 3] = [Phase::Input, Phase::Active, Phase::Output];

    /// The name the service uses for this phase.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Input => "INPUT",
            Phase::Active => "ACTIVE",
            Phase::Output => "OUTPUT",
        }
    }

    pub fn order_index(self) -> usize {
        self as usize
    }

    pub fn first() -> Phase {
        Self::ORDER[0]
    }

    pub fn last() -> Phase {
        Self::ORDER[Self::ORDER.len() - 1]
    }

    /// Exact lookup of a phase name as reported by the service.
    pub fn lookup(name: &str) -> Option<Phase> {
        Self::ORDER.into_iter().find(|phase| phase.name() == name)
    }
}

/// Position of `name` in [`Phase::ORDER`], or `None` for a name outside the vocabulary.
pub fn order_index(name: &str) -> Option<usize> {
    Phase::lookup(name).map(Phase::order_index)
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a caller-supplied phase name. Case does not matter here, unlike
/// [`Phase::lookup`], which only accepts the service's own spelling.
impl FromStr for Phase {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::lookup(&s.trim().to_ascii_uppercase())
            .ok_or_else(|| MonitorError::InvalidPhase(s.to_string()))
    }
}

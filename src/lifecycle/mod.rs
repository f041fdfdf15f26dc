mod job;
mod phase;

pub use job::{JobIdentity, MonitorReport, Snapshot, StepData};
pub use phase::{Phase, order_index};

//! Waits for batch jobs on a z/OSMF-style REST service to reach a lifecycle
//! phase or to print a message in their output.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use jobwatch::{JobMonitor, RestJobsClient};
//!
//! let client = RestJobsClient::new("https://mvs.example.com:443")?
//!     .with_credentials("IBMUSER", "secret");
//! let monitor = JobMonitor::new(client);
//! let done = monitor.wait_for_output_status("PAYROLL", "JOB00100").await?;
//! println!("{} ended with {:?}", done.job, done.retcode);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod monitor;
pub mod restjobs;
pub mod ui;

pub use error::{ErrorKind, FetchError, MonitorError};
pub use lifecycle::{JobIdentity, MonitorReport, Phase, Snapshot, StepData};
pub use monitor::{JobMonitor, MonitorDefaults, MonitorOptions, MonitorOutcome, MonitorRequest};
pub use restjobs::RestJobsClient;

pub mod client;
pub mod types;

pub use client::RestJobsClient;
pub use types::{JobResponse, SpoolFile};

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::types::{JobResponse, SpoolFile};
use crate::error::FetchError;
use crate::lifecycle::{JobIdentity, Snapshot};
use crate::monitor::{JobOutputSource, JobStatusSource};

const JOBS_PATH: &str = "/zosmf/restjobs/jobs";
const CSRF_HEADER: &str = "X-CSRF-ZOSMF-HEADER";

/// HTTP client for the z/OSMF jobs REST interface.
pub struct RestJobsClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl RestJobsClient {
    /// `base_url` is scheme, host and port, e.g. `https://mvs.example.com:443`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn job_url(&self, job: &JobIdentity) -> String {
        format!("{}{JOBS_PATH}/{}/{}", self.base_url, job.name(), job.id())
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let req = self.client.get(url).header(CSRF_HEADER, "true");
        match &self.credentials {
            Some((user, password)) => req.basic_auth(user, Some(password)),
            None => req,
        }
    }

    async fn send(&self, job: &JobIdentity, req: RequestBuilder) -> Result<Response, FetchError> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                job: job.to_string(),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Reads the job's status; `include_detail` adds step data.
    pub async fn get_job(&self, job: &JobIdentity, include_detail: bool) -> Result<Snapshot, FetchError> {
        let mut req = self.get(&self.job_url(job));
        if include_detail {
            req = req.query(&[("step-data", "Y")]);
        }
        let body = self.send(job, req).await?.json::<JobResponse>().await?;
        body.into_snapshot()
    }

    pub async fn list_spool_files(&self, job: &JobIdentity) -> Result<Vec<SpoolFile>, FetchError> {
        let url = format!("{}/files", self.job_url(job));
        let files = self.send(job, self.get(&url)).await?.json::<Vec<SpoolFile>>().await?;
        Ok(files)
    }

    pub async fn read_spool_file(&self, job: &JobIdentity, file_id: u32) -> Result<String, FetchError> {
        let url = format!("{}/files/{file_id}/records", self.job_url(job));
        let text = self.send(job, self.get(&url)).await?.text().await?;
        Ok(text)
    }

    /// All spool files of the job, concatenated in listing order.
    pub async fn read_all_spool(&self, job: &JobIdentity) -> Result<String, FetchError> {
        let files = self.list_spool_files(job).await?;
        debug!(%job, files = files.len(), "reading spool files");

        let mut output = String::new();
        for file in &files {
            let text = self.read_spool_file(job, file.id).await?;
            output.push_str(&text);
            if !text.is_empty() && !text.ends_with('\n') {
                output.push('\n');
            }
        }
        Ok(output)
    }
}

impl JobStatusSource for RestJobsClient {
    async fn fetch_status(&self, job: &JobIdentity, include_detail: bool) -> Result<Snapshot, FetchError> {
        self.get_job(job, include_detail).await
    }
}

impl JobOutputSource for RestJobsClient {
    async fn fetch_output(&self, job: &JobIdentity) -> Result<String, FetchError> {
        self.read_all_spool(job).await
    }
}

//! Tipos de dados das respostas da API REST de jobs (`/zosmf/restjobs`).
//!
//! As structs derivam `Deserialize` com os nomes de campo em kebab-case usados
//! pelo serviço e são convertidas para o modelo interno ([`Snapshot`]).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::lifecycle::{JobIdentity, Snapshot, StepData};

/// Corpo retornado por `GET /zosmf/restjobs/jobs/{name}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobResponse {
    pub jobname: String,
    pub jobid: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Fase do job: "INPUT", "ACTIVE" ou "OUTPUT".
    pub status: String,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    /// Código de retorno (ex.: "CC 0000", "ABEND S0C4"); `None` enquanto executa.
    #[serde(default)]
    pub retcode: Option<String>,
    /// Presente apenas quando a consulta usa `step-data=Y`.
    #[serde(default)]
    pub step_data: Option<Vec<StepData>>,
}

impl JobResponse {
    /// Converte a resposta em um [`Snapshot`]. Falha se o serviço devolver
    /// nome ou id vazios.
    pub fn into_snapshot(self) -> Result<Snapshot, FetchError> {
        let job = JobIdentity::new(self.jobname, self.jobid)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(Snapshot {
            job,
            status: self.status,
            owner: self.owner,
            class: self.class,
            job_type: self.job_type,
            retcode: self.retcode,
            steps: self.step_data,
            fetched_at: Utc::now(),
        })
    }
}

/// Um arquivo de spool listado por `GET .../{name}/{id}/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpoolFile {
    pub id: u32,
    pub ddname: String,
    #[serde(default)]
    pub stepname: Option<String>,
    #[serde(default)]
    pub procstep: Option<String>,
    #[serde(default)]
    pub record_count: Option<u64>,
}

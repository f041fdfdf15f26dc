//! Interface de linha de comando do jobwatch baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (status, message, running)
//! e flags globais (--config, --verbose, --json).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::lifecycle::Phase;
use crate::monitor::MonitorOptions;

/// jobwatch — acompanha jobs batch até uma fase ou mensagem esperada.
#[derive(Debug, Parser)]
#[command(name = "jobwatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo de configuração (padrão: ./jobwatch.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (logs de depuração).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Imprime o relatório final em JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// Fase aceita pela CLI, mapeada para [`Phase`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    /// Na fila, ainda não iniciado.
    Input,
    /// Em execução.
    Active,
    /// Finalizado, saída disponível.
    Output,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Input => Phase::Input,
            PhaseArg::Active => Phase::Active,
            PhaseArg::Output => Phase::Output,
        }
    }
}

/// Identificação do job: nome e id.
#[derive(Debug, Args)]
pub struct JobArgs {
    /// Nome do job (ex.: PAYROLL).
    pub jobname: String,
    /// Id do job (ex.: JOB00100).
    pub jobid: String,
}

/// Controle das consultas; valores omitidos vêm da configuração.
#[derive(Debug, Args)]
pub struct PollArgs {
    /// Número máximo de consultas.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Intervalo entre consultas, em milissegundos.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aguarda o job atingir uma fase (ou uma fase posterior).
    Status {
        #[command(flatten)]
        job: JobArgs,

        /// Fase alvo.
        #[arg(long, value_enum)]
        phase: Option<PhaseArg>,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Aguarda um texto aparecer nas últimas linhas da saída do job.
    Message {
        #[command(flatten)]
        job: JobArgs,

        /// Texto procurado.
        text: String,

        /// Quantas linhas finais da saída examinar.
        #[arg(long)]
        lines: Option<usize>,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Informa se o job está em execução.
    Running {
        #[command(flatten)]
        job: JobArgs,
    },
}

impl PollArgs {
    pub fn to_options(&self) -> MonitorOptions {
        MonitorOptions {
            attempts: self.attempts,
            delay: self.delay_ms.map(Duration::from_millis),
            ..Default::default()
        }
    }
}

//! Interface de terminal do jobwatch — spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`MonitorProgress`] também serve de pausa entre
//! consultas ([`Wait`]), atualizando o spinner a cada nova tentativa.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::MonitorError;
use crate::lifecycle::{JobIdentity, MonitorReport};
use crate::monitor::{MonitorOutcome, TokioWait, Wait};

/// Indicador visual de progresso enquanto um job é monitorado.
///
/// Exibe um spinner animado durante as consultas e mensagens coloridas para
/// sucesso (verde), falha (vermelho) e aviso (amarelo).
pub struct MonitorProgress {
    // Spinner do indicatif; oculto quando a saída é JSON.
    pb: ProgressBar,
    // Texto base exibido ao lado do spinner.
    description: String,
    // Pausas já realizadas.
    waits: AtomicU32,
    green: Style,
    red: Style,
    yellow: Style,
}

impl MonitorProgress {
    /// Inicia o spinner com a descrição do monitoramento.
    pub fn start(description: &str, visible: bool) -> Self {
        let pb = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(description.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            description: description.to_string(),
            waits: AtomicU32::new(0),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    pub fn waits(&self) -> u32 {
        self.waits.load(Ordering::Relaxed)
    }

    /// Finaliza o spinner e exibe o resultado do monitoramento.
    pub fn complete(&self, job: &JobIdentity, outcome: &MonitorOutcome) {
        self.pb.finish_and_clear();
        match outcome {
            MonitorOutcome::Reached(snapshot) => {
                let retcode = snapshot.retcode.as_deref().unwrap_or("-");
                println!(
                    "  {} {job} is {} (retcode {retcode})",
                    self.green.apply_to("✓"),
                    snapshot.status
                );
                for step in snapshot.steps.iter().flatten() {
                    println!(
                        "      step {:>3} {:<8} {:<8} {}",
                        step.step_number,
                        step.step_name.as_deref().unwrap_or(""),
                        step.program_name.as_deref().unwrap_or(""),
                        step.completion.as_deref().unwrap_or("running")
                    );
                }
            }
            MonitorOutcome::Message(true) => {
                println!("  {} Message found in {job} output", self.green.apply_to("✓"));
            }
            MonitorOutcome::Message(false) => {
                println!("  {} Message not found in {job} output", self.yellow.apply_to("!"));
            }
        }
    }

    /// Exibe se o job está em execução.
    pub fn running(&self, job: &JobIdentity, running: bool) {
        self.pb.finish_and_clear();
        if running {
            println!("  {} {job} is running", self.green.apply_to("▶"));
        } else {
            println!("  {} {job} is not running", self.yellow.apply_to("■"));
        }
    }

    /// Finaliza o spinner e exibe o erro em vermelho com sua categoria.
    pub fn fail(&self, err: &MonitorError) {
        self.pb.finish_and_clear();
        eprintln!("  {} {} error: {err}", self.red.apply_to("✗"), err.kind());
    }

    /// Imprime o relatório final formatado em JSON.
    pub fn print_report(&self, report: &MonitorReport) {
        println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
    }
}

impl Wait for MonitorProgress {
    async fn wait(&self, delay: Duration) {
        let n = self.waits.fetch_add(1, Ordering::Relaxed) + 1;
        self.pb.set_message(format!(
            "{} {}",
            self.description,
            self.yellow
                .apply_to(format!("(check {} in {}ms)", n + 1, delay.as_millis()))
        ));
        TokioWait.wait(delay).await;
    }
}

//! Configuração do jobwatch carregada a partir de `jobwatch.toml`.
//!
//! A struct [`JobwatchConfig`] contém a conexão com o serviço e os valores
//! padrão do monitor. Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `JOBWATCH_URL`, `JOBWATCH_USER` e
//! `JOBWATCH_PASSWORD` têm precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::lifecycle::Phase;
use crate::monitor::{DEFAULT_ATTEMPTS, DEFAULT_DELAY, DEFAULT_LINE_LIMIT, DEFAULT_PHASE, MonitorDefaults};

/// Arquivo lido quando `--config` não é informado.
pub const DEFAULT_CONFIG_FILE: &str = "jobwatch.toml";

/// Configuração de nível superior carregada de `jobwatch.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobwatchConfig {
    /// Esquema, host e porta do serviço REST.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Usuário para autenticação básica; vazio desativa a autenticação.
    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Valores padrão do monitor (seção `[monitor]`).
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Seção `[monitor]`: usada para toda opção não informada na linha de comando.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Máximo de consultas antes de desistir.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Intervalo entre consultas, em milissegundos.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Quantas linhas finais da saída são examinadas na busca por mensagem.
    #[serde(default = "default_line_limit")]
    pub line_limit: usize,

    /// Fase alvo padrão ("INPUT", "ACTIVE" ou "OUTPUT").
    #[serde(default = "default_phase")]
    pub phase: String,
}

fn default_base_url() -> String {
    "https://localhost:443".to_string()
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

fn default_line_limit() -> usize {
    DEFAULT_LINE_LIMIT
}

fn default_phase() -> String {
    DEFAULT_PHASE.to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
            line_limit: default_line_limit(),
            phase: default_phase(),
        }
    }
}

impl MonitorConfig {
    /// Converte a seção em [`MonitorDefaults`], validando a fase.
    pub fn to_defaults(&self) -> Result<MonitorDefaults> {
        let phase: Phase = self
            .phase
            .parse()
            .with_context(|| "invalid [monitor] phase in configuration")?;
        if self.line_limit == 0 {
            bail!("[monitor] line_limit must be at least 1");
        }
        Ok(MonitorDefaults {
            attempts: self.attempts.max(1),
            delay: Duration::from_millis(self.delay_ms),
            line_limit: self.line_limit,
            phase,
        })
    }
}

impl Default for JobwatchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: String::new(),
            password: String::new(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl JobwatchConfig {
    /// Carrega a configuração do caminho informado ou de `jobwatch.toml` no
    /// diretório atual. Um caminho explícito inexistente é erro; o arquivo
    /// padrão ausente resulta nos valores padrão.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Variáveis de ambiente não vazias sobrescrevem os valores do arquivo.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = non_empty("JOBWATCH_URL") {
            self.base_url = url;
        }
        if let Some(user) = non_empty("JOBWATCH_USER") {
            self.user = user;
        }
        if let Some(password) = non_empty("JOBWATCH_PASSWORD") {
            self.password = password;
        }
    }

    /// Credenciais para autenticação básica, se um usuário foi configurado.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.user.is_empty() {
            None
        } else {
            Some((self.user.as_str(), self.password.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = JobwatchConfig::default();
        assert_eq!(config.base_url, "https://localhost:443");
        assert!(config.credentials().is_none());
        assert_eq!(config.monitor.attempts, 1000);
        assert_eq!(config.monitor.delay_ms, 3000);
        assert_eq!(config.monitor.line_limit, 1000);
        assert_eq!(config.monitor.phase, "OUTPUT");
        assert_eq!(config.monitor.to_defaults().unwrap(), MonitorDefaults::default());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            base_url = "https://mvs.example.com:10443"
            user = "IBMUSER"

            [monitor]
            attempts = 20
            phase = "active"
        "#;
        let config: JobwatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://mvs.example.com:10443");
        assert_eq!(config.credentials(), Some(("IBMUSER", "")));

        let defaults = config.monitor.to_defaults().unwrap();
        assert_eq!(defaults.attempts, 20);
        assert_eq!(defaults.phase, Phase::Active);
        assert_eq!(defaults.delay, Duration::from_millis(3000));
        assert_eq!(defaults.line_limit, 1000);
    }

    #[test]
    fn invalid_phase_rejected() {
        let config: JobwatchConfig = toml::from_str("[monitor]\nphase = \"DONE\"").unwrap();
        assert!(config.monitor.to_defaults().is_err());
    }

    #[test]
    fn zero_line_limit_rejected() {
        let config: JobwatchConfig = toml::from_str("[monitor]\nline_limit = 0").unwrap();
        assert!(config.monitor.to_defaults().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = JobwatchConfig {
            user: "FROMFILE".into(),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("JOBWATCH_URL", "https://other:443"),
            ("JOBWATCH_USER", ""),
            ("JOBWATCH_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://other:443");
        assert_eq!(config.user, "FROMFILE");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://from-file:443\"\n[monitor]\ndelay_ms = 250").unwrap();

        let config = JobwatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://from-file:443");
        assert_eq!(config.monitor.delay_ms, 250);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(JobwatchConfig::load(Some(&missing)).is_err());
    }
}

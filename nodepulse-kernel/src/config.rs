use nodepulse_status::StatusConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

const HOUR_MS: i64 = 3_600_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct KernelConfig {
    pub listen_addr: String,
    pub workers_file: String,       // snapshot JSON du registre
    pub stale_worker_hours: i64,
    pub status: StatusConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            workers_file: "./data/workers.json".into(),
            stale_worker_hours: 24,
            status: StatusConfig::default(),
        }
    }
}

impl KernelConfig {
    /// Une fenêtre de purge nulle ou négative viderait le registre à chaque passage
    fn sanitized(mut self) -> Self {
        if self.stale_worker_hours <= 0 {
            warn!(stale_worker_hours = self.stale_worker_hours, "stale_worker_hours doit être positif, usage valeur par défaut");
            self.stale_worker_hours = KernelConfig::default().stale_worker_hours;
        }
        self
    }

    pub fn stale_worker_ms(&self) -> i64 {
        self.stale_worker_hours.saturating_mul(HOUR_MS)
    }
}

pub async fn load_config() -> KernelConfig {
    let path = std::env::var("NODEPULSE_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    load_config_from(&path).await
}

pub async fn load_config_from(path: impl AsRef<Path>) -> KernelConfig {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "pas de fichier de config, usage config par défaut");
        return KernelConfig::default();
    }

    let txt = fs::read_to_string(path).await.unwrap_or_default();
    if txt.trim().is_empty() {
        return KernelConfig::default();
    }
    serde_yaml::from_str::<KernelConfig>(&txt)
        .unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "config invalide, usage config par défaut");
            KernelConfig::default()
        })
        .sanitized()
}

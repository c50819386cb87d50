/**
 * STATUS VIEW - Vue de statut d'un worker prête pour l'affichage
 *
 * RÔLE : Classification (code santé) + textes de charge formatés à partir
 * du dernier snapshot d'un worker. Fonction pure : même entrée, même sortie.
 *
 * FORMATS (consommés tels quels par les dashboards) :
 * - CPU     : "3.2 / 4 cores"
 * - Mémoire : "27.7%（2.9 / 8 GB）"  (parenthèses pleine chasse)
 * - Disque  : même gabarit que la mémoire
 */

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatusError;
use crate::format::{format_or_placeholder, format_time, EMPTY_PLACEHOLDER, LOAD_NUMBER_FORMAT};
use crate::health::{score, HealthSignals, HealthStatus};
use crate::worker::{now_millis, WorkerInfo};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatusView {
    pub address: String,
    #[serde(rename = "cpuLoad")]
    pub cpu_load_text: String,
    #[serde(rename = "memoryLoad")]
    pub memory_load_text: String,
    #[serde(rename = "diskLoad")]
    pub disk_load_text: String,
    pub protocol: String,
    pub tag: String,
    #[serde(rename = "lastActiveTime")]
    pub last_active_time_text: String,
    pub light_task_tracker_num: u32,
    pub heavy_task_tracker_num: u32,
    pub last_overload_time: i64,
    pub overloading: bool,
    #[serde(rename = "status")]
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Rendu d'un tag vide
    #[serde(default = "default_tag_placeholder")]
    pub tag_placeholder: String,
}

fn default_tag_placeholder() -> String {
    EMPTY_PLACEHOLDER.to_string()
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { tag_placeholder: default_tag_placeholder() }
    }
}

/// Classifieur sans état mutable : partageable entre tâches sans verrou
#[derive(Debug, Clone, Default)]
pub struct StatusClassifier {
    config: StatusConfig,
}

impl StatusClassifier {
    pub fn new(config: StatusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub fn classify(&self, info: &WorkerInfo) -> Result<WorkerStatusView, StatusError> {
        self.classify_at(info, now_millis())
    }

    /// Variante à horloge injectée, utilisée pour l'évaluation de timeout()
    pub fn classify_at(&self, info: &WorkerInfo, now_ms: i64) -> Result<WorkerStatusView, StatusError> {
        let metrics = info.system_metrics.as_ref().ok_or_else(|| StatusError::MissingMetrics {
            address: info.address.clone(),
        })?;
        if let Err(e) = metrics.validate(&info.address).and_then(|_| info.validate_timestamps()) {
            warn!(address = %info.address, error = %e, "rejecting malformed worker snapshot");
            return Err(e);
        }

        let signals = HealthSignals::from_snapshot(metrics, info.overload(), info.timeout_at(now_ms));
        let health_status = score(&signals);
        debug!(address = %info.address, status = health_status.code(), ?signals, "classified worker");

        Ok(WorkerStatusView {
            address: info.address.clone(),
            cpu_load_text: cpu_text(metrics.cpu_load, metrics.cpu_processors),
            memory_load_text: usage_text(metrics.jvm_memory_usage, metrics.jvm_used_memory, metrics.jvm_max_memory),
            disk_load_text: usage_text(metrics.disk_usage, metrics.disk_used, metrics.disk_total),
            protocol: info.protocol.clone(),
            tag: format_or_placeholder(&info.tag, &self.config.tag_placeholder).to_string(),
            last_active_time_text: format_time(info.last_active_time),
            light_task_tracker_num: info.light_task_tracker_num,
            heavy_task_tracker_num: info.heavy_task_tracker_num,
            last_overload_time: info.last_overload_time,
            overloading: info.overloading,
            health_status,
        })
    }
}

fn cpu_text(load: f64, cores: u32) -> String {
    format!("{} / {} cores", LOAD_NUMBER_FORMAT.format(load), cores)
}

fn usage_text(fraction: f64, used: f64, max: f64) -> String {
    format!(
        "{}%（{} / {} GB）",
        LOAD_NUMBER_FORMAT.format(fraction * 100.0),
        LOAD_NUMBER_FORMAT.format(used),
        LOAD_NUMBER_FORMAT.format(max)
    )
}

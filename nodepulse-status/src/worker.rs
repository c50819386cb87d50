/**
 * WORKER - Snapshot courant d'un worker tel que vu par le contrôleur
 *
 * RÔLE : Identité + compteurs + dernier relevé système, rafraîchis à chaque
 * heartbeat. Expose les prédicats overload()/timeout() consommés par la
 * classification.
 */

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::error::StatusError;
use crate::metrics::SystemMetricsSnapshot;

/// Fenêtre au-delà de laquelle un worker sans heartbeat est considéré hors ligne
pub const WORKER_TIMEOUT_MS: i64 = 60_000;

/// Heure courante en epoch millis
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Heartbeat entrant (worker → contrôleur)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerHeartbeat {
    pub worker_address: String,
    pub protocol: String,
    #[serde(default)]
    pub tag: String,
    pub heartbeat_time: i64,
    pub system_metrics: Option<SystemMetricsSnapshot>,
    #[serde(default)]
    pub light_task_tracker_num: u32,
    #[serde(default)]
    pub heavy_task_tracker_num: u32,
    #[serde(default)]
    pub overload: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    pub address: String,
    pub protocol: String,
    #[serde(default)]
    pub tag: String,
    pub last_active_time: i64,      // epoch millis
    #[serde(default)]
    pub light_task_tracker_num: u32,
    #[serde(default)]
    pub heavy_task_tracker_num: u32,
    #[serde(default)]
    pub last_overload_time: i64,    // 0 si jamais surchargé
    #[serde(default)]
    pub overloading: bool,
    pub system_metrics: Option<SystemMetricsSnapshot>,
}

impl WorkerInfo {
    /// Crée l'entrée d'un worker à partir de son premier heartbeat
    pub fn from_heartbeat(heartbeat: WorkerHeartbeat) -> Self {
        let mut info = Self {
            address: String::new(),
            protocol: String::new(),
            tag: String::new(),
            last_active_time: 0,
            light_task_tracker_num: 0,
            heavy_task_tracker_num: 0,
            last_overload_time: 0,
            overloading: false,
            system_metrics: None,
        };
        info.refresh(heartbeat);
        info
    }

    /// Écrase l'état courant avec le contenu du heartbeat
    pub fn refresh(&mut self, heartbeat: WorkerHeartbeat) {
        self.address = heartbeat.worker_address;
        self.protocol = heartbeat.protocol;
        self.tag = heartbeat.tag;
        self.last_active_time = heartbeat.heartbeat_time;
        self.system_metrics = heartbeat.system_metrics;
        self.light_task_tracker_num = heartbeat.light_task_tracker_num;
        self.heavy_task_tracker_num = heartbeat.heavy_task_tracker_num;

        if heartbeat.overload {
            self.overloading = true;
            self.last_overload_time = heartbeat.heartbeat_time;
            warn!(
                address = %self.address,
                light = self.light_task_tracker_num,
                heavy = self.heavy_task_tracker_num,
                "worker reports overload"
            );
        } else {
            self.overloading = false;
        }
    }

    /// Rejette les horodatages négatifs (un snapshot corrompu ne doit pas paraître vivant)
    pub fn validate_timestamps(&self) -> Result<(), StatusError> {
        let stamps = [
            ("lastActiveTime", self.last_active_time),
            ("lastOverloadTime", self.last_overload_time),
        ];
        for (field, value) in stamps {
            if value < 0 {
                return Err(StatusError::InvalidTimestamp { address: self.address.clone(), field, value });
            }
        }
        Ok(())
    }

    /// Vrai si le worker est actuellement signalé en surcharge
    pub fn overload(&self) -> bool {
        self.overloading
    }

    /// Vrai si le dernier heartbeat est plus vieux que WORKER_TIMEOUT_MS
    pub fn timeout(&self) -> bool {
        self.timeout_at(now_millis())
    }

    pub fn timeout_at(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.last_active_time) > WORKER_TIMEOUT_MS
    }
}

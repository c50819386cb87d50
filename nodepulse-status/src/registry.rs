/**
 * WORKER REGISTRY - Snapshot courant de chaque worker connu
 *
 * RÔLE : Registration/refresh par heartbeat, persistance JSON, nettoyage des
 * workers disparus et production des vues de statut à la demande.
 *
 * Aucun historique : chaque heartbeat écrase l'état précédent du worker.
 */

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::StatusError;
use crate::view::{StatusClassifier, WorkerStatusView};
use crate::worker::{WorkerHeartbeat, WorkerInfo};

pub type WorkersMap = HashMap<String, WorkerInfo>;

#[derive(Debug, Default)]
pub struct WorkerRegistry {
    workers: Mutex<WorkersMap>,
}

pub type SharedWorkerRegistry = Arc<WorkerRegistry>;

fn corrupt_path(path: &Path) -> PathBuf {
    let mut aside = path.as_os_str().to_owned();
    aside.push(".corrupt");
    PathBuf::from(aside)
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge les workers depuis le fichier JSON (absent = registre vide).
    ///
    /// Un snapshot illisible est déplacé vers `<fichier>.corrupt` avant de
    /// retourner l'erreur : la sauvegarde suivante ne peut pas l'écraser.
    pub async fn load_workers(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            info!(path = %path.display(), "no existing workers file, starting fresh");
            return Ok(0);
        }

        let content = tokio::fs::read_to_string(path).await?;
        let workers: WorkersMap = if content.trim().is_empty() {
            HashMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(workers) => workers,
                Err(e) => {
                    let aside = corrupt_path(path);
                    tokio::fs::rename(path, &aside)
                        .await
                        .with_context(|| format!("cannot move corrupt snapshot {} aside", path.display()))?;
                    warn!(path = %path.display(), aside = %aside.display(), error = %e, "corrupt workers file moved aside");
                    return Err(anyhow::Error::new(e)
                        .context(format!("corrupt workers file {} (kept as {})", path.display(), aside.display())));
                }
            }
        };

        let count = workers.len();
        *self.workers.lock() = workers;
        info!(count, path = %path.display(), "loaded workers");
        Ok(count)
    }

    /// Sauvegarde les workers dans le fichier JSON
    pub async fn save_workers(&self, path: impl AsRef<Path>) -> Result<()> {
        // verrou relâché avant l'écriture
        let content = {
            let workers = self.workers.lock();
            serde_json::to_string_pretty(&*workers)?
        };
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Crée ou rafraîchit l'entrée du worker émetteur
    pub fn handle_heartbeat(&self, heartbeat: WorkerHeartbeat) {
        let mut workers = self.workers.lock();
        match workers.get_mut(&heartbeat.worker_address) {
            Some(worker) => worker.refresh(heartbeat),
            None => {
                let worker = WorkerInfo::from_heartbeat(heartbeat);
                info!(address = %worker.address, protocol = %worker.protocol, "registered worker");
                workers.insert(worker.address.clone(), worker);
            }
        }
    }

    pub fn get_worker(&self, address: &str) -> Option<WorkerInfo> {
        self.workers.lock().get(address).cloned()
    }

    pub fn list_workers(&self) -> Vec<WorkerInfo> {
        let mut list: Vec<WorkerInfo> = self.workers.lock().values().cloned().collect();
        list.sort_by(|a, b| a.address.cmp(&b.address));
        list
    }

    pub fn len(&self) -> usize {
        self.workers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.lock().is_empty()
    }

    /// Vue de statut d'un worker ; None s'il est inconnu
    pub fn status_view(
        &self,
        address: &str,
        classifier: &StatusClassifier,
    ) -> Option<Result<WorkerStatusView, StatusError>> {
        self.get_worker(address).map(|worker| classifier.classify(&worker))
    }

    /// Vues de tous les workers triées par adresse ; les snapshots invalides sont ignorés
    pub fn status_views(&self, classifier: &StatusClassifier) -> Vec<WorkerStatusView> {
        self.list_workers()
            .iter()
            .filter_map(|worker| match classifier.classify(worker) {
                Ok(view) => Some(view),
                Err(e) => {
                    warn!(address = %worker.address, error = %e, "skipping worker in status listing");
                    None
                }
            })
            .collect()
    }

    /// Supprime les workers silencieux depuis plus de `max_age_ms`
    pub fn cleanup_stale_workers(&self, max_age_ms: i64, now_ms: i64) -> usize {
        let cutoff = now_ms.saturating_sub(max_age_ms.max(0));
        let mut removed = 0;
        self.workers.lock().retain(|address, worker| {
            if worker.last_active_time < cutoff {
                info!(%address, last_active_time = worker.last_active_time, "removing stale worker");
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

/**
 * NODEPULSE KERNEL - Point d'entrée du serveur de statut des workers
 *
 * RÔLE : Bootstrap config + registre + classifieur, puis service HTTP.
 * Le registre est rechargé depuis son snapshot JSON au démarrage et
 * purgé périodiquement des workers disparus.
 */

mod config;
mod http;

use crate::config::load_config;
use crate::http::AppState;

use anyhow::{Context, Result};
use nodepulse_status::{now_millis, SharedWorkerRegistry, StatusClassifier, WorkerRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config().await;

    if let Some(parent) = std::path::Path::new(&cfg.workers_file).parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!(error = %e, "failed to create data dir");
        }
    }

    let registry: SharedWorkerRegistry = Arc::new(WorkerRegistry::new());
    if let Err(e) = registry.load_workers(&cfg.workers_file).await {
        error!(error = %e, "failed to load workers");
        // fichier encore en place : la purge périodique l'écraserait
        if tokio::fs::try_exists(&cfg.workers_file).await.unwrap_or(true) {
            return Err(e.context(format!("refusing to start over {}", cfg.workers_file)));
        }
    }

    spawn_stale_worker_cleanup(registry.clone(), cfg.workers_file.clone(), cfg.stale_worker_ms());

    let api_key = std::env::var("NODEPULSE_API_KEY").ok().map(Arc::from);
    let app_state = AppState {
        registry,
        classifier: StatusClassifier::new(cfg.status.clone()),
        api_key,
    };
    let app = http::build_router(app_state);

    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", cfg.listen_addr))?;
    info!(addr = %cfg.listen_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Purge toutes les minutes les workers silencieux depuis `stale_ms` et persiste le registre
fn spawn_stale_worker_cleanup(registry: SharedWorkerRegistry, workers_file: String, stale_ms: i64) {
    info!(stale_ms, "starting stale worker cleanup");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;

            let removed = registry.cleanup_stale_workers(stale_ms, now_millis());
            if removed > 0 {
                info!(removed, "cleaned up stale workers");
            }
            if let Err(e) = registry.save_workers(&workers_file).await {
                error!(error = %e, "failed to save workers");
            }
        }
    });
}

/**
 * API REST NODEPULSE - Rendu HTTP des vues de statut des workers
 *
 * RÔLE :
 * Expose les WorkerStatusView calculées à la demande depuis le registre.
 * Lecture seule : aucune ingestion de heartbeat par cette API.
 *
 * ROUTES :
 * - GET /health              : liveness du kernel (sans auth)
 * - GET /workers             : vues de tous les workers, triées par adresse
 * - GET /workers/{address}   : vue d'un worker (404 inconnu, 422 snapshot invalide)
 *
 * SÉCURITÉ :
 * - Header x-api-key obligatoire sur toutes routes sauf /health
 * - Clé absente de la config = accès refusé
 */

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{routing::get, Json, Router};
use nodepulse_status::{SharedWorkerRegistry, StatusClassifier, WorkerStatusView};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedWorkerRegistry,
    pub classifier: StatusClassifier,
    pub api_key: Option<Arc<str>>,
}

async fn require_api_key(State(app): State<AppState>, req: Request, next: Next) -> Result<Response, StatusCode> {
    // Health check toujours accessible
    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let Some(expected) = app.api_key.as_deref().filter(|k| !k.is_empty()) else {
        warn!("NODEPULSE_API_KEY not set - API access denied");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let ok = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !ok {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/workers", get(list_workers))
        .route("/workers/{address}", get(get_worker))
        .layer(middleware::from_fn_with_state(app_state.clone(), require_api_key))
        .with_state(app_state)
}

// GET /workers
async fn list_workers(State(app): State<AppState>) -> Json<Vec<WorkerStatusView>> {
    Json(app.registry.status_views(&app.classifier))
}

// GET /workers/{address}
async fn get_worker(
    State(app): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WorkerStatusView>, StatusCode> {
    match app.registry.status_view(&address, &app.classifier) {
        Some(Ok(view)) => Ok(Json(view)),
        Some(Err(e)) => {
            warn!(%address, error = %e, "cannot render worker status");
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

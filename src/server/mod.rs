//! HTTP boundary: an axum listener whose only handler forwards to [routes::route_request].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::config::Config;
use crate::data::Catalogs;
use crate::parallel::WorkerPool;

pub mod api;
pub mod routes;

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalogs: Arc<Catalogs>,
    /// Threads used by ranking requests.
    pub pool: WorkerPool,
}

impl AppState {
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            catalogs: Arc::new(catalogs),
            pool: WorkerPool::default(),
        }
    }

    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let body = String::from_utf8_lossy(&body);
    let path = uri.path().to_string();
    // Simulation runs are CPU bound; keep them off the async workers.
    let joined = tokio::task::spawn_blocking({
        let method = method.clone();
        let body = body.into_owned();
        move || routes::route_request(method.as_str(), &path, &body, &state)
    })
    .await;

    let response = match joined {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "request handler panicked");
            routes::error_response(500, "Internal Server Error", "Internal server error")
        }
    };
    tracing::info!(method = %method, path = uri.path(), status = response.status_code, "request");

    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, response.content_type)], response.body).into_response()
}

pub async fn run_server(config: &Config) -> std::io::Result<()> {
    let catalogs = Catalogs::load(&config.data_dir)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(addr = %config.bind_addr, "quintal server listening");
    let state = AppState::new(catalogs).with_pool(WorkerPool::with_workers(config.workers));
    axum::serve(listener, router(state)).await
}

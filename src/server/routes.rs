use crate::server::api::{self, ApiError};
use crate::server::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

/// Pure request dispatch: everything the HTTP listener does apart from socket I/O.
pub fn route_request(method: &str, path: &str, body: &str, state: &AppState) -> HttpResponse {
    let catalogs = state.catalogs.as_ref();
    let path = path.split('?').next().unwrap_or(path);

    let outcome = match (method, path) {
        ("GET", "/api/health") => api::health_payload(catalogs),
        ("GET", "/api/weapons") => api::weapons_payload(catalogs),
        ("GET", "/api/monsters") => api::monsters_payload(catalogs),
        ("POST", "/api/combat") => api::combat_payload(body, catalogs),
        ("POST", "/api/craft") => api::craft_payload(body, catalogs),
        ("POST", "/api/game/start") => api::game_start_payload(body, catalogs),
        ("POST", "/api/game/advance") => api::game_advance_payload(body, catalogs),
        ("POST", "/api/simulate") => api::simulate_payload(body, catalogs),
        ("POST", "/api/rank") => api::rank_payload(body, catalogs, &state.pool),
        _ => return error_response(404, "Not Found", "Route not found"),
    };

    match outcome {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(&err),
    }
}

fn api_error_response(err: &ApiError) -> HttpResponse {
    let (status_code, status_text) = err.status();
    match err {
        ApiError::InternalFault(detail) => {
            tracing::error!(error = %detail, "request failed");
            error_response(status_code, status_text, "Internal server error")
        }
        _ => {
            tracing::debug!(status = status_code, error = %err, "request rejected");
            error_response(status_code, status_text, &err.to_string())
        }
    }
}

pub fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"success\": false,\n  \"error\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

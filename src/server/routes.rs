use crate::engine::QueryEngine;
use crate::server::api::{self, ApiError, ErrorBody};

#[derive(Debug, Clone, PartialEq, Eq)]
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

/// Dispatch one request. `path` may carry a query string.
pub fn route_request(engine: &QueryEngine, method: &str, path: &str, body: &str) -> HttpResponse {
    let (path, query) = path.split_once('?').unwrap_or((path, ""));
    let path = path.trim_end_matches('/');

    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", "internal", &err.to_string()),
        },
        ("GET", "/api/pokemon") => respond(api::pokemon_search_payload(engine, query)),
        ("GET", "/api/type-matchups") => respond(api::type_matchups_payload(engine, query)),
        ("POST", "/api/query") => respond(api::query_payload(engine, body)),
        ("GET", path) if path.starts_with("/api/pokemon/") => {
            let rest = path.trim_start_matches("/api/pokemon/");
            match rest.split('/').collect::<Vec<_>>().as_slice() {
                [name] => respond(
                    api::decode_path_segment(name)
                        .map_err(ApiError::from)
                        .and_then(|name| api::pokemon_payload(engine, &name)),
                ),
                [name, "stats"] => respond(
                    api::decode_path_segment(name)
                        .map_err(ApiError::from)
                        .and_then(|name| api::stat_profile_payload(engine, &name)),
                ),
                _ => not_found(),
            }
        }
        _ => not_found(),
    }
}

fn respond(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => {
            let (status_code, status_text) = err.status();
            error_response(status_code, status_text, err.kind(), &err.to_string())
        }
    }
}

fn not_found() -> HttpResponse {
    error_response(404, "Not Found", "not_found", "Route not found")
}

fn error_response(
    status_code: u16,
    status_text: &'static str,
    kind: &str,
    message: &str,
) -> HttpResponse {
    let payload = ErrorBody {
        status: "error",
        kind,
        message: message.to_string(),
    };
    let fallback = "{\n  \"status\": \"error\",\n  \"message\": \"Unknown error\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

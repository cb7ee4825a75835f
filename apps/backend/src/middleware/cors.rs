use std::env;

use actix_cors::Cors;
use actix_web::http::header;

use crate::extractors::SESSION_HEADER;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Origins from the comma-separated `CORS_ALLOWED_ORIGINS`; blank, `null`
/// and non-http(s) entries are dropped. Falls back to the local dev UI.
pub fn allowed_origins(raw: &str) -> Vec<String> {
    let configured: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if configured.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        configured
    }
}

/// CORS for the game UI. Credentials are allowed because the session and
/// game ids travel as cookies.
pub fn cors_middleware() -> Cors {
    let origins = allowed_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(SESSION_HEADER),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}

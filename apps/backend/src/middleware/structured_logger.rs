use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::trace_span::{session_hint, trace_id_of};

/// One `request_completed` event per request; level follows the status class.
///
/// `http.route` is the matched pattern (`/api/game/status`), so polling
/// endpoints group together regardless of query string.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct Completed {
    method: String,
    route: String,
    status: StatusCode,
    session_id: Option<i64>,
    trace_id: String,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let status_code = self.status.as_u16();
        let (method, route, trace_id) = (&self.method, &self.route, &self.trace_id);
        let session_id = self.session_id;
        let duration_us = self.duration_us;

        if self.status.is_server_error() {
            error!(http.method = %method, http.route = %route, http.status_code = status_code, session_id, duration_us, trace_id = %trace_id, "request_completed");
        } else if self.status.is_client_error() {
            warn!(http.method = %method, http.route = %route, http.status_code = status_code, session_id, duration_us, trace_id = %trace_id, "request_completed");
        } else {
            info!(http.method = %method, http.route = %route, http.status_code = status_code, session_id, duration_us, trace_id = %trace_id, "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let session_id = session_hint(req.request());
        let trace_id = trace_id_of(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, route) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request().match_pattern().unwrap_or(path),
                ),
                Err(err) => (err.as_response_error().status_code(), path),
            };

            Completed {
                method,
                route,
                status,
                session_id,
                trace_id,
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}

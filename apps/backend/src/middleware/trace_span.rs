//! Per-request tracing span.
//!
//! Every event logged while a request runs carries `trace_id`, the
//! method and path, and the caller's session when one was presented.
//! Reads the [`TraceId`] stored by `RequestTrace`, which must wrap
//! outside this middleware.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{field, info_span, Instrument};

use super::request_trace::TraceId;
use crate::extractors::{SESSION_COOKIE, SESSION_HEADER};

/// Session id the caller presented, if it looks like one. Never validated
/// against the database; only used to label log lines.
pub(crate) fn session_hint(req: &HttpRequest) -> Option<i64> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

pub(crate) fn trace_id_of(req: &ServiceRequest) -> String {
    req.extensions()
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_else(|| "missing-trace-id".to_string())
}

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let span = info_span!(
            "request",
            trace_id = %trace_id_of(&req),
            method = %req.method(),
            path = %req.path(),
            session_id = field::Empty,
        );
        if let Some(session_id) = session_hint(req.request()) {
            span.record("session_id", session_id);
        }

        Box::pin(self.service.call(req).instrument(span))
    }
}

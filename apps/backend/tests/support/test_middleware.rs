//! Test-only middleware that puts a `SharedTxn` into every request.
//!
//! Multi-request HTTP scenarios run inside one transaction this way, and
//! handlers never touch the single-connection SQLite pool while it is open.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use quipreel::db::txn::SharedTxn;

/// Inserts the transaction when one is set; a pass-through otherwise.
#[derive(Clone, Default)]
pub struct TestTxnInjector {
    shared: Option<SharedTxn>,
}

impl TestTxnInjector {
    pub fn new(shared: Option<SharedTxn>) -> Self {
        Self { shared }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TestTxnInjector
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TestTxnInjectorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TestTxnInjectorMiddleware {
            service,
            shared: self.shared.clone(),
        }))
    }
}

pub struct TestTxnInjectorMiddleware<S> {
    service: S,
    shared: Option<SharedTxn>,
}

impl<S, B> Service<ServiceRequest> for TestTxnInjectorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(shared) = &self.shared {
            req.extensions_mut().insert(shared.clone());
        }
        Box::pin(self.service.call(req))
    }
}

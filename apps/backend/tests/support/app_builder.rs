use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use quipreel::db::txn::SharedTxn;
use quipreel::state::app_state::AppState;
use quipreel::{routes, AppError, RequestTrace, StructuredLogger, TraceSpan};

use super::test_middleware::TestTxnInjector;

type RouteConfigFn = Box<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

/// Builder for test Actix services with the production middleware stack.
pub struct TestAppBuilder {
    state: AppState,
    route_config: Option<RouteConfigFn>,
    shared_txn: Option<SharedTxn>,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            route_config: None,
            shared_txn: None,
        }
    }

    /// Serve the same routes as `main.rs`.
    pub fn with_prod_routes(mut self) -> Self {
        self.route_config = Some(Box::new(routes::configure) as RouteConfigFn);
        self
    }

    pub fn with_routes<F>(mut self, config_fn: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        self.route_config = Some(Box::new(config_fn) as RouteConfigFn);
        self
    }

    /// Run every request inside `shared`; the test owns its rollback.
    pub fn with_shared_txn(mut self, shared: SharedTxn) -> Self {
        self.shared_txn = Some(shared);
        self
    }

    pub async fn build(
        self,
    ) -> Result<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>, AppError>
    {
        let data = web::Data::new(self.state);
        let route_config = self.route_config;

        let service = test::init_service(
            App::new()
                .wrap(TestTxnInjector::new(self.shared_txn))
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .configure(move |cfg| {
                    if let Some(config_fn) = &route_config {
                        config_fn(cfg);
                    }
                }),
        )
        .await;

        Ok(service)
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}

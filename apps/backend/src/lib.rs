#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;
pub mod utils;
pub mod video_gen;

pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::{GameId, SessionId};
pub use infra::state::build_state;
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
pub use state::app_state::AppState;

// Unit tests: quiet logging and roll back every `with_txn`.
#[cfg(test)]
#[ctor::ctor]
fn init_unit_tests() {
    backend_test_support::logging::init();
    db::txn_policy::set_txn_policy(db::txn_policy::TxnPolicy::RollbackOnOk);
}

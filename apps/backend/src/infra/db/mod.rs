//! Database bootstrap for the server and the test suites.

pub mod core;

pub use core::bootstrap_db;

pub use crate::config::db::{DbKind, DbOwner, RuntimeEnv};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::debug;

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A transaction shared across several requests; tests insert it into
/// request extensions so a whole scenario runs (and rolls back) as one unit.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub async fn open(db: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self(Arc::new(db.begin().await?)))
    }

    /// Get a reference to the underlying database transaction
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }

    /// Roll back now if this is the last handle. Otherwise the rollback
    /// happens when the last clone is dropped.
    pub async fn rollback(self) -> Result<(), AppError> {
        match Arc::try_unwrap(self.0) {
            Ok(txn) => txn.rollback().await?,
            Err(_) => debug!("shared transaction still referenced; rollback deferred to drop"),
        }
        Ok(())
    }
}

/// Boxed future borrowed from the transaction handed to a `with_txn` closure.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + 'a>>;

/// Execute a closure within a database transaction.
///
/// 1) A `SharedTxn` in request extensions is used as-is (no commit/rollback here).
/// 2) Otherwise begin a transaction, run the closure, apply the process
///    policy on `Ok` and roll back on `Err`.
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R>,
{
    // Clone out of extensions before awaiting to avoid holding a RefCell borrow.
    let shared_txn = req.and_then(SharedTxn::from_req);

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let db = require_db(state)?;
    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            match txn_policy::current() {
                txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                txn_policy::TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}

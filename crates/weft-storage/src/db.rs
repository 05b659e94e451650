//! The top-level database handle.

use crate::conn::Connection;
use crate::driver::{Driver, ExecOutcome, TxOptions, Value};
use crate::middleware::{chain_middlewares, StorageMiddleware};
use crate::ops::{BeginFn, CloseFn, ConnectFn, ExecFn, PingFn, PrepareFn, QueryFn, QueryRowFn};
use crate::rows::{Row, Rows};
use crate::stmt::Statement;
use crate::tx::Transaction;
use crate::StorageResult;
use std::sync::Arc;
use tracing::debug;
use weft_core::CallContext;

/// A driver wrapped with a resolved middleware chain.
///
/// Exposes the driver's own surface, shape-preserving; call sites cannot
/// tell middleware is present. Scope-establishing operations re-wrap their
/// result handle with the context the chain returned, so everything done
/// through that handle carries the same lineage.
pub struct Database {
    driver: Arc<dyn Driver>,
    middleware: Arc<dyn StorageMiddleware>,
}

impl Database {
    /// Wraps `driver` with the given middlewares; absent entries are
    /// elided, none at all degenerates to passthrough.
    #[must_use]
    pub fn new(
        driver: Arc<dyn Driver>,
        middlewares: Vec<Option<Arc<dyn StorageMiddleware>>>,
    ) -> Self {
        Self { driver, middleware: chain_middlewares(middlewares) }
    }

    /// The wrapped driver.
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Acquires a dedicated connection.
    ///
    /// The connection's lineage starts from the context the chain returns,
    /// not the caller's: acquisition opens a fresh logical scope.
    pub fn conn(&self, ctx: &CallContext) -> StorageResult<Connection> {
        let driver = self.driver.clone();
        let terminal =
            ConnectFn::new(move |_ctx| Ok((driver.conn()?, CallContext::background())));
        let (conn, lineage) = self.middleware.connect(ctx, &terminal)?;
        Ok(Connection::wrap(conn, lineage, self.middleware.clone()))
    }

    /// Executes a statement.
    pub fn exec(&self, ctx: &CallContext, query: &str, args: &[Value]) -> StorageResult<ExecOutcome> {
        let driver = self.driver.clone();
        let terminal = ExecFn::new(move |_ctx, query, args| driver.exec(query, args));
        self.middleware.exec(ctx, &terminal, query, args)
    }

    /// Runs a query, returning a wrapped cursor.
    pub fn query(&self, ctx: &CallContext, query: &str, args: &[Value]) -> StorageResult<Rows> {
        let driver = self.driver.clone();
        let terminal = QueryFn::new(move |ctx, query, args| {
            Ok((driver.query(query, args)?, ctx.clone()))
        });
        let (rows, lineage) = self.middleware.query(ctx, &terminal, query, args)?;
        Ok(Rows::wrap(rows, lineage, self.middleware.clone()))
    }

    /// Runs a single-row query. Errors are deferred to the row's scan.
    #[must_use]
    pub fn query_row(&self, ctx: &CallContext, query: &str, args: &[Value]) -> Row {
        let driver = self.driver.clone();
        let terminal =
            QueryRowFn::new(move |ctx, query, args| (driver.query_row(query, args), ctx.clone()));
        let (row, lineage) = self.middleware.query_row(ctx, &terminal, query, args);
        Row::wrap(row, lineage, self.middleware.clone())
    }

    /// Prepares a statement.
    pub fn prepare(&self, ctx: &CallContext, query: &str) -> StorageResult<Statement> {
        let driver = self.driver.clone();
        let terminal =
            PrepareFn::new(move |ctx, query| Ok((driver.prepare(query)?, ctx.clone())));
        let (stmt, lineage) = self.middleware.prepare(ctx, query, &terminal)?;
        Ok(Statement::wrap(stmt, query, lineage, self.middleware.clone()))
    }

    /// Begins a transaction.
    pub fn begin(&self, ctx: &CallContext, opts: &TxOptions) -> StorageResult<Transaction> {
        let driver = self.driver.clone();
        let terminal = BeginFn::new(move |ctx, opts| Ok((driver.begin(opts)?, ctx.clone())));
        let (tx, lineage) = self.middleware.begin(ctx, opts, &terminal)?;
        Ok(Transaction::wrap(tx, lineage, self.middleware.clone()))
    }

    /// Verifies the backend is reachable.
    pub fn ping(&self, ctx: &CallContext) -> StorageResult<()> {
        let driver = self.driver.clone();
        let terminal = PingFn::new(move |_ctx| driver.ping());
        self.middleware.ping(ctx, &terminal)
    }

    /// Closes the driver.
    pub fn close(&self) -> StorageResult<()> {
        debug!("closing database handle");
        let driver = self.driver.clone();
        let terminal = CloseFn::new(move |_ctx| driver.close());
        self.middleware.close_db(&terminal)
    }
}

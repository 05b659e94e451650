//! The dedicated-connection handle.

use crate::driver::{DriverConn, ExecOutcome, TxOptions, Value};
use crate::middleware::StorageMiddleware;
use crate::ops::{BeginFn, CloseFn, ExecFn, PingFn, PrepareFn, QueryFn, QueryRowFn};
use crate::rows::{Row, Rows};
use crate::stmt::Statement;
use crate::tx::Transaction;
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// A connection carrying its lineage context and the resolved chain.
///
/// Every operation passes the stored lineage into the chain; the caller
/// does not re-supply a context per call.
pub struct Connection {
    conn: Arc<dyn DriverConn>,
    context: CallContext,
    middleware: Arc<dyn StorageMiddleware>,
}

impl Connection {
    pub(crate) fn wrap(
        conn: Arc<dyn DriverConn>,
        context: CallContext,
        middleware: Arc<dyn StorageMiddleware>,
    ) -> Self {
        Self { conn, context, middleware }
    }

    /// The lineage context this connection carries.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Executes a statement on this connection.
    pub fn exec(&self, query: &str, args: &[Value]) -> StorageResult<ExecOutcome> {
        let conn = self.conn.clone();
        let terminal = ExecFn::new(move |_ctx, query, args| conn.exec(query, args));
        self.middleware.exec(&self.context, &terminal, query, args)
    }

    /// Runs a query on this connection.
    pub fn query(&self, query: &str, args: &[Value]) -> StorageResult<Rows> {
        let conn = self.conn.clone();
        let terminal =
            QueryFn::new(move |ctx, query, args| Ok((conn.query(query, args)?, ctx.clone())));
        let (rows, lineage) = self.middleware.query(&self.context, &terminal, query, args)?;
        Ok(Rows::wrap(rows, lineage, self.middleware.clone()))
    }

    /// Runs a single-row query on this connection.
    #[must_use]
    pub fn query_row(&self, query: &str, args: &[Value]) -> Row {
        let conn = self.conn.clone();
        let terminal =
            QueryRowFn::new(move |ctx, query, args| (conn.query_row(query, args), ctx.clone()));
        let (row, lineage) = self.middleware.query_row(&self.context, &terminal, query, args);
        Row::wrap(row, lineage, self.middleware.clone())
    }

    /// Prepares a statement on this connection.
    pub fn prepare(&self, query: &str) -> StorageResult<Statement> {
        let conn = self.conn.clone();
        let terminal =
            PrepareFn::new(move |ctx, query| Ok((conn.prepare(query)?, ctx.clone())));
        let (stmt, lineage) = self.middleware.prepare(&self.context, query, &terminal)?;
        Ok(Statement::wrap(stmt, query, lineage, self.middleware.clone()))
    }

    /// Begins a transaction on this connection.
    pub fn begin(&self, opts: &TxOptions) -> StorageResult<Transaction> {
        let conn = self.conn.clone();
        let terminal = BeginFn::new(move |ctx, opts| Ok((conn.begin(opts)?, ctx.clone())));
        let (tx, lineage) = self.middleware.begin(&self.context, opts, &terminal)?;
        Ok(Transaction::wrap(tx, lineage, self.middleware.clone()))
    }

    /// Verifies this connection is alive.
    pub fn ping(&self) -> StorageResult<()> {
        let conn = self.conn.clone();
        let terminal = PingFn::new(move |_ctx| conn.ping());
        self.middleware.ping(&self.context, &terminal)
    }

    /// Returns the connection to the driver.
    pub fn close(&self) -> StorageResult<()> {
        let conn = self.conn.clone();
        let terminal = CloseFn::new(move |_ctx| conn.close());
        self.middleware.close_conn(&self.context, &terminal)
    }
}

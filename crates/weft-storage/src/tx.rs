//! The transaction handle.

use crate::driver::{DriverTx, ExecOutcome, Value};
use crate::middleware::StorageMiddleware;
use crate::ops::{CommitFn, ExecFn, PrepareFn, QueryFn, QueryRowFn, RebindFn, RollbackFn};
use crate::rows::{Row, Rows};
use crate::stmt::Statement;
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// A transaction carrying its lineage context and the resolved chain.
pub struct Transaction {
    tx: Arc<dyn DriverTx>,
    context: CallContext,
    middleware: Arc<dyn StorageMiddleware>,
}

impl Transaction {
    pub(crate) fn wrap(
        tx: Arc<dyn DriverTx>,
        context: CallContext,
        middleware: Arc<dyn StorageMiddleware>,
    ) -> Self {
        Self { tx, context, middleware }
    }

    /// The lineage context this transaction carries.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Executes a statement inside the transaction.
    pub fn exec(&self, query: &str, args: &[Value]) -> StorageResult<ExecOutcome> {
        let tx = self.tx.clone();
        let terminal = ExecFn::new(move |_ctx, query, args| tx.exec(query, args));
        self.middleware.exec(&self.context, &terminal, query, args)
    }

    /// Runs a query inside the transaction.
    pub fn query(&self, query: &str, args: &[Value]) -> StorageResult<Rows> {
        let tx = self.tx.clone();
        let terminal =
            QueryFn::new(move |ctx, query, args| Ok((tx.query(query, args)?, ctx.clone())));
        let (rows, lineage) = self.middleware.query(&self.context, &terminal, query, args)?;
        Ok(Rows::wrap(rows, lineage, self.middleware.clone()))
    }

    /// Runs a single-row query inside the transaction.
    #[must_use]
    pub fn query_row(&self, query: &str, args: &[Value]) -> Row {
        let tx = self.tx.clone();
        let terminal =
            QueryRowFn::new(move |ctx, query, args| (tx.query_row(query, args), ctx.clone()));
        let (row, lineage) = self.middleware.query_row(&self.context, &terminal, query, args);
        Row::wrap(row, lineage, self.middleware.clone())
    }

    /// Prepares a statement inside the transaction.
    pub fn prepare(&self, query: &str) -> StorageResult<Statement> {
        let tx = self.tx.clone();
        let terminal = PrepareFn::new(move |ctx, query| Ok((tx.prepare(query)?, ctx.clone())));
        let (stmt, lineage) = self.middleware.prepare(&self.context, query, &terminal)?;
        Ok(Statement::wrap(stmt, query, lineage, self.middleware.clone()))
    }

    /// Rebinds a prepared statement to this transaction. The rebound
    /// statement keeps the original's query text.
    #[must_use]
    pub fn stmt(&self, stmt: &Statement) -> Statement {
        let tx = self.tx.clone();
        let terminal = RebindFn::new(move |ctx, s| (tx.stmt(s), ctx.clone()));
        let (rebound, lineage) =
            self.middleware.rebind(&self.context, stmt.raw().clone(), &terminal);
        Statement::wrap(rebound, stmt.query_str(), lineage, self.middleware.clone())
    }

    /// Commits the transaction.
    pub fn commit(&self) -> StorageResult<()> {
        let tx = self.tx.clone();
        let terminal = CommitFn::new(move |_ctx| tx.commit());
        self.middleware.commit(&self.context, &terminal)
    }

    /// Rolls the transaction back.
    pub fn rollback(&self) -> StorageResult<()> {
        let tx = self.tx.clone();
        let terminal = RollbackFn::new(move |_ctx| tx.rollback());
        self.middleware.rollback(&self.context, &terminal)
    }
}

//! The prepared-statement handle and the prepared-statement marker.

use crate::driver::{DriverStmt, ExecOutcome, Value};
use crate::middleware::StorageMiddleware;
use crate::ops::{CloseFn, ExecFn, QueryFn, QueryRowFn};
use crate::rows::{Row, Rows};
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// Context marker: this scope executes through a prepared statement.
///
/// Set by [`Statement::wrap`] immediately after successful preparation, so
/// middleware inside (and consumers inspecting a final context) can
/// distinguish prepared executions from ad-hoc queries without looking at
/// the query string.
#[derive(Debug, Clone, Copy)]
struct PreparedStatement;

/// True when `ctx` descends from a prepared statement's lineage.
#[must_use]
pub fn is_prepared_statement(ctx: &CallContext) -> bool {
    ctx.contains::<PreparedStatement>()
}

/// A prepared statement carrying its query text, lineage context and the
/// resolved chain.
pub struct Statement {
    stmt: Arc<dyn DriverStmt>,
    query: String,
    context: CallContext,
    middleware: Arc<dyn StorageMiddleware>,
}

impl Statement {
    pub(crate) fn wrap(
        stmt: Arc<dyn DriverStmt>,
        query: &str,
        context: CallContext,
        middleware: Arc<dyn StorageMiddleware>,
    ) -> Self {
        let context = context.with_value(PreparedStatement);
        Self { stmt, query: query.to_string(), context, middleware }
    }

    pub(crate) fn raw(&self) -> &Arc<dyn DriverStmt> {
        &self.stmt
    }

    /// The query text this statement was prepared from.
    #[must_use]
    pub fn query_str(&self) -> &str {
        &self.query
    }

    /// The lineage context this statement carries.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Executes the statement. Middleware observes the original query text;
    /// the terminal ignores it and runs the prepared form.
    pub fn exec(&self, args: &[Value]) -> StorageResult<ExecOutcome> {
        let stmt = self.stmt.clone();
        let terminal = ExecFn::new(move |_ctx, _query, args| stmt.exec(args));
        self.middleware.exec(&self.context, &terminal, &self.query, args)
    }

    /// Runs the statement as a query.
    pub fn query(&self, args: &[Value]) -> StorageResult<Rows> {
        let stmt = self.stmt.clone();
        let terminal =
            QueryFn::new(move |ctx, _query, args| Ok((stmt.query(args)?, ctx.clone())));
        let (rows, lineage) =
            self.middleware.query(&self.context, &terminal, &self.query, args)?;
        Ok(Rows::wrap(rows, lineage, self.middleware.clone()))
    }

    /// Runs the statement as a single-row query.
    #[must_use]
    pub fn query_row(&self, args: &[Value]) -> Row {
        let stmt = self.stmt.clone();
        let terminal =
            QueryRowFn::new(move |ctx, _query, args| (stmt.query_row(args), ctx.clone()));
        let (row, lineage) =
            self.middleware.query_row(&self.context, &terminal, &self.query, args);
        Row::wrap(row, lineage, self.middleware.clone())
    }

    /// Closes the statement.
    pub fn close(&self) -> StorageResult<()> {
        let stmt = self.stmt.clone();
        let terminal = CloseFn::new(move |_ctx| stmt.close());
        self.middleware.close_stmt(&self.context, &terminal)
    }
}

//! The storage middleware capability interface and its chain builder.

use crate::driver::{DriverConn, DriverRow, DriverRows, DriverStmt, DriverTx, ExecOutcome, TxOptions, Value};
use crate::multi::MultiMiddleware;
use crate::ops::{
    BeginFn, CloseFn, CommitFn, ConnectFn, ExecFn, PingFn, PrepareFn, QueryFn, QueryRowFn,
    RebindFn, RollbackFn, ScanFn,
};
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// One hand-specialized method per operation kind; every default body is a
/// passthrough, so an implementation overrides only the operations it
/// intercepts.
///
/// Context propagation is bidirectional and operation-dependent:
/// scope-establishing operations (`connect`, `begin`, `prepare`, `query`,
/// `query_row`, `rebind`) return a context alongside their handle, which
/// the delegating layer stores as the new handle's lineage. The remaining
/// operations only receive one.
pub trait StorageMiddleware: Send + Sync {
    /// Intercepts connection acquisition.
    fn connect(
        &self,
        ctx: &CallContext,
        next: &ConnectFn,
    ) -> StorageResult<(Arc<dyn DriverConn>, CallContext)> {
        next.call(ctx)
    }

    /// Intercepts statement execution.
    fn exec(
        &self,
        ctx: &CallContext,
        next: &ExecFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<ExecOutcome> {
        next.call(ctx, query, args)
    }

    /// Intercepts a row query.
    fn query(
        &self,
        ctx: &CallContext,
        next: &QueryFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<(Arc<dyn DriverRows>, CallContext)> {
        next.call(ctx, query, args)
    }

    /// Intercepts a single-row query.
    fn query_row(
        &self,
        ctx: &CallContext,
        next: &QueryRowFn,
        query: &str,
        args: &[Value],
    ) -> (Arc<dyn DriverRow>, CallContext) {
        next.call(ctx, query, args)
    }

    /// Intercepts transaction begin.
    fn begin(
        &self,
        ctx: &CallContext,
        opts: &TxOptions,
        next: &BeginFn,
    ) -> StorageResult<(Arc<dyn DriverTx>, CallContext)> {
        next.call(ctx, opts)
    }

    /// Intercepts ping.
    fn ping(&self, ctx: &CallContext, next: &PingFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts statement preparation.
    fn prepare(
        &self,
        ctx: &CallContext,
        query: &str,
        next: &PrepareFn,
    ) -> StorageResult<(Arc<dyn DriverStmt>, CallContext)> {
        next.call(ctx, query)
    }

    /// Intercepts statement rebinding to a transaction.
    fn rebind(
        &self,
        ctx: &CallContext,
        stmt: Arc<dyn DriverStmt>,
        next: &RebindFn,
    ) -> (Arc<dyn DriverStmt>, CallContext) {
        next.call(ctx, stmt)
    }

    /// Intercepts commit.
    fn commit(&self, ctx: &CallContext, next: &CommitFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts rollback.
    fn rollback(&self, ctx: &CallContext, next: &RollbackFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts a single-row scan.
    fn scan_row(&self, ctx: &CallContext, next: &ScanFn, dest: &mut [Value]) -> StorageResult<()> {
        next.call(ctx, dest)
    }

    /// Intercepts a cursor scan.
    fn scan_rows(&self, ctx: &CallContext, next: &ScanFn, dest: &mut [Value]) -> StorageResult<()> {
        next.call(ctx, dest)
    }

    /// Intercepts statement close.
    fn close_stmt(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts connection close.
    fn close_conn(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts cursor close.
    fn close_rows(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        next.call(ctx)
    }

    /// Intercepts driver-handle close. No call context: nothing outlives
    /// the handle for it to propagate into.
    fn close_db(&self, next: &CloseFn) -> StorageResult<()> {
        next.call(&CallContext::background())
    }
}

/// The all-defaults middleware: "no middleware configured" degenerates to
/// bare driver behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughMiddleware;

impl StorageMiddleware for PassthroughMiddleware {}

/// Composes optional middlewares into one.
///
/// Absent entries are elided; zero survivors yield the passthrough, one is
/// returned unchanged, N fold into a [`MultiMiddleware`] executing
/// left-to-right as registered.
#[must_use]
pub fn chain_middlewares(
    middlewares: Vec<Option<Arc<dyn StorageMiddleware>>>,
) -> Arc<dyn StorageMiddleware> {
    let mut present: Vec<Arc<dyn StorageMiddleware>> =
        middlewares.into_iter().flatten().collect();
    match present.len() {
        0 => Arc::new(PassthroughMiddleware),
        1 => present.remove(0),
        _ => Arc::new(MultiMiddleware::new(present)),
    }
}

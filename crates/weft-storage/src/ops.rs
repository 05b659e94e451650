//! Per-operation function newtypes.
//!
//! Each operation kind gets its own callable newtype with a `wrapped`
//! combinator that layers one middleware around it. The arity is
//! hand-specialized per kind on purpose: scope-establishing operations
//! return `(handle, CallContext)` so derived handles inherit a context
//! lineage, the rest take a context in and return only their result.
//! `ScanFn` and `CloseFn` carry several wrapping flavors because the same
//! shape is intercepted through different middleware methods depending on
//! which handle it belongs to.

use crate::driver::{DriverConn, DriverRow, DriverRows, DriverStmt, DriverTx, ExecOutcome, TxOptions, Value};
use crate::middleware::StorageMiddleware;
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// Connection acquisition terminal.
#[derive(Clone)]
pub struct ConnectFn(
    Arc<dyn Fn(&CallContext) -> StorageResult<(Arc<dyn DriverConn>, CallContext)> + Send + Sync>,
);

impl ConnectFn {
    /// Wraps a closure as a connect operation.
    pub fn new(
        f: impl Fn(&CallContext) -> StorageResult<(Arc<dyn DriverConn>, CallContext)>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext) -> StorageResult<(Arc<dyn DriverConn>, CallContext)> {
        (self.0)(ctx)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.connect(ctx, &inner))
    }
}

/// Statement execution terminal.
#[derive(Clone)]
pub struct ExecFn(
    Arc<dyn Fn(&CallContext, &str, &[Value]) -> StorageResult<ExecOutcome> + Send + Sync>,
);

impl ExecFn {
    /// Wraps a closure as an exec operation.
    pub fn new(
        f: impl Fn(&CallContext, &str, &[Value]) -> StorageResult<ExecOutcome> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext, query: &str, args: &[Value]) -> StorageResult<ExecOutcome> {
        (self.0)(ctx, query, args)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, query, args| middleware.exec(ctx, &inner, query, args))
    }
}

/// Row-query terminal.
#[derive(Clone)]
pub struct QueryFn(
    Arc<
        dyn Fn(&CallContext, &str, &[Value]) -> StorageResult<(Arc<dyn DriverRows>, CallContext)>
            + Send
            + Sync,
    >,
);

impl QueryFn {
    /// Wraps a closure as a query operation.
    pub fn new(
        f: impl Fn(&CallContext, &str, &[Value]) -> StorageResult<(Arc<dyn DriverRows>, CallContext)>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(
        &self,
        ctx: &CallContext,
        query: &str,
        args: &[Value],
    ) -> StorageResult<(Arc<dyn DriverRows>, CallContext)> {
        (self.0)(ctx, query, args)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, query, args| middleware.query(ctx, &inner, query, args))
    }
}

/// Single-row-query terminal. Infallible; errors are deferred to the row's
/// scan.
#[derive(Clone)]
pub struct QueryRowFn(
    Arc<dyn Fn(&CallContext, &str, &[Value]) -> (Arc<dyn DriverRow>, CallContext) + Send + Sync>,
);

impl QueryRowFn {
    /// Wraps a closure as a single-row-query operation.
    pub fn new(
        f: impl Fn(&CallContext, &str, &[Value]) -> (Arc<dyn DriverRow>, CallContext)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(
        &self,
        ctx: &CallContext,
        query: &str,
        args: &[Value],
    ) -> (Arc<dyn DriverRow>, CallContext) {
        (self.0)(ctx, query, args)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, query, args| middleware.query_row(ctx, &inner, query, args))
    }
}

/// Transaction-begin terminal.
#[derive(Clone)]
pub struct BeginFn(
    Arc<
        dyn Fn(&CallContext, &TxOptions) -> StorageResult<(Arc<dyn DriverTx>, CallContext)>
            + Send
            + Sync,
    >,
);

impl BeginFn {
    /// Wraps a closure as a begin operation.
    pub fn new(
        f: impl Fn(&CallContext, &TxOptions) -> StorageResult<(Arc<dyn DriverTx>, CallContext)>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(
        &self,
        ctx: &CallContext,
        opts: &TxOptions,
    ) -> StorageResult<(Arc<dyn DriverTx>, CallContext)> {
        (self.0)(ctx, opts)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, opts| middleware.begin(ctx, opts, &inner))
    }
}

/// Ping terminal.
#[derive(Clone)]
pub struct PingFn(Arc<dyn Fn(&CallContext) -> StorageResult<()> + Send + Sync>);

impl PingFn {
    /// Wraps a closure as a ping operation.
    pub fn new(f: impl Fn(&CallContext) -> StorageResult<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext) -> StorageResult<()> {
        (self.0)(ctx)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.ping(ctx, &inner))
    }
}

/// Statement-preparation terminal.
#[derive(Clone)]
pub struct PrepareFn(
    Arc<
        dyn Fn(&CallContext, &str) -> StorageResult<(Arc<dyn DriverStmt>, CallContext)>
            + Send
            + Sync,
    >,
);

impl PrepareFn {
    /// Wraps a closure as a prepare operation.
    pub fn new(
        f: impl Fn(&CallContext, &str) -> StorageResult<(Arc<dyn DriverStmt>, CallContext)>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(
        &self,
        ctx: &CallContext,
        query: &str,
    ) -> StorageResult<(Arc<dyn DriverStmt>, CallContext)> {
        (self.0)(ctx, query)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, query| middleware.prepare(ctx, query, &inner))
    }
}

/// Commit terminal.
#[derive(Clone)]
pub struct CommitFn(Arc<dyn Fn(&CallContext) -> StorageResult<()> + Send + Sync>);

impl CommitFn {
    /// Wraps a closure as a commit operation.
    pub fn new(f: impl Fn(&CallContext) -> StorageResult<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext) -> StorageResult<()> {
        (self.0)(ctx)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.commit(ctx, &inner))
    }
}

/// Rollback terminal.
#[derive(Clone)]
pub struct RollbackFn(Arc<dyn Fn(&CallContext) -> StorageResult<()> + Send + Sync>);

impl RollbackFn {
    /// Wraps a closure as a rollback operation.
    pub fn new(f: impl Fn(&CallContext) -> StorageResult<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext) -> StorageResult<()> {
        (self.0)(ctx)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.rollback(ctx, &inner))
    }
}

/// Statement-rebind terminal (attach an existing statement to a
/// transaction). Infallible, mirroring the driver surface.
#[derive(Clone)]
pub struct RebindFn(
    Arc<
        dyn Fn(&CallContext, Arc<dyn DriverStmt>) -> (Arc<dyn DriverStmt>, CallContext)
            + Send
            + Sync,
    >,
);

impl RebindFn {
    /// Wraps a closure as a rebind operation.
    pub fn new(
        f: impl Fn(&CallContext, Arc<dyn DriverStmt>) -> (Arc<dyn DriverStmt>, CallContext)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(
        &self,
        ctx: &CallContext,
        stmt: Arc<dyn DriverStmt>,
    ) -> (Arc<dyn DriverStmt>, CallContext) {
        (self.0)(ctx, stmt)
    }

    /// Layers `middleware` around this operation.
    #[must_use]
    pub fn wrapped(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, stmt| middleware.rebind(ctx, stmt, &inner))
    }
}

/// Scan terminal, shared by single-row and cursor scans.
#[derive(Clone)]
pub struct ScanFn(Arc<dyn Fn(&CallContext, &mut [Value]) -> StorageResult<()> + Send + Sync>);

impl ScanFn {
    /// Wraps a closure as a scan operation.
    pub fn new(
        f: impl Fn(&CallContext, &mut [Value]) -> StorageResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext, dest: &mut [Value]) -> StorageResult<()> {
        (self.0)(ctx, dest)
    }

    /// Layers `middleware` around this operation as a single-row scan.
    #[must_use]
    pub fn wrapped_row(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, dest| middleware.scan_row(ctx, &inner, dest))
    }

    /// Layers `middleware` around this operation as a cursor scan.
    #[must_use]
    pub fn wrapped_rows(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx, dest| middleware.scan_rows(ctx, &inner, dest))
    }
}

/// Close terminal, shared by every handle kind.
#[derive(Clone)]
pub struct CloseFn(Arc<dyn Fn(&CallContext) -> StorageResult<()> + Send + Sync>);

impl CloseFn {
    /// Wraps a closure as a close operation.
    pub fn new(f: impl Fn(&CallContext) -> StorageResult<()> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the operation.
    pub fn call(&self, ctx: &CallContext) -> StorageResult<()> {
        (self.0)(ctx)
    }

    /// Layers `middleware` around this operation as a connection close.
    #[must_use]
    pub fn wrapped_conn(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.close_conn(ctx, &inner))
    }

    /// Layers `middleware` around this operation as a statement close.
    #[must_use]
    pub fn wrapped_stmt(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.close_stmt(ctx, &inner))
    }

    /// Layers `middleware` around this operation as a cursor close.
    #[must_use]
    pub fn wrapped_rows(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |ctx| middleware.close_rows(ctx, &inner))
    }

    /// Layers `middleware` around this operation as a driver-handle close.
    #[must_use]
    pub fn wrapped_db(&self, middleware: Arc<dyn StorageMiddleware>) -> Self {
        let inner = self.clone();
        Self::new(move |_ctx| middleware.close_db(&inner))
    }
}

//! Composition of several storage middlewares.
//!
//! Each operation folds the registered middlewares around the terminal
//! right-to-left, so registration order equals execution order. The fold is
//! repeated per operation kind because every kind has its own arity and
//! context-propagation direction.

use crate::driver::{DriverConn, DriverRow, DriverRows, DriverStmt, DriverTx, ExecOutcome, TxOptions, Value};
use crate::middleware::StorageMiddleware;
use crate::ops::{
    BeginFn, CloseFn, CommitFn, ConnectFn, ExecFn, PingFn, PrepareFn, QueryFn, QueryRowFn,
    RebindFn, RollbackFn, ScanFn,
};
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// An ordered list of middlewares acting as one.
pub struct MultiMiddleware {
    middlewares: Vec<Arc<dyn StorageMiddleware>>,
}

impl MultiMiddleware {
    /// Composes the given middlewares; the first entry is outermost.
    #[must_use]
    pub fn new(middlewares: Vec<Arc<dyn StorageMiddleware>>) -> Self {
        Self { middlewares }
    }
}

impl StorageMiddleware for MultiMiddleware {
    fn connect(
        &self,
        ctx: &CallContext,
        next: &ConnectFn,
    ) -> StorageResult<(Arc<dyn DriverConn>, CallContext)> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx)
    }

    fn exec(
        &self,
        ctx: &CallContext,
        next: &ExecFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<ExecOutcome> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, query, args)
    }

    fn query(
        &self,
        ctx: &CallContext,
        next: &QueryFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<(Arc<dyn DriverRows>, CallContext)> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, query, args)
    }

    fn query_row(
        &self,
        ctx: &CallContext,
        next: &QueryRowFn,
        query: &str,
        args: &[Value],
    ) -> (Arc<dyn DriverRow>, CallContext) {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, query, args)
    }

    fn begin(
        &self,
        ctx: &CallContext,
        opts: &TxOptions,
        next: &BeginFn,
    ) -> StorageResult<(Arc<dyn DriverTx>, CallContext)> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, opts)
    }

    fn ping(&self, ctx: &CallContext, next: &PingFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx)
    }

    fn prepare(
        &self,
        ctx: &CallContext,
        query: &str,
        next: &PrepareFn,
    ) -> StorageResult<(Arc<dyn DriverStmt>, CallContext)> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, query)
    }

    fn rebind(
        &self,
        ctx: &CallContext,
        stmt: Arc<dyn DriverStmt>,
        next: &RebindFn,
    ) -> (Arc<dyn DriverStmt>, CallContext) {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx, stmt)
    }

    fn commit(&self, ctx: &CallContext, next: &CommitFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx)
    }

    fn rollback(&self, ctx: &CallContext, next: &RollbackFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped(m.clone());
        }
        n.call(ctx)
    }

    fn scan_row(&self, ctx: &CallContext, next: &ScanFn, dest: &mut [Value]) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_row(m.clone());
        }
        n.call(ctx, dest)
    }

    fn scan_rows(&self, ctx: &CallContext, next: &ScanFn, dest: &mut [Value]) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_rows(m.clone());
        }
        n.call(ctx, dest)
    }

    fn close_stmt(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_stmt(m.clone());
        }
        n.call(ctx)
    }

    fn close_conn(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_conn(m.clone());
        }
        n.call(ctx)
    }

    fn close_rows(&self, ctx: &CallContext, next: &CloseFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_rows(m.clone());
        }
        n.call(ctx)
    }

    fn close_db(&self, next: &CloseFn) -> StorageResult<()> {
        let mut n = next.clone();
        for m in self.middlewares.iter().rev() {
            n = n.wrapped_db(m.clone());
        }
        n.call(&CallContext::background())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct TraceMiddleware {
        name: &'static str,
        trace: Arc<Mutex<Vec<String>>>,
    }

    impl StorageMiddleware for TraceMiddleware {
        fn exec(
            &self,
            ctx: &CallContext,
            next: &ExecFn,
            query: &str,
            args: &[Value],
        ) -> StorageResult<ExecOutcome> {
            self.trace.lock().unwrap().push(format!("enter-{}", self.name));
            let result = next.call(ctx, query, args);
            self.trace.lock().unwrap().push(format!("exit-{}", self.name));
            result
        }
    }

    #[test]
    fn exec_runs_middlewares_in_registration_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let multi = MultiMiddleware::new(vec![
            Arc::new(TraceMiddleware { name: "outer", trace: trace.clone() }),
            Arc::new(TraceMiddleware { name: "inner", trace: trace.clone() }),
        ]);

        let terminal_trace = trace.clone();
        let terminal = ExecFn::new(move |_ctx, _query, _args| {
            terminal_trace.lock().unwrap().push("terminal".to_string());
            Ok(ExecOutcome::default())
        });

        multi
            .exec(&CallContext::background(), &terminal, "SELECT 1", &[])
            .unwrap();

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["enter-outer", "enter-inner", "terminal", "exit-inner", "exit-outer"]
        );
    }
}

//! The single-row and cursor handles.

use crate::driver::{DriverRow, DriverRows, Value};
use crate::middleware::StorageMiddleware;
use crate::ops::{CloseFn, ScanFn};
use crate::StorageResult;
use std::sync::Arc;
use weft_core::CallContext;

/// A deferred single-row result carrying its lineage context.
pub struct Row {
    row: Arc<dyn DriverRow>,
    context: CallContext,
    middleware: Arc<dyn StorageMiddleware>,
}

impl Row {
    pub(crate) fn wrap(
        row: Arc<dyn DriverRow>,
        context: CallContext,
        middleware: Arc<dyn StorageMiddleware>,
    ) -> Self {
        Self { row, context, middleware }
    }

    /// The lineage context this row carries.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Copies the row into `dest`, surfacing any deferred query error.
    pub fn scan(&self, dest: &mut [Value]) -> StorageResult<()> {
        let row = self.row.clone();
        let terminal = ScanFn::new(move |_ctx, dest| row.scan(dest));
        self.middleware.scan_row(&self.context, &terminal, dest)
    }
}

/// A multi-row cursor carrying its lineage context.
pub struct Rows {
    rows: Arc<dyn DriverRows>,
    context: CallContext,
    middleware: Arc<dyn StorageMiddleware>,
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows").finish_non_exhaustive()
    }
}

impl Rows {
    pub(crate) fn wrap(
        rows: Arc<dyn DriverRows>,
        context: CallContext,
        middleware: Arc<dyn StorageMiddleware>,
    ) -> Self {
        Self { rows, context, middleware }
    }

    /// The lineage context this cursor carries.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Advances to the next row; `false` when exhausted. Advancing is a
    /// pure cursor move, not an intercepted operation.
    #[must_use]
    pub fn next(&self) -> bool {
        self.rows.next()
    }

    /// Copies the current row into `dest`.
    pub fn scan(&self, dest: &mut [Value]) -> StorageResult<()> {
        let rows = self.rows.clone();
        let terminal = ScanFn::new(move |_ctx, dest| rows.scan(dest));
        self.middleware.scan_rows(&self.context, &terminal, dest)
    }

    /// Releases the cursor.
    pub fn close(&self) -> StorageResult<()> {
        let rows = self.rows.clone();
        let terminal = CloseFn::new(move |_ctx| rows.close());
        self.middleware.close_rows(&self.context, &terminal)
    }
}

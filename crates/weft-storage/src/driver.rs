//! The terminal driver surface.
//!
//! These traits describe the innermost blocking storage driver the
//! middleware wraps: the same shape the delegating handles expose outward,
//! so call sites stay unaware that middleware exists. Every trait takes
//! `&self` and hands out `Arc` handles; implementations use interior
//! mutability for any per-handle state.

use crate::StorageResult;
use std::sync::Arc;

/// A value bound as a query argument or produced by a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// Double-precision float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

/// Transaction isolation level requested at begin time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IsolationLevel {
    /// Driver default.
    #[default]
    Default,
    /// Read uncommitted.
    ReadUncommitted,
    /// Read committed.
    ReadCommitted,
    /// Repeatable read.
    RepeatableRead,
    /// Serializable.
    Serializable,
}

/// Options for beginning a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Requested isolation level.
    pub isolation: IsolationLevel,
    /// Whether the transaction is read-only.
    pub read_only: bool,
}

/// Result of a statement execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Rows affected by the statement.
    pub rows_affected: u64,
    /// Identifier generated by an insert, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// Top-level driver handle (the connection pool analogue).
pub trait Driver: Send + Sync {
    /// Acquires a dedicated connection.
    fn conn(&self) -> StorageResult<Arc<dyn DriverConn>>;

    /// Executes a statement without returning rows.
    fn exec(&self, query: &str, args: &[Value]) -> StorageResult<ExecOutcome>;

    /// Runs a query returning a row cursor.
    fn query(&self, query: &str, args: &[Value]) -> StorageResult<Arc<dyn DriverRows>>;

    /// Runs a query expected to return at most one row. Errors are deferred
    /// to the row's `scan`.
    fn query_row(&self, query: &str, args: &[Value]) -> Arc<dyn DriverRow>;

    /// Prepares a statement.
    fn prepare(&self, query: &str) -> StorageResult<Arc<dyn DriverStmt>>;

    /// Begins a transaction.
    fn begin(&self, opts: &TxOptions) -> StorageResult<Arc<dyn DriverTx>>;

    /// Verifies the backend is reachable.
    fn ping(&self) -> StorageResult<()>;

    /// Closes the driver, releasing pooled resources.
    fn close(&self) -> StorageResult<()>;
}

/// A dedicated connection.
pub trait DriverConn: Send + Sync {
    /// Executes a statement on this connection.
    fn exec(&self, query: &str, args: &[Value]) -> StorageResult<ExecOutcome>;

    /// Runs a query on this connection.
    fn query(&self, query: &str, args: &[Value]) -> StorageResult<Arc<dyn DriverRows>>;

    /// Runs a single-row query on this connection.
    fn query_row(&self, query: &str, args: &[Value]) -> Arc<dyn DriverRow>;

    /// Prepares a statement on this connection.
    fn prepare(&self, query: &str) -> StorageResult<Arc<dyn DriverStmt>>;

    /// Begins a transaction on this connection.
    fn begin(&self, opts: &TxOptions) -> StorageResult<Arc<dyn DriverTx>>;

    /// Verifies this connection is alive.
    fn ping(&self) -> StorageResult<()>;

    /// Returns the connection to the driver.
    fn close(&self) -> StorageResult<()>;
}

/// An open transaction.
pub trait DriverTx: Send + Sync {
    /// Executes a statement inside the transaction.
    fn exec(&self, query: &str, args: &[Value]) -> StorageResult<ExecOutcome>;

    /// Runs a query inside the transaction.
    fn query(&self, query: &str, args: &[Value]) -> StorageResult<Arc<dyn DriverRows>>;

    /// Runs a single-row query inside the transaction.
    fn query_row(&self, query: &str, args: &[Value]) -> Arc<dyn DriverRow>;

    /// Prepares a statement inside the transaction.
    fn prepare(&self, query: &str) -> StorageResult<Arc<dyn DriverStmt>>;

    /// Rebinds an existing prepared statement to this transaction.
    fn stmt(&self, stmt: Arc<dyn DriverStmt>) -> Arc<dyn DriverStmt>;

    /// Commits the transaction.
    fn commit(&self) -> StorageResult<()>;

    /// Rolls the transaction back.
    fn rollback(&self) -> StorageResult<()>;
}

/// A prepared statement.
pub trait DriverStmt: Send + Sync {
    /// Executes the statement.
    fn exec(&self, args: &[Value]) -> StorageResult<ExecOutcome>;

    /// Runs the statement as a query.
    fn query(&self, args: &[Value]) -> StorageResult<Arc<dyn DriverRows>>;

    /// Runs the statement as a single-row query.
    fn query_row(&self, args: &[Value]) -> Arc<dyn DriverRow>;

    /// Closes the statement.
    fn close(&self) -> StorageResult<()>;
}

/// A deferred single-row result.
pub trait DriverRow: Send + Sync {
    /// Copies the row into `dest`. Reports the deferred query error, or
    /// no-rows, when the query did not produce a row.
    fn scan(&self, dest: &mut [Value]) -> StorageResult<()>;
}

/// A multi-row cursor.
pub trait DriverRows: Send + Sync {
    /// Advances to the next row; `false` when exhausted.
    fn next(&self) -> bool;

    /// Copies the current row into `dest`.
    fn scan(&self, dest: &mut [Value]) -> StorageResult<()>;

    /// Releases the cursor.
    fn close(&self) -> StorageResult<()>;
}

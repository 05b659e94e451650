//! # Weft Storage
//!
//! Storage-operation middleware over a blocking driver surface. A
//! [`Database`] wraps a [`Driver`] with a resolved [`StorageMiddleware`]
//! chain and exposes the identical operation surface outward; derived
//! handles ([`Connection`], [`Transaction`], [`Statement`], [`Row`],
//! [`Rows`]) carry the context lineage their creating operation returned
//! and pass it into every subsequent operation.
//!
//! Context propagation is bidirectional and operation-dependent: the six
//! scope-establishing operations return a context next to their handle, the
//! rest only consume one. Composition is hand-specialized per operation
//! kind so each kind's arity and propagation direction stays visible in the
//! middleware trait; there is no generic any-to-any composer.
//!
//! Failures short-circuit: no result-handle wrapping happens after an
//! error, and errors reach the caller unchanged unless a middleware
//! explicitly chooses to translate them.

#![forbid(unsafe_code)]

pub mod conn;
pub mod db;
pub mod driver;
pub mod error;
pub mod middleware;
pub mod multi;
pub mod ops;
pub mod rows;
pub mod stmt;
pub mod tx;

pub use conn::Connection;
pub use db::Database;
pub use driver::{
    Driver, DriverConn, DriverRow, DriverRows, DriverStmt, DriverTx, ExecOutcome, IsolationLevel,
    TxOptions, Value,
};
pub use error::StorageError;
pub use middleware::{chain_middlewares, PassthroughMiddleware, StorageMiddleware};
pub use multi::MultiMiddleware;
pub use rows::{Row, Rows};
pub use stmt::{is_prepared_statement, Statement};
pub use tx::Transaction;

/// Result type alias using [`StorageError`].
pub type StorageResult<T> = Result<T, StorageError>;

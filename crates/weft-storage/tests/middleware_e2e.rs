//! End-to-end storage middleware tests over an in-memory fake driver.

use parking_lot::Mutex;
use std::sync::Arc;
use weft_core::CallContext;
use weft_storage::ops::{BeginFn, ExecFn, QueryFn};
use weft_storage::{
    is_prepared_statement, Database, Driver, DriverConn, DriverRow, DriverRows, DriverStmt,
    DriverTx, ExecOutcome, StorageError, StorageMiddleware, StorageResult, TxOptions, Value,
};

#[derive(Default)]
struct FakeDriver {
    fail_next_query: bool,
}

struct FakeConn;
struct FakeTx;
struct FakeStmt;

struct FakeRow {
    data: Option<Vec<Value>>,
}

struct FakeRows {
    data: Mutex<Vec<Vec<Value>>>,
    current: Mutex<Option<Vec<Value>>>,
}

impl FakeRows {
    fn new(mut data: Vec<Vec<Value>>) -> Self {
        data.reverse();
        Self { data: Mutex::new(data), current: Mutex::new(None) }
    }
}

impl DriverRows for FakeRows {
    fn next(&self) -> bool {
        let row = self.data.lock().pop();
        let has = row.is_some();
        *self.current.lock() = row;
        has
    }

    fn scan(&self, dest: &mut [Value]) -> StorageResult<()> {
        let current = self.current.lock();
        let row = current.as_ref().ok_or(StorageError::NoRows)?;
        if row.len() != dest.len() {
            return Err(StorageError::ColumnMismatch { expected: row.len(), got: dest.len() });
        }
        dest.clone_from_slice(row);
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl DriverRow for FakeRow {
    fn scan(&self, dest: &mut [Value]) -> StorageResult<()> {
        let row = self.data.as_ref().ok_or(StorageError::NoRows)?;
        dest.clone_from_slice(row);
        Ok(())
    }
}

impl DriverStmt for FakeStmt {
    fn exec(&self, _args: &[Value]) -> StorageResult<ExecOutcome> {
        Ok(ExecOutcome { rows_affected: 1, last_insert_id: Some(7) })
    }

    fn query(&self, _args: &[Value]) -> StorageResult<Arc<dyn DriverRows>> {
        Ok(Arc::new(FakeRows::new(vec![vec![Value::Integer(1)]])))
    }

    fn query_row(&self, _args: &[Value]) -> Arc<dyn DriverRow> {
        Arc::new(FakeRow { data: Some(vec![Value::Integer(1)]) })
    }

    fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl DriverTx for FakeTx {
    fn exec(&self, _query: &str, _args: &[Value]) -> StorageResult<ExecOutcome> {
        Ok(ExecOutcome { rows_affected: 2, last_insert_id: None })
    }

    fn query(&self, _query: &str, _args: &[Value]) -> StorageResult<Arc<dyn DriverRows>> {
        Ok(Arc::new(FakeRows::new(vec![])))
    }

    fn query_row(&self, _query: &str, _args: &[Value]) -> Arc<dyn DriverRow> {
        Arc::new(FakeRow { data: None })
    }

    fn prepare(&self, _query: &str) -> StorageResult<Arc<dyn DriverStmt>> {
        Ok(Arc::new(FakeStmt))
    }

    fn stmt(&self, stmt: Arc<dyn DriverStmt>) -> Arc<dyn DriverStmt> {
        stmt
    }

    fn commit(&self) -> StorageResult<()> {
        Ok(())
    }

    fn rollback(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl DriverConn for FakeConn {
    fn exec(&self, _query: &str, _args: &[Value]) -> StorageResult<ExecOutcome> {
        Ok(ExecOutcome::default())
    }

    fn query(&self, _query: &str, _args: &[Value]) -> StorageResult<Arc<dyn DriverRows>> {
        Ok(Arc::new(FakeRows::new(vec![])))
    }

    fn query_row(&self, _query: &str, _args: &[Value]) -> Arc<dyn DriverRow> {
        Arc::new(FakeRow { data: None })
    }

    fn prepare(&self, _query: &str) -> StorageResult<Arc<dyn DriverStmt>> {
        Ok(Arc::new(FakeStmt))
    }

    fn begin(&self, _opts: &TxOptions) -> StorageResult<Arc<dyn DriverTx>> {
        Ok(Arc::new(FakeTx))
    }

    fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl Driver for FakeDriver {
    fn conn(&self) -> StorageResult<Arc<dyn DriverConn>> {
        Ok(Arc::new(FakeConn))
    }

    fn exec(&self, _query: &str, _args: &[Value]) -> StorageResult<ExecOutcome> {
        Ok(ExecOutcome { rows_affected: 1, last_insert_id: Some(7) })
    }

    fn query(&self, _query: &str, _args: &[Value]) -> StorageResult<Arc<dyn DriverRows>> {
        if self.fail_next_query {
            return Err(StorageError::Driver("query failed".to_string()));
        }
        Ok(Arc::new(FakeRows::new(vec![
            vec![Value::Integer(1), Value::Text("alice".to_string())],
            vec![Value::Integer(2), Value::Text("bob".to_string())],
        ])))
    }

    fn query_row(&self, _query: &str, _args: &[Value]) -> Arc<dyn DriverRow> {
        Arc::new(FakeRow { data: Some(vec![Value::Integer(42)]) })
    }

    fn prepare(&self, _query: &str) -> StorageResult<Arc<dyn DriverStmt>> {
        Ok(Arc::new(FakeStmt))
    }

    fn begin(&self, _opts: &TxOptions) -> StorageResult<Arc<dyn DriverTx>> {
        Ok(Arc::new(FakeTx))
    }

    fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Records enter/exit around exec and query.
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
        self.trace.lock().push(format!("enter-{}", self.name));
        let result = next.call(ctx, query, args);
        self.trace.lock().push(format!("exit-{}", self.name));
        result
    }

    fn query(
        &self,
        ctx: &CallContext,
        next: &QueryFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<(Arc<dyn DriverRows>, CallContext)> {
        self.trace.lock().push(format!("enter-{}", self.name));
        let result = next.call(ctx, query, args);
        self.trace.lock().push(format!("exit-{}", self.name));
        result
    }
}

#[test]
fn nested_exec_counters() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let db = Database::new(
        Arc::new(FakeDriver::default()),
        vec![
            Some(Arc::new(TraceMiddleware { name: "outer", trace: trace.clone() })),
            None,
            Some(Arc::new(TraceMiddleware { name: "inner", trace: trace.clone() })),
        ],
    );

    let outcome = db
        .exec(&CallContext::background(), "INSERT INTO t VALUES (?)", &[Value::Integer(1)])
        .unwrap();

    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.last_insert_id, Some(7));
    assert_eq!(
        *trace.lock(),
        vec!["enter-outer", "enter-inner", "exit-inner", "exit-outer"]
    );
}

/// Captures the prepared-statement marker seen during exec.
struct MarkerProbe {
    prepared: Arc<Mutex<Vec<bool>>>,
}

impl StorageMiddleware for MarkerProbe {
    fn exec(
        &self,
        ctx: &CallContext,
        next: &ExecFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<ExecOutcome> {
        self.prepared.lock().push(is_prepared_statement(ctx));
        next.call(ctx, query, args)
    }
}

#[test]
fn prepared_marker_distinguishes_statement_execs() {
    let prepared = Arc::new(Mutex::new(Vec::new()));
    let db = Database::new(
        Arc::new(FakeDriver::default()),
        vec![Some(Arc::new(MarkerProbe { prepared: prepared.clone() }))],
    );

    let ctx = CallContext::background();
    db.exec(&ctx, "UPDATE t SET a = 1", &[]).unwrap();

    let stmt = db.prepare(&ctx, "UPDATE t SET a = ?").unwrap();
    assert_eq!(stmt.query_str(), "UPDATE t SET a = ?");
    stmt.exec(&[Value::Integer(2)]).unwrap();

    assert_eq!(*prepared.lock(), vec![false, true]);
}

/// Tags the transaction lineage at begin time and observes it during exec.
struct TxTag(&'static str);

struct LineageMiddleware {
    observed: Arc<Mutex<Vec<Option<&'static str>>>>,
}

impl StorageMiddleware for LineageMiddleware {
    fn begin(
        &self,
        ctx: &CallContext,
        opts: &TxOptions,
        next: &BeginFn,
    ) -> StorageResult<(Arc<dyn DriverTx>, CallContext)> {
        let (tx, lineage) = next.call(ctx, opts)?;
        Ok((tx, lineage.with_value(TxTag("tx-scope"))))
    }

    fn exec(
        &self,
        ctx: &CallContext,
        next: &ExecFn,
        query: &str,
        args: &[Value],
    ) -> StorageResult<ExecOutcome> {
        self.observed.lock().push(ctx.value::<TxTag>().map(|t| t.0));
        next.call(ctx, query, args)
    }
}

#[test]
fn begin_context_flows_into_transaction_operations() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let db = Database::new(
        Arc::new(FakeDriver::default()),
        vec![Some(Arc::new(LineageMiddleware { observed: observed.clone() }))],
    );

    let ctx = CallContext::background();
    db.exec(&ctx, "SELECT 1", &[]).unwrap();

    let tx = db.begin(&ctx, &TxOptions::default()).unwrap();
    tx.exec("SELECT 2", &[]).unwrap();
    tx.commit().unwrap();

    assert_eq!(*observed.lock(), vec![None, Some("tx-scope")]);
}

#[test]
fn query_error_short_circuits_without_wrapping() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let db = Database::new(
        Arc::new(FakeDriver { fail_next_query: true }),
        vec![Some(Arc::new(TraceMiddleware { name: "m", trace: trace.clone() }))],
    );

    let err = db.query(&CallContext::background(), "SELECT * FROM t", &[]).unwrap_err();
    assert_eq!(err, StorageError::Driver("query failed".to_string()));
    // The middleware still observed the failed call on the way out.
    assert_eq!(*trace.lock(), vec!["enter-m", "exit-m"]);
}

#[test]
fn cursor_iteration_and_scan() {
    let db = Database::new(Arc::new(FakeDriver::default()), vec![]);
    let ctx = CallContext::background();

    let rows = db.query(&ctx, "SELECT id, name FROM users", &[]).unwrap();
    let mut seen = Vec::new();
    while rows.next() {
        let mut dest = vec![Value::Null, Value::Null];
        rows.scan(&mut dest).unwrap();
        seen.push(dest);
    }
    rows.close().unwrap();

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0][1], Value::Text("alice".to_string()));
    assert_eq!(seen[1][0], Value::Integer(2));
}

#[test]
fn single_row_scan_and_no_rows() {
    let db = Database::new(Arc::new(FakeDriver::default()), vec![]);
    let ctx = CallContext::background();

    let row = db.query_row(&ctx, "SELECT 42", &[]);
    let mut dest = vec![Value::Null];
    row.scan(&mut dest).unwrap();
    assert_eq!(dest[0], Value::Integer(42));

    let tx = db.begin(&ctx, &TxOptions::default()).unwrap();
    let empty = tx.query_row("SELECT missing", &[]);
    assert_eq!(empty.scan(&mut dest).unwrap_err(), StorageError::NoRows);
    tx.rollback().unwrap();
}

#[test]
fn rebound_statement_keeps_query_text() {
    let db = Database::new(Arc::new(FakeDriver::default()), vec![]);
    let ctx = CallContext::background();

    let stmt = db.prepare(&ctx, "SELECT ?").unwrap();
    let tx = db.begin(&ctx, &TxOptions::default()).unwrap();
    let rebound = tx.stmt(&stmt);

    assert_eq!(rebound.query_str(), "SELECT ?");
    assert!(is_prepared_statement(rebound.context()));
    tx.commit().unwrap();
    stmt.close().unwrap();
    db.close().unwrap();
}

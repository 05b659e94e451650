//! Pooled client construction.
//!
//! The pool composes its wrapper chains once and stamps them onto every
//! client it hands out, so checkout cost is a transport fetch plus two
//! `Arc` clones.

use crate::client::{CacheTransport, Client};
use crate::command::{chain_cmder_wrappers, CmderWrapper};
use crate::pipeline::{chain_pipeliner_wrappers, PipelinerWrapper};
use crate::CacheResult;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

/// Source of pooled transports.
pub trait TransportPool: Send + Sync {
    /// Checks a transport out of the pool.
    fn get(&self) -> CacheResult<Arc<dyn CacheTransport>>;

    /// Returns a transport to the pool.
    fn put(&self, transport: Arc<dyn CacheTransport>);
}

/// A transport pool with pre-composed wrapper chains.
pub struct Pool {
    transports: Arc<dyn TransportPool>,
    cmder_wrapper: CmderWrapper,
    pipeliner_wrapper: PipelinerWrapper,
}

impl Pool {
    /// Builds a pool; the wrapper chains are composed here, once.
    #[must_use]
    pub fn new(
        transports: Arc<dyn TransportPool>,
        cmder_wrappers: Vec<Option<CmderWrapper>>,
        pipeliner_wrappers: Vec<Option<PipelinerWrapper>>,
    ) -> Self {
        Self {
            transports,
            cmder_wrapper: chain_cmder_wrappers(cmder_wrappers),
            pipeliner_wrapper: chain_pipeliner_wrappers(pipeliner_wrappers),
        }
    }

    /// Checks out a transport and wraps it in a client carrying the
    /// pool's chains.
    pub fn get(&self) -> CacheResult<Client> {
        let transport = self.transports.get()?;
        Ok(Client::new(
            transport,
            Some(self.cmder_wrapper.clone()),
            Some(self.pipeliner_wrapper.clone()),
        ))
    }

    /// Returns a client's transport to the pool.
    pub fn put(&self, client: Client) {
        self.transports.put(client.into_transport());
    }
}

/// A pool whose construction is deferred until first checkout.
///
/// The builder is retained across failures and discarded only once it
/// succeeds, so a transient failure at first use does not poison later
/// attempts.
pub struct LazyPool {
    pool: OnceLock<Arc<Pool>>,
    init: Mutex<Option<Box<dyn Fn() -> CacheResult<Pool> + Send>>>,
}

impl LazyPool {
    /// Defers `init` until the first [`get_pool`](Self::get_pool).
    #[must_use]
    pub fn new(init: Box<dyn Fn() -> CacheResult<Pool> + Send>) -> Self {
        Self { pool: OnceLock::new(), init: Mutex::new(Some(init)) }
    }

    /// The underlying pool, building it on first call.
    ///
    /// Concurrent callers during construction serialize on the builder
    /// lock; all observe the same pool instance once one succeeds.
    pub fn get_pool(&self) -> CacheResult<Arc<Pool>> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool.clone());
        }

        let mut guard = self.init.lock();
        // A racing caller may have finished while we waited on the lock.
        if let Some(pool) = self.pool.get() {
            return Ok(pool.clone());
        }

        let init = guard.as_ref().ok_or_else(|| {
            crate::reply::CacheError::Transport("pool initializer missing".to_string())
        })?;
        let pool = Arc::new(init()?);
        let _ = self.pool.set(pool.clone());
        *guard = None;
        tracing::debug!("cache pool initialized");
        Ok(pool)
    }

    /// Checks a client out of the lazily built pool.
    pub fn get(&self) -> CacheResult<Client> {
        self.get_pool()?.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Cmder;
    use crate::reply::{CacheError, Reply};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use weft_core::CallContext;

    struct OkTransport;

    impl CacheTransport for OkTransport {
        fn command(&self, _verb: &str, _args: &[String]) -> Reply {
            Reply::Status("OK".to_string())
        }
        fn append(&self, _command: &crate::command::Command) {}
        fn fetch_reply(&self) -> Reply {
            Reply::Nil
        }
        fn close(&self) {}
    }

    struct CountingPool {
        handed_out: AtomicUsize,
        returned: AtomicUsize,
    }

    impl CountingPool {
        fn new() -> Self {
            Self { handed_out: AtomicUsize::new(0), returned: AtomicUsize::new(0) }
        }
    }

    impl TransportPool for CountingPool {
        fn get(&self) -> CacheResult<Arc<dyn CacheTransport>> {
            self.handed_out.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(OkTransport))
        }

        fn put(&self, _transport: Arc<dyn CacheTransport>) {
            self.returned.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn pool_clients_carry_the_composed_chain() {
        let transports = Arc::new(CountingPool::new());
        let tag: CmderWrapper =
            Arc::new(|next: &Cmder, ctx: &CallContext, _verb: &str, args: &[String]| {
                next(ctx, "TAGGED", args)
            });
        let pool = Pool::new(transports.clone(), vec![Some(tag)], vec![]);

        let client = pool.get().unwrap();
        assert_eq!(
            client.cmd(&CallContext::background(), "PING", &[]),
            Reply::Status("OK".to_string())
        );
        pool.put(client);

        assert_eq!(transports.handed_out.load(Ordering::SeqCst), 1);
        assert_eq!(transports.returned.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_pool_builds_once_across_threads() {
        let built = Arc::new(AtomicUsize::new(0));
        let built_in = built.clone();
        let lazy = Arc::new(LazyPool::new(Box::new(move || {
            built_in.fetch_add(1, Ordering::SeqCst);
            Ok(Pool::new(Arc::new(CountingPool::new()), vec![], vec![]))
        })));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.get_pool().unwrap())
            })
            .collect();
        let pools: Vec<Arc<Pool>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(built.load(Ordering::SeqCst), 1);
        for pool in &pools[1..] {
            assert!(Arc::ptr_eq(&pools[0], pool));
        }
    }

    #[test]
    fn lazy_pool_retries_after_a_failed_build() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_in = attempts.clone();
        let lazy = LazyPool::new(Box::new(move || {
            if attempts_in.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CacheError::Transport("dial failed".to_string()))
            } else {
                Ok(Pool::new(Arc::new(CountingPool::new()), vec![], vec![]))
            }
        }));

        assert!(lazy.get_pool().is_err());
        assert!(lazy.get_pool().is_ok());
        assert!(lazy.get().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}

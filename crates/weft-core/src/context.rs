//! The per-call context threaded through every middleware chain.
//!
//! A [`CallContext`] is an opaque, immutable carrier of ambient values.
//! Deriving a child context is a structural extension of the parent:
//! the parent is never mutated, so two concurrent calls deriving from the
//! same parent can never observe each other's additions.
//!
//! Entries are keyed by Rust type, the same scheme the middleware context
//! uses for extensions: a module defines a private or public entry type and
//! stores exactly one value of it. The entry types recognized across Weft
//! are documented on the modules that own them ([`crate::caller`],
//! [`crate::lang`], the prepared-statement marker in `weft-storage`, and the
//! metadata entries in `weft-rpc`).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// One link in the derivation spine. Lookup walks from the newest entry
/// toward the root, so the innermost value for a type wins.
struct Entry {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Opaque, derivable, per-call carrier of ambient values.
///
/// Cloning is O(1): the context is a pointer to an immutable spine of
/// entries. [`CallContext::with_value`] pushes a new entry and returns a new
/// context; the original remains valid and unchanged.
///
/// # Example
///
/// ```
/// use weft_core::CallContext;
///
/// struct TenantId(String);
///
/// let root = CallContext::background();
/// let derived = root.with_value(TenantId("acme".to_string()));
///
/// assert!(root.value::<TenantId>().is_none());
/// assert_eq!(derived.value::<TenantId>().map(|t| t.0.as_str()), Some("acme"));
/// ```
#[derive(Clone, Default)]
pub struct CallContext {
    head: Option<Arc<Entry>>,
}

impl CallContext {
    /// Returns the root context with no entries.
    ///
    /// Used at the root of a call when no request-derived context exists,
    /// e.g. for background database operations.
    #[must_use]
    pub fn background() -> Self {
        Self { head: None }
    }

    /// Derives a new context carrying `value`, keyed by its type.
    ///
    /// The receiver is not modified. If an entry of the same type already
    /// exists, the new entry shadows it for lookups on the derived context.
    #[must_use]
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<T>(),
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up the innermost entry of type `T`, walking toward the root.
    #[must_use]
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            if entry.key == TypeId::of::<T>() {
                return entry.value.downcast_ref::<T>();
            }
            current = entry.parent.as_deref();
        }
        None
    }

    /// Returns true if an entry of type `T` exists anywhere on the spine.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.value::<T>().is_some()
    }

    /// Number of entries on the spine, shadowed ones included.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut n = 0;
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            n += 1;
            current = entry.parent.as_deref();
        }
        n
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("entries", &self.depth())
            .finish()
    }
}

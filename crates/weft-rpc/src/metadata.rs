//! Multi-valued call metadata and its context entries.
//!
//! Metadata is the RPC analogue of HTTP headers: ascii key/value pairs where
//! a key may carry several values. Two context entries distinguish
//! direction: [`IncomingMetadata`] is what the peer sent (read-only from the
//! server's point of view), [`OutgoingMetadata`] is what this process will
//! attach to the next outbound call. Injection merges into the outgoing set,
//! it never replaces it, so stacked interceptors do not clobber each other.

use weft_core::CallContext;

/// Multi-valued ascii metadata map. Keys are compared case-sensitively;
/// producers are expected to use lowercase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Creates an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`, keeping any existing values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder-style [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Returns the first value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values under `key` in insertion order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Appends every entry of `other` to this map.
    pub fn merge(&mut self, other: &Metadata) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Number of entries, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Context entry: metadata received from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMetadata(pub Metadata);

/// Context entry: metadata to attach to the next outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMetadata(pub Metadata);

/// Derives a context carrying the peer's metadata.
#[must_use]
pub fn with_incoming_metadata(ctx: &CallContext, md: Metadata) -> CallContext {
    ctx.with_value(IncomingMetadata(md))
}

/// Returns the peer's metadata, if any was published.
#[must_use]
pub fn incoming_metadata(ctx: &CallContext) -> Option<&Metadata> {
    ctx.value::<IncomingMetadata>().map(|m| &m.0)
}

/// Derives a context whose outbound metadata is exactly `md`.
#[must_use]
pub fn with_outgoing_metadata(ctx: &CallContext, md: Metadata) -> CallContext {
    ctx.with_value(OutgoingMetadata(md))
}

/// Returns the outbound metadata accumulated so far, if any.
#[must_use]
pub fn outgoing_metadata(ctx: &CallContext) -> Option<&Metadata> {
    ctx.value::<OutgoingMetadata>().map(|m| &m.0)
}

/// Derives a context whose outbound metadata is the existing set plus `md`.
///
/// Merge, never replace: values already attached by outer interceptors
/// survive.
#[must_use]
pub fn merge_outgoing(ctx: &CallContext, md: &Metadata) -> CallContext {
    let mut merged = outgoing_metadata(ctx).cloned().unwrap_or_default();
    merged.merge(md);
    with_outgoing_metadata(ctx, merged)
}

//! Request-scoped context values
//!
//! A [`Context`] is an immutable chain of `(ContextKey, FieldValue)` pairs.
//! Attaching a value returns a new context that shares its parent, so a
//! context can be cloned and handed across threads freely.
//!
//! Keys are opaque tokens compared by **identity**, not by name. Every call
//! to [`ContextKey::new`] mints a distinct key, even when two keys carry the
//! same display name. A value is only found with the exact key it was
//! attached under, so keep the key in one place (a `static` or a field)
//! and pass that same token to both `Context::with_value` and the logger
//! configuration. A freshly minted key with a matching name finds nothing.
//!
//! # Example
//!
//! ```
//! use dynamic_logger::{Context, ContextKey, FieldValue};
//!
//! let tenant = ContextKey::new("tenant");
//! let ctx = Context::background().with_value(&tenant, "acme");
//!
//! assert_eq!(ctx.value(&tenant), Some(&FieldValue::from("acme")));
//! assert_eq!(ctx.value(&ContextKey::new("tenant")), None);
//! ```

use super::fields::FieldValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ids below this are reserved for built-in keys
const FIRST_USER_KEY_ID: u64 = 16;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(FIRST_USER_KEY_ID);

/// Key carrying the trace identifier
pub const TRACE_ID_KEY: ContextKey = ContextKey::reserved(1, "trace_id");

/// Key carrying the request identifier
pub const REQUEST_ID_KEY: ContextKey = ContextKey::reserved(2, "request_id");

/// Opaque context key token
#[derive(Clone, Copy)]
pub struct ContextKey {
    id: u64,
    name: &'static str,
}

impl ContextKey {
    /// Mint a new key. `name` is used as the field name when the value is
    /// extracted into a log record.
    pub fn new(name: &'static str) -> Self {
        Self {
            id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
            name,
        }
    }

    const fn reserved(id: u64, name: &'static str) -> Self {
        Self { id, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContextKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContextKey {}

impl Hash for ContextKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextKey({}#{})", self.name, self.id)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

struct Node {
    key: ContextKey,
    value: FieldValue,
    parent: Option<Arc<Node>>,
}

/// Immutable request-scoped value chain
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value` under `key`; the receiver is unchanged
    #[must_use]
    pub fn with_value(&self, key: &ContextKey, value: impl Into<FieldValue>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: *key,
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Most recently attached value for `key`
    pub fn value(&self, key: &ContextKey) -> Option<&FieldValue> {
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if current.key == *key {
                return Some(&current.value);
            }
            node = current.parent.as_deref();
        }
        None
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            list.entry(&(current.key, &current.value));
            node = current.parent.as_deref();
        }
        list.finish()
    }
}

/// Attach a trace identifier
pub fn with_trace_id(ctx: &Context, trace_id: impl Into<String>) -> Context {
    ctx.with_value(&TRACE_ID_KEY, trace_id.into())
}

/// Trace identifier attached to `ctx`, if any
pub fn trace_id(ctx: &Context) -> Option<String> {
    ctx.value(&TRACE_ID_KEY).map(FieldValue::to_display_string)
}

/// Attach a request identifier
pub fn with_request_id(ctx: &Context, request_id: impl Into<String>) -> Context {
    ctx.with_value(&REQUEST_ID_KEY, request_id.into())
}

/// Request identifier attached to `ctx`, if any
pub fn request_id(ctx: &Context) -> Option<String> {
    ctx.value(&REQUEST_ID_KEY).map(FieldValue::to_display_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_compare_by_identity() {
        let a = ContextKey::new("user");
        let b = ContextKey::new("user");
        let a_copy = a;

        assert_ne!(a, b);
        assert_eq!(a, a_copy);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_with_value_does_not_mutate_parent() {
        let key = ContextKey::new("tenant");
        let root = Context::background();
        let child = root.with_value(&key, "acme");

        assert!(root.value(&key).is_none());
        assert_eq!(child.value(&key), Some(&FieldValue::from("acme")));
    }

    #[test]
    fn test_nearest_value_wins() {
        let key = ContextKey::new("attempt");
        let ctx = Context::background()
            .with_value(&key, 1)
            .with_value(&key, 2);

        assert_eq!(ctx.value(&key), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_trace_and_request_helpers() {
        let ctx = with_request_id(&with_trace_id(&Context::background(), "t-1"), "r-9");

        assert_eq!(trace_id(&ctx).as_deref(), Some("t-1"));
        assert_eq!(request_id(&ctx).as_deref(), Some("r-9"));
        assert!(trace_id(&Context::background()).is_none());
    }

    #[test]
    fn test_context_is_shareable_across_threads() {
        let ctx = with_trace_id(&Context::background(), "shared");
        let handle = std::thread::spawn(move || trace_id(&ctx));
        assert_eq!(handle.join().unwrap().as_deref(), Some("shared"));
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::path;
use crate::tree;

/// Callback type for state change notifications.
///
/// Receives the value resolved at the subscribed path at notification time.
pub type ChangeHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Unique handle for a subscription, returned by [`StateStore::subscribe`].
///
/// Use this to unsubscribe later via [`StateStore::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// What a write does when it meets a non-object ancestor on its path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Silently replace the ancestor with a fresh object, destroying the
    /// prior value. This is the historical behavior and the default.
    #[default]
    Lenient,
    /// Refuse the write with `StoreError::PathConflict`, leaving the tree
    /// untouched and firing no notification.
    Strict,
}

struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

/// Hierarchical state store with path-keyed subscriptions.
///
/// - `set(path, value)` writes a subtree and notifies subscribers.
/// - `get(path)` / `get_or(path, default)` read the current value.
/// - `subscribe(path, handler)` registers a change handler.
/// - `unsubscribe(path, id)` removes a handler.
///
/// State is a single JSON tree addressed by dotted paths (`app.theme`).
/// A write to a path notifies that path's handlers first, then the
/// handlers of every strict ancestor (`a`, `a.b`, ... shortest first),
/// each with the value currently resolved at its own path. An ancestor
/// that no longer resolves is skipped.
///
/// Handlers run synchronously on the writing thread, after all internal
/// locks are released: a handler may freely call back into the store,
/// including `set` (notifications then recurse).
pub struct StateStore {
    /// The state tree. Interior nodes are JSON objects.
    tree: RwLock<Value>,
    /// Change handlers, keyed by exact subscribed path.
    subscribers: RwLock<HashMap<String, Vec<HandlerEntry>>>,
    /// Monotonic counter for subscription IDs.
    next_id: AtomicU64,
    policy: ConflictPolicy,
}

impl StateStore {
    /// Create a store with an empty object root and the default
    /// (lenient) conflict policy.
    pub fn new() -> Self {
        Self::with_initial(&Value::Object(Default::default()))
    }

    /// Create a store from an initial snapshot.
    ///
    /// The snapshot is deep-copied; the caller's template is never
    /// mutated by later writes.
    pub fn with_initial(snapshot: &Value) -> Self {
        Self {
            tree: RwLock::new(snapshot.clone()),
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            policy: ConflictPolicy::default(),
        }
    }

    /// Override the conflict policy (builder style, before sharing).
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The store's conflict policy.
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    // ====================================================================
    // Read
    // ====================================================================

    /// Read the value at a path.
    ///
    /// Returns a clone of the resolved subtree, or `None` if any step of
    /// the descent misses. Never fails.
    pub fn get(&self, p: &str) -> Option<Value> {
        let tree = self.tree.read().unwrap();
        tree::resolve(&tree, p).cloned()
    }

    /// Read the value at a path, falling back to `default` on a miss.
    pub fn get_or(&self, p: &str, default: Value) -> Value {
        self.get(p).unwrap_or(default)
    }

    /// Clone the entire state tree.
    ///
    /// This is the hand-off point for external persistence collaborators.
    pub fn snapshot(&self) -> Value {
        self.tree.read().unwrap().clone()
    }

    // ====================================================================
    // Write
    // ====================================================================

    /// Write a value at a path and notify subscribers before returning.
    ///
    /// Intermediate objects are created for absent ancestors. A non-object
    /// ancestor is handled per the store's [`ConflictPolicy`]: replaced
    /// under `Lenient` (the default, in which case `set` cannot fail for
    /// any string path), rejected under `Strict` (tree untouched, no
    /// notification).
    pub fn set(&self, p: &str, value: impl Into<Value>) -> StoreResult<()> {
        let value = value.into();
        {
            let mut tree = self.tree.write().unwrap();
            match self.policy {
                ConflictPolicy::Lenient => tree::write(&mut tree, p, value.clone()),
                ConflictPolicy::Strict => {
                    if let Err(err) = tree::write_strict(&mut tree, p, value.clone()) {
                        warn!("rejected write at '{}': {}", p, err);
                        return Err(err);
                    }
                }
            }
        }
        debug!("state set: {}", p);
        self.notify(p, &value);
        Ok(())
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Subscribe to writes at a path or below it.
    ///
    /// The handler fires on every write to the exact path (with the
    /// written value) and on every write to a descendant path (with the
    /// value re-resolved at the subscribed path). Handlers on the same
    /// path fire in registration order and are not deduplicated: the same
    /// closure registered twice fires twice.
    ///
    /// Returns a [`SubscriptionId`] for unsubscribing.
    pub fn subscribe<F>(&self, p: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subs = self.subscribers.write().unwrap();
        subs.entry(p.to_string()).or_default().push(HandlerEntry {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a handler by its subscription ID and the path it was
    /// registered on. Returns `true` if the entry was found and removed.
    pub fn unsubscribe(&self, p: &str, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.write().unwrap();
        let Some(entries) = subs.get_mut(p) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() < before;
        if entries.is_empty() {
            subs.remove(p);
        }
        removed
    }

    /// Number of handlers currently registered on the exact path.
    pub fn subscriber_count(&self, p: &str) -> usize {
        let subs = self.subscribers.read().unwrap();
        subs.get(p).map_or(0, Vec::len)
    }

    // ====================================================================
    // Notification
    // ====================================================================

    /// Notify exact-path handlers, then every strict ancestor's handlers.
    ///
    /// Handler lists are snapshotted and all locks released before any
    /// handler runs, so handlers may re-enter the store. Ancestor values
    /// are re-resolved at invocation time; an ancestor that resolves to
    /// nothing (a handler earlier in the chain rewrote an intermediate
    /// node) is skipped.
    fn notify(&self, p: &str, value: &Value) {
        let exact = self.handlers_for(p);
        for handler in &exact {
            handler(value);
        }

        for ancestor in path::ancestors(p) {
            let handlers = self.handlers_for(ancestor);
            if handlers.is_empty() {
                continue;
            }
            let resolved = {
                let tree = self.tree.read().unwrap();
                tree::resolve(&tree, ancestor).cloned()
            };
            let Some(resolved) = resolved else {
                debug!("skipping unresolved ancestor '{}' of '{}'", ancestor, p);
                continue;
            };
            for handler in &handlers {
                handler(&resolved);
            }
        }
    }

    /// Snapshot the handlers registered on the exact path.
    fn handlers_for(&self, p: &str) -> Vec<ChangeHandler> {
        let subs = self.subscribers.read().unwrap();
        subs.get(p)
            .map(|entries| entries.iter().map(|e| Arc::clone(&e.handler)).collect())
            .unwrap_or_default()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

//! Typed accessors over one logical subtree.
//!
//! Dotted-path strings are flexible but unchecked. A [`View`] binds a
//! serde-(de)serializable type to a fixed base path so the compiler catches
//! field typos while runtime behavior stays exactly the store's: `save` is
//! a plain `set` at the base path (notifying like any write), `load` is a
//! `get` plus decode.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Default)]
//! struct Settings { theme: String, font_scale: f64 }
//!
//! let settings = store.view::<Settings>("app.settings");
//! settings.save(&Settings { theme: "dark".into(), font_scale: 1.2 })?;
//! let current = settings.load()?;
//! ```

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::store::{StateStore, SubscriptionId};

/// A typed window onto the subtree at a fixed base path.
///
/// Created via [`StateStore::view`]. Borrowing the store keeps the view
/// cheap; clone the path into a new view if a longer lifetime is needed.
pub struct View<'a, T> {
    store: &'a StateStore,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl StateStore {
    /// Create a typed view of the subtree at `path`.
    pub fn view<T>(&self, path: &str) -> View<'_, T> {
        View {
            store: self,
            path: path.to_string(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T> View<'a, T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// The base path this view is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read and decode the value at the base path.
    ///
    /// `NotFound` if the path resolves to nothing, `Serialization` if the
    /// stored value does not decode as `T`.
    pub fn load(&self) -> StoreResult<T> {
        let value = self.store.get(&self.path).ok_or_else(|| StoreError::NotFound {
            path: self.path.clone(),
        })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read and decode, falling back to `default` on any failure.
    pub fn load_or(&self, default: T) -> T {
        self.load().unwrap_or(default)
    }

    /// Read and decode, falling back to `T::default()` on any failure.
    pub fn load_or_default(&self) -> T
    where
        T: Default,
    {
        self.load().unwrap_or_default()
    }

    /// Serialize `value` and write it at the base path.
    ///
    /// Subscribers at and above the base path are notified like for any
    /// other write.
    pub fn save(&self, value: &T) -> StoreResult<()> {
        let json = serde_json::to_value(value)?;
        self.store.set(&self.path, json)
    }

    /// Subscribe at the base path with a typed callback.
    ///
    /// Each notification is decoded as `T`; values that do not decode are
    /// skipped with a warning, so the callback only ever sees well-shaped
    /// data. Unsubscribe through the store with the returned ID.
    pub fn watch<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let path = self.path.clone();
        self.store.subscribe(&self.path, move |value| {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(decoded) => callback(decoded),
                Err(err) => warn!("watch on '{}' skipped undecodable value: {}", path, err),
            }
        })
    }
}

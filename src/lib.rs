//! Canopy: a hierarchical state store with path-keyed subscriptions.
//!
//! One shared JSON tree is the single source of truth behind a stateful
//! UI. Collaborators read and write it through dotted paths and subscribe
//! to paths to be re-invoked when the value there, or anywhere below it,
//! changes.
//!
//! # Three Primitives
//!
//! - `get(path)` / `get_or(path, default)`: read state at a path
//! - `set(path, value)`: write a subtree, then notify synchronously
//! - `subscribe(path, handler)`: observe writes at a path or below it
//!
//! # Path Addressing
//!
//! All state lives in one tree addressed by `.`-delimited paths:
//! - Leaves: `app.theme`, `user.profile.name`
//! - Subtrees: `app.reader`, `journal`
//!
//! Writes auto-create intermediate objects; reads of absent paths fall
//! back to a caller default. There are no wildcards and no array-index
//! addressing.
//!
//! # Ancestor Propagation
//!
//! A write to `a.b.c` notifies subscribers of `a.b.c` with the written
//! value, then subscribers of `a` and `a.b` (shortest first), each with
//! the value currently resolved at its own path. Notification completes
//! before `set` returns.
//!
//! # Example
//!
//! ```ignore
//! use canopy::StateStore;
//! use serde_json::json;
//!
//! let store = StateStore::with_initial(&json!({
//!     "app": { "theme": "dark" }
//! }));
//!
//! store.subscribe("app.reader", |value| {
//!     println!("reader section changed: {value}");
//! });
//!
//! store.set("app.reader.current_section", "overview")?;
//! assert_eq!(store.get_or("app.theme", json!("light")), json!("dark"));
//! ```

pub mod error;
pub mod path;
pub mod render;
pub mod store;
pub mod tree;
pub mod view;

// Re-export primary types at crate root.
pub use error::{StoreError, StoreResult};
pub use render::{Renderer, Surface};
pub use store::{ChangeHandler, ConflictPolicy, StateStore, SubscriptionId};
pub use view::View;

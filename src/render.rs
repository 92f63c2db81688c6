//! Section rendering driven by state changes.
//!
//! UI sections are pure functions from a resolved state value to output
//! text. A [`Surface`] binds named sections to store paths: mounting a
//! section renders it once from current state and subscribes it, so any
//! write to its path, or below it via ancestor propagation, re-renders.
//! The host (terminal, web view, test harness) reads the latest output
//! with [`Surface::output`]; producing anything richer than a `String`
//! stays outside this crate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::store::{StateStore, SubscriptionId};

/// A section renderer: pure function from resolved state to output text.
pub trait Renderer: Send + Sync {
    fn render(&self, value: &Value) -> String;
}

/// Convenience: closures implement Renderer.
impl<F> Renderer for F
where
    F: Fn(&Value) -> String + Send + Sync,
{
    fn render(&self, value: &Value) -> String {
        (self)(value)
    }
}

struct Section {
    path: String,
    subscription: SubscriptionId,
}

/// Registry of named sections, each bound to a path and a renderer.
pub struct Surface {
    store: Arc<StateStore>,
    sections: RwLock<HashMap<String, Section>>,
    outputs: Arc<RwLock<HashMap<String, String>>>,
}

impl Surface {
    /// Create a surface over a shared store.
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            sections: RwLock::new(HashMap::new()),
            outputs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mount a section: render once from current state, then re-render on
    /// every notification for `path`.
    ///
    /// A path that resolves to nothing renders from `Value::Null`; the
    /// renderer decides the fallback output. Mounting a name that is
    /// already mounted replaces the old section (its subscription is
    /// released first).
    pub fn mount(&self, name: &str, path: &str, renderer: Arc<dyn Renderer>) {
        self.unmount(name);

        let initial = self.store.get_or(path, Value::Null);
        self.outputs
            .write()
            .unwrap()
            .insert(name.to_string(), renderer.render(&initial));

        let outputs = Arc::clone(&self.outputs);
        let owned_name = name.to_string();
        let subscription = self.store.subscribe(path, move |value| {
            let rendered = renderer.render(value);
            outputs.write().unwrap().insert(owned_name.clone(), rendered);
        });

        self.sections.write().unwrap().insert(
            name.to_string(),
            Section {
                path: path.to_string(),
                subscription,
            },
        );
    }

    /// Unmount a section: unsubscribe it and drop its output.
    ///
    /// Returns `true` if the section existed.
    pub fn unmount(&self, name: &str) -> bool {
        let Some(section) = self.sections.write().unwrap().remove(name) else {
            return false;
        };
        self.store.unsubscribe(&section.path, section.subscription);
        self.outputs.write().unwrap().remove(name);
        true
    }

    /// The latest rendered output of a section.
    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs.read().unwrap().get(name).cloned()
    }

    /// Names of all mounted sections, sorted.
    pub fn section_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sections.read().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of mounted sections.
    pub fn section_count(&self) -> usize {
        self.sections.read().unwrap().len()
    }

    /// The shared store this surface renders from.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

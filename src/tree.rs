//! Pure walkers over the JSON state tree.
//!
//! The store's tree is a `serde_json::Value`: interior nodes are objects,
//! anything else is a leaf. These functions do the path descent; locking
//! and notification live in [`crate::store`].

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult, value_type_name};
use crate::path;

/// Resolve a path against a tree.
///
/// Walks one key at a time. Returns `None` as soon as the current node is
/// not an object or the next key is absent; there is no partial result.
pub fn resolve<'a>(root: &'a Value, p: &str) -> Option<&'a Value> {
    let mut node = root;
    for key in path::keys(p) {
        node = node.as_object()?.get(key)?;
    }
    Some(node)
}

/// Write a value at a path, creating intermediate objects as needed.
///
/// Every ancestor that is absent or holds a non-object value is replaced
/// with a fresh empty object; the prior value there is destroyed. The final
/// key is assigned wholesale. Cannot fail.
pub fn write(root: &mut Value, p: &str, value: Value) {
    let keys: Vec<&str> = path::keys(p).collect();
    write_keys(root, &keys, value);
}

fn write_keys(node: &mut Value, keys: &[&str], value: Value) {
    match keys {
        [] => *node = value,
        [last] => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node.as_object_mut()
                .unwrap()
                .insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let child = node
                .as_object_mut()
                .unwrap()
                .entry((*first).to_string())
                .or_insert(Value::Null);
            write_keys(child, rest, value);
        }
    }
}

/// Write a value at a path, refusing to destroy non-object ancestors.
///
/// The descent is pre-checked: if any node an object is required at holds a
/// non-object value, the write returns `PathConflict` and the tree is left
/// untouched. Overwriting the value at the final key itself is a plain
/// overwrite, never a conflict.
pub fn write_strict(root: &mut Value, p: &str, value: Value) -> StoreResult<()> {
    if let Some((at, found)) = conflict(root, p) {
        return Err(StoreError::PathConflict { path: at, found });
    }
    write(root, p, value);
    Ok(())
}

/// Find the first node on the descent that should be an object but is not.
///
/// Returns the path of the offending node (empty string for the root) and
/// its JSON type name. Absent keys are not conflicts: everything below them
/// would be freshly created.
fn conflict(root: &Value, p: &str) -> Option<(String, &'static str)> {
    let keys: Vec<&str> = path::keys(p).collect();
    let mut node = root;
    let mut at = String::new();
    for (i, key) in keys.iter().enumerate() {
        let obj = match node.as_object() {
            Some(obj) => obj,
            None => return Some((at, value_type_name(node))),
        };
        if i == keys.len() - 1 {
            return None;
        }
        match obj.get(*key) {
            Some(child) => {
                at = path::join(&at, key);
                node = child;
            }
            None => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========================================================================
    // resolve
    // ========================================================================

    #[test]
    fn resolve_nested_leaf() {
        let tree = json!({"app": {"theme": "dark"}});
        assert_eq!(resolve(&tree, "app.theme"), Some(&json!("dark")));
    }

    #[test]
    fn resolve_composite_node() {
        let tree = json!({"app": {"theme": "dark"}});
        assert_eq!(resolve(&tree, "app"), Some(&json!({"theme": "dark"})));
    }

    #[test]
    fn resolve_missing_key() {
        let tree = json!({"app": {"theme": "dark"}});
        assert_eq!(resolve(&tree, "app.missing"), None);
        assert_eq!(resolve(&tree, "other"), None);
    }

    #[test]
    fn resolve_through_scalar_is_none() {
        // "app.theme" is a string; descending further misses.
        let tree = json!({"app": {"theme": "dark"}});
        assert_eq!(resolve(&tree, "app.theme.deeper"), None);
    }

    #[test]
    fn resolve_through_array_is_none() {
        // Arrays are leaves; there is no index addressing.
        let tree = json!({"items": [1, 2, 3]});
        assert_eq!(resolve(&tree, "items.0"), None);
    }

    #[test]
    fn resolve_empty_path_reads_empty_key() {
        let tree = json!({"": 7, "a": 1});
        assert_eq!(resolve(&tree, ""), Some(&json!(7)));

        let bare = json!({"a": 1});
        assert_eq!(resolve(&bare, ""), None);
    }

    // ========================================================================
    // write (lenient)
    // ========================================================================

    #[test]
    fn write_creates_intermediates() {
        let mut tree = json!({});
        write(&mut tree, "a.b.c", json!(1));
        assert_eq!(tree, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn write_into_existing_object() {
        let mut tree = json!({"a": {"x": 1}});
        write(&mut tree, "a.y", json!(2));
        assert_eq!(tree, json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn write_replaces_subtree_wholesale() {
        let mut tree = json!({"a": {"b": {"deep": true}}});
        write(&mut tree, "a.b", json!(5));
        assert_eq!(tree, json!({"a": {"b": 5}}));
    }

    #[test]
    fn write_destroys_scalar_ancestor() {
        let mut tree = json!({"a": 5});
        write(&mut tree, "a.b", json!(10));
        assert_eq!(tree, json!({"a": {"b": 10}}));
    }

    #[test]
    fn write_destroys_array_ancestor() {
        let mut tree = json!({"a": [1, 2]});
        write(&mut tree, "a.b", json!("x"));
        assert_eq!(tree, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn write_replaces_non_object_root() {
        let mut tree = json!(42);
        write(&mut tree, "a", json!(1));
        assert_eq!(tree, json!({"a": 1}));
    }

    #[test]
    fn write_empty_path_sets_empty_key() {
        let mut tree = json!({});
        write(&mut tree, "", json!(9));
        assert_eq!(tree, json!({"": 9}));
    }

    // ========================================================================
    // write_strict
    // ========================================================================

    #[test]
    fn strict_write_into_fresh_tree() {
        let mut tree = json!({});
        write_strict(&mut tree, "a.b.c", json!(1)).unwrap();
        assert_eq!(tree, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn strict_write_rejects_scalar_ancestor() {
        let mut tree = json!({"a": 5});
        let err = write_strict(&mut tree, "a.b", json!(10)).unwrap_err();
        match err {
            StoreError::PathConflict { path, found } => {
                assert_eq!(path, "a");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Tree untouched.
        assert_eq!(tree, json!({"a": 5}));
    }

    #[test]
    fn strict_write_rejects_non_object_root() {
        let mut tree = json!("scalar root");
        let err = write_strict(&mut tree, "a", json!(1)).unwrap_err();
        match err {
            StoreError::PathConflict { path, found } => {
                assert_eq!(path, "");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tree, json!("scalar root"));
    }

    #[test]
    fn strict_overwrite_of_leaf_is_allowed() {
        // Replacing the value at the final key is a plain overwrite.
        let mut tree = json!({"a": {"b": 5}});
        write_strict(&mut tree, "a.b", json!("text")).unwrap();
        assert_eq!(tree, json!({"a": {"b": "text"}}));
    }

    #[test]
    fn strict_write_deep_under_absent_key() {
        // Absent keys are not conflicts: the chain below is freshly created.
        let mut tree = json!({"a": {"x": 1}});
        write_strict(&mut tree, "a.b.c.d", json!(true)).unwrap();
        assert_eq!(tree, json!({"a": {"x": 1, "b": {"c": {"d": true}}}}));
    }

    #[test]
    fn strict_conflict_deeper_in_the_chain() {
        let mut tree = json!({"a": {"b": "leaf"}});
        let err = write_strict(&mut tree, "a.b.c.d", json!(1)).unwrap_err();
        match err {
            StoreError::PathConflict { path, found } => {
                assert_eq!(path, "a.b");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tree, json!({"a": {"b": "leaf"}}));
    }
}

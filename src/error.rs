use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A strict-mode write ran into a non-object ancestor.
    #[error("path conflict at '{path}': expected object, found {found}")]
    PathConflict {
        /// Path of the node that blocked the descent (empty string = root).
        path: String,
        /// JSON type name of the value found there.
        found: &'static str,
    },

    /// Typed read of a path that holds no value.
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// JSON serialization/deserialization error from the typed view layer.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conflict_display_names_path_and_type() {
        let err = StoreError::PathConflict {
            path: "user.name".to_string(),
            found: "string",
        };
        let msg = err.to_string();
        assert!(msg.contains("user.name"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound {
            path: "app.missing".to_string(),
        };
        assert!(err.to_string().contains("app.missing"));
    }

    #[test]
    fn value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(42)), "number");
        assert_eq!(value_type_name(&json!("hi")), "string");
        assert_eq!(value_type_name(&json!([1])), "array");
        assert_eq!(value_type_name(&json!({"a": 1})), "object");
    }
}

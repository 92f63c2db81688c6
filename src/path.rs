//! Dotted-path helpers.
//!
//! All state lives in a tree addressed by dot-delimited paths:
//! `app.theme`, `user.profile.name`. Paths are split on `.` with no
//! escaping and no filtering; there is no wildcard or array-index
//! addressing.

/// Iterate over the keys of a path.
///
/// `"app.theme"` -> `["app", "theme"]`
/// `"app"` -> `["app"]`
/// `""` -> `[""]` (a single empty key, addressing the `""` entry of the root)
#[inline]
pub fn keys(path: &str) -> std::str::Split<'_, char> {
    path.split('.')
}

/// Iterate over the strict ancestors of a path, shortest first.
///
/// `"a.b.c.d"` -> `["a", "a.b", "a.b.c"]`
/// `"a"` -> `[]` (a single-key path has no strict ancestors)
///
/// This is the notification propagation order: a write to `a.b.c.d`
/// notifies `a.b.c.d` itself, then `a`, then `a.b`, then `a.b.c`.
#[inline]
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('.').map(move |(idx, _)| &path[..idx])
}

/// Join a base path and a child key.
///
/// An empty base yields the key itself, so `join("", "app")` is `"app"`.
pub fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", base, key)
    }
}

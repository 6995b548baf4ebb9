//! Identifier path utilities.
//!
//! Node identifiers are fully-qualified paths such as `com.acme.billing`,
//! split into segments by a configurable separator (default `.`).

/// Default segment separator for node identifiers.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Checks that an identifier is non-empty and has no empty segment.
///
/// # Examples
///
/// ```ignore
/// assert!(is_well_formed("a.b.c", "."));
/// assert!(!is_well_formed("a..c", "."));
/// assert!(!is_well_formed(".a", "."));
/// ```
#[must_use]
pub fn is_well_formed(id: &str, separator: &str) -> bool {
    !id.is_empty() && id.split(separator).all(|segment| !segment.is_empty())
}

/// Checks if `ancestor` is a strict ancestor of `descendant`.
///
/// Requires a separator right after the shared prefix, so `a.b` is not an
/// ancestor of `a.bc`.
#[must_use]
pub fn is_strict_ancestor(ancestor: &str, descendant: &str, separator: &str) -> bool {
    descendant.len() > ancestor.len() + separator.len()
        && descendant.starts_with(ancestor)
        && descendant[ancestor.len()..].starts_with(separator)
}

/// Returns the portion of an identifier before the first `marker`.
///
/// Identifiers without the marker are returned unchanged.
#[must_use]
pub fn stem<'a>(id: &'a str, marker: &str) -> &'a str {
    id.find(marker).map_or(id, |pos| &id[..pos])
}

/// Checks if `id` is `prefix` itself or lies under it.
#[must_use]
pub fn is_under(id: &str, prefix: &str, separator: &str) -> bool {
    id == prefix || is_strict_ancestor(prefix, id, separator)
}

//! Content-derived entity tags and conditional header matching.

use sha2::{Digest, Sha256};

/// Quoted hex SHA-256 of `content`. Identical content always yields the same tag.
pub fn compute(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    format!("\"{}\"", hex::encode(hash))
}

/// Weak comparison of an `If-None-Match` header value against `current`.
///
/// Accepts `*`, comma-separated lists, weak `W/` tags and bare unquoted tags.
pub fn matches(header: &str, current: &str) -> bool {
    matches_with(header, current, false)
}

/// Strong comparison of an `If-Match` header value against `current`. Weak
/// tags never match.
pub fn matches_strong(header: &str, current: &str) -> bool {
    matches_with(header, current, true)
}

fn matches_with(header: &str, current: &str, strong: bool) -> bool {
    let current = strip(current);
    header.split(',').map(str::trim).any(|candidate| {
        if candidate == "*" {
            return true;
        }
        if candidate.is_empty() || (strong && candidate.starts_with("W/")) {
            return false;
        }
        strip(candidate) == current
    })
}

fn strip(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_quoted() {
        let a = compute("hello");
        assert_eq!(a, compute("hello"));
        assert_ne!(a, compute("hello!"));
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_eq!(a.len(), 64 + 2);
    }

    #[test]
    fn header_matching() {
        let tag = compute("x");
        assert!(matches(&tag, &tag));
        assert!(matches("*", &tag));
        assert!(matches(&format!("\"nope\", {tag}"), &tag));
        assert!(matches(&format!("W/{tag}"), &tag));
        assert!(matches(tag.trim_matches('"'), &tag));
        assert!(!matches("\"nope\"", &tag));
        assert!(!matches("", &tag));
    }

    #[test]
    fn strong_matching_ignores_weak_tags() {
        let tag = compute("x");
        assert!(matches_strong(&tag, &tag));
        assert!(matches_strong("*", &tag));
        assert!(matches_strong(&format!("W/{tag}, {tag}"), &tag));
        assert!(!matches_strong(&format!("W/{tag}"), &tag));
    }
}

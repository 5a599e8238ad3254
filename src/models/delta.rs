use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A single positional edit between two snapshots of a document.
///
/// Positions and lengths count Unicode scalar values, not bytes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Delta {
    Insert { position: usize, text: String },
    Delete { position: usize, length: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeltaError {
    #[error("position {position} is past the end of a {len} char document")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("deleting {length} chars at {position} overruns a {len} char document")]
    LengthOutOfRange {
        position: usize,
        length: usize,
        len: usize,
    },
}

/// Compute the delta that turns `old` into `new`.
///
/// Only a single contiguous insert or delete is representable. Returns
/// `None` when the texts are identical, have equal lengths, or differ by a
/// compound edit; callers then send the full text instead.
pub fn diff(old: &str, new: &str) -> Option<Delta> {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    if old_chars.len() == new_chars.len() {
        return None;
    }

    let prefix = old_chars
        .iter()
        .zip(new_chars.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // The suffix may not eat into the prefix of the shorter side.
    let max_suffix = old_chars.len().min(new_chars.len()) - prefix;
    let suffix = old_chars
        .iter()
        .rev()
        .zip(new_chars.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = old_chars.len() - prefix - suffix;
    let new_middle = new_chars.len() - prefix - suffix;

    match (old_middle, new_middle) {
        (removed, 0) => Some(Delta::Delete {
            position: prefix,
            length: removed,
        }),
        (0, _) => Some(Delta::Insert {
            position: prefix,
            text: new_chars[prefix..prefix + new_middle].iter().collect(),
        }),
        _ => None,
    }
}

/// Apply `delta` to `text`, producing the edited text.
pub fn apply(text: &str, delta: &Delta) -> Result<String, DeltaError> {
    let len = text.chars().count();
    match delta {
        Delta::Insert { position, text: inserted } => {
            if *position > len {
                return Err(DeltaError::PositionOutOfRange {
                    position: *position,
                    len,
                });
            }
            let at = byte_offset(text, *position);
            let mut out = String::with_capacity(text.len() + inserted.len());
            out.push_str(&text[..at]);
            out.push_str(inserted);
            out.push_str(&text[at..]);
            Ok(out)
        }
        Delta::Delete { position, length } => {
            if *position > len {
                return Err(DeltaError::PositionOutOfRange {
                    position: *position,
                    len,
                });
            }
            let Some(end) = position.checked_add(*length).filter(|end| *end <= len) else {
                return Err(DeltaError::LengthOutOfRange {
                    position: *position,
                    length: *length,
                    len,
                });
            };
            let start = byte_offset(text, *position);
            let end = byte_offset(text, end);
            let mut out = String::with_capacity(text.len() - (end - start));
            out.push_str(&text[..start]);
            out.push_str(&text[end..]);
            Ok(out)
        }
    }
}

/// Byte index of the `chars`-th scalar value, or the text length at the end.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_insert_carries_the_rest_of_the_new_text() {
        let delta = diff("hello", "hello world").unwrap();
        assert_eq!(
            delta,
            Delta::Insert {
                position: 5,
                text: " world".to_string()
            }
        );
        assert_eq!(apply("hello", &delta).unwrap(), "hello world");
    }

    #[test]
    fn trailing_delete() {
        let delta = diff("hello world", "hello").unwrap();
        assert_eq!(
            delta,
            Delta::Delete {
                position: 5,
                length: 6
            }
        );
    }

    #[test]
    fn insert_in_the_middle() {
        let delta = diff("helo", "hello").unwrap();
        assert_eq!(apply("helo", &delta).unwrap(), "hello");
    }

    #[test]
    fn delete_in_the_middle() {
        let delta = diff("abcdef", "abef").unwrap();
        assert_eq!(
            delta,
            Delta::Delete {
                position: 2,
                length: 2
            }
        );
        assert_eq!(apply("abcdef", &delta).unwrap(), "abef");
    }

    #[test]
    fn equal_length_change_is_not_representable() {
        assert_eq!(diff("cat", "car"), None);
        assert_eq!(diff("same", "same"), None);
    }

    #[test]
    fn compound_edit_is_not_representable() {
        assert_eq!(diff("abc", "x"), None);
        assert_eq!(diff("abc", "xbcde"), None);
    }

    #[test]
    fn positions_count_chars_not_bytes() {
        let delta = diff("héllo", "héllo ✓").unwrap();
        assert_eq!(
            delta,
            Delta::Insert {
                position: 5,
                text: " ✓".to_string()
            }
        );
        assert_eq!(apply("héllo", &delta).unwrap(), "héllo ✓");

        let delta = diff("naïve", "nave").unwrap();
        assert_eq!(apply("naïve", &delta).unwrap(), "nave");
    }

    #[test]
    fn from_and_to_empty() {
        assert_eq!(apply("", &diff("", "abc").unwrap()).unwrap(), "abc");
        assert_eq!(apply("abc", &diff("abc", "").unwrap()).unwrap(), "");
    }

    #[test]
    fn apply_rejects_out_of_range_edits() {
        let err = apply(
            "abc",
            &Delta::Insert {
                position: 4,
                text: "x".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err, DeltaError::PositionOutOfRange { position: 4, len: 3 });

        let err = apply(
            "abc",
            &Delta::Delete {
                position: 2,
                length: 2,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::LengthOutOfRange { .. }));
    }

    #[test]
    fn huge_delete_length_is_out_of_range() {
        let err = apply(
            "abc",
            &Delta::Delete {
                position: 1,
                length: usize::MAX,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            DeltaError::LengthOutOfRange {
                position: 1,
                length: usize::MAX,
                len: 3
            }
        );
    }

    #[test]
    fn wire_shape() {
        let json = serde_json::to_value(Delta::Delete {
            position: 1,
            length: 2,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "delete", "position": 1, "length": 2})
        );

        let parsed: Delta =
            serde_json::from_str(r#"{"kind":"insert","position":0,"text":"hi"}"#).unwrap();
        assert_eq!(
            parsed,
            Delta::Insert {
                position: 0,
                text: "hi".into()
            }
        );
    }
}

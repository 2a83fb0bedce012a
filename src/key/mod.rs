//! Identifier classification for library content
//!
//! Every entity in a content library is addressed by an opaque string id.
//! The id's shape tells us what kind of entity it names:
//!
//! - `lb:{org}:{lib}:{block_type}:{usage_id}` is a single content block
//! - `lct:{org}:{lib}:{container_type}:{id}` is a container (unit,
//!   section or subsection)
//! - a plain slug (letters, digits, `.`, `_`, `-`) is a collection key
//!
//! Classification never hits the network and never consults metadata; it
//! is pure string inspection, so callers can branch on the result before
//! any fetch has happened.

use std::fmt;

use thiserror::Error;

/// Prefix marking an individually addressable content block.
pub const BLOCK_PREFIX: &str = "lb:";

/// Prefix marking a structural container.
pub const CONTAINER_PREFIX: &str = "lct:";

/// The kind of entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A single content block (`lb:` key)
    Component,
    /// A unit container (`lct:` key with type `unit`)
    Unit,
    /// A section container (`lct:` key with type `section`)
    Section,
    /// A subsection container (`lct:` key with type `subsection`)
    Subsection,
    /// A collection, addressed by a plain slug
    Collection,
}

impl EntityKind {
    /// Human-readable name for titles and messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Component => "Component",
            EntityKind::Unit => "Unit",
            EntityKind::Section => "Section",
            EntityKind::Subsection => "Subsection",
            EntityKind::Collection => "Collection",
        }
    }

    /// True for the three container kinds.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            EntityKind::Unit | EntityKind::Section | EntityKind::Subsection
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error classifying an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("empty identifier")]
    Empty,

    #[error("malformed key: {0}")]
    Malformed(String),

    #[error("unknown container type '{container_type}' in {key}")]
    UnknownContainerType { key: String, container_type: String },

    #[error("invalid collection key: {0}")]
    InvalidCollectionKey(String),
}

/// Classify an identifier into its [`EntityKind`].
///
/// Prefixed keys must carry exactly five colon-separated segments, all
/// non-empty (the trailing segment may itself contain colons). Anything
/// unprefixed must be a plain slug to count as a collection key; ids
/// that are neither are rejected rather than guessed at.
pub fn classify(id: &str) -> Result<EntityKind, KeyError> {
    if id.is_empty() {
        return Err(KeyError::Empty);
    }

    if id.starts_with(CONTAINER_PREFIX) {
        let segments = split_key(id)?;
        return match segments.container_type {
            "unit" => Ok(EntityKind::Unit),
            "section" => Ok(EntityKind::Section),
            "subsection" => Ok(EntityKind::Subsection),
            other => Err(KeyError::UnknownContainerType {
                key: id.to_string(),
                container_type: other.to_string(),
            }),
        };
    }

    if id.starts_with(BLOCK_PREFIX) {
        split_key(id)?;
        return Ok(EntityKind::Component);
    }

    if is_collection_slug(id) {
        Ok(EntityKind::Collection)
    } else {
        Err(KeyError::InvalidCollectionKey(id.to_string()))
    }
}

/// Parsed segments of a prefixed (`lb:` or `lct:`) key.
struct KeySegments<'a> {
    org: &'a str,
    lib: &'a str,
    /// Block type for `lb:` keys, container type for `lct:` keys.
    container_type: &'a str,
    #[allow(dead_code)]
    tail: &'a str,
}

/// Split a prefixed key into its five segments, validating that all are
/// present and non-empty. The tail keeps any further colons intact.
fn split_key(id: &str) -> Result<KeySegments<'_>, KeyError> {
    let mut parts = id.splitn(5, ':');
    let _prefix = parts.next();
    let org = parts.next().unwrap_or("");
    let lib = parts.next().unwrap_or("");
    let type_part = parts.next().unwrap_or("");
    let tail = parts.next().unwrap_or("");

    if org.is_empty() || lib.is_empty() || type_part.is_empty() || tail.is_empty() {
        return Err(KeyError::Malformed(id.to_string()));
    }

    Ok(KeySegments {
        org,
        lib,
        container_type: type_part,
        tail,
    })
}

fn is_collection_slug(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Block type of an `lb:` key (e.g. `html`, `problem`), or the container
/// type of an `lct:` key. `None` for unprefixed or malformed ids.
pub fn block_type_of(id: &str) -> Option<&str> {
    if !id.starts_with(BLOCK_PREFIX) && !id.starts_with(CONTAINER_PREFIX) {
        return None;
    }
    split_key(id).ok().map(|s| s.container_type)
}

/// Library key (`lib:{org}:{lib}`) that a prefixed content key belongs
/// to. `None` for unprefixed or malformed ids; collection keys carry no
/// library information of their own.
pub fn library_key_of(id: &str) -> Option<String> {
    if !id.starts_with(BLOCK_PREFIX) && !id.starts_with(CONTAINER_PREFIX) {
        return None;
    }
    split_key(id)
        .ok()
        .map(|s| format!("lib:{}:{}", s.org, s.lib))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_component() {
        assert_eq!(
            classify("lb:org1:lib:html:abc123"),
            Ok(EntityKind::Component)
        );
    }

    #[test]
    fn test_classify_unit() {
        assert_eq!(classify("lct:org1:lib:unit:u-42"), Ok(EntityKind::Unit));
    }

    #[test]
    fn test_classify_section() {
        assert_eq!(
            classify("lct:org1:lib:section:s-1"),
            Ok(EntityKind::Section)
        );
    }

    #[test]
    fn test_classify_subsection() {
        assert_eq!(
            classify("lct:org1:lib:subsection:ss-1"),
            Ok(EntityKind::Subsection)
        );
    }

    #[test]
    fn test_classify_collection_slug() {
        assert_eq!(classify("collection-xyz"), Ok(EntityKind::Collection));
        assert_eq!(classify("my_coll.v2"), Ok(EntityKind::Collection));
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(""), Err(KeyError::Empty));
    }

    #[test]
    fn test_classify_unknown_container_type() {
        let err = classify("lct:org1:lib:chapter:c-1").unwrap_err();
        assert!(matches!(err, KeyError::UnknownContainerType { .. }));
        assert!(err.to_string().contains("chapter"));
    }

    #[test]
    fn test_classify_malformed_block_key() {
        // Missing usage id segment
        assert!(classify("lb:org1:lib:html").is_err());
        // Empty segment in the middle
        assert!(classify("lb:org1::html:abc").is_err());
        // Bare prefix
        assert!(classify("lb:").is_err());
    }

    #[test]
    fn test_classify_rejects_non_slug() {
        assert!(matches!(
            classify("not a slug"),
            Err(KeyError::InvalidCollectionKey(_))
        ));
        assert!(classify("has/slash").is_err());
    }

    #[test]
    fn test_classify_tail_may_contain_colons() {
        // Usage ids can embed further colons; only the first four splits count.
        assert_eq!(
            classify("lb:org1:lib:html:weird:extra"),
            Ok(EntityKind::Component)
        );
    }

    #[test]
    fn test_block_type_of() {
        assert_eq!(block_type_of("lb:org1:lib:html:abc123"), Some("html"));
        assert_eq!(block_type_of("lct:org1:lib:unit:u-42"), Some("unit"));
        assert_eq!(block_type_of("collection-xyz"), None);
        assert_eq!(block_type_of("lb:broken"), None);
    }

    #[test]
    fn test_library_key_of() {
        assert_eq!(
            library_key_of("lb:org1:lib:html:abc123"),
            Some("lib:org1:lib".to_string())
        );
        assert_eq!(
            library_key_of("lct:org1:lib:unit:u-42"),
            Some("lib:org1:lib".to_string())
        );
        assert_eq!(library_key_of("collection-xyz"), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(EntityKind::Component.to_string(), "Component");
        assert_eq!(EntityKind::Unit.to_string(), "Unit");
        assert!(EntityKind::Unit.is_container());
        assert!(!EntityKind::Collection.is_container());
    }
}

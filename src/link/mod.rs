//! Deep links: route paths plus query-string state
//!
//! A [`Location`] is the single source of truth for navigation state.
//! Panel, tab and pending-action state that must survive a copied link
//! live here as query parameters; nothing in the crate caches a parsed
//! copy. Reads parse the query string on every call and writes
//! re-serialize it, so a `Location` can be converted to a shareable
//! string at any moment.
//!
//! Recognized route shapes:
//!
//! ```text
//! /library/{libraryKey}
//! /library/{libraryKey}/item/{selectedId}
//! /library/{libraryKey}/collection/{collectionKey}[/{selectedId}]
//! /library/{libraryKey}/unit/{unitKey}[/{selectedId}]
//! ```
//!
//! Path segments are taken literally (library keys embed colons, never
//! slashes). Query values go through form-urlencoding in both
//! directions. A fragment, if present, is dropped at parse time.

use std::fmt;

use thiserror::Error;
use url::form_urlencoded;

/// Error parsing a deep link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("deep link must start with '/': {0}")]
    NotAbsolute(String),

    #[error("unrecognized route: {0}")]
    UnknownRoute(String),

    #[error("empty path segment in: {0}")]
    EmptySegment(String),
}

/// The path portion of a deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    /// Library home, nothing selected
    Library { library_key: String },
    /// An entity selected at library level
    Item {
        library_key: String,
        selected_id: String,
    },
    /// Browsing inside a collection, optionally with a selection
    Collection {
        library_key: String,
        collection_key: String,
        selected_id: Option<String>,
    },
    /// Browsing inside a unit, optionally with a selection
    Unit {
        library_key: String,
        unit_key: String,
        selected_id: Option<String>,
    },
}

/// A parsed deep link: route path plus raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: RoutePath,
    /// Query string without the leading `?`. Empty when there are no
    /// parameters.
    query: String,
}

impl Location {
    /// Location for a library home with no query parameters.
    pub fn library(library_key: impl Into<String>) -> Self {
        Location {
            path: RoutePath::Library {
                library_key: library_key.into(),
            },
            query: String::new(),
        }
    }

    /// Parse a deep link string.
    pub fn parse(link: &str) -> Result<Self, LinkError> {
        let link = link.split('#').next().unwrap_or(link);
        if !link.starts_with('/') {
            return Err(LinkError::NotAbsolute(link.to_string()));
        }

        let (path_part, query) = match link.split_once('?') {
            Some((p, q)) => (p, q.to_string()),
            None => (link, String::new()),
        };

        let segments: Vec<&str> = path_part
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if path_part.trim_matches('/').split('/').any(str::is_empty) && !segments.is_empty() {
            return Err(LinkError::EmptySegment(link.to_string()));
        }

        let path = match segments.as_slice() {
            ["library", lib] => RoutePath::Library {
                library_key: lib.to_string(),
            },
            ["library", lib, "item", id] => RoutePath::Item {
                library_key: lib.to_string(),
                selected_id: id.to_string(),
            },
            ["library", lib, "collection", key] => RoutePath::Collection {
                library_key: lib.to_string(),
                collection_key: key.to_string(),
                selected_id: None,
            },
            ["library", lib, "collection", key, id] => RoutePath::Collection {
                library_key: lib.to_string(),
                collection_key: key.to_string(),
                selected_id: Some(id.to_string()),
            },
            ["library", lib, "unit", key] => RoutePath::Unit {
                library_key: lib.to_string(),
                unit_key: key.to_string(),
                selected_id: None,
            },
            ["library", lib, "unit", key, id] => RoutePath::Unit {
                library_key: lib.to_string(),
                unit_key: key.to_string(),
                selected_id: Some(id.to_string()),
            },
            _ => return Err(LinkError::UnknownRoute(link.to_string())),
        };

        Ok(Location { path, query })
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn library_key(&self) -> &str {
        match &self.path {
            RoutePath::Library { library_key }
            | RoutePath::Item { library_key, .. }
            | RoutePath::Collection { library_key, .. }
            | RoutePath::Unit { library_key, .. } => library_key,
        }
    }

    /// Currently selected entity id, if any.
    pub fn selected_id(&self) -> Option<&str> {
        match &self.path {
            RoutePath::Library { .. } => None,
            RoutePath::Item { selected_id, .. } => Some(selected_id),
            RoutePath::Collection { selected_id, .. } | RoutePath::Unit { selected_id, .. } => {
                selected_id.as_deref()
            }
        }
    }

    /// Collection the route is scoped to, if any.
    pub fn collection_key(&self) -> Option<&str> {
        match &self.path {
            RoutePath::Collection { collection_key, .. } => Some(collection_key),
            _ => None,
        }
    }

    /// Unit the route is scoped to, if any.
    pub fn unit_key(&self) -> Option<&str> {
        match &self.path {
            RoutePath::Unit { unit_key, .. } => Some(unit_key),
            _ => None,
        }
    }

    /// Change the selected entity, keeping the surrounding context.
    /// Selecting inside a collection or unit keeps that scope; at
    /// library level this toggles between the home and item routes.
    pub fn set_selected(&mut self, id: Option<&str>) {
        let library_key = self.library_key().to_string();
        self.path = match &self.path {
            RoutePath::Library { .. } | RoutePath::Item { .. } => match id {
                Some(id) => RoutePath::Item {
                    library_key,
                    selected_id: id.to_string(),
                },
                None => RoutePath::Library { library_key },
            },
            RoutePath::Collection { collection_key, .. } => RoutePath::Collection {
                library_key,
                collection_key: collection_key.clone(),
                selected_id: id.map(str::to_string),
            },
            RoutePath::Unit { unit_key, .. } => RoutePath::Unit {
                library_key,
                unit_key: unit_key.clone(),
                selected_id: id.map(str::to_string),
            },
        };
    }

    /// Raw string value of a query parameter. The first occurrence wins
    /// when a key repeats.
    pub fn raw_param(&self, key: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Decoded value of a query parameter. Missing parameters and values
    /// the decoder rejects both come back as `None`; callers supply
    /// their own fallback.
    pub fn param<T>(&self, key: &str, decode: impl Fn(&str) -> Option<T>) -> Option<T> {
        self.raw_param(key).and_then(|v| decode(&v))
    }

    /// Write a query parameter. Writing a value equal to `fallback`
    /// removes the parameter instead, so links never carry redundant
    /// defaults. Other parameters keep their positions.
    pub fn set_param<T: PartialEq>(
        &mut self,
        key: &str,
        value: T,
        fallback: T,
        encode: impl Fn(&T) -> String,
    ) {
        if value == fallback {
            self.remove_param(key);
        } else {
            self.insert_param(key, &encode(&value));
        }
    }

    /// Remove a query parameter if present.
    pub fn remove_param(&mut self, key: &str) {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(self.query.as_bytes())
            .filter(|(k, _)| k != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        self.query = serialize_pairs(&pairs);
    }

    fn insert_param(&mut self, key: &str, value: &str) {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;
        for (k, v) in form_urlencoded::parse(self.query.as_bytes()) {
            if k == key {
                // Replace the first occurrence in place, drop any repeats.
                if !replaced {
                    pairs.push((key.to_string(), value.to_string()));
                    replaced = true;
                }
            } else {
                pairs.push((k.into_owned(), v.into_owned()));
            }
        }
        if !replaced {
            pairs.push((key.to_string(), value.to_string()));
        }
        self.query = serialize_pairs(&pairs);
    }
}

fn serialize_pairs(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    serializer.finish()
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            RoutePath::Library { library_key } => write!(f, "/library/{}", library_key)?,
            RoutePath::Item {
                library_key,
                selected_id,
            } => write!(f, "/library/{}/item/{}", library_key, selected_id)?,
            RoutePath::Collection {
                library_key,
                collection_key,
                selected_id,
            } => {
                write!(f, "/library/{}/collection/{}", library_key, collection_key)?;
                if let Some(id) = selected_id {
                    write!(f, "/{}", id)?;
                }
            }
            RoutePath::Unit {
                library_key,
                unit_key,
                selected_id,
            } => {
                write!(f, "/library/{}/unit/{}", library_key, unit_key)?;
                if let Some(id) = selected_id {
                    write!(f, "/{}", id)?;
                }
            }
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_library_home() {
        let loc = Location::parse("/library/lib:org1:demo").unwrap();
        assert_eq!(loc.library_key(), "lib:org1:demo");
        assert_eq!(loc.selected_id(), None);
        assert_eq!(loc.collection_key(), None);
        assert_eq!(loc.unit_key(), None);
    }

    #[test]
    fn test_parse_item_route() {
        let loc = Location::parse("/library/lib:org1:demo/item/lb:org1:demo:html:abc").unwrap();
        assert_eq!(loc.selected_id(), Some("lb:org1:demo:html:abc"));
    }

    #[test]
    fn test_parse_collection_routes() {
        let loc = Location::parse("/library/lib:org1:demo/collection/coll-1").unwrap();
        assert_eq!(loc.collection_key(), Some("coll-1"));
        assert_eq!(loc.selected_id(), None);

        let loc =
            Location::parse("/library/lib:org1:demo/collection/coll-1/lb:org1:demo:html:x").unwrap();
        assert_eq!(loc.collection_key(), Some("coll-1"));
        assert_eq!(loc.selected_id(), Some("lb:org1:demo:html:x"));
    }

    #[test]
    fn test_parse_unit_routes() {
        let loc = Location::parse("/library/lib:org1:demo/unit/lct:org1:demo:unit:u1").unwrap();
        assert_eq!(loc.unit_key(), Some("lct:org1:demo:unit:u1"));
        assert_eq!(loc.selected_id(), None);
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(matches!(
            Location::parse("library/lib:a:b"),
            Err(LinkError::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_route() {
        assert!(matches!(
            Location::parse("/libraries/lib:a:b"),
            Err(LinkError::UnknownRoute(_))
        ));
        assert!(Location::parse("/library").is_err());
        assert!(Location::parse("/library/lib:a:b/item/x/extra").is_err());
    }

    #[test]
    fn test_parse_drops_fragment() {
        let loc = Location::parse("/library/lib:a:b?st=manage#top").unwrap();
        assert_eq!(loc.raw_param("st"), Some("manage".to_string()));
    }

    #[test]
    fn test_display_round_trip() {
        for link in [
            "/library/lib:org1:demo",
            "/library/lib:org1:demo/item/lb:org1:demo:html:abc",
            "/library/lib:org1:demo/collection/coll-1",
            "/library/lib:org1:demo/unit/lct:org1:demo:unit:u1/lb:org1:demo:html:x",
            "/library/lib:org1:demo?st=manage&sa=manage-team",
        ] {
            let loc = Location::parse(link).unwrap();
            assert_eq!(loc.to_string(), link);
        }
    }

    #[test]
    fn test_param_read() {
        let loc = Location::parse("/library/lib:a:b?st=manage").unwrap();
        assert_eq!(loc.param("st", |v| Some(v.to_string())), Some("manage".into()));
        assert_eq!(loc.param("sa", |v| Some(v.to_string())), None);
        // Decoder rejection reads as absent
        assert_eq!(loc.param("st", |_| None::<u32>), None);
    }

    #[test]
    fn test_param_first_occurrence_wins() {
        let loc = Location::parse("/library/lib:a:b?st=manage&st=preview").unwrap();
        assert_eq!(loc.raw_param("st"), Some("manage".to_string()));
    }

    #[test]
    fn test_set_param_and_remove_on_fallback() {
        let mut loc = Location::library("lib:a:b");
        loc.set_param("st", "manage", "preview", |v| v.to_string());
        assert_eq!(loc.to_string(), "/library/lib:a:b?st=manage");

        // Writing the fallback removes the parameter entirely
        loc.set_param("st", "preview", "preview", |v| v.to_string());
        assert_eq!(loc.to_string(), "/library/lib:a:b");
    }

    #[test]
    fn test_set_param_keeps_other_params_in_place() {
        let mut loc = Location::parse("/library/lib:a:b?st=manage&sa=manage-team").unwrap();
        loc.set_param("st", "usage", "preview", |v| v.to_string());
        assert_eq!(loc.to_string(), "/library/lib:a:b?st=usage&sa=manage-team");

        loc.remove_param("st");
        assert_eq!(loc.to_string(), "/library/lib:a:b?sa=manage-team");
    }

    #[test]
    fn test_param_values_are_form_encoded() {
        let mut loc = Location::library("lib:a:b");
        loc.set_param("q", "two words", "", |v| v.to_string());
        assert_eq!(loc.to_string(), "/library/lib:a:b?q=two+words");
        assert_eq!(loc.raw_param("q"), Some("two words".to_string()));
    }

    #[test]
    fn test_set_selected_library_level() {
        let mut loc = Location::library("lib:a:b");
        loc.set_selected(Some("lb:a:b:html:x"));
        assert_eq!(loc.to_string(), "/library/lib:a:b/item/lb:a:b:html:x");
        loc.set_selected(None);
        assert_eq!(loc.to_string(), "/library/lib:a:b");
    }

    #[test]
    fn test_set_selected_keeps_collection_scope() {
        let mut loc = Location::parse("/library/lib:a:b/collection/coll-1").unwrap();
        loc.set_selected(Some("lb:a:b:html:x"));
        assert_eq!(loc.collection_key(), Some("coll-1"));
        assert_eq!(loc.selected_id(), Some("lb:a:b:html:x"));
        loc.set_selected(None);
        assert_eq!(loc.to_string(), "/library/lib:a:b/collection/coll-1");
    }

    #[test]
    fn test_set_selected_keeps_unit_scope() {
        let mut loc = Location::parse("/library/lib:a:b/unit/lct:a:b:unit:u1").unwrap();
        loc.set_selected(Some("lb:a:b:html:x"));
        assert_eq!(
            loc.to_string(),
            "/library/lib:a:b/unit/lct:a:b:unit:u1/lb:a:b:html:x"
        );
    }

    #[test]
    fn test_set_selected_preserves_query() {
        let mut loc = Location::parse("/library/lib:a:b?st=manage").unwrap();
        loc.set_selected(Some("coll-1"));
        assert_eq!(loc.to_string(), "/library/lib:a:b/item/coll-1?st=manage");
    }
}

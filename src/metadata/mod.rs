//! Entity metadata: records, sources and the in-memory store
//!
//! The navigation core never blocks on metadata. Sources implement
//! [`MetadataSource`] (HTTP backend or a local manifest file), fetches
//! run on a worker thread, and completed records land in a
//! [`MetadataStore`] that the render layer reads synchronously.

pub mod http;
pub mod manifest;
pub mod worker;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::key::EntityKind;

/// Error fetching or decoding metadata
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("read error for {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Library-level record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub num_blocks: u64,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub last_published: Option<String>,
    #[serde(default)]
    pub published_by: Option<String>,
    #[serde(default)]
    pub last_draft_created: Option<String>,
    #[serde(default)]
    pub last_draft_created_by: Option<String>,
    #[serde(default)]
    pub has_unpublished_changes: bool,
    #[serde(default)]
    pub allow_public_read: bool,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub can_edit_library: bool,
}

/// Reference to a collection an entity belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRef {
    pub key: String,
    pub title: String,
}

/// Metadata for a single content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub id: String,
    pub block_type: String,
    pub display_name: String,
    #[serde(default)]
    pub published_display_name: Option<String>,
    #[serde(default)]
    pub last_published: Option<String>,
    #[serde(default)]
    pub published_by: Option<String>,
    #[serde(default)]
    pub last_draft_created: Option<String>,
    #[serde(default)]
    pub last_draft_created_by: Option<String>,
    #[serde(default)]
    pub has_unpublished_changes: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub tags_count: u64,
    #[serde(default)]
    pub collections: Vec<CollectionRef>,
}

/// Metadata for a container (unit, section, subsection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMeta {
    pub id: String,
    pub container_type: String,
    pub display_name: String,
    #[serde(default)]
    pub published_display_name: Option<String>,
    #[serde(default)]
    pub last_published: Option<String>,
    #[serde(default)]
    pub published_by: Option<String>,
    #[serde(default)]
    pub has_unpublished_changes: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub children_count: u64,
    #[serde(default)]
    pub tags_count: u64,
    #[serde(default)]
    pub collections: Vec<CollectionRef>,
}

/// Metadata for a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One row of the library content listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub id: String,
    pub title: String,
    pub kind: EntityKind,
}

/// Something that can produce metadata for a library's entities.
///
/// Implementations must be shareable with the fetch worker thread.
pub trait MetadataSource: Send + Sync {
    fn library(&self, library_key: &str) -> Result<LibraryMeta, MetadataError>;

    fn component(&self, usage_key: &str) -> Result<ComponentMeta, MetadataError>;

    fn container(&self, container_key: &str) -> Result<ContainerMeta, MetadataError>;

    fn collection(
        &self,
        library_key: &str,
        collection_key: &str,
    ) -> Result<CollectionMeta, MetadataError>;

    /// Everything listable in the library, in backend order.
    fn entries(&self, library_key: &str) -> Result<Vec<LibraryEntry>, MetadataError>;
}

/// Cache of every record fetched so far.
///
/// Records are only ever inserted on fetch success, so presence in the
/// store is what "metadata is ready" means to the rest of the crate.
#[derive(Debug, Default)]
pub struct MetadataStore {
    library: Option<LibraryMeta>,
    components: HashMap<String, ComponentMeta>,
    containers: HashMap<String, ContainerMeta>,
    collections: HashMap<String, CollectionMeta>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record for the given entity is already cached.
    pub fn has(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Component => self.components.contains_key(id),
            EntityKind::Unit | EntityKind::Section | EntityKind::Subsection => {
                self.containers.contains_key(id)
            }
            EntityKind::Collection => self.collections.contains_key(id),
        }
    }

    pub fn library(&self) -> Option<&LibraryMeta> {
        self.library.as_ref()
    }

    pub fn component(&self, usage_key: &str) -> Option<&ComponentMeta> {
        self.components.get(usage_key)
    }

    pub fn container(&self, container_key: &str) -> Option<&ContainerMeta> {
        self.containers.get(container_key)
    }

    pub fn collection(&self, collection_key: &str) -> Option<&CollectionMeta> {
        self.collections.get(collection_key)
    }

    pub fn insert_library(&mut self, meta: LibraryMeta) {
        self.library = Some(meta);
    }

    pub fn insert_component(&mut self, meta: ComponentMeta) {
        self.components.insert(meta.id.clone(), meta);
    }

    pub fn insert_container(&mut self, meta: ContainerMeta) {
        self.containers.insert(meta.id.clone(), meta);
    }

    pub fn insert_collection(&mut self, meta: CollectionMeta) {
        self.collections.insert(meta.key.clone(), meta);
    }
}

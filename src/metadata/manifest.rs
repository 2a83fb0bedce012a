//! Manifest-file metadata source
//!
//! A manifest is a single JSON document describing one library and all
//! of its entities. It serves the same records the HTTP backend would,
//! which makes it the offline backend: point `--manifest` at a file and
//! the whole application runs without a server. The file can be edited
//! while shelfview is running; the watcher triggers [`ManifestSource::reload`].

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{debug, warn};
use serde::Deserialize;

use crate::key::{classify, library_key_of};
use crate::metadata::{
    CollectionMeta, ComponentMeta, ContainerMeta, LibraryEntry, LibraryMeta, MetadataError,
    MetadataSource,
};

/// On-disk manifest document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    library: LibraryMeta,
    #[serde(default)]
    components: Vec<ComponentMeta>,
    #[serde(default)]
    containers: Vec<ContainerMeta>,
    #[serde(default)]
    collections: Vec<CollectionMeta>,
}

/// Metadata source backed by a manifest file
pub struct ManifestSource {
    path: PathBuf,
    inner: RwLock<Manifest>,
}

impl ManifestSource {
    /// Load a manifest from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MetadataError> {
        let path = path.into();
        let manifest = read_manifest(&path)?;
        Ok(ManifestSource {
            path,
            inner: RwLock::new(manifest),
        })
    }

    /// Library key the manifest describes.
    pub fn library_key(&self) -> String {
        self.read().library.id.clone()
    }

    /// Re-read the manifest from disk, replacing all records. A file
    /// that fails to parse leaves the previous contents in place.
    pub fn reload(&self) -> Result<(), MetadataError> {
        let manifest = read_manifest(&self.path)?;
        let mut guard = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = manifest;
        debug!("reloaded manifest from {}", self.path.display());
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Manifest> {
        match self.inner.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_manifest(path: &Path) -> Result<Manifest, MetadataError> {
    let content = std::fs::read_to_string(path).map_err(|e| MetadataError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|e| MetadataError::Decode(e.to_string()))?;

    // Flag entries that name a different library than the manifest claims
    for id in manifest
        .components
        .iter()
        .map(|c| c.id.as_str())
        .chain(manifest.containers.iter().map(|c| c.id.as_str()))
    {
        if let Some(lib) = library_key_of(id) {
            if lib != manifest.library.id {
                warn!(
                    "manifest {}: {} belongs to {}, manifest is for {}",
                    path.display(),
                    id,
                    lib,
                    manifest.library.id
                );
            }
        }
    }

    Ok(manifest)
}

impl MetadataSource for ManifestSource {
    fn library(&self, library_key: &str) -> Result<LibraryMeta, MetadataError> {
        let guard = self.read();
        if guard.library.id != library_key {
            debug!(
                "manifest serves {} but {} was requested",
                guard.library.id, library_key
            );
        }
        Ok(guard.library.clone())
    }

    fn component(&self, usage_key: &str) -> Result<ComponentMeta, MetadataError> {
        self.read()
            .components
            .iter()
            .find(|c| c.id == usage_key)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(usage_key.to_string()))
    }

    fn container(&self, container_key: &str) -> Result<ContainerMeta, MetadataError> {
        self.read()
            .containers
            .iter()
            .find(|c| c.id == container_key)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(container_key.to_string()))
    }

    fn collection(
        &self,
        _library_key: &str,
        collection_key: &str,
    ) -> Result<CollectionMeta, MetadataError> {
        self.read()
            .collections
            .iter()
            .find(|c| c.key == collection_key)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(collection_key.to_string()))
    }

    fn entries(&self, _library_key: &str) -> Result<Vec<LibraryEntry>, MetadataError> {
        let guard = self.read();
        let mut entries = Vec::new();

        for coll in &guard.collections {
            entries.push(LibraryEntry {
                id: coll.key.clone(),
                title: coll.title.clone(),
                kind: crate::key::EntityKind::Collection,
            });
        }
        for container in &guard.containers {
            match classify(&container.id) {
                Ok(kind) => entries.push(LibraryEntry {
                    id: container.id.clone(),
                    title: container.display_name.clone(),
                    kind,
                }),
                Err(e) => warn!("skipping manifest container {}: {}", container.id, e),
            }
        }
        for component in &guard.components {
            match classify(&component.id) {
                Ok(kind) => entries.push(LibraryEntry {
                    id: component.id.clone(),
                    title: component.display_name.clone(),
                    kind,
                }),
                Err(e) => warn!("skipping manifest component {}: {}", component.id, e),
            }
        }

        Ok(entries)
    }
}

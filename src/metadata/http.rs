//! HTTP metadata source
//!
//! Talks to the library authoring REST API. All calls are blocking and
//! run on the fetch worker thread, never on the UI thread.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::key::{classify, EntityKind};
use crate::metadata::{
    CollectionMeta, ComponentMeta, ContainerMeta, LibraryEntry, LibraryMeta, MetadataError,
    MetadataSource,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata source backed by the authoring REST API
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Build a source for the given base URL (scheme and host, e.g.
    /// `http://studio.local:8001`).
    pub fn new(base_url: &str) -> Result<Self, MetadataError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| MetadataError::Transport(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MetadataError::Transport(format!(
                "unsupported scheme in base URL: {base_url}"
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(format!("shelfview/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MetadataError::Transport(e.to_string()))?;

        Ok(HttpSource {
            base: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    // Entity keys never contain slashes, so splicing them into a path
    // is safe without further encoding.

    fn library_url(&self, library_key: &str) -> String {
        format!("{}/api/libraries/v2/{}/", self.base, library_key)
    }

    fn block_url(&self, usage_key: &str) -> String {
        format!("{}/api/libraries/v2/blocks/{}/", self.base, usage_key)
    }

    fn container_url(&self, container_key: &str) -> String {
        format!("{}/api/libraries/v2/containers/{}/", self.base, container_key)
    }

    fn collection_url(&self, library_key: &str, collection_key: &str) -> String {
        format!(
            "{}/api/libraries/v2/{}/collections/{}/",
            self.base, library_key, collection_key
        )
    }

    fn blocks_list_url(&self, library_key: &str) -> String {
        format!("{}/api/libraries/v2/{}/blocks/", self.base, library_key)
    }

    fn containers_list_url(&self, library_key: &str) -> String {
        format!("{}/api/libraries/v2/{}/containers/", self.base, library_key)
    }

    fn collections_list_url(&self, library_key: &str) -> String {
        format!("{}/api/libraries/v2/{}/collections/", self.base, library_key)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MetadataError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| MetadataError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(MetadataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .map_err(|e| MetadataError::Decode(e.to_string()))
    }
}

/// List endpoints answer either a bare array or a DRF-style page.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paginated { results } => results,
        }
    }
}

impl MetadataSource for HttpSource {
    fn library(&self, library_key: &str) -> Result<LibraryMeta, MetadataError> {
        self.get_json(&self.library_url(library_key))
    }

    fn component(&self, usage_key: &str) -> Result<ComponentMeta, MetadataError> {
        self.get_json(&self.block_url(usage_key))
    }

    fn container(&self, container_key: &str) -> Result<ContainerMeta, MetadataError> {
        self.get_json(&self.container_url(container_key))
    }

    fn collection(
        &self,
        library_key: &str,
        collection_key: &str,
    ) -> Result<CollectionMeta, MetadataError> {
        self.get_json(&self.collection_url(library_key, collection_key))
    }

    fn entries(&self, library_key: &str) -> Result<Vec<LibraryEntry>, MetadataError> {
        let collections: ListResponse<CollectionMeta> =
            self.get_json(&self.collections_list_url(library_key))?;
        let containers: ListResponse<ContainerMeta> =
            self.get_json(&self.containers_list_url(library_key))?;
        let components: ListResponse<ComponentMeta> =
            self.get_json(&self.blocks_list_url(library_key))?;

        let mut entries = Vec::new();
        for coll in collections.into_vec() {
            entries.push(LibraryEntry {
                id: coll.key,
                title: coll.title,
                kind: EntityKind::Collection,
            });
        }
        for container in containers.into_vec() {
            if let Ok(kind) = classify(&container.id) {
                entries.push(LibraryEntry {
                    id: container.id,
                    title: container.display_name,
                    kind,
                });
            }
        }
        for component in components.into_vec() {
            if let Ok(kind) = classify(&component.id) {
                entries.push(LibraryEntry {
                    id: component.id,
                    title: component.display_name,
                    kind,
                });
            }
        }
        Ok(entries)
    }
}

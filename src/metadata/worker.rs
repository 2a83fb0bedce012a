//! Background metadata fetching
//!
//! Fetches run on a dedicated worker thread so the event loop never
//! blocks on a slow backend. Requests carry a generation number bumped
//! on every navigation: the worker skips queued requests that a newer
//! generation has superseded, and the event loop discards completions
//! whose generation is behind the session's current one. Background
//! refreshes (library record, content listing) carry no generation and
//! are never skipped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use log::{debug, warn};

use crate::metadata::{
    CollectionMeta, ComponentMeta, ContainerMeta, LibraryEntry, LibraryMeta, MetadataError,
    MetadataSource,
};

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Library {
        library_key: String,
    },
    Entries {
        library_key: String,
    },
    Component {
        usage_key: String,
    },
    Container {
        container_key: String,
    },
    Collection {
        library_key: String,
        collection_key: String,
    },
}

impl FetchTarget {
    /// Short description for status messages and logs.
    pub fn describe(&self) -> String {
        match self {
            FetchTarget::Library { library_key } => format!("library {}", library_key),
            FetchTarget::Entries { .. } => "content list".to_string(),
            FetchTarget::Component { usage_key } => format!("component {}", usage_key),
            FetchTarget::Container { container_key } => format!("container {}", container_key),
            FetchTarget::Collection { collection_key, .. } => {
                format!("collection {}", collection_key)
            }
        }
    }
}

/// A queued fetch. `generation` is `None` for background refreshes that
/// navigation cannot supersede.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub generation: Option<u64>,
    pub target: FetchTarget,
}

/// Successful fetch result
#[derive(Debug, Clone)]
pub enum FetchPayload {
    Library(LibraryMeta),
    Entries(Vec<LibraryEntry>),
    Component(ComponentMeta),
    Container(ContainerMeta),
    Collection(CollectionMeta),
}

/// Outcome of one fetch, delivered back to the event loop
#[derive(Debug)]
pub struct FetchComplete {
    pub generation: Option<u64>,
    pub target: FetchTarget,
    pub result: Result<FetchPayload, MetadataError>,
}

/// Run one fetch synchronously against a source.
pub fn execute(
    source: &dyn MetadataSource,
    target: &FetchTarget,
) -> Result<FetchPayload, MetadataError> {
    match target {
        FetchTarget::Library { library_key } => {
            source.library(library_key).map(FetchPayload::Library)
        }
        FetchTarget::Entries { library_key } => {
            source.entries(library_key).map(FetchPayload::Entries)
        }
        FetchTarget::Component { usage_key } => {
            source.component(usage_key).map(FetchPayload::Component)
        }
        FetchTarget::Container { container_key } => {
            source.container(container_key).map(FetchPayload::Container)
        }
        FetchTarget::Collection {
            library_key,
            collection_key,
        } => source
            .collection(library_key, collection_key)
            .map(FetchPayload::Collection),
    }
}

/// Whether a queued request has been superseded.
fn is_stale(generation: Option<u64>, latest: u64) -> bool {
    matches!(generation, Some(g) if g < latest)
}

/// Handle to the fetch worker thread.
///
/// Dropping the handle closes the request channel and lets the thread
/// exit on its own.
pub struct FetchWorker {
    request_tx: Sender<FetchRequest>,
    complete_rx: Receiver<FetchComplete>,
    latest: Arc<AtomicU64>,
    _handle: thread::JoinHandle<()>,
}

impl FetchWorker {
    /// Spawn the worker thread over a shared source.
    pub fn spawn(source: Arc<dyn MetadataSource>) -> FetchWorker {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (complete_tx, complete_rx) = mpsc::channel::<FetchComplete>();
        let latest = Arc::new(AtomicU64::new(0));
        let latest_for_worker = Arc::clone(&latest);

        let handle = thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                if is_stale(request.generation, latest_for_worker.load(Ordering::Relaxed)) {
                    debug!("skipping superseded fetch: {}", request.target.describe());
                    continue;
                }
                let result = execute(source.as_ref(), &request.target);
                let complete = FetchComplete {
                    generation: request.generation,
                    target: request.target,
                    result,
                };
                if complete_tx.send(complete).is_err() {
                    break;
                }
            }
        });

        FetchWorker {
            request_tx,
            complete_rx,
            latest,
            _handle: handle,
        }
    }

    /// Queue a fetch. Generational requests advance the supersession
    /// watermark so older queued requests get skipped.
    pub fn submit(&self, request: FetchRequest) {
        if let Some(generation) = request.generation {
            self.latest.fetch_max(generation, Ordering::Relaxed);
        }
        if self.request_tx.send(request).is_err() {
            warn!("fetch worker is gone; dropping request");
        }
    }

    /// Non-blocking check for a finished fetch.
    pub fn poll(&self) -> Option<FetchComplete> {
        self.complete_rx.try_recv().ok()
    }
}

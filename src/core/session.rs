//! Navigation session: the sidebar state machine
//!
//! A [`Session`] owns the current [`Location`], the open sidebar panel
//! and the metadata cache, and runs the transitions between them.
//!
//! Route handling is one-way: the route is an input that the session
//! derives panel state from ([`Session::sync_route`]); opening or
//! closing panels never rewrites the path. The two pieces of sidebar
//! state that deep links must carry, selected tab (`st`) and pending
//! action (`sa`), live in the query string and are re-read from it on
//! every access.
//!
//! Opening an info panel is gated on metadata: if the entity's record
//! is not cached yet the session parks the panel as pending, emits a
//! fetch request and commits only when the matching completion arrives.
//! Every transition bumps a generation counter, and completions behind
//! the current generation are discarded, so a slow fetch can never
//! clobber a newer panel.

use log::{debug, warn};

use crate::core::panel::{PanelKind, SidebarAction, SidebarPanel};
use crate::core::tabs::{resolve_tab, tabs_for, DefaultTabs, SidebarTab};
use crate::key::{classify, EntityKind};
use crate::link::Location;
use crate::metadata::worker::{FetchComplete, FetchPayload, FetchRequest, FetchTarget};
use crate::metadata::{LibraryEntry, MetadataStore};

/// Query parameter carrying the selected sidebar tab
pub const TAB_PARAM: &str = "st";

/// Query parameter carrying the pending sidebar action
pub const ACTION_PARAM: &str = "sa";

/// Construction options for a [`Session`]
#[derive(Debug, Default)]
pub struct SessionOptions {
    pub defaults: DefaultTabs,
    /// Picker mode: route derivation is suppressed and management tabs
    /// are hidden
    pub picker: bool,
    /// Force a panel open at startup. Also suppresses route derivation
    /// for the life of the session.
    pub initial_panel: Option<SidebarPanel>,
}

/// A gated open waiting for its metadata fetch
#[derive(Debug)]
struct PendingOpen {
    panel: SidebarPanel,
    generation: u64,
}

/// What a delivered fetch completion amounted to
#[derive(Debug)]
pub enum FetchOutcome {
    /// A pending panel was committed
    Committed(PanelKind),
    /// The content listing was refreshed
    Entries(Vec<LibraryEntry>),
    /// A record was cached with no panel waiting on it
    Background,
    /// Superseded or irrelevant; nothing changed
    Discarded,
    /// The fetch failed; message for the status bar
    Failed(String),
}

pub struct Session {
    location: Location,
    panel: SidebarPanel,
    pending: Option<PendingOpen>,
    defaults: DefaultTabs,
    hidden_tabs: Vec<SidebarTab>,
    picker: bool,
    derivation_suppressed: bool,
    generation: u64,
    store: MetadataStore,
    outbox: Vec<FetchRequest>,
}

impl Session {
    pub fn new(location: Location, options: SessionOptions) -> Session {
        let hidden_tabs = if options.picker {
            vec![SidebarTab::Manage, SidebarTab::Details]
        } else {
            Vec::new()
        };
        let derivation_suppressed = options.initial_panel.is_some();
        let panel = options.initial_panel.unwrap_or_default();

        Session {
            location,
            panel,
            pending: None,
            defaults: options.defaults,
            hidden_tabs,
            picker: options.picker,
            derivation_suppressed,
            generation: 0,
            store: MetadataStore::new(),
            outbox: Vec::new(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn library_key(&self) -> &str {
        self.location.library_key()
    }

    pub fn panel(&self) -> &SidebarPanel {
        &self.panel
    }

    /// Panel parked behind an in-flight metadata fetch, if any.
    pub fn pending_panel(&self) -> Option<&SidebarPanel> {
        self.pending.as_ref().map(|p| &p.panel)
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MetadataStore {
        &mut self.store
    }

    pub fn picker(&self) -> bool {
        self.picker
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hidden_tabs(&self) -> &[SidebarTab] {
        &self.hidden_tabs
    }

    pub fn set_hidden_tabs(&mut self, tabs: Vec<SidebarTab>) {
        self.hidden_tabs = tabs;
    }

    /// Fetch requests produced since the last drain. The event loop
    /// forwards these to the worker.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Route handling
    // ------------------------------------------------------------------

    /// Derive the sidebar panel from the current route.
    ///
    /// Precedence: a selected entity wins over a collection scope,
    /// which wins over a unit scope; a bare library route opens the
    /// library info panel. Suppressed entirely in picker mode and for
    /// sessions constructed with a forced initial panel.
    pub fn sync_route(&mut self) {
        if self.derivation_suppressed {
            return;
        }
        if self.picker {
            return;
        }

        if let Some(id) = self.location.selected_id().map(str::to_string) {
            match classify(&id) {
                Ok(EntityKind::Section) | Ok(EntityKind::Subsection) => {
                    // No routes select these yet; leave the panel alone
                    debug!("selected container {} has no panel route", id);
                }
                Ok(kind) => self.open_entity_panel(kind, &id),
                Err(e) => warn!("cannot derive panel for selected id {:?}: {}", id, e),
            }
        } else if let Some(key) = self.location.collection_key().map(str::to_string) {
            self.open_collection_info(&key);
        } else if let Some(key) = self.location.unit_key().map(str::to_string) {
            self.open_unit_info(&key);
        } else {
            self.open_library_info();
        }
    }

    /// Replace the route. Derivation re-runs only when the entity
    /// context (selected id or scope) actually changed, so rewriting
    /// query parameters never re-derives the panel.
    pub fn navigate(&mut self, location: Location) {
        let changed = entity_context(&self.location) != entity_context(&location);
        self.location = location;
        if changed {
            self.sync_route();
        }
    }

    /// Select an entity: point the route at it and open its info panel.
    pub fn select(&mut self, id: &str) {
        match classify(id) {
            Ok(kind) => {
                self.location.set_selected(Some(id));
                self.open_entity_panel(kind, id);
            }
            Err(e) => warn!("refusing to select {:?}: {}", id, e),
        }
    }

    // ------------------------------------------------------------------
    // Panel transitions
    // ------------------------------------------------------------------

    pub fn open_add_content(&mut self) {
        self.bump();
        self.commit(SidebarPanel::AddContent);
    }

    pub fn open_library_info(&mut self) {
        self.bump();
        self.commit(SidebarPanel::LibraryInfo);
    }

    pub fn open_component_info(&mut self, usage_key: &str) {
        self.open_entity_panel(EntityKind::Component, usage_key);
    }

    pub fn open_collection_info(&mut self, collection_key: &str) {
        self.open_entity_panel(EntityKind::Collection, collection_key);
    }

    pub fn open_unit_info(&mut self, container_key: &str) {
        self.open_entity_panel(EntityKind::Unit, container_key);
    }

    pub fn open_section_info(&mut self, container_key: &str) {
        self.open_entity_panel(EntityKind::Section, container_key);
    }

    pub fn open_subsection_info(&mut self, container_key: &str) {
        self.open_entity_panel(EntityKind::Subsection, container_key);
    }

    /// Close the sidebar. The route keeps its selection; closing and
    /// re-running derivation on an unchanged route will not reopen.
    pub fn close(&mut self) {
        self.bump();
        self.pending = None;
        self.panel = SidebarPanel::Closed;
    }

    /// Open the info panel for an entity, gated on its metadata being
    /// cached. A cache hit commits immediately; otherwise the panel is
    /// parked and a fetch request queued under the new generation.
    fn open_entity_panel(&mut self, kind: EntityKind, id: &str) {
        self.bump();
        let panel = SidebarPanel::for_entity(kind, id);

        if self.store.has(kind, id) {
            self.commit(panel);
            return;
        }

        let target = match kind {
            EntityKind::Component => FetchTarget::Component {
                usage_key: id.to_string(),
            },
            EntityKind::Unit | EntityKind::Section | EntityKind::Subsection => {
                FetchTarget::Container {
                    container_key: id.to_string(),
                }
            }
            EntityKind::Collection => FetchTarget::Collection {
                library_key: self.location.library_key().to_string(),
                collection_key: id.to_string(),
            },
        };

        self.pending = Some(PendingOpen {
            panel,
            generation: self.generation,
        });
        self.outbox.push(FetchRequest {
            generation: Some(self.generation),
            target,
        });
    }

    fn commit(&mut self, panel: SidebarPanel) {
        self.pending = None;
        if self.panel != panel {
            debug!("sidebar: {:?} -> {:?}", self.panel.kind(), panel.kind());
        }
        self.panel = panel;
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    // ------------------------------------------------------------------
    // Fetch completions
    // ------------------------------------------------------------------

    /// Absorb a finished fetch. Stale completions (behind the current
    /// generation) are dropped wholesale; a failure belonging to the
    /// pending open clears it and reports, leaving the previous panel
    /// in place.
    pub fn on_fetch_complete(&mut self, complete: FetchComplete) -> FetchOutcome {
        if matches!(complete.generation, Some(g) if g < self.generation) {
            debug!("discarding stale fetch of {}", complete.target.describe());
            return FetchOutcome::Discarded;
        }

        match complete.result {
            Ok(payload) => {
                match payload {
                    FetchPayload::Entries(entries) => return FetchOutcome::Entries(entries),
                    FetchPayload::Library(meta) => {
                        self.store.insert_library(meta);
                        return FetchOutcome::Background;
                    }
                    FetchPayload::Component(meta) => self.store.insert_component(meta),
                    FetchPayload::Container(meta) => self.store.insert_container(meta),
                    FetchPayload::Collection(meta) => self.store.insert_collection(meta),
                }
                let matches_pending = self
                    .pending
                    .as_ref()
                    .is_some_and(|p| complete.generation == Some(p.generation));
                if matches_pending {
                    if let Some(pending) = self.pending.take() {
                        let kind = pending.panel.kind();
                        self.commit(pending.panel);
                        return FetchOutcome::Committed(kind);
                    }
                }
                FetchOutcome::Background
            }
            Err(e) => {
                let matches_pending = self
                    .pending
                    .as_ref()
                    .is_some_and(|p| complete.generation == Some(p.generation));
                if matches_pending {
                    self.pending = None;
                    return FetchOutcome::Failed(format!(
                        "Could not load {}: {}",
                        complete.target.describe(),
                        e
                    ));
                }
                if complete.generation.is_none() {
                    return FetchOutcome::Failed(format!(
                        "Could not load {}: {}",
                        complete.target.describe(),
                        e
                    ));
                }
                FetchOutcome::Discarded
            }
        }
    }

    // ------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------

    /// The tab the open panel is showing, resolved from the `st`
    /// parameter against the panel's tab set. `None` for panels without
    /// tabs.
    pub fn current_tab(&self) -> Option<SidebarTab> {
        let requested = self.location.param(TAB_PARAM, SidebarTab::parse);
        resolve_tab(&self.defaults, self.panel.kind(), requested, &self.hidden_tabs)
    }

    /// Tabs the open panel offers, minus hidden ones, in display order.
    pub fn visible_tabs(&self) -> Vec<SidebarTab> {
        tabs_for(self.panel.kind())
            .iter()
            .filter(|t| !self.hidden_tabs.contains(t))
            .copied()
            .collect()
    }

    /// Switch the open panel to a tab. Tabs the panel does not offer
    /// (or that are hidden) are ignored. The `st` parameter is removed
    /// when the written value equals the component default, matching
    /// the codec fallback used at read time.
    pub fn set_tab(&mut self, tab: SidebarTab) {
        if !self.visible_tabs().contains(&tab) {
            debug!(
                "ignoring tab {:?} for {:?} panel",
                tab,
                self.panel.kind()
            );
            return;
        }
        self.location
            .set_param(TAB_PARAM, tab, self.defaults.component, |t| {
                t.as_str().to_string()
            });
    }

    /// Cycle through the visible tabs of the open panel.
    pub fn cycle_tab(&mut self, forward: bool) {
        let visible = self.visible_tabs();
        if visible.is_empty() {
            return;
        }
        let current = self.current_tab();
        let pos = current.and_then(|c| visible.iter().position(|t| *t == c));
        let next = match pos {
            Some(i) if forward => visible[(i + 1) % visible.len()],
            Some(i) => visible[(i + visible.len() - 1) % visible.len()],
            None => visible[0],
        };
        self.set_tab(next);
    }

    // ------------------------------------------------------------------
    // Pending actions
    // ------------------------------------------------------------------

    /// The pending one-shot action carried in the `sa` parameter.
    /// Unknown wire values read as none.
    pub fn sidebar_action(&self) -> SidebarAction {
        self.location
            .param(ACTION_PARAM, SidebarAction::parse)
            .unwrap_or_default()
    }

    pub fn set_sidebar_action(&mut self, action: SidebarAction) {
        self.location
            .set_param(ACTION_PARAM, action, SidebarAction::None, |a| {
                a.as_str().to_string()
            });
    }

    pub fn reset_sidebar_action(&mut self) {
        self.set_sidebar_action(SidebarAction::None);
    }

    /// Consume the pending action if the open panel can handle it.
    /// Returns the consumed action once; panels that cannot handle the
    /// action leave it set for a later panel.
    pub fn apply_pending_action(&mut self) -> Option<SidebarAction> {
        let action = self.sidebar_action();
        if action.applies_to(self.panel.kind()) {
            self.reset_sidebar_action();
            Some(action)
        } else {
            None
        }
    }
}

/// The parts of a route that drive panel derivation.
fn entity_context(location: &Location) -> (Option<&str>, Option<&str>, Option<&str>) {
    (
        location.selected_id(),
        location.collection_key(),
        location.unit_key(),
    )
}

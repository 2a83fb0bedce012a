//! Main event loop for the application

use std::io::Stdout;
use std::sync::Arc;

use crossterm::event::{self, Event};
use ratatui::prelude::*;

use crate::app::Config;
use crate::core::{
    AppState, FetchOutcome, Session, SessionOptions, SidebarAction, SidebarTab, ViewMode,
};
use crate::handler::{
    handle_action, handle_key_event, update_search_query, ActionContext, ActionResult, KeyAction,
};
use crate::integrate::exit_code;
use crate::link::Location;
use crate::metadata::http::HttpSource;
use crate::metadata::manifest::ManifestSource;
use crate::metadata::worker::{FetchRequest, FetchTarget, FetchWorker};
use crate::metadata::MetadataSource;
use crate::render::{entry_matches, visible_height, EntryMatch};
use crate::watch::ManifestWatcher;

use super::render::{render_frame, RenderContext};

/// Result of running the app
pub struct AppResult {
    pub exit_code: i32,
}

/// Reload the manifest (if any) and queue ungated refreshes of the
/// library record and listing. Returns false when the reload failed, in
/// which case the previous contents stay served and a message is set.
fn refresh_backend(
    manifest: Option<&ManifestSource>,
    worker: &FetchWorker,
    library_key: &str,
    state: &mut AppState,
) -> bool {
    if let Some(manifest) = manifest {
        if let Err(e) = manifest.reload() {
            state.set_message(format!("Reload failed: {}", e));
            return false;
        }
    }
    worker.submit(FetchRequest {
        generation: None,
        target: FetchTarget::Library {
            library_key: library_key.to_string(),
        },
    });
    worker.submit(FetchRequest {
        generation: None,
        target: FetchTarget::Entries {
            library_key: library_key.to_string(),
        },
    });
    true
}

/// Main event loop
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: Config,
) -> anyhow::Result<AppResult> {
    // Backend: a local manifest when given, the HTTP API otherwise
    let manifest = match &config.manifest {
        Some(path) => Some(Arc::new(ManifestSource::load(path)?)),
        None => None,
    };
    let source: Arc<dyn MetadataSource> = match &manifest {
        Some(m) => Arc::clone(m) as Arc<dyn MetadataSource>,
        None => Arc::new(HttpSource::new(&config.base_url)?),
    };

    // Starting route: --link, or the manifest's library home
    let location = match config.link.clone() {
        Some(location) => location,
        None => match &manifest {
            Some(m) => Location::library(m.library_key()),
            None => anyhow::bail!("--link is required unless --manifest provides a library"),
        },
    };

    let mut session = Session::new(
        location,
        SessionOptions {
            defaults: config.defaults,
            picker: config.pick_mode,
            initial_panel: None,
        },
    );
    session.sync_route();

    let mut state = AppState::new();
    if config.pick_mode {
        state.set_message(format!(
            "Pick mode: Space marks {}, Enter confirms",
            config.pick_target.describe()
        ));
    }

    // Create action context from config
    let action_context = ActionContext {
        pick_target: config.pick_target,
        output_format: config.output_format,
    };

    let library_key = session.library_key().to_string();
    let worker = FetchWorker::spawn(Arc::clone(&source));

    // Warm the library record and the listing
    worker.submit(FetchRequest {
        generation: None,
        target: FetchTarget::Library {
            library_key: library_key.clone(),
        },
    });
    worker.submit(FetchRequest {
        generation: None,
        target: FetchTarget::Entries {
            library_key: library_key.clone(),
        },
    });

    // Watch the manifest for edits (HTTP mode has nothing to watch)
    let watcher = config.manifest.as_ref().and_then(|path| {
        match ManifestWatcher::new(path) {
            Ok(watcher) => {
                state.watch_enabled = true;
                Some(watcher)
            }
            Err(_) => {
                // Watcher initialization failed, continue without watching
                None
            }
        }
    });

    loop {
        // Forward fetch requests queued by navigation
        for request in session.take_requests() {
            worker.submit(request);
        }

        // Absorb finished fetches
        while let Some(complete) = worker.poll() {
            match session.on_fetch_complete(complete) {
                FetchOutcome::Entries(entries) => state.set_entries(entries),
                FetchOutcome::Failed(message) => state.set_message(message),
                FetchOutcome::Committed(_)
                | FetchOutcome::Background
                | FetchOutcome::Discarded => {}
            }
        }

        // Consume the pending one-shot action once the showing panel
        // can handle it
        if let Some(action) = session.apply_pending_action() {
            state.panel_focus = action.section();
            if matches!(
                action,
                SidebarAction::JumpToManageCollections | SidebarAction::JumpToManageTags
            ) {
                // The collections and tags sections live on the manage tab
                session.set_tab(SidebarTab::Manage);
            }
        }

        // Adjust viewport before rendering
        let term_size = terminal.size()?;
        let vis_height = visible_height(Rect {
            x: 0,
            y: 0,
            width: term_size.width,
            height: term_size.height.saturating_sub(3),
        });
        state.adjust_viewport(vis_height);

        // Search results shown in the popup this frame
        let search_matches: Vec<EntryMatch> = match &state.mode {
            ViewMode::Search { query } => entry_matches(query, &state.entries),
            _ => Vec::new(),
        };

        let render_context = RenderContext {
            state: &state,
            session: &session,
            search_matches: &search_matches,
        };
        terminal.draw(|frame| render_frame(frame, render_context))?;

        // Auto-refresh when the manifest file changes on disk
        if let Some(watcher) = &watcher {
            if watcher.poll()
                && refresh_backend(manifest.as_deref(), &worker, &library_key, &mut state)
            {
                state.set_message("Manifest reloaded");
            }
        }

        // Handle events (poll timeout balances responsiveness and CPU usage)
        if event::poll(config.poll_interval)? {
            if let Event::Key(key) = event::read()? {
                // Handle search input first
                if let ViewMode::Search { query } = &state.mode {
                    if let Some(new_query) = update_search_query(key, query) {
                        state.mode = ViewMode::Search { query: new_query };
                        // Reset selection on query change
                        state.search_selected = 0;
                        continue;
                    }
                }

                let mut action = handle_key_event(&state, key);

                // Fill in the actual id for SearchConfirm
                if matches!(action, KeyAction::SearchConfirm { .. }) {
                    let bounded = state
                        .search_selected
                        .min(search_matches.len().saturating_sub(1));
                    if let Some(result) = search_matches.get(bounded) {
                        action = KeyAction::SearchConfirm {
                            id: result.id.clone(),
                        };
                    }
                }

                // Refresh needs the backend handles, so it is handled here
                if matches!(action, KeyAction::Refresh) {
                    if refresh_backend(manifest.as_deref(), &worker, &library_key, &mut state) {
                        state.set_message("Refreshing...");
                    }
                    continue;
                }

                match handle_action(action, &mut state, &mut session, &action_context)? {
                    ActionResult::Continue => {}
                    ActionResult::Quit(code) => {
                        return Ok(AppResult { exit_code: code });
                    }
                }

                // Clamp search selection to the result count
                if matches!(state.mode, ViewMode::Search { .. }) {
                    if search_matches.is_empty() {
                        state.search_selected = 0;
                    } else {
                        state.search_selected = state.search_selected.min(search_matches.len() - 1);
                    }
                }
            }
        }

        if state.should_quit {
            return Ok(AppResult {
                exit_code: exit_code::SUCCESS,
            });
        }
    }
}

//! Non-interactive inspection modes (--resolve, --print-state)
//!
//! Both write plain `key: value` lines to stdout so shell scripts can
//! grep them, and reuse the exact classification and derivation code
//! the interactive view runs.

use std::io::{self, Write};
use std::path::Path;

use crate::core::{DefaultTabs, Session, SessionOptions};
use crate::integrate::pick::exit_code;
use crate::key::{block_type_of, classify, library_key_of, EntityKind};
use crate::link::Location;
use crate::metadata::manifest::ManifestSource;
use crate::metadata::worker::execute;
use crate::metadata::MetadataSource;

/// Classify an identifier and print what it is.
pub fn output_resolve(out: &mut impl Write, id: &str) -> io::Result<i32> {
    match classify(id) {
        Ok(kind) => {
            writeln!(out, "id: {}", id)?;
            writeln!(out, "kind: {}", kind.display_name())?;
            if kind == EntityKind::Component {
                if let Some(block_type) = block_type_of(id) {
                    writeln!(out, "blockType: {}", block_type)?;
                }
            }
            if let Some(library) = library_key_of(id) {
                writeln!(out, "library: {}", library)?;
            }
            Ok(exit_code::SUCCESS)
        }
        Err(e) => {
            writeln!(out, "id: {}", id)?;
            writeln!(out, "error: {}", e)?;
            Ok(exit_code::ERROR)
        }
    }
}

/// Derive sidebar state for a deep link and print it.
///
/// With a manifest, gated opens resolve against it synchronously so the
/// printed panel is the committed one; without, a gated open is
/// reported as pending.
pub fn output_state(
    out: &mut impl Write,
    link: &str,
    manifest: Option<&Path>,
    defaults: DefaultTabs,
) -> io::Result<i32> {
    let location = match Location::parse(link) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(exit_code::INVALID);
        }
    };

    let source = match manifest {
        Some(path) => match ManifestSource::load(path) {
            Ok(s) => Some(s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(exit_code::ERROR);
            }
        },
        None => None,
    };

    let mut session = Session::new(
        location,
        SessionOptions {
            defaults,
            ..Default::default()
        },
    );
    session.sync_route();

    if let Some(source) = &source {
        settle(&mut session, source);
    }

    writeln!(out, "link: {}", session.location())?;
    writeln!(out, "panel: {}", session.panel().kind().wire_name())?;
    if let Some(target) = session.panel().target_id() {
        writeln!(out, "target: {}", target)?;
    }
    match session.current_tab() {
        Some(tab) => writeln!(out, "tab: {}", tab.as_str())?,
        None => writeln!(out, "tab: (none)")?,
    }
    let action = session.sidebar_action();
    if action.as_str().is_empty() {
        writeln!(out, "action: (none)")?;
    } else {
        writeln!(out, "action: {}", action.as_str())?;
    }
    if let Some(pending) = session.pending_panel() {
        writeln!(out, "pending: {}", pending.kind().wire_name())?;
        if let Some(target) = pending.target_id() {
            writeln!(out, "pendingTarget: {}", target)?;
        }
    }

    Ok(exit_code::SUCCESS)
}

/// Run the session's queued fetches to completion against a source.
fn settle(session: &mut Session, source: &dyn MetadataSource) {
    // A commit never queues further fetches, but drain in a loop anyway
    for _ in 0..8 {
        let requests = session.take_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            let result = execute(source, &request.target);
            session.on_fetch_complete(crate::metadata::worker::FetchComplete {
                generation: request.generation,
                target: request.target,
                result,
            });
        }
    }
}

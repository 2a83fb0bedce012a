//! Application configuration from CLI arguments

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::config_file::ConfigFile;
use crate::core::DefaultTabs;
use crate::integrate::{exit_code, OutputFormat, PickTarget};
use crate::link::Location;

/// Application configuration from CLI args and config file
pub struct Config {
    /// Starting route. `None` falls back to the manifest's library home.
    pub link: Option<Location>,
    /// Local manifest file serving metadata instead of the HTTP API
    pub manifest: Option<PathBuf>,
    /// Base URL of the authoring API (from config file, CLI override)
    pub base_url: String,
    pub pick_mode: bool,
    /// Which entity kinds are pickable
    pub pick_target: PickTarget,
    pub output_format: OutputFormat,
    /// Per-panel default tabs (from config file)
    pub defaults: DefaultTabs,
    /// Event poll interval (from config file)
    pub poll_interval: Duration,
    /// Classify an identifier and exit (non-interactive)
    pub resolve: Option<String>,
    /// Print derived sidebar state for the link and exit (non-interactive)
    pub print_state: bool,
}

impl Config {
    pub fn from_args() -> anyhow::Result<Self> {
        // Load config file first (provides defaults)
        let config_file = ConfigFile::load();

        let mut args = env::args().skip(1).peekable();
        let mut link: Option<Location> = None;
        let mut manifest: Option<PathBuf> = None;
        let mut base_url: Option<String> = None;
        let mut pick_mode = false;
        let mut pick_target = PickTarget::default();
        let mut output_format = OutputFormat::default();
        let mut resolve: Option<String> = None;
        let mut print_state = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--link" | "-l" => {
                    if let Some(raw) = args.next() {
                        link = Some(parse_link(&raw)?);
                    } else {
                        anyhow::bail!("--link requires a route");
                    }
                }
                "--manifest" | "-m" => {
                    if let Some(path) = args.next() {
                        let p = PathBuf::from(&path);
                        if !p.is_file() {
                            anyhow::bail!("Manifest file does not exist: {}", path);
                        }
                        manifest = Some(p);
                    } else {
                        anyhow::bail!("--manifest requires a file path");
                    }
                }
                "--base-url" => {
                    if let Some(url) = args.next() {
                        base_url = Some(url);
                    } else {
                        anyhow::bail!("--base-url requires a URL");
                    }
                }
                "--pick" | "-p" => {
                    pick_mode = true;
                    // Check if next arg is a pick target (not a flag or a link)
                    if let Some(next) = args.peek() {
                        if !next.starts_with('-') && !next.starts_with('/') {
                            let target = args.next().unwrap();
                            pick_target = PickTarget::from_str(&target).map_err(|_| {
                                anyhow::anyhow!(
                                    "Invalid pick target '{}'. Valid targets: components, collections, all",
                                    target
                                )
                            })?;
                        }
                    }
                }
                "--format" | "-f" => {
                    if let Some(fmt) = args.next() {
                        output_format = OutputFormat::from_str(&fmt).map_err(|_| {
                            anyhow::anyhow!(
                                "Invalid format '{}'. Valid formats: lines, null, json",
                                fmt
                            )
                        })?;
                    } else {
                        anyhow::bail!("--format requires a value (lines, null, or json)");
                    }
                }
                "--resolve" => {
                    if let Some(id) = args.next() {
                        resolve = Some(id);
                    } else {
                        anyhow::bail!("--resolve requires an identifier");
                    }
                }
                "--print-state" => print_state = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(exit_code::SUCCESS);
                }
                "--version" | "-V" => {
                    println!("shv {}", env!("CARGO_PKG_VERSION"));
                    std::process::exit(exit_code::SUCCESS);
                }
                route if route.starts_with('/') => {
                    link = Some(parse_link(route)?);
                }
                unknown => {
                    anyhow::bail!(
                        "Unknown option: {}. Use --help for usage information.",
                        unknown
                    );
                }
            }
        }

        Ok(Self {
            link,
            manifest,
            pick_mode,
            pick_target,
            output_format,
            resolve,
            print_state,
            // Settings from config file (CLI can override some)
            base_url: base_url.unwrap_or(config_file.general.base_url),
            defaults: config_file.sidebar.default_tabs(),
            poll_interval: Duration::from_millis(config_file.performance.poll_interval_ms),
        })
    }
}

fn parse_link(raw: &str) -> anyhow::Result<Location> {
    Location::parse(raw).map_err(|e| anyhow::anyhow!("Invalid link '{}': {}", raw, e))
}

fn print_help() {
    println!(
        r#"shv - ShelfView: a terminal sidebar for content libraries

USAGE:
    shv [OPTIONS] [LINK]

ARGS:
    LINK                Deep link to start at, e.g. /library/lib:org1:demo

OPTIONS:
    -l, --link ROUTE    Deep link to start at (same as the positional LINK)
    -m, --manifest FILE Serve metadata from a local JSON manifest
    --base-url URL      Authoring API base URL (overrides the config file)
    -p, --pick [KIND]   Pick mode: output selected id(s) to stdout
                        KIND: components (default), collections, all
    -f, --format FMT    Output format for pick mode: lines, null, json
    --resolve ID        Classify an identifier, print what it is, and exit
    --print-state       Print the sidebar state derived from --link and exit
    -h, --help          Show this help message
    -V, --version       Show version

CONFIG FILE:
    ~/.config/shelfview/config.toml

KEYBINDINGS:
    j/↓         Move down
    k/↑         Move up
    g           Go to top
    G           Go to bottom
    Enter       Open info for the focused entry (or confirm in pick mode)
    Space       Toggle mark (pick mode)
    a           Open the add-content panel
    i           Open the library info panel
    x           Close the sidebar
    Tab         Next sidebar tab
    Shift+Tab   Previous sidebar tab
    1-4         Jump to sidebar tab by position
    C           Jump to manage collections
    T           Jump to manage tags
    M           Manage team (library info)
    /           Search entries
    y           Copy deep link to clipboard
    r           Refresh from the backend
    q/Esc       Quit (or cancel in pick mode)
    ?           Show help

EXIT CODES:
    0           Success (normal exit or entity selected)
    1           Cancelled (user cancelled selection in pick mode)
    2           Error (runtime error)
    3           Invalid arguments (unknown option or invalid value)

EXAMPLES:
    shv /library/lib:org1:demo
    shv --manifest demo.json
    shv --manifest demo.json --pick collections --format json
    shv --resolve lb:org1:demo:html:abc123
    shv --link "/library/lib:org1:demo?st=manage" --print-state
"#
    );
}

//! ShelfView - A terminal navigator for content-library authoring

use std::io::{self, stdout};
use std::process::ExitCode;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use shelfview::app::{run_app, Config};
use shelfview::integrate::{exit_code, output_resolve, output_state};

fn main() -> ExitCode {
    env_logger::init();

    // Parse config first to return INVALID exit code for argument errors
    let config = match Config::from_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(exit_code::INVALID as u8);
        }
    };

    // Handle non-interactive modes first
    if let Some(ref id) = config.resolve {
        return run_resolve_mode(id);
    }

    if config.print_state {
        return run_print_state_mode(&config);
    }

    match run_with_config(config) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

/// Classify an identifier and exit (non-interactive)
fn run_resolve_mode(id: &str) -> ExitCode {
    match output_resolve(&mut io::stdout(), id) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

/// Print the sidebar state derived from the link and exit
fn run_print_state_mode(config: &Config) -> ExitCode {
    let Some(ref link) = config.link else {
        eprintln!("Error: --print-state requires --link");
        return ExitCode::from(exit_code::INVALID as u8);
    };
    let result = output_state(
        &mut io::stdout(),
        &link.to_string(),
        config.manifest.as_deref(),
        config.defaults,
    );
    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

fn run_with_config(config: Config) -> anyhow::Result<i32> {
    // Initialize terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    result.map(|app_result| app_result.exit_code)
}

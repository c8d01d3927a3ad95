//! `eva` entry point.
//!
//! # Responsibility
//! - Resolve config, start logging, open the store and run the menu.
//! - Own the process exit status: interrupts and closed input exit 0,
//!   startup and terminal failures exit 1.

mod config;
mod menu;
mod prompt;
mod render;
mod workflow;

use crate::config::AppConfig;
use crate::prompt::{CancelToken, TerminalPrompter};
use crate::workflow::Workflows;
use eva_core::db::open_db;
use eva_core::{init_logging, EntryService, SqliteEntryRepository};
use log::{error, info, warn};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let _ = render::failure(&mut stdout, &format!("Configuration error: {err}"));
            return ExitCode::from(1);
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            let _ = render::warning(&mut stdout, &format!("Logging disabled: {err}"));
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            let _ = render::failure(&mut stdout, &format!("Database error: {err}"));
            return ExitCode::from(1);
        }
    };

    let cancel = CancelToken::new();
    if let Err(err) = cancel.install_signal_handler() {
        warn!("event=signal_handler module=cli status=error error={err}");
    }

    let mut prompter = TerminalPrompter::new(cancel);
    let mut rng = rand::thread_rng();
    let mut workflows = Workflows::new(
        EntryService::new(SqliteEntryRepository::new(&conn)),
        &mut prompter,
        &mut stdout,
        &mut rng,
    );

    match workflows.service().count_entries() {
        Ok(count) => info!("event=session_start module=cli status=ok entries={count}"),
        Err(err) => warn!("event=session_start module=cli status=error error={err}"),
    }

    let result = menu::run_menu(&mut workflows);
    drop(workflows);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.ends_session() => {
            info!("event=session_end module=cli status=ok reason={err}");
            let _ = render::success(&mut stdout, "\nGoodbye!");
            let _ = stdout.flush();
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            let _ = render::failure(&mut stdout, &format!("Terminal error: {err}"));
            ExitCode::from(1)
        }
    }
}

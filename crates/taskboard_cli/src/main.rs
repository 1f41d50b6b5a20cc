//! Database setup and diagnostics entry point.
//!
//! # Responsibility
//! - Create or migrate the configured database.
//! - Print version and per-table record counts for quick local checks.
//!
//! # Invariants
//! - Any setup failure is reported on stderr with a non-zero exit code.

use log::{error, info};
use std::process::ExitCode;
use taskboard_core::{core_version, init_logging, open_db, store_counts, CoreConfig};

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("taskboard: logging init failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=setup module=cli status=error");
            eprintln!("taskboard: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), String> {
    println!("taskboard_core version={}", core_version());
    println!("database={}", config.db_path.display());

    let conn = open_db(&config.db_path).map_err(|err| format!("database setup failed: {err}"))?;
    let counts = store_counts(&conn).map_err(|err| format!("count query failed: {err}"))?;

    println!("users={}", counts.users);
    println!("categories={}", counts.categories);
    println!("tasks={}", counts.tasks);
    println!("subtasks={}", counts.subtasks);
    info!(
        "event=setup module=cli status=ok users={} categories={} tasks={} subtasks={}",
        counts.users, counts.categories, counts.tasks, counts.subtasks
    );
    Ok(())
}

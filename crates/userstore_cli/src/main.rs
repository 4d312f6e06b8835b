//! Interactive user CRUD console over SQLite.
//!
//! Wiring order: logging (best effort) -> database (fatal on failure) ->
//! repository -> service -> interpreter loop.

mod payload;
mod render;
mod repl;

use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use userstore_core::db::open_db;
use userstore_core::{SqliteUserRepository, UserService};

#[derive(Parser, Debug)]
#[command(name = "userstore", version, about = "Interactive user CRUD console")]
struct Args {
    /// SQLite database file backing the users table.
    #[arg(long, env = "USERSTORE_DB", default_value = "userstore.db")]
    db: PathBuf,

    /// Directory for rotated log files. Relative paths resolve against the
    /// current working directory.
    #[arg(long, env = "USERSTORE_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(
        long,
        env = "USERSTORE_LOG_LEVEL",
        default_value_t = userstore_core::default_log_level().to_string()
    )]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = userstore_core::init_logging(&args.log_level, &absolutize(&args.log_dir)) {
        // A broken log sink must not block the interactive session.
        eprintln!("Warning: file logging disabled: {err}");
    }

    let conn = match open_db(&args.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Error: failed to open database `{}`: {err}", args.db.display());
            return ExitCode::FAILURE;
        }
    };
    info!("event=app_start module=cli status=ok db={}", args.db.display());

    let service = UserService::new(SqliteUserRepository::new(&conn));
    match repl::Repl::new(service).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

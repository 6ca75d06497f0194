use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use workbench::error::Result;
use workbench::services::ProjectService;
use workbench::shell::Shell;
use workbench::storage::open_database;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // The first argument overrides the database file path.
    let db_path = match env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => default_db_path(),
    };

    let data_dir = db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&data_dir)?;

    // Log to a file next to the database so log lines never interleave
    // with the menu.
    let file_appender = tracing_appender::rolling::never(&data_dir, "workbench.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "workbench=info".into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let db = open_database(&db_path)?;
    let service = ProjectService::new(db);
    service.create_schema()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), service);
    shell.run()
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workbench")
        .join("workbench.sqlite")
}

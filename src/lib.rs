pub mod cli;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod net;
pub mod notes;
pub mod pantry;
pub mod session;
pub mod transport;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

pub use collection::{Collection, CollectionView, ReadOutcome, RecordId, ViewEvent, ViewPhase};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{SyncError, SyncErrorCode};
pub use session::{Session, UserId};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,pantry_sync_lib=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    config::load_env_files();
    init_tracing();

    let cli = cli::Cli::parse();
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
